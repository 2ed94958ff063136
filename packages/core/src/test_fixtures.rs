// ABOUTME: Shared document fixtures for tests across the workspace
// ABOUTME: Enabled in-crate for unit tests and for other crates via the test-utils feature

use crate::types::{Document, Entity, Feature, MvpScope, Priority, TechStack};

/// A complete, valid document for a small task tracker.
pub fn sample_document() -> Document {
    Document {
        app_name: "TaskFlow".to_string(),
        tagline: "Tasks that move themselves".to_string(),
        summary: "TaskFlow is a lightweight task tracker for small teams. It keeps \
                  personal and shared todo lists in sync."
            .to_string(),
        target_users: vec![
            "Freelancers juggling several clients".to_string(),
            "Small product teams".to_string(),
        ],
        features: vec![
            Feature {
                name: "Task capture".to_string(),
                user_story: "As a user, I want to create a task quickly so that I never \
                             lose an idea."
                    .to_string(),
                acceptance_criteria: vec![
                    "Task can be created with only a title".to_string(),
                    "New task appears at the top of the list".to_string(),
                ],
                priority: Priority::High,
            },
            Feature {
                name: "Completion tracking".to_string(),
                user_story: "As a user, I want to mark tasks complete so that I can see \
                             my progress."
                    .to_string(),
                acceptance_criteria: vec!["Completed tasks are visually struck through".to_string()],
                priority: Priority::Medium,
            },
        ],
        tech_stack: TechStack {
            frontend: "React + TypeScript + Tailwind".to_string(),
            backend: "Node.js (Next.js API routes)".to_string(),
            database: "PostgreSQL (Supabase)".to_string(),
            auth: "Supabase Auth".to_string(),
            deployment: "Vercel".to_string(),
        },
        data_models: vec![
            Entity {
                name: "User".to_string(),
                description: "An account holder".to_string(),
                attributes: vec!["id: uuid".to_string(), "email: string".to_string()],
            },
            Entity {
                name: "Task".to_string(),
                description: "A unit of work owned by a user".to_string(),
                attributes: vec![
                    "id: uuid".to_string(),
                    "title: string".to_string(),
                    "completed: boolean".to_string(),
                    "user_id: uuid".to_string(),
                ],
            },
        ],
        user_flow: "1. Sign up\n2. Create a task\n3. Mark it complete".to_string(),
        mvp_scope: MvpScope {
            must_have: vec!["create task".to_string(), "mark complete".to_string()],
            should_have: vec!["due dates".to_string()],
            could_have: vec!["recurring tasks".to_string()],
            wont_have: vec!["gantt charts".to_string()],
        },
        cursor_prompt: "Build a Next.js app called TaskFlow with the following files..."
            .to_string(),
        replit_prompt: "Step 1: scaffold a Next.js project. Step 2: add a tasks table."
            .to_string(),
    }
}

/// The sample document with a different app name and tagline.
pub fn named_document(app_name: &str) -> Document {
    let mut doc = sample_document();
    doc.app_name = app_name.to_string();
    doc.tagline = format!("{} tagline", app_name);
    doc
}
