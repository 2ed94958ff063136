// ABOUTME: Product requirements document model and the persisted wrappers around it
// ABOUTME: Document, Feature, Entity, TechStack, MvpScope, Project, and Identity types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structured product requirements document.
///
/// The shape is closed: unknown fields are rejected on deserialization and
/// every field is required. Sequence order is meaningful and preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Document {
    pub app_name: String,
    pub tagline: String,
    pub summary: String,
    pub target_users: Vec<String>,
    pub features: Vec<Feature>,
    pub tech_stack: TechStack,
    pub data_models: Vec<Entity>,
    /// Narrative description of the main user journey, line breaks preserved.
    pub user_flow: String,
    pub mvp_scope: MvpScope,
    /// One-shot build prompt for a composer-style IDE.
    pub cursor_prompt: String,
    /// Step-by-step prompt for an agent-based IDE.
    pub replit_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Feature {
    pub name: String,
    pub user_story: String,
    pub acceptance_criteria: Vec<String>,
    pub priority: Priority,
}

/// Feature priority. Serialized exactly as `High`, `Medium`, `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TechStack {
    pub frontend: String,
    pub backend: String,
    pub database: String,
    pub auth: String,
    pub deployment: String,
}

/// A data model entity; attributes are `"name: type"` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entity {
    pub name: String,
    pub description: String,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MvpScope {
    pub must_have: Vec<String>,
    pub should_have: Vec<String>,
    pub could_have: Vec<String>,
    pub wont_have: Vec<String>,
}

/// A persisted, owned wrapper around exactly one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    /// Denormalized from `data.app_name`.
    pub name: String,
    /// Denormalized from `data.tagline`.
    pub summary: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub owner_id: String,
    pub data: Document,
}

impl Project {
    /// Wrap a document, deriving the denormalized name and summary.
    pub fn from_document(
        id: String,
        owner_id: String,
        created_at: DateTime<Utc>,
        data: Document,
    ) -> Self {
        Self {
            id,
            name: data.app_name.clone(),
            summary: data.tagline.clone(),
            created_at,
            owner_id,
            data,
        }
    }

    /// Replace the embedded document wholesale. `id`, `created_at`, and
    /// `owner_id` are untouched.
    pub fn replace_document(&mut self, data: Document) {
        self.name = data.app_name.clone();
        self.summary = data.tagline.clone();
        self.data = data;
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

/// Subscription plan. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Team,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Team => "team",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            "team" => Ok(Plan::Team),
            other => Err(format!("Unknown plan: {}", other)),
        }
    }
}

/// The authenticated user a request acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    pub plan: Plan,
}
