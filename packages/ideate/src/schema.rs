// ABOUTME: JSON Schema describing the closed document contract
// ABOUTME: Sent with every generation request so the model must fill every field

use serde_json::{json, Value};

fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn string_list(description: &str, min_items: usize) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "minItems": min_items,
        "description": description
    })
}

/// Closed object with every property required.
fn object(properties: Value) -> Value {
    let required: Vec<String> = properties
        .as_object()
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// The structural contract for a generated document.
pub fn document_schema() -> Value {
    let feature = object(json!({
        "name": string("Feature name"),
        "userStory": string("As a [user], I want to [action] so that [benefit]"),
        "acceptanceCriteria": string_list("Specific criteria to mark the feature as done", 1),
        "priority": { "type": "string", "enum": ["High", "Medium", "Low"] }
    }));

    let tech_stack = object(json!({
        "frontend": string("Frontend framework and libraries"),
        "backend": string("Backend runtime and framework"),
        "database": string("Primary database"),
        "auth": string("Authentication provider"),
        "deployment": string("Hosting and deployment target")
    }));

    let entity = object(json!({
        "name": string("Entity name (e.g., User, Subscription)"),
        "description": string("What the entity represents"),
        "attributes": string_list("Fields like 'id: uuid', 'email: string'", 1)
    }));

    let mvp_scope = object(json!({
        "mustHave": string_list("Required for launch", 1),
        "shouldHave": string_list("Important but not blocking", 1),
        "couldHave": string_list("Nice to have", 0),
        "wontHave": string_list("Explicitly out of scope", 0)
    }));

    object(json!({
        "appName": string("A catchy name for the SaaS"),
        "tagline": string("A short, punchy tagline"),
        "summary": string("A comprehensive project summary (2-3 sentences)"),
        "targetUsers": string_list("Target user personas", 1),
        "features": { "type": "array", "items": feature, "minItems": 1 },
        "techStack": tech_stack,
        "dataModels": { "type": "array", "items": entity, "minItems": 1 },
        "userFlow": string("A step-by-step description of the main user journey"),
        "mvpScope": mvp_scope,
        "cursorPrompt": string(
            "A highly detailed, single-file prompt for Cursor's Composer that builds the MVP, \
             including file structure, dependencies, and core logic"
        ),
        "replitPrompt": string(
            "Step-by-step instructions for an agent-based IDE like Replit or Lovable to build \
             the app iteratively"
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_top_level_field_required() {
        let schema = document_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();

        for field in [
            "appName",
            "tagline",
            "summary",
            "targetUsers",
            "features",
            "techStack",
            "dataModels",
            "userFlow",
            "mvpScope",
            "cursorPrompt",
            "replitPrompt",
        ] {
            assert!(required.contains(&field), "{} missing from required", field);
        }
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn test_priority_is_enumerated() {
        let schema = document_schema();
        let priority = &schema["properties"]["features"]["items"]["properties"]["priority"];
        assert_eq!(priority["enum"], json!(["High", "Medium", "Low"]));
    }

    #[test]
    fn test_optional_scope_lists_allow_empty() {
        let schema = document_schema();
        let scope = &schema["properties"]["mvpScope"]["properties"];
        assert_eq!(scope["mustHave"]["minItems"], 1);
        assert_eq!(scope["couldHave"]["minItems"], 0);
        assert_eq!(scope["wontHave"]["minItems"], 0);
    }
}
