// ABOUTME: Validation rule set for product requirements documents
// ABOUTME: Shared by the generator and the project store so invalid documents never persist

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::types::Document;

/// A single violated rule, addressed by a JSON-style field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Document failed validation: {}", join_issues(.issues))]
pub struct DocumentValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl DocumentValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![ValidationIssue::new(field, message)],
        }
    }

    /// True when any issue is reported for `field` or one of its children.
    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field.starts_with(field))
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Run every rule against `document`, collecting all violations.
pub fn validate_document(document: &Document) -> Result<(), DocumentValidationError> {
    let mut issues = Vec::new();

    require_text(&mut issues, "appName", &document.app_name);
    require_text(&mut issues, "tagline", &document.tagline);
    require_text(&mut issues, "summary", &document.summary);

    require_items(&mut issues, "targetUsers", &document.target_users);

    if document.features.is_empty() {
        issues.push(ValidationIssue::new("features", "must contain at least one feature"));
    }
    for (i, feature) in document.features.iter().enumerate() {
        let path = format!("features[{}]", i);
        require_text(&mut issues, &format!("{}.name", path), &feature.name);
        require_items(
            &mut issues,
            &format!("{}.acceptanceCriteria", path),
            &feature.acceptance_criteria,
        );
    }

    let stack = &document.tech_stack;
    require_text(&mut issues, "techStack.frontend", &stack.frontend);
    require_text(&mut issues, "techStack.backend", &stack.backend);
    require_text(&mut issues, "techStack.database", &stack.database);
    require_text(&mut issues, "techStack.auth", &stack.auth);
    require_text(&mut issues, "techStack.deployment", &stack.deployment);

    if document.data_models.is_empty() {
        issues.push(ValidationIssue::new(
            "dataModels",
            "must contain at least one entity",
        ));
    }
    for (i, entity) in document.data_models.iter().enumerate() {
        let path = format!("dataModels[{}]", i);
        require_text(&mut issues, &format!("{}.name", path), &entity.name);
        require_items(
            &mut issues,
            &format!("{}.attributes", path),
            &entity.attributes,
        );
    }

    require_items(&mut issues, "mvpScope.mustHave", &document.mvp_scope.must_have);
    require_items(
        &mut issues,
        "mvpScope.shouldHave",
        &document.mvp_scope.should_have,
    );
    // couldHave and wontHave may legitimately be empty

    if issues.is_empty() {
        Ok(())
    } else {
        Err(DocumentValidationError { issues })
    }
}

fn require_text(issues: &mut Vec<ValidationIssue>, field: &str, value: &str) {
    if value.trim().is_empty() {
        issues.push(ValidationIssue::new(field, "must not be empty"));
    }
}

/// Sequence must be non-empty and every entry non-blank after trimming.
fn require_items(issues: &mut Vec<ValidationIssue>, field: &str, items: &[String]) {
    if items.is_empty() {
        issues.push(ValidationIssue::new(field, "must contain at least one entry"));
        return;
    }
    for (i, item) in items.iter().enumerate() {
        if item.trim().is_empty() {
            issues.push(ValidationIssue::new(
                format!("{}[{}]", field, i),
                "must not be blank",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sample_document;

    #[test]
    fn test_sample_document_is_valid() {
        assert!(validate_document(&sample_document()).is_ok());
    }

    #[test]
    fn test_blank_app_name_rejected() {
        let mut doc = sample_document();
        doc.app_name = "   ".to_string();

        let err = validate_document(&doc).unwrap_err();
        assert!(err.mentions("appName"));
    }

    #[test]
    fn test_empty_required_sequences_rejected() {
        let mut doc = sample_document();
        doc.target_users.clear();
        doc.features.clear();
        doc.data_models.clear();
        doc.mvp_scope.must_have.clear();
        doc.mvp_scope.should_have.clear();

        let err = validate_document(&doc).unwrap_err();
        for field in [
            "targetUsers",
            "features",
            "dataModels",
            "mvpScope.mustHave",
            "mvpScope.shouldHave",
        ] {
            assert!(err.mentions(field), "expected issue for {}", field);
        }
    }

    #[test]
    fn test_could_and_wont_have_may_be_empty() {
        let mut doc = sample_document();
        doc.mvp_scope.could_have.clear();
        doc.mvp_scope.wont_have.clear();

        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_blank_attribute_rejected() {
        let mut doc = sample_document();
        doc.data_models[0].attributes.push("  \t".to_string());

        let err = validate_document(&doc).unwrap_err();
        assert!(err.mentions("dataModels[0].attributes[2]"));
    }

    #[test]
    fn test_feature_without_acceptance_criteria_rejected() {
        let mut doc = sample_document();
        doc.features[1].acceptance_criteria.clear();

        let err = validate_document(&doc).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field, "features[1].acceptanceCriteria");
    }

    #[test]
    fn test_blank_tech_stack_field_rejected() {
        let mut doc = sample_document();
        doc.tech_stack.deployment = String::new();

        let err = validate_document(&doc).unwrap_err();
        assert!(err.mentions("techStack.deployment"));
    }

    #[test]
    fn test_error_message_lists_every_issue() {
        let mut doc = sample_document();
        doc.app_name.clear();
        doc.tagline.clear();

        let message = validate_document(&doc).unwrap_err().to_string();
        assert!(message.contains("appName: must not be empty"));
        assert!(message.contains("tagline: must not be empty"));
    }
}
