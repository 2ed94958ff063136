// ABOUTME: Integration tests for the PRD generator against a mocked generation capability
// ABOUTME: Covers success, input rejection, failure classification, timeouts, and retries

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use pretty_assertions::assert_eq;
use vibespecs_ai::{AIServiceError, AIServiceResult, GenerationRequest, StructuredGeneration};
use vibespecs_core::test_fixtures::sample_document;
use vibespecs_ideate::{GenerationError, GeneratorSettings, PrdGenerator, RetryPolicy};

mock! {
    Generation {}

    #[async_trait]
    impl StructuredGeneration for Generation {
        async fn generate(&self, request: GenerationRequest) -> AIServiceResult<String>;
    }
}

fn sample_json() -> String {
    serde_json::to_string(&sample_document()).unwrap()
}

fn generator_with(mock: MockGeneration) -> PrdGenerator {
    PrdGenerator::new(Arc::new(mock))
}

#[tokio::test]
async fn test_generate_returns_validated_document() {
    let mut mock = MockGeneration::new();
    mock.expect_generate()
        .withf(|request| {
            request.prompt == "Here is the raw idea: a todo app"
                && request.response_schema.is_some()
                && request.system_prompt.is_some()
                && (request.temperature - 0.4).abs() < f32::EPSILON
        })
        .times(1)
        .returning(|_| Ok(sample_json()));

    let document = generator_with(mock).generate("a todo app").await.unwrap();

    assert_eq!(document, sample_document());
    assert_eq!(document.features.len(), 2);
    assert_eq!(
        document.mvp_scope.must_have,
        vec!["create task".to_string(), "mark complete".to_string()]
    );
}

#[tokio::test]
async fn test_blank_idea_rejected_without_calling_backend() {
    let mut mock = MockGeneration::new();
    mock.expect_generate().times(0);

    let err = generator_with(mock).generate("   \n\t").await.unwrap_err();
    assert!(matches!(err, GenerationError::InvalidInput(_)));
}

#[tokio::test]
async fn test_missing_api_key_is_configuration_error() {
    let mut mock = MockGeneration::new();
    mock.expect_generate()
        .returning(|_| Err(AIServiceError::NoApiKey));

    let err = generator_with(mock).generate("a todo app").await.unwrap_err();
    assert!(matches!(err, GenerationError::Configuration(_)));
}

#[tokio::test]
async fn test_non_json_output_is_upstream_error() {
    let mut mock = MockGeneration::new();
    mock.expect_generate()
        .returning(|_| Ok("I could not produce a document".to_string()));

    let err = generator_with(mock).generate("a todo app").await.unwrap_err();
    assert!(matches!(err, GenerationError::Upstream(_)));
}

#[tokio::test]
async fn test_removing_any_required_field_fails_validation() {
    let complete = serde_json::to_value(sample_document()).unwrap();
    let mut paths: Vec<Vec<&str>> = complete
        .as_object()
        .unwrap()
        .keys()
        .map(|key| vec![key.as_str()])
        .collect();
    paths.extend([
        vec!["techStack", "auth"],
        vec!["mvpScope", "wontHave"],
        vec!["features", "0", "priority"],
        vec!["dataModels", "1", "attributes"],
    ]);

    for path in paths {
        let mut value = complete.clone();
        let (last, parents) = path.split_last().unwrap();
        let mut target = &mut value;
        for segment in parents {
            target = match segment.parse::<usize>() {
                Ok(index) => &mut target[index],
                Err(_) => &mut target[*segment],
            };
        }
        target.as_object_mut().unwrap().remove(*last);
        let raw = value.to_string();

        let mut mock = MockGeneration::new();
        mock.expect_generate().returning(move |_| Ok(raw.clone()));

        let err = generator_with(mock).generate("a todo app").await.unwrap_err();
        assert!(
            matches!(err, GenerationError::Validation(_)),
            "removing {:?} gave {:?}",
            path,
            err
        );
    }
}

#[tokio::test]
async fn test_unknown_field_fails_validation() {
    let mut value = serde_json::to_value(sample_document()).unwrap();
    value["pricing"] = "freemium".into();
    let raw = value.to_string();

    let mut mock = MockGeneration::new();
    mock.expect_generate().returning(move |_| Ok(raw.clone()));

    let err = generator_with(mock).generate("a todo app").await.unwrap_err();
    assert!(matches!(err, GenerationError::Validation(_)));
}

struct SlowGeneration;

#[async_trait]
impl StructuredGeneration for SlowGeneration {
    async fn generate(&self, _request: GenerationRequest) -> AIServiceResult<String> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok(sample_json())
    }
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_upstream_error() {
    let generator = PrdGenerator::with_settings(
        Arc::new(SlowGeneration),
        GeneratorSettings {
            timeout: Duration::from_secs(5),
            ..GeneratorSettings::default()
        },
    );

    let err = generator.generate("a todo app").await.unwrap_err();
    assert!(matches!(err, GenerationError::Upstream(ref msg) if msg.contains("timed out")));
}

#[tokio::test]
async fn test_retry_recovers_from_upstream_failure() {
    let mut mock = MockGeneration::new();
    let mut seq = mockall::Sequence::new();
    mock.expect_generate()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(AIServiceError::RateLimited("busy".to_string())));
    mock.expect_generate()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(sample_json()));

    let document = generator_with(mock)
        .generate_with_retry("a todo app", &RetryPolicy::retries(2, Duration::ZERO))
        .await
        .unwrap();

    assert_eq!(document.app_name, "TaskFlow");
}

#[tokio::test]
async fn test_retry_does_not_repeat_validation_failures() {
    let mut doc = sample_document();
    doc.mvp_scope.must_have.clear();
    let raw = serde_json::to_string(&doc).unwrap();

    let mut mock = MockGeneration::new();
    mock.expect_generate()
        .times(1)
        .returning(move |_| Ok(raw.clone()));

    let err = generator_with(mock)
        .generate_with_retry("a todo app", &RetryPolicy::retries(3, Duration::ZERO))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Validation(_)));
}

#[tokio::test]
async fn test_retry_gives_up_after_max_attempts() {
    let mut mock = MockGeneration::new();
    mock.expect_generate()
        .times(2)
        .returning(|_| Err(AIServiceError::ApiError("API returned 503".to_string())));

    let err = generator_with(mock)
        .generate_with_retry("a todo app", &RetryPolicy::retries(1, Duration::ZERO))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Upstream(_)));
}
