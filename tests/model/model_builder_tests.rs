// Model builder tests - provider dispatch and the bundled HTTP clients'
// failure behaviour without a live provider.

#[path = "../common/mod.rs"]
mod common;

use common::parrot_builder;
use orrery_core::config::{ConfigError, ModelConfig, ProviderId, RuntimeConfig};
use orrery_core::model::{ModelError, ModelRegistry, ModelRequest, resolve_api_key};
use orrery_core::types::ChatMessage;
use serial_test::serial;

#[test]
fn default_registry_knows_the_bundled_providers() {
    let registry = ModelRegistry::with_defaults();
    assert_eq!(
        registry.providers(),
        vec!["anthropic", "gemini", "google", "ollama", "openai"]
    );
}

#[test]
fn builds_a_handle_per_provider_without_network_io() {
    let registry = ModelRegistry::with_defaults();
    for provider in [
        ProviderId::OPENAI,
        ProviderId::ANTHROPIC,
        ProviderId::GEMINI,
        ProviderId::OLLAMA,
    ] {
        let handle = registry
            .build(&ModelConfig::new(provider, "some-model"))
            .expect("handle");
        assert_eq!(handle.provider(), provider);
        assert_eq!(handle.model(), "some-model");
    }
}

#[test]
fn provider_tags_are_normalised_before_lookup() {
    let registry = ModelRegistry::with_defaults();
    let handle = registry
        .build(&ModelConfig::new(":OpenAI", "gpt-4o"))
        .expect("handle");
    assert_eq!(handle.provider(), "openai");
}

#[test]
fn unknown_providers_fail_with_a_configuration_error() {
    let registry = ModelRegistry::with_defaults();
    let err = registry
        .build(&ModelConfig::new("mistral", "large"))
        .err()
        .expect("unknown provider");
    assert!(matches!(&err, ConfigError::UnknownProvider { provider } if provider == "mistral"));
}

#[test]
fn registering_a_builder_adds_a_provider_without_touching_others() {
    let mut registry = ModelRegistry::with_defaults();
    assert!(registry.register("parrot", parrot_builder).is_none());

    let handle = registry
        .build(&ModelConfig::new("parrot", "polly"))
        .expect("handle");
    assert_eq!(handle.provider(), "parrot");
    assert_eq!(handle.model(), "polly");
    assert!(registry.contains(&ProviderId::new("openai")));
}

#[test]
fn configured_providers_are_checked_against_the_registry() {
    let config = RuntimeConfig::from_toml_str(
        r#"
        default_model = "parrot/polly"
        [models."parrot/polly"]
        [models."openai/gpt-4o-mini"]
        "#,
    )
    .expect("config loads without knowing providers");

    let defaults = ModelRegistry::with_defaults();
    assert!(matches!(
        defaults.validate_config(&config),
        Err(ConfigError::UnknownProvider { provider }) if provider == "parrot"
    ));

    let mut registry = ModelRegistry::with_defaults();
    registry.register("parrot", parrot_builder);
    assert!(registry.validate_config(&config).is_ok());
}

#[test]
fn empty_model_names_are_rejected() {
    let registry = ModelRegistry::with_defaults();
    assert!(matches!(
        registry.build(&ModelConfig::new("openai", "  ")),
        Err(ConfigError::MissingField { field: "model", .. })
    ));
}

#[test]
#[serial]
fn api_key_falls_back_to_the_provider_environment_variable() {
    let provider = ProviderId::new("openai");
    // SAFETY: serialised with every other test touching the environment.
    unsafe { std::env::set_var("OPENAI_API_KEY", "sk-env") };
    assert_eq!(resolve_api_key(&provider, Some(" sk-explicit ")).as_deref(), Some("sk-explicit"));
    assert_eq!(resolve_api_key(&provider, None).as_deref(), Some("sk-env"));
    assert_eq!(resolve_api_key(&provider, Some("   ")).as_deref(), Some("sk-env"));

    unsafe { std::env::remove_var("OPENAI_API_KEY") };
    assert_eq!(resolve_api_key(&provider, None), None);
}

#[tokio::test]
#[serial]
async fn google_alias_reads_the_gemini_key() {
    let google = ProviderId::new("google");
    assert_eq!(google.api_key_env_var(), "GEMINI_API_KEY");

    // SAFETY: serialised with every other test touching the environment.
    unsafe {
        std::env::remove_var("GOOGLE_API_KEY");
        std::env::set_var("GEMINI_API_KEY", "g-from-env");
    }
    assert_eq!(resolve_api_key(&google, None).as_deref(), Some("g-from-env"));
    assert_eq!(
        resolve_api_key(&ProviderId::new("gemini"), None).as_deref(),
        Some("g-from-env")
    );

    unsafe { std::env::remove_var("GEMINI_API_KEY") };
    let handle = ModelRegistry::with_defaults()
        .build(&ModelConfig::new("google", "gemini-2.0-flash"))
        .expect("handle");
    let err = handle
        .chat(ModelRequest::new(vec![ChatMessage::user("hi")]))
        .await
        .expect_err("no key");
    assert!(matches!(err, ModelError::MissingApiKey { .. }));
}

#[tokio::test]
#[serial]
async fn missing_api_key_surfaces_on_first_call() {
    unsafe { std::env::remove_var("ANTHROPIC_API_KEY") };
    let handle = ModelRegistry::with_defaults()
        .build(&ModelConfig::new("anthropic", "claude-sonnet-4-5"))
        .expect("construction succeeds without a key");

    let err = handle
        .chat(ModelRequest::new(vec![ChatMessage::user("hi")]))
        .await
        .expect_err("no key");
    assert!(err.is_authentication());
    assert!(matches!(err, ModelError::MissingApiKey { .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let config = ModelConfig::new("ollama", "qwen3")
        .with_base_url("http://127.0.0.1:9")
        .with_max_retries(0)
        .with_timeout_secs(5);
    let handle = ModelRegistry::with_defaults().build(&config).expect("handle");

    let err = handle
        .chat(ModelRequest::new(vec![ChatMessage::user("hi")]))
        .await
        .expect_err("nothing listens on the discard port");
    assert!(matches!(err, ModelError::Network { .. }));
    assert!(err.is_retryable());
}
