// Config loading tests - RuntimeConfig::load parsing, validation and errors.

use orrery_core::config::{ConfigError, ProviderId, RuntimeConfig, ThinkingEffort, ToolId, ToolSelection};
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("orrery.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

const FULL: &str = r#"
default_model = "anthropic/claude-sonnet-4-5"

[models."anthropic/claude-sonnet-4-5"]
api_key = "sk-ant-test"
temperature = 0.4
max_tokens = 2048
anthropic_version = "2023-06-01"
thinking = { effort = "high" }

[models."openai/gpt-4o"]
api_key = "sk-test"
organization = "org-123"
stop = ["END"]

[models.local]
provider = "ollama"
model = "qwen3"
base_url = "http://gpu-box:11434"
timeout_secs = 30

[[agents]]
id = "reviewer"
system_prompt = "You review code."
memory_size = 100
enable_tools = "all"
disable_tools = ["bash"]
context_files = ["README.md"]

[agents.model_overrides]
temperature = 0.1

[[agents]]
id = "scout"
model = "local"
system_prompt = "You explore."
enable_tools = [":read_file", "Grep"]
max_round_trips = 5
"#;

#[test]
fn loads_models_and_agents_from_file() {
    let dir = tempdir().expect("tempdir");
    let config = RuntimeConfig::load(Some(&write_config(dir.path(), FULL))).expect("config");

    assert_eq!(config.default_model.as_deref(), Some("anthropic/claude-sonnet-4-5"));
    assert_eq!(config.models.len(), 3);

    let claude = config.model("anthropic/claude-sonnet-4-5").expect("claude");
    assert_eq!(claude.provider.as_str(), ProviderId::ANTHROPIC);
    assert_eq!(claude.model, "claude-sonnet-4-5");
    assert_eq!(claude.max_tokens, Some(2048));
    assert_eq!(claude.extras.anthropic_version.as_deref(), Some("2023-06-01"));
    assert_eq!(claude.thinking.map(|t| t.effort()), Some(ThinkingEffort::High));

    let gpt = config.model("openai/gpt-4o").expect("gpt");
    assert_eq!(gpt.extras.organization.as_deref(), Some("org-123"));
    assert_eq!(gpt.stop, vec!["END".to_string()]);

    let local = config.model("local").expect("local");
    assert_eq!(local.provider.as_str(), ProviderId::OLLAMA);
    assert_eq!(local.model, "qwen3");
    assert_eq!(local.base_url.as_deref(), Some("http://gpu-box:11434"));
    assert_eq!(local.timeout_secs, Some(30));

    let reviewer = config.agent("reviewer").expect("reviewer");
    assert_eq!(reviewer.enable_tools, ToolSelection::All);
    assert_eq!(reviewer.disable_tools, vec![ToolId::new("bash")]);
    assert_eq!(reviewer.memory_size, Some(100));
    assert_eq!(reviewer.context_files, vec![PathBuf::from("README.md")]);

    let scout = config.agent("scout").expect("scout");
    assert_eq!(
        scout.enable_tools,
        ToolSelection::only(["read_file", "grep"])
    );
    assert_eq!(scout.max_round_trips, Some(5));
    assert_eq!(scout.memory_size, None);
}

#[test]
fn agent_overrides_win_over_named_defaults() {
    let config = RuntimeConfig::from_toml_str(FULL).expect("config");

    let reviewer = config.agent_model(config.agent("reviewer").expect("reviewer")).expect("model");
    assert_eq!(reviewer.model, "claude-sonnet-4-5");
    assert_eq!(reviewer.temperature, Some(0.1));
    assert_eq!(reviewer.max_tokens, Some(2048));

    let scout = config.agent_model(config.agent("scout").expect("scout")).expect("model");
    assert_eq!(scout.provider.as_str(), ProviderId::OLLAMA);
    assert_eq!(scout.temperature, None);
}

#[test]
fn returns_error_when_file_not_found() {
    let result = RuntimeConfig::load(Some(Path::new("/nonexistent/path/orrery.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn returns_error_on_malformed_toml() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "default_model = [unterminated");
    assert!(matches!(
        RuntimeConfig::load(Some(&path)),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn rejects_duplicate_agent_ids() {
    let result = RuntimeConfig::from_toml_str(
        r#"
        default_model = "openai/gpt-4o"
        [models."openai/gpt-4o"]

        [[agents]]
        id = "twin"
        [[agents]]
        id = "twin"
        "#,
    );
    assert!(matches!(result, Err(ConfigError::DuplicateAgent { agent }) if agent == "twin"));
}

#[test]
fn rejects_agents_pointing_at_unknown_models() {
    let result = RuntimeConfig::from_toml_str(
        r#"
        [models."openai/gpt-4o"]

        [[agents]]
        id = "lost"
        model = "openai/gpt-5"
        "#,
    );
    assert!(matches!(result, Err(ConfigError::UnknownModel { model }) if model == "openai/gpt-5"));
}

#[test]
fn rejects_agents_without_any_model() {
    let result = RuntimeConfig::from_toml_str(
        r#"
        [[agents]]
        id = "orphan"
        "#,
    );
    assert!(matches!(
        result,
        Err(ConfigError::MissingField { field: "model", .. })
    ));
}

#[test]
fn rejects_model_keys_without_provider() {
    let result = RuntimeConfig::from_toml_str(
        r#"
        [models.gpt4]
        "#,
    );
    assert!(matches!(result, Err(ConfigError::InvalidModelKey { key }) if key == "gpt4"));
}

#[test]
fn unknown_agent_lookup_fails() {
    let config = RuntimeConfig::from_toml_str(FULL).expect("config");
    let err = config.agent("ghost").expect_err("unknown agent");
    assert_eq!(err.user_message(), "Agent 'ghost' is not defined in the configuration.");
}

#[test]
#[serial]
fn api_keys_expand_environment_variables() {
    // SAFETY: serialised with every other test touching the environment.
    unsafe { std::env::set_var("ORRERY_TEST_KEY", "sk-from-env") };
    let config = RuntimeConfig::from_toml_str(
        r#"
        [models."openai/gpt-4o"]
        api_key = "${ORRERY_TEST_KEY}"
        "#,
    )
    .expect("config");
    unsafe { std::env::remove_var("ORRERY_TEST_KEY") };

    assert_eq!(
        config.model("openai/gpt-4o").expect("model").api_key.as_deref(),
        Some("sk-from-env")
    );
}

#[test]
#[serial]
fn unset_api_key_variables_leave_the_key_empty() {
    unsafe { std::env::remove_var("ORRERY_MISSING_KEY") };
    let config = RuntimeConfig::from_toml_str(
        r#"
        [models."openai/gpt-4o"]
        api_key = "${ORRERY_MISSING_KEY}"
        "#,
    )
    .expect("config");
    assert_eq!(config.model("openai/gpt-4o").expect("model").api_key, None);
}
