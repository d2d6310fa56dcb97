// Session tests - configured agents served through the cache.

#[path = "../common/mod.rs"]
mod common;

use common::{hello_tool, named_tool, parrot_builder};
use orrery_core::agent::AgentError;
use orrery_core::config::{ConfigError, RuntimeConfig};
use orrery_core::model::ModelRegistry;
use orrery_core::tooling::{ToolCallContext, ToolRegistration, ToolSchema};
use orrery_core::{AgentSession, load_context_files};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

const CONFIG: &str = r#"
default_model = "parrot/polly"

[models."parrot/polly"]

[[agents]]
id = "helper"
system_prompt = "You help."
memory_size = 100
enable_tools = ["hello", "eval"]
disable_tools = ["eval"]

[[agents]]
id = "oneshot"
system_prompt = "You answer once."
enable_tools = "all"

[[agents]]
id = "misconfigured"
model = "parrot/polly"
"#;

fn registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry.register("parrot", parrot_builder);
    registry
}

fn session_with(toml: &str) -> AgentSession {
    let config = RuntimeConfig::from_toml_str(toml).expect("config");
    let catalog = vec![hello_tool(), named_tool("eval"), named_tool("bash")];
    AgentSession::new(config, registry(), catalog)
}

#[tokio::test]
async fn tools_reach_the_agent_through_its_filter() {
    let session = session_with(CONFIG);
    let outcome = session
        .chat("helper", r#"call hello {"nm":"Joey"}"#)
        .await
        .expect("chat");
    assert_eq!(outcome.result, "tool said: Hello Joey!");
    assert!(!outcome.error);

    let blocked = session.chat("helper", "call eval {}").await.expect("chat");
    assert!(blocked.result.starts_with("tool said: ERROR: unknown tool 'eval'"));

    let agent = session.agent("oneshot").await.expect("agent");
    assert_eq!(agent.lock().await.tool_names(), ["hello", "eval", "bash"]);
}

#[tokio::test]
async fn memory_survives_between_chats_but_not_for_stateless_agents() {
    let session = session_with(CONFIG);
    assert_eq!(session.chat("helper", "a").await.expect("chat").result, "1 messages");
    assert_eq!(session.chat("helper", "b").await.expect("chat").result, "3 messages");

    assert_eq!(session.chat("oneshot", "a").await.expect("chat").result, "1 messages");
    assert_eq!(session.chat("oneshot", "b").await.expect("chat").result, "1 messages");
}

#[tokio::test]
async fn concurrent_chats_share_one_agent_and_serialise() {
    let session = Arc::new(session_with(CONFIG));
    let tasks: Vec<_> = (0..10)
        .map(|i| {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.chat("helper", &format!("hi {i}")).await })
        })
        .collect();
    for task in tasks {
        let outcome = task.await.expect("join").expect("chat");
        assert!(!outcome.error);
    }

    assert_eq!(session.cache().len().await, 1);
    let agent = session.agent("helper").await.expect("agent");
    assert_eq!(agent.lock().await.memory().map(|m| m.len()), Some(20));
}

#[tokio::test]
async fn context_file_edits_reseed_on_the_next_chat() {
    let dir = tempdir().expect("tempdir");
    let guide = dir.path().join("GUIDE.md");
    fs::write(&guide, "rule one").expect("write");
    let toml = format!(
        r#"
        default_model = "parrot/polly"
        [models."parrot/polly"]

        [[agents]]
        id = "reader"
        system_prompt = "You follow the guide."
        memory_size = 100
        context_files = ['{}', '{}']
        "#,
        guide.display(),
        dir.path().join("missing.md").display()
    );
    let session = session_with(&toml);

    assert_eq!(session.chat("reader", "x").await.expect("chat").result, "2 messages");
    assert_eq!(session.chat("reader", "y").await.expect("chat").result, "4 messages");

    fs::write(&guide, "rule two").expect("write");
    assert_eq!(session.chat("reader", "z").await.expect("chat").result, "2 messages");

    let agent = session.agent("reader").await.expect("agent");
    let expected = load_context_files(&[guide.clone()]).await;
    assert_eq!(agent.lock().await.context(), expected.as_slice());
}

#[tokio::test]
async fn configuration_errors_are_returned_not_cached() {
    let session = session_with(CONFIG);

    let err = session.chat("nobody", "hi").await.expect_err("unknown agent");
    assert!(matches!(err, AgentError::Configuration(ConfigError::UnknownAgent { .. })));

    let err = session.chat("misconfigured", "hi").await.expect_err("no system prompt");
    assert!(matches!(
        err,
        AgentError::Configuration(ConfigError::MissingField { field: "system_prompt", .. })
    ));
    assert!(session.cache().is_empty().await);
}

#[tokio::test]
async fn host_capabilities_reach_tool_handlers() {
    struct Host {
        name: &'static str,
    }

    let whoami = ToolRegistration::new("whoami", "", ToolSchema::object(), |ctx: ToolCallContext, _, callback| {
        let host = ctx.capability::<Host>().map(|host| host.name).unwrap_or("unknown");
        callback.success(format!("{host} via {}", ctx.agent_id.as_deref().unwrap_or("?")));
        Ok(())
    });
    let config = RuntimeConfig::from_toml_str(CONFIG).expect("config");
    let session = AgentSession::new(config, registry(), vec![whoami])
        .with_capabilities(Arc::new(Host { name: "editor" }));

    let outcome = session.chat("oneshot", "call whoami").await.expect("chat");
    assert_eq!(outcome.result, "tool said: editor via oneshot");
}

#[tokio::test]
async fn invalidated_agents_start_fresh() {
    let session = session_with(CONFIG);
    session.chat("helper", "a").await.expect("chat");
    session.chat("helper", "b").await.expect("chat");

    assert!(session.invalidate("helper").await);
    assert_eq!(session.chat("helper", "c").await.expect("chat").result, "1 messages");
}
