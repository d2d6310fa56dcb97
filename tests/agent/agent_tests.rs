// Agent tests - the chat loop against scripted model replies.

#[path = "../common/mod.rs"]
mod common;

use common::{ScriptedModel, greet, hello_tool, named_tool, tool_call};
use orrery_core::agent::{AgentBuilder, AgentError, ChatOutcome};
use orrery_core::types::{ChatMessage, MessageRole, ReasoningBlock};
use serde_json::json;

fn builder(model: &ScriptedModel) -> AgentBuilder {
    AgentBuilder::new()
        .id("assistant")
        .model(model.handle())
        .system_prompt("You are helpful.")
}

#[tokio::test]
async fn empty_prompt_returns_the_fixed_error() {
    let model = ScriptedModel::default();
    let mut agent = builder(&model).memory_size(100).build().expect("agent");

    let outcome = agent.chat("").await;
    assert_eq!(
        serde_json::to_value(&outcome).expect("json"),
        json!({"result": "Error: Cannot process empty prompt", "error": true})
    );
    assert!(model.requests().await.is_empty());
    assert!(matches!(agent.run("\t").await, Err(AgentError::EmptyPrompt)));
}

#[tokio::test]
async fn greets_joey_through_the_hello_tool() {
    let model = ScriptedModel::new(vec![greet("Joey"), ChatMessage::assistant("Said hi to Joey.")]);
    let mut agent = builder(&model)
        .memory_size(100)
        .tools([hello_tool(), named_tool("bash")])
        .build()
        .expect("agent");

    assert_eq!(agent.chat("please greet Joey").await, ChatOutcome::success("Said hi to Joey."));

    let requests = model.requests().await;
    assert_eq!(requests.len(), 2);
    let advertised: Vec<&str> = requests[0].tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(advertised, ["hello", "bash"]);

    let tool_turn = &requests[1].messages[2];
    assert_eq!(tool_turn.role, MessageRole::Tool);
    assert_eq!(tool_turn.tool_call_id.as_deref(), Some("call_hello"));
    assert_eq!(tool_turn.content(), "Hello Joey!");
}

#[tokio::test]
async fn several_tool_calls_in_one_reply_run_in_order() {
    let model = ScriptedModel::new(vec![
        ChatMessage::assistant_with_tool_calls(
            "",
            vec![
                tool_call("hello", json!({"nm": "Ann"})),
                tool_call("bash", json!({})),
                tool_call("hello", json!({"nm": "Bo"})),
            ],
        ),
        ChatMessage::assistant("all done"),
    ]);
    let mut agent = builder(&model)
        .tools([hello_tool(), named_tool("bash")])
        .build()
        .expect("agent");

    let reply = agent.run("do things").await.expect("reply");
    assert_eq!(reply.tool_calls, 3);
    assert_eq!(reply.round_trips, 2);

    let requests = model.requests().await;
    let results: Vec<String> = requests[1].messages[2..].iter().map(ChatMessage::content).collect();
    assert_eq!(results, ["Hello Ann!", "ran bash", "Hello Bo!"]);
}

#[tokio::test]
async fn signed_reasoning_rides_along_with_its_tool_calls() {
    let thinking = vec![ReasoningBlock::Thinking {
        thinking: "greet first".into(),
        signature: "sig-7".into(),
    }];
    let model = ScriptedModel::new(vec![
        greet("Joey").with_reasoning(thinking.clone()),
        ChatMessage::assistant("done"),
    ]);
    let mut agent = builder(&model).tool(hello_tool()).build().expect("agent");

    agent.run("greet Joey").await.expect("reply");

    let requests = model.requests().await;
    let replayed = &requests[1].messages[1];
    assert_eq!(replayed.role, MessageRole::Assistant);
    assert_eq!(replayed.reasoning, thinking);
    assert_eq!(replayed.tool_calls[0].name, "hello");
}

#[tokio::test]
async fn conversation_history_is_replayed_on_the_next_chat() {
    let model = ScriptedModel::new(vec![
        ChatMessage::assistant("Nice to meet you, Sam."),
        ChatMessage::assistant("Your name is Sam."),
    ]);
    let mut agent = builder(&model).memory_size(100).build().expect("agent");

    agent.chat("My name is Sam.").await;
    agent.chat("What is my name?").await;

    let requests = model.requests().await;
    let second: Vec<String> = requests[1].messages.iter().map(ChatMessage::content).collect();
    assert_eq!(
        second,
        ["My name is Sam.", "Nice to meet you, Sam.", "What is my name?"]
    );
}

#[tokio::test]
async fn near_capacity_memory_restarts_from_the_seed() {
    let replies = (0..30).map(|i| ChatMessage::assistant(format!("r{i}"))).collect();
    let model = ScriptedModel::new(replies);
    let mut agent = builder(&model)
        .memory_size(60)
        .context(vec!["project notes".into()])
        .build()
        .expect("agent");

    // Threshold is 60 - 50 = 10 turns: seed + 4 exchanges = 9, the 5th makes 11.
    for i in 0..5 {
        agent.chat(&format!("q{i}")).await;
    }
    assert_eq!(agent.memory().map(|m| m.len()), Some(11));

    agent.chat("q5").await;
    let requests = model.requests().await;
    let last = requests.last().expect("request");
    assert_eq!(last.messages.len(), 2);
    assert_eq!(last.messages[0].content(), "project notes");
    assert_eq!(agent.memory().map(|m| m.len()), Some(3));
}

#[tokio::test]
async fn provider_failures_become_error_outcomes() {
    let model = ScriptedModel::with_results(vec![Err(429)]);
    let mut agent = builder(&model).build().expect("agent");

    let outcome = agent.chat("hi").await;
    assert_eq!(
        outcome,
        ChatOutcome::failure("Provider 'scripted' is rate limiting requests.")
    );
}

#[tokio::test]
async fn cloned_agents_with_more_tools_diverge() {
    let model = ScriptedModel::new(vec![ChatMessage::assistant("ok"), ChatMessage::assistant("ok")]);
    let mut base = builder(&model).memory_size(100).tool(hello_tool()).build().expect("agent");
    let mut extended = base.add_tools([named_tool("eval")]);

    base.chat("one").await;
    extended.chat("two").await;

    assert_eq!(base.tool_names(), ["hello"]);
    assert_eq!(extended.tool_names(), ["hello", "eval"]);
    assert_eq!(base.memory().map(|m| m.len()), Some(2));
    assert_eq!(extended.memory().map(|m| m.len()), Some(2));

    let requests = model.requests().await;
    assert_eq!(requests[1].tools.len(), 2);
}
