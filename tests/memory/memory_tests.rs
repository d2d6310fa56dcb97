// Memory tests - seeding, near-capacity resets and context updates.

use orrery_core::memory::Memory;
use orrery_core::types::{ChatMessage, ContentPart, MessageRole, ToolCall};

fn context(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn fill(memory: &mut Memory, turns: usize) {
    for i in 0..turns {
        if i % 2 == 0 {
            memory.push(ChatMessage::user(format!("q{i}")));
        } else {
            memory.push(ChatMessage::assistant(format!("a{i}")));
        }
    }
}

#[test]
fn seed_is_one_user_turn_with_one_part_per_string() {
    let memory = Memory::with_context(100, &context(&["README contents", "src/lib.rs contents"]));

    assert_eq!(memory.len(), 1);
    let seed = &memory.turns()[0];
    assert_eq!(seed.role, MessageRole::User);
    assert_eq!(
        seed.parts,
        vec![
            ContentPart::text("README contents"),
            ContentPart::text("src/lib.rs contents"),
        ]
    );
}

#[test]
fn empty_context_seeds_nothing() {
    let memory = Memory::with_context(100, &[]);
    assert!(memory.is_empty());
}

#[test]
fn no_reset_at_exactly_the_margin() {
    let ctx = context(&["ctx"]);
    let mut memory = Memory::with_context(100, &ctx);
    fill(&mut memory, 49);
    assert_eq!(memory.len(), 50);

    assert!(!memory.reset_if_near_capacity(&ctx));
    assert_eq!(memory.len(), 50);
}

#[test]
fn reset_one_past_the_margin_keeps_only_the_seed() {
    let ctx = context(&["ctx"]);
    let mut memory = Memory::with_context(100, &ctx);
    fill(&mut memory, 50);
    assert_eq!(memory.len(), 51);

    assert!(memory.reset_if_near_capacity(&ctx));
    assert_eq!(memory.len(), 1);
    assert_eq!(memory.turns()[0].content(), "ctx");
}

#[test]
fn reset_uses_the_context_it_is_given() {
    let mut memory = Memory::with_context(60, &context(&["old"]));
    fill(&mut memory, 20);

    assert!(memory.reset_if_near_capacity(&context(&["new", "er"])));
    assert_eq!(memory.context(), ["new".to_string(), "er".to_string()]);
    assert_eq!(memory.turns()[0].content(), "new\n\ner");
}

#[test]
fn small_capacities_reset_on_every_check() {
    let ctx = context(&["seed"]);
    let mut memory = Memory::with_context(10, &ctx);
    assert!(memory.reset_if_near_capacity(&ctx));
    assert_eq!(memory.len(), 1);

    let mut empty = Memory::new(10);
    assert!(!empty.reset_if_near_capacity(&[]));
}

#[test]
fn reseed_replaces_everything() {
    let mut memory = Memory::with_context(100, &context(&["a"]));
    fill(&mut memory, 6);

    memory.reseed(&context(&["b", "c"]));
    assert_eq!(memory.len(), 1);
    assert_eq!(memory.turns()[0].parts.len(), 2);

    memory.reseed(&[]);
    assert!(memory.is_empty());
    assert!(memory.context().is_empty());
}

#[test]
fn overflow_evicts_oldest_turns_but_keeps_the_seed() {
    let mut memory = Memory::with_context(4, &context(&["seed"]));
    fill(&mut memory, 5);

    assert_eq!(memory.len(), 4);
    let contents: Vec<String> = memory.turns().iter().map(ChatMessage::content).collect();
    assert_eq!(contents, ["seed", "q2", "a3", "q4"]);
}

#[test]
fn overflow_never_leaves_an_orphaned_tool_result_first() {
    let call = ToolCall::new("c1", "hello", "{}");
    let mut memory = Memory::new(3);
    memory.extend([
        ChatMessage::user("greet"),
        ChatMessage::assistant_with_tool_calls("", vec![call.clone()]),
        ChatMessage::tool_result(&call, "Hello!"),
        ChatMessage::assistant("done"),
    ]);

    // The assistant turn that issued the call is evicted, so its result goes too.
    memory.push(ChatMessage::user("next"));
    let roles: Vec<MessageRole> = memory.turns().iter().map(|turn| turn.role).collect();
    assert_eq!(roles, [MessageRole::Assistant, MessageRole::User]);
}
