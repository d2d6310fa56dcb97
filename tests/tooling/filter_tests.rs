// Tool filter tests - per-agent tool sets computed from the global catalog.

#[path = "../common/mod.rs"]
mod common;

use common::named_tool;
use orrery_core::config::RuntimeConfig;
use orrery_core::tooling::{ToolId, ToolRegistration, ToolSelection, filter_tools};

fn catalog() -> Vec<ToolRegistration> {
    vec![named_tool("eval"), named_tool("read_file"), named_tool("bash")]
}

fn names(tools: &[ToolRegistration]) -> Vec<&str> {
    tools.iter().map(|tool| tool.name.as_str()).collect()
}

#[test]
fn explicit_enable_minus_disable() {
    let tools = filter_tools(
        &catalog(),
        &ToolSelection::only(["eval", "read_file"]),
        &[ToolId::new("eval")],
    );
    assert_eq!(names(&tools), ["read_file"]);
}

#[test]
fn nothing_is_enabled_by_default() {
    assert!(filter_tools(&catalog(), &ToolSelection::default(), &[]).is_empty());
}

#[test]
fn all_keeps_catalog_order() {
    let tools = filter_tools(&catalog(), &ToolSelection::All, &[ToolId::new("bash")]);
    assert_eq!(names(&tools), ["eval", "read_file"]);
}

#[test]
fn unknown_ids_are_ignored() {
    let tools = filter_tools(&catalog(), &ToolSelection::only(["grep", "bash"]), &[]);
    assert_eq!(names(&tools), ["bash"]);
}

#[test]
fn kind_tags_take_precedence_over_names() {
    let catalog = vec![
        named_tool("Read File").with_kind(":read_file"),
        named_tool("shell").with_kind("bash"),
    ];
    let tools = filter_tools(&catalog, &ToolSelection::only(["read-file"]), &[]);
    assert_eq!(names(&tools), ["Read File"]);
}

#[test]
fn selections_read_from_configuration() {
    let config = RuntimeConfig::from_toml_str(
        r#"
        default_model = "openai/gpt-4o"
        [models."openai/gpt-4o"]

        [[agents]]
        id = "everything"
        enable_tools = ":all"
        disable_tools = [":bash"]

        [[agents]]
        id = "nothing"
        disable_tools = ["eval"]
        "#,
    )
    .expect("config");

    let everything = config.agent("everything").expect("agent");
    let tools = filter_tools(&catalog(), &everything.enable_tools, &everything.disable_tools);
    assert_eq!(names(&tools), ["eval", "read_file"]);

    let nothing = config.agent("nothing").expect("agent");
    assert!(filter_tools(&catalog(), &nothing.enable_tools, &nothing.disable_tools).is_empty());
}
