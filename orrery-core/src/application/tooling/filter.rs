use super::registration::ToolRegistration;
use crate::config::{ToolId, ToolSelection};
use std::collections::HashSet;

/// Compute an agent's tool set from the global catalog.
///
/// Nothing is enabled unless asked for. `disable` always wins over `enable`
/// for the same id. Catalog order is preserved.
pub fn filter_tools(
    all: &[ToolRegistration],
    enable: &ToolSelection,
    disable: &[ToolId],
) -> Vec<ToolRegistration> {
    let disabled: HashSet<&ToolId> = disable.iter().collect();
    let enabled: Option<HashSet<&ToolId>> = match enable {
        ToolSelection::None => return Vec::new(),
        ToolSelection::All => None,
        ToolSelection::Only(ids) => Some(ids.iter().collect()),
    };

    all.iter()
        .filter(|tool| {
            let id = tool.id();
            let wanted = enabled.as_ref().is_none_or(|ids| ids.contains(&id));
            wanted && !disabled.contains(&id)
        })
        .cloned()
        .collect()
}
