//! Tool identity and the enable/disable selection surface.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical tool id.
///
/// Symbolic (`":read_file"`), dashed (`"read-file"`) and display (`"Read File"`)
/// spellings all normalise to the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ToolId(String);

impl ToolId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let mut id = String::new();
        for c in raw.as_ref().trim().trim_start_matches(':').chars() {
            if c.is_whitespace() || c == '-' {
                if !id.ends_with('_') {
                    id.push('_');
                }
            } else {
                id.extend(c.to_lowercase());
            }
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ToolId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ToolId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<ToolId> for String {
    fn from(value: ToolId) -> Self {
        value.0
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which tools an agent opts into.
///
/// ```toml
/// enable_tools = "all"                  # everything in the catalog
/// enable_tools = ["eval", ":read_file"] # an explicit list
/// # absent                              # no tools at all
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawToolSelection")]
pub enum ToolSelection {
    #[default]
    None,
    All,
    Only(Vec<ToolId>),
}

impl ToolSelection {
    pub fn only<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ToolId>,
    {
        Self::Only(ids.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawToolSelection {
    Keyword(String),
    List(Vec<String>),
}

impl From<RawToolSelection> for ToolSelection {
    fn from(value: RawToolSelection) -> Self {
        match value {
            RawToolSelection::Keyword(keyword) => {
                let id = ToolId::new(keyword);
                if id.as_str() == "all" {
                    ToolSelection::All
                } else {
                    ToolSelection::Only(vec![id])
                }
            }
            RawToolSelection::List(ids) => {
                ToolSelection::Only(ids.into_iter().map(ToolId::new).collect())
            }
        }
    }
}
