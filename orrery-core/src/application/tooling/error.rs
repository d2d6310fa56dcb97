use thiserror::Error;

/// Error a tool handler reports by returning `Err` instead of completing its callback.
pub type ToolHandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A declared tool schema that falls outside the supported subset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolSchemaError {
    #[error("tool schema must describe an object, found type '{found}'")]
    NotAnObject { found: String },
    #[error("property '{property}' does not declare a type")]
    MissingType { property: String },
    #[error("property '{property}' has unsupported type '{kind}'")]
    UnsupportedType { property: String, kind: String },
    #[error("property '{property}' is malformed: {reason}")]
    Malformed { property: String, reason: String },
    #[error("required property '{property}' is not declared")]
    UnknownRequired { property: String },
}
