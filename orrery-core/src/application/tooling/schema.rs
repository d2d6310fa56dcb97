//! # Tool parameter schemas
//!
//! Hosts describe tool parameters in a small neutral form: an object with
//! named, typed properties and a `required` list. [`ToolSchema::to_parameters`]
//! translates that form into the [`ParameterSchema`] the model protocol
//! consumes. Translation is pure and cannot fail; everything that could go
//! wrong is rejected earlier by [`ToolSchema::from_value`] or made
//! unrepresentable by the builder API.

use super::error::ToolSchemaError;
use crate::infrastructure::model::ParameterSchema;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    /// Element type; `None` means strings.
    Array(Option<Box<PropertyType>>),
    Object(ToolSchema),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub name: String,
    pub kind: PropertyType,
    pub description: Option<String>,
    /// Allowed values for string properties.
    pub allowed: Vec<String>,
}

impl PropertySchema {
    pub fn new(name: impl Into<String>, kind: PropertyType) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            allowed: Vec::new(),
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Object-typed parameter description for one tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSchema {
    properties: Vec<PropertySchema>,
    required: Vec<String>,
}

impl ToolSchema {
    /// Object with no properties.
    pub fn object() -> Self {
        Self::default()
    }

    /// Add an optional property.
    pub fn property(mut self, property: PropertySchema) -> Self {
        self.properties.retain(|p| p.name != property.name);
        self.properties.push(property);
        self
    }

    /// Add a property and mark it required.
    pub fn required(mut self, property: PropertySchema) -> Self {
        let name = property.name.clone();
        self = self.property(property);
        if !self.required.contains(&name) {
            self.required.push(name);
        }
        self
    }

    pub fn properties(&self) -> &[PropertySchema] {
        &self.properties
    }

    pub fn required_names(&self) -> &[String] {
        &self.required
    }

    /// Parse the neutral JSON form:
    /// `{"type": "object", "properties": {...}, "required": [...]}`.
    pub fn from_value(value: &Value) -> Result<Self, ToolSchemaError> {
        parse_object("<root>", value)
    }

    /// Translate into the model protocol's parameter representation.
    pub fn to_parameters(&self) -> ParameterSchema {
        self.to_parameter_schema(None)
    }

    fn to_parameter_schema(&self, description: Option<String>) -> ParameterSchema {
        let properties: BTreeMap<String, ParameterSchema> = self
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.to_parameter_schema()))
            .collect();
        ParameterSchema::Object {
            description,
            properties,
            required: self.required.clone(),
        }
    }
}

impl PropertySchema {
    fn to_parameter_schema(&self) -> ParameterSchema {
        translate(&self.kind, self.description.clone(), &self.allowed)
    }
}

fn translate(kind: &PropertyType, description: Option<String>, allowed: &[String]) -> ParameterSchema {
    match kind {
        PropertyType::String => ParameterSchema::String {
            description,
            allowed: allowed.to_vec(),
        },
        PropertyType::Integer => ParameterSchema::Integer { description },
        PropertyType::Number => ParameterSchema::Number { description },
        PropertyType::Boolean => ParameterSchema::Boolean { description },
        PropertyType::Array(items) => ParameterSchema::Array {
            description,
            items: items
                .as_ref()
                .map(|items| Box::new(translate(items, None, &[]))),
        },
        PropertyType::Object(schema) => schema.to_parameter_schema(description),
    }
}

fn parse_object(scope: &str, value: &Value) -> Result<ToolSchema, ToolSchemaError> {
    let map = value.as_object().ok_or_else(|| ToolSchemaError::NotAnObject {
        found: json_kind(value).to_string(),
    })?;

    if let Some(kind) = map.get("type") {
        if kind.as_str() != Some("object") {
            return Err(ToolSchemaError::NotAnObject {
                found: kind.as_str().unwrap_or_else(|| json_kind(kind)).to_string(),
            });
        }
    }

    let mut schema = ToolSchema::object();
    if let Some(properties) = map.get("properties") {
        let properties = properties
            .as_object()
            .ok_or_else(|| ToolSchemaError::Malformed {
                property: scope.to_string(),
                reason: "'properties' must be an object".into(),
            })?;
        for (name, spec) in properties {
            schema.properties.push(parse_property(name, spec)?);
        }
    }

    if let Some(required) = map.get("required") {
        let required = required.as_array().ok_or_else(|| ToolSchemaError::Malformed {
            property: scope.to_string(),
            reason: "'required' must be a list".into(),
        })?;
        for name in required {
            let name = name.as_str().ok_or_else(|| ToolSchemaError::Malformed {
                property: scope.to_string(),
                reason: "'required' entries must be strings".into(),
            })?;
            if !schema.properties.iter().any(|p| p.name == name) {
                return Err(ToolSchemaError::UnknownRequired {
                    property: name.to_string(),
                });
            }
            if !schema.required.iter().any(|r| r == name) {
                schema.required.push(name.to_string());
            }
        }
    }

    Ok(schema)
}

fn parse_property(name: &str, spec: &Value) -> Result<PropertySchema, ToolSchemaError> {
    let map = spec.as_object().ok_or_else(|| ToolSchemaError::Malformed {
        property: name.to_string(),
        reason: "property description must be an object".into(),
    })?;

    let kind = parse_type(name, map)?;
    let description = map
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);
    let allowed = match map.get("enum") {
        None => Vec::new(),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect(),
        Some(_) => {
            return Err(ToolSchemaError::Malformed {
                property: name.to_string(),
                reason: "'enum' must be a list".into(),
            });
        }
    };

    Ok(PropertySchema {
        name: name.to_string(),
        kind,
        description,
        allowed,
    })
}

fn parse_type(name: &str, map: &Map<String, Value>) -> Result<PropertyType, ToolSchemaError> {
    let kind = map
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ToolSchemaError::MissingType {
            property: name.to_string(),
        })?;

    match kind {
        "string" => Ok(PropertyType::String),
        "integer" => Ok(PropertyType::Integer),
        "number" => Ok(PropertyType::Number),
        "boolean" => Ok(PropertyType::Boolean),
        "array" => match map.get("items") {
            None => Ok(PropertyType::Array(None)),
            Some(Value::Object(items)) => {
                let item_name = format!("{name}[]");
                Ok(PropertyType::Array(Some(Box::new(parse_type(&item_name, items)?))))
            }
            Some(_) => Err(ToolSchemaError::Malformed {
                property: name.to_string(),
                reason: "'items' must be an object".into(),
            }),
        },
        "object" => {
            let nested = parse_object(name, &Value::Object(map.clone()))?;
            Ok(PropertyType::Object(nested))
        }
        other => Err(ToolSchemaError::UnsupportedType {
            property: name.to_string(),
            kind: other.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
