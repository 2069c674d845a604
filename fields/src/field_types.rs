use serde::{Deserialize, Serialize};

const BOOLEAN_VALUES: &[&str] = &["true", "false"];

/// Field types supported by the validation engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free-form string that must not be empty
    Text,
    /// One value out of a fixed set
    Enum,
    Boolean,
    /// Non-empty array whose elements all come from a fixed set
    EnumList,
}

/// A value that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Field definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    /// Null is rejected as a missing value rather than treated as empty
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
    /// Value used when the field is assigned null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,
}

impl Field {
    /// Create a new field with minimal configuration
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            required: false,
            description: None,
            allowed_values: Vec::new(),
            default: None,
        }
    }

    /// Set the field as required
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the field description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the valid values for enumerated fields
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set the value applied when the field is assigned null
    pub fn with_default(mut self, default: FieldValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Valid values for this field, in declaration order
    pub fn valid_values(&self) -> Vec<&str> {
        match self.field_type {
            FieldType::Boolean => BOOLEAN_VALUES.to_vec(),
            _ => self.allowed_values.iter().map(String::as_str).collect(),
        }
    }

    /// Check whether a raw string is one of the valid values
    pub fn accepts(&self, value: &str) -> bool {
        self.valid_values().contains(&value)
    }

    /// Validate the field configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("Field ID cannot be empty".to_string());
        }

        if self.label.is_empty() {
            return Err(format!("Field '{}' label cannot be empty", self.id));
        }

        if matches!(self.field_type, FieldType::Enum | FieldType::EnumList)
            && self.allowed_values.is_empty()
        {
            return Err(format!(
                "Field '{}' is enumerated but has no allowed values",
                self.id
            ));
        }

        if let Some(default) = &self.default {
            let ok = match (self.field_type, default) {
                (FieldType::Text, FieldValue::Text(s)) => !s.is_empty(),
                (FieldType::Enum, FieldValue::Text(s)) => self.accepts(s),
                (FieldType::Boolean, FieldValue::Bool(_)) => true,
                (FieldType::EnumList, FieldValue::List(items)) => {
                    !items.is_empty() && items.iter().all(|i| self.accepts(i))
                }
                _ => false,
            };
            if !ok {
                return Err(format!(
                    "Field '{}' has a default that is not a valid value",
                    self.id
                ));
            }
        }

        Ok(())
    }
}
