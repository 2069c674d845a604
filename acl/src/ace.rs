use crate::values::{AceType, Affects, ChildTypes, Right};
use crate::{AclError, Result};
use fields::{Field, FieldCollection, FieldType, FieldValue};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Field table for a single permission record
static ACE_FIELDS: Lazy<FieldCollection> = Lazy::new(|| {
    FieldCollection::new(vec![
        Field::new("identity", FieldType::Text, "Identity")
            .with_description("Account name, Domain\\Account or SID the entry applies to"),
        Field::new("rights", FieldType::EnumList, "Rights").with_allowed_values(Right::names()),
        Field::new("type", FieldType::Enum, "Type")
            .with_allowed_values(AceType::names())
            .with_default(FieldValue::Text(AceType::default().as_str().to_string())),
        Field::new("child_types", FieldType::Enum, "Child Types")
            .with_allowed_values(ChildTypes::names())
            .with_default(FieldValue::Text(ChildTypes::default().as_str().to_string())),
        Field::new("affects", FieldType::Enum, "Affects")
            .with_allowed_values(Affects::names())
            .with_default(FieldValue::Text(Affects::default().as_str().to_string())),
    ])
});

/// Canonical access control entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ace {
    pub identity: String,
    pub rights: Vec<Right>,
    #[serde(rename = "type", default)]
    pub ace_type: AceType,
    #[serde(default)]
    pub child_types: ChildTypes,
    #[serde(default)]
    pub affects: Affects,
}

impl Ace {
    /// Normalize one raw permission record.
    ///
    /// Defaults are applied to `type`, `child_types` and `affects` when they
    /// are absent or null. Duplicate rights are collapsed, keeping the first
    /// occurrence.
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        let record = value.as_object().ok_or_else(|| {
            AclError::InvalidValue(format!(
                "Value for permissions should be a hash with identity and rights, got {}",
                value
            ))
        })?;

        let values = ACE_FIELDS.validate_record(record).map_err(|err| match err {
            fields::FieldsError::NotFound(key) => AclError::InvalidValue(format!(
                "Invalid permission key {:?}. Valid keys are {}",
                key,
                ACE_FIELDS
                    .fields()
                    .iter()
                    .map(|f| f.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            other => AclError::from(other),
        })?;

        let identity = text(&values, "identity")?.to_string();

        let raw_rights = values
            .get("rights")
            .and_then(FieldValue::as_list)
            .ok_or_else(|| AclError::InvalidValue("A non-empty rights must be provided".into()))?;
        let mut rights: Vec<Right> = Vec::with_capacity(raw_rights.len());
        for raw in raw_rights {
            let right = raw.parse::<Right>()?;
            if !rights.contains(&right) {
                rights.push(right);
            }
        }

        let ace = Self {
            identity,
            rights,
            ace_type: text(&values, "type")?.parse()?,
            child_types: text(&values, "child_types")?.parse()?,
            affects: text(&values, "affects")?.parse()?,
        };

        ace.warn_redundant_rights();
        debug!("Normalized permission {}", ace);

        Ok(ace)
    }

    pub fn is_deny(&self) -> bool {
        self.ace_type == AceType::Deny
    }

    /// `full` and `modify` already include the narrower rights
    fn warn_redundant_rights(&self) {
        if self.rights.len() < 2 {
            return;
        }

        if self.rights.contains(&Right::Full) {
            warn!(
                "In permission for '{}', 'full' already includes all other rights; the others are redundant",
                self.identity
            );
        } else if self.rights.contains(&Right::Modify)
            && self.rights.iter().any(|r| {
                matches!(r, Right::Read | Right::Write | Right::Execute | Right::List)
            })
        {
            warn!(
                "In permission for '{}', 'modify' already includes read, write, list and execute",
                self.identity
            );
        }
    }
}

fn text<'a>(values: &'a HashMap<String, FieldValue>, id: &str) -> Result<&'a str> {
    values
        .get(id)
        .and_then(FieldValue::as_str)
        .ok_or_else(|| AclError::InvalidValue(format!("A non-empty {} must be provided", id)))
}

impl fmt::Display for Ace {
    /// Manifest-style rendering; attributes holding their default are left out
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rights = self
            .rights
            .iter()
            .map(|r| format!("\"{}\"", r))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "{{ identity => '{}', rights => [{}]",
            self.identity, rights
        )?;
        if self.ace_type != AceType::default() {
            write!(f, ", type => '{}'", self.ace_type)?;
        }
        if self.child_types != ChildTypes::default() {
            write!(f, ", child_types => '{}'", self.child_types)?;
        }
        if self.affects != Affects::default() {
            write!(f, ", affects => '{}'", self.affects)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: JsonValue) -> Result<Ace> {
        Ace::from_value(&value)
    }

    fn err_message(value: JsonValue) -> String {
        let err = parse(value).unwrap_err();
        assert!(err.is_invalid_value(), "expected invalid value, got {:?}", err);
        err.to_string()
    }

    #[test]
    fn test_field_table_is_well_formed() {
        for field in ACE_FIELDS.fields() {
            assert!(field.validate().is_ok(), "bad field {}", field.id);
        }
    }

    #[test]
    fn test_accepts_identity_forms() {
        for identity in ["bob", "Domain\\Bob", "S-1-5-32-544"] {
            let ace = parse(json!({"identity": identity, "rights": ["full"]})).unwrap();
            assert_eq!(ace.identity, identity);
        }
    }

    #[test]
    fn test_rejects_missing_identity() {
        assert_eq!(
            err_message(json!({"rights": ["full"]})),
            "A non-empty identity must be provided"
        );
        assert_eq!(
            err_message(json!({"identity": null, "rights": ["full"]})),
            "A non-empty identity must be provided"
        );
        assert_eq!(
            err_message(json!({"identity": "", "rights": ["full"]})),
            "A non-empty identity must be provided"
        );
    }

    #[test]
    fn test_accepts_each_right() {
        for right in Right::ALL {
            let ace = parse(json!({"identity": "bob", "rights": [right.as_str()]})).unwrap();
            assert_eq!(ace.rights, vec![*right]);
        }
    }

    #[test]
    fn test_accepts_combined_rights_in_order() {
        let ace = parse(json!({"identity": "bob", "rights": ["read", "execute"]})).unwrap();
        assert_eq!(ace.rights, vec![Right::Read, Right::Execute]);
    }

    #[test]
    fn test_collapses_duplicate_rights() {
        let ace = parse(json!({"identity": "bob", "rights": ["read", "write", "read"]})).unwrap();
        assert_eq!(ace.rights, vec![Right::Read, Right::Write]);
    }

    #[test]
    fn test_rejects_invalid_rights() {
        assert!(err_message(json!({"identity": "bob", "rights": ["what"]}))
            .starts_with("Invalid value \"what\". Valid values are"));
        assert!(
            err_message(json!({"identity": "bob", "rights": ["modify", "what"]}))
                .starts_with("Invalid value \"what\". Valid values are")
        );
        assert_eq!(
            err_message(json!({"identity": "bob", "rights": "read"})),
            "Value for rights should be an array. Perhaps try ['read']?"
        );
        assert_eq!(
            err_message(json!({"identity": "bob"})),
            "A non-empty rights must be provided"
        );
        assert_eq!(
            err_message(json!({"identity": "bob", "rights": null})),
            "A non-empty rights must be provided"
        );
        assert_eq!(
            err_message(json!({"identity": "bob", "rights": []})),
            "Value for rights should have at least one element in the array"
        );
    }

    #[test]
    fn test_defaults_when_omitted_or_null() {
        let omitted = parse(json!({"identity": "bob", "rights": ["full"]})).unwrap();
        assert_eq!(omitted.ace_type, AceType::Allow);
        assert_eq!(omitted.child_types, ChildTypes::All);
        assert_eq!(omitted.affects, Affects::All);

        let nulls = parse(json!({
            "identity": "bob",
            "rights": ["full"],
            "type": null,
            "child_types": null,
            "affects": null
        }))
        .unwrap();
        assert_eq!(nulls, omitted);
    }

    #[test]
    fn test_accepts_explicit_enumerations() {
        let ace = parse(json!({
            "identity": "bob",
            "rights": ["full"],
            "type": "deny",
            "child_types": "containers",
            "affects": "direct_children_only"
        }))
        .unwrap();
        assert!(ace.is_deny());
        assert_eq!(ace.child_types, ChildTypes::Containers);
        assert_eq!(ace.affects, Affects::DirectChildrenOnly);
    }

    #[test]
    fn test_rejects_empty_and_unknown_enumerations() {
        for key in ["type", "child_types", "affects"] {
            let mut record = json!({"identity": "bob", "rights": ["full"]});
            record[key] = json!("");
            assert!(err_message(record.clone()).starts_with("Invalid value \"\". Valid values are"));

            record[key] = json!("what");
            assert!(err_message(record).starts_with("Invalid value \"what\". Valid values are"));
        }
    }

    #[test]
    fn test_rejects_unknown_keys_and_non_records() {
        assert!(
            err_message(json!({"identity": "bob", "rights": ["full"], "mask": "2032127"}))
                .starts_with("Invalid permission key \"mask\"")
        );
        assert!(err_message(json!("bob")).starts_with("Value for permissions should be a hash"));
    }

    #[test]
    fn test_display_omits_defaults() {
        let ace = Ace {
            identity: "bob".to_string(),
            rights: vec![Right::Read, Right::Execute],
            ace_type: AceType::Allow,
            child_types: ChildTypes::All,
            affects: Affects::All,
        };
        assert_eq!(
            ace.to_string(),
            "{ identity => 'bob', rights => [\"read\", \"execute\"] }"
        );

        let deny = Ace {
            identity: "tim".to_string(),
            rights: vec![Right::Full],
            ace_type: AceType::Deny,
            child_types: ChildTypes::All,
            affects: Affects::SelfOnly,
        };
        assert_eq!(
            deny.to_string(),
            "{ identity => 'tim', rights => [\"full\"], type => 'deny', affects => 'self_only' }"
        );
    }
}
