use crate::permissions::parse_permissions;
use crate::values::TargetType;
use crate::{Ace, AclError, Result};
use catalog::{Catalog, Relationship, ResourceKind, ResourceRef};
use fields::{Field, FieldCollection, FieldType, FieldValue};
use once_cell::sync::Lazy;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

/// Built-in Administrators group
pub const DEFAULT_OWNER: &str = "S-1-5-32-544";

/// Attributes accepted by an ACL resource, in the order they are applied
pub const ATTRIBUTES: &[&str] = &[
    "name",
    "target",
    "target_type",
    "purge",
    "owner",
    "inherit_parent_permissions",
    "permissions",
];

static RESOURCE_FIELDS: Lazy<FieldCollection> = Lazy::new(|| {
    FieldCollection::new(vec![
        Field::new("name", FieldType::Text, "Name").required(true),
        Field::new("target", FieldType::Text, "Target")
            .required(true)
            .with_description("Path the ACL applies to; defaults to the name"),
        Field::new("target_type", FieldType::Enum, "Target Type")
            .with_allowed_values(TargetType::names())
            .with_default(FieldValue::Text(TargetType::default().as_str().to_string())),
        Field::new("purge", FieldType::Boolean, "Purge")
            .with_description("Remove entries that are not declared"),
        Field::new("owner", FieldType::Text, "Owner").required(true),
        Field::new(
            "inherit_parent_permissions",
            FieldType::Boolean,
            "Inherit Parent Permissions",
        )
        .with_default(FieldValue::Bool(true)),
    ])
});

/// Declared ACL state of one filesystem object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclResource {
    name: String,
    target: String,
    target_type: TargetType,
    purge: Option<bool>,
    owner: String,
    inherit_parent_permissions: bool,
    permissions: Vec<Ace>,
}

impl AclResource {
    /// Create a resource with every other attribute at its default.
    ///
    /// The permission list starts empty; see [`AclResource::ensure_complete`].
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut resource = Self {
            name: String::new(),
            target: String::new(),
            target_type: TargetType::default(),
            purge: None,
            owner: DEFAULT_OWNER.to_string(),
            inherit_parent_permissions: true,
            permissions: Vec::new(),
        };
        resource.set("name", &JsonValue::String(name))?;
        resource.target = resource.name.clone();
        Ok(resource)
    }

    /// Build a complete resource from a raw attribute map
    pub fn from_attributes(attributes: &Map<String, JsonValue>) -> Result<Self> {
        if let Some(unknown) = attributes
            .keys()
            .find(|key| !ATTRIBUTES.contains(&key.as_str()))
        {
            return Err(AclError::UnknownAttribute(unknown.clone()));
        }

        let name = match attributes.get("name") {
            None | Some(JsonValue::Null) => {
                return Err(AclError::MissingValue("name".to_string()))
            }
            Some(JsonValue::String(name)) => name.clone(),
            Some(other) => {
                return Err(AclError::InvalidValue(format!(
                    "Value for name should be a string, got {}",
                    other
                )))
            }
        };

        let mut resource = Self::new(name)?;
        for attr in ATTRIBUTES.iter().skip(1) {
            if let Some(value) = attributes.get(*attr) {
                resource.set(attr, value)?;
            }
        }

        resource.ensure_complete()?;
        Ok(resource)
    }

    /// Assign one attribute.
    ///
    /// The value is fully validated before anything is stored, so a rejected
    /// assignment leaves the previous value in place.
    pub fn set(&mut self, attr: &str, value: &JsonValue) -> Result<()> {
        if attr == "permissions" {
            self.permissions = parse_permissions(value)?;
            debug!(
                "Set permissions on Acl[{}] ({} entries)",
                self.name,
                self.permissions.len()
            );
            return Ok(());
        }

        let validated = RESOURCE_FIELDS.validate(attr, value)?;
        match (attr, validated) {
            ("name", Some(FieldValue::Text(name))) => self.name = name,
            ("target", Some(FieldValue::Text(target))) => self.target = target,
            ("target_type", Some(FieldValue::Text(kind))) => self.target_type = kind.parse()?,
            ("purge", purge) => self.purge = purge.and_then(|v| v.as_bool()),
            ("owner", Some(FieldValue::Text(owner))) => self.owner = owner,
            ("inherit_parent_permissions", Some(FieldValue::Bool(inherit))) => {
                self.inherit_parent_permissions = inherit
            }
            (attr, other) => {
                return Err(AclError::InvalidValue(format!(
                    "Attribute table out of sync: no handler for {} = {:?}",
                    attr, other
                )))
            }
        }

        debug!("Set {} on Acl[{}] to {}", attr, self.name, value);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts as the name given at construction; renaming does not move it
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    pub fn purge(&self) -> Option<bool> {
        self.purge
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn inherit_parent_permissions(&self) -> bool {
        self.inherit_parent_permissions
    }

    pub fn permissions(&self) -> &[Ace] {
        &self.permissions
    }

    /// Check the resource can be handed to an enforcement backend
    pub fn ensure_complete(&self) -> Result<()> {
        if self.permissions.is_empty() {
            return Err(AclError::MissingValue("permissions".to_string()));
        }
        Ok(())
    }

    /// Owner followed by every entry identity, without repeats
    pub fn identities(&self) -> Vec<&str> {
        let mut identities: Vec<&str> = Vec::with_capacity(self.permissions.len() + 1);
        let all = std::iter::once(self.owner.as_str())
            .chain(self.permissions.iter().map(|ace| ace.identity.as_str()));
        for identity in all {
            if !identities.contains(&identity) {
                identities.push(identity);
            }
        }
        identities
    }

    pub fn to_ref(&self) -> ResourceRef {
        ResourceRef::new(ResourceKind::Acl, self.name.clone())
    }

    /// Ordering edges from the catalog resources this ACL refers to
    pub fn autorequire(&self, catalog: &dyn Catalog) -> Vec<Relationship> {
        crate::autorequire::autorequire(self, catalog)
    }
}

impl Serialize for AclResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AclResource", 7)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("target", &self.target)?;
        state.serialize_field("target_type", &self.target_type)?;
        state.serialize_field("purge", &self.purge)?;
        state.serialize_field("owner", &self.owner)?;
        state.serialize_field(
            "inherit_parent_permissions",
            &self.inherit_parent_permissions,
        )?;
        state.serialize_field("permissions", &self.permissions)?;
        state.end()
    }
}
