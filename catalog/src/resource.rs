use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Kind tag of a catalog resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    User,
    File,
    Acl,
    Other(String),
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::File => "file",
            ResourceKind::Acl => "acl",
            ResourceKind::Other(kind) => kind,
        }
    }
}

impl From<String> for ResourceKind {
    fn from(kind: String) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "user" => ResourceKind::User,
            "file" => ResourceKind::File,
            "acl" => ResourceKind::Acl,
            _ => ResourceKind::Other(kind.to_ascii_lowercase()),
        }
    }
}

impl From<&str> for ResourceKind {
    fn from(kind: &str) -> Self {
        ResourceKind::from(kind.to_string())
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ResourceKind {
    /// Capitalized type name, as used in resource references
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => Ok(()),
        }
    }
}

/// A resource declared in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResource {
    pub kind: ResourceKind,
    #[serde(alias = "title")]
    pub name: String,
    /// Filesystem path of `file` resources; the name is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CatalogResource {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            path: None,
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self::new(ResourceKind::User, name)
    }

    /// A file resource whose name is its path
    pub fn file(path: impl Into<String>) -> Self {
        Self::new(ResourceKind::File, path)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The path attribute, falling back to the name
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }

    pub fn to_ref(&self) -> ResourceRef {
        ResourceRef::new(self.kind.clone(), self.name.clone())
    }
}

/// Reference to a resource by kind and title, displayed as `User[alice]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub title: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.title)
    }
}

impl Serialize for ResourceRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Ordering edge: `source` must be applied before `target`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub source: ResourceRef,
    pub target: ResourceRef,
}

impl Relationship {
    pub fn new(source: ResourceRef, target: ResourceRef) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.source, self.target)
    }
}
