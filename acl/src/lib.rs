//! Declarative model of a Windows ACL resource.
//!
//! An [`AclResource`] is built from a raw attribute map, validating every
//! attribute as it is assigned. Its permissions are normalized into
//! [`Ace`] values, and [`autorequire`] derives the ordering edges to the
//! users and files it references in a [`catalog::Catalog`].

pub mod ace;
pub mod autorequire;
pub mod error;
pub mod manifest_loader;
pub mod permissions;
pub mod resource;
pub mod values;

pub use ace::Ace;
pub use autorequire::{autorequire, normalize_path};
pub use error::{AclError, Result};
pub use manifest_loader::{ManifestLoader, ManifestReport};
pub use permissions::parse_permissions;
pub use resource::{AclResource, ATTRIBUTES, DEFAULT_OWNER};
pub use values::{AceType, Affects, ChildTypes, Right, TargetType};

// Re-export the catalog types used in autorequire signatures
pub use catalog::{Catalog, Relationship, ResourceRef};
