//! Read-only view of the resources managed in one run.
//!
//! The autorequire engine consults a [`Catalog`] to find the users and files
//! an ACL refers to. [`ResourceCatalog`] is the in-memory implementation used
//! by the CLI and the tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

pub mod error;
pub mod resource;

pub use error::{CatalogError, Result};
pub use resource::{CatalogResource, Relationship, ResourceKind, ResourceRef};

/// Source of the resources known in the current run
pub trait Catalog: Send + Sync {
    /// All resources, in insertion order
    fn resources(&self) -> Box<dyn Iterator<Item = &CatalogResource> + '_>;

    /// Resources of one kind, in insertion order
    fn resources_of_kind(
        &self,
        kind: ResourceKind,
    ) -> Box<dyn Iterator<Item = &CatalogResource> + '_> {
        Box::new(self.resources().filter(move |r| r.kind == kind))
    }

    /// Look up a resource by kind and exact name
    fn find(&self, kind: &ResourceKind, name: &str) -> Option<&CatalogResource> {
        self.resources().find(|r| &r.kind == kind && r.name == name)
    }
}

/// On-disk catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub resources: Vec<CatalogResource>,
}

/// In-memory catalog with a `(kind, name)` index
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    resources: Vec<CatalogResource>,
    index: HashMap<(ResourceKind, String), usize>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource; a second resource with the same kind and name is rejected
    pub fn add_resource(&mut self, resource: CatalogResource) -> Result<()> {
        let key = (resource.kind.clone(), resource.name.clone());
        if self.index.contains_key(&key) {
            return Err(CatalogError::DuplicateResource(
                resource.to_ref().to_string(),
            ));
        }

        debug!("Adding {} to catalog", resource.to_ref());
        self.index.insert(key, self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Parse a catalog document from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        let document: CatalogDocument = serde_yaml::from_str(content)?;
        let mut catalog = Self::new();
        for resource in document.resources {
            catalog.add_resource(resource)?;
        }
        Ok(catalog)
    }

    /// Load a catalog document from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading catalog from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_yaml(&content)?;
        info!("Loaded {} catalog resources from {:?}", catalog.len(), path);
        Ok(catalog)
    }
}

impl Catalog for ResourceCatalog {
    fn resources(&self) -> Box<dyn Iterator<Item = &CatalogResource> + '_> {
        Box::new(self.resources.iter())
    }

    fn find(&self, kind: &ResourceKind, name: &str) -> Option<&CatalogResource> {
        self.index
            .get(&(kind.clone(), name.to_string()))
            .map(|&i| &self.resources[i])
    }
}
