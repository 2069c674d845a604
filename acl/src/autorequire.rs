//! Ordering edges between an ACL and the users and files it refers to.
//!
//! Identities are matched against `user` resources by exact name. No attempt
//! is made to resolve a SID such as `S-1-5-32-544` to an account name like
//! `Administrators` or `BUILTIN\Administrators`: that needs the platform
//! security APIs, so such owners only match a user declared under the SID
//! itself.
//!
//! For file targets the path comparison ignores case and slash direction,
//! but must otherwise be exact. A file resource for a parent directory is
//! not a match.

use crate::values::TargetType;
use crate::AclResource;
use catalog::{Catalog, Relationship, ResourceKind, ResourceRef};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Compute the resources that must be applied before `resource`.
///
/// Never fails; an empty list means nothing in the catalog matched. Each
/// source appears at most once.
pub fn autorequire(resource: &AclResource, catalog: &dyn Catalog) -> Vec<Relationship> {
    let this = resource.to_ref();
    let mut seen: HashSet<ResourceRef> = HashSet::new();
    let mut edges = Vec::new();

    let mut require = |source: ResourceRef| {
        if seen.insert(source.clone()) {
            edges.push(Relationship::new(source, this.clone()));
        }
    };

    for identity in resource.identities() {
        match catalog.find(&ResourceKind::User, identity) {
            Some(user) => require(user.to_ref()),
            None => trace!("No user in catalog for identity '{}'", identity),
        }
    }

    if resource.target_type() == TargetType::File {
        let target = normalize_path(resource.target());
        for file in catalog.resources_of_kind(ResourceKind::File) {
            if normalize_path(file.path()) == target {
                require(file.to_ref());
            }
        }
    }

    debug!(
        "Autorequire for {} found {} relationship(s)",
        resource.to_ref(),
        edges.len()
    );
    edges
}

/// ASCII-lowercase a path and turn backslashes into forward slashes
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{CatalogResource, ResourceCatalog};
    use serde_json::json;

    fn acl() -> AclResource {
        AclResource::new("acl").unwrap()
    }

    fn catalog_with(resources: Vec<CatalogResource>) -> ResourceCatalog {
        let mut catalog = ResourceCatalog::new();
        for resource in resources {
            catalog.add_resource(resource).unwrap();
        }
        catalog
    }

    fn assert_single_edge(resource: &AclResource, catalog: &ResourceCatalog, source: &str) {
        let edges = autorequire(resource, catalog);
        assert_eq!(edges.len(), 1, "edges: {:?}", edges);
        assert_eq!(edges[0].source.to_string(), source);
        assert_eq!(edges[0].target, resource.to_ref());
    }

    #[test]
    fn test_autorequires_owner() {
        let resource = acl();
        let catalog = catalog_with(vec![CatalogResource::user(resource.owner())]);
        assert_single_edge(&resource, &catalog, "User[S-1-5-32-544]");
    }

    #[test]
    fn test_does_not_resolve_default_owner_sid() {
        let resource = acl();
        for name in ["Administrators", "BUILTIN\\Administrators"] {
            let catalog = catalog_with(vec![CatalogResource::user(name)]);
            assert!(autorequire(&resource, &catalog).is_empty());
        }
    }

    #[test]
    fn test_autorequires_owner_by_name() {
        let mut resource = acl();
        resource.set("owner", &json!("alice")).unwrap();
        let catalog = catalog_with(vec![CatalogResource::user("alice")]);
        assert_single_edge(&resource, &catalog, "User[alice]");
    }

    #[test]
    fn test_autorequires_permission_identities() {
        let mut resource = acl();
        resource
            .set(
                "permissions",
                &json!([
                    {"identity": "bill", "rights": ["modify"]},
                    {"identity": "bob", "rights": ["full"]}
                ]),
            )
            .unwrap();
        let catalog = catalog_with(vec![CatalogResource::user("bob")]);
        assert_single_edge(&resource, &catalog, "User[bob]");
    }

    #[test]
    fn test_repeated_identity_yields_one_edge() {
        let mut resource = acl();
        resource.set("owner", &json!("bob")).unwrap();
        resource
            .set(
                "permissions",
                &json!([
                    {"identity": "bob", "rights": ["modify"], "affects": "children_only"},
                    {"identity": "bob", "rights": ["full"]}
                ]),
            )
            .unwrap();
        let catalog = catalog_with(vec![CatalogResource::user("bob")]);
        assert_single_edge(&resource, &catalog, "User[bob]");
    }

    #[test]
    fn test_ignores_unreferenced_users() {
        let mut resource = acl();
        resource
            .set("permissions", &json!([{"identity": "bob", "rights": ["modify"]}]))
            .unwrap();
        let catalog = catalog_with(vec![CatalogResource::user("bill")]);
        assert!(autorequire(&resource, &catalog).is_empty());
    }

    #[test]
    fn test_no_match_yields_nothing() {
        let mut resource = acl();
        resource.set("owner", &json!("Administrators")).unwrap();
        resource
            .set("permissions", &json!([{"identity": "bob", "rights": ["modify"]}]))
            .unwrap();
        assert!(autorequire(&resource, &ResourceCatalog::new()).is_empty());
    }

    #[test]
    fn test_identity_match_is_case_sensitive() {
        let mut resource = acl();
        resource.set("owner", &json!("Bob")).unwrap();
        let catalog = catalog_with(vec![CatalogResource::user("bob")]);
        assert!(autorequire(&resource, &catalog).is_empty());
    }

    #[test]
    fn test_autorequires_matching_file() {
        let cases = [
            ("c:/temp", "c:/temp"),
            ("c:\\temp", "c:/temp"),
            ("c:/temp", "c:\\temp"),
            ("c:/temp", "c:/Temp"),
            ("c:/Temp", "c:/tEmp"),
            ("c:/Temp", "c:/temp"),
            ("C:/temp", "C:/temp"),
            ("C:/temp", "c:/temp"),
            ("c:/temp", "C:/temp"),
        ];

        for (target, path) in cases {
            let mut resource = acl();
            resource.set("target", &json!(target)).unwrap();
            let catalog = catalog_with(vec![CatalogResource::file(path)]);
            assert_single_edge(&resource, &catalog, &format!("File[{}]", path));
        }
    }

    #[test]
    fn test_file_matched_by_path_attribute() {
        let mut resource = acl();
        resource.set("target", &json!("C:\\Temp")).unwrap();
        let catalog =
            catalog_with(vec![CatalogResource::file("tempdir").with_path("c:/temp")]);
        assert_single_edge(&resource, &catalog, "File[tempdir]");
    }

    #[test]
    fn test_does_not_autorequire_other_paths() {
        let mut resource = acl();
        resource.set("target", &json!("c:/temp")).unwrap();
        let catalog = catalog_with(vec![
            CatalogResource::file("c:/temp/something"),
            CatalogResource::file("c:/"),
        ]);
        assert!(autorequire(&resource, &catalog).is_empty());
    }

    #[test]
    fn test_users_and_files_together() {
        let mut resource = AclResource::new("c:/temp").unwrap();
        resource.set("owner", &json!("alice")).unwrap();
        resource
            .set("permissions", &json!({"identity": "bob", "rights": ["read"]}))
            .unwrap();
        let catalog = catalog_with(vec![
            CatalogResource::file("c:\\TEMP"),
            CatalogResource::user("bob"),
            CatalogResource::user("alice"),
        ]);

        let sources: Vec<String> = resource
            .autorequire(&catalog)
            .iter()
            .map(|edge| edge.source.to_string())
            .collect();
        assert_eq!(sources, vec!["User[alice]", "User[bob]", "File[c:\\TEMP]"]);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("C:\\Temp\\Sub"), "c:/temp/sub");
        assert_eq!(normalize_path("c:/temp"), "c:/temp");
        assert_eq!(normalize_path("C:\\Ärger\\Ünï"), "c:/Ärger/Ünï");
    }
}
