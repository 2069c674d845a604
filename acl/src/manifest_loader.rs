use crate::error::{AclError, Result};
use crate::AclResource;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Load ACL declarations from YAML manifests
pub struct ManifestLoader;

/// Outcome of loading a set of manifest files
#[derive(Debug, Default)]
pub struct ManifestReport {
    pub files: Vec<PathBuf>,
    pub resources: Vec<AclResource>,
    /// Files that failed, with the reason
    pub failures: Vec<(PathBuf, AclError)>,
}

impl ManifestReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl ManifestLoader {
    /// Parse a manifest holding one attribute map or a list of them
    pub fn parse_manifest(content: &str) -> Result<Vec<AclResource>> {
        let document: JsonValue = serde_yaml::from_str(content)?;

        let entries = match document {
            JsonValue::Null => Vec::new(),
            JsonValue::Array(entries) => entries,
            entry @ JsonValue::Object(_) => vec![entry],
            other => {
                return Err(AclError::ManifestParsing(format!(
                    "Expected a mapping or a list of mappings, got {}",
                    other
                )))
            }
        };

        let mut names = HashSet::new();
        let mut resources = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let attributes = entry.as_object().ok_or_else(|| {
                AclError::ManifestParsing(format!("Entry {} is not a mapping: {}", i, entry))
            })?;

            let resource = AclResource::from_attributes(attributes)?;
            if !names.insert(resource.name().to_string()) {
                return Err(AclError::InvalidValue(format!(
                    "Duplicate declaration: {} is already declared",
                    resource.to_ref()
                )));
            }
            resources.push(resource);
        }

        Ok(resources)
    }

    /// Load the ACL declarations of a single manifest file
    pub async fn load_resources_from_file(path: &Path) -> Result<Vec<AclResource>> {
        debug!("Loading ACL manifest from: {:?}", path);

        let content = std::fs::read_to_string(path)?;
        let resources = Self::parse_manifest(&content)?;

        info!("Loaded {} ACL resource(s) from {:?}", resources.len(), path);
        Ok(resources)
    }

    /// List the manifest files of a directory, sorted by path
    pub fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(AclError::ManifestParsing(format!(
                "Manifest directory does not exist: {:?}",
                dir
            )));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(extension) = path.extension() {
                if extension == "yaml" || extension == "yml" {
                    files.push(path);
                }
            }
        }
        files.sort();

        Ok(files)
    }

    /// Load a set of manifest files, collecting failures per file.
    ///
    /// A file that fails is logged and recorded, and loading goes on with the
    /// next one. A name already declared by an earlier file fails the later
    /// file as a whole.
    pub async fn load_files(files: Vec<PathBuf>) -> ManifestReport {
        let mut names: HashSet<String> = HashSet::new();
        let mut report = ManifestReport::default();

        for path in &files {
            let loaded = match Self::load_resources_from_file(path).await {
                Ok(loaded) => loaded,
                Err(e) => {
                    error!("Failed to load manifest from {:?}: {}", path, e);
                    report.failures.push((path.clone(), e));
                    continue;
                }
            };

            if let Some(dup) = loaded.iter().find(|r| names.contains(r.name())) {
                let e = AclError::InvalidValue(format!(
                    "Duplicate declaration: {} is already declared",
                    dup.to_ref()
                ));
                error!("Failed to load manifest from {:?}: {}", path, e);
                report.failures.push((path.clone(), e));
                continue;
            }

            names.extend(loaded.iter().map(|r| r.name().to_string()));
            report.resources.extend(loaded);
        }

        report.files = files;
        report
    }

    /// Load every manifest in a directory
    pub async fn load_resources_from_directory(dir: &Path) -> Result<ManifestReport> {
        info!("Loading ACL manifests from directory: {:?}", dir);

        let report = Self::load_files(Self::manifest_files(dir)?).await;

        info!(
            "Loaded {} ACL resource(s), {} file(s) failed",
            report.resources.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Right;
    use std::fs;
    use tempfile::TempDir;

    const SINGLE: &str = r#"
name: 'c:\temp'
owner: alice
permissions:
  identity: bob
  rights: [full]
"#;

    const LIST: &str = r#"
- name: tempdir
  target: c:/temp
  purge: true
  permissions:
    - identity: bob
      rights: [read, execute]
    - identity: tim
      rights: [modify]
      type: deny
- name: logs
  target: c:/logs
  permissions:
    - identity: Domain\svc
      rights: [write]
"#;

    #[test]
    fn test_parse_single_mapping() {
        let resources = ManifestLoader::parse_manifest(SINGLE).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].target(), "c:\\temp");
        assert_eq!(resources[0].owner(), "alice");
        assert_eq!(resources[0].permissions()[0].rights, vec![Right::Full]);
    }

    #[test]
    fn test_parse_list() {
        let resources = ManifestLoader::parse_manifest(LIST).unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].purge(), Some(true));
        assert_eq!(resources[0].permissions().len(), 2);
        assert_eq!(resources[1].permissions()[0].identity, "Domain\\svc");
    }

    #[test]
    fn test_parse_rejects_bad_entries() {
        let err = ManifestLoader::parse_manifest("- name: a\n").unwrap_err();
        assert!(err.is_missing_value());

        let err = ManifestLoader::parse_manifest("just a string").unwrap_err();
        assert!(matches!(err, AclError::ManifestParsing(_)));

        let err = ManifestLoader::parse_manifest("- 42").unwrap_err();
        assert!(matches!(err, AclError::ManifestParsing(_)));
    }

    #[test]
    fn test_parse_rejects_duplicate_names() {
        let yaml = r#"
- name: a
  permissions: {identity: bob, rights: [read]}
- name: a
  permissions: {identity: tim, rights: [read]}
"#;
        let err = ManifestLoader::parse_manifest(yaml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate declaration: Acl[a] is already declared"
        );
    }

    #[tokio::test]
    async fn test_load_resources_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("temp.yaml");
        fs::write(&path, SINGLE).unwrap();

        let resources = ManifestLoader::load_resources_from_file(&path).await.unwrap();
        assert_eq!(resources[0].name(), "c:\\temp");
    }

    #[tokio::test]
    async fn test_load_resources_from_directory_records_bad_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.yaml"), SINGLE).unwrap();
        fs::write(temp_dir.path().join("b.yml"), LIST).unwrap();
        fs::write(
            temp_dir.path().join("c.yaml"),
            "name: broken\npermissions: []\n",
        )
        .unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let files = ManifestLoader::manifest_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 3);

        let report = ManifestLoader::load_resources_from_directory(temp_dir.path())
            .await
            .unwrap();
        assert_eq!(report.files.len(), 3);
        assert_eq!(report.resources.len(), 3);
        assert!(!report.is_clean());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].0.ends_with("c.yaml"));
        assert!(report.failures[0].1.is_invalid_value());
    }

    #[tokio::test]
    async fn test_load_files_rejects_names_declared_twice() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.yaml");
        let second = temp_dir.path().join("b.yaml");
        fs::write(&first, SINGLE).unwrap();
        fs::write(
            &second,
            "name: 'c:\\temp'\npermissions: {identity: tim, rights: [read]}\n",
        )
        .unwrap();

        let report = ManifestLoader::load_files(vec![first, second.clone()]).await;
        assert_eq!(report.resources.len(), 1);
        assert_eq!(report.resources[0].owner(), "alice");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, second);
        assert_eq!(
            report.failures[0].1.to_string(),
            "Duplicate declaration: Acl[c:\\temp] is already declared"
        );
    }

    #[tokio::test]
    async fn test_load_files_clean() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("list.yaml");
        fs::write(&path, LIST).unwrap();

        let report = ManifestLoader::load_files(vec![path]).await;
        assert!(report.is_clean());
        assert_eq!(report.resources.len(), 2);
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(ManifestLoader::manifest_files(&missing).is_err());
    }
}
