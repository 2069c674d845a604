use anyhow::{Context, Result};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};

/// Environment-based path configuration
#[derive(Debug, Clone, Serialize)]
pub struct EnvPaths {
    pub manifest_path: PathBuf,
    pub catalog_path: PathBuf,
    /// Directory for rolling log files; file logging is off when unset
    pub log_path: Option<PathBuf>,
}

impl EnvPaths {
    /// Load paths from environment variables with defaults
    pub fn load() -> Result<Self> {
        Self::load_with_base(None)
    }

    /// Load paths from environment variables with an optional base directory
    /// This is primarily for testing purposes
    pub fn load_with_base(base_dir: Option<PathBuf>) -> Result<Self> {
        let base = if let Some(base) = base_dir {
            base
        } else {
            // Try to load .env file if it exists in current directory
            if let Ok(env_path) = env::current_dir() {
                let env_file = env_path.join(".env");
                if env_file.exists() {
                    dotenv::from_path(&env_file).ok();
                }
            }
            env::current_dir().context("Failed to get current directory")?
        };

        Ok(Self {
            manifest_path: Self::get_path_from_env("ACL_MANIFEST_PATH", "./manifests", &base),
            catalog_path: Self::get_path_from_env("ACL_CATALOG_PATH", "./catalog.yaml", &base),
            log_path: env::var("ACL_LOG_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(|p| Self::resolve(PathBuf::from(p), &base)),
        })
    }

    /// Get a path from environment variable or use default
    fn get_path_from_env(var_name: &str, default: &str, base_dir: &Path) -> PathBuf {
        let path_str = env::var(var_name).unwrap_or_else(|_| default.to_string());
        Self::resolve(PathBuf::from(path_str), base_dir)
    }

    /// Relative paths are taken relative to the base directory
    fn resolve(path: PathBuf, base_dir: &Path) -> PathBuf {
        if path.is_relative() {
            base_dir.join(path)
        } else {
            path
        }
    }
}
