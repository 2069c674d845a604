use crate::utils::env_paths::EnvPaths;
use anyhow::Result;
use colored::*;
use std::path::Path;

/// Show the resolved configuration
pub fn show(env_paths: &EnvPaths, format: String) -> Result<()> {
    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(env_paths)?);
        }
        "yaml" => {
            println!("{}", serde_yaml::to_string(env_paths)?);
        }
        _ => {
            print_config_text(env_paths);
        }
    }

    Ok(())
}

/// Print the configuration in a formatted text output
fn print_config_text(env_paths: &EnvPaths) {
    println!("{}", "=== ACL CLI Configuration ===".bold());
    println!();
    print_path("manifest_path", "ACL_MANIFEST_PATH", Some(&env_paths.manifest_path));
    print_path("catalog_path", "ACL_CATALOG_PATH", Some(&env_paths.catalog_path));
    print_path("log_path", "ACL_LOG_PATH", env_paths.log_path.as_deref());
}

fn print_path(key: &str, var: &str, path: Option<&Path>) {
    match path {
        Some(path) => {
            let status = if path.exists() {
                "exists".green()
            } else {
                "missing".yellow()
            };
            println!(
                "  {} ({}): {} [{}]",
                key.cyan(),
                var.dimmed(),
                path.display().to_string().green(),
                status
            );
        }
        None => println!("  {} ({}): {}", key.cyan(), var.dimmed(), "not set".yellow()),
    }
}
