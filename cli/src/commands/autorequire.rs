use super::{ensure_clean, load_manifests, print_failures};
use acl::Relationship;
use anyhow::{Context, Result};
use catalog::ResourceCatalog;
use colored::*;
use serde_json::json;
use std::path::PathBuf;

/// Print the resources each ACL must be applied after
pub async fn execute(path: PathBuf, catalog_path: PathBuf, format: String) -> Result<()> {
    let catalog = ResourceCatalog::from_file(&catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    let manifests = load_manifests(&path).await?;

    let results: Vec<(String, Vec<Relationship>)> = manifests
        .resources
        .iter()
        .map(|resource| (resource.to_ref().to_string(), resource.autorequire(&catalog)))
        .collect();

    match format.as_str() {
        "json" => {
            let report: Vec<_> = results
                .iter()
                .map(|(resource, edges)| json!({"resource": resource, "requires": edges}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("{}", "=== ACL Autorequire ===".bold());
            println!();
            for (resource, edges) in &results {
                println!("{}", resource.cyan().bold());
                if edges.is_empty() {
                    println!("  {}", "(no dependencies)".dimmed());
                }
                for edge in edges {
                    println!("  {}", edge.to_string().green());
                }
            }
            println!();
            let total: usize = results.iter().map(|(_, edges)| edges.len()).sum();
            println!(
                "{}",
                format!(
                    "{} relationship(s) for {} resource(s) against {} catalog entries",
                    total,
                    results.len(),
                    catalog.len()
                )
                .green()
            );
        }
    }

    print_failures(&manifests);
    ensure_clean(&manifests)
}
