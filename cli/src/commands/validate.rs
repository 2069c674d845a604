use super::{ensure_clean, load_manifests, print_failures};
use acl::{AclResource, ManifestReport};
use anyhow::Result;
use colored::*;
use serde_json::json;
use std::path::PathBuf;

/// Validate manifests and print the normalized resources
pub async fn execute(path: PathBuf, format: String) -> Result<()> {
    let manifests = load_manifests(&path).await?;

    match format.as_str() {
        "json" => {
            let report = json!({
                "checked_at": chrono::Utc::now().to_rfc3339(),
                "resources": manifests.resources,
                "failures": failures_json(&manifests),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "yaml" => {
            println!("{}", serde_yaml::to_string(&manifests.resources)?);
            print_failures(&manifests);
        }
        _ => {
            print_validation_text(&manifests);
        }
    }

    ensure_clean(&manifests)
}

fn failures_json(manifests: &ManifestReport) -> serde_json::Value {
    manifests
        .failures
        .iter()
        .map(|(file, reason)| json!({"file": file, "error": reason.to_string()}))
        .collect()
}

/// Print resources and failures in a formatted text output
fn print_validation_text(manifests: &ManifestReport) {
    println!("{}", "=== ACL Manifest Validation ===".bold());
    println!();

    for resource in &manifests.resources {
        print_resource(resource);
        println!();
    }

    print_failures(manifests);

    let summary = format!(
        "{} resource(s) valid in {} file(s)",
        manifests.resources.len(),
        manifests.files.len() - manifests.failures.len()
    );
    if manifests.failures.is_empty() {
        println!("{} {}", "✓".green(), summary.green());
    } else {
        println!("{} {}", "!".yellow(), summary.yellow());
    }
}

fn print_resource(resource: &AclResource) {
    println!("{}", resource.to_ref().to_string().cyan().bold());
    println!(
        "  {}: {} ({})",
        "target".cyan(),
        resource.target().green(),
        resource.target_type()
    );
    println!("  {}: {}", "owner".cyan(), resource.owner().yellow());
    println!(
        "  {}: {}",
        "inherit_parent_permissions".cyan(),
        resource.inherit_parent_permissions().to_string().blue()
    );
    let purge = match resource.purge() {
        Some(purge) => purge.to_string(),
        None => "unset".to_string(),
    };
    println!("  {}: {}", "purge".cyan(), purge.blue());
    println!("  {}:", "permissions".cyan());
    for (i, ace) in resource.permissions().iter().enumerate() {
        if ace.is_deny() {
            println!("    {}. {}", i + 1, ace.to_string().red());
        } else {
            println!("    {}. {}", i + 1, ace);
        }
    }
}
