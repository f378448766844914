//! Validate a Segue project bundle.

use std::path::PathBuf;

use segue_layout_core::build;

use super::load_project;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating project at: {}", path.display());

    let project = load_project(&path)?;

    println!("  Name: {}", project.project.name);
    println!("  Version: {}", project.project.version);
    println!("  Clips: {}", project.project.clips.len());

    let mut errors = project.validate_sources();
    if let Err(e) = build(&project.project.clips, &project.project.settings) {
        errors.push(format!("Timeline does not build ({}): {e}", e.kind()));
    }

    if errors.is_empty() {
        println!("  Sources: All present");
        println!("  Timeline: Builds");
        println!("\nProject is valid.");
    } else {
        println!("\nValidation issues:");
        for error in &errors {
            println!("  - {error}");
        }
        println!(
            "\n{} issue(s) found. Project may not be fully usable.",
            errors.len()
        );
    }

    Ok(())
}
