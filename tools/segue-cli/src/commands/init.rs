//! Initialize a new Segue project.

use std::path::PathBuf;

use segue_common::config::EditorDefaults;
use segue_timeline_model::LoadedProject;

use super::settings_from_defaults;

pub fn run(name: String, output: PathBuf, defaults: &EditorDefaults) -> anyhow::Result<()> {
    let project_dir = output.join(&name);
    println!("Creating project '{}' at {}", name, project_dir.display());

    let settings = settings_from_defaults(defaults)?;
    let project = LoadedProject::create(&project_dir, &name, settings)
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    let transition = &project.project.settings.transition;
    println!("Project created successfully:");
    println!("  Directory: {}", project.root.display());
    println!(
        "  Transition: {} {}",
        transition.curve, transition.default_duration
    );
    println!("  Fill mode: {:?}", project.project.settings.composition.fill_mode);
    println!();
    println!("Directory structure:");
    println!("  {}/", name);
    println!("  ├── sources/     (clip and music media)");
    println!("  ├── meta/        (project.json)");
    println!("  └── exports/     (render plans)");

    Ok(())
}
