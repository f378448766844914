//! Show project information.

use std::path::PathBuf;

use super::load_project;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let project = load_project(&path)?;
    let p = &project.project;

    println!("Project: {}", p.name);
    println!("  ID: {}", p.id);
    println!("  Created: {}", p.created_at);
    println!("  Modified: {}", p.modified_at);
    println!();

    println!("Clips:");
    if p.clips.is_empty() {
        println!("  (none)");
    }
    for clip in &p.clips {
        let media = match (clip.has_audio, clip.has_video) {
            (true, true) => "audio+video",
            (true, false) => "audio",
            (false, true) => "video",
            (false, false) => "no media",
        };
        println!(
            "  {}: {} x{} ({}, volume {:.2}{})",
            clip.id,
            clip.source_range,
            clip.scale_factor,
            media,
            clip.volume,
            if clip.is_muted { ", muted" } else { "" }
        );
        if let Some(requested) = clip.requested_transition_duration {
            println!("    Transition out: {requested}");
        }
        if clip.has_video {
            println!(
                "    Video: {} {:?}",
                clip.natural_size, clip.orientation
            );
        }
    }
    println!();

    let transition = &p.settings.transition;
    println!("Transitions:");
    println!("  Curve: {}", transition.curve);
    println!("  Default duration: {}", transition.default_duration);
    println!("  Scale policy: {:?}", transition.scale_policy);
    println!("  Mute on speed change: {}", transition.mute_on_speed_change);
    println!();

    let composition = &p.settings.composition;
    println!("Composition:");
    println!("  Fill mode: {:?}", composition.fill_mode);
    match composition.preferred_render_size {
        Some(size) => println!("  Render size: {size}"),
        None => println!("  Render size: from first video clip"),
    }

    if let Some(music) = &p.settings.music {
        println!();
        println!("Music:");
        println!(
            "  Source: {}",
            music.source_path.as_deref().unwrap_or("(unset)")
        );
        println!("  Asset duration: {}", music.asset_duration);
        println!("  Volume: {:.2}", music.volume);
        println!("  Fade: {}", music.fade_duration);
    }

    Ok(())
}
