//! Build a project's timeline and summarize the result.

use std::path::PathBuf;

use clap::Args;

use segue_layout_core::{build, BuildStatus, InstructionMode, Timeline};
use segue_timeline_model::{BuildConfig, FillMode, ScalePolicy, TransitionCurve};

use super::{load_project, seconds};

/// Settings that replace the project's stored values for this build only.
#[derive(Debug, Default, Args)]
pub struct BuildOverrides {
    /// Default transition duration (seconds)
    #[arg(long)]
    pub transition_secs: Option<f64>,

    /// Transition curve: dissolve|fade|none
    #[arg(long)]
    pub curve: Option<TransitionCurve>,

    /// Fill mode: aspect_fill|aspect_fit|fill
    #[arg(long)]
    pub fill_mode: Option<FillMode>,

    /// Silence clips played at a speed other than 1.0
    #[arg(long)]
    pub mute_on_speed_change: bool,

    /// Scale transitions by the outgoing clip's speed
    #[arg(long)]
    pub scale_with_speed: bool,
}

impl BuildOverrides {
    pub fn apply(&self, settings: &mut BuildConfig) -> anyhow::Result<()> {
        let transition = &mut settings.transition;
        if let Some(secs) = self.transition_secs {
            transition.default_duration = seconds(secs)?;
        }
        if let Some(curve) = self.curve {
            transition.curve = curve;
        }
        if self.mute_on_speed_change {
            transition.mute_on_speed_change = true;
        }
        if self.scale_with_speed {
            transition.scale_policy = ScalePolicy::ScaleWithSpeed;
        }
        if let Some(fill_mode) = self.fill_mode {
            settings.composition.fill_mode = fill_mode;
        }
        Ok(())
    }
}

pub fn run(path: PathBuf, json: bool, overrides: BuildOverrides) -> anyhow::Result<()> {
    let project = load_project(&path)?;
    let mut settings = project.project.settings.clone();
    overrides.apply(&mut settings)?;

    let timeline = build(&project.project.clips, &settings)
        .map_err(|e| anyhow::anyhow!("Build failed ({}): {e}", e.kind()))?;

    tracing::debug!(
        project = %project.project.name,
        instructions = timeline.instructions.len(),
        "Timeline ready"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
    } else {
        print_summary(&timeline);
    }

    Ok(())
}

fn print_summary(timeline: &Timeline) {
    if timeline.status == BuildStatus::EmptyInput {
        println!("Project has no clips; nothing to lay out.");
        return;
    }

    println!("Timeline: {}", timeline.duration);
    println!(
        "  Render size: {}",
        timeline.transforms.render_size
    );
    println!("  Transitions: {}", timeline.transition_count());
    println!();

    println!("Clips:");
    for placed in &timeline.placed {
        let lane = |l: Option<segue_timeline_model::Lane>| {
            l.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string())
        };
        println!(
            "  {} at {} for {} (audio {}, video {})",
            placed.clip_id,
            placed.placed_at,
            placed.placed_duration,
            lane(placed.audio_lane),
            lane(placed.video_lane)
        );
    }

    let rejected: Vec<_> = timeline
        .decisions
        .iter()
        .filter_map(|d| d.rejection.map(|r| (d.outgoing, r)))
        .collect();
    if !rejected.is_empty() {
        println!();
        println!("Hard cuts:");
        for (outgoing, reason) in rejected {
            println!("  after clip {outgoing}: {reason:?}");
        }
    }

    println!();
    println!("Instructions:");
    for instruction in &timeline.instructions {
        match &instruction.mode {
            InstructionMode::Passthrough { lane, clip_id } => {
                println!("  {} {} on {}", instruction.time_range, clip_id, lane);
            }
            InstructionMode::Transition {
                from_clip, to_clip, ..
            } => {
                println!(
                    "  {} {} -> {}",
                    instruction.time_range, from_clip, to_clip
                );
            }
        }
    }

    println!();
    println!(
        "Audio ramps: {} (lane A {}, lane B {})",
        timeline.audio_mix.ramp_count(),
        timeline.audio_mix.lane_a.len(),
        timeline.audio_mix.lane_b.len()
    );
    if let Some(music) = &timeline.music {
        println!(
            "Music: {} piece(s), {} ramp(s)",
            music.pieces.len(),
            music.ramps.len()
        );
    }
}
