pub mod build;
pub mod export;
pub mod info;
pub mod init;
pub mod validate;

use std::path::Path;

use segue_common::config::EditorDefaults;
use segue_common::error::{SegueError, SegueResult};
use segue_timeline_model::{
    BuildConfig, LoadedProject, ScalePolicy, TimePoint, TransitionConfig,
};

/// Timescale used for durations typed on the command line or in config.
pub const INPUT_TIMESCALE: u32 = 600;

pub fn load_project(path: &Path) -> anyhow::Result<LoadedProject> {
    LoadedProject::load(path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))
}

pub fn seconds(secs: f64) -> anyhow::Result<TimePoint> {
    if secs < 0.0 {
        anyhow::bail!("Duration must not be negative: {secs}");
    }
    TimePoint::from_secs_f64(secs, INPUT_TIMESCALE)
        .map_err(|e| anyhow::anyhow!("Invalid duration {secs}: {e}"))
}

/// Translate the editor defaults from the app config into build settings.
pub fn settings_from_defaults(defaults: &EditorDefaults) -> SegueResult<BuildConfig> {
    let default_duration = seconds(defaults.transition_secs)
        .map_err(|e| SegueError::config(format!("editor.transition_secs: {e}")))?;
    let curve = defaults
        .transition_curve
        .parse()
        .map_err(|e| SegueError::config(format!("editor.transition_curve: {e}")))?;
    let fill_mode = defaults
        .fill_mode
        .parse()
        .map_err(|e| SegueError::config(format!("editor.fill_mode: {e}")))?;

    let transition = TransitionConfig {
        default_duration,
        scale_policy: if defaults.scale_transition_with_speed {
            ScalePolicy::ScaleWithSpeed
        } else {
            ScalePolicy::Fixed
        },
        curve,
        mute_on_speed_change: defaults.mute_on_speed_change,
    };

    let mut settings = BuildConfig::with_transition(transition);
    settings.composition.fill_mode = fill_mode;
    Ok(settings)
}
