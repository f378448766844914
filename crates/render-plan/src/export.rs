//! Export configuration and job management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use segue_common::error::{SegueError, SegueResult};
use segue_layout_core::build;
use segue_timeline_model::LoadedProject;

use crate::compositor::{compose_frame, frame_count, FrameComposition};
use crate::plan::RenderPlan;

/// An export job ready to be rendered.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Project root directory.
    pub project_dir: PathBuf,

    /// Output file path.
    pub output_path: PathBuf,

    /// Output frame rate used for per-frame sampling.
    pub fps: u32,

    /// Whether per-frame compositions are written alongside the plan.
    pub include_frames: bool,
}

impl ExportJob {
    /// A plan-only export into the project's `exports/` directory.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        Self {
            output_path: project_dir.join("exports").join("render-plan.json"),
            project_dir,
            fps: 30,
            include_frames: false,
        }
    }
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Export progress report.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,

    /// Frames sampled so far.
    pub frames_rendered: u64,

    /// Total frames to sample.
    pub total_frames: u64,

    /// Current stage.
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Building,
    Rendering,
    Finalizing,
    Complete,
    Failed,
}

/// Trait for render backends.
pub trait RenderBackend: Send {
    /// Render a plan into the bytes of the output file.
    fn render(
        &mut self,
        job: &ExportJob,
        plan: &RenderPlan,
        progress: Option<&ProgressCallback>,
    ) -> SegueResult<Vec<u8>>;

    /// Check if this backend can run here.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Document written by [`JsonPlanBackend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub plan: RenderPlan,
    pub fps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<FrameComposition>>,
}

/// Writes the plan as pretty-printed JSON for an external renderer.
#[derive(Debug, Default)]
pub struct JsonPlanBackend;

const PROGRESS_EVERY_FRAMES: u64 = 240;

impl RenderBackend for JsonPlanBackend {
    fn render(
        &mut self,
        job: &ExportJob,
        plan: &RenderPlan,
        progress: Option<&ProgressCallback>,
    ) -> SegueResult<Vec<u8>> {
        let total_frames = frame_count(plan.duration, job.fps);
        let frames = if job.include_frames {
            let mut frames = Vec::with_capacity(total_frames as usize);
            for frame_index in 0..total_frames {
                let Some(frame) = compose_frame(plan, frame_index, job.fps) else {
                    return Err(SegueError::render(format!(
                        "Frame {frame_index} is not representable at {} fps",
                        job.fps
                    )));
                };
                frames.push(frame);

                let done = frame_index + 1;
                if done % PROGRESS_EVERY_FRAMES == 0 || done == total_frames {
                    report(progress, done, total_frames, ExportStage::Rendering);
                }
            }
            Some(frames)
        } else {
            None
        };

        let document = PlanDocument {
            plan: plan.clone(),
            fps: job.fps,
            frames,
        };
        Ok(serde_json::to_vec_pretty(&document)?)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "json-plan"
    }
}

/// Build the project's timeline and export its render plan.
///
/// This is the main entry point for rendering.
pub async fn export_project(
    job: ExportJob,
    progress: Option<ProgressCallback>,
) -> SegueResult<PathBuf> {
    export_with_backend(job, Box::new(JsonPlanBackend), progress).await
}

/// [`export_project`] with an explicit backend.
pub async fn export_with_backend(
    job: ExportJob,
    mut backend: Box<dyn RenderBackend>,
    progress: Option<ProgressCallback>,
) -> SegueResult<PathBuf> {
    tracing::info!(
        project = %job.project_dir.display(),
        output = %job.output_path.display(),
        fps = job.fps,
        "Starting export"
    );

    if job.fps == 0 {
        return Err(SegueError::render("Frame rate must be greater than zero"));
    }
    if !job.project_dir.exists() {
        return Err(SegueError::FileNotFound {
            path: job.project_dir.clone(),
        });
    }
    if !backend.is_available() {
        return Err(SegueError::unsupported(format!(
            "Render backend {} is not available",
            backend.name()
        )));
    }

    let progress = progress.as_ref();
    report(progress, 0, 0, ExportStage::Preparing);
    let loaded = LoadedProject::load(&job.project_dir)
        .map_err(|e| SegueError::project(format!("Failed to load project: {e}")))?;

    report(progress, 0, 0, ExportStage::Building);
    let timeline = match build(&loaded.project.clips, &loaded.project.settings) {
        Ok(timeline) => timeline,
        Err(e) => {
            report(progress, 0, 0, ExportStage::Failed);
            return Err(SegueError::build(e.to_string()));
        }
    };
    let plan = RenderPlan::from_timeline(&timeline)?;
    let total_frames = frame_count(plan.duration, job.fps);

    tracing::info!(backend = backend.name(), frames = total_frames, "Using render backend");
    let bytes = backend.render(&job, &plan, progress)?;

    report(progress, total_frames, total_frames, ExportStage::Finalizing);
    if let Some(parent) = job.output_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&job.output_path, bytes).await?;

    report(progress, total_frames, total_frames, ExportStage::Complete);
    tracing::info!(
        output = %job.output_path.display(),
        duration = %plan.duration,
        steps = plan.video.len(),
        "Export complete"
    );

    Ok(job.output_path)
}

fn report(progress: Option<&ProgressCallback>, done: u64, total: u64, stage: ExportStage) {
    if let Some(cb) = progress {
        let fraction = match stage {
            ExportStage::Finalizing | ExportStage::Complete => 1.0,
            _ if total == 0 => 0.0,
            _ => done as f64 / total as f64,
        };
        cb(ExportProgress {
            progress: fraction,
            frames_rendered: done,
            total_frames: total,
            stage,
        });
    }
}
