//! Export a project's render plan.

use std::io::Write;
use std::path::PathBuf;

use segue_render_plan::{export_project, ExportJob, ExportProgress, ExportStage};

pub async fn run(
    path: PathBuf,
    output: Option<PathBuf>,
    fps: u32,
    frames: bool,
) -> anyhow::Result<()> {
    println!("Exporting project at: {}", path.display());

    let mut job = ExportJob::new(&path);
    if let Some(output) = output {
        job.output_path = output;
    }
    job.fps = fps;
    job.include_frames = frames;
    let output_path = job.output_path.clone();

    println!("  Output: {}", output_path.display());
    println!("  Frame rate: {fps}");
    println!("  Per-frame compositions: {}", if frames { "yes" } else { "no" });

    let progress_cb: Box<dyn Fn(ExportProgress) + Send> = Box::new(|p| {
        if p.stage == ExportStage::Rendering {
            print!(
                "\r  Progress: {:.1}% ({}/{} frames)  ",
                p.progress * 100.0,
                p.frames_rendered,
                p.total_frames,
            );
            let _ = std::io::stdout().flush();
        }
    });

    match export_project(job, Some(progress_cb)).await {
        Ok(written) => {
            println!("\nExport complete: {}", written.display());
            Ok(())
        }
        Err(e) => {
            println!("\nExport failed: {e}");
            Err(e.into())
        }
    }
}
