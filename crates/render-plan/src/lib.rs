//! Segue Render Plan
//!
//! Packages a built timeline into what rendering and mixing backends
//! consume, and drives a backend to export it.
//!
//! # Pipeline
//!
//! ```text
//! meta/project.json ──▶ build ──▶ Timeline
//!                                    │
//!                 ┌──────────────────┴──────────────────┐
//!                 ▼                                      ▼
//!     video: instructions + transforms       audio: ramps per lane
//!                 └──────────────────┬──────────────────┘
//!                                    ▼
//!                               RenderPlan
//!                                    │
//!                      per-frame sampling (compositor)
//!                                    │
//!                                    ▼
//!                        RenderBackend ──▶ exports/
//! ```

pub mod compositor;
pub mod export;
pub mod plan;

pub use compositor::{compose_frame, compute_compositions, FrameComposition, LayerSample};
pub use export::*;
pub use plan::{AudioLanePlan, AudioPlan, RenderPlan, VideoStep};
