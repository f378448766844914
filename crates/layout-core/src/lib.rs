//! Segue Layout Core: the timeline layout engine
//!
//! Turns an ordered clip list into everything a rendering backend needs:
//! - **Planner:** Accept or reject a transition at every clip boundary
//! - **Layout:** Alternate clips over two lanes and split each clip into
//!   head, pass-through and tail ranges
//! - **Automation:** Volume ramps per audio lane, plus an optional music bed
//! - **Compositing:** Ordered pass-through and transition instructions
//! - **Transforms:** Per-layer affine transforms keyed by instruction
//!
//! ```text
//! clips + BuildConfig
//!        │
//!        ▼
//!   plan_transitions ──▶ layout ──▶ verify_lanes
//!                          │
//!      ┌──────────────┬────┴─────────┬──────────────┐
//!      ▼              ▼              ▼              ▼
//!   volume        compositing    transforms       music
//!      └──────────────┴──────┬───────┴──────────────┘
//!                            ▼
//!                        Timeline
//! ```
//!
//! This crate is pure computation. Every function takes immutable input and
//! returns a fresh value; the same input always yields the same output.

pub mod build;
pub mod compositing;
pub mod error;
pub mod layout;
pub mod music;
pub mod planner;
pub mod session;
pub mod transform;
pub mod validate;
pub mod volume;

pub use build::{build, BuildStatus, Timeline};
pub use compositing::{CompositingInstruction, InstructionMode, OpacityRamp};
pub use error::BuildError;
pub use layout::{layout, verify_lanes, PlacedClip};
pub use music::{MusicPiece, MusicTrack};
pub use planner::{plan_transitions, TransitionDecision, TransitionRejection};
pub use session::EditSession;
pub use transform::{LayerTransform, TransformEntry, TransformTable};
pub use volume::{AudioMix, AutomationLane, LaneAutomation, VolumeRamp};
