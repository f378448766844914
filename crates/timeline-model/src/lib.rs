//! Segue Timeline Model
//!
//! Defines the data contracts shared by the layout engine and its callers:
//! - **Time:** Exact rational time points and half-open time ranges
//! - **Clips:** Immutable clip descriptors and their media flags
//! - **Lanes:** The fixed two-lane track model
//! - **Settings:** Transition, composition, and music-bed configuration
//! - **Project:** On-disk project bundle with clip list and settings
//!
//! Times are rationals (`value / timescale`) so that a timeline of hundreds
//! of clips accumulates no rounding drift.

pub mod clip;
pub mod geometry;
pub mod lane;
pub mod music;
pub mod project;
pub mod settings;
pub mod time;
pub mod transition;

pub use clip::*;
pub use geometry::*;
pub use lane::*;
pub use music::*;
pub use project::*;
pub use settings::*;
pub use time::*;
pub use transition::*;
