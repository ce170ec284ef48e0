//! Therapy task domain module.
//!
//! # Module Structure
//!
//! - `model`: `TherapyTask`, `TaskCheck`, `TaskResolution`
//! - `catalog`: the static catalog and selection helpers
//! - `evaluate`: per-task predicates and roast selection

mod catalog;
mod evaluate;
mod model;

pub use catalog::{
    achievement, catalog_len, completion_rate, next_task_suggestion, pick_task, task_by_id,
};
pub use evaluate::{SKIP_ROAST, canonicalize, evaluate, resolve, roast_for};
pub use model::{TaskCheck, TaskResolution, TherapyTask};
