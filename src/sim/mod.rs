//! Reference stage engine
//!
//! Stands in for the external simulation the pilot is driven by. It must stay
//! deterministic:
//! - Seeded RNG only (stage generation)
//! - Stable iteration order (by chara index)
//! - Same movement model the pilot predicts with

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Circle, is_hit};
pub use state::{Chara, OtherChara, Pad, Physics, Stage, StagePhase, StageSnapshot};
pub use tick::tick;
