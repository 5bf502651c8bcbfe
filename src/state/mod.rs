//! State module for tracking harvest progress
//!
//! `RegionState` is the in-memory state machine of one region's run. The
//! durable side of the same lifecycle (the checkpoint) lives in `storage`.

mod region_state;

pub use region_state::RegionState;
