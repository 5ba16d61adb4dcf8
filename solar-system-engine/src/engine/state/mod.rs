//! Shared view state and the per-frame snapshot.
//!
//! `ViewStateStore` is the single authoritative record written by UI
//! controls, the RPC bridge and the pointer resolver. `FrameSnapshot` is the
//! copy every frame system reads.

/// View state record, single-field setters and the snapshot system.
pub mod view_state;

/// Independent visual mode flags.
pub mod visual_modes;
