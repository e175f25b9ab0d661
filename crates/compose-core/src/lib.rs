//! Shortsmith Compose Core
//!
//! The timing and layout logic behind the frame compositor:
//! - **Cues:** SRT transcript parsing and active-cue lookup
//! - **Layout:** width-constrained greedy word wrapping
//! - **Segment:** background footage sub-interval selection
//! - **Aspect:** center-crop math for aspect normalization
//! - **Carousel:** time-driven image rotation
//!
//! This crate is pure computation — no I/O, no subprocesses.
//! All inputs are data; all outputs are data.

pub mod aspect;
pub mod carousel;
pub mod cue;
pub mod layout;
pub mod segment;

pub use aspect::CropRect;
pub use cue::SubtitleCue;
