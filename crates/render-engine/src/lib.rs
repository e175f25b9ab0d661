//! Shortsmith Render Engine
//!
//! Offline rendering pipeline that composites title text, rotating article
//! images, and timed subtitles over a segment of background footage, muxed
//! with the narration track.
//!
//! # Pipeline Architecture
//!
//! ```text
//! footage.mp4 ──┐
//!               ├── Segment Select + Crop/Scale (ffmpeg decode)
//! narration ────┘         │
//!                         ├── Title Overlay
//! article images ─────────┘         │
//!                                   ├── Image Carousel
//! transcript.srt ───────────────────┘         │
//!                                             ├── Subtitle + Scrim
//!                                             ▼
//!                                      Encode (H.264 + AAC)
//!                                             │
//!                                             ▼
//!                                     <title>_short.mp4
//! ```

pub mod compositor;
pub mod export;
pub mod font;
pub mod probe;

pub use export::*;
