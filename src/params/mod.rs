//! Parameter definitions with units and documented semantics.
//!
//! Every tunable of the visualizer lives here:
//! - Scene units for geometry, pixels for output, Hz for rates
//! - Documented ranges and meanings
//! - `validate()` on anything a user can set from the command line

mod audio;
mod bars;
mod render;

// Re-export all types
pub use audio::audio_constants;
pub use bars::{BarConfig, PALETTE_HEX};
pub use render::{epilogue, RecordingConfig, RenderConfig};
