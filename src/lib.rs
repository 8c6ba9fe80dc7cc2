// GetClayed sculpting core.
//
// Builds base meshes for clay primitives, records push/pull strokes as a
// compact action log, and replays that log to rebuild a sculpt on load.

pub mod engine;

pub use engine::*;
