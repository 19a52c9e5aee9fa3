//! WebGPU rendering module
//!
//! `shapes::frame_vertices` tessellates a `GameState` into a colored
//! triangle list in playfield pixels; `RenderState` maps it to NDC and draws.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, playfield_to_ndc};
pub use shapes::frame_vertices;
pub use vertex::Vertex;
