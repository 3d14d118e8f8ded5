//! Rendering
//!
//! `scene` projects a session into draw commands, `shapes` turns those into
//! triangles, and `pipeline` uploads them through wgpu.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, client_to_screen};
pub use scene::{DrawCommand, Scene, render};
pub use shapes::tessellate;
pub use vertex::Vertex;
