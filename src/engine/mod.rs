// Engine module - clay sculpting core
// Shape generation, subdivision, and the deform action log

pub mod clay;
pub mod deform;
pub mod error;
pub mod mesh;
pub mod primitives;
pub mod shapes;
pub mod subdivide;

mod serde_vec3;

// Re-export commonly used items
pub use clay::{DeformableClayData, SculptSession};
pub use deform::{
    apply_deform_actions, calculate_action_data_size, calculate_vertex_data_size, decode_actions,
    record_deform_action, record_deform_action_at, DeformAction, DeformKind, StorageEstimate,
};
pub use error::{ClayError, Result};
pub use mesh::{Aabb, BoundingSphere, ClayBuffers, GpuVertex, Mesh, RenderMesh};
pub use shapes::{
    create_detailed_geometry, create_from_params, prepare_geometry_for_deformation, ShapeKind,
    ShapeParams, ShapePolicy,
};
