// Persisted clay object and the live sculpting session built on top of it.
//
// Only shape keyword + params + action log are stored. The mesh is always
// regenerated: create → prepare → replay.

use glam::Vec3;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::deform::{
    apply_deform_actions, record_deform_action, validate_actions, DeformAction, DeformKind,
    StorageEstimate,
};
use super::error::{ClayError, Result};
use super::mesh::Mesh;
use super::shapes::{create_from_params, prepare_geometry_for_deformation, ShapeKind, ShapeParams};

// ============================================================================
// PERSISTED DATA
// ============================================================================

/// The unit handed to the storage network for one sculpted object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeformableClayData {
    pub original_shape: ShapeKind,
    pub original_params: ShapeParams,
    /// Replay order is significant. Grows by append; undo truncates.
    #[serde(default)]
    pub deform_actions: Vec<DeformAction>,
}

impl DeformableClayData {
    pub fn new(original_shape: ShapeKind, original_params: ShapeParams) -> Self {
        Self { original_shape, original_params, deform_actions: Vec::new() }
    }

    /// Base mesh prepared for deformation, before any action.
    pub fn base_mesh(&self) -> Mesh {
        let mesh = create_from_params(&self.original_shape, &self.original_params);
        prepare_geometry_for_deformation(&mesh, &self.original_shape)
    }

    /// Regenerate the base mesh and replay the full action log.
    pub fn rebuild_mesh(&self) -> Mesh {
        let mut mesh = self.base_mesh();
        apply_deform_actions(&mut mesh, &self.deform_actions);
        mesh
    }

    /// Check that replaying this log reproduces `live` bit for bit.
    /// Run before upload so a save never loads back as different geometry.
    pub fn verify_replay(&self, live: &Mesh) -> Result<()> {
        if let Some(vertex) = live.positions.iter().position(|p| !p.is_finite()) {
            return Err(ClayError::NonFiniteGeometry { vertex });
        }
        let rebuilt = self.rebuild_mesh();
        let same_bits = |a: &Vec3, b: &Vec3| {
            a.to_array().map(f32::to_bits) == b.to_array().map(f32::to_bits)
        };
        if let Some(vertex) = rebuilt.positions.iter()
            .zip(&live.positions)
            .position(|(a, b)| !same_bits(a, b))
        {
            return Err(ClayError::ReplayMismatch { vertex });
        }
        if rebuilt.vertex_count() != live.vertex_count() {
            return Err(ClayError::ReplayMismatch {
                vertex: rebuilt.vertex_count().min(live.vertex_count()),
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ClayError::Encode)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ClayError::Encode)
    }

    /// Decode stored data. Malformed or non-finite actions and out-of-range
    /// parameters are rejected here, before any regeneration or replay.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json).map_err(ClayError::Decode)?;
        data.original_params.validate()?;
        validate_actions(&data.deform_actions)?;
        Ok(data)
    }

    pub fn storage_estimate(&self, vertex_count: usize) -> StorageEstimate {
        StorageEstimate::new(&self.deform_actions, vertex_count)
    }
}

// ============================================================================
// SCULPT SESSION
// ============================================================================

/// One clay object being edited: persisted data plus the live mesh.
///
/// Strokes are quantized before they touch the live mesh, so the live
/// geometry is exactly what a later load will replay.
pub struct SculptSession {
    data: DeformableClayData,
    mesh: Mesh,
}

impl SculptSession {
    /// Place a new primitive.
    pub fn new(shape: ShapeKind, params: ShapeParams) -> Self {
        Self::from_data(DeformableClayData::new(shape, params))
    }

    /// Resume a stored object by replaying its log.
    pub fn from_data(data: DeformableClayData) -> Self {
        let mesh = data.rebuild_mesh();
        info!(
            "loaded {} clay: {} actions, {} vertices",
            data.original_shape,
            data.deform_actions.len(),
            mesh.vertex_count(),
        );
        Self { data, mesh }
    }

    /// Record a gesture, apply it to the live mesh and append it to the log.
    /// A gesture with non-finite input leaves the session untouched.
    pub fn stroke(
        &mut self,
        kind: DeformKind,
        hit_point: Vec3,
        movement: Vec3,
        brush_size: f32,
    ) -> Result<&DeformAction> {
        let action = record_deform_action(kind, hit_point, movement, brush_size)?;
        self.push_action(action)
    }

    /// Apply and append an already-recorded action.
    pub fn push_action(&mut self, action: DeformAction) -> Result<&DeformAction> {
        if let Some(field) = action.non_finite_field() {
            return Err(ClayError::NonFiniteStroke { field });
        }
        apply_deform_actions(&mut self.mesh, std::slice::from_ref(&action));
        self.data.deform_actions.push(action);
        debug!("stroke #{}: {:?}", self.data.deform_actions.len(), action.kind);
        Ok(&self.data.deform_actions[self.data.deform_actions.len() - 1])
    }

    /// Drop the last action and rebuild. Returns the removed action.
    pub fn undo(&mut self) -> Option<DeformAction> {
        let action = self.data.deform_actions.pop()?;
        self.mesh = self.data.rebuild_mesh();
        Some(action)
    }

    /// Keep only the first `len` actions and rebuild if anything was removed.
    pub fn truncate(&mut self, len: usize) {
        if len < self.data.deform_actions.len() {
            self.data.deform_actions.truncate(len);
            self.mesh = self.data.rebuild_mesh();
        }
    }

    pub fn action_count(&self) -> usize { self.data.deform_actions.len() }

    pub fn data(&self) -> &DeformableClayData { &self.data }

    pub fn mesh(&self) -> &Mesh { &self.mesh }

    pub fn storage_estimate(&self) -> StorageEstimate {
        self.data.storage_estimate(self.mesh.vertex_count())
    }

    pub fn into_data(self) -> DeformableClayData { self.data }
}
