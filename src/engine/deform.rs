// Deform recorder / replayer.
//
// A sculpting gesture is stored as a DeformAction (where, which way, how far,
// how wide) instead of the vertex positions it produced. Replaying the action
// log in order against the regenerated base mesh rebuilds the sculpt.
//
// Per action:
//   displacement = normalize(direction) * distance   (negated for pull)
//   for each vertex with d = |p - point| < brush_size:
//       p += displacement * (1 - d / brush_size)^FALLOFF_EXPONENT

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use super::error::{ClayError, Result};
use super::mesh::Mesh;
use super::serde_vec3::Vec3Def;

/// Decimal places kept for point, direction and distance.
pub const POSITION_DECIMALS: i32 = 3;
/// Decimal places kept for brush size.
pub const BRUSH_DECIMALS: i32 = 2;
/// Response curve applied to the linear falloff weight.
pub const FALLOFF_EXPONENT: f32 = 0.6;

/// Estimated serialized size of one action.
pub const ACTION_BYTES: usize = 45;
/// Estimated size of one raw vertex (3 × f32).
pub const VERTEX_BYTES: usize = 12;
/// Upload size the storage network accepts without payment.
pub const FREE_TIER_LIMIT_BYTES: usize = 100 * 1024;

// ============================================================================
// ACTION
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeformKind {
    /// Move the surface along the stroke direction.
    Push,
    /// Move the surface against the stroke direction.
    Pull,
}

/// One recorded sculpting gesture. All continuous fields are already
/// quantized; build through [`record_deform_action`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeformAction {
    #[serde(rename = "type")]
    pub kind: DeformKind,
    #[serde(with = "Vec3Def")]
    pub point: Vec3,
    /// Raw stroke vector; not unit length.
    #[serde(with = "Vec3Def")]
    pub direction: Vec3,
    pub distance: f32,
    pub brush_size: f32,
    /// Capture time in milliseconds since the Unix epoch. Replay ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

impl DeformAction {
    /// Effective per-vertex displacement at full weight.
    pub fn displacement(&self) -> Vec3 {
        let offset = self.direction.normalize_or_zero() * self.distance;
        match self.kind {
            DeformKind::Push => offset,
            DeformKind::Pull => -offset,
        }
    }

    /// Name of the first non-finite field, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        if !self.point.is_finite() {
            Some("point")
        } else if !self.direction.is_finite() {
            Some("direction")
        } else if !self.distance.is_finite() {
            Some("distance")
        } else if !self.brush_size.is_finite() {
            Some("brushSize")
        } else {
            None
        }
    }
}

/// Round half up to `decimals` places.
///
/// Done in f64 so the decimal boundary is exact for every f32 input, then
/// stored as f32. serde_json writes f32 in shortest round-trip form, so the
/// stored value survives save/load bit for bit.
pub fn quantize(value: f32, decimals: i32) -> f32 {
    let scale = 10f64.powi(decimals);
    ((value as f64 * scale + 0.5).floor() / scale) as f32
}

fn quantize_vec3(v: Vec3, decimals: i32) -> Vec3 {
    Vec3::new(quantize(v.x, decimals), quantize(v.y, decimals), quantize(v.z, decimals))
}

/// Package a live gesture as a persistable action. Pure.
///
/// Gestures that quantize to NaN or an infinity (including lengths that
/// overflow f32) are refused, since JSON cannot carry them back.
pub fn record_deform_action(
    kind: DeformKind,
    hit_point: Vec3,
    movement: Vec3,
    brush_size: f32,
) -> Result<DeformAction> {
    let action = DeformAction {
        kind,
        point: quantize_vec3(hit_point, POSITION_DECIMALS),
        direction: quantize_vec3(movement, POSITION_DECIMALS),
        distance: quantize(movement.length(), POSITION_DECIMALS),
        brush_size: quantize(brush_size, BRUSH_DECIMALS),
        timestamp: None,
    };
    match action.non_finite_field() {
        Some(field) => Err(ClayError::NonFiniteStroke { field }),
        None => Ok(action),
    }
}

/// [`record_deform_action`] with a capture time attached.
pub fn record_deform_action_at(
    kind: DeformKind,
    hit_point: Vec3,
    movement: Vec3,
    brush_size: f32,
    timestamp: u64,
) -> Result<DeformAction> {
    Ok(DeformAction {
        timestamp: Some(timestamp),
        ..record_deform_action(kind, hit_point, movement, brush_size)?
    })
}

// ============================================================================
// REPLAY
// ============================================================================

/// Apply one action to the positions only.
fn displace_vertices(positions: &mut [Vec3], action: &DeformAction) {
    let radius = action.brush_size;
    if !(radius > 0.0) {
        return;
    }
    let displacement = action.displacement();

    for p in positions.iter_mut() {
        let dist = p.distance(action.point);
        if dist < radius {
            let weight = (1.0 - dist / radius).powf(FALLOFF_EXPONENT);
            *p += displacement * weight;
        }
    }
}

/// Replay `actions` in order against `mesh`, mutating its positions in place.
///
/// Vertices are visited in buffer order and actions in slice order, so the
/// same base mesh and log always give the same bits. Normals and bounds are
/// recomputed once at the end.
pub fn apply_deform_actions(mesh: &mut Mesh, actions: &[DeformAction]) {
    for action in actions {
        displace_vertices(&mut mesh.positions, action);
    }
    mesh.refresh_derived();

    debug!(
        "apply_deform_actions: {} actions over {} vertices",
        actions.len(),
        mesh.vertex_count(),
    );
}

/// Reject actions carrying NaN or infinities before any replay happens.
pub fn validate_actions(actions: &[DeformAction]) -> Result<()> {
    for (index, action) in actions.iter().enumerate() {
        if let Some(field) = action.non_finite_field() {
            return Err(ClayError::NonFiniteValue { index, field });
        }
    }
    Ok(())
}

/// Decode and validate a bare JSON action array.
pub fn decode_actions(json: &str) -> Result<Vec<DeformAction>> {
    let actions: Vec<DeformAction> = serde_json::from_str(json).map_err(ClayError::Decode)?;
    validate_actions(&actions)?;
    Ok(actions)
}

// ============================================================================
// SIZE ESTIMATES
// ============================================================================

/// Advisory size of an action log.
pub fn calculate_action_data_size(actions: &[DeformAction]) -> usize {
    actions.len() * ACTION_BYTES
}

/// Advisory size of storing `vertex_count` raw positions instead.
pub fn calculate_vertex_data_size(vertex_count: usize) -> usize {
    vertex_count * VERTEX_BYTES
}

/// Action-log size versus raw-vertex size for one object. Display only.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StorageEstimate {
    pub action_bytes: usize,
    pub vertex_bytes: usize,
}

impl StorageEstimate {
    pub fn new(actions: &[DeformAction], vertex_count: usize) -> Self {
        Self {
            action_bytes: calculate_action_data_size(actions),
            vertex_bytes: calculate_vertex_data_size(vertex_count),
        }
    }

    /// Fraction saved by storing actions, e.g. 0.9 for a 10× smaller log.
    /// Zero (or negative) when the action log is not smaller.
    pub fn savings_ratio(&self) -> f64 {
        if self.vertex_bytes == 0 {
            return 0.0;
        }
        1.0 - self.action_bytes as f64 / self.vertex_bytes as f64
    }

    pub fn fits_free_tier(&self) -> bool {
        self.action_bytes <= FREE_TIER_LIMIT_BYTES
    }
}
