// Shape generator: keyword + parameters → base mesh ready for sculpting.
//
// All per-shape constants live in ShapePolicy::for_shape so the mapping from
// keyword to tessellation is in one auditable place.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::error::{ClayError, Result};
use super::mesh::Mesh;
use super::primitives::{
    generate_box, generate_disc, generate_plane, generate_tetrahedron, generate_uv_sphere,
    MAX_SPHERE_SEGMENTS,
};
use super::serde_vec3::point_list;
use super::subdivide::subdivide;

pub const DEFAULT_THICKNESS: f32 = 1.0;
pub const DEFAULT_DETAIL: u32 = 32;
/// Largest `detail` accepted from stored data.
pub const MAX_DETAIL: u32 = MAX_SPHERE_SEGMENTS;

// ============================================================================
// SHAPE KIND
// ============================================================================

/// Primitive a clay object was created from.
///
/// Persisted as its keyword. Unrecognized keywords are kept verbatim in
/// `Other` and generate the sphere fallback.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeKind {
    Sphere,
    Cube,
    Rectangle,
    Triangle,
    Circle,
    Tetrahedron,
    Other(String),
}

impl ShapeKind {
    /// Lenient keyword mapping: anything unknown becomes `Other`.
    /// `box` and `plane` are accepted as aliases of `cube` and `rectangle`.
    pub fn from_keyword(keyword: &str) -> Self {
        Self::known(keyword).unwrap_or_else(|| ShapeKind::Other(keyword.to_string()))
    }

    fn known(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "sphere" => ShapeKind::Sphere,
            "cube" | "box" => ShapeKind::Cube,
            "rectangle" | "plane" => ShapeKind::Rectangle,
            "triangle" => ShapeKind::Triangle,
            "circle" => ShapeKind::Circle,
            "tetrahedron" => ShapeKind::Tetrahedron,
            _ => return None,
        })
    }

    pub fn keyword(&self) -> &str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cube => "cube",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Tetrahedron => "tetrahedron",
            ShapeKind::Other(keyword) => keyword,
        }
    }
}

/// Strict parsing: rejects keywords outside the known set.
impl FromStr for ShapeKind {
    type Err = ClayError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::known(s).ok_or_else(|| ClayError::UnknownShape(s.to_string()))
    }
}

impl From<String> for ShapeKind {
    fn from(keyword: String) -> Self {
        match Self::known(&keyword) {
            Some(kind) => kind,
            None => ShapeKind::Other(keyword),
        }
    }
}

impl From<ShapeKind> for String {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Other(keyword) => keyword,
            known => known.keyword().to_string(),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ============================================================================
// SHAPE PARAMS
// ============================================================================

fn default_thickness() -> f32 { DEFAULT_THICKNESS }
fn default_detail() -> u32 { DEFAULT_DETAIL }

/// Generation parameters stored alongside the shape keyword.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeParams {
    pub size: f32,
    /// Y scale for tetrahedron and cube; ignored by the other shapes.
    #[serde(default = "default_thickness")]
    pub thickness: f32,
    /// Sphere segment count; ignored by the other shapes.
    #[serde(default = "default_detail")]
    pub detail: u32,
    /// Explicit outline for non-parametric shapes. Persisted as-is; the
    /// parametric generators do not read it.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "point_list")]
    pub control_points: Option<Vec<Vec3>>,
}

impl ShapeParams {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            thickness: DEFAULT_THICKNESS,
            detail: DEFAULT_DETAIL,
            control_points: None,
        }
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_detail(mut self, detail: u32) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_control_points(mut self, points: Vec<Vec3>) -> Self {
        self.control_points = Some(points);
        self
    }

    /// Reject stored parameters that generation cannot honour. Negative sizes
    /// pass; generation clamps them to 0.
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() {
            return Err(ClayError::NonFiniteParam { field: "size" });
        }
        if !self.thickness.is_finite() {
            return Err(ClayError::NonFiniteParam { field: "thickness" });
        }
        if self.detail > MAX_DETAIL {
            return Err(ClayError::DetailOutOfRange { detail: self.detail, max: MAX_DETAIL });
        }
        if self.control_points.iter().flatten().any(|p| !p.is_finite()) {
            return Err(ClayError::NonFiniteParam { field: "controlPoints" });
        }
        Ok(())
    }
}

// ============================================================================
// POLICY TABLE
// ============================================================================

/// Base primitive and its fixed tessellation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BasePrimitive {
    /// Flat-tessellated tetrahedron, `detail` midpoint splits.
    Tetrahedron { detail: u32 },
    /// Box with `segments` divisions per edge on every axis.
    Box { segments: u32 },
    /// Square XY grid with `segments` × `segments` cells.
    Plane { segments: u32 },
    /// Disc warped into a rounded triangle.
    TriangleDisc { segments: u32 },
    Disc { segments: u32 },
    /// UV sphere using `ShapeParams::detail` for both segment counts.
    UvSphere,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShapePolicy {
    pub base: BasePrimitive,
    /// Whether `thickness` scales the Y axis.
    pub thickness_scales_y: bool,
    /// Midpoint subdivision levels applied by `prepare_geometry_for_deformation`.
    pub deform_subdivisions: u32,
}

impl ShapePolicy {
    pub fn for_shape(kind: &ShapeKind) -> Self {
        use BasePrimitive::*;
        let (base, thickness_scales_y, deform_subdivisions) = match kind {
            ShapeKind::Tetrahedron => (Tetrahedron { detail: 1 }, true, 3),
            ShapeKind::Cube => (Box { segments: 10 }, true, 2),
            ShapeKind::Rectangle => (Plane { segments: 20 }, false, 2),
            ShapeKind::Triangle => (TriangleDisc { segments: 32 }, false, 2),
            ShapeKind::Circle => (Disc { segments: 64 }, false, 2),
            ShapeKind::Sphere => (UvSphere, false, 0),
            ShapeKind::Other(_) => (UvSphere, false, 1),
        };
        Self { base, thickness_scales_y, deform_subdivisions }
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// Pull every disc vertex toward the center so the outline follows
/// `r(angle) = size / (1.5 + 0.5·cos(3·angle))`: three corners at full radius,
/// edge midpoints at half radius. The scale factor never exceeds 1.
fn warp_disc_to_triangle(mesh: &mut Mesh, size: f32) {
    if size <= 0.0 {
        return;
    }
    for p in &mut mesh.positions {
        let angle = p.y.atan2(p.x);
        let triangle_radius = size / (1.5 + 0.5 * (3.0 * angle).cos());
        let scale = (triangle_radius / size).min(1.0);
        p.x *= scale;
        p.y *= scale;
    }
}

/// Clamp a length parameter into `[0, ∞)`, logging when it had to change.
fn non_negative(name: &str, value: f32) -> f32 {
    if value >= 0.0 {
        value
    } else {
        warn!("create_detailed_geometry: {name} must be >= 0.0 (got {value}), clamping to 0.0");
        0.0
    }
}

/// Build the base mesh for `shape`.
///
/// Unknown shapes fall back to a UV sphere with `detail` segments. Normals,
/// bounding box and bounding sphere are always recomputed before returning.
/// Degenerate sizes never fail: they collapse the mesh toward the origin.
pub fn create_detailed_geometry(shape: &ShapeKind, size: f32, thickness: f32, detail: u32) -> Mesh {
    let size = non_negative("size", size);
    let thickness = non_negative("thickness", thickness);
    let policy = ShapePolicy::for_shape(shape);

    let mut mesh = match policy.base {
        BasePrimitive::Tetrahedron { detail } => generate_tetrahedron(size, detail),
        BasePrimitive::Box { segments } => generate_box(size, size, size, segments),
        BasePrimitive::Plane { segments } => generate_plane(size, size, segments, segments),
        BasePrimitive::TriangleDisc { segments } => {
            let mut disc = generate_disc(size, segments);
            warp_disc_to_triangle(&mut disc, size);
            disc
        }
        BasePrimitive::Disc { segments } => generate_disc(size, segments),
        BasePrimitive::UvSphere => generate_uv_sphere(size, detail, detail),
    };

    if policy.thickness_scales_y {
        mesh.scale(Vec3::new(1.0, thickness, 1.0));
    }
    mesh.refresh_derived();

    debug!(
        "create_detailed_geometry: {} size={} → {} vertices, {} triangles",
        shape,
        size,
        mesh.vertex_count(),
        mesh.triangle_count(),
    );
    mesh
}

/// `create_detailed_geometry` driven by stored parameters.
pub fn create_from_params(shape: &ShapeKind, params: &ShapeParams) -> Mesh {
    create_detailed_geometry(shape, params.size, params.thickness, params.detail)
}

/// Add vertex density where the base primitive is too sparse for smooth
/// local deformation. Spheres are returned unchanged.
pub fn prepare_geometry_for_deformation(mesh: &Mesh, shape: &ShapeKind) -> Mesh {
    subdivide(mesh, ShapePolicy::for_shape(shape).deform_subdivisions)
}
