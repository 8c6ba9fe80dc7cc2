// Base primitives for clay objects.
//
// Every generator returns positions and CCW triangle indices only. Normals and
// bounds are filled in by the caller (see shapes::create_detailed_geometry),
// so all shapes go through the same recompute path.

use std::f32::consts::{PI, TAU};
use glam::Vec3;
use log::warn;
use super::mesh::Mesh;
use super::subdivide::midpoint_split;

/// Add a `segments_u` × `segments_v` quad grid centered on `center`.
/// `u_axis × v_axis` is the outward normal, which keeps the winding CCW.
#[allow(clippy::too_many_arguments)]
fn add_grid(
    mesh: &mut Mesh,
    center: Vec3,
    u_axis: Vec3,
    v_axis: Vec3,
    width: f32,
    height: f32,
    segments_u: u32,
    segments_v: u32,
) {
    let base = mesh.vertex_count() as u32;
    let row = segments_u + 1;

    for iv in 0..=segments_v {
        let v = iv as f32 / segments_v as f32 - 0.5;
        for iu in 0..=segments_u {
            let u = iu as f32 / segments_u as f32 - 0.5;
            mesh.add_vertex(center + u_axis * (u * width) + v_axis * (v * height));
        }
    }

    for iv in 0..segments_v {
        for iu in 0..segments_u {
            let a = base + iv * row + iu;       // bottom-left
            let b = a + 1;                      // bottom-right
            let c = a + row;                    // top-left
            let d = c + 1;                      // top-right
            mesh.add_triangle(a, b, d);
            mesh.add_triangle(a, d, c);
        }
    }
}

/// Regular tetrahedron with circumradius `radius`, tessellated `detail` times
/// with flat midpoint splits (faces stay planar).
///
/// Vertex layout before normalization:
///   0: (+1, +1, +1)
///   1: (-1, -1, +1)
///   2: (-1, +1, -1)
///   3: (+1, -1, -1)
pub fn generate_tetrahedron(radius: f32, detail: u32) -> Mesh {
    let mut mesh = Mesh::new();
    for corner in [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ] {
        mesh.add_vertex(corner.normalize() * radius);
    }

    mesh.add_triangle(2, 1, 0);
    mesh.add_triangle(0, 3, 2);
    mesh.add_triangle(1, 3, 0);
    mesh.add_triangle(2, 3, 1);

    for _ in 0..detail {
        mesh = midpoint_split(&mesh);
    }
    mesh
}

/// Axis-aligned box centered on the origin with `segments` grid divisions
/// per edge on each face. Faces keep their own vertex grids, so edges and
/// corners carry coincident vertices (welded later by subdivision).
pub fn generate_box(width: f32, height: f32, depth: f32, segments: u32) -> Mesh {
    let segments = segments.max(1);
    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);
    let mut mesh = Mesh::new();

    // (center, u axis, v axis, u extent, v extent); u × v points outward
    let faces = [
        (Vec3::X * hw,  Vec3::NEG_Z, Vec3::Y,     depth, height), // +X
        (Vec3::X * -hw, Vec3::Z,     Vec3::Y,     depth, height), // -X
        (Vec3::Y * hh,  Vec3::X,     Vec3::NEG_Z, width, depth),  // +Y
        (Vec3::Y * -hh, Vec3::X,     Vec3::Z,     width, depth),  // -Y
        (Vec3::Z * hd,  Vec3::X,     Vec3::Y,     width, height), // +Z
        (Vec3::Z * -hd, Vec3::NEG_X, Vec3::Y,     width, height), // -Z
    ];

    for (center, u_axis, v_axis, u_len, v_len) in faces {
        add_grid(&mut mesh, center, u_axis, v_axis, u_len, v_len, segments, segments);
    }
    mesh
}

/// Flat grid in the XY plane (z = 0) facing +Z.
pub fn generate_plane(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Mesh {
    let mut mesh = Mesh::new();
    add_grid(
        &mut mesh,
        Vec3::ZERO,
        Vec3::X,
        Vec3::Y,
        width,
        height,
        segments_x.max(1),
        segments_y.max(1),
    );
    mesh
}

/// Triangle-fan disc in the XY plane facing +Z.
///
/// Vertex 0 is the center; vertices 1..=segments+1 walk the rim
/// counter-clockwise from +X, the last one closing the loop on top of the first.
pub fn generate_disc(radius: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let mut mesh = Mesh::new();
    mesh.add_vertex(Vec3::ZERO);

    for s in 0..=segments {
        let angle = s as f32 / segments as f32 * TAU;
        mesh.add_vertex(Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0));
    }

    for i in 1..=segments {
        mesh.add_triangle(i, i + 1, 0);
    }
    mesh
}

/// Upper bound on either UV sphere segment count.
pub const MAX_SPHERE_SEGMENTS: u32 = 512;

fn clamp_segments(name: &str, value: u32, min: u32) -> u32 {
    if value > MAX_SPHERE_SEGMENTS {
        warn!("generate_uv_sphere: {name} must be <= {MAX_SPHERE_SEGMENTS} (got {value}), clamping");
    }
    value.clamp(min, MAX_SPHERE_SEGMENTS)
}

/// UV sphere with the poles on the Y axis.
///
/// Each ring holds `width_segments + 1` vertices (seam duplicated) and the
/// pole rings collapse to a point, so pole caps use one triangle per quad.
/// Segment counts are clamped to `3..=MAX_SPHERE_SEGMENTS` (width) and
/// `2..=MAX_SPHERE_SEGMENTS` (height).
pub fn generate_uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let width_segments = clamp_segments("width_segments", width_segments, 3);
    let height_segments = clamp_segments("height_segments", height_segments, 2);
    let row = width_segments + 1;
    let mut mesh = Mesh::new();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let (sin_phi, cos_phi) = (v * PI).sin_cos();
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (sin_theta, cos_theta) = (u * TAU).sin_cos();
            mesh.add_vertex(Vec3::new(
                -radius * cos_theta * sin_phi,
                radius * cos_phi,
                radius * sin_theta * sin_phi,
            ));
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.add_triangle(a, b, d);
            }
            if iy != height_segments - 1 {
                mesh.add_triangle(b, c, d);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every face normal should point away from the origin for closed,
    /// origin-centered primitives.
    fn assert_outward(mesh: &Mesh) {
        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (
                mesh.positions[a as usize],
                mesh.positions[b as usize],
                mesh.positions[c as usize],
            );
            let n = (pb - pa).cross(pc - pa);
            assert!(n.dot(pa + pb + pc) > 0.0, "inward face {a} {b} {c}");
        }
    }

    #[test]
    fn test_tetrahedron_counts_and_radius() {
        let mesh = generate_tetrahedron(2.0, 0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 4);
        for p in &mesh.positions {
            assert!((p.length() - 2.0).abs() < 1e-5);
        }

        let detailed = generate_tetrahedron(2.0, 1);
        assert_eq!(detailed.vertex_count(), 10);
        assert_eq!(detailed.triangle_count(), 16);
        assert_outward(&detailed);
    }

    #[test]
    fn test_box_counts() {
        let mesh = generate_box(1.0, 1.0, 1.0, 10);
        assert_eq!(mesh.vertex_count(), 6 * 11 * 11);
        assert_eq!(mesh.triangle_count(), 6 * 10 * 10 * 2);
        assert_outward(&mesh);
        for p in &mesh.positions {
            assert!(p.abs().max_element() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_plane_is_flat_and_faces_z() {
        let mesh = generate_plane(2.0, 2.0, 20, 20);
        assert_eq!(mesh.vertex_count(), 21 * 21);
        assert_eq!(mesh.triangle_count(), 20 * 20 * 2);
        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (
                mesh.positions[a as usize],
                mesh.positions[b as usize],
                mesh.positions[c as usize],
            );
            assert!((pb - pa).cross(pc - pa).z > 0.0);
        }
        assert!(mesh.positions.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_disc_layout() {
        let mesh = generate_disc(1.5, 16);
        assert_eq!(mesh.vertex_count(), 18);
        assert_eq!(mesh.triangle_count(), 16);
        assert_eq!(mesh.positions[0], Vec3::ZERO);
        for p in &mesh.positions[1..] {
            assert!((p.length() - 1.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_counts_and_radius() {
        let mesh = generate_uv_sphere(1.0, 8, 6);
        assert_eq!(mesh.vertex_count(), 9 * 7);
        // Pole rows contribute one triangle per quad, middle rows two.
        assert_eq!(mesh.triangle_count(), 8 * (2 * 6 - 2));
        for p in &mesh.positions {
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
        assert_outward(&mesh);
    }

    #[test]
    fn test_sphere_clamps_segment_counts() {
        let mesh = generate_uv_sphere(1.0, 0, 0);
        assert_eq!(mesh.vertex_count(), 4 * 3);

        // Would overflow the row arithmetic without the upper clamp.
        let mesh = generate_uv_sphere(1.0, u32::MAX, 4);
        let row = MAX_SPHERE_SEGMENTS as usize + 1;
        assert_eq!(mesh.vertex_count(), row * 5);
        assert_eq!(mesh.triangle_count(), MAX_SPHERE_SEGMENTS as usize * (2 * 4 - 2));
    }
}
