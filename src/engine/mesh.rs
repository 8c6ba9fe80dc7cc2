// Triangle mesh types shared by the shape generator and the deform replayer.
//
// Data flow:
//   create_detailed_geometry() → Mesh → prepare_geometry_for_deformation() → Mesh
//   → apply_deform_actions() (in place) → to_render_mesh() → RenderMesh → GPU

use glam::Vec3;

// ============================================================================
// GPU VERTEX
// ============================================================================

/// GPU-ready vertex with position and normal.
///   @location(0) position: vec3<f32>
///   @location(1) normal:   vec3<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal:   [f32; 3],
}

impl GpuVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Layout for the clay pipeline's single vertex buffer.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Axis-aligned bounding box. An empty box has `min > max` on every axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.min = aabb.min.min(*p);
            aabb.max = aabb.max.max(*p);
        }
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() { Vec3::ZERO } else { (self.min + self.max) * 0.5 }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() { Vec3::ZERO } else { self.max - self.min }
    }
}

impl Default for Aabb {
    fn default() -> Self { Self::EMPTY }
}

/// Bounding sphere centered on the bounding box center.
/// An empty sphere has a negative radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub const EMPTY: BoundingSphere = BoundingSphere {
        center: Vec3::ZERO,
        radius: -1.0,
    };

    pub fn is_empty(&self) -> bool { self.radius < 0.0 }
}

impl Default for BoundingSphere {
    fn default() -> Self { Self::EMPTY }
}

// ============================================================================
// MESH
// ============================================================================

/// Indexed triangle mesh in local object space.
///
/// `positions` is the vertex buffer sculpting mutates. `normals`, `bounding_box`
/// and `bounding_sphere` are derived; call [`Mesh::refresh_derived`] after
/// editing positions by hand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions:       Vec<Vec3>,
    pub normals:         Vec<Vec3>,
    pub indices:         Vec<u32>,  // 3 per triangle, CCW seen from outside
    pub bounding_box:    Aabb,
    pub bounding_sphere: BoundingSphere,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, pos: Vec3) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(pos);
        idx
    }

    /// Add a triangle by vertex indices (CCW order).
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn vertex_count(&self) -> usize { self.positions.len() }

    pub fn triangle_count(&self) -> usize { self.indices.len() / 3 }

    /// Iterate triangles as index triplets.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Non-uniform scale of every position. Derived data is left stale.
    pub fn scale(&mut self, factor: Vec3) {
        for p in &mut self.positions {
            *p *= factor;
        }
    }

    /// Recompute smooth per-vertex normals.
    ///
    /// Face normals are accumulated unnormalized, so the cross product
    /// magnitude (2×triangle area) gives area weighting for free.
    /// Vertices that touch no triangle, or only degenerate ones, get a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut normal_accum: Vec<Vec3> = vec![Vec3::ZERO; self.positions.len()];

        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let pa = self.positions[a];
            let weighted_normal = (self.positions[b] - pa).cross(self.positions[c] - pa);
            normal_accum[a] += weighted_normal;
            normal_accum[b] += weighted_normal;
            normal_accum[c] += weighted_normal;
        }

        self.normals = normal_accum.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    pub fn compute_bounding_box(&mut self) {
        self.bounding_box = Aabb::from_points(&self.positions);
    }

    /// Sphere around the bounding box center that encloses every vertex.
    pub fn compute_bounding_sphere(&mut self) {
        let bounds = Aabb::from_points(&self.positions);
        if bounds.is_empty() {
            self.bounding_sphere = BoundingSphere::EMPTY;
            return;
        }
        let center = bounds.center();
        let max_dist_sq = self.positions.iter()
            .map(|p| center.distance_squared(*p))
            .fold(0.0f32, f32::max);
        self.bounding_sphere = BoundingSphere { center, radius: max_dist_sq.sqrt() };
    }

    /// Recompute normals, bounding box and bounding sphere.
    pub fn refresh_derived(&mut self) {
        self.compute_vertex_normals();
        self.compute_bounding_box();
        self.compute_bounding_sphere();
    }

    /// Build the interleaved GPU buffers for the current geometry.
    pub fn to_render_mesh(&self) -> RenderMesh {
        let vertices = self.positions.iter()
            .enumerate()
            .map(|(i, p)| GpuVertex {
                position: p.to_array(),
                normal:   self.normals.get(i).copied().unwrap_or(Vec3::ZERO).to_array(),
            })
            .collect();

        RenderMesh { vertices, indices: self.indices.clone() }
    }
}

// ============================================================================
// RENDER MESH
// ============================================================================

/// Sculpted mesh flattened for the renderer: interleaved position/normal
/// vertices plus u32 indices.
pub struct RenderMesh {
    pub vertices: Vec<GpuVertex>,
    pub indices:  Vec<u32>,
}

impl RenderMesh {
    pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn index_count(&self) -> usize { self.indices.len() }

    /// Create the vertex and index buffers for one clay object.
    pub fn upload(&self, device: &wgpu::Device, label: &str) -> ClayBuffers {
        use wgpu::util::DeviceExt;

        let vertex_label = format!("{label} vertices");
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(vertex_label.as_str()),
            contents: self.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_label = format!("{label} indices");
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(index_label.as_str()),
            contents: self.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        ClayBuffers {
            vertex_buffer,
            index_buffer,
            vertex_count: self.vertices.len(),
            index_count: self.indices.len() as u32,
        }
    }

    /// Push re-deformed vertices into buffers from an earlier `upload`.
    ///
    /// Strokes only move vertices, so the index buffer stays valid. Returns
    /// false (and writes nothing) when the vertex count no longer matches.
    pub fn write_vertices(&self, queue: &wgpu::Queue, buffers: &ClayBuffers) -> bool {
        if self.vertices.len() != buffers.vertex_count {
            return false;
        }
        queue.write_buffer(&buffers.vertex_buffer, 0, self.vertex_bytes());
        true
    }
}

/// GPU buffers for one uploaded clay object.
pub struct ClayBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer:  wgpu::Buffer,
    pub vertex_count:  usize,
    pub index_count:   u32,
}

impl ClayBuffers {
    /// Bind both buffers and issue one indexed draw. The pipeline must use
    /// [`GpuVertex::layout`] at slot 0.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), RenderMesh::INDEX_FORMAT);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
        mesh
    }

    #[test]
    fn test_normals_point_along_ccw_face_normal() {
        let mut mesh = unit_quad();
        mesh.refresh_derived();
        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_bounds_of_quad() {
        let mut mesh = unit_quad();
        mesh.refresh_derived();
        assert_eq!(mesh.bounding_box.min, Vec3::ZERO);
        assert_eq!(mesh.bounding_box.max, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.bounding_sphere.center, Vec3::new(0.5, 0.5, 0.0));
        assert!((mesh.bounding_sphere.radius - 0.5f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_empty_mesh_derived_data() {
        let mut mesh = Mesh::new();
        mesh.refresh_derived();
        assert!(mesh.normals.is_empty());
        assert!(mesh.bounding_box.is_empty());
        assert!(mesh.bounding_sphere.is_empty());
    }

    #[test]
    fn test_unreferenced_vertex_gets_zero_normal() {
        let mut mesh = unit_quad();
        mesh.add_vertex(Vec3::splat(5.0));
        mesh.compute_vertex_normals();
        assert_eq!(mesh.normals[4], Vec3::ZERO);
    }

    #[test]
    fn test_render_mesh_byte_sizes() {
        let mut mesh = unit_quad();
        mesh.refresh_derived();
        let render = mesh.to_render_mesh();
        assert_eq!(render.vertex_bytes().len(), 4 * 24);
        assert_eq!(render.index_bytes().len(), 6 * 4);
        assert_eq!(render.index_count(), 6);
    }

    #[test]
    fn test_vertex_layout_matches_gpu_vertex() {
        let layout = GpuVertex::layout();
        assert_eq!(layout.array_stride, std::mem::size_of::<GpuVertex>() as u64);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);

        let attrs: Vec<_> = layout.attributes.iter()
            .map(|a| (a.shader_location, a.offset, a.format))
            .collect();
        assert_eq!(attrs, vec![
            (0, 0, wgpu::VertexFormat::Float32x3),
            (1, 12, wgpu::VertexFormat::Float32x3),
        ]);

        // Index bytes are read back with the advertised format.
        let mut mesh = unit_quad();
        mesh.refresh_derived();
        let render = mesh.to_render_mesh();
        assert_eq!(RenderMesh::INDEX_FORMAT, wgpu::IndexFormat::Uint32);
        assert_eq!(render.index_bytes().len(), render.index_count() * std::mem::size_of::<u32>());
        // Normals are interleaved after each position.
        let floats: &[f32] = bytemuck::cast_slice(render.vertex_bytes());
        assert_eq!(&floats[3..6], &mesh.normals[0].to_array());
    }
}
