use crate::assets::AssetError;
use bytemuck::{Pod, Zeroable};
use std::path::{Path, PathBuf};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl ModelVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ModelVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
        ],
    };
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SkyVertex {
    pub position: [f32; 3],
}

impl SkyVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SkyVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
    };
}

/// Texture files a sub-mesh samples, resolved against the OBJ's directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialData {
    pub diffuse: Option<PathBuf>,
    pub specular: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub material: Option<usize>,
}

/// A model as read from disk, before upload.
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
    pub materials: Vec<MaterialData>,
}

impl ModelData {
    /// Read an OBJ (and its MTL, if any). Texture coordinates are flipped to
    /// a top-left origin.
    pub fn load_obj(path: &Path) -> Result<Self, AssetError> {
        let (models, materials) =
            tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|source| AssetError::Model {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let materials = match materials {
            Ok(materials) => materials
                .iter()
                .map(|m| MaterialData {
                    diffuse: m.diffuse_texture.as_ref().map(|t| base.join(t)),
                    specular: m.specular_texture.as_ref().map(|t| base.join(t)),
                })
                .collect(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "material library unavailable: {e}");
                Vec::new()
            }
        };

        let meshes: Vec<MeshData> = models
            .iter()
            .map(|m| mesh_from_obj(&m.mesh))
            .filter(|m| !m.indices.is_empty())
            .collect();
        if meshes.is_empty() {
            return Err(AssetError::EmptyModel {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(
            path = %path.display(),
            meshes = meshes.len(),
            materials = materials.len(),
            "model loaded"
        );
        Ok(Self { meshes, materials })
    }
}

/// Convert one OBJ mesh. Missing normals point up; missing UVs are zero.
pub fn mesh_from_obj(mesh: &tobj::Mesh) -> MeshData {
    let vertex_count = mesh.positions.len() / 3;
    let vertices = (0..vertex_count)
        .map(|i| {
            let position = [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ];
            let normal = if mesh.normals.len() >= (i + 1) * 3 {
                [
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                ]
            } else {
                [0.0, 1.0, 0.0]
            };
            let uv = if mesh.texcoords.len() >= (i + 1) * 2 {
                [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            ModelVertex {
                position,
                normal,
                uv,
            }
        })
        .collect();

    MeshData {
        vertices,
        indices: mesh.indices.clone(),
        material: mesh.material_id,
    }
}

/// Unit skybox cube: 8 corners, 36 indices.
pub fn skybox_mesh() -> (Vec<SkyVertex>, Vec<u16>) {
    #[rustfmt::skip]
    let corners = [
        [-1.0, -1.0,  1.0],
        [ 1.0, -1.0,  1.0],
        [ 1.0, -1.0, -1.0],
        [-1.0, -1.0, -1.0],
        [-1.0,  1.0,  1.0],
        [ 1.0,  1.0,  1.0],
        [ 1.0,  1.0, -1.0],
        [-1.0,  1.0, -1.0],
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        1, 2, 5, 5, 2, 6, // right
        0, 4, 7, 7, 3, 0, // left
        4, 5, 6, 6, 7, 4, // top
        0, 3, 2, 2, 1, 0, // bottom
        0, 1, 5, 5, 4, 0, // back
        3, 7, 6, 6, 2, 3, // front
    ];
    let vertices = corners.iter().map(|&position| SkyVertex { position }).collect();
    (vertices, indices)
}

/// One uploaded sub-mesh.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    /// Index into the owning model's material bind groups.
    pub material: usize,
}

/// A model on the GPU: sub-meshes plus one bind group per material. The
/// last bind group is the fallback for meshes without a material.
pub struct GpuModel {
    pub meshes: Vec<GpuMesh>,
    pub materials: Vec<wgpu::BindGroup>,
}

impl GpuModel {
    pub fn upload(
        device: &wgpu::Device,
        label: &str,
        data: &ModelData,
        materials: Vec<wgpu::BindGroup>,
    ) -> Self {
        let fallback = materials.len().saturating_sub(1);
        let meshes = data
            .meshes
            .iter()
            .map(|mesh| GpuMesh {
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label}_vertex_buffer")),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label}_index_buffer")),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: mesh.indices.len() as u32,
                material: mesh
                    .material
                    .filter(|&m| m < fallback)
                    .unwrap_or(fallback),
            })
            .collect();
        Self { meshes, materials }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        for mesh in &self.meshes {
            pass.set_bind_group(1, &self.materials[mesh.material], &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

/// Skybox cube with its cubemap bind group.
pub struct GpuSkybox {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    bind_group: wgpu::BindGroup,
}

impl GpuSkybox {
    pub fn new(device: &wgpu::Device, bind_group: wgpu::BindGroup) -> Self {
        let (vertices, indices) = skybox_mesh();
        Self {
            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("skybox_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("skybox_index_buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: indices.len() as u32,
            bind_group,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
