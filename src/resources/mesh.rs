use wgpu::util::DeviceExt;

use crate::data_structures::mesh::Mesh;

/// GPU copies of a mesh's vertex and index lists.
#[derive(Debug)]
pub struct MeshBuffers {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl MeshBuffers {
    /// Binds both buffers and draws all triangles once.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.num_elements, 0, 0..1);
    }
}

/**
 * Uploads `mesh` into freshly created vertex and index buffers.
 *
 * The vertices are copied as they are laid out in memory, so the pipeline has to
 * use [`crate::data_structures::mesh::VertexLayout::desc`] for its vertex state.
 */
pub fn upload_mesh(device: &wgpu::Device, mesh: &Mesh, name: &str) -> MeshBuffers {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", name)),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    MeshBuffers {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: mesh.indices.len() as u32,
    }
}
