//! The GPU operations the renderer needs. [`GlBackend`](super::GlBackend)
//! issues them to OpenGL ES; tests record them instead.

use std::fmt::Debug;

use glam::Mat4;

use crate::gltf::{BufferTarget, ComponentType};

#[cfg(test)]
pub mod recording;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Points,
    Lines,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Layout of one vertex attribute input, sourced from the currently bound
/// vertex buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInput {
    pub slot: u32,
    pub components: i32,
    pub component_type: ComponentType,
    pub normalized: bool,
    pub stride: usize,
    pub offset: usize,
}

/// An indexed draw from the currently bound index buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDraw {
    pub topology: Topology,
    pub count: usize,
    pub index_type: ComponentType,
    pub offset: usize,
}

pub trait GraphicsBackend {
    type Buffer: Copy + Debug + PartialEq;

    /// Creates a buffer that is written once and never changed.
    fn upload_static_buffer(&mut self, target: BufferTarget, bytes: &[u8]) -> Self::Buffer;
    fn delete_buffer(&mut self, buffer: Self::Buffer);
    /// The slot of the named input of the active shader program, if the
    /// program has one.
    fn attribute_location(&self, name: &str) -> Option<u32>;
    fn bind_vertex_source(&mut self, buffer: Option<Self::Buffer>);
    fn bind_index_source(&mut self, buffer: Option<Self::Buffer>);
    /// Configures and enables an input.
    fn set_attribute_input(&mut self, input: &AttributeInput);
    fn disable_attribute_input(&mut self, slot: u32);
    fn set_model_transform(&mut self, transform: &Mat4);
    fn draw_indexed(&mut self, draw: &IndexedDraw);
}
