use std::collections::HashMap;

use glam::Mat4;

use crate::gltf::BufferTarget;
use crate::renderer::backend::{AttributeInput, GraphicsBackend, IndexedDraw};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload { buffer: u32, target: BufferTarget, len: usize },
    Delete(u32),
    BindVertexSource(Option<u32>),
    BindIndexSource(Option<u32>),
    SetAttributeInput(AttributeInput),
    DisableAttributeInput(u32),
    SetModelTransform(Mat4),
    DrawIndexed(IndexedDraw),
}

/// Records every call instead of talking to a GPU. Buffers are numbered from
/// 1, so 0 never names a live buffer, like in GL.
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub uploads: HashMap<u32, Vec<u8>>,
    pub inputs: HashMap<String, u32>,
    next_buffer: u32,
}

impl RecordingBackend {
    /// A backend whose program has all three standard inputs.
    pub fn new() -> RecordingBackend {
        RecordingBackend::with_inputs(&[("in_vertex", 0), ("in_normal", 1), ("in_texcoord", 2)])
    }

    pub fn with_inputs(inputs: &[(&str, u32)]) -> RecordingBackend {
        RecordingBackend {
            calls: Vec::new(),
            uploads: HashMap::new(),
            inputs: inputs
                .iter()
                .map(|&(name, slot)| (name.to_string(), slot))
                .collect(),
            next_buffer: 1,
        }
    }

    pub fn draws(&self) -> Vec<&IndexedDraw> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::DrawIndexed(draw) => Some(draw),
                _ => None,
            })
            .collect()
    }

    pub fn enabled_inputs(&self) -> Vec<&AttributeInput> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::SetAttributeInput(input) => Some(input),
                _ => None,
            })
            .collect()
    }

    pub fn model_transforms(&self) -> Vec<Mat4> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::SetModelTransform(transform) => Some(*transform),
                _ => None,
            })
            .collect()
    }
}

impl GraphicsBackend for RecordingBackend {
    type Buffer = u32;

    fn upload_static_buffer(&mut self, target: BufferTarget, bytes: &[u8]) -> u32 {
        let buffer = self.next_buffer;
        self.next_buffer += 1;
        self.uploads.insert(buffer, bytes.to_vec());
        self.calls.push(Call::Upload {
            buffer,
            target,
            len: bytes.len(),
        });
        buffer
    }

    fn delete_buffer(&mut self, buffer: u32) {
        self.uploads.remove(&buffer);
        self.calls.push(Call::Delete(buffer));
    }

    fn attribute_location(&self, name: &str) -> Option<u32> {
        self.inputs.get(name).copied()
    }

    fn bind_vertex_source(&mut self, buffer: Option<u32>) {
        self.calls.push(Call::BindVertexSource(buffer));
    }

    fn bind_index_source(&mut self, buffer: Option<u32>) {
        self.calls.push(Call::BindIndexSource(buffer));
    }

    fn set_attribute_input(&mut self, input: &AttributeInput) {
        self.calls.push(Call::SetAttributeInput(input.clone()));
    }

    fn disable_attribute_input(&mut self, slot: u32) {
        self.calls.push(Call::DisableAttributeInput(slot));
    }

    fn set_model_transform(&mut self, transform: &Mat4) {
        self.calls.push(Call::SetModelTransform(*transform));
    }

    fn draw_indexed(&mut self, draw: &IndexedDraw) {
        self.calls.push(Call::DrawIndexed(draw.clone()));
    }
}
