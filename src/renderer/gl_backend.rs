use std::ffi::c_void;

use glam::Mat4;

use crate::gltf::BufferTarget;
use crate::renderer::backend::{AttributeInput, GraphicsBackend, IndexedDraw, Topology};
use crate::renderer::gl;
use crate::renderer::program::ShaderProgram;

/// Draws with OpenGL ES 3.0 using a single shader program. Requires a
/// current GL context with loaded function pointers.
pub struct GlBackend {
    program: ShaderProgram,
    vao: gl::types::GLuint,
}

impl GlBackend {
    pub fn new(program: ShaderProgram) -> GlBackend {
        let mut vao = 0;
        gl::call!(gl::GenVertexArrays(1, &mut vao));
        gl::call!(gl::BindVertexArray(vao));
        gl::call!(gl::UseProgram(program.program));
        gl::call!(gl::Enable(gl::DEPTH_TEST));
        GlBackend { program, vao }
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }
}

fn gl_target(target: BufferTarget) -> gl::types::GLenum {
    match target {
        BufferTarget::Vertex => gl::ARRAY_BUFFER,
        BufferTarget::Index => gl::ELEMENT_ARRAY_BUFFER,
    }
}

fn gl_topology(topology: Topology) -> gl::types::GLenum {
    match topology {
        Topology::Points => gl::POINTS,
        Topology::Lines => gl::LINES,
        Topology::LineLoop => gl::LINE_LOOP,
        Topology::Triangles => gl::TRIANGLES,
        Topology::TriangleStrip => gl::TRIANGLE_STRIP,
        Topology::TriangleFan => gl::TRIANGLE_FAN,
    }
}

impl GraphicsBackend for GlBackend {
    type Buffer = gl::types::GLuint;

    fn upload_static_buffer(&mut self, target: BufferTarget, bytes: &[u8]) -> gl::types::GLuint {
        let target = gl_target(target);
        let mut buffer = 0;
        gl::call!(gl::GenBuffers(1, &mut buffer));
        gl::call!(gl::BindBuffer(target, buffer));
        gl::buffer_data(target, bytes, gl::STATIC_DRAW);
        gl::call!(gl::BindBuffer(target, 0));
        buffer
    }

    fn delete_buffer(&mut self, buffer: gl::types::GLuint) {
        gl::call!(gl::DeleteBuffers(1, &buffer));
    }

    fn attribute_location(&self, name: &str) -> Option<u32> {
        gl::get_attrib_location(self.program.program, name)
    }

    fn bind_vertex_source(&mut self, buffer: Option<gl::types::GLuint>) {
        gl::call!(gl::BindBuffer(gl::ARRAY_BUFFER, buffer.unwrap_or(0)));
    }

    fn bind_index_source(&mut self, buffer: Option<gl::types::GLuint>) {
        gl::call!(gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, buffer.unwrap_or(0)));
    }

    fn set_attribute_input(&mut self, input: &AttributeInput) {
        let stride = gl::types::GLsizei::try_from(input.stride);
        debug_assert!(stride.is_ok(), "stride {} does not fit in a GLsizei", input.stride);
        gl::call!(gl::VertexAttribPointer(
            input.slot,
            input.components,
            input.component_type.to_gl(),
            if input.normalized { gl::TRUE } else { gl::FALSE },
            stride.unwrap_or(gl::types::GLsizei::MAX),
            input.offset as *const c_void,
        ));
        gl::call!(gl::EnableVertexAttribArray(input.slot));
    }

    fn disable_attribute_input(&mut self, slot: u32) {
        gl::call!(gl::DisableVertexAttribArray(slot));
    }

    fn set_model_transform(&mut self, transform: &Mat4) {
        if let Some(location) = self.program.model_transform_location {
            let columns = transform.to_cols_array();
            gl::call!(gl::UniformMatrix4fv(location, 1, gl::FALSE, columns.as_ptr()));
        }
        // glTF spec section 3.7.4: mirroring transforms flip the winding order.
        let front_face = if transform.determinant() > 0.0 { gl::CCW } else { gl::CW };
        gl::call!(gl::FrontFace(front_face));
    }

    fn draw_indexed(&mut self, draw: &IndexedDraw) {
        let count = gl::types::GLsizei::try_from(draw.count);
        debug_assert!(count.is_ok(), "index count {} does not fit in a GLsizei", draw.count);
        gl::call!(gl::DrawElements(
            gl_topology(draw.topology),
            count.unwrap_or(gl::types::GLsizei::MAX),
            draw.index_type.to_gl(),
            draw.offset as *const c_void,
        ));
    }
}

impl Drop for GlBackend {
    fn drop(&mut self) {
        gl::call!(gl::BindVertexArray(0));
        gl::call!(gl::DeleteVertexArrays(1, &self.vao));
    }
}
