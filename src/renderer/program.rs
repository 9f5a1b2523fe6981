use std::fs;
use std::path::Path;

use anyhow::Context;
use log::{debug, warn};

use crate::renderer::attributes::Semantic;
use crate::renderer::error::Result;
use crate::renderer::gl;

/// The uniform the accumulated node transform is written to.
pub const MODEL_TRANSFORM_UNIFORM: &str = "model_transform";

/// A linked shader program for drawing glTF models. The vertex shader takes
/// its inputs as `in_vertex`, `in_normal` and `in_texcoord`, any of which
/// may be left out.
pub struct ShaderProgram {
    pub program: gl::types::GLuint,
    pub model_transform_location: Option<gl::types::GLint>,
}

impl ShaderProgram {
    pub fn from_sources(vertex_source: &str, fragment_source: &str) -> Result<ShaderProgram> {
        let vertex_shader = gl::create_shader(gl::VERTEX_SHADER, vertex_source)?;
        let fragment_shader = match gl::create_shader(gl::FRAGMENT_SHADER, fragment_source) {
            Ok(shader) => shader,
            Err(err) => {
                gl::call!(gl::DeleteShader(vertex_shader));
                return Err(err);
            }
        };
        let program = gl::create_program(&[vertex_shader, fragment_shader]);
        gl::call!(gl::DeleteShader(vertex_shader));
        gl::call!(gl::DeleteShader(fragment_shader));
        let program = program?;

        let model_transform_location = gl::get_uniform_location(program, MODEL_TRANSFORM_UNIFORM);
        if model_transform_location.is_none() {
            warn!("the shader program has no {MODEL_TRANSFORM_UNIFORM} uniform, node transforms won't be visible");
        }
        if gl::get_attrib_location(program, Semantic::Position.shader_input()).is_none() {
            warn!("the shader program has no {} input", Semantic::Position.shader_input());
        }
        debug!("linked shader program {program}");
        Ok(ShaderProgram {
            program,
            model_transform_location,
        })
    }

    /// Compiles the vertex and fragment shaders at the given paths.
    pub fn from_files(vertex_path: &Path, fragment_path: &Path) -> anyhow::Result<ShaderProgram> {
        let vertex_source = fs::read_to_string(vertex_path)
            .with_context(|| format!("failed to read vertex shader {}", vertex_path.display()))?;
        let fragment_source = fs::read_to_string(fragment_path)
            .with_context(|| format!("failed to read fragment shader {}", fragment_path.display()))?;
        let program = ShaderProgram::from_sources(&vertex_source, &fragment_source)?;
        Ok(program)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        gl::call!(gl::DeleteProgram(self.program));
    }
}
