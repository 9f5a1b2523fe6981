//! Command line configuration of the viewer.

use std::path::PathBuf;

use clap::Parser;

/// Renders the default scene of a glTF 2.0 model with the given shaders.
///
/// The vertex shader receives positions, normals and texture coordinates as
/// `in_vertex`, `in_normal` and `in_texcoord`, and the node transform as the
/// `model_transform` uniform.
#[derive(Parser, Debug, Clone)]
#[command(name = "gltf-viewer", version)]
pub struct ViewerConfig {
    /// Path to the .gltf model.
    pub model: PathBuf,

    /// Path to the .bin file holding the model's geometry.
    pub binary: PathBuf,

    /// Path to the GLSL vertex shader.
    pub vertex_shader: PathBuf,

    /// Path to the GLSL fragment shader.
    pub fragment_shader: PathBuf,

    /// Initial window width in pixels.
    #[arg(long, default_value_t = 500)]
    pub width: u32,

    /// Initial window height in pixels.
    #[arg(long, default_value_t = 500)]
    pub height: u32,

    /// Window title.
    #[arg(long, default_value = "glTF viewer")]
    pub title: String,

    /// Exit after rendering this many frames.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_frames: Option<u64>,

    /// Disable vertical sync.
    #[arg(long)]
    pub no_vsync: bool,
}

impl ViewerConfig {
    pub fn reached_frame_limit(&self, frames: u64) -> bool {
        self.max_frames.is_some_and(|max_frames| frames >= max_frames)
    }
}
