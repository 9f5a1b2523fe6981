//! Draws an [`Asset`] through a [`GraphicsBackend`]: geometry is uploaded
//! and shader inputs are looked up once in [`Renderer::new`], after which
//! [`Renderer::render`] only walks the scene and issues draw calls.

use crate::gltf::Asset;

mod attributes;
mod backend;
mod error;
mod geometry_buffers;
pub mod gl;
mod gl_backend;
mod primitive;
mod program;
mod scene;

pub use attributes::{AttributeSlots, Semantic};
pub use backend::{AttributeInput, GraphicsBackend, IndexedDraw, Topology};
pub use error::{RenderError, Result};
pub use geometry_buffers::GeometryBuffers;
pub use gl_backend::GlBackend;
pub use primitive::{draw_primitive, effective_stride, topology};
pub use program::{ShaderProgram, MODEL_TRANSFORM_UNIFORM};
pub use scene::{SceneGraphTraverser, TransformStack};

/// Renders one asset with one shader program. The GPU buffers live as long
/// as the renderer.
pub struct Renderer<B: GraphicsBackend> {
    backend: B,
    buffers: GeometryBuffers<B>,
    slots: AttributeSlots,
    traverser: SceneGraphTraverser,
}

impl<B: GraphicsBackend> Renderer<B> {
    /// Uploads the asset's geometry and resolves the shader inputs. Fails
    /// without leaving anything uploaded.
    pub fn new(mut backend: B, asset: &Asset) -> Result<Renderer<B>> {
        let buffers = GeometryBuffers::prepare(&mut backend, asset)?;
        let slots = AttributeSlots::resolve(&backend);
        Ok(Renderer {
            backend,
            buffers,
            slots,
            traverser: SceneGraphTraverser::new(),
        })
    }

    /// Draws the active scene of the asset that was passed to [`Renderer::new`].
    pub fn render(&mut self, asset: &Asset) -> Result<()> {
        self.traverser
            .render_scene(&mut self.backend, asset, &self.buffers, &self.slots)
    }

    /// Looks the shader inputs up again. Needed after the backend switches
    /// to another program.
    pub fn refresh_attribute_slots(&mut self) {
        self.slots = AttributeSlots::resolve(&self.backend);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn slots(&self) -> &AttributeSlots {
        &self.slots
    }

    pub fn buffers(&self) -> &GeometryBuffers<B> {
        &self.buffers
    }
}

impl<B: GraphicsBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        self.buffers.release(&mut self.backend);
    }
}
