use glam::Mat4;
use log::trace;

use crate::gltf::{Asset, NodeTransform};
use crate::renderer::attributes::AttributeSlots;
use crate::renderer::backend::GraphicsBackend;
use crate::renderer::error::{lookup, RenderError, Result};
use crate::renderer::geometry_buffers::GeometryBuffers;
use crate::renderer::primitive::draw_primitive;

/// The accumulated transform from the scene root to the node being visited,
/// along with the transforms of its ancestors.
#[derive(Debug, Clone)]
pub struct TransformStack {
    saved: Vec<Mat4>,
    current: Mat4,
}

impl TransformStack {
    pub fn new() -> TransformStack {
        TransformStack {
            saved: Vec::new(),
            current: Mat4::IDENTITY,
        }
    }

    pub fn current(&self) -> Mat4 {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Applies a child transform: the parent's transform is on the left.
    pub fn compose(&mut self, transform: Mat4) {
        self.current *= transform;
    }

    pub fn pop(&mut self) {
        if let Some(parent) = self.saved.pop() {
            self.current = parent;
        }
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        TransformStack::new()
    }
}

/// Draws a scene by walking its node tree depth first. The node graph must
/// be acyclic; cycles are not detected.
#[derive(Debug, Default)]
pub struct SceneGraphTraverser {
    transforms: TransformStack,
}

impl SceneGraphTraverser {
    pub fn new() -> SceneGraphTraverser {
        SceneGraphTraverser::default()
    }

    pub fn transforms(&self) -> &TransformStack {
        &self.transforms
    }

    /// The scene that gets rendered: the asset's default scene, or the first
    /// one if it doesn't declare one.
    pub fn active_scene(asset: &Asset) -> Result<usize> {
        if asset.scenes.is_empty() {
            return Err(RenderError::NoScenes);
        }
        let scene = asset.default_scene.unwrap_or(0);
        lookup(&asset.scenes, "scene", scene)?;
        Ok(scene)
    }

    /// Renders the active scene. The vertex and index sources are unbound
    /// afterwards, also when rendering fails.
    pub fn render_scene<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        asset: &Asset,
        buffers: &GeometryBuffers<B>,
        slots: &AttributeSlots,
    ) -> Result<()> {
        let scene = &asset.scenes[Self::active_scene(asset)?];
        let mut result = Ok(());
        for &node in &scene.nodes {
            result = self.render_node(backend, asset, buffers, slots, node);
            if result.is_err() {
                break;
            }
        }
        backend.bind_vertex_source(None);
        backend.bind_index_source(None);
        debug_assert_eq!(self.transforms.depth(), 0);
        result
    }

    fn render_node<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        asset: &Asset,
        buffers: &GeometryBuffers<B>,
        slots: &AttributeSlots,
        node_index: usize,
    ) -> Result<()> {
        self.transforms.push();
        let result = self.visit_node(backend, asset, buffers, slots, node_index);
        self.transforms.pop();
        result
    }

    fn visit_node<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        asset: &Asset,
        buffers: &GeometryBuffers<B>,
        slots: &AttributeSlots,
        node_index: usize,
    ) -> Result<()> {
        let node = lookup(&asset.nodes, "node", node_index)?;
        match node.transform {
            NodeTransform::Matrix(matrix) => self.transforms.compose(matrix),
            NodeTransform::Identity => {}
            NodeTransform::Decomposed { .. } => {
                trace!("node {node_index}: translation/rotation/scale is not applied");
            }
        }

        if let Some(mesh_index) = node.mesh {
            let mesh = lookup(&asset.meshes, "mesh", mesh_index)?;
            backend.set_model_transform(&self.transforms.current());
            for (primitive_index, primitive) in mesh.primitives.iter().enumerate() {
                draw_primitive(backend, asset, primitive, buffers, slots).map_err(|source| {
                    RenderError::Primitive {
                        node: node_index,
                        mesh: mesh_index,
                        primitive: primitive_index,
                        source: Box::new(source),
                    }
                })?;
            }
        }

        for &child in &node.children {
            self.render_node(backend, asset, buffers, slots, child)?;
        }
        Ok(())
    }
}
