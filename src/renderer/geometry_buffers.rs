use std::collections::HashMap;

use log::{debug, info};

use crate::gltf::Asset;
use crate::renderer::backend::GraphicsBackend;
use crate::renderer::error::{RenderError, Result};

/// The GPU buffers of an asset, one per buffer view that has a target.
pub struct GeometryBuffers<B: GraphicsBackend> {
    resources: HashMap<usize, B::Buffer>,
}

impl<B: GraphicsBackend> GeometryBuffers<B> {
    /// Uploads every bindable buffer view of the asset. Nothing is uploaded
    /// if any view is unusable, e.g. because a sparse accessor reads it.
    pub fn prepare(backend: &mut B, asset: &Asset) -> Result<GeometryBuffers<B>> {
        let mut uploads = Vec::with_capacity(asset.buffer_views.len());
        for (view_index, view) in asset.buffer_views.iter().enumerate() {
            let Some(target) = view.target else {
                debug!("skipping buffer view {view_index}, it has no target");
                continue;
            };
            let sparse_accessor = asset
                .accessors
                .iter()
                .position(|accessor| accessor.sparse && accessor.buffer_view == Some(view_index));
            if let Some(accessor) = sparse_accessor {
                return Err(RenderError::SparseAccessor {
                    accessor,
                    view: view_index,
                });
            }
            let bytes = view
                .bytes(&asset.buffers)
                .ok_or(RenderError::ViewOutOfBounds {
                    view: view_index,
                    buffer: view.buffer,
                })?;
            uploads.push((view_index, target, bytes));
        }

        let mut resources = HashMap::with_capacity(uploads.len());
        let mut total_bytes = 0;
        for (view_index, target, bytes) in uploads {
            let buffer = backend.upload_static_buffer(target, bytes);
            debug!("uploaded buffer view {view_index} ({} bytes) as {buffer:?}", bytes.len());
            total_bytes += bytes.len();
            resources.insert(view_index, buffer);
        }
        info!("uploaded {} buffer views, {total_bytes} bytes in total", resources.len());
        Ok(GeometryBuffers { resources })
    }

    /// The GPU buffer of the view. Views without a target don't have one.
    pub fn get(&self, view: usize) -> Result<B::Buffer> {
        self.resources
            .get(&view)
            .copied()
            .ok_or(RenderError::MissingViewResource { view })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Deletes all the buffers. Called once the asset is no longer drawn.
    pub fn release(&mut self, backend: &mut B) {
        for (_, buffer) in self.resources.drain() {
            backend.delete_buffer(buffer);
        }
    }
}
