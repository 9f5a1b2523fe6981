use log::trace;

use crate::gltf::{Accessor, Asset, BufferView, Mode, Primitive};
use crate::renderer::attributes::{AttributeSlots, Semantic};
use crate::renderer::backend::{AttributeInput, GraphicsBackend, IndexedDraw, Topology};
use crate::renderer::error::{lookup, RenderError, Result};
use crate::renderer::geometry_buffers::GeometryBuffers;

pub fn topology(mode: Mode) -> Topology {
    match mode {
        Mode::Points => Topology::Points,
        Mode::Lines => Topology::Lines,
        Mode::LineLoop => Topology::LineLoop,
        Mode::Triangles => Topology::Triangles,
        Mode::TriangleStrip => Topology::TriangleStrip,
        Mode::TriangleFan => Topology::TriangleFan,
    }
}

/// Largest `byteStride` glTF allows.
pub const MAX_BYTE_STRIDE: usize = 252;

/// The distance between consecutive elements of the accessor. An explicit
/// stride must be a multiple of the component size, at least one element
/// wide and at most [`MAX_BYTE_STRIDE`]. Without one the data is assumed to
/// be tightly packed.
pub fn effective_stride(accessor_index: usize, accessor: &Accessor, view: &BufferView) -> Result<usize> {
    let element_size = accessor.element_size();
    match accessor.byte_stride.or(view.byte_stride) {
        None => Ok(element_size),
        Some(stride)
            if stride >= element_size
                && stride <= MAX_BYTE_STRIDE
                && stride % accessor.component_type.size() == 0 =>
        {
            Ok(stride)
        }
        stride => Err(RenderError::StrideDerivation {
            accessor: accessor_index,
            stride,
            element_size,
        }),
    }
}

/// Binds the primitive's attributes and indices and draws it. Primitives
/// without indices are not drawn. Every input enabled here is disabled again
/// before returning, whether the draw succeeded or not.
pub fn draw_primitive<B: GraphicsBackend>(
    backend: &mut B,
    asset: &Asset,
    primitive: &Primitive,
    buffers: &GeometryBuffers<B>,
    slots: &AttributeSlots,
) -> Result<()> {
    let Some(indices) = primitive.indices else {
        trace!("skipping a primitive without indices");
        return Ok(());
    };
    let mut enabled_slots = Vec::with_capacity(Semantic::ALL.len());
    let result = bind_and_draw(backend, asset, primitive, indices, buffers, slots, &mut enabled_slots);
    for slot in enabled_slots {
        backend.disable_attribute_input(slot);
    }
    result
}

fn bind_and_draw<B: GraphicsBackend>(
    backend: &mut B,
    asset: &Asset,
    primitive: &Primitive,
    indices: usize,
    buffers: &GeometryBuffers<B>,
    slots: &AttributeSlots,
    enabled_slots: &mut Vec<u32>,
) -> Result<()> {
    for (name, &accessor_index) in &primitive.attributes {
        let Some(semantic) = Semantic::from_name(name) else {
            continue;
        };
        let accessor = lookup(&asset.accessors, "accessor", accessor_index)?;
        let components = accessor
            .shape
            .vertex_components()
            .ok_or(RenderError::UnsupportedShape {
                accessor: accessor_index,
                shape: accessor.shape.name(),
            })?;
        let view_index = accessor.buffer_view.ok_or(RenderError::AccessorWithoutView {
            accessor: accessor_index,
        })?;
        let view = lookup(&asset.buffer_views, "buffer view", view_index)?;
        let stride = effective_stride(accessor_index, accessor, view)?;
        let Some(slot) = slots.slot(semantic) else {
            trace!("{name} has no shader input, not binding accessor {accessor_index}");
            continue;
        };
        backend.bind_vertex_source(Some(buffers.get(view_index)?));
        backend.set_attribute_input(&AttributeInput {
            slot,
            components,
            component_type: accessor.component_type,
            normalized: accessor.normalized,
            stride,
            offset: accessor.byte_offset,
        });
        enabled_slots.push(slot);
    }

    let accessor = lookup(&asset.accessors, "accessor", indices)?;
    if !accessor.component_type.is_index_type() {
        return Err(RenderError::IndexComponentType {
            accessor: indices,
            component_type: accessor.component_type,
        });
    }
    if i32::try_from(accessor.count).is_err() {
        return Err(RenderError::IndexCountOutOfRange {
            accessor: indices,
            count: accessor.count,
        });
    }
    let view_index = accessor
        .buffer_view
        .ok_or(RenderError::AccessorWithoutView { accessor: indices })?;
    backend.bind_index_source(Some(buffers.get(view_index)?));
    backend.draw_indexed(&IndexedDraw {
        topology: topology(primitive.mode),
        count: accessor.count,
        index_type: accessor.component_type,
        offset: accessor.byte_offset,
    });
    Ok(())
}
