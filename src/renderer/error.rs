use thiserror::Error;

use crate::gltf::ComponentType;

pub type Result<T, E = RenderError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("accessor {accessor} on buffer view {view} is sparse, which is not supported")]
    SparseAccessor { accessor: usize, view: usize },
    #[error("accessor {accessor} is a {shape}, only SCALAR and VEC2-4 can be vertex attributes")]
    UnsupportedShape { accessor: usize, shape: &'static str },
    #[error("primitive mode {0} is not supported")]
    UnsupportedDrawMode(usize),
    #[error("component type {0} is not supported")]
    UnsupportedComponentType(usize),
    #[error("accessor {accessor} has component type {component_type:?}, which can't be used for indices")]
    IndexComponentType {
        accessor: usize,
        component_type: ComponentType,
    },
    #[error("the asset has no scenes")]
    NoScenes,
    #[error("{kind} index {index} is out of range")]
    OutOfRange { kind: &'static str, index: usize },
    #[error("index accessor {accessor} has {count} elements, more than one draw call can take")]
    IndexCountOutOfRange { accessor: usize, count: usize },
    #[error("buffer view {view} was not uploaded to the GPU")]
    MissingViewResource { view: usize },
    #[error("accessor {accessor} has no buffer view")]
    AccessorWithoutView { accessor: usize },
    #[error("can't derive a byte stride for accessor {accessor} (stride {stride:?}, element size {element_size})")]
    StrideDerivation {
        accessor: usize,
        stride: Option<usize>,
        element_size: usize,
    },
    #[error("buffer view {view} does not fit in buffer {buffer}")]
    ViewOutOfBounds { view: usize, buffer: usize },
    #[error("compiling {stage} shader failed: {log}")]
    ShaderCompile { stage: &'static str, log: String },
    #[error("linking shader program failed: {log}")]
    ProgramLink { log: String },
    #[error("node {node}, mesh {mesh}, primitive {primitive}: {source}")]
    Primitive {
        node: usize,
        mesh: usize,
        primitive: usize,
        source: Box<RenderError>,
    },
}

pub(crate) fn lookup<'a, T>(items: &'a [T], kind: &'static str, index: usize) -> Result<&'a T> {
    items.get(index).ok_or(RenderError::OutOfRange { kind, index })
}
