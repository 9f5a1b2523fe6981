//! The in-memory glTF 2.0 asset. Parsed once by [`load_gltf`], then only
//! read by the renderer.

use std::collections::BTreeMap;

use glam::{Mat4, Quat, Vec3};

mod loader;
#[cfg(test)]
pub(crate) mod tests_support;

pub use loader::{load_gltf, load_gltf_files};

/// `bufferView.target` value for vertex attribute data.
pub const ARRAY_BUFFER: u32 = 34962;
/// `bufferView.target` value for index data.
pub const ELEMENT_ARRAY_BUFFER: u32 = 34963;

#[derive(Debug, Default)]
pub struct Asset {
    pub buffers: Vec<Buffer>,
    pub buffer_views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    pub meshes: Vec<Mesh>,
    pub nodes: Vec<Node>,
    pub scenes: Vec<Scene>,
    /// The `scene` property. When it's missing, the first scene is rendered.
    pub default_scene: Option<usize>,
}

#[derive(Debug, Default)]
pub struct Buffer {
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Vertex,
    Index,
}

impl BufferTarget {
    pub fn from_gl(target: u32) -> Option<BufferTarget> {
        match target {
            ARRAY_BUFFER => Some(BufferTarget::Vertex),
            ELEMENT_ARRAY_BUFFER => Some(BufferTarget::Index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
    /// Views without a target are not uploaded to the GPU.
    pub target: Option<BufferTarget>,
}

impl BufferView {
    /// Returns the bytes this view covers, or None if the view does not fit
    /// in its buffer.
    pub fn bytes<'a>(&self, buffers: &'a [Buffer]) -> Option<&'a [u8]> {
        let buffer = buffers.get(self.buffer)?;
        let end = self.byte_offset.checked_add(self.byte_length)?;
        buffer.data.get(self.byte_offset..end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
}

impl ComponentType {
    pub fn from_gl(component_type: u32) -> Option<ComponentType> {
        match component_type {
            5120 => Some(ComponentType::Byte),
            5121 => Some(ComponentType::UnsignedByte),
            5122 => Some(ComponentType::Short),
            5123 => Some(ComponentType::UnsignedShort),
            5125 => Some(ComponentType::UnsignedInt),
            5126 => Some(ComponentType::Float),
            _ => None,
        }
    }

    /// The glTF `componentType` value, which is also the matching GL enum.
    pub fn to_gl(self) -> u32 {
        match self {
            ComponentType::Byte => 5120,
            ComponentType::UnsignedByte => 5121,
            ComponentType::Short => 5122,
            ComponentType::UnsignedShort => 5123,
            ComponentType::UnsignedInt => 5125,
            ComponentType::Float => 5126,
        }
    }

    pub fn size(self) -> usize {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort => 2,
            ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }

    pub fn is_index_type(self) -> bool {
        matches!(
            self,
            ComponentType::UnsignedByte | ComponentType::UnsignedShort | ComponentType::UnsignedInt
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementShape {
    pub fn from_name(name: &str) -> Option<ElementShape> {
        match name {
            "SCALAR" => Some(ElementShape::Scalar),
            "VEC2" => Some(ElementShape::Vec2),
            "VEC3" => Some(ElementShape::Vec3),
            "VEC4" => Some(ElementShape::Vec4),
            "MAT2" => Some(ElementShape::Mat2),
            "MAT3" => Some(ElementShape::Mat3),
            "MAT4" => Some(ElementShape::Mat4),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementShape::Scalar => "SCALAR",
            ElementShape::Vec2 => "VEC2",
            ElementShape::Vec3 => "VEC3",
            ElementShape::Vec4 => "VEC4",
            ElementShape::Mat2 => "MAT2",
            ElementShape::Mat3 => "MAT3",
            ElementShape::Mat4 => "MAT4",
        }
    }

    pub fn component_count(self) -> usize {
        match self {
            ElementShape::Scalar => 1,
            ElementShape::Vec2 => 2,
            ElementShape::Vec3 => 3,
            ElementShape::Vec4 | ElementShape::Mat2 => 4,
            ElementShape::Mat3 => 9,
            ElementShape::Mat4 => 16,
        }
    }

    /// The component count of a single vertex attribute input, or None for
    /// matrix shapes, which would need more than one input.
    pub fn vertex_components(self) -> Option<i32> {
        match self {
            ElementShape::Scalar => Some(1),
            ElementShape::Vec2 => Some(2),
            ElementShape::Vec3 => Some(3),
            ElementShape::Vec4 => Some(4),
            ElementShape::Mat2 | ElementShape::Mat3 | ElementShape::Mat4 => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Accessor {
    /// None means the accessor is all zeroes (or sparse-only), neither of
    /// which the renderer can bind.
    pub buffer_view: Option<usize>,
    pub byte_offset: usize,
    pub component_type: ComponentType,
    pub shape: ElementShape,
    pub count: usize,
    /// Overrides the buffer view's stride when set.
    pub byte_stride: Option<usize>,
    pub normalized: bool,
    pub sparse: bool,
}

impl Accessor {
    /// Size of one tightly packed element in bytes.
    pub fn element_size(&self) -> usize {
        self.component_type.size() * self.shape.component_count()
    }
}

/// Primitive topology, i.e. the `mode` of a mesh primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Points,
    Lines,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl Mode {
    /// Maps a glTF `mode` value. LINE_STRIP (3) is deliberately absent.
    pub fn from_gl(mode: u32) -> Option<Mode> {
        match mode {
            0 => Some(Mode::Points),
            1 => Some(Mode::Lines),
            2 => Some(Mode::LineLoop),
            4 => Some(Mode::Triangles),
            5 => Some(Mode::TriangleStrip),
            6 => Some(Mode::TriangleFan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Primitive {
    /// Semantic attribute name (e.g. `POSITION`) to accessor index.
    pub attributes: BTreeMap<String, usize>,
    pub indices: Option<usize>,
    pub mode: Mode,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeTransform {
    Identity,
    Matrix(Mat4),
    /// Parsed so it can be reported, but not composed when rendering.
    Decomposed {
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub transform: NodeTransform,
    pub mesh: Option<usize>,
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub nodes: Vec<usize>,
}
