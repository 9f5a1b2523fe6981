//! Small assets shared by the unit tests.

use std::collections::BTreeMap;

use glam::Mat4;

use crate::gltf::{
    Accessor, Asset, Buffer, BufferTarget, BufferView, ComponentType, ElementShape, Mesh, Mode,
    Node, NodeTransform, Primitive, Scene,
};

/// One triangle: three float VEC3 positions followed by three u16 indices.
pub const TRIANGLE_GLTF: &str = r#"{
    "asset": { "version": "2.0" },
    "scenes": [ { "nodes": [0] } ],
    "nodes": [ { "mesh": 0 } ],
    "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1, "mode": 4 } ] } ],
    "buffers": [ { "uri": "triangle.bin", "byteLength": 42 } ],
    "bufferViews": [
        { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
        { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
    ],
    "accessors": [
        { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
        { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
    ]
}"#;

pub fn triangle_bytes() -> Vec<u8> {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let indices: [u16; 3] = [0, 1, 2];
    let mut bytes = bytemuck::cast_slice::<f32, u8>(&positions).to_vec();
    bytes.extend_from_slice(bytemuck::cast_slice(&indices));
    bytes
}

pub fn position_accessor() -> Accessor {
    Accessor {
        buffer_view: Some(0),
        byte_offset: 0,
        component_type: ComponentType::Float,
        shape: ElementShape::Vec3,
        count: 3,
        byte_stride: None,
        normalized: false,
        sparse: false,
    }
}

pub fn index_accessor() -> Accessor {
    Accessor {
        buffer_view: Some(1),
        byte_offset: 0,
        component_type: ComponentType::UnsignedShort,
        shape: ElementShape::Scalar,
        count: 3,
        byte_stride: None,
        normalized: false,
        sparse: false,
    }
}

pub fn triangle_primitive() -> Primitive {
    Primitive {
        attributes: BTreeMap::from([("POSITION".to_string(), 0)]),
        indices: Some(1),
        mode: Mode::Triangles,
    }
}

/// The same asset as [`TRIANGLE_GLTF`], built without going through the loader.
pub fn triangle_asset() -> Asset {
    Asset {
        buffers: vec![Buffer {
            data: triangle_bytes(),
        }],
        buffer_views: vec![
            BufferView {
                buffer: 0,
                byte_offset: 0,
                byte_length: 36,
                byte_stride: None,
                target: Some(BufferTarget::Vertex),
            },
            BufferView {
                buffer: 0,
                byte_offset: 36,
                byte_length: 6,
                byte_stride: None,
                target: Some(BufferTarget::Index),
            },
        ],
        accessors: vec![position_accessor(), index_accessor()],
        meshes: vec![Mesh {
            primitives: vec![triangle_primitive()],
        }],
        nodes: vec![node(NodeTransform::Identity, Some(0), vec![])],
        scenes: vec![Scene { nodes: vec![0] }],
        default_scene: None,
    }
}

pub fn node(transform: NodeTransform, mesh: Option<usize>, children: Vec<usize>) -> Node {
    Node {
        transform,
        mesh,
        children,
    }
}

pub fn translation(x: f32, y: f32, z: f32) -> NodeTransform {
    NodeTransform::Matrix(Mat4::from_translation(glam::Vec3::new(x, y, z)))
}
