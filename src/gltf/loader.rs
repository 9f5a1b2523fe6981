use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context};
use glam::{Mat4, Quat, Vec3};
use log::{debug, warn};
use tinyjson::JsonValue;

use crate::gltf::{
    Accessor, Asset, Buffer, BufferTarget, BufferView, ComponentType, ElementShape, Mesh, Mode,
    Node, NodeTransform, Primitive, Scene,
};
use crate::renderer::RenderError;

type JsonObject = HashMap<String, JsonValue>;

/// Reads a `.gltf` file and its companion binary blob. The blob is offered to
/// the loader under its file name, so a buffer whose `uri` names it (with or
/// without a leading directory) resolves to it.
pub fn load_gltf_files(gltf_path: &Path, binary_path: &Path) -> anyhow::Result<Asset> {
    let gltf = fs::read_to_string(gltf_path)
        .with_context(|| format!("failed to read glTF file {}", gltf_path.display()))?;
    let binary = fs::read(binary_path)
        .with_context(|| format!("failed to read binary file {}", binary_path.display()))?;
    let binary_name = binary_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    load_gltf(&gltf, &[(binary_name, &binary)])
        .with_context(|| format!("failed to load glTF {}", gltf_path.display()))
}

/// Parses glTF 2.0 JSON into an [`Asset`]. `resources` holds the external
/// buffers by uri; the GLB binary chunk goes under the empty name.
pub fn load_gltf(gltf: &str, resources: &[(&str, &[u8])]) -> anyhow::Result<Asset> {
    let gltf = gltf
        .parse::<JsonValue>()
        .map_err(|err| anyhow!("invalid glTF JSON: {err}"))?;
    let gltf = take_object(&gltf).context("the glTF root is not an object")?;

    if let Some(asset_info) = gltf.get("asset").and_then(|asset| asset.get::<JsonObject>()) {
        match asset_info.get("version").and_then(|v| v.get::<String>()) {
            Some(version) if version.starts_with("2.") => {}
            Some(version) => warn!("glTF version {version} is not 2.x, loading anyway"),
            None => warn!("glTF asset has no version"),
        }
    }
    if let Some(extension) = take_array(gltf, "extensionsRequired")?.first() {
        let extension = extension.get::<String>().map(String::as_str);
        bail!("required extension {} is not supported", extension.unwrap_or("?"));
    }
    for extension in take_array(gltf, "extensionsUsed")? {
        if let Some(extension) = extension.get::<String>() {
            warn!("ignoring extension {extension}");
        }
    }

    let buffers = take_array(gltf, "buffers")?
        .iter()
        .enumerate()
        .map(|(i, buffer)| load_buffer(i, buffer, resources).with_context(|| format!("buffer {i}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let buffer_views = take_array(gltf, "bufferViews")?
        .iter()
        .enumerate()
        .map(|(i, view)| load_buffer_view(view).with_context(|| format!("buffer view {i}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let accessors = take_array(gltf, "accessors")?
        .iter()
        .enumerate()
        .map(|(i, accessor)| load_accessor(accessor).with_context(|| format!("accessor {i}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let meshes = take_array(gltf, "meshes")?
        .iter()
        .enumerate()
        .map(|(i, mesh)| load_mesh(mesh).with_context(|| format!("mesh {i}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let nodes = take_array(gltf, "nodes")?
        .iter()
        .enumerate()
        .map(|(i, node)| load_node(node).with_context(|| format!("node {i}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let scenes = take_array(gltf, "scenes")?
        .iter()
        .enumerate()
        .map(|(i, scene)| {
            let scene = take_object(scene)?;
            let nodes = take_array(scene, "nodes")?
                .iter()
                .map(take_usize)
                .collect::<anyhow::Result<Vec<_>>>()
                .with_context(|| format!("scene {i}"))?;
            Ok(Scene { nodes })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let default_scene = take_optional_usize(gltf, "scene")?;

    let asset = Asset {
        buffers,
        buffer_views,
        accessors,
        meshes,
        nodes,
        scenes,
        default_scene,
    };
    validate(&asset)?;
    debug!(
        "loaded glTF with {} buffer views, {} accessors, {} meshes, {} nodes, {} scenes",
        asset.buffer_views.len(),
        asset.accessors.len(),
        asset.meshes.len(),
        asset.nodes.len(),
        asset.scenes.len(),
    );
    Ok(asset)
}

fn load_buffer(i: usize, buffer: &JsonValue, resources: &[(&str, &[u8])]) -> anyhow::Result<Buffer> {
    let buffer = take_object(buffer)?;
    let uri = match buffer.get("uri") {
        Some(uri) => uri.get::<String>().context("uri is not a string")?.as_str(),
        None if i == 0 => "", // The BIN chunk of GLBs
        None => bail!("buffer has no uri"),
    };
    if uri.starts_with("data:") {
        bail!("embedded data uris are not supported");
    }
    let file_name = Path::new(uri)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(uri);
    let data = resources
        .iter()
        .find(|(name, _)| *name == uri)
        .or_else(|| resources.iter().find(|(name, _)| *name == file_name))
        .map(|(_, data)| *data)
        .with_context(|| format!("could not find buffer with uri \"{uri}\""))?;
    let byte_length = take_required_usize(buffer, "byteLength")?;
    ensure!(
        byte_length <= data.len(),
        "byteLength is {byte_length}, but \"{uri}\" is only {} bytes",
        data.len(),
    );
    Ok(Buffer {
        data: data[..byte_length].to_vec(),
    })
}

fn load_buffer_view(view: &JsonValue) -> anyhow::Result<BufferView> {
    let view = take_object(view)?;
    let target = match take_optional_usize(view, "target")? {
        Some(target) => Some(
            u32::try_from(target)
                .ok()
                .and_then(BufferTarget::from_gl)
                .with_context(|| format!("unknown target {target}"))?,
        ),
        None => None,
    };
    Ok(BufferView {
        buffer: take_required_usize(view, "buffer")?,
        byte_offset: take_optional_usize(view, "byteOffset")?.unwrap_or(0),
        byte_length: take_required_usize(view, "byteLength")?,
        byte_stride: take_optional_usize(view, "byteStride")?,
        target,
    })
}

fn load_accessor(accessor: &JsonValue) -> anyhow::Result<Accessor> {
    let accessor = take_object(accessor)?;
    let component_type = take_required_usize(accessor, "componentType")?;
    let component_type = u32::try_from(component_type)
        .ok()
        .and_then(ComponentType::from_gl)
        .ok_or(RenderError::UnsupportedComponentType(component_type))?;
    let shape = accessor
        .get("type")
        .and_then(|type_| type_.get::<String>())
        .context("missing type")?;
    let shape = ElementShape::from_name(shape)
        .with_context(|| format!("unexpected accessor type \"{shape}\""))?;
    let normalized = match accessor.get("normalized") {
        Some(normalized) => *normalized.get::<bool>().context("normalized is not a bool")?,
        None => false,
    };
    Ok(Accessor {
        buffer_view: take_optional_usize(accessor, "bufferView")?,
        byte_offset: take_optional_usize(accessor, "byteOffset")?.unwrap_or(0),
        component_type,
        shape,
        count: take_required_usize(accessor, "count")?,
        byte_stride: None,
        normalized,
        sparse: accessor.contains_key("sparse"),
    })
}

fn load_mesh(mesh: &JsonValue) -> anyhow::Result<Mesh> {
    let mesh = take_object(mesh)?;
    let primitives = take_array(mesh, "primitives")?
        .iter()
        .enumerate()
        .map(|(i, primitive)| load_primitive(primitive).with_context(|| format!("primitive {i}")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Mesh { primitives })
}

fn load_primitive(primitive: &JsonValue) -> anyhow::Result<Primitive> {
    let primitive = take_object(primitive)?;
    let attributes = primitive
        .get("attributes")
        .context("missing attributes")?
        .get::<JsonObject>()
        .context("attributes is not an object")?
        .iter()
        .map(|(name, accessor)| Ok((name.clone(), take_usize(accessor)?)))
        .collect::<anyhow::Result<BTreeMap<_, _>>>()?;
    let mode = take_optional_usize(primitive, "mode")?.unwrap_or(4);
    let mode = u32::try_from(mode)
        .ok()
        .and_then(Mode::from_gl)
        .ok_or(RenderError::UnsupportedDrawMode(mode))?;
    Ok(Primitive {
        attributes,
        indices: take_optional_usize(primitive, "indices")?,
        mode,
    })
}

fn load_node(node: &JsonValue) -> anyhow::Result<Node> {
    let node = take_object(node)?;
    let children = take_array(node, "children")?
        .iter()
        .map(take_usize)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let transform = if let Some(matrix) = node.get("matrix") {
        NodeTransform::Matrix(Mat4::from_cols_array(&take_floats::<16>(matrix)?))
    } else if ["translation", "rotation", "scale"]
        .iter()
        .any(|key| node.contains_key(*key))
    {
        let translation = match node.get("translation") {
            Some(translation) => Vec3::from_array(take_floats(translation)?),
            None => Vec3::ZERO,
        };
        let rotation = match node.get("rotation") {
            Some(rotation) => Quat::from_array(take_floats(rotation)?),
            None => Quat::IDENTITY,
        };
        let scale = match node.get("scale") {
            Some(scale) => Vec3::from_array(take_floats(scale)?),
            None => Vec3::ONE,
        };
        NodeTransform::Decomposed {
            translation,
            rotation,
            scale,
        }
    } else {
        NodeTransform::Identity
    };
    Ok(Node {
        transform,
        mesh: take_optional_usize(node, "mesh")?,
        children,
    })
}

/// Checks the cross references, so that the renderer only has to deal with
/// in-range indices.
fn validate(asset: &Asset) -> anyhow::Result<()> {
    for (i, view) in asset.buffer_views.iter().enumerate() {
        if view.bytes(&asset.buffers).is_none() {
            return Err(RenderError::ViewOutOfBounds {
                view: i,
                buffer: view.buffer,
            }
            .into());
        }
    }
    for (i, accessor) in asset.accessors.iter().enumerate() {
        if let Some(view) = accessor.buffer_view {
            check_index("buffer view", view, asset.buffer_views.len())
                .with_context(|| format!("accessor {i}"))?;
        }
    }
    for (i, mesh) in asset.meshes.iter().enumerate() {
        for (j, primitive) in mesh.primitives.iter().enumerate() {
            for &accessor in primitive.attributes.values().chain(primitive.indices.iter()) {
                check_index("accessor", accessor, asset.accessors.len())
                    .with_context(|| format!("mesh {i} primitive {j}"))?;
            }
        }
    }
    for (i, node) in asset.nodes.iter().enumerate() {
        if let Some(mesh) = node.mesh {
            check_index("mesh", mesh, asset.meshes.len()).with_context(|| format!("node {i}"))?;
        }
        for &child in &node.children {
            check_index("node", child, asset.nodes.len()).with_context(|| format!("node {i}"))?;
        }
        if matches!(node.transform, NodeTransform::Decomposed { .. }) {
            warn!("node {i} uses translation/rotation/scale, which is not applied when rendering");
        }
    }
    for (i, scene) in asset.scenes.iter().enumerate() {
        for &node in &scene.nodes {
            check_index("node", node, asset.nodes.len()).with_context(|| format!("scene {i}"))?;
        }
    }
    if let Some(scene) = asset.default_scene {
        check_index("scene", scene, asset.scenes.len())?;
    }
    Ok(())
}

fn check_index(kind: &'static str, index: usize, len: usize) -> Result<(), RenderError> {
    if index < len {
        Ok(())
    } else {
        Err(RenderError::OutOfRange { kind, index })
    }
}

fn take_object(json_value: &JsonValue) -> anyhow::Result<&JsonObject> {
    json_value.get().context("expected an object")
}

/// Returns the array under `key`, or an empty slice if the key is missing.
fn take_array<'a>(object: &'a JsonObject, key: &str) -> anyhow::Result<&'a [JsonValue]> {
    match object.get(key) {
        Some(value) => value
            .get::<Vec<JsonValue>>()
            .map(Vec::as_slice)
            .with_context(|| format!("{key} is not an array")),
        None => Ok(&[]),
    }
}

/// Return usize if JsonValue is a non-negative integer.
fn take_usize(json_value: &JsonValue) -> anyhow::Result<usize> {
    let number = *json_value.get::<f64>().context("expected a number")?;
    ensure!(
        number >= 0.0 && number.fract() == 0.0,
        "expected a non-negative integer, got {number}",
    );
    Ok(number as usize)
}

fn take_optional_usize(object: &JsonObject, key: &str) -> anyhow::Result<Option<usize>> {
    object
        .get(key)
        .map(take_usize)
        .transpose()
        .with_context(|| format!("invalid {key}"))
}

fn take_required_usize(object: &JsonObject, key: &str) -> anyhow::Result<usize> {
    take_optional_usize(object, key)?.with_context(|| format!("missing {key}"))
}

fn take_floats<const N: usize>(json_value: &JsonValue) -> anyhow::Result<[f32; N]> {
    let values: &Vec<JsonValue> = json_value.get().context("expected an array")?;
    ensure!(values.len() == N, "expected {N} numbers, got {}", values.len());
    let mut floats = [0.0; N];
    for (float, value) in floats.iter_mut().zip(values) {
        *float = *value.get::<f64>().context("expected a number")? as f32;
    }
    Ok(floats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gltf::tests_support::{triangle_bytes, TRIANGLE_GLTF};

    fn load_triangle(json: &str) -> anyhow::Result<Asset> {
        let bytes = triangle_bytes();
        load_gltf(json, &[("triangle.bin", &bytes)])
    }

    #[test]
    fn loads_the_triangle() {
        let asset = load_triangle(TRIANGLE_GLTF).unwrap();
        assert_eq!(asset.buffers[0].data.len(), 42);
        assert_eq!(asset.buffer_views.len(), 2);
        assert_eq!(asset.buffer_views[0].target, Some(BufferTarget::Vertex));
        assert_eq!(asset.buffer_views[1].target, Some(BufferTarget::Index));
        assert_eq!(asset.buffer_views[1].byte_offset, 36);
        assert_eq!(asset.accessors[0].shape, ElementShape::Vec3);
        assert_eq!(asset.accessors[0].component_type, ComponentType::Float);
        assert_eq!(asset.accessors[1].component_type, ComponentType::UnsignedShort);
        assert!(!asset.accessors[0].sparse);
        let primitive = &asset.meshes[0].primitives[0];
        assert_eq!(primitive.attributes.get("POSITION"), Some(&0));
        assert_eq!(primitive.indices, Some(1));
        assert_eq!(primitive.mode, Mode::Triangles);
        assert_eq!(asset.nodes[0].transform, NodeTransform::Identity);
        assert_eq!(asset.scenes[0].nodes, vec![0]);
        assert_eq!(asset.default_scene, None);
    }

    #[test]
    fn buffer_uri_matches_by_file_name() {
        let json = TRIANGLE_GLTF.replace("\"triangle.bin\"", "\"models/triangle.bin\"");
        assert!(load_triangle(&json).is_ok());
    }

    #[test]
    fn missing_buffer_is_an_error() {
        let bytes = triangle_bytes();
        let err = load_gltf(TRIANGLE_GLTF, &[("other.bin", &bytes)]).unwrap_err();
        assert!(format!("{err:#}").contains("triangle.bin"));
    }

    #[test]
    fn matrix_is_column_major() {
        let json = TRIANGLE_GLTF.replace(
            "{ \"mesh\": 0 }",
            "{ \"mesh\": 0, \"matrix\": [1,0,0,0, 0,1,0,0, 0,0,1,0, 5,6,7,1] }",
        );
        let asset = load_triangle(&json).unwrap();
        let expected = Mat4::from_translation(Vec3::new(5.0, 6.0, 7.0));
        assert_eq!(asset.nodes[0].transform, NodeTransform::Matrix(expected));
    }

    #[test]
    fn translation_is_recorded_as_decomposed() {
        let json = TRIANGLE_GLTF.replace("{ \"mesh\": 0 }", "{ \"mesh\": 0, \"translation\": [1,2,3] }");
        let asset = load_triangle(&json).unwrap();
        assert_eq!(
            asset.nodes[0].transform,
            NodeTransform::Decomposed {
                translation: Vec3::new(1.0, 2.0, 3.0),
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
            }
        );
    }

    #[test]
    fn sparse_flag_is_recorded() {
        let json = TRIANGLE_GLTF.replace(
            "\"count\": 3, \"type\": \"VEC3\"",
            "\"count\": 3, \"type\": \"VEC3\", \"sparse\": { \"count\": 0 }",
        );
        let asset = load_triangle(&json).unwrap();
        assert!(asset.accessors[0].sparse);
    }

    #[test]
    fn line_strip_is_rejected() {
        let json = TRIANGLE_GLTF.replace("\"mode\": 4", "\"mode\": 3");
        let err = load_triangle(&json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::UnsupportedDrawMode(3))
        ));
    }

    #[test]
    fn view_past_the_end_of_its_buffer_is_rejected() {
        let json = TRIANGLE_GLTF.replace("\"byteLength\": 6", "\"byteLength\": 8");
        let err = load_triangle(&json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::ViewOutOfBounds { view: 1, buffer: 0 })
        ));
    }

    #[test]
    fn out_of_range_child_is_rejected() {
        let json = TRIANGLE_GLTF.replace("{ \"mesh\": 0 }", "{ \"mesh\": 0, \"children\": [7] }");
        let err = load_triangle(&json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::OutOfRange { kind: "node", index: 7 })
        ));
    }

    #[test]
    fn required_extensions_are_rejected() {
        let json = TRIANGLE_GLTF.replacen('{', "{ \"extensionsRequired\": [\"KHR_draco_mesh_compression\"],", 1);
        let err = load_triangle(&json).unwrap_err();
        assert!(err.to_string().contains("KHR_draco_mesh_compression"));
    }

    #[test]
    fn values_too_large_for_gl_enums_are_rejected() {
        let json = TRIANGLE_GLTF.replace("\"mode\": 4", "\"mode\": 4294967300");
        let err = load_triangle(&json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::UnsupportedDrawMode(4294967300))
        ));

        let json = TRIANGLE_GLTF.replace("\"componentType\": 5123", "\"componentType\": 4294972419");
        let err = load_triangle(&json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::UnsupportedComponentType(4294972419))
        ));

        let json = TRIANGLE_GLTF.replace("\"target\": 34962", "\"target\": 4294998258");
        let err = load_triangle(&json).unwrap_err();
        assert!(format!("{err:#}").contains("unknown target 4294998258"));
    }

    #[test]
    fn padded_buffer_is_truncated_to_its_byte_length() {
        let mut bytes = triangle_bytes();
        bytes.extend_from_slice(&[0; 6]);
        let asset = load_gltf(TRIANGLE_GLTF, &[("triangle.bin", &bytes)]).unwrap();
        assert_eq!(asset.buffers[0].data.len(), 42);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let bytes = triangle_bytes();
        let err = load_gltf(TRIANGLE_GLTF, &[("triangle.bin", &bytes[..40])]).unwrap_err();
        assert!(format!("{err:#}").contains("byteLength is 42"));
    }

    #[test]
    fn default_scene_is_read() {
        let json = TRIANGLE_GLTF
            .replace("\"scenes\": [ { \"nodes\": [0] } ],", "\"scene\": 1, \"scenes\": [ { \"nodes\": [] }, { \"nodes\": [0] } ],");
        let asset = load_triangle(&json).unwrap();
        assert_eq!(asset.default_scene, Some(1));
        assert_eq!(asset.scenes.len(), 2);
    }

    #[test]
    fn out_of_range_default_scene_is_rejected() {
        let json = TRIANGLE_GLTF.replace("\"scenes\": [", "\"scene\": 5, \"scenes\": [");
        let err = load_triangle(&json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::OutOfRange { kind: "scene", index: 5 })
        ));
    }
}
