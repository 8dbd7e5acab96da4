// src/engine_lib/model_loader.rs

use std::path::Path;

use glam::Mat4;

use crate::engine_lib::scene_types::{MeshData, ModelFragment};
use crate::error::{ViewerError, ViewerResult};

/// Imports a `.gltf`/`.glb` file and returns one fragment per root node of
/// its default scene.
pub fn load_model(path: impl AsRef<Path>) -> ViewerResult<Vec<ModelFragment>> {
    let path = path.as_ref();
    log::info!("Loading model {}", path.display());
    let (document, buffers, _images) = gltf::import(path)?;
    fragments_from_document(&document, &buffers)
}

/// Same as [`load_model`] for an in-memory GLB or embedded glTF.
pub fn load_model_from_slice(bytes: &[u8]) -> ViewerResult<Vec<ModelFragment>> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    fragments_from_document(&document, &buffers)
}

fn fragments_from_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> ViewerResult<Vec<ModelFragment>> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(ViewerError::EmptyModel)?;

    let fragments: Vec<ModelFragment> = scene.nodes().map(|node| read_node(&node, buffers)).collect();
    if fragments.is_empty() {
        return Err(ViewerError::EmptyModel);
    }
    log::info!("Model has {} root nodes", fragments.len());
    Ok(fragments)
}

fn read_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> ModelFragment {
    let name = node.name().unwrap_or_default().to_string();
    let transform = Mat4::from_cols_array_2d(&node.transform().matrix());

    let mut mesh = MeshData::default();
    if let Some(gltf_mesh) = node.mesh() {
        for primitive in gltf_mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!("Skipping non-triangle primitive in '{}'", name);
                continue;
            }
            append_primitive(&primitive, buffers, &mut mesh);
        }
    }

    let children = node.children().map(|child| read_node(&child, buffers)).collect();
    ModelFragment { name, transform, mesh, children }
}

fn append_primitive(primitive: &gltf::Primitive, buffers: &[gltf::buffer::Data], mesh: &mut MeshData) {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));
    let Some(positions) = reader.read_positions() else {
        return;
    };
    let positions: Vec<[f32; 3]> = positions.collect();
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let mut primitive_mesh = MeshData { positions, normals: Vec::new(), indices };
    match reader.read_normals() {
        Some(normals) => primitive_mesh.normals = normals.collect(),
        None => primitive_mesh.compute_normals(),
    }
    if primitive_mesh.normals.len() != primitive_mesh.positions.len() {
        primitive_mesh.compute_normals();
    }
    mesh.append_transformed(&primitive_mesh, Mat4::IDENTITY);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_model_error() {
        let err = load_model_from_slice(b"definitely not a model").unwrap_err();
        assert!(matches!(err, ViewerError::Model(_)));
    }

    #[test]
    fn nodes_without_meshes_still_become_fragments() {
        let json = r#"{
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [ { "nodes": [0, 1] } ],
            "nodes": [
                { "name": "floor", "translation": [0.0, -1.5, 0.0], "children": [2] },
                { "name": "sealing", "translation": [0.0, 1.5, 0.0] },
                { "name": "trim" }
            ]
        }"#;
        let fragments = load_model_from_slice(json.as_bytes()).unwrap();

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].name, "floor");
        assert_eq!(fragments[0].transform.w_axis.y, -1.5);
        assert_eq!(fragments[0].children.len(), 1);
        assert_eq!(fragments[0].children[0].name, "trim");
        assert!(fragments[1].mesh.is_empty());
    }

    #[test]
    fn document_without_scenes_is_empty_model() {
        let json = r#"{ "asset": { "version": "2.0" } }"#;
        let err = load_model_from_slice(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ViewerError::EmptyModel));
    }
}
