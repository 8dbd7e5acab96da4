// src/engine_lib/assembler.rs

use glam::{Mat4, Vec3};

use crate::config::SceneConfig;
use crate::engine_lib::scene_types::{
    Light, Material, MaterialId, MeshData, ModelFragment, Part, PartTag, RoomParts, Scene,
};
use crate::error::ViewerResult;

pub const ROOM_MATERIAL_ID: MaterialId = 0;

/// Builds the static scene from loaded model fragments.
pub struct SceneAssembler {
    room_material: Material,
    lights: Vec<Light>,
}

impl SceneAssembler {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            room_material: Material {
                name: "room".to_string(),
                color: config.room_color,
            },
            lights: vec![
                Light::Ambient {
                    color: [1.0, 1.0, 1.0],
                    intensity: config.ambient_intensity,
                },
                Light::Point {
                    color: [1.0, 1.0, 1.0],
                    intensity: config.point_light_intensity,
                    position: Vec3::from(config.point_light_position),
                },
            ],
        }
    }

    /// Turns every top-level fragment into a part sharing the room material.
    /// Fragments named after a reserved tag are recorded in `RoomParts`; the
    /// first absent tag fails the whole load.
    pub fn assemble(&self, fragments: Vec<ModelFragment>) -> ViewerResult<Scene> {
        let mut parts = Vec::with_capacity(fragments.len());

        for fragment in fragments {
            let mut tag = PartTag::from_name(&fragment.name);
            if let Some(t) = tag {
                if parts.iter().any(|p: &Part| p.tag == Some(t)) {
                    log::warn!("Duplicate '{}' part ignored for visibility", t);
                    tag = None;
                }
            }

            let mut mesh = fragment.mesh;
            for child in &fragment.children {
                flatten_child(&fragment.name, child, Mat4::IDENTITY, &mut mesh);
            }

            let (_, _, translation) = fragment.transform.to_scale_rotation_translation();
            parts.push(Part {
                name: fragment.name,
                tag,
                transform: fragment.transform,
                position: translation,
                visible: true,
                material: ROOM_MATERIAL_ID,
                mesh,
            });
        }

        let room = RoomParts::from_parts(&parts)?;
        log::info!(
            "Assembled room: {} parts ({} decorative)",
            parts.len(),
            parts.iter().filter(|p| p.tag.is_none()).count()
        );

        Ok(Scene {
            parts,
            room,
            materials: vec![self.room_material.clone()],
            lights: self.lights.clone(),
        })
    }
}

fn flatten_child(parent: &str, child: &ModelFragment, parent_transform: Mat4, mesh: &mut MeshData) {
    log::debug!("Flattening '{}' into part '{}'", child.name, parent);
    let transform = parent_transform * child.transform;
    mesh.append_transformed(&child.mesh, transform);
    for grandchild in &child.children {
        flatten_child(parent, grandchild, transform, mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;

    fn fragment(name: &str, at: Vec3) -> ModelFragment {
        ModelFragment::new(name, Mat4::from_translation(at), MeshData::default())
    }

    fn room_fragments() -> Vec<ModelFragment> {
        let mut fragments: Vec<ModelFragment> = PartTag::ALL
            .iter()
            .enumerate()
            .map(|(i, tag)| fragment(tag.name(), Vec3::new(i as f32, 0.0, 0.0)))
            .collect();
        fragments.insert(2, fragment("desk", Vec3::new(0.5, -1.0, 0.5)));
        fragments
    }

    #[test]
    fn tags_reserved_names_and_shares_material() {
        let scene = SceneAssembler::new(&SceneConfig::default())
            .assemble(room_fragments())
            .unwrap();

        assert_eq!(scene.parts.len(), 7);
        assert!(scene.parts.iter().all(|p| p.material == ROOM_MATERIAL_ID));
        assert_eq!(scene.materials.len(), 1);
        for tag in PartTag::ALL {
            assert_eq!(scene.room_part(tag).unwrap().name, tag.name());
        }
        let desk = scene.parts.iter().find(|p| p.name == "desk").unwrap();
        assert_eq!(desk.tag, None);
        assert_eq!(desk.position, Vec3::new(0.5, -1.0, 0.5));
    }

    #[test]
    fn builds_original_lighting() {
        let scene = SceneAssembler::new(&SceneConfig::default())
            .assemble(room_fragments())
            .unwrap();
        assert_eq!(
            scene.lights,
            vec![
                Light::Ambient { color: [1.0; 3], intensity: 0.5 },
                Light::Point { color: [1.0; 3], intensity: 0.5, position: Vec3::new(2.0, 3.0, 4.0) },
            ]
        );
    }

    #[test]
    fn missing_part_fails_at_load_with_its_name() {
        let fragments: Vec<_> = room_fragments()
            .into_iter()
            .filter(|f| f.name != "floor")
            .collect();

        let err = SceneAssembler::new(&SceneConfig::default())
            .assemble(fragments)
            .unwrap_err();

        assert!(matches!(err, ViewerError::MissingPart(PartTag::Floor)));
        assert_eq!(err.to_string(), "required scene part missing: floor");
    }

    #[test]
    fn misnamed_part_counts_as_missing() {
        let mut fragments = room_fragments();
        for f in &mut fragments {
            if f.name == "sealing" {
                f.name = "ceiling".to_string();
            }
        }
        let err = SceneAssembler::new(&SceneConfig::default())
            .assemble(fragments)
            .unwrap_err();
        assert!(matches!(err, ViewerError::MissingPart(PartTag::Sealing)));
    }

    #[test]
    fn duplicate_reserved_name_keeps_first() {
        let mut fragments = room_fragments();
        fragments.push(fragment("left-wall", Vec3::new(99.0, 0.0, 0.0)));

        let scene = SceneAssembler::new(&SceneConfig::default())
            .assemble(fragments)
            .unwrap();

        assert_ne!(scene.room_part(PartTag::LeftWall).unwrap().position.x, 99.0);
        assert_eq!(scene.parts.last().unwrap().tag, None);
    }

    #[test]
    fn children_are_flattened_into_parent_mesh() {
        let tri = MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
        };
        let child = ModelFragment::new("drawer", Mat4::from_translation(Vec3::X), tri.clone())
            .with_child(ModelFragment::new("handle", Mat4::from_translation(Vec3::Y), tri.clone()));
        let mut fragments = room_fragments();
        fragments.push(ModelFragment::new("desk-2", Mat4::IDENTITY, tri).with_child(child));

        let scene = SceneAssembler::new(&SceneConfig::default())
            .assemble(fragments)
            .unwrap();
        let desk = scene.parts.last().unwrap();

        assert_eq!(desk.mesh.triangle_count(), 3);
        assert_eq!(desk.mesh.positions[6], [1.0, 1.0, 0.0]);
    }
}
