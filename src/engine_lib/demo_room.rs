// src/engine_lib/demo_room.rs

use glam::{Mat4, Vec3};

use crate::engine_lib::scene_types::{MeshData, ModelFragment, PartTag};

const ROOM_HALF_WIDTH: f32 = 3.0;
const ROOM_HALF_HEIGHT: f32 = 1.5;
const WALL_HALF_THICKNESS: f32 = 0.05;

/// Axis-aligned box centred on the origin, four vertices per face so the
/// normals stay flat.
pub fn cuboid(half_extents: Vec3) -> MeshData {
    let h = half_extents;
    // (normal, u axis, v axis) per face, wound counter-clockwise from outside.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let base = mesh.positions.len() as u32;
        let center = normal * h;
        let (du, dv) = (u * h, v * h);
        for corner in [-du - dv, du - dv, du + dv, -du + dv] {
            mesh.positions.push((center + corner).to_array());
            mesh.normals.push(normal.to_array());
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

fn slab(name: &str, center: Vec3, half_extents: Vec3) -> ModelFragment {
    ModelFragment::new(name, Mat4::from_translation(center), cuboid(half_extents))
}

/// A furnished room following the reserved naming convention, used when no
/// model file is configured.
pub fn create_demo_room() -> Vec<ModelFragment> {
    let w = ROOM_HALF_WIDTH;
    let hh = ROOM_HALF_HEIGHT;
    let t = WALL_HALF_THICKNESS;

    let lamp = slab("lamp", Vec3::new(-2.2, -0.6, -2.2), Vec3::new(0.05, 0.9, 0.05)).with_child(
        ModelFragment::new(
            "lamp-shade",
            Mat4::from_translation(Vec3::new(0.0, 0.95, 0.0)),
            cuboid(Vec3::new(0.3, 0.2, 0.3)),
        ),
    );

    let desk = slab("desk", Vec3::new(2.0, -0.75, -2.2), Vec3::new(0.8, 0.05, 0.5))
        .with_child(ModelFragment::new(
            "desk-leg-left",
            Mat4::from_translation(Vec3::new(-0.7, -0.4, 0.0)),
            cuboid(Vec3::new(0.05, 0.35, 0.45)),
        ))
        .with_child(ModelFragment::new(
            "desk-leg-right",
            Mat4::from_translation(Vec3::new(0.7, -0.4, 0.0)),
            cuboid(Vec3::new(0.05, 0.35, 0.45)),
        ));

    vec![
        slab(PartTag::TopWall.name(), Vec3::new(0.0, 0.0, -w), Vec3::new(w, hh, t)),
        slab(PartTag::BottomWall.name(), Vec3::new(0.0, 0.0, w), Vec3::new(w, hh, t)),
        slab(PartTag::LeftWall.name(), Vec3::new(-w, 0.0, 0.0), Vec3::new(t, hh, w)),
        slab(PartTag::RightWall.name(), Vec3::new(w, 0.0, 0.0), Vec3::new(t, hh, w)),
        slab(PartTag::Sealing.name(), Vec3::new(0.0, hh, 0.0), Vec3::new(w, t, w)),
        slab(PartTag::Floor.name(), Vec3::new(0.0, -hh, 0.0), Vec3::new(w, t, w)),
        slab("bed", Vec3::new(-1.6, -1.2, 1.2), Vec3::new(1.0, 0.25, 1.6)),
        slab("rug", Vec3::new(0.5, -1.44, 0.0), Vec3::new(1.2, 0.01, 0.8)),
        desk,
        lamp,
    ]
}
