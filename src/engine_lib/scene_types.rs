// src/engine_lib/scene_types.rs
use std::fmt;

use glam::{Mat4, Vec3};

use crate::error::{ViewerError, ViewerResult};

// Type aliases for IDs
pub type PartId = usize;
pub type MaterialId = usize;

/// Reserved authoring names that mark the structural parts of the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartTag {
    TopWall,
    BottomWall,
    LeftWall,
    RightWall,
    Sealing,
    Floor,
}

impl PartTag {
    pub const ALL: [PartTag; 6] = [
        PartTag::TopWall,
        PartTag::BottomWall,
        PartTag::LeftWall,
        PartTag::RightWall,
        PartTag::Sealing,
        PartTag::Floor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PartTag::TopWall => "top-wall",
            PartTag::BottomWall => "bottom-wall",
            PartTag::LeftWall => "left-wall",
            PartTag::RightWall => "right-wall",
            PartTag::Sealing => "sealing",
            PartTag::Floor => "floor",
        }
    }

    /// Exact, case-sensitive match against the authoring name.
    pub fn from_name(name: &str) -> Option<PartTag> {
        PartTag::ALL.into_iter().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for PartTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Triangle list in the owning part's local space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends `other` after transforming it by `transform`.
    pub fn append_transformed(&mut self, other: &MeshData, transform: Mat4) {
        let base = self.positions.len() as u32;
        let normal_matrix = transform.inverse().transpose();
        self.positions.extend(
            other
                .positions
                .iter()
                .map(|p| transform.transform_point3(Vec3::from(*p)).to_array()),
        );
        self.normals.extend(other.normals.iter().map(|n| {
            normal_matrix
                .transform_vector3(Vec3::from(*n))
                .normalize_or_zero()
                .to_array()
        }));
        self.indices.extend(other.indices.iter().map(|i| base + i));
    }

    /// Fills `normals` with per-vertex normals averaged from face normals.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if a >= normals.len() || b >= normals.len() || c >= normals.len() {
                continue;
            }
            let pa = Vec3::from(self.positions[a]);
            let pb = Vec3::from(self.positions[b]);
            let pc = Vec3::from(self.positions[c]);
            let face = (pb - pa).cross(pc - pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals
            .into_iter()
            .map(|n| {
                let n = n.normalize_or_zero();
                let n = if n == Vec3::ZERO { Vec3::Y } else { n };
                n.to_array()
            })
            .collect();
    }
}

/// A node of the loaded model as handed over by a loader.
#[derive(Clone, Debug)]
pub struct ModelFragment {
    pub name: String,
    /// Local transform relative to the model root (or to the parent fragment).
    pub transform: Mat4,
    pub mesh: MeshData,
    pub children: Vec<ModelFragment>,
}

impl ModelFragment {
    pub fn new(name: impl Into<String>, transform: Mat4, mesh: MeshData) -> Self {
        Self {
            name: name.into(),
            transform,
            mesh,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: ModelFragment) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    /// Linear RGBA diffuse color for Lambert shading.
    pub color: [f32; 4],
}

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Ambient { color: [f32; 3], intensity: f32 },
    Point { color: [f32; 3], intensity: f32, position: Vec3 },
}

#[derive(Clone, Debug)]
pub struct Part {
    pub name: String,
    pub tag: Option<PartTag>,
    pub transform: Mat4,
    pub position: Vec3,
    pub visible: bool,
    pub material: MaterialId,
    pub mesh: MeshData,
}

/// Indices of the six structural parts, filled once when the model is assembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomParts {
    pub top_wall: PartId,
    pub bottom_wall: PartId,
    pub left_wall: PartId,
    pub right_wall: PartId,
    pub sealing: PartId,
    pub floor: PartId,
}

impl RoomParts {
    pub fn get(&self, tag: PartTag) -> PartId {
        match tag {
            PartTag::TopWall => self.top_wall,
            PartTag::BottomWall => self.bottom_wall,
            PartTag::LeftWall => self.left_wall,
            PartTag::RightWall => self.right_wall,
            PartTag::Sealing => self.sealing,
            PartTag::Floor => self.floor,
        }
    }

    /// Builds the record from the tags found on `parts`. The first part carrying
    /// a tag wins.
    pub fn from_parts(parts: &[Part]) -> ViewerResult<Self> {
        let find = |tag: PartTag| {
            parts
                .iter()
                .position(|p| p.tag == Some(tag))
                .ok_or(ViewerError::MissingPart(tag))
        };
        Ok(Self {
            top_wall: find(PartTag::TopWall)?,
            bottom_wall: find(PartTag::BottomWall)?,
            left_wall: find(PartTag::LeftWall)?,
            right_wall: find(PartTag::RightWall)?,
            sealing: find(PartTag::Sealing)?,
            floor: find(PartTag::Floor)?,
        })
    }
}

#[derive(Debug)]
pub struct Scene {
    pub parts: Vec<Part>,
    pub room: RoomParts,
    pub materials: Vec<Material>,
    pub lights: Vec<Light>,
}

impl Scene {
    /// Resolves a structural part, checking that the recorded index still
    /// points at a part with the expected tag.
    pub fn room_part(&self, tag: PartTag) -> ViewerResult<&Part> {
        self.parts
            .get(self.room.get(tag))
            .filter(|p| p.tag == Some(tag))
            .ok_or(ViewerError::MissingPart(tag))
    }

    pub fn room_part_mut(&mut self, tag: PartTag) -> ViewerResult<&mut Part> {
        self.parts
            .get_mut(self.room.get(tag))
            .filter(|p| p.tag == Some(tag))
            .ok_or(ViewerError::MissingPart(tag))
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn visible_part_count(&self) -> usize {
        self.parts.iter().filter(|p| p.visible).count()
    }
}
