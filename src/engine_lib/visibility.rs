// src/engine_lib/visibility.rs
//! Hides the nearer member of each opposing pair of room parts so the
//! interior stays visible from any orbit angle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::engine_lib::events::{CameraChangeEvent, CameraChangeListener};
use crate::engine_lib::scene_types::{PartTag, Scene};
use crate::error::ViewerResult;

pub const DEFAULT_VERTICAL_THRESHOLD: f32 = -0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpposingPair {
    pub first: PartTag,
    pub second: PartTag,
}

pub const OPPOSING_PAIRS: [OpposingPair; 3] = [
    OpposingPair { first: PartTag::TopWall, second: PartTag::BottomWall },
    OpposingPair { first: PartTag::LeftWall, second: PartTag::RightWall },
    OpposingPair { first: PartTag::Sealing, second: PartTag::Floor },
];

/// How the sealing/floor pair is decided. The wall pairs always compare
/// distances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SealingFloorPolicy {
    #[default]
    Distance,
    /// Shows the sealing only while the camera is below `threshold`.
    VerticalThreshold { threshold: f32 },
}

impl SealingFloorPolicy {
    pub fn vertical_threshold() -> Self {
        SealingFloorPolicy::VerticalThreshold { threshold: DEFAULT_VERTICAL_THRESHOLD }
    }
}

#[derive(Debug, Default)]
pub struct VisibilityResolver {
    policy: SealingFloorPolicy,
}

impl VisibilityResolver {
    pub fn new(policy: SealingFloorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SealingFloorPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SealingFloorPolicy) {
        self.policy = policy;
    }

    /// Shows the farther member of every pair and hides the nearer one.
    ///
    /// All six parts are looked up before any flag changes, so a missing part
    /// leaves the scene as it was.
    pub fn resolve(&self, camera_position: Vec3, scene: &mut Scene) -> ViewerResult<()> {
        let mut decisions = [(OPPOSING_PAIRS[0], true); 3];
        for (slot, pair) in decisions.iter_mut().zip(OPPOSING_PAIRS) {
            let first = scene.room_part(pair.first)?.position;
            let second = scene.room_part(pair.second)?.position;
            *slot = (pair, self.shows_first(pair, camera_position, first, second));
        }

        for (pair, show_first) in decisions {
            scene.room_part_mut(pair.first)?.visible = show_first;
            scene.room_part_mut(pair.second)?.visible = !show_first;
            log::trace!(
                "{} visible, {} hidden",
                if show_first { pair.first } else { pair.second },
                if show_first { pair.second } else { pair.first },
            );
        }
        Ok(())
    }

    fn shows_first(&self, pair: OpposingPair, camera: Vec3, first: Vec3, second: Vec3) -> bool {
        match (pair.first, self.policy) {
            (PartTag::Sealing, SealingFloorPolicy::VerticalThreshold { threshold }) => {
                camera.y < threshold
            }
            // Ties fall through to showing the first member.
            _ => !(camera.distance(first) < camera.distance(second)),
        }
    }
}

impl CameraChangeListener for VisibilityResolver {
    fn on_camera_change(&mut self, event: &CameraChangeEvent, scene: &mut Scene) -> ViewerResult<()> {
        self.resolve(event.position, scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_lib::scene_types::{MeshData, Part, RoomParts};
    use crate::error::ViewerError;
    use glam::Mat4;

    fn part(tag: PartTag, position: Vec3) -> Part {
        Part {
            name: tag.name().to_string(),
            tag: Some(tag),
            transform: Mat4::from_translation(position),
            position,
            visible: true,
            material: 0,
            mesh: MeshData::default(),
        }
    }

    fn room(positions: [(PartTag, Vec3); 6]) -> Scene {
        let parts: Vec<Part> = positions.iter().map(|(tag, pos)| part(*tag, *pos)).collect();
        let room = RoomParts::from_parts(&parts).unwrap();
        Scene { parts, room, materials: Vec::new(), lights: Vec::new() }
    }

    fn unit_room() -> Scene {
        room([
            (PartTag::TopWall, Vec3::new(0.0, 5.0, 0.0)),
            (PartTag::BottomWall, Vec3::new(0.0, -5.0, 0.0)),
            (PartTag::LeftWall, Vec3::new(-5.0, 0.0, 0.0)),
            (PartTag::RightWall, Vec3::new(5.0, 0.0, 0.0)),
            (PartTag::Sealing, Vec3::new(0.0, 3.0, 0.0)),
            (PartTag::Floor, Vec3::new(0.0, -3.0, 0.0)),
        ])
    }

    fn visible(scene: &Scene, tag: PartTag) -> bool {
        scene.room_part(tag).unwrap().visible
    }

    #[test]
    fn nearer_wall_is_hidden() {
        let mut scene = unit_room();
        VisibilityResolver::default()
            .resolve(Vec3::new(10.0, 0.0, 0.0), &mut scene)
            .unwrap();
        assert!(visible(&scene, PartTag::LeftWall));
        assert!(!visible(&scene, PartTag::RightWall));
    }

    #[test]
    fn exactly_one_member_of_each_pair_is_visible() {
        let mut scene = unit_room();
        let resolver = VisibilityResolver::default();
        for camera in [
            Vec3::new(8.0, 6.0, 2.0),
            Vec3::new(-3.0, -7.0, 1.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.5, 20.0, -9.0),
        ] {
            resolver.resolve(camera, &mut scene).unwrap();
            for pair in OPPOSING_PAIRS {
                assert_ne!(visible(&scene, pair.first), visible(&scene, pair.second));
            }
        }
    }

    #[test]
    fn tie_shows_first_member_on_every_call() {
        let mut scene = unit_room();
        let resolver = VisibilityResolver::default();
        let camera = Vec3::new(0.0, 0.0, 5.0);

        resolver.resolve(camera, &mut scene).unwrap();
        let first = (visible(&scene, PartTag::TopWall), visible(&scene, PartTag::BottomWall));
        resolver.resolve(camera, &mut scene).unwrap();
        let second = (visible(&scene, PartTag::TopWall), visible(&scene, PartTag::BottomWall));

        assert_eq!(first, second);
        assert_eq!(first, (true, false));
    }

    #[test]
    fn distance_policy_treats_sealing_like_the_walls() {
        let mut scene = unit_room();
        let resolver = VisibilityResolver::default();

        resolver.resolve(Vec3::new(0.0, 10.0, 0.0), &mut scene).unwrap();
        assert!(!visible(&scene, PartTag::Sealing));
        assert!(visible(&scene, PartTag::Floor));

        resolver.resolve(Vec3::new(0.0, -10.0, 0.0), &mut scene).unwrap();
        assert!(visible(&scene, PartTag::Sealing));
        assert!(!visible(&scene, PartTag::Floor));
    }

    #[test]
    fn vertical_threshold_uses_camera_height_only() {
        let mut scene = unit_room();
        let resolver = VisibilityResolver::new(SealingFloorPolicy::vertical_threshold());

        resolver.resolve(Vec3::new(4.0, -1.0, 4.0), &mut scene).unwrap();
        assert!(!visible(&scene, PartTag::Floor));
        assert!(visible(&scene, PartTag::Sealing));

        resolver.resolve(Vec3::new(4.0, 1.0, 4.0), &mut scene).unwrap();
        assert!(visible(&scene, PartTag::Floor));
        assert!(!visible(&scene, PartTag::Sealing));
    }

    #[test]
    fn threshold_boundary_counts_as_above() {
        let mut scene = unit_room();
        let resolver = VisibilityResolver::new(SealingFloorPolicy::vertical_threshold());
        resolver
            .resolve(Vec3::new(0.0, DEFAULT_VERTICAL_THRESHOLD, 0.0), &mut scene)
            .unwrap();
        assert!(visible(&scene, PartTag::Floor));
    }

    #[test]
    fn stale_index_reports_missing_part_and_leaves_flags() {
        let mut scene = unit_room();
        let floor = scene.room.floor;
        scene.parts[floor].tag = None;
        for p in &mut scene.parts {
            p.visible = true;
        }

        let err = VisibilityResolver::default()
            .resolve(Vec3::new(10.0, 0.0, 0.0), &mut scene)
            .unwrap_err();

        assert!(matches!(err, ViewerError::MissingPart(PartTag::Floor)));
        assert!(scene.parts.iter().all(|p| p.visible));
    }


    #[test]
    fn non_finite_camera_still_shows_one_member_per_pair() {
        let mut scene = unit_room();
        let resolver = VisibilityResolver::new(SealingFloorPolicy::vertical_threshold());

        resolver.resolve(Vec3::splat(f32::NAN), &mut scene).unwrap();

        for pair in OPPOSING_PAIRS {
            assert_ne!(visible(&scene, pair.first), visible(&scene, pair.second));
        }
        assert_eq!(scene.visible_part_count(), 3);
    }

    #[test]
    fn side_camera_below_threshold_shows_far_wall_and_sealing() {
        let mut scene = unit_room();
        let resolver = VisibilityResolver::new(SealingFloorPolicy::vertical_threshold());

        resolver.resolve(Vec3::new(10.0, -1.0, 0.0), &mut scene).unwrap();

        assert!(visible(&scene, PartTag::LeftWall));
        assert!(!visible(&scene, PartTag::RightWall));
        assert!(visible(&scene, PartTag::Sealing));
        assert!(!visible(&scene, PartTag::Floor));
    }
}
