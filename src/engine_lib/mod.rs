// src/engine_lib/mod.rs
pub mod scene_types;
pub mod camera;
pub mod controller;
pub mod events;
pub mod visibility;
pub mod assembler;
pub mod model_loader;
pub mod demo_room;

pub use scene_types::{Part, PartTag, RoomParts, Scene, ModelFragment, MeshData};
pub use camera::Camera;
pub use controller::OrbitController;
pub use events::{CameraChangeBus, CameraChangeEvent, CameraChangeListener};
pub use visibility::{VisibilityResolver, SealingFloorPolicy};
pub use assembler::SceneAssembler;
