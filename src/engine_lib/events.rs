// src/engine_lib/events.rs

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use crate::engine_lib::scene_types::Scene;
use crate::error::ViewerResult;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraChangeEvent {
    pub position: Vec3,
    pub target: Vec3,
}

pub trait CameraChangeListener {
    fn on_camera_change(&mut self, event: &CameraChangeEvent, scene: &mut Scene) -> ViewerResult<()>;
}

// Lets the owner keep a handle to a listener after subscribing it.
impl<L: CameraChangeListener> CameraChangeListener for Rc<RefCell<L>> {
    fn on_camera_change(&mut self, event: &CameraChangeEvent, scene: &mut Scene) -> ViewerResult<()> {
        self.borrow_mut().on_camera_change(event, scene)
    }
}

/// Synchronous fan-out of camera changes. Listeners borrow the scene for the
/// duration of one call.
#[derive(Default)]
pub struct CameraChangeBus {
    listeners: Vec<Box<dyn CameraChangeListener>>,
}

impl CameraChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn CameraChangeListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Runs listeners in subscription order and stops at the first error.
    pub fn publish(&mut self, event: &CameraChangeEvent, scene: &mut Scene) -> ViewerResult<()> {
        for listener in &mut self.listeners {
            listener.on_camera_change(event, scene)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_lib::scene_types::{PartTag, RoomParts};
    use crate::error::ViewerError;

    struct Recorder {
        id: u32,
        log: Rc<RefCell<Vec<u32>>>,
        fail: bool,
    }

    impl CameraChangeListener for Recorder {
        fn on_camera_change(&mut self, _event: &CameraChangeEvent, _scene: &mut Scene) -> ViewerResult<()> {
            self.log.borrow_mut().push(self.id);
            if self.fail {
                return Err(ViewerError::MissingPart(PartTag::Floor));
            }
            Ok(())
        }
    }

    fn empty_scene() -> Scene {
        Scene {
            parts: Vec::new(),
            room: RoomParts { top_wall: 0, bottom_wall: 0, left_wall: 0, right_wall: 0, sealing: 0, floor: 0 },
            materials: Vec::new(),
            lights: Vec::new(),
        }
    }

    fn event() -> CameraChangeEvent {
        CameraChangeEvent { position: Vec3::new(1.0, 2.0, 3.0), target: Vec3::ZERO }
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = CameraChangeBus::new();
        for id in 0..3 {
            bus.subscribe(Box::new(Recorder { id, log: log.clone(), fail: false }));
        }

        assert_eq!(bus.listener_count(), 3);
        bus.publish(&event(), &mut empty_scene()).unwrap();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn publish_stops_at_first_error() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = CameraChangeBus::new();
        bus.subscribe(Box::new(Recorder { id: 0, log: log.clone(), fail: true }));
        bus.subscribe(Box::new(Recorder { id: 1, log: log.clone(), fail: false }));

        let err = bus.publish(&event(), &mut empty_scene()).unwrap_err();
        assert!(matches!(err, ViewerError::MissingPart(PartTag::Floor)));
        assert_eq!(*log.borrow(), vec![0]);
    }
}
