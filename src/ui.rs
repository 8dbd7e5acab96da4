// src/ui.rs
use glam::Vec3;

use crate::engine_lib::scene_types::PartTag;
use crate::engine_lib::visibility::SealingFloorPolicy;

/// Snapshot the debug panel reads from, plus the one setting it can edit.
pub struct PanelState {
    pub camera_position: Vec3,
    pub parts: Vec<(PartTag, bool)>,
    pub visible_parts: usize,
    pub total_parts: usize,
    pub policy: SealingFloorPolicy,
}

/// Draws the debug panel. Returns true when the user changed the policy.
pub fn build_ui(ctx: &egui::Context, state: &mut PanelState) -> bool {
    let before = state.policy;

    egui::Window::new("Room")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            let p = state.camera_position;
            ui.label(format!("Camera: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
            ui.separator();

            egui::Grid::new("part_visibility").striped(true).show(ui, |ui| {
                for (tag, visible) in &state.parts {
                    ui.label(tag.name());
                    ui.label(if *visible { "shown" } else { "hidden" });
                    ui.end_row();
                }
            });
            ui.label(format!("Drawing {} of {} parts", state.visible_parts, state.total_parts));
            ui.separator();

            ui.label("Sealing / floor:");
            let mut use_threshold = matches!(state.policy, SealingFloorPolicy::VerticalThreshold { .. });
            ui.horizontal(|ui| {
                ui.radio_value(&mut use_threshold, false, "Distance");
                ui.radio_value(&mut use_threshold, true, "Height threshold");
            });
            state.policy = match (use_threshold, state.policy) {
                (false, _) => SealingFloorPolicy::Distance,
                (true, SealingFloorPolicy::Distance) => SealingFloorPolicy::vertical_threshold(),
                (true, current) => current,
            };
            if let SealingFloorPolicy::VerticalThreshold { threshold } = &mut state.policy {
                ui.add(egui::Slider::new(threshold, -5.0..=5.0).text("camera y below"));
            }
            ui.separator();

            ui.label("Left drag: orbit");
            ui.label("Right drag / Shift + left drag: pan");
            ui.label("Wheel: zoom");
        });

    state.policy != before
}
