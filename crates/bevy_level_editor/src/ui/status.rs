//! Bottom status bar

use bevy_egui::egui;

use crate::storage::SaveStatus;
use crate::tools::PaintSource;
use crate::EditorState;

pub fn render_status_bar(ctx: &egui::Context, editor_state: &EditorState) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("Tool: {}", editor_state.tool().label()));
            let source = match editor_state.paint_source() {
                PaintSource::None => None,
                PaintSource::Tile(id) => Some(format!("tile {id}")),
                PaintSource::Pattern(id) => Some(format!("pattern {id}")),
                PaintSource::FillPattern(id) => Some(format!("fill {id}")),
            };
            if let Some(source) = source {
                ui.label(source);
            }
            ui.separator();
            ui.label(format!("Layer: {}", editor_state.selected_layer.label()));
            ui.separator();
            match editor_state.hover() {
                Some((x, y)) => ui.label(format!("Cell: {x}, {y}")),
                None => ui.label("Cell: -"),
            };
            ui.separator();
            ui.label(format!("Zoom: {:.0}%", editor_state.view.zoom * 100.0));

            let status = &editor_state.save_status;
            if *status != SaveStatus::Idle {
                ui.separator();
                match status {
                    SaveStatus::Failed(_) | SaveStatus::QuotaExceeded => {
                        ui.colored_label(egui::Color32::RED, status.label())
                    }
                    _ => ui.label(status.label()),
                };
            }
        });
    });
}
