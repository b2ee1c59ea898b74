//! Toolbar and palette panels

use bevy_egui::egui;
use bevy_level_core::TileLayer;

use super::{palette, PaletteEntry, UiState};
use crate::commands::EditorAction;
use crate::tools::{EditorTool, PaintSource};
use crate::EditorState;

/// Render the top toolbar and the palette side panel
pub fn render_toolbar(ctx: &egui::Context, editor_state: &mut EditorState, ui_state: &mut UiState) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label("Tool:");
            for (tool, hint) in [
                (EditorTool::Select, "Select tiles and groups (V)"),
                (EditorTool::Delete, "Delete tiles, Shift for the whole group (E)"),
            ] {
                if ui
                    .selectable_label(editor_state.tool() == tool, tool.label())
                    .on_hover_text(hint)
                    .clicked()
                {
                    editor_state.set_tool(tool);
                }
            }

            ui.separator();

            ui.label("Layer:");
            egui::ComboBox::from_id_salt("layer_selector")
                .selected_text(editor_state.selected_layer.label())
                .show_ui(ui, |ui| {
                    for layer in TileLayer::ALL {
                        ui.selectable_value(&mut editor_state.selected_layer, layer, layer.label());
                    }
                });

            ui.separator();

            let history = editor_state.history();
            let undo_hint = history.undo_description().map(|d| format!("Undo {d}"));
            let redo_hint = history.redo_description().map(|d| format!("Redo {d}"));
            let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
            if ui
                .add_enabled(can_undo, egui::Button::new("Undo"))
                .on_hover_text(undo_hint.unwrap_or_else(|| "Nothing to undo".to_string()))
                .clicked()
            {
                editor_state.dispatch(EditorAction::Undo);
            }
            if ui
                .add_enabled(can_redo, egui::Button::new("Redo"))
                .on_hover_text(redo_hint.unwrap_or_else(|| "Nothing to redo".to_string()))
                .clicked()
            {
                editor_state.dispatch(EditorAction::Redo);
            }

            ui.separator();

            if ui.button("Save").on_hover_text("Save level (Ctrl+S)").clicked() {
                editor_state.dispatch(EditorAction::Save);
            }

            let mut show_grid = editor_state.view.show_grid;
            if ui.checkbox(&mut show_grid, "Grid").changed() {
                editor_state.set_show_grid(show_grid);
            }
        });
    });

    egui::SidePanel::left("palette")
        .default_width(180.0)
        .show(ctx, |ui| {
            let [tiles, fills, patterns] = palette(editor_state.library());
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Tiles");
                for entry in &tiles {
                    let active = matches!(editor_state.paint_source(), PaintSource::Tile(id) if *id == entry.id);
                    if ui.selectable_label(active, &entry.name).clicked() {
                        editor_state.select_tile(entry.id.clone());
                    }
                }

                ui.separator();
                ui.heading("Fill patterns");
                for entry in &fills {
                    let active = matches!(editor_state.paint_source(), PaintSource::FillPattern(id) if *id == entry.id);
                    if ui
                        .selectable_label(active, &entry.name)
                        .on_hover_text("Drag over tiles to paint, Shift-click to fill a group")
                        .clicked()
                    {
                        editor_state.select_fill_pattern(entry.id.clone());
                    }
                }

                ui.separator();
                ui.heading("Patterns");
                render_patterns(ui, editor_state, &patterns);

                ui.add_space(4.0);
                ui.label("New pattern name:");
                ui.text_edit_singleline(&mut ui_state.pattern_name);
                let can_create = !editor_state.selection().is_empty()
                    && !ui_state.pattern_name.trim().is_empty();
                if ui
                    .add_enabled(can_create, egui::Button::new("Create from selection"))
                    .clicked()
                    && editor_state
                        .create_pattern_from_selection(ui_state.pattern_name.trim())
                        .is_some()
                {
                    ui_state.pattern_name.clear();
                }
            });
        });
}

fn render_patterns(ui: &mut egui::Ui, editor_state: &mut EditorState, patterns: &[PaletteEntry]) {
    if patterns.is_empty() {
        ui.weak("No patterns yet");
        return;
    }
    let mut to_delete = None;
    for entry in patterns {
        ui.horizontal(|ui| {
            let active = matches!(editor_state.paint_source(), PaintSource::Pattern(id) if *id == entry.id);
            if ui.selectable_label(active, &entry.name).clicked() {
                editor_state.select_pattern(entry.id.clone());
            }
            if ui.small_button("x").on_hover_text("Delete pattern").clicked() {
                to_delete = Some(entry.id.clone());
            }
        });
    }
    if let Some(id) = to_delete {
        editor_state.delete_pattern(&id);
    }
}
