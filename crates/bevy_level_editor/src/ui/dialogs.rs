//! Confirmation prompts and the right-click menu

use bevy_egui::egui;

use super::{palette, UiState};
use crate::tools::ContextAction;
use crate::EditorState;

/// Prompt for the pending group delete or overwriting placement
pub fn render_confirmation(ctx: &egui::Context, editor_state: &mut EditorState) {
    let Some(message) = editor_state.pending().map(|p| p.message()) else {
        return;
    };

    let mut do_confirm = false;
    let mut do_cancel = false;

    egui::Window::new("Confirm")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Continue").on_hover_text("Enter").clicked() {
                    do_confirm = true;
                }
                if ui.button("Cancel").on_hover_text("Escape").clicked() {
                    do_cancel = true;
                }
            });
        });

    if do_confirm {
        editor_state.confirm();
    } else if do_cancel {
        editor_state.cancel();
    }
}

/// Shown after a save ran out of storage space
pub fn render_free_space_prompt(ctx: &egui::Context, editor_state: &mut EditorState) {
    if !editor_state.show_free_space_prompt {
        return;
    }

    let mut do_close = false;
    let mut do_retry = false;

    egui::Window::new("Storage Full")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("The level could not be saved because storage is full.");
            ui.label("Free some space, then retry.");
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Retry").clicked() {
                    do_retry = true;
                }
                if ui.button("OK").clicked() {
                    do_close = true;
                }
            });
        });

    if do_retry || do_close {
        editor_state.show_free_space_prompt = false;
    }
    if do_retry {
        editor_state.request_save();
    }
}

/// Context menu at the cell that was right-clicked
pub fn render_context_menu(ctx: &egui::Context, editor_state: &mut EditorState, ui_state: &mut UiState) {
    let Some(menu) = editor_state.context_menu().copied() else {
        ui_state.rename.clear();
        return;
    };
    let can_paste = editor_state.clipboard().is_some();
    let [tiles, _, _] = palette(editor_state.library());

    let mut action = None;
    let mut do_close = false;

    egui::Window::new("Tile")
        .id(egui::Id::new("context_menu"))
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .fixed_pos(egui::pos2(menu.canvas.0, menu.canvas.1))
        .show(ctx, |ui| {
            ui.label(format!("Cell {}, {}", menu.cell.0, menu.cell.1));
            ui.separator();
            for entry in [
                ContextAction::Copy,
                ContextAction::Cut,
                ContextAction::Paste,
                ContextAction::Delete,
                ContextAction::CycleLayer,
                ContextAction::TogglePassable,
                ContextAction::ClearFillPattern,
            ] {
                let enabled = entry != ContextAction::Paste || can_paste;
                if ui.add_enabled(enabled, egui::Button::new(entry.label())).clicked() {
                    action = Some(entry);
                }
            }

            ui.separator();
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut ui_state.rename);
                if ui.button("Rename").on_hover_text("Empty clears the name").clicked() {
                    action = Some(ContextAction::Rename(ui_state.rename.clone()));
                }
            });

            egui::CollapsingHeader::new("Replace texture")
                .id_salt("replace_texture")
                .show(ui, |ui| {
                    for tile in &tiles {
                        if ui.button(&tile.name).clicked() {
                            action = Some(ContextAction::ReplaceTexture(tile.id.clone()));
                        }
                    }
                });

            ui.separator();
            if ui.button("Close").clicked() {
                do_close = true;
            }
        });

    if let Some(action) = action {
        editor_state.apply_context_action(action);
        ui_state.rename.clear();
    } else if do_close {
        editor_state.close_context_menu();
        ui_state.rename.clear();
    }
}
