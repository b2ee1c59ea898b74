//! Keyboard shortcut handling

use bevy::prelude::*;

use crate::storage::EditorSession;
use crate::tools::EditorTool;
use crate::ui::UiState;
use crate::EditorState;

/// Editor-wide actions bound to keys (and mirrored by menus)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Save,
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    DeleteSelected,
    /// Escape: cancel the pending confirmation, else the drag, else the selection
    Cancel,
    /// Enter: accept the pending confirmation
    Confirm,
    Tool(EditorTool),
}

/// Map a key press to an action
pub fn resolve_shortcut(key: KeyCode, ctrl: bool, shift: bool) -> Option<EditorAction> {
    if ctrl {
        return match key {
            KeyCode::KeyS => Some(EditorAction::Save),
            KeyCode::KeyZ if shift => Some(EditorAction::Redo),
            KeyCode::KeyZ => Some(EditorAction::Undo),
            KeyCode::KeyY => Some(EditorAction::Redo),
            KeyCode::KeyC => Some(EditorAction::Copy),
            KeyCode::KeyX => Some(EditorAction::Cut),
            KeyCode::KeyV => Some(EditorAction::Paste),
            _ => None,
        };
    }
    match key {
        KeyCode::Delete | KeyCode::Backspace => Some(EditorAction::DeleteSelected),
        KeyCode::Escape => Some(EditorAction::Cancel),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(EditorAction::Confirm),
        KeyCode::KeyV => Some(EditorAction::Tool(EditorTool::Select)),
        KeyCode::KeyE => Some(EditorAction::Tool(EditorTool::Delete)),
        _ => None,
    }
}

/// Handle keyboard shortcuts
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Res<EditorSession>,
    mut editor_state: ResMut<EditorState>,
    ui_state: Option<Res<UiState>>,
) {
    if !session.is_active() || UiState::blocks_keyboard(ui_state.as_deref()) {
        return;
    }
    let ctrl = keyboard.any_pressed([
        KeyCode::ControlLeft,
        KeyCode::ControlRight,
        KeyCode::SuperLeft,
        KeyCode::SuperRight,
    ]);
    let shift = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

    for key in keyboard.get_just_pressed() {
        if let Some(action) = resolve_shortcut(*key, ctrl, shift) {
            editor_state.dispatch(action);
        }
    }
}

impl EditorState {
    /// Run a keyboard/menu action.
    ///
    /// While a confirmation is pending only `Save`, `Cancel` and `Confirm` do anything.
    pub fn dispatch(&mut self, action: EditorAction) {
        if self.pending.is_some()
            && !matches!(
                action,
                EditorAction::Save | EditorAction::Cancel | EditorAction::Confirm
            )
        {
            return;
        }
        match action {
            EditorAction::Save => self.request_save(),
            EditorAction::Undo => {
                self.undo();
            }
            EditorAction::Redo => {
                self.redo();
            }
            EditorAction::Copy => {
                self.copy_selection();
            }
            EditorAction::Cut => {
                self.cut_selection();
            }
            EditorAction::Paste => {
                self.paste();
            }
            EditorAction::DeleteSelected => self.delete_selected(),
            EditorAction::Cancel => self.cancel_current(),
            EditorAction::Confirm => {
                self.confirm();
            }
            EditorAction::Tool(tool) => self.set_tool(tool),
        }
    }
}
