//! Window input to editor transitions
//!
//! The window is the canvas: cursor positions are already top-left anchored
//! logical pixels, which is what the transitions expect.

use bevy::ecs::message::MessageReader;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::{Modifiers, PointerButton};
use crate::ui::UiState;
use crate::EditorState;

/// Pixel-unit wheel deltas (touchpads) per zoom step
const PIXELS_PER_WHEEL_STEP: f32 = 40.0;

const BUTTONS: [(MouseButton, PointerButton); 3] = [
    (MouseButton::Left, PointerButton::Left),
    (MouseButton::Middle, PointerButton::Middle),
    (MouseButton::Right, PointerButton::Right),
];

fn modifiers(keyboard: &ButtonInput<KeyCode>) -> Modifiers {
    Modifiers {
        shift: keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        multi: keyboard.any_pressed([
            KeyCode::ControlLeft,
            KeyCode::ControlRight,
            KeyCode::SuperLeft,
            KeyCode::SuperRight,
        ]),
    }
}

/// Keep the canvas size in step with the primary window
pub fn sync_canvas_size(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut state: ResMut<EditorState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let (width, height) = (window.resolution.width(), window.resolution.height());
    if state.view.canvas_width != width || state.view.canvas_height != height {
        state.set_canvas_size(width, height);
    }
}

/// Feed cursor motion and mouse buttons into the pointer transitions
pub fn handle_canvas_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut state: ResMut<EditorState>,
    ui_state: Option<Res<UiState>>,
    mut last_cursor: Local<Option<Vec2>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    if let Some(cursor) = window.cursor_position() {
        if *last_cursor != Some(cursor) {
            *last_cursor = Some(cursor);
            state.pointer_move(cursor.x, cursor.y);
        }
    }
    // Releases outside the window still end the gesture at the last known position
    let Some(cursor) = *last_cursor else {
        return;
    };

    let modifiers = modifiers(&keyboard);
    let over_panel = UiState::blocks_pointer(ui_state.as_deref());
    for (button, pointer) in BUTTONS {
        if mouse.just_pressed(button) && window.cursor_position().is_some() && !over_panel {
            state.pointer_down(pointer, cursor.x, cursor.y, modifiers);
        }
        if mouse.just_released(button) {
            state.pointer_up(pointer, cursor.x, cursor.y);
        }
    }
}

/// Mouse wheel zoom anchored at the cursor
pub fn handle_zoom_input(
    mut wheel: MessageReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut state: ResMut<EditorState>,
    ui_state: Option<Res<UiState>>,
) {
    let Ok(window) = windows.single() else {
        wheel.clear();
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        wheel.clear();
        return;
    };
    if UiState::blocks_pointer(ui_state.as_deref()) {
        wheel.clear();
        return;
    }

    let steps: f32 = wheel
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / PIXELS_PER_WHEEL_STEP,
        })
        .sum();
    if steps != 0.0 && state.pending().is_none() {
        state.wheel_zoom(steps, cursor.x, cursor.y);
    }
}
