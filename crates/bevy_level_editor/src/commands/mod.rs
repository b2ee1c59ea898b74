//! Undo/redo history, clipboard and keyboard shortcuts

pub mod clipboard;
mod command;
mod shortcuts;

pub use clipboard::{ClipboardEntry, TileClipboard};
pub use command::{CommandHistory, LevelSnapshot, DEFAULT_UNDO_LIMIT};
pub use shortcuts::{handle_keyboard_shortcuts, resolve_shortcut, EditorAction};
