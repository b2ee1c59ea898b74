//! Canvas rendering
//!
//! The editor state requests frames; this module turns a requested frame into
//! a [`DrawList`] and the draw list into sprites. Nothing is rebuilt while no
//! frame is pending.

mod draw_list;
mod frame;
mod texture_cache;

pub use draw_list::{
    build_draw_list, DrawList, FillOverlay, GridLine, Highlight, HighlightKind, ObjectSprite,
    TileSprite,
};
pub use frame::FrameScheduler;
pub use texture_cache::TextureCache;

use bevy::prelude::*;
use bevy_level_animation::PlatformAnimator;
use bevy_level_core::{CanvasRect, TileLayer};

use crate::storage::session_active;
use crate::EditorState;

const GRID_LINE_WIDTH: f32 = 1.0;
const OBJECT_OUTLINE_WIDTH: f32 = 2.0;
const PATH_LINE_WIDTH: f32 = 1.5;

/// Plugin for canvas rendering and the moving-platform preview
pub struct EditorRenderPlugin;

impl Plugin for EditorRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorTextures>()
            .add_systems(
                Update,
                (tick_platform_animator, track_texture_loads, redraw_canvas)
                    .chain()
                    .run_if(session_active),
            );
    }
}

/// Tile and fill-pattern textures requested by the canvas
#[derive(Resource, Default)]
pub struct EditorTextures(pub TextureCache<Handle<Image>>);

/// Marker for every sprite spawned from a draw list
#[derive(Component)]
pub struct CanvasSprite;

/// Canvas pixels (top-left origin, Y down) to world space for a camera at the
/// origin with scale 1
fn canvas_to_screen(canvas: (f32, f32), state: &EditorState) -> Vec2 {
    Vec2::new(
        canvas.0 - state.view.canvas_width / 2.0,
        state.view.canvas_height / 2.0 - canvas.1,
    )
}

fn rect_transform(rect: &CanvasRect, z: f32, state: &EditorState) -> Transform {
    let center = canvas_to_screen(rect.center(), state);
    Transform::from_xyz(center.x, center.y, z)
}

fn layer_z(layer: TileLayer) -> f32 {
    match layer {
        TileLayer::Background => 1.0,
        TileLayer::Primary => 2.0,
        TileLayer::Foreground => 3.0,
    }
}

fn highlight_style(kind: HighlightKind) -> (Color, f32) {
    match kind {
        HighlightKind::Selection => (Color::srgba(0.3, 0.6, 1.0, 0.35), 6.0),
        HighlightKind::Primary => (Color::srgba(0.3, 0.6, 1.0, 0.6), 6.1),
        HighlightKind::Affected => (Color::srgba(1.0, 0.25, 0.2, 0.45), 6.2),
        HighlightKind::Preview => (Color::srgba(0.4, 1.0, 0.4, 0.35), 6.3),
        HighlightKind::Hover => (Color::srgba(1.0, 1.0, 1.0, 0.2), 6.4),
    }
}

/// Placeholder for tiles whose texture is unknown or still loading
fn placeholder_color(passable: bool) -> Color {
    if passable {
        Color::srgba(0.45, 0.65, 0.8, 0.8)
    } else {
        Color::srgb(0.45, 0.4, 0.35)
    }
}

/// Advance moving platforms; a running animator redraws every frame
fn tick_platform_animator(
    time: Res<Time>,
    mut animator: ResMut<PlatformAnimator>,
    mut state: ResMut<EditorState>,
) {
    let was_running = animator.is_running();
    let running = animator.tick(state.level().objects.iter(), time.delta_secs());
    if running || was_running {
        state.frame.request();
    }
}

/// Redraw once a texture the canvas asked for has arrived
fn track_texture_loads(
    asset_server: Res<AssetServer>,
    mut textures: ResMut<EditorTextures>,
    mut state: ResMut<EditorState>,
) {
    let textures = &mut textures.0;
    for key in textures.pending_keys() {
        let loaded = textures
            .get(&key)
            .is_some_and(|handle| asset_server.is_loaded_with_dependencies(handle));
        if loaded && textures.mark_loaded(&key) {
            state.frame.request();
        }
    }
}

/// Rebuild canvas sprites when a frame is pending
fn redraw_canvas(
    mut commands: Commands,
    mut state: ResMut<EditorState>,
    animator: Res<PlatformAnimator>,
    asset_server: Res<AssetServer>,
    mut textures: ResMut<EditorTextures>,
    sprites: Query<Entity, With<CanvasSprite>>,
) {
    if !state.frame.take() {
        return;
    }
    let list = build_draw_list(&state, &animator, state.library());

    for entity in sprites.iter() {
        commands.entity(entity).despawn();
    }

    if let Some(map_rect) = &list.map_rect {
        commands.spawn((
            Sprite::from_color(
                Color::srgb(0.12, 0.12, 0.14),
                Vec2::new(map_rect.width, map_rect.height),
            ),
            rect_transform(map_rect, 0.0, &state),
            CanvasSprite,
        ));
    }

    for tile in &list.tiles {
        let size = Vec2::new(tile.rect.width, tile.rect.height);
        let sprite = match &tile.texture {
            Some(path) => {
                let handle = textures.0.ensure(path, || asset_server.load(path.clone()));
                if textures.0.is_loaded(path) {
                    Sprite {
                        image: handle,
                        custom_size: Some(size),
                        ..default()
                    }
                } else {
                    Sprite::from_color(placeholder_color(tile.passable), size)
                }
            }
            None => Sprite::from_color(placeholder_color(tile.passable), size),
        };
        commands.spawn((
            sprite,
            rect_transform(&tile.rect, layer_z(tile.layer), &state),
            CanvasSprite,
        ));
    }

    for fill in &list.fill_overlays {
        let Some(path) = &fill.texture else {
            continue;
        };
        let handle = textures.0.ensure(path, || asset_server.load(path.clone()));
        if !textures.0.is_loaded(path) {
            continue;
        }
        commands.spawn((
            Sprite {
                image: handle,
                custom_size: Some(Vec2::new(fill.rect.width, fill.rect.height)),
                ..default()
            },
            rect_transform(&fill.rect, layer_z(fill.layer) + 0.5, &state),
            CanvasSprite,
        ));
    }

    for object in &list.objects {
        let color = if object.selected {
            Color::srgba(1.0, 0.8, 0.2, 0.8)
        } else {
            Color::srgba(0.9, 0.5, 0.2, 0.6)
        };
        commands.spawn((
            Sprite::from_color(color, Vec2::new(object.rect.width, object.rect.height)),
            rect_transform(&object.rect, 4.0, &state),
            CanvasSprite,
        ));
        if object.selected {
            spawn_outline(&mut commands, &object.rect, OBJECT_OUTLINE_WIDTH, 4.1, &state);
        }
        for segment in object.path.windows(2) {
            spawn_line(
                &mut commands,
                segment[0],
                segment[1],
                PATH_LINE_WIDTH,
                Color::srgba(0.9, 0.5, 0.2, 0.8),
                4.2,
                &state,
            );
        }
    }

    let grid_color = Color::srgba(0.5, 0.5, 0.5, 0.5);
    for line in &list.grid_lines {
        spawn_line(&mut commands, line.from, line.to, GRID_LINE_WIDTH, grid_color, 5.0, &state);
    }

    for highlight in &list.highlights {
        let (color, z) = highlight_style(highlight.kind);
        commands.spawn((
            Sprite::from_color(color, Vec2::new(highlight.rect.width, highlight.rect.height)),
            rect_transform(&highlight.rect, z, &state),
            CanvasSprite,
        ));
    }
}

/// A straight line between two canvas points as a thin rotated sprite
fn spawn_line(
    commands: &mut Commands,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    color: Color,
    z: f32,
    state: &EditorState,
) {
    let a = canvas_to_screen(from, state);
    let b = canvas_to_screen(to, state);
    let delta = b - a;
    let length = delta.length();
    if length <= f32::EPSILON {
        return;
    }
    let mid = (a + b) / 2.0;
    commands.spawn((
        Sprite::from_color(color, Vec2::new(length, width)),
        Transform::from_xyz(mid.x, mid.y, z)
            .with_rotation(Quat::from_rotation_z(delta.y.atan2(delta.x))),
        CanvasSprite,
    ));
}

fn spawn_outline(commands: &mut Commands, rect: &CanvasRect, width: f32, z: f32, state: &EditorState) {
    let color = Color::srgb(1.0, 0.85, 0.3);
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);
    let corners = [(left, top), (right, top), (right, bottom), (left, bottom), (left, top)];
    for edge in corners.windows(2) {
        spawn_line(commands, edge[0], edge[1], width, color, z, state);
    }
}
