use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::window::{WindowMode, WindowResolution};
use bevy_framepace::{FramepaceSettings, Limiter};

// square play field
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 1280.0;

/// Frames per second the loop is paced to. One `Update` per paced frame
/// is the simulation tick.
pub const FRAME_RATE: f64 = 60.0;

const CLEAR_COLOR: Color = Color::srgb(0.0, 0.0, 30.0 / 255.0);

// Creates a Bevy app with default settings shared by the game screens.
// This prevents duplication / errors across setups.
pub fn get_default_app(title: &str) -> App {
    let mut app = App::new();

    let asset_plugin = bevy::asset::AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let resolution = WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: title.to_string(),
            present_mode: bevy::window::PresentMode::Fifo,
            resolution,
            mode: WindowMode::Windowed,
            ..default()
        }),
        ..default()
    };

    app.add_plugins(DefaultPlugins.set(asset_plugin).set(window_plugin));

    // https://github.com/aevyrie/bevy_framepace
    app.add_plugins(bevy_framepace::FramepacePlugin);
    app.insert_resource(FramepaceSettings {
        limiter: Limiter::from_framerate(FRAME_RATE),
    });

    app.insert_resource(ClearColor(CLEAR_COLOR));

    app
}
