use bevy::prelude::*;
use game_helpers::art::{self, ArtPlugin, BankValidation};
use game_helpers::floating_text::animate_floating_text;

mod core;
mod game_over;
mod gameplay;
mod summary;
mod welcome;

use self::core::{GameArt, GameState, Session, WordBank};
use game_over::{cleanup_game_over, handle_game_over_input, spawn_game_over_screen};
use gameplay::{
    advance_words, cleanup_game, handle_keyboard, resolve_misses, spawn_game_elements,
    stage_game_art, tick_spawn, update_explosions, update_hud,
};
use summary::report_session_summary;
use welcome::{despawn_welcome_screen, handle_welcome_input, spawn_welcome_screen};

/// Condition system that checks if both game sprites have finished loading
fn art_ready(validation: Res<BankValidation>) -> bool {
    art::is_bank_ready(&validation)
}

/// Entry point for the game
pub fn run() {
    let mut app = game_helpers::get_default_app("Typing Defense");

    app.add_plugins(ArtPlugin::new(&[
        ("asteroid", "asteroid.png"),
        ("explosion", "explosion.png"),
    ]))
    .init_state::<GameState>()
    .init_resource::<Session>()
    .init_resource::<WordBank>()
    .init_resource::<GameArt>()
    .add_systems(Startup, setup_camera)
    // Welcome state
    .add_systems(OnEnter(GameState::Welcome), spawn_welcome_screen)
    .add_systems(
        Update,
        handle_welcome_input
            .run_if(in_state(GameState::Welcome))
            .run_if(art_ready),
    )
    .add_systems(OnExit(GameState::Welcome), despawn_welcome_screen)
    // Playing state
    .add_systems(
        OnEnter(GameState::Playing),
        (stage_game_art, spawn_game_elements),
    )
    .add_systems(
        Update,
        (
            (
                update_explosions,
                handle_keyboard,
                tick_spawn,
                advance_words,
                resolve_misses,
                update_hud,
            )
                .chain(),
            animate_floating_text,
        )
            .run_if(in_state(GameState::Playing)),
    )
    .add_systems(OnExit(GameState::Playing), cleanup_game)
    // Game over state
    .add_systems(OnEnter(GameState::GameOver), spawn_game_over_screen)
    .add_systems(
        Update,
        handle_game_over_input.run_if(in_state(GameState::GameOver)),
    )
    .add_systems(OnExit(GameState::GameOver), cleanup_game_over)
    // Final tally on the way out
    .add_systems(Last, report_session_summary);

    app.run();
}

/// Sets up the main 2D camera
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
