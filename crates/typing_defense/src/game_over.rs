use bevy::color::palettes::css::{GREEN, RED};
use bevy::prelude::*;
use game_helpers::input::just_activated;
use game_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};

use crate::core::{GameState, Session};

/// Component marker for game over screen entities
#[derive(Component)]
pub struct GameOverScreen;

/// Spawns the game over screen with the run's tally.
pub fn spawn_game_over_screen(mut commands: Commands, session: Res<Session>) {
    // Semi-transparent overlay above the leftover play field
    commands.spawn((
        GameOverScreen,
        Sprite {
            color: Color::srgba(0.0, 0.0, 0.0, 0.8),
            custom_size: Some(Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 20.0),
        Visibility::Visible,
    ));

    commands.spawn((
        GameOverScreen,
        Text2d::new("Game Over"),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        TextLayout::new_with_justify(JustifyText::Center),
        TextColor(Color::Srgba(RED)),
        Transform::from_xyz(0.0, 80.0, 21.0),
    ));

    commands.spawn((
        GameOverScreen,
        Text2d::new(format!(
            "Destroyed: {}  Missed: {}",
            session.destroyed(),
            session.missed()
        )),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextLayout::new_with_justify(JustifyText::Center),
        TextColor(Color::WHITE),
        Transform::from_xyz(0.0, 0.0, 21.0),
    ));

    commands.spawn((
        GameOverScreen,
        Text2d::new("Click to Restart"),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextLayout::new_with_justify(JustifyText::Center),
        TextColor(Color::Srgba(GREEN)),
        Transform::from_xyz(0.0, -100.0, 21.0),
    ));
}

/// Restarts the game when the player clicks or taps.
pub fn handle_game_over_input(
    mouse_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if just_activated(&mouse_input, &touch_input) {
        next_state.set(GameState::Playing);
    }
}

/// Cleans up the game over screen
pub fn cleanup_game_over(mut commands: Commands, query: Query<Entity, With<GameOverScreen>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
