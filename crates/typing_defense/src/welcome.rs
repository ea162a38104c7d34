use bevy::color::palettes::css::GREEN;
use bevy::prelude::*;
use game_helpers::input::just_activated;

use crate::core::GameState;

/// Component marker for welcome screen entities.
#[derive(Component)]
pub struct WelcomeScreen;

/// Spawns the title screen.
pub fn spawn_welcome_screen(mut commands: Commands) {
    let welcome_entity = commands
        .spawn((WelcomeScreen, Transform::default(), Visibility::Visible))
        .id();

    commands.entity(welcome_entity).with_children(|parent| {
        parent.spawn((
            Text2d::new("Typing Defense"),
            TextFont {
                font_size: 40.0,
                ..default()
            },
            TextLayout::new_with_justify(JustifyText::Center),
            TextColor(Color::WHITE),
            Transform::from_translation(Vec3::new(0.0, 60.0, 0.0)),
        ));

        parent.spawn((
            Text2d::new("Click to Play"),
            TextFont {
                font_size: 32.0,
                ..default()
            },
            TextLayout::new_with_justify(JustifyText::Center),
            TextColor(Color::Srgba(GREEN)),
            Transform::from_translation(Vec3::new(0.0, -30.0, 0.0)),
        ));
    });
}

/// Starts a run when the player clicks or taps anywhere.
pub fn handle_welcome_input(
    mouse_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if just_activated(&mouse_input, &touch_input) {
        next_state.set(GameState::Playing);
    }
}

/// Cleans up the welcome screen by despawning its entities.
pub fn despawn_welcome_screen(mut commands: Commands, query: Query<Entity, With<WelcomeScreen>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
