use bevy::prelude::*;

/// Returns whether the player pressed anywhere this frame, mouse or touch.
#[must_use]
pub fn just_activated(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
) -> bool {
    button_input.just_pressed(MouseButton::Left) || touch_input.any_just_pressed()
}
