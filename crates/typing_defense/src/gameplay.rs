use bevy::color::palettes::css::{GREEN, RED};
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;
use bevy::sprite::Anchor;
use game_helpers::art::ImageBank;
use game_helpers::floating_text::spawn_floating_text;
use game_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};

use crate::core::config::{
    EXPLOSION_FRAMES, FALL_SPEED, GROUND_Y, MISS_LIMIT, SPAWN_INTERVAL, SPAWN_X_MAX, SPAWN_X_MIN,
    SPAWN_Y, SPRITE_SIZE,
};
use crate::core::{Explosion, FallingWord, GameArt, GameState, GameplayElement, Session, WordBank};

/// Component tag for the input line display
#[derive(Component)]
pub struct InputDisplay;

/// Copies the two game sprites out of the image bank. Runs on every
/// entry into `Playing`; the welcome screen already gated on the bank
/// being ready.
pub fn stage_game_art(mut commands: Commands, bank: Res<ImageBank>) {
    let (Some(asteroid), Some(explosion)) = (bank.image("asteroid"), bank.image("explosion"))
    else {
        error!("image bank is missing the game sprites");
        return;
    };

    commands.insert_resource(GameArt {
        asteroid,
        explosion,
    });
}

/// Resets the session and spawns the input line display.
pub fn spawn_game_elements(mut commands: Commands, mut session: ResMut<Session>) {
    session.reset();

    commands.spawn((
        InputDisplay,
        GameplayElement,
        Text2d::new(">"),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::Srgba(GREEN)),
        Anchor::CenterLeft,
        Transform::from_xyz(
            -WINDOW_WIDTH / 2.0 + 20.0,
            -WINDOW_HEIGHT / 2.0 + 25.0,
            10.0,
        ),
    ));
}

/// Routes keyboard presses into the session: letters grow the input
/// line, backspace trims it, enter submits it against the field.
pub fn handle_keyboard(
    mut commands: Commands,
    mut events: EventReader<KeyboardInput>,
    mut session: ResMut<Session>,
    art: Res<GameArt>,
    mut words: Query<(Entity, &mut FallingWord, &Transform)>,
) {
    for event in events.read() {
        if !event.state.is_pressed() {
            continue;
        }
        match &event.logical_key {
            Key::Character(text) => {
                for c in text.chars() {
                    session.push_char(c);
                }
            }
            Key::Backspace => session.backspace(),
            Key::Enter => {
                let attempt = session.take_buffer();
                submit_attempt(&mut commands, &attempt, &mut session, &art, &mut words);
            }
            _ => {}
        }
    }
}

/// Applies a submitted line. The earliest-spawned word the line is a
/// prefix of receives the attempt; an exact match blows it up. An
/// unmatched line falls through with no effect, the buffer is gone
/// either way.
fn submit_attempt(
    commands: &mut Commands,
    attempt: &str,
    session: &mut Session,
    art: &GameArt,
    words: &mut Query<(Entity, &mut FallingWord, &Transform)>,
) {
    if attempt.is_empty() {
        return;
    }

    let Some((entity, mut word, transform)) = words
        .iter_mut()
        .filter(|(_, word, _)| word.word.starts_with(attempt))
        .min_by_key(|(_, word, _)| word.seq)
    else {
        return;
    };

    word.assign_attempt(attempt);
    if !word.is_destroyed() {
        return;
    }

    let label = word.word.clone();
    let position = transform.translation;
    info!("Destroyed: {label}");

    commands.entity(entity).despawn_recursive();
    session.record_destroyed();

    commands.spawn((
        GameplayElement,
        Explosion::new(EXPLOSION_FRAMES),
        Sprite {
            image: art.explosion.clone(),
            custom_size: Some(Vec2::splat(SPRITE_SIZE)),
            ..default()
        },
        Transform::from_translation(position),
    ));
    spawn_floating_text(
        commands,
        Vec2::new(position.x, position.y + SPRITE_SIZE / 2.0),
        &label,
        GREEN,
    );
}

/// Advances the spawn clock and drops a new word on each interval tick.
pub fn tick_spawn(
    mut commands: Commands,
    mut session: ResMut<Session>,
    bank: Res<WordBank>,
    art: Res<GameArt>,
) {
    let frame = session.next_frame();
    if frame % SPAWN_INTERVAL != 0 || bank.words.is_empty() {
        return;
    }

    let Some(word) = bank.words.get(fastrand::usize(0..bank.words.len())) else {
        return;
    };
    spawn_word(&mut commands, &art, word, frame);
}

/// Picks a spawn column leaving the margin and the sprite footprint
/// inside the play field.
fn spawn_column() -> f32 {
    fastrand::f32().mul_add(SPAWN_X_MAX - SPAWN_X_MIN, SPAWN_X_MIN)
}

fn spawn_word(commands: &mut Commands, art: &GameArt, word: &str, seq: u64) -> Entity {
    let entity = commands
        .spawn((
            GameplayElement,
            FallingWord::new(word, FALL_SPEED, seq),
            Sprite {
                image: art.asteroid.clone(),
                custom_size: Some(Vec2::splat(SPRITE_SIZE)),
                ..default()
            },
            Transform::from_xyz(spawn_column(), SPAWN_Y, 0.0),
        ))
        .id();

    // word label centered over the asteroid
    commands.entity(entity).with_children(|parent| {
        parent.spawn((
            Text2d::new(word),
            TextFont {
                font_size: 32.0,
                ..default()
            },
            TextColor(Color::WHITE),
            TextLayout::new_with_justify(JustifyText::Center),
            Transform::from_xyz(0.0, 0.0, 1.0),
        ));
    });

    entity
}

/// Moves every word down by its per-tick speed.
pub fn advance_words(mut words: Query<(&FallingWord, &mut Transform)>) {
    for (word, mut transform) in &mut words {
        transform.translation.y -= word.speed;
    }
}

/// Removes words that dropped past the ground strip, charging a miss
/// for each, and ends the run once the miss limit is reached.
pub fn resolve_misses(
    mut commands: Commands,
    mut session: ResMut<Session>,
    words: Query<(Entity, &FallingWord, &Transform)>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for (entity, word, transform) in &words {
        if transform.translation.y >= GROUND_Y {
            continue;
        }
        info!("Missed: {}", word.word);
        session.record_missed();
        commands.entity(entity).despawn_recursive();
        spawn_floating_text(
            &mut commands,
            Vec2::new(transform.translation.x, GROUND_Y),
            "Missed!",
            RED,
        );
    }

    if session.missed() >= MISS_LIMIT {
        next_state.set(GameState::GameOver);
    }
}

/// Burns one tick off every explosion and clears the expired ones.
pub fn update_explosions(mut commands: Commands, mut explosions: Query<(Entity, &mut Explosion)>) {
    for (entity, mut explosion) in &mut explosions {
        explosion.tick();
        if explosion.is_expired() {
            commands.entity(entity).despawn();
        }
    }
}

/// Redraws the input line under the play field.
pub fn update_hud(session: Res<Session>, mut display: Query<&mut Text2d, With<InputDisplay>>) {
    for mut text in &mut display {
        *text = Text2d::new(format!(">{}", session.buffer()));
    }
}

/// Cleans up everything a run left behind when leaving `Playing`.
pub fn cleanup_game(
    mut commands: Commands,
    query: Query<
        Entity,
        Or<(
            With<GameplayElement>,
            With<game_helpers::floating_text::FloatingText>,
        )>,
    >,
) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use bevy::input::ButtonState;
    use bevy::state::app::StatesPlugin;

    use super::*;

    fn test_app(words: &[&str]) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.insert_state(GameState::Playing);
        app.init_resource::<Session>();
        app.insert_resource(WordBank {
            words: words.iter().map(ToString::to_string).collect(),
        });
        app.insert_resource(GameArt::default());
        app.add_event::<KeyboardInput>();
        app.add_systems(OnEnter(GameState::Playing), spawn_game_elements);
        app.add_systems(OnExit(GameState::Playing), cleanup_game);
        app.add_systems(
            Update,
            (
                update_explosions,
                handle_keyboard,
                tick_spawn,
                advance_words,
                resolve_misses,
                update_hud,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
        app
    }

    fn press(app: &mut App, key: Key) {
        let key_code = match &key {
            Key::Enter => KeyCode::Enter,
            Key::Backspace => KeyCode::Backspace,
            _ => KeyCode::KeyA,
        };
        app.world_mut().send_event(KeyboardInput {
            key_code,
            logical_key: key,
            state: ButtonState::Pressed,
            repeat: false,
            window: Entity::PLACEHOLDER,
        });
    }

    fn type_line(app: &mut App, line: &str) {
        for c in line.chars() {
            press(app, Key::Character(c.to_string().into()));
        }
        press(app, Key::Enter);
    }

    fn count<C: Component>(app: &mut App) -> usize {
        let mut query = app.world_mut().query::<&C>();
        query.iter(app.world()).count()
    }

    fn session(app: &App) -> &Session {
        app.world().resource::<Session>()
    }

    fn current_state(app: &App) -> GameState {
        app.world().resource::<State<GameState>>().get().clone()
    }

    #[test]
    fn spawn_column_stays_inside_the_margins() {
        fastrand::seed(7);
        for _ in 0..1000 {
            let x = spawn_column();
            assert!(x >= SPAWN_X_MIN, "column {x} left of the margin");
            assert!(x <= SPAWN_X_MAX, "column {x} right of the margin");
        }
    }

    #[test]
    fn words_spawn_on_the_interval_tick() {
        let mut app = test_app(&["cat"]);
        for _ in 0..SPAWN_INTERVAL - 1 {
            app.update();
        }
        assert_eq!(count::<FallingWord>(&mut app), 0, "too early to spawn");

        app.update();
        assert_eq!(count::<FallingWord>(&mut app), 1, "tick 60 spawns a word");

        for _ in 0..SPAWN_INTERVAL {
            app.update();
        }
        assert_eq!(count::<FallingWord>(&mut app), 2, "tick 120 spawns again");
    }

    #[test]
    fn typed_word_is_destroyed_above_the_ground() {
        let mut app = test_app(&["cat"]);
        for _ in 0..SPAWN_INTERVAL + 4 {
            app.update();
        }

        type_line(&mut app, "cat");
        app.update(); // tick 65 carries the submission

        let session = session(&app);
        assert_eq!(session.destroyed(), 1);
        assert_eq!(session.missed(), 0);
        assert_eq!(session.buffer(), "", "submit consumed the line");
        assert_eq!(count::<FallingWord>(&mut app), 0, "word must be gone");

        let mut explosions = app.world_mut().query::<&Explosion>();
        let frames: Vec<u32> = explosions
            .iter(app.world())
            .map(Explosion::frames_left)
            .collect();
        assert_eq!(frames, vec![EXPLOSION_FRAMES], "one fresh explosion");
    }

    #[test]
    fn explosion_burns_out_after_its_fixed_duration() {
        let mut app = test_app(&["cat"]);
        app.update();
        app.world_mut().spawn(Explosion::new(EXPLOSION_FRAMES));

        for _ in 0..EXPLOSION_FRAMES - 1 {
            app.update();
        }
        assert_eq!(count::<Explosion>(&mut app), 1, "still burning");

        app.update();
        assert_eq!(count::<Explosion>(&mut app), 0, "expired and removed");
    }

    #[test]
    fn untyped_word_falls_to_the_ground_and_is_missed() {
        let mut app = test_app(&["cat"]);
        // A word needs (SPAWN_Y - GROUND_Y) / FALL_SPEED ticks to cross.
        let crossing = ((SPAWN_Y - GROUND_Y) / FALL_SPEED) as u64 + 1;
        for _ in 0..SPAWN_INTERVAL + crossing {
            app.update();
        }

        let session = session(&app);
        assert_eq!(session.missed(), 1, "first word crossed the ground");
        assert_eq!(session.destroyed(), 0);
        assert_eq!(count::<Explosion>(&mut app), 0, "a miss never explodes");
    }

    #[test]
    fn word_below_the_ground_is_charged_exactly_once() {
        let mut app = test_app(&[]);
        app.update();
        app.world_mut().spawn((
            FallingWord::new("cat", FALL_SPEED, 1),
            Transform::from_xyz(0.0, GROUND_Y - 1.0, 0.0),
        ));

        app.update();
        assert_eq!(session(&app).missed(), 1);
        assert_eq!(count::<FallingWord>(&mut app), 0);

        app.update();
        assert_eq!(session(&app).missed(), 1, "no double charge");
    }

    #[test]
    fn earliest_spawned_prefix_match_receives_the_attempt() {
        let mut app = test_app(&[]);
        app.update();
        app.world_mut().spawn((
            FallingWord::new("door", FALL_SPEED, 1),
            Transform::from_xyz(-100.0, 200.0, 0.0),
        ));
        app.world_mut().spawn((
            FallingWord::new("dog", FALL_SPEED, 2),
            Transform::from_xyz(100.0, 200.0, 0.0),
        ));

        type_line(&mut app, "do");
        app.update();

        let words = {
            let mut query = app.world_mut().query::<&FallingWord>();
            let mut words: Vec<(u64, String)> = query
                .iter(app.world())
                .map(|w| (w.seq, w.typed.clone()))
                .collect();
            words.sort_unstable();
            words
        };
        assert_eq!(
            words,
            vec![(1, "do".to_string()), (2, String::new())],
            "only the first-spawned match takes the attempt"
        );
        assert_eq!(session(&app).destroyed(), 0, "a prefix is not a kill");

        // An exact word skips past the non-matching earlier spawn.
        type_line(&mut app, "dog");
        app.update();
        assert_eq!(session(&app).destroyed(), 1);
        assert_eq!(count::<FallingWord>(&mut app), 1, "door is still up");
    }

    #[test]
    fn unmatched_submission_clears_the_buffer_and_nothing_else() {
        let mut app = test_app(&[]);
        app.update();
        app.world_mut().spawn((
            FallingWord::new("cat", FALL_SPEED, 1),
            Transform::from_xyz(0.0, 200.0, 0.0),
        ));

        type_line(&mut app, "zebra");
        app.update();

        let session = session(&app);
        assert_eq!(session.buffer(), "", "buffer cleared on a whiff");
        assert_eq!(session.destroyed(), 0);
        assert_eq!(count::<FallingWord>(&mut app), 1);
        assert_eq!(count::<Explosion>(&mut app), 0);
    }

    #[test]
    fn backspace_and_non_letters_shape_the_input_line() {
        let mut app = test_app(&[]);
        app.update();

        press(&mut app, Key::Character("c".into()));
        press(&mut app, Key::Character("1".into()));
        press(&mut app, Key::Character("a".into()));
        press(&mut app, Key::Character("x".into()));
        press(&mut app, Key::Backspace);
        app.update();
        assert_eq!(session(&app).buffer(), "ca", "digits skipped, x erased");

        press(&mut app, Key::Backspace);
        press(&mut app, Key::Backspace);
        press(&mut app, Key::Backspace);
        app.update();
        assert_eq!(session(&app).buffer(), "", "backspace on empty is a no-op");
    }

    #[test]
    fn tenth_miss_ends_the_run() {
        let mut app = test_app(&[]);
        app.update();
        for _ in 0..MISS_LIMIT - 1 {
            app.world_mut().resource_mut::<Session>().record_missed();
        }
        app.update();
        assert_eq!(current_state(&app), GameState::Playing, "nine is not enough");

        app.world_mut().spawn((
            FallingWord::new("cat", FALL_SPEED, 1),
            Transform::from_xyz(0.0, GROUND_Y - 1.0, 0.0),
        ));
        app.update();
        app.update();
        assert_eq!(current_state(&app), GameState::GameOver);
    }

    #[test]
    fn restart_yields_a_fresh_session() {
        let mut app = test_app(&["cat"]);
        for _ in 0..SPAWN_INTERVAL + 4 {
            app.update();
        }
        type_line(&mut app, "ca");
        app.update();
        assert_eq!(count::<FallingWord>(&mut app), 1);

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::GameOver);
        app.update();
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Playing);
        app.update();

        let session = session(&app);
        assert_eq!(session.frame(), 0);
        assert_eq!(session.destroyed(), 0);
        assert_eq!(session.missed(), 0);
        assert_eq!(session.buffer(), "");
        assert_eq!(count::<FallingWord>(&mut app), 0, "field swept on restart");
        assert_eq!(count::<Explosion>(&mut app), 0);
    }
}
