use bevy::prelude::*;

/// Game states that control the flow of the application
#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum GameState {
    #[default]
    Welcome,
    Playing,
    GameOver,
}

/// Component for a word riding a falling asteroid
#[derive(Component)]
pub struct FallingWord {
    /// Target the player has to type out
    pub word: String,
    /// Last attempt submitted against this word
    pub typed: String,
    /// Fall distance per tick, in pixels
    pub speed: f32,
    /// Spawn order; the earliest spawn wins a contested prefix
    pub seq: u64,
}

impl FallingWord {
    #[must_use]
    pub fn new(word: impl Into<String>, speed: f32, seq: u64) -> Self {
        Self {
            word: word.into(),
            typed: String::new(),
            speed,
            seq,
        }
    }

    /// Records the submitted text as this word's current attempt.
    pub fn assign_attempt(&mut self, attempt: &str) {
        self.typed = attempt.to_owned();
    }

    /// True once the recorded attempt spells the whole target.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.typed == self.word
    }
}

/// Component for the short-lived blast left where a word was destroyed
#[derive(Component)]
pub struct Explosion {
    frames_left: u32,
}

impl Explosion {
    #[must_use]
    pub const fn new(frames: u32) -> Self {
        Self {
            frames_left: frames,
        }
    }

    /// Burns one tick off the effect, stopping at zero.
    pub const fn tick(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
    }

    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.frames_left == 0
    }

    #[must_use]
    pub const fn frames_left(&self) -> u32 {
        self.frames_left
    }
}

/// Marker for entities that only live while a run is in progress
#[derive(Component, Default)]
pub struct GameplayElement;

/// Shared sprite handles, staged once the image bank is ready
#[derive(Resource, Default)]
pub struct GameArt {
    pub asteroid: Handle<Image>,
    pub explosion: Handle<Image>,
}

/// Vocabulary the spawner draws from
#[derive(Resource)]
pub struct WordBank {
    pub words: Vec<String>,
}

impl Default for WordBank {
    fn default() -> Self {
        Self {
            words: config::VOCABULARY.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Per-run simulation state: the tick clock, both score counters and the
/// in-progress input line. Reset on every (re)start.
#[derive(Resource, Default)]
pub struct Session {
    frame: u64,
    destroyed: u32,
    missed: u32,
    buffer: String,
}

impl Session {
    /// Returns the session to its start-of-run state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advances the tick clock and returns the new tick number.
    pub const fn next_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Appends an ASCII letter to the input line. Anything else is
    /// ignored by policy, not an error.
    pub fn push_char(&mut self, c: char) {
        if c.is_ascii_alphabetic() {
            self.buffer.push(c);
        }
    }

    /// Drops the last letter of the input line, if any.
    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Consumes the input line, leaving it empty.
    pub fn take_buffer(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub const fn record_destroyed(&mut self) {
        self.destroyed += 1;
    }

    pub const fn record_missed(&mut self) {
        self.missed += 1;
    }

    #[must_use]
    pub const fn destroyed(&self) -> u32 {
        self.destroyed
    }

    #[must_use]
    pub const fn missed(&self) -> u32 {
        self.missed
    }

    /// Words that finished their run, destroyed or missed.
    #[must_use]
    pub const fn words_seen(&self) -> u32 {
        self.destroyed + self.missed
    }

    /// Destroyed and missed shares of the words seen, in percent.
    /// Both are zero when nothing ever spawned.
    #[must_use]
    pub fn percentages(&self) -> (f32, f32) {
        let total = self.words_seen();
        if total == 0 {
            return (0.0, 0.0);
        }
        let total = total as f32;
        (
            100.0 * self.destroyed as f32 / total,
            100.0 * self.missed as f32 / total,
        )
    }
}

/// Game configuration constants
pub mod config {
    use game_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};

    /// Footprint both images are drawn at, in pixels
    pub const SPRITE_SIZE: f32 = 150.0;

    /// Ticks between automatic word spawns
    pub const SPAWN_INTERVAL: u64 = 60;
    /// Fall distance per tick
    pub const FALL_SPEED: f32 = 2.0;
    /// Horizontal margin words keep from the play field edges
    pub const SPAWN_MARGIN: f32 = 50.0;
    /// Height of the strip above the bottom edge where words are lost
    pub const GROUND_MARGIN: f32 = 50.0;
    /// Ticks an explosion stays on screen
    pub const EXPLOSION_FRAMES: u32 = 15;
    /// Misses that end the run
    pub const MISS_LIMIT: u32 = 10;

    /// Words enter just above the top edge
    pub const SPAWN_Y: f32 = WINDOW_HEIGHT / 2.0 + SPRITE_SIZE / 2.0;
    /// Words whose center drops below this line are lost
    pub const GROUND_Y: f32 = -(WINDOW_HEIGHT / 2.0) + GROUND_MARGIN;

    /// Leftmost and rightmost spawn columns
    pub const SPAWN_X_MIN: f32 = -(WINDOW_WIDTH / 2.0) + SPAWN_MARGIN + SPRITE_SIZE / 2.0;
    pub const SPAWN_X_MAX: f32 = WINDOW_WIDTH / 2.0 - SPAWN_MARGIN - SPRITE_SIZE / 2.0;

    pub const VOCABULARY: [&str; 9] = [
        "apple", "banana", "cherry", "door", "cat", "dog", "elephant", "frog", "grape",
    ];
}
