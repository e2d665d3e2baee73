//! Key auto-repeat timing.
//!
//! Turns key-down/key-up events into piece commands. Directional keys fire
//! once on press, then repeat after an initial delay at a fixed interval for as
//! long as they stay held. Rotation keys fire once per press.
//!
//! Repeat timing depends only on how long ago the key went down, so the same
//! repeats come out however the polls are spaced.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;

use super::config::GameConfig;

/// Upper bound on commands returned by a single [`InputTimingController::poll`].
pub const MAX_COMMANDS_PER_POLL: usize = 32;

/// Commands produced by one poll.
pub type Commands = ArrayVec<Command, MAX_COMMANDS_PER_POLL>;

/// A request to move or rotate the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveDown,
    RotateClockwise,
    RotateCounterClockwise,
}

/// Keys the timing controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKey {
    Left,
    Right,
    Down,
    Rotate,
    RotateCounter,
}

impl InputKey {
    /// Returns the command this key issues.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            InputKey::Left => Command::MoveLeft,
            InputKey::Right => Command::MoveRight,
            InputKey::Down => Command::MoveDown,
            InputKey::Rotate => Command::RotateClockwise,
            InputKey::RotateCounter => Command::RotateCounterClockwise,
        }
    }

    /// Returns whether holding the key repeats its command.
    #[must_use]
    pub const fn repeats(self) -> bool {
        matches!(self, InputKey::Left | InputKey::Right | InputKey::Down)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeldKey {
    pressed_at: Instant,
    last_seen: Instant,
    repeats: u32,
}

/// Held state of the repeating keys.
///
/// Owned by the frame driver and handed to the controller on every event and
/// poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputTimingState {
    left: Option<HeldKey>,
    right: Option<HeldKey>,
    down: Option<HeldKey>,
}

impl InputTimingState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a repeating key is currently held.
    #[must_use]
    pub fn is_held(&self, key: InputKey) -> bool {
        match key {
            InputKey::Left => self.left.is_some(),
            InputKey::Right => self.right.is_some(),
            InputKey::Down => self.down.is_some(),
            InputKey::Rotate | InputKey::RotateCounter => false,
        }
    }

    /// Forgets every held key.
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    fn slot_mut(&mut self, key: InputKey) -> Option<&mut Option<HeldKey>> {
        match key {
            InputKey::Left => Some(&mut self.left),
            InputKey::Right => Some(&mut self.right),
            InputKey::Down => Some(&mut self.down),
            InputKey::Rotate | InputKey::RotateCounter => None,
        }
    }
}

/// Initial-delay + repeat-interval policy.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use blockfall_engine::{Command, InputKey, InputTimingController, InputTimingState};
///
/// let controller =
///     InputTimingController::new(Duration::from_millis(200), Duration::from_millis(150));
/// let mut state = InputTimingState::new();
/// let t0 = Instant::now();
///
/// assert_eq!(
///     controller.key_down(&mut state, InputKey::Left, t0),
///     Some(Command::MoveLeft)
/// );
/// assert!(controller.poll(&mut state, t0 + Duration::from_millis(199)).is_empty());
/// assert_eq!(
///     controller.poll(&mut state, t0 + Duration::from_millis(200)).as_slice(),
///     &[Command::MoveLeft]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputTimingController {
    initial_delay: Duration,
    repeat_interval: Duration,
    release_timeout: Option<Duration>,
}

impl InputTimingController {
    #[must_use]
    pub fn new(initial_delay: Duration, repeat_interval: Duration) -> Self {
        assert!(!repeat_interval.is_zero(), "repeat interval must be non-zero");
        Self {
            initial_delay,
            repeat_interval,
            release_timeout: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.key_initial_delay, config.key_repeat_interval)
    }

    /// Treats a held key as released once no press has been seen for `timeout`.
    ///
    /// For terminals that never report key releases; there the OS key repeat
    /// keeps a held key alive.
    #[must_use]
    pub fn with_release_timeout(self, timeout: Option<Duration>) -> Self {
        Self {
            release_timeout: timeout,
            ..self
        }
    }

    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    #[must_use]
    pub fn repeat_interval(&self) -> Duration {
        self.repeat_interval
    }

    #[must_use]
    pub fn release_timeout(&self) -> Option<Duration> {
        self.release_timeout
    }

    /// Handles a key press.
    ///
    /// Returns the key's command on a fresh press. A press of a key that is
    /// already held (an OS auto-repeat) only refreshes it and returns nothing.
    pub fn key_down(
        &self,
        state: &mut InputTimingState,
        key: InputKey,
        now: Instant,
    ) -> Option<Command> {
        let Some(slot) = state.slot_mut(key) else {
            return Some(key.command());
        };
        if let Some(held) = slot {
            held.last_seen = now;
            return None;
        }
        *slot = Some(HeldKey {
            pressed_at: now,
            last_seen: now,
            repeats: 0,
        });
        Some(key.command())
    }

    /// Handles a key release; the key stops repeating.
    pub fn key_up(&self, state: &mut InputTimingState, key: InputKey) {
        if let Some(slot) = state.slot_mut(key) {
            *slot = None;
        }
    }

    /// Returns the repeats that have come due since the last poll.
    pub fn poll(&self, state: &mut InputTimingState, now: Instant) -> Commands {
        let mut commands = Commands::new();
        for key in [InputKey::Left, InputKey::Right, InputKey::Down] {
            let Some(slot) = state.slot_mut(key) else {
                continue;
            };
            let Some(held) = *slot else {
                continue;
            };
            if self
                .release_timeout
                .is_some_and(|timeout| now.saturating_duration_since(held.last_seen) > timeout)
            {
                *slot = None;
                continue;
            }
            let due = self.due_repeats(now.saturating_duration_since(held.pressed_at));
            for _ in held.repeats..due {
                _ = commands.try_push(key.command());
            }
            *slot = Some(HeldKey {
                repeats: held.repeats.max(due),
                ..held
            });
        }
        commands
    }

    /// Number of repeats due `elapsed` after the press: one at the initial
    /// delay, then one per repeat interval.
    fn due_repeats(&self, elapsed: Duration) -> u32 {
        let Some(past_delay) = elapsed.checked_sub(self.initial_delay) else {
            return 0;
        };
        let intervals = past_delay.as_nanos() / self.repeat_interval.as_nanos();
        u32::try_from(intervals)
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }
}

impl Default for InputTimingController {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
