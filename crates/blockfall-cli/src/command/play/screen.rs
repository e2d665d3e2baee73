use std::time::{Duration, Instant};

use blockfall_engine::{
    GameConfig, GameSession, InputKey, InputTimingController, InputTimingState, SessionState,
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};

use crate::ui::widgets::{SessionDisplay, style};

/// Maps a key to the piece control it drives.
fn input_key(code: KeyCode) -> Option<InputKey> {
    match code {
        KeyCode::Left => Some(InputKey::Left),
        KeyCode::Right => Some(InputKey::Right),
        KeyCode::Down => Some(InputKey::Down),
        KeyCode::Up | KeyCode::Char('x') => Some(InputKey::Rotate),
        KeyCode::Char('z') => Some(InputKey::RotateCounter),
        _ => None,
    }
}

#[derive(Debug)]
pub(super) struct PlayScreen {
    session: GameSession,
    input: InputTimingController,
    keys: InputTimingState,
    is_exiting: bool,
}

impl PlayScreen {
    pub(super) fn new(config: &GameConfig, seed: Option<u64>, now: Instant) -> Self {
        let session = match seed {
            Some(seed) => GameSession::with_seed(config, seed, now),
            None => GameSession::new(config, now),
        };
        Self {
            session,
            input: InputTimingController::from_config(config),
            keys: InputTimingState::new(),
            is_exiting: false,
        }
    }

    pub(super) fn set_release_timeout(&mut self, timeout: Option<Duration>) {
        self.input = self.input.with_release_timeout(timeout);
    }

    pub(super) fn session(&self) -> &GameSession {
        &self.session
    }

    pub(super) fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub(super) fn handle_event(&mut self, event: &Event, now: Instant) {
        if let Event::Key(key) = event {
            self.handle_key(*key, now);
        }
    }

    fn handle_key(&mut self, event: KeyEvent, now: Instant) {
        let is_press = event.kind == KeyEventKind::Press;
        match event.code {
            KeyCode::Char('q') | KeyCode::Esc if is_press => self.is_exiting = true,
            KeyCode::Char('p') if is_press => {
                self.keys.release_all();
                self.session.toggle_pause(now);
            }
            code => {
                let Some(key) = input_key(code) else {
                    return;
                };
                match event.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if let Some(command) = self.input.key_down(&mut self.keys, key, now) {
                            self.session.apply(command);
                        }
                    }
                    KeyEventKind::Release => self.input.key_up(&mut self.keys, key),
                }
            }
        }
    }

    /// Runs one frame: due key repeats first, then gravity.
    pub(super) fn update(&mut self, now: Instant) {
        if !self.session.state().is_playing() {
            return;
        }
        for command in self.input.poll(&mut self.keys, now) {
            self.session.apply(command);
        }
        self.session.tick(now);
    }

    pub(super) fn draw(&self, frame: &mut Frame<'_>) {
        let help_text = match self.session.state() {
            SessionState::Playing => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ X (Rotate) | Z (Rotate Back) | P (Pause) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | Q (Quit)",
            SessionState::GameOver => "Controls: Q (Quit)",
        };
        let help_text = Text::from(help_text).style(style::HELP).centered();

        let board_rows = u16::try_from(self.session.grid().height()).unwrap_or(u16::MAX);
        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(board_rows.saturating_add(2)),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(SessionDisplay::new(&self.session), main_area);
        frame.render_widget(help_text, help_area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    fn screen(t0: Instant) -> PlayScreen {
        PlayScreen::new(&GameConfig::default(), Some(4), t0)
    }

    fn col(screen: &PlayScreen) -> usize {
        screen.session().field().active_piece().unwrap().anchor().col
    }

    #[test]
    fn test_held_key_repeats_until_release() {
        let t0 = Instant::now();
        let mut screen = screen(t0);
        let start = col(&screen);

        screen.handle_event(&key(KeyCode::Left, KeyEventKind::Press), t0);
        assert_eq!(col(&screen), start - 1);
        screen.update(t0 + ms(100));
        assert_eq!(col(&screen), start - 1);
        screen.update(t0 + ms(200));
        assert_eq!(col(&screen), start - 2);

        screen.handle_event(&key(KeyCode::Left, KeyEventKind::Release), t0 + ms(250));
        screen.update(t0 + ms(400));
        assert_eq!(col(&screen), start - 2);
    }

    #[test]
    fn test_terminal_repeat_events_do_not_add_moves() {
        let t0 = Instant::now();
        let mut screen = screen(t0);
        let start = col(&screen);

        screen.handle_event(&key(KeyCode::Right, KeyEventKind::Press), t0);
        for t in [30, 60, 90] {
            screen.handle_event(&key(KeyCode::Right, KeyEventKind::Repeat), t0 + ms(t));
        }
        assert_eq!(col(&screen), start + 1);
    }

    #[test]
    fn test_release_timeout_without_release_events() {
        let t0 = Instant::now();
        let mut screen = screen(t0);
        screen.set_release_timeout(Some(ms(150)));
        let start = col(&screen);

        screen.handle_event(&key(KeyCode::Left, KeyEventKind::Press), t0);
        screen.update(t0 + ms(300));
        assert_eq!(col(&screen), start - 1);
    }

    #[test]
    fn test_pause_and_quit_keys() {
        let t0 = Instant::now();
        let mut screen = screen(t0);

        screen.handle_event(&key(KeyCode::Char('p'), KeyEventKind::Press), t0);
        assert!(screen.session().state().is_paused());
        screen.handle_event(&key(KeyCode::Char('p'), KeyEventKind::Release), t0);
        assert!(screen.session().state().is_paused());

        let start = col(&screen);
        screen.handle_event(&key(KeyCode::Left, KeyEventKind::Press), t0);
        assert_eq!(col(&screen), start);

        assert!(!screen.is_exiting());
        screen.handle_event(&key(KeyCode::Esc, KeyEventKind::Press), t0);
        assert!(screen.is_exiting());
    }

    #[test]
    fn test_update_applies_gravity() {
        let t0 = Instant::now();
        let mut screen = screen(t0);
        let row = screen.session().field().active_piece().unwrap().anchor().row;
        screen.update(t0 + GameConfig::default().fall_interval);
        assert_eq!(
            screen.session().field().active_piece().unwrap().anchor().row,
            row + 1
        );
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(input_key(KeyCode::Up), Some(InputKey::Rotate));
        assert_eq!(input_key(KeyCode::Char('x')), Some(InputKey::Rotate));
        assert_eq!(input_key(KeyCode::Char('z')), Some(InputKey::RotateCounter));
        assert_eq!(input_key(KeyCode::Char('a')), None);
    }
}
