use std::time::{Duration, Instant};

use blockfall_engine::{GameConfig, GameSession};
use crossterm::event::Event;
use ratatui::Frame;
use ratatui_runtime::{App, Runtime};

use super::screen::PlayScreen;

const FPS: f64 = 60.0;

/// Release timeout used when the terminal cannot report key releases.
const FALLBACK_RELEASE_TIMEOUT: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub(super) struct PlayApp {
    screen: PlayScreen,
    release_timeout: Option<Duration>,
}

impl PlayApp {
    pub(super) fn new(
        config: &GameConfig,
        seed: Option<u64>,
        release_timeout: Option<Duration>,
        now: Instant,
    ) -> Self {
        Self {
            screen: PlayScreen::new(config, seed, now),
            release_timeout,
        }
    }

    pub(super) fn session(&self) -> &GameSession {
        self.screen.session()
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_frame_rate(FPS);
        let release_timeout = self.release_timeout.or_else(|| {
            (!runtime.key_release_events()).then_some(FALLBACK_RELEASE_TIMEOUT)
        });
        self.screen.set_release_timeout(release_timeout);
    }

    fn should_exit(&self) -> bool {
        self.screen.is_exiting()
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event, now: Instant) {
        self.screen.handle_event(&event, now);
    }

    fn update(&mut self, _runtime: &mut Runtime, now: Instant) {
        self.screen.update(now);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }
}
