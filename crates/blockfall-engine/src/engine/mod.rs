//! Game rules and timing built on the core data structures.
//!
//! - [`ShapeCatalog`] - Uniformly random spawn shapes
//! - [`Playfield`] - Grid plus falling piece, driven through the step/lock cycle
//! - [`GameSession`] - Wall-clock gravity, pause and [`SessionStats`]
//! - [`InputTimingController`] - Key auto-repeat turning key events into [`Command`]s
//! - [`GameConfig`] - Board size and timing, loadable with serde
//!
//! # Game Flow
//!
//! 1. A piece spawns centered on the top row
//! 2. The player moves and rotates it; illegal moves are rejected
//! 3. Each gravity step moves it down one row, or locks it when it cannot move
//! 4. Full lines are cleared and the rows above shift down
//! 5. The next piece spawns; if it does not fit, the game is over
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use blockfall_engine::{Command, GameConfig, GameSession};
//!
//! let config = GameConfig::default();
//! let t0 = Instant::now();
//! let mut session = GameSession::with_seed(&config, 7, t0);
//!
//! session.apply(Command::MoveLeft);
//! let report = session.tick(t0 + config.fall_interval).unwrap();
//! assert!(!report.locked);
//! assert!(session.tick(t0 + Duration::from_millis(1500)).is_none());
//! ```

pub use self::{catalog::*, config::*, input::*, playfield::*, session::*, stats::*};

mod catalog;
mod config;
mod input;
mod playfield;
mod session;
mod stats;
