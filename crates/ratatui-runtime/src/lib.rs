//! A small fixed-rate frame loop for ratatui applications.
//!
//! The [`Runtime`] wakes once per frame to call [`App::update`], redraws after
//! every update or input event, and hands each event to the app together with
//! the time it was read.

pub use self::{app::App, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
