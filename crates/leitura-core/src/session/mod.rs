//! Paced word-reveal session: the state behind the reading screen.
//!
//! The pacing timer is a deadline owned by the session and the motion
//! subscription is owned by its [`MotionTrigger`]; both exist exactly while
//! a reading run is active and are released on every transition that ends
//! one.

mod speed;

pub use speed::Speed;

use alloc::{string::String, vec::Vec};
use core::fmt;

use log::{debug, info, warn};

use crate::{
    feedback::Feedback,
    motion::{MotionSensor, MotionTrigger, SAMPLE_INTERVAL_MS, SHAKE_THRESHOLD_G},
    persistence::{KeyValueStore, SessionSnapshot, SessionStore},
    render::{PAUSE_LABEL, START_LABEL},
    text_policy,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    /// Not reading and no run in progress.
    Idle,
    /// Pacing timer and motion trigger active.
    Reading,
    /// Not reading, with words and position kept from an interrupted run.
    PausedDirty,
}

/// Outcome of the primary button.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Toggle {
    Started,
    Resumed,
    Paused,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionError {
    /// Start requested with nothing but whitespace in the text.
    EmptyText,
    /// Edit requested on a control that is locked while reading.
    ReadingInProgress,
}

impl SessionError {
    /// User-facing alert text.
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyText => "Cole o texto para leitura!",
            Self::ReadingInProgress => "Pause a leitura para editar.",
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    pub initial_speed: Speed,
    pub shake_threshold_g: f32,
    pub sample_interval_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_speed: Speed::NORMAL,
            shake_threshold_g: SHAKE_THRESHOLD_G,
            sample_interval_ms: SAMPLE_INTERVAL_MS,
        }
    }
}

impl SessionConfig {
    pub const fn with_initial_speed(mut self, initial_speed: Speed) -> Self {
        self.initial_speed = initial_speed;
        self
    }

    pub const fn with_shake_threshold_g(mut self, shake_threshold_g: f32) -> Self {
        self.shake_threshold_g = shake_threshold_g;
        self
    }

    pub const fn with_sample_interval_ms(mut self, sample_interval_ms: u32) -> Self {
        self.sample_interval_ms = sample_interval_ms;
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PacingTimer {
    period_ms: u64,
    next_due_ms: u64,
}

pub struct ReadingSession<MS, FB, KV>
where
    MS: MotionSensor,
    FB: Feedback,
    KV: KeyValueStore,
{
    motion: MotionTrigger<MS, FB>,
    store: SessionStore<KV>,
    full_text: String,
    words: Vec<String>,
    current_index: usize,
    speed: Speed,
    timer: Option<PacingTimer>,
    pending_redraw: bool,
    words_since_drain: u32,
}

include!("transitions.rs");
include!("pacing.rs");
