//! Reading screen: routes user intents into the session and builds the view.

use alloc::string::String;

use log::{debug, info, warn};

use crate::{
    feedback::Feedback,
    input::{Intent, IntentProvider},
    motion::MotionSensor,
    persistence::KeyValueStore,
    render::{ButtonView, CLEAR_LABEL, Progress, Screen, TEXT_PLACEHOLDER},
    session::{ReadingSession, SessionError, SessionState, Speed, TickResult},
};

pub struct ReaderApp<IN, MS, FB, KV>
where
    IN: IntentProvider,
    MS: MotionSensor,
    FB: Feedback,
    KV: KeyValueStore,
{
    input: IN,
    session: ReadingSession<MS, FB, KV>,
    alert: Option<SessionError>,
    pending_redraw: bool,
}

include!("input.rs");
include!("view.rs");
