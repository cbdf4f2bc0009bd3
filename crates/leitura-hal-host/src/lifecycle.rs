use leitura_core::{
    app::ReaderApp, feedback::Feedback, input::IntentProvider, persistence::KeyValueStore,
};
use log::{debug, info};

use crate::{
    input::terminal::PlatformSignal,
    motion::simulated::{ShakeHandle, SimulatedAccelerometer},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Applies one platform signal. Background and back each pulse the
/// vibration motor; back never navigates away from the reading screen.
pub fn handle_signal<IN, FB, KV>(
    app: &mut ReaderApp<IN, SimulatedAccelerometer, FB, KV>,
    shakes: &ShakeHandle,
    signal: PlatformSignal,
) -> LoopControl
where
    IN: IntentProvider,
    FB: Feedback,
    KV: KeyValueStore,
{
    match signal {
        PlatformSignal::Background => {
            info!("lifecycle: background");
            app.vibrate();
        }
        PlatformSignal::Back => {
            info!("lifecycle: back pressed, navigation suppressed");
            app.vibrate();
        }
        PlatformSignal::Shake => {
            if app.session().motion().sensor().is_subscribed() {
                shakes.inject();
            } else {
                debug!("lifecycle: shake ignored, accelerometer not subscribed");
            }
        }
        PlatformSignal::Quit => return LoopControl::Quit,
    }
    LoopControl::Continue
}

#[cfg(test)]
mod tests {
    use leitura_core::{
        feedback::CountingFeedback,
        input::{Intent, ScriptedIntents},
        persistence::MemoryStore,
        session::{ReadingSession, SessionConfig, SessionState},
    };

    use super::*;

    type TestApp = ReaderApp<ScriptedIntents, SimulatedAccelerometer, CountingFeedback, MemoryStore>;

    fn app() -> (TestApp, ShakeHandle) {
        let sensor = SimulatedAccelerometer::resting();
        let shakes = sensor.shake_handle();
        let session = ReadingSession::new(
            sensor,
            CountingFeedback::new(),
            MemoryStore::new(),
            SessionConfig::default(),
        );
        (ReaderApp::new(ScriptedIntents::default(), session), shakes)
    }

    fn feedback(app: &TestApp) -> CountingFeedback {
        *app.session().motion().feedback()
    }

    #[test]
    fn back_vibrates_and_keeps_the_reading_screen() {
        let (mut app, shakes) = app();
        app.dispatch(Intent::EditText("um dois tres".into()), 0);
        app.dispatch(Intent::ToggleReading, 0);

        let control = handle_signal(&mut app, &shakes, PlatformSignal::Back);

        assert_eq!(control, LoopControl::Continue);
        assert_eq!(app.state(), SessionState::Reading);
        assert_eq!(feedback(&app).pulses(), 1);
        assert_eq!(feedback(&app).triggers(), 0);
    }

    #[test]
    fn background_pulses_without_pausing() {
        let (mut app, shakes) = app();
        app.dispatch(Intent::EditText("a b".into()), 0);
        app.dispatch(Intent::ToggleReading, 0);

        assert_eq!(
            handle_signal(&mut app, &shakes, PlatformSignal::Background),
            LoopControl::Continue
        );
        assert_eq!(app.state(), SessionState::Reading);
        assert_eq!(feedback(&app).pulses(), 1);
    }

    #[test]
    fn shake_is_injected_only_while_subscribed() {
        let (mut app, shakes) = app();

        handle_signal(&mut app, &shakes, PlatformSignal::Shake);
        assert_eq!(shakes.pending(), 0);

        app.dispatch(Intent::EditText("a b c d".into()), 0);
        app.dispatch(Intent::ToggleReading, 0);
        handle_signal(&mut app, &shakes, PlatformSignal::Shake);
        assert_eq!(shakes.pending(), 1);

        app.tick(1);
        assert_eq!(shakes.pending(), 0);
        assert_eq!(feedback(&app).triggers(), 1);
    }

    #[test]
    fn quit_ends_the_loop_without_feedback() {
        let (mut app, shakes) = app();
        assert_eq!(
            handle_signal(&mut app, &shakes, PlatformSignal::Quit),
            LoopControl::Quit
        );
        assert_eq!(feedback(&app), CountingFeedback::new());
    }
}
