impl<IN, MS, FB, KV> ReaderApp<IN, MS, FB, KV>
where
    IN: IntentProvider,
    MS: MotionSensor,
    FB: Feedback,
    KV: KeyValueStore,
{
    pub fn new(input: IN, session: ReadingSession<MS, FB, KV>) -> Self {
        Self {
            input,
            session,
            alert: None,
            pending_redraw: true,
        }
    }

    /// Restores the persisted session. Call once before the first tick.
    pub fn restore(&mut self) -> bool {
        let restored = self.session.restore();
        if restored {
            self.pending_redraw = true;
        }
        restored
    }

    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        self.process_inputs(now_ms);

        let session = self.session.tick(now_ms);
        if core::mem::take(&mut self.pending_redraw) {
            TickResult::RenderRequested
        } else {
            session
        }
    }

    pub fn with_screen<F>(&self, f: F)
    where
        F: FnOnce(Screen<'_>),
    {
        let reading = self.session.is_reading();
        let words = self.session.words();
        let progress = (!words.is_empty()).then(|| Progress {
            revealed: self.session.current_index(),
            total: words.len(),
        });

        f(Screen {
            text: self.session.full_text(),
            placeholder: TEXT_PLACEHOLDER,
            text_editable: !reading,
            speed: self.session.speed(),
            speed_enabled: !reading,
            primary: ButtonView {
                label: self.session.button_label(),
                enabled: true,
            },
            clear: ButtonView {
                label: CLEAR_LABEL,
                enabled: !reading,
            },
            progress,
            alert: self.alert.map(SessionError::message),
        });
    }

    /// Single vibration pulse for platform lifecycle events.
    pub fn vibrate(&mut self) {
        self.session.pulse_vibration();
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
        info!("app: shutdown state={:?}", self.session.state());
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn alert(&self) -> Option<SessionError> {
        self.alert
    }

    pub fn session(&self) -> &ReadingSession<MS, FB, KV> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ReadingSession<MS, FB, KV> {
        &mut self.session
    }

    pub fn input_mut(&mut self) -> &mut IN {
        &mut self.input
    }

    pub fn drain_word_updates(&mut self) -> u32 {
        self.session.drain_word_updates()
    }
}
