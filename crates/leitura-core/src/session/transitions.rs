impl<MS, FB, KV> ReadingSession<MS, FB, KV>
where
    MS: MotionSensor,
    FB: Feedback,
    KV: KeyValueStore,
{
    pub fn new(sensor: MS, feedback: FB, backend: KV, config: SessionConfig) -> Self {
        Self {
            motion: MotionTrigger::new(
                sensor,
                feedback,
                config.shake_threshold_g,
                config.sample_interval_ms,
            ),
            store: SessionStore::new(backend),
            full_text: String::new(),
            words: Vec::new(),
            current_index: 0,
            speed: config.initial_speed,
            timer: None,
            pending_redraw: true,
            words_since_drain: 0,
        }
    }

    /// Loads the persisted snapshot, if any. Meant to run once at launch.
    ///
    /// A snapshot flagged as reading is restored paused: no timer or motion
    /// registration is started here.
    pub fn restore(&mut self) -> bool {
        if self.is_reading() {
            warn!("session: restore skipped, reading in progress");
            return false;
        }

        let Some(snapshot) = self.store.load() else {
            return false;
        };

        if snapshot.is_reading {
            warn!("session: stored record was marked reading; restored paused");
        }

        self.full_text = snapshot.full_text;
        self.words = snapshot.words;
        self.current_index = snapshot.current_index;
        self.speed = snapshot.speed;
        self.pending_redraw = true;
        info!(
            "session: restored index={} words={} speed={}",
            self.current_index,
            self.words.len(),
            self.speed
        );
        true
    }

    /// Primary button: start or resume when stopped, pause when reading.
    pub fn toggle_reading(&mut self, now_ms: u64) -> Result<Toggle, SessionError> {
        if self.is_reading() {
            Ok(self.pause_run())
        } else {
            self.start_run(now_ms)
        }
    }

    pub fn set_text<S>(&mut self, text: S) -> Result<(), SessionError>
    where
        S: Into<String>,
    {
        if self.is_reading() {
            return Err(SessionError::ReadingInProgress);
        }

        self.full_text = text.into();
        self.pending_redraw = true;
        Ok(())
    }

    /// Takes effect on the next start; a running timer keeps its period.
    pub fn set_speed(&mut self, speed: Speed) -> Result<(), SessionError> {
        if self.is_reading() {
            return Err(SessionError::ReadingInProgress);
        }

        if speed != self.speed {
            self.speed = speed;
            self.pending_redraw = true;
        }
        Ok(())
    }

    /// Erases persisted state and resets to idle from any state.
    pub fn clear_text(&mut self) {
        self.store.clear();
        self.stop_pacing();
        self.full_text.clear();
        self.words.clear();
        self.current_index = 0;
        self.pending_redraw = true;
        info!("session: cleared");
    }

    /// Releases the timer and motion registration on process teardown.
    pub fn shutdown(&mut self) {
        if self.is_reading() {
            info!(
                "session: shutdown while reading index={}/{}",
                self.current_index,
                self.words.len()
            );
        }
        self.stop_pacing();
    }

    /// Fires a single vibration pulse through the feedback capability.
    pub fn pulse_vibration(&mut self) {
        self.motion.feedback_mut().vibrate();
    }

    fn start_run(&mut self, now_ms: u64) -> Result<Toggle, SessionError> {
        if text_policy::is_blank(&self.full_text) {
            debug!("session: start rejected, text is blank");
            return Err(SessionError::EmptyText);
        }

        let toggle = if self.words.is_empty() {
            self.words = text_policy::tokenize(&self.full_text);
            self.current_index = 0;
            Toggle::Started
        } else {
            Toggle::Resumed
        };

        self.motion.start();

        let period_ms = self.speed.word_period_ms();
        self.timer = Some(PacingTimer {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        });
        self.pending_redraw = true;
        info!(
            "session: {:?} index={}/{} period_ms={}",
            toggle,
            self.current_index,
            self.words.len(),
            period_ms
        );
        Ok(toggle)
    }

    fn pause_run(&mut self) -> Toggle {
        let snapshot = SessionSnapshot {
            full_text: self.full_text.clone(),
            current_index: self.current_index,
            speed: self.speed,
            words: self.words.clone(),
            is_reading: false,
        };
        self.store.save(&snapshot);

        self.stop_pacing();
        self.pending_redraw = true;
        info!(
            "session: paused index={}/{}",
            self.current_index,
            self.words.len()
        );
        Toggle::Paused
    }

    fn finish_run(&mut self) {
        let total = self.words.len();
        self.stop_pacing();
        self.words.clear();
        self.current_index = 0;
        self.pending_redraw = true;
        info!("session: finished words={}", total);
    }

    fn stop_pacing(&mut self) {
        self.timer = None;
        self.motion.stop();
    }
}
