impl<MS, FB, KV> ReadingSession<MS, FB, KV>
where
    MS: MotionSensor,
    FB: Feedback,
    KV: KeyValueStore,
{
    /// Advances the session clock: samples the motion sensor while reading
    /// and fires the reveal tick once the pacing deadline is reached.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        let mut result = if core::mem::take(&mut self.pending_redraw) {
            TickResult::RenderRequested
        } else {
            TickResult::NoRender
        };

        let Some(timer) = self.timer else {
            return result;
        };

        self.motion.poll(now_ms);

        if now_ms >= timer.next_due_ms {
            self.timer = Some(PacingTimer {
                next_due_ms: now_ms.saturating_add(timer.period_ms),
                ..timer
            });
            self.reveal_next_word();
            self.pending_redraw = false;
            result = TickResult::RenderRequested;
        }

        result
    }

    /// One reveal tick. Revealing the last word also ends the run.
    fn reveal_next_word(&mut self) {
        if self.current_index < self.words.len() {
            self.current_index += 1;
            self.full_text = text_policy::revealed_prefix(&self.words, self.current_index);
            self.words_since_drain = self.words_since_drain.saturating_add(1);
        }

        if self.current_index >= self.words.len() {
            self.finish_run();
        }
    }

    pub fn state(&self) -> SessionState {
        if self.timer.is_some() {
            SessionState::Reading
        } else if self.words.is_empty() {
            SessionState::Idle
        } else {
            SessionState::PausedDirty
        }
    }

    pub fn is_reading(&self) -> bool {
        self.timer.is_some()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_reading() {
            PAUSE_LABEL
        } else {
            START_LABEL
        }
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Period of the active pacing timer.
    pub fn active_period_ms(&self) -> Option<u64> {
        self.timer.map(|timer| timer.period_ms)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            full_text: self.full_text.clone(),
            current_index: self.current_index,
            speed: self.speed,
            words: self.words.clone(),
            is_reading: self.is_reading(),
        }
    }

    pub fn motion(&self) -> &MotionTrigger<MS, FB> {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut MotionTrigger<MS, FB> {
        &mut self.motion
    }

    pub fn store(&self) -> &SessionStore<KV> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore<KV> {
        &mut self.store
    }

    /// Words revealed since the previous call.
    pub fn drain_word_updates(&mut self) -> u32 {
        core::mem::take(&mut self.words_since_drain)
    }
}
