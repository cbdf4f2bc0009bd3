impl<IN, MS, FB, KV> ReaderApp<IN, MS, FB, KV>
where
    IN: IntentProvider,
    MS: MotionSensor,
    FB: Feedback,
    KV: KeyValueStore,
{
    fn process_inputs(&mut self, now_ms: u64) {
        loop {
            match self.input.poll_intent() {
                Ok(Some(intent)) => self.dispatch(intent, now_ms),
                Ok(None) => break,
                Err(err) => {
                    warn!("input: provider error {:?}", err);
                    break;
                }
            }
        }
    }

    /// Applies one intent as if it came from the input provider.
    pub fn dispatch(&mut self, intent: Intent, now_ms: u64) {
        if self.alert.is_some() {
            if matches!(intent, Intent::DismissAlert) {
                self.alert = None;
                self.pending_redraw = true;
            } else {
                debug!("input: {:?} ignored while alert is shown", intent);
            }
            return;
        }

        match intent {
            Intent::EditText(text) => self.edit_text(text),
            Intent::AppendText(words) => {
                let mut text = String::from(self.session.full_text());
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&words);
                self.edit_text(text);
            }
            Intent::SetSpeed(speed) => self.change_speed(speed),
            Intent::SpeedUp => self.change_speed(self.session.speed().step_up()),
            Intent::SpeedDown => self.change_speed(self.session.speed().step_down()),
            Intent::ToggleReading => match self.session.toggle_reading(now_ms) {
                Ok(_) => {}
                Err(err) => {
                    self.alert = Some(err);
                    self.pending_redraw = true;
                }
            },
            Intent::Clear => {
                if self.session.is_reading() {
                    debug!("input: clear ignored while reading");
                } else {
                    self.session.clear_text();
                }
            }
            Intent::DismissAlert => {}
        }
    }

    fn edit_text(&mut self, text: String) {
        if let Err(err) = self.session.set_text(text) {
            debug!("input: text edit ignored: {}", err);
        }
    }

    fn change_speed(&mut self, speed: Speed) {
        if let Err(err) = self.session.set_speed(speed) {
            debug!("input: speed change ignored: {}", err);
        }
    }
}
