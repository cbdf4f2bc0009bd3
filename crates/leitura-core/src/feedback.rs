//! Sound and vibration feedback abstraction.

/// Device feedback surface.
///
/// Both operations are fire-and-forget: implementations must not block the
/// caller and must swallow their own failures.
pub trait Feedback {
    /// Shake cue: start the bundled sound and pulse the vibration motor.
    fn trigger(&mut self);

    /// Single vibration pulse.
    fn vibrate(&mut self);
}

/// No-hardware feedback that only counts what it was asked to do.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct CountingFeedback {
    triggers: u32,
    pulses: u32,
}

impl CountingFeedback {
    pub const fn new() -> Self {
        Self {
            triggers: 0,
            pulses: 0,
        }
    }

    pub const fn triggers(&self) -> u32 {
        self.triggers
    }

    /// Vibration pulses, including the ones fired as part of a trigger.
    pub const fn pulses(&self) -> u32 {
        self.pulses
    }
}

impl Feedback for CountingFeedback {
    fn trigger(&mut self) {
        self.triggers = self.triggers.saturating_add(1);
        self.vibrate();
    }

    fn vibrate(&mut self) {
        self.pulses = self.pulses.saturating_add(1);
    }
}
