use alloc::collections::VecDeque;

use super::{Acceleration, MotionSensor, MotionSubscription};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ScriptedSensorError;

#[derive(Debug, Clone, Copy)]
struct Registration {
    id: u32,
    interval_ms: u32,
    next_due_ms: Option<u64>,
}

/// Sensor that replays a fixed list of samples, then reports rest.
///
/// The first poll of a registration yields a sample right away; after that
/// samples are spaced by the registration interval.
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    samples: VecDeque<Acceleration>,
    registration: Option<Registration>,
    next_id: u32,
    subscribe_calls: u32,
    fail_next_subscribe: bool,
}

impl ScriptedSensor {
    pub fn new(samples: &[Acceleration]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn fail_next_subscribe(&mut self) {
        self.fail_next_subscribe = true;
    }

    pub fn active_subscriptions(&self) -> usize {
        usize::from(self.registration.is_some())
    }

    pub fn subscribe_calls(&self) -> u32 {
        self.subscribe_calls
    }
}

impl MotionSensor for ScriptedSensor {
    type Error = ScriptedSensorError;

    fn subscribe(&mut self, interval_ms: u32) -> Result<MotionSubscription, Self::Error> {
        self.subscribe_calls = self.subscribe_calls.saturating_add(1);
        if core::mem::take(&mut self.fail_next_subscribe) {
            return Err(ScriptedSensorError);
        }

        self.next_id = self.next_id.wrapping_add(1);
        self.registration = Some(Registration {
            id: self.next_id,
            interval_ms,
            next_due_ms: None,
        });
        Ok(MotionSubscription::new(self.next_id))
    }

    fn unsubscribe(&mut self, subscription: MotionSubscription) {
        if self
            .registration
            .is_some_and(|registration| registration.id == subscription.id())
        {
            self.registration = None;
        }
    }

    fn poll_sample(&mut self, now_ms: u64) -> Result<Option<Acceleration>, Self::Error> {
        let Some(registration) = self.registration.as_mut() else {
            return Ok(None);
        };

        let interval = registration.interval_ms as u64;
        if registration.next_due_ms.is_some_and(|due| now_ms < due) {
            return Ok(None);
        }

        registration.next_due_ms = Some(now_ms + interval);
        Ok(Some(
            self.samples.pop_front().unwrap_or(Acceleration::RESTING),
        ))
    }
}
