//! Accelerometer subscription and shake detection.

mod mock;

pub use mock::ScriptedSensor;

use log::{debug, info, warn};

use crate::feedback::Feedback;

/// Magnitude, in g, at or above which a sample counts as a shake.
pub const SHAKE_THRESHOLD_G: f32 = 1.09;
pub const SAMPLE_INTERVAL_MS: u32 = 1_000;

/// One 3-axis accelerometer sample in g.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    /// Device lying flat and still.
    pub const RESTING: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// `sqrt(x² + y² + z²) >= threshold`, compared in squared space.
    pub fn reaches(self, threshold_g: f32) -> bool {
        self.magnitude_squared() >= threshold_g * threshold_g
    }
}

/// Ownership token for an active sensor registration.
///
/// Not `Clone`: the only way to end a registration is to hand the token
/// back through [`MotionSensor::unsubscribe`].
#[derive(Debug, Eq, PartialEq)]
pub struct MotionSubscription {
    id: u32,
}

impl MotionSubscription {
    pub const fn new(id: u32) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> u32 {
        self.id
    }
}

/// Periodic accelerometer source.
pub trait MotionSensor {
    type Error: core::fmt::Debug;

    fn subscribe(&mut self, interval_ms: u32) -> Result<MotionSubscription, Self::Error>;
    fn unsubscribe(&mut self, subscription: MotionSubscription);

    /// Returns the next sample once one is due for the active registration.
    fn poll_sample(&mut self, now_ms: u64) -> Result<Option<Acceleration>, Self::Error>;
}

/// Couples a sensor registration to the feedback it fires.
pub struct MotionTrigger<MS, FB>
where
    MS: MotionSensor,
    FB: Feedback,
{
    sensor: MS,
    feedback: FB,
    threshold_g: f32,
    interval_ms: u32,
    subscription: Option<MotionSubscription>,
    fired: u32,
}

impl<MS, FB> MotionTrigger<MS, FB>
where
    MS: MotionSensor,
    FB: Feedback,
{
    pub fn new(sensor: MS, feedback: FB, threshold_g: f32, interval_ms: u32) -> Self {
        Self {
            sensor,
            feedback,
            threshold_g,
            interval_ms: interval_ms.max(1),
            subscription: None,
            fired: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Registers for samples. A second call while active keeps the existing
    /// registration.
    pub fn start(&mut self) -> bool {
        if self.subscription.is_some() {
            return true;
        }

        match self.sensor.subscribe(self.interval_ms) {
            Ok(subscription) => {
                debug!(
                    "motion: subscribed id={} interval_ms={}",
                    subscription.id(),
                    self.interval_ms
                );
                self.subscription = Some(subscription);
                true
            }
            Err(err) => {
                warn!("motion: subscribe failed: {:?}; shake detection off", err);
                false
            }
        }
    }

    /// Releases the registration. No-op when not started.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            debug!("motion: unsubscribed id={}", subscription.id());
            self.sensor.unsubscribe(subscription);
        }
    }

    /// Checks one due sample and fires feedback when it reaches the threshold.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.subscription.is_none() {
            return false;
        }

        let sample = match self.sensor.poll_sample(now_ms) {
            Ok(Some(sample)) => sample,
            Ok(None) => return false,
            Err(err) => {
                warn!("motion: sample read failed: {:?}", err);
                return false;
            }
        };

        if !sample.reaches(self.threshold_g) {
            return false;
        }

        self.fired = self.fired.saturating_add(1);
        info!(
            "motion: shake x={} y={} z={} fired={}",
            sample.x, sample.y, sample.z, self.fired
        );
        self.feedback.trigger();
        true
    }

    pub fn fired(&self) -> u32 {
        self.fired
    }

    pub fn sensor(&self) -> &MS {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut MS {
        &mut self.sensor
    }

    pub fn feedback(&self) -> &FB {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut FB {
        &mut self.feedback
    }
}

impl<MS, FB> Drop for MotionTrigger<MS, FB>
where
    MS: MotionSensor,
    FB: Feedback,
{
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::CountingFeedback;

    fn trigger_with(samples: &[Acceleration]) -> MotionTrigger<ScriptedSensor, CountingFeedback> {
        MotionTrigger::new(
            ScriptedSensor::new(samples),
            CountingFeedback::new(),
            SHAKE_THRESHOLD_G,
            SAMPLE_INTERVAL_MS,
        )
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(Acceleration::new(SHAKE_THRESHOLD_G, 0.0, 0.0).reaches(SHAKE_THRESHOLD_G));
        assert!(Acceleration::new(0.0, 0.0, SHAKE_THRESHOLD_G).reaches(SHAKE_THRESHOLD_G));
        assert!(!Acceleration::RESTING.reaches(SHAKE_THRESHOLD_G));
        assert!(Acceleration::new(1.0, 1.0, 1.0).reaches(SHAKE_THRESHOLD_G));
    }

    #[test]
    fn sample_exactly_at_threshold_fires_feedback() {
        let mut trigger = trigger_with(&[Acceleration::new(SHAKE_THRESHOLD_G, 0.0, 0.0)]);
        assert!(trigger.start());

        assert!(trigger.poll(SAMPLE_INTERVAL_MS as u64));
        assert_eq!(trigger.feedback().triggers(), 1);
        assert_eq!(trigger.feedback().pulses(), 1);
    }

    #[test]
    fn every_sample_above_threshold_fires_again() {
        let shake = Acceleration::new(1.5, 0.0, 0.0);
        let mut trigger = trigger_with(&[shake, shake, shake]);
        trigger.start();

        for n in 1..=3u64 {
            assert!(trigger.poll(n * SAMPLE_INTERVAL_MS as u64));
        }
        assert_eq!(trigger.fired(), 3);
        assert_eq!(trigger.feedback().triggers(), 3);
    }

    #[test]
    fn polling_without_subscription_reads_nothing() {
        let mut trigger = trigger_with(&[Acceleration::new(3.0, 0.0, 0.0)]);
        assert!(!trigger.poll(10_000));
        assert_eq!(trigger.feedback().triggers(), 0);
    }

    #[test]
    fn stop_is_idempotent_and_releases_the_subscription() {
        let mut trigger = trigger_with(&[]);
        trigger.stop();
        assert_eq!(trigger.sensor().active_subscriptions(), 0);

        trigger.start();
        trigger.start();
        assert_eq!(trigger.sensor().active_subscriptions(), 1);

        trigger.stop();
        trigger.stop();
        assert!(!trigger.is_active());
        assert_eq!(trigger.sensor().active_subscriptions(), 0);
    }

    #[test]
    fn subscribe_failure_leaves_trigger_inactive() {
        let mut trigger = trigger_with(&[]);
        trigger.sensor_mut().fail_next_subscribe();
        assert!(!trigger.start());
        assert!(!trigger.is_active());
    }
}
