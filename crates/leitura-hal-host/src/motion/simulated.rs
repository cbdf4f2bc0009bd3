use std::{
    cell::Cell,
    convert::Infallible,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use leitura_core::motion::{Acceleration, MotionSensor, MotionSubscription};
use log::debug;

/// Sample delivered for each injected shake, about 1.5 g.
pub const SHAKE_SAMPLE: Acceleration = Acceleration::new(0.9, 0.6, 1.1);

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read accelerometer script {}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: io::Error },
    #[error("line {line}: expected `x,y,z`, got {text:?}")]
    Parse { line: usize, text: String },
    #[error("accelerometer script has no samples")]
    Empty,
}

/// Parses `x,y,z` lines in g. Blank lines and `#` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<Acceleration>, ScriptError> {
    let mut samples = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let parse_error = || ScriptError::Parse {
            line: index + 1,
            text: raw.to_string(),
        };
        let mut axes = line.split(',').map(|axis| axis.trim().parse::<f32>());
        let (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) =
            (axes.next(), axes.next(), axes.next(), axes.next())
        else {
            return Err(parse_error());
        };
        samples.push(Acceleration::new(x, y, z));
    }

    if samples.is_empty() {
        return Err(ScriptError::Empty);
    }
    Ok(samples)
}

pub fn load_script(path: &Path) -> Result<Vec<Acceleration>, ScriptError> {
    let source = fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&source)
}

/// Cloneable handle used to inject shakes from outside the sensor.
#[derive(Debug, Clone, Default)]
pub struct ShakeHandle {
    pending: Rc<Cell<u32>>,
}

impl ShakeHandle {
    pub fn inject(&self) {
        self.pending.set(self.pending.get().saturating_add(1));
    }

    pub fn pending(&self) -> u32 {
        self.pending.get()
    }

    fn take_one(&self) -> bool {
        let pending = self.pending.get();
        if pending == 0 {
            return false;
        }
        self.pending.set(pending - 1);
        true
    }

    fn reset(&self) {
        self.pending.set(0);
    }
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    id: u32,
    interval_ms: u64,
    next_due_ms: Option<u64>,
}

/// Accelerometer stand-in for the desktop.
///
/// Without a script it reports the resting vector; with one it replays the
/// samples in a loop, one per subscription interval. Injected shakes are
/// delivered on the next poll of an active registration.
#[derive(Debug)]
pub struct SimulatedAccelerometer {
    script: Vec<Acceleration>,
    cursor: usize,
    shakes: ShakeHandle,
    registration: Option<Registration>,
    next_id: u32,
}

impl SimulatedAccelerometer {
    pub fn resting() -> Self {
        Self::with_script(Vec::new())
    }

    pub fn with_script(script: Vec<Acceleration>) -> Self {
        Self {
            script,
            cursor: 0,
            shakes: ShakeHandle::default(),
            registration: None,
            next_id: 0,
        }
    }

    pub fn shake_handle(&self) -> ShakeHandle {
        self.shakes.clone()
    }

    pub fn is_subscribed(&self) -> bool {
        self.registration.is_some()
    }

    fn next_scripted(&mut self) -> Acceleration {
        let Some(sample) = self.script.get(self.cursor).copied() else {
            return Acceleration::RESTING;
        };
        self.cursor = (self.cursor + 1) % self.script.len();
        sample
    }
}

impl MotionSensor for SimulatedAccelerometer {
    type Error = Infallible;

    fn subscribe(&mut self, interval_ms: u32) -> Result<MotionSubscription, Self::Error> {
        // Shakes typed while nothing was listening are stale.
        self.shakes.reset();
        self.next_id = self.next_id.wrapping_add(1);
        self.registration = Some(Registration {
            id: self.next_id,
            interval_ms: u64::from(interval_ms),
            next_due_ms: None,
        });
        debug!("accel: subscribed id={} interval_ms={}", self.next_id, interval_ms);
        Ok(MotionSubscription::new(self.next_id))
    }

    fn unsubscribe(&mut self, subscription: MotionSubscription) {
        if self
            .registration
            .is_some_and(|registration| registration.id == subscription.id())
        {
            self.registration = None;
            debug!("accel: unsubscribed id={}", subscription.id());
        }
    }

    fn poll_sample(&mut self, now_ms: u64) -> Result<Option<Acceleration>, Self::Error> {
        let Some(registration) = self.registration.as_mut() else {
            return Ok(None);
        };

        if self.shakes.take_one() {
            registration.next_due_ms = Some(now_ms.saturating_add(registration.interval_ms));
            return Ok(Some(SHAKE_SAMPLE));
        }

        if registration.next_due_ms.is_some_and(|due| now_ms < due) {
            return Ok(None);
        }
        registration.next_due_ms = Some(now_ms.saturating_add(registration.interval_ms));
        Ok(Some(self.next_scripted()))
    }
}

#[cfg(test)]
mod tests {
    use leitura_core::motion::SHAKE_THRESHOLD_G;

    use super::*;

    #[test]
    fn script_parsing_skips_comments_and_blanks() {
        let samples = parse_script("# header\n0,0,1\n\n 0.5 , 0.5 , 1.0 # tilt\n").unwrap();
        assert_eq!(
            samples,
            vec![Acceleration::new(0.0, 0.0, 1.0), Acceleration::new(0.5, 0.5, 1.0)]
        );
    }

    #[test]
    fn script_parsing_reports_the_bad_line() {
        let err = parse_script("0,0,1\n1,2\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 2, .. }));
        assert!(matches!(parse_script("1,2,3,4"), Err(ScriptError::Parse { line: 1, .. })));
        assert!(matches!(parse_script("# nothing\n"), Err(ScriptError::Empty)));
    }

    #[test]
    fn load_script_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shake.csv");
        fs::write(&path, "0,0,1\n1.2,0,0\n").unwrap();

        assert_eq!(load_script(&path).unwrap().len(), 2);
        assert!(matches!(
            load_script(&dir.path().join("missing.csv")),
            Err(ScriptError::Io { .. })
        ));
    }

    #[test]
    fn resting_sensor_never_reaches_threshold() {
        let mut sensor = SimulatedAccelerometer::resting();
        let sub = sensor.subscribe(1_000).unwrap();
        let sample = sensor.poll_sample(0).unwrap().unwrap();
        assert!(!sample.reaches(SHAKE_THRESHOLD_G));
        assert_eq!(sensor.poll_sample(500).unwrap(), None);
        sensor.unsubscribe(sub);
        assert_eq!(sensor.poll_sample(5_000).unwrap(), None);
    }

    #[test]
    fn script_loops_at_the_subscription_interval() {
        let a = Acceleration::new(0.0, 0.0, 1.0);
        let b = Acceleration::new(1.5, 0.0, 0.0);
        let mut sensor = SimulatedAccelerometer::with_script(vec![a, b]);
        let _sub = sensor.subscribe(1_000).unwrap();

        assert_eq!(sensor.poll_sample(0).unwrap(), Some(a));
        assert_eq!(sensor.poll_sample(999).unwrap(), None);
        assert_eq!(sensor.poll_sample(1_000).unwrap(), Some(b));
        assert_eq!(sensor.poll_sample(2_000).unwrap(), Some(a));
    }

    #[test]
    fn injected_shake_arrives_on_next_poll() {
        let mut sensor = SimulatedAccelerometer::resting();
        let handle = sensor.shake_handle();
        let _sub = sensor.subscribe(1_000).unwrap();
        let _ = sensor.poll_sample(0).unwrap();

        handle.inject();
        let sample = sensor.poll_sample(10).unwrap().unwrap();
        assert!(sample.reaches(SHAKE_THRESHOLD_G));
        assert_eq!(handle.pending(), 0);
    }

    #[test]
    fn shakes_injected_while_unsubscribed_are_dropped() {
        let mut sensor = SimulatedAccelerometer::resting();
        let handle = sensor.shake_handle();
        handle.inject();

        assert_eq!(sensor.poll_sample(0).unwrap(), None);
        let _sub = sensor.subscribe(1_000).unwrap();
        let sample = sensor.poll_sample(0).unwrap().unwrap();
        assert_eq!(sample, Acceleration::RESTING);
    }
}
