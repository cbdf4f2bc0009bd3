use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MIN_TENTHS: u8 = 5;
const MAX_TENTHS: u8 = 30;
const DEFAULT_TENTHS: u8 = 10;

/// Reveal-rate multiplier in 0.1 steps, 0.5..=3.0.
///
/// Stored as tenths so the step of the speed control is exact and the
/// reveal period is an integer division.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Speed {
    tenths: u8,
}

impl Speed {
    pub const MIN: Self = Self { tenths: MIN_TENTHS };
    pub const MAX: Self = Self { tenths: MAX_TENTHS };
    pub const NORMAL: Self = Self {
        tenths: DEFAULT_TENTHS,
    };

    pub const fn from_tenths(tenths: u8) -> Self {
        let tenths = if tenths < MIN_TENTHS {
            MIN_TENTHS
        } else if tenths > MAX_TENTHS {
            MAX_TENTHS
        } else {
            tenths
        };
        Self { tenths }
    }

    /// Rounds to the nearest tenth and clamps into range. NaN maps to the minimum.
    pub fn from_f32(value: f32) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }

        let scaled = value * 10.0;
        let rounded = if scaled >= 0.0 {
            scaled + 0.5
        } else {
            scaled - 0.5
        };
        // Saturating float-to-int cast handles +/- infinity.
        let tenths = (rounded as i32).clamp(MIN_TENTHS as i32, MAX_TENTHS as i32);
        Self {
            tenths: tenths as u8,
        }
    }

    pub const fn tenths(self) -> u8 {
        self.tenths
    }

    pub fn as_f32(self) -> f32 {
        self.tenths as f32 / 10.0
    }

    /// Milliseconds between two reveal ticks (`1000 / speed`).
    pub const fn word_period_ms(self) -> u64 {
        10_000 / self.tenths as u64
    }

    pub const fn step_up(self) -> Self {
        Self::from_tenths(self.tenths.saturating_add(1))
    }

    pub const fn step_down(self) -> Self {
        Self::from_tenths(self.tenths.saturating_sub(1))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

impl Serialize for Speed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.tenths as f64 / 10.0)
    }
}

impl<'de> Deserialize<'de> for Speed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok(Self::from_f32(value as f32))
    }
}
