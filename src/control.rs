use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Widget id of the year input.
pub const YEAR_INPUT_ID: &str = "year";
/// Widget id of the scatter output.
pub const SCATTER_OUTPUT_ID: &str = "scatter";

// ---------------------------------------------------------------------------
// YearControl – the bounded discrete input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearControl {
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub default: i32,
}

impl YearControl {
    /// Derive bounds from the dataset's sorted years.
    ///
    /// `preferred` becomes the default when it lies within the bounds,
    /// otherwise the last year does. The default is snapped onto the step
    /// grid so the slider shows the year actually selected. Returns `None`
    /// for an empty year list.
    pub fn from_years(years: &[i32], preferred: i32, step: i32) -> Option<Self> {
        let (&min, &max) = (years.first()?, years.last()?);
        let mut control = YearControl {
            min,
            max,
            step: step.max(1),
            default: max,
        };
        if (min..=max).contains(&preferred) {
            control.default = control.year_at(control.index_of(preferred));
        }
        Some(control)
    }

    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.min, self.max)
    }

    /// Number of steps between `min` and `max`; the last one may be short.
    pub fn steps(&self) -> usize {
        ((self.max - self.min + self.step - 1) / self.step) as usize
    }

    pub fn year_at(&self, index: usize) -> i32 {
        let offset = i32::try_from(index).unwrap_or(i32::MAX).saturating_mul(self.step);
        self.clamp(self.min.saturating_add(offset))
    }

    /// Nearest step index for `year`; `max` always maps to the last index.
    pub fn index_of(&self, year: i32) -> usize {
        let year = self.clamp(year);
        if year == self.max {
            return self.steps();
        }
        let offset = year - self.min;
        (((offset + self.step / 2) / self.step) as usize).min(self.steps())
    }

    /// The value one step after `year`. A short final step lands on `max`;
    /// `None` once `max` is reached.
    pub fn next(&self, year: i32) -> Option<i32> {
        if year >= self.max {
            return None;
        }
        Some(year.saturating_add(self.step).min(self.max))
    }
}

// ---------------------------------------------------------------------------
// Playback – the "play" affordance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Time between automatic steps.
    pub interval_ms: u64,
    /// Wrap to the first year instead of stopping at the last.
    pub looping: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            interval_ms: 1000,
            looping: false,
        }
    }
}

impl AnimationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Automatic stepping state for one session.
#[derive(Debug, Clone)]
pub struct Playback {
    config: AnimationConfig,
    last_step: Option<Instant>,
}

impl Playback {
    pub fn new(config: AnimationConfig) -> Self {
        Playback {
            config,
            last_step: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.last_step.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.config.interval()
    }

    /// Start playing. Returns the year to jump to when starting from the end.
    pub fn play(&mut self, now: Instant, control: &YearControl, year: i32) -> Option<i32> {
        self.last_step = Some(now);
        (year >= control.max).then_some(control.min)
    }

    pub fn pause(&mut self) {
        self.last_step = None;
    }

    /// Advance if an interval has elapsed since the last step.
    ///
    /// Returns the new year to publish, if any. At the last year playback
    /// stops, or wraps when looping.
    pub fn tick(&mut self, now: Instant, control: &YearControl, year: i32) -> Option<i32> {
        let last = self.last_step?;
        if now.duration_since(last) < self.config.interval() {
            return None;
        }

        match control.next(year) {
            Some(next) => {
                self.last_step = Some(now);
                if next >= control.max && !self.config.looping {
                    self.pause();
                }
                Some(next)
            }
            None if self.config.looping => {
                self.last_step = Some(now);
                Some(control.min)
            }
            None => {
                self.pause();
                None
            }
        }
    }
}
