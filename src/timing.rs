use crate::parse::{Section, key_is, key_value, parse_float, parse_int, section_lines};

/// Beat length before any timing point: 120 BPM.
pub const DEFAULT_BEAT_LENGTH: f64 = 500.0;
pub const DEFAULT_SLIDER_MULTIPLIER: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingPoint {
    pub time: i32,
    pub beat_length: f64,
    pub uninherited: bool,
}

/// Timing state in effect at a single timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTiming {
    pub beat_length: f64,
    pub velocity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimingMap {
    pub points: Vec<TimingPoint>,
    pub slider_multiplier: f64,
}

impl Default for TimingMap {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            slider_multiplier: DEFAULT_SLIDER_MULTIPLIER,
        }
    }
}

impl TimingMap {
    /// Resolves tempo and slider velocity at `time`.
    ///
    /// Two-track walk over the points in file order, stopping at the first
    /// point past `time`: uninherited points set the beat length and reset
    /// the velocity multiplier to 1.0; inherited points with a negative beat
    /// length set the multiplier to `-100 / beat_length`. The velocity reset
    /// on every tempo point is load-bearing for slider durations.
    pub fn at(&self, time: i32) -> ActiveTiming {
        let mut beat_length = DEFAULT_BEAT_LENGTH;
        let mut velocity = 1.0;
        for point in &self.points {
            if point.time > time {
                break;
            }
            if point.uninherited {
                beat_length = point.beat_length;
                velocity = 1.0;
            } else if point.beat_length < 0.0 {
                velocity = -100.0 / point.beat_length;
            }
        }
        ActiveTiming {
            beat_length,
            velocity,
        }
    }

    /// Travel duration in ms for a slider starting at `start` with the given
    /// pixel length and slide (repeat) count.
    pub fn slider_duration(&self, start: i32, length: f64, slides: f64) -> f64 {
        let active = self.at(start);
        length / (self.slider_multiplier * 100.0 * active.velocity) * active.beat_length * slides
    }

    /// Min/max BPM across uninherited points, (120, 120) when none exist.
    pub fn bpm_range(&self) -> (f64, f64) {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for point in &self.points {
            if point.uninherited && point.beat_length > 0.0 {
                let bpm = 60_000.0 / point.beat_length;
                min = min.min(bpm);
                max = max.max(bpm);
            }
        }
        if min > max {
            let fallback = 60_000.0 / DEFAULT_BEAT_LENGTH;
            (fallback, fallback)
        } else {
            (min, max)
        }
    }
}

/// Parses `[TimingPoints]` (file order, no re-sort) and the `[Difficulty]`
/// slider multiplier.
pub fn parse_timing(text: &str) -> TimingMap {
    let mut map = TimingMap::default();

    for (section, line) in section_lines(text) {
        match section {
            Section::Difficulty => {
                if let Some((key, value)) = key_value(line) {
                    if key_is(key, "slidermultiplier") {
                        if let Some(multiplier) = parse_float(value) {
                            map.slider_multiplier = multiplier;
                        }
                    }
                }
            }
            Section::TimingPoints => {
                let mut fields = line.split(',');
                let Some(time) = fields.next().and_then(parse_int) else {
                    continue;
                };
                let Some(beat_length) = fields.next().and_then(parse_float) else {
                    continue;
                };
                // Field 6 flags uninherited; older formats omit it and are
                // all tempo points.
                let uninherited = line
                    .split(',')
                    .nth(6)
                    .map(|v| v.trim() != "0")
                    .unwrap_or(true);
                map.points.push(TimingPoint {
                    time,
                    beat_length,
                    uninherited,
                });
            }
            _ => {}
        }
    }

    map
}
