use crate::parse::{Section, parse_float, parse_int, section_lines};
use crate::timing::TimingMap;

// Hit-object type bitflags, fixed by the file format.
pub const TYPE_SLIDER: u32 = 2;
pub const TYPE_NEW_COMBO: u32 = 4;
pub const TYPE_SPINNER: u32 = 8;
pub const TYPE_HOLD: u32 = 128;

#[inline(always)]
pub fn is_slider(ty: u32) -> bool {
    ty & TYPE_SLIDER != 0
}

#[inline(always)]
pub fn is_spinner(ty: u32) -> bool {
    ty & TYPE_SPINNER != 0
}

#[inline(always)]
pub fn is_hold(ty: u32) -> bool {
    ty & TYPE_HOLD != 0
}

#[inline(always)]
pub fn is_new_combo(ty: u32) -> bool {
    ty & TYPE_NEW_COMBO != 0
}

#[inline(always)]
pub fn combo_skip(ty: u32) -> u32 {
    (ty >> 4) & 0b111
}

/// Index-aligned `[start, end]` spans for every `[HitObjects]` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitSpans {
    pub starts: Vec<i32>,
    pub ends: Vec<i32>,
}

impl HitSpans {
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn max_end(&self) -> i32 {
        self.ends.iter().copied().max().unwrap_or(0)
    }
}

#[inline(always)]
fn floor_duration(duration: f64) -> i32 {
    if duration.is_finite() {
        duration.floor().max(0.0) as i32
    } else {
        0
    }
}

/// End time of a single object given its parsed fields.
fn object_end(time: i32, ty: u32, fields: &[&str], timing: &TimingMap) -> i32 {
    let end = if is_slider(ty) {
        let slides = fields
            .get(6)
            .and_then(|v| parse_float(v))
            .unwrap_or(1.0)
            .trunc();
        let length = fields.get(7).and_then(|v| parse_float(v)).unwrap_or(0.0);
        time.saturating_add(floor_duration(timing.slider_duration(time, length, slides)))
    } else if is_spinner(ty) {
        fields.get(5).and_then(|v| parse_int(v)).unwrap_or(time)
    } else if is_hold(ty) {
        fields
            .get(5)
            .and_then(|v| v.split(':').next())
            .and_then(parse_int)
            .unwrap_or(time)
    } else {
        time
    };
    end.max(time)
}

/// Resolves every `[HitObjects]` line into a millisecond span.
///
/// Lines with fewer than 4 comma fields, or with unparsable time/type
/// fields, are skipped. Whenever the previous object is a slider, its end is
/// raised to at least the current object's start time; back-to-back slider
/// durations drift under the rounding above and the raise keeps coverage
/// contiguous.
pub fn resolve_spans(text: &str, timing: &TimingMap) -> HitSpans {
    let mut spans = HitSpans::default();
    let mut prev_was_slider = false;

    for (section, line) in section_lines(text) {
        if section != Section::HitObjects {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 4 {
            continue;
        }
        let Some(time) = parse_int(fields[2]) else {
            continue;
        };
        let Some(ty) = parse_float(fields[3]).map(|v| v.trunc() as i64 as u32) else {
            continue;
        };

        if prev_was_slider {
            if let Some(prev_end) = spans.ends.last_mut() {
                *prev_end = (*prev_end).max(time);
            }
        }

        spans.starts.push(time);
        spans.ends.push(object_end(time, ty, &fields, timing));
        prev_was_slider = is_slider(ty);
    }

    spans
}
