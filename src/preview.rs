use crate::objects::{combo_skip, is_hold, is_new_combo, is_slider, is_spinner};
use crate::parse::{
    Section, key_is, key_value, normalize_mode, parse_float, parse_int, section_lines,
};
use crate::timing::parse_timing;

pub const DEFAULT_MAX_OBJECTS: usize = 8000;

const DEFAULT_DIFFICULTY: f64 = 5.0;
const DEFAULT_STACK_LENIENCY: f64 = 0.7;
const DEFAULT_CURVE_TYPE: char = 'B';

#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions {
    /// Objects beyond this count are skipped (scanning continues so the
    /// globals stay complete).
    pub max_objects: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            max_objects: DEFAULT_MAX_OBJECTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Circle,
    Slider,
    Spinner,
    Hold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewObject {
    pub x: f64,
    pub y: f64,
    pub time: i32,
    pub end_time: i32,
    pub kind: ObjectKind,
    pub hit_sound: u32,
    pub slider_points: Vec<(f64, f64)>,
    pub slider_curve_type: char,
    pub slides: u32,
    pub length: f64,
    pub new_combo: bool,
    pub combo_skip: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboColour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Full-fidelity model for the playfield preview renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayfieldPreview {
    pub objects: Vec<PreviewObject>,
    pub circle_size: f64,
    pub approach_rate: f64,
    pub overall_difficulty: f64,
    pub stack_leniency: f64,
    pub mode: u8,
    pub slider_multiplier: f64,
    pub bpm_min: f64,
    pub bpm_max: f64,
    pub combo_colours: Vec<ComboColour>,
    pub max_object_time: i32,
}

fn parse_combo_colour(value: &str) -> Option<ComboColour> {
    let mut parts = value.split(',');
    let mut component = || {
        parse_float(parts.next()?)
            .map(|v| v.trunc().clamp(0.0, 255.0) as u8)
    };
    let r = component()?;
    let g = component()?;
    let b = component()?;
    Some(ComboColour { r, g, b })
}

/// `type|x:y|x:y|...` slider path field.
fn parse_slider_path(field: &str) -> (char, Vec<(f64, f64)>) {
    let mut tokens = field.split('|');
    let curve_type = tokens
        .next()
        .and_then(|t| t.trim().chars().next())
        .unwrap_or(DEFAULT_CURVE_TYPE);
    let points = tokens
        .filter_map(|token| {
            let (x, y) = token.split_once(':')?;
            Some((parse_float(x)?, parse_float(y)?))
        })
        .collect();
    (curve_type, points)
}

/// Independent full pass over the beatmap for the preview renderer.
///
/// Objects past `max_objects` are skipped, not an error; the scan keeps
/// going so `bpm_min`/`bpm_max` and `max_object_time` cover the whole file.
pub fn parse_preview(text: &str, options: PreviewOptions) -> PlayfieldPreview {
    let timing = parse_timing(text);
    let (bpm_min, bpm_max) = timing.bpm_range();

    let mut objects = Vec::new();
    let mut circle_size = DEFAULT_DIFFICULTY;
    let mut approach_rate: Option<f64> = None;
    let mut overall_difficulty = DEFAULT_DIFFICULTY;
    let mut stack_leniency = DEFAULT_STACK_LENIENCY;
    let mut mode: u8 = 0;
    let mut combo_colours = Vec::new();
    let mut max_object_time: i32 = 0;

    for (section, line) in section_lines(text) {
        match section {
            Section::General => {
                let Some((key, value)) = key_value(line) else {
                    continue;
                };
                if key_is(key, "mode") {
                    mode = normalize_mode(value);
                } else if key_is(key, "stackleniency") {
                    if let Some(v) = parse_float(value) {
                        stack_leniency = v;
                    }
                }
            }
            Section::Difficulty => {
                let Some((key, value)) = key_value(line) else {
                    continue;
                };
                if key_is(key, "circlesize") {
                    if let Some(v) = parse_float(value) {
                        circle_size = v;
                    }
                } else if key_is(key, "approachrate") {
                    approach_rate = parse_float(value);
                } else if key_is(key, "overalldifficulty") {
                    if let Some(v) = parse_float(value) {
                        overall_difficulty = v;
                    }
                }
            }
            Section::Colours => {
                let Some((key, value)) = key_value(line) else {
                    continue;
                };
                if key.len() > 5 && key.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("combo")) {
                    if let Some(colour) = parse_combo_colour(value) {
                        combo_colours.push(colour);
                    }
                }
            }
            Section::HitObjects => {
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
                let x = parse_float(fields[0]).unwrap_or(0.0);
                let y = parse_float(fields[1]).unwrap_or(0.0);
                let hit_sound = fields
                    .get(4)
                    .and_then(|v| parse_int(v))
                    .map(|v| v.max(0) as u32)
                    .unwrap_or(0);

                let mut slider_points = Vec::new();
                let mut slider_curve_type = DEFAULT_CURVE_TYPE;
                let mut slides: u32 = 1;
                let mut length = 0.0;

                let (kind, end_time) = if is_slider(ty) {
                    if let Some(path) = fields.get(5) {
                        (slider_curve_type, slider_points) = parse_slider_path(path);
                    }
                    slides = fields
                        .get(6)
                        .and_then(|v| parse_int(v))
                        .map(|v| v.max(0) as u32)
                        .unwrap_or(1);
                    length = fields.get(7).and_then(|v| parse_float(v)).unwrap_or(0.0);
                    let duration = timing.slider_duration(time, length, f64::from(slides));
                    let end = if duration.is_finite() {
                        time.saturating_add(duration.floor().max(0.0) as i32)
                    } else {
                        time
                    };
                    (ObjectKind::Slider, end)
                } else if is_spinner(ty) {
                    let end = fields.get(5).and_then(|v| parse_int(v)).unwrap_or(time);
                    (ObjectKind::Spinner, end)
                } else if is_hold(ty) {
                    let end = fields
                        .get(5)
                        .and_then(|v| v.split(':').next())
                        .and_then(parse_int)
                        .unwrap_or(time);
                    (ObjectKind::Hold, end)
                } else {
                    (ObjectKind::Circle, time)
                };
                let end_time = end_time.max(time);
                max_object_time = max_object_time.max(end_time);

                if objects.len() < options.max_objects {
                    objects.push(PreviewObject {
                        x,
                        y,
                        time,
                        end_time,
                        kind,
                        hit_sound,
                        slider_points,
                        slider_curve_type,
                        slides,
                        length,
                        new_combo: is_new_combo(ty),
                        combo_skip: combo_skip(ty),
                    });
                }
            }
            _ => {}
        }
    }

    PlayfieldPreview {
        objects,
        circle_size,
        // Old format versions carry no ApproachRate; OD stands in.
        approach_rate: approach_rate.unwrap_or(overall_difficulty),
        overall_difficulty,
        stack_leniency,
        mode,
        slider_multiplier: timing.slider_multiplier,
        bpm_min,
        bpm_max,
        combo_colours,
        max_object_time,
    }
}
