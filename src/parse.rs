use std::borrow::Cow;

pub const FALLBACK_TITLE: &str = "Unknown Title";
pub const FALLBACK_ARTIST: &str = "Unknown Artist";
pub const FALLBACK_CREATOR: &str = "Unknown Creator";
pub const FALLBACK_VERSION: &str = "Unknown Version";

const CP1252_MAP: [u16; 32] = [
    0x20AC, 0xFFFD, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0xFFFD, 0x017D, 0xFFFD, 0xFFFD, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014,
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0xFFFD, 0x017E, 0x0178,
];

fn decode_cp1252(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x00..=0x7F => b as char,
            0x80..=0x9F => {
                char::from_u32(CP1252_MAP[(b - 0x80) as usize] as u32).unwrap_or('\u{FFFD}')
            }
            _ => char::from_u32(b as u32).unwrap_or('\u{FFFD}'),
        })
        .collect()
}

/// Decodes beatmap bytes as UTF-8, falling back to CP1252 for legacy files.
pub fn decode_bytes(bytes: &[u8]) -> Cow<'_, str> {
    std::str::from_utf8(bytes)
        .map(Cow::Borrowed)
        .unwrap_or_else(|_| Cow::Owned(decode_cp1252(bytes)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    None,
    General,
    Editor,
    Metadata,
    Difficulty,
    Events,
    TimingPoints,
    Colours,
    HitObjects,
    Other,
}

impl Section {
    fn from_header(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("general") {
            Self::General
        } else if name.eq_ignore_ascii_case("editor") {
            Self::Editor
        } else if name.eq_ignore_ascii_case("metadata") {
            Self::Metadata
        } else if name.eq_ignore_ascii_case("difficulty") {
            Self::Difficulty
        } else if name.eq_ignore_ascii_case("events") {
            Self::Events
        } else if name.eq_ignore_ascii_case("timingpoints") {
            Self::TimingPoints
        } else if name.eq_ignore_ascii_case("colours") {
            Self::Colours
        } else if name.eq_ignore_ascii_case("hitobjects") {
            Self::HitObjects
        } else {
            Self::Other
        }
    }
}

/// Iterator over the content lines of a beatmap file, each tagged with the
/// section it appears in. Blank lines, `//` comments and `[Section]` headers
/// are consumed internally; lines before the first header carry
/// `Section::None`.
pub struct SectionLines<'a> {
    lines: std::str::Lines<'a>,
    section: Section,
}

impl<'a> Iterator for SectionLines<'a> {
    type Item = (Section, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                self.section = Section::from_header(&line[1..line.len() - 1]);
                continue;
            }
            return Some((self.section, line));
        }
    }
}

pub fn section_lines(text: &str) -> SectionLines<'_> {
    SectionLines {
        lines: text.lines(),
        section: Section::None,
    }
}

#[inline(always)]
pub fn key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

#[inline(always)]
pub fn key_is(key: &str, expected: &str) -> bool {
    key.eq_ignore_ascii_case(expected)
}

/// Permissive float parse: trimmed, finite results only.
#[inline(always)]
pub fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Permissive integer parse via float (accepts "1000", "1000.0", " 1000 ").
#[inline(always)]
pub fn parse_int(s: &str) -> Option<i32> {
    parse_float(s).map(|v| v.trunc() as i32)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMetadata {
    pub title: String,
    pub title_unicode: String,
    pub artist: String,
    pub artist_unicode: String,
    pub creator: String,
    pub version: String,
    pub beatmap_set_id: String,
    pub mode: u8,
    pub audio: String,
}

impl Default for ParsedMetadata {
    fn default() -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            title_unicode: FALLBACK_TITLE.to_string(),
            artist: FALLBACK_ARTIST.to_string(),
            artist_unicode: FALLBACK_ARTIST.to_string(),
            creator: FALLBACK_CREATOR.to_string(),
            version: FALLBACK_VERSION.to_string(),
            beatmap_set_id: String::new(),
            mode: 0,
            audio: String::new(),
        }
    }
}

/// Normalizes a raw mode value to one of the four game modes.
/// Only the integers 0..=3 pass through; everything else (missing,
/// non-numeric, out of range) is osu!standard.
pub fn normalize_mode(raw: &str) -> u8 {
    match parse_float(raw).map(|v| v.trunc() as i64) {
        Some(m @ 0..=3) => m as u8,
        _ => 0,
    }
}

#[inline(always)]
fn capture(slot: &mut Option<String>, value: &str) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

pub fn parse_metadata(text: &str) -> ParsedMetadata {
    let mut title = None;
    let mut title_unicode = None;
    let mut artist = None;
    let mut artist_unicode = None;
    let mut creator = None;
    let mut version = None;
    let mut beatmap_set_id = None;
    let mut audio = None;
    let mut mode: u8 = 0;

    for (section, line) in section_lines(text) {
        match section {
            Section::Metadata => {
                let Some((key, value)) = key_value(line) else {
                    continue;
                };
                if key_is(key, "title") {
                    capture(&mut title, value);
                } else if key_is(key, "titleunicode") {
                    capture(&mut title_unicode, value);
                } else if key_is(key, "artist") {
                    capture(&mut artist, value);
                } else if key_is(key, "artistunicode") {
                    capture(&mut artist_unicode, value);
                } else if key_is(key, "creator") {
                    capture(&mut creator, value);
                } else if key_is(key, "version") {
                    capture(&mut version, value);
                } else if key_is(key, "beatmapsetid") {
                    capture(&mut beatmap_set_id, value);
                }
            }
            Section::General => {
                let Some((key, value)) = key_value(line) else {
                    continue;
                };
                if key_is(key, "audiofilename") {
                    capture(&mut audio, value);
                } else if key_is(key, "mode") {
                    mode = normalize_mode(value);
                }
            }
            _ => {}
        }
    }

    ParsedMetadata {
        title: title.unwrap_or_else(|| FALLBACK_TITLE.to_string()),
        title_unicode: title_unicode.unwrap_or_else(|| FALLBACK_TITLE.to_string()),
        artist: artist.unwrap_or_else(|| FALLBACK_ARTIST.to_string()),
        artist_unicode: artist_unicode.unwrap_or_else(|| FALLBACK_ARTIST.to_string()),
        creator: creator.unwrap_or_else(|| FALLBACK_CREATOR.to_string()),
        version: version.unwrap_or_else(|| FALLBACK_VERSION.to_string()),
        beatmap_set_id: beatmap_set_id.unwrap_or_default(),
        mode,
        audio: audio.unwrap_or_default(),
    }
}

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

#[inline(always)]
fn is_image_name(token: &str) -> bool {
    token
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Background image filename: the first comma-separated (possibly quoted)
/// token in `[Events]` that ends in a known image extension.
pub fn background_filename(text: &str) -> Option<String> {
    for (section, line) in section_lines(text) {
        if section != Section::Events {
            continue;
        }
        for part in line.split(',') {
            let token = part.trim().trim_matches('"');
            if is_image_name(token) {
                return Some(token.to_string());
            }
        }
    }
    None
}

/// Turns a raw BeatmapSetID into the public beatmap-set URL when it parses
/// as a positive integer; anything else is returned unchanged.
pub fn beatmap_set_url(raw: &str) -> String {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => format!("https://osu.ppy.sh/beatmapsets/{id}"),
        _ => raw.to_string(),
    }
}
