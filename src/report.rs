use std::time::Duration;

use serde_json::json;

use crate::events::BreakPeriod;
use crate::highlight::{HighlightRange, serialize_highlights};
use crate::objects::HitSpans;
use crate::parse::{ParsedMetadata, beatmap_set_url};
use crate::rounding::round_2;

/// Everything one parse of a beatmap produces, for the list-entry builder.
#[derive(Debug, Clone)]
pub struct BeatmapSummary {
    pub metadata:   ParsedMetadata,
    pub background: Option<String>,
    pub bpm_min:    f64,
    pub bpm_max:    f64,
    pub slider_multiplier: f64,
    pub spans:      HitSpans,
    pub breaks:     Vec<BreakPeriod>,
    pub bookmarks:  Vec<i32>,
    pub elapsed:    Duration,
}

impl BeatmapSummary {
    /// Largest resolved end time; 0 with no objects, in which case the
    /// caller still needs a real audio duration from its probe.
    pub fn last_object_end(&self) -> i32 {
        self.spans.max_end()
    }
}

pub fn summary_json(summary: &BeatmapSummary) -> serde_json::Value {
    let meta = &summary.metadata;
    json!({
        "title": meta.title,
        "title_unicode": meta.title_unicode,
        "artist": meta.artist,
        "artist_unicode": meta.artist_unicode,
        "creator": meta.creator,
        "version": meta.version,
        "beatmap_set_id": meta.beatmap_set_id,
        "beatmap_set_url": beatmap_set_url(&meta.beatmap_set_id),
        "mode": meta.mode,
        "audio": meta.audio,
        "background": summary.background,
        "bpm_min": round_2(summary.bpm_min),
        "bpm_max": round_2(summary.bpm_max),
        "slider_multiplier": summary.slider_multiplier,
        "object_count": summary.spans.len(),
        "break_count": summary.breaks.len(),
        "bookmark_count": summary.bookmarks.len(),
        "last_object_end_ms": summary.last_object_end(),
    })
}

/// Summary JSON plus the serialized highlight tuples for persistence.
pub fn summary_json_with_highlights(
    summary: &BeatmapSummary,
    highlights: &[HighlightRange],
) -> serde_json::Value {
    let mut value = summary_json(summary);
    if let serde_json::Value::Object(map) = &mut value {
        map.insert(
            "highlights".to_string(),
            serde_json::Value::String(serialize_highlights(highlights)),
        );
    }
    value
}
