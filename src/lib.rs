use std::time::Instant;

pub mod events;
pub mod graph;
pub mod highlight;
pub mod objects;
pub mod parse;
pub mod preview;
pub mod report;
pub mod rounding;
pub mod timing;

// Re-export the primary data structures for library users
pub use highlight::{HighlightKind, HighlightRange};
pub use parse::ParsedMetadata;
pub use preview::{PlayfieldPreview, PreviewOptions};
pub use report::BeatmapSummary;

use crate::events::*;
use crate::highlight::*;
use crate::objects::*;
use crate::parse::*;
use crate::timing::*;

/// One-shot parse of a beatmap file's raw bytes.
///
/// Never fails: garbage input yields default-filled metadata and empty
/// collections. The caller supplies the audio duration later (it arrives
/// from a separate probe) and feeds the spans into
/// [`build_track_highlights`] once it is known.
pub fn analyze(data: &[u8]) -> BeatmapSummary {
    let total_start_time = Instant::now();

    let text = decode_bytes(data);
    let metadata = parse_metadata(&text);
    let background = background_filename(&text);
    let timing = parse_timing(&text);
    let spans = resolve_spans(&text, &timing);
    let breaks = parse_breaks(&text);
    let bookmarks = parse_bookmarks(&text);
    let (bpm_min, bpm_max) = timing.bpm_range();

    BeatmapSummary {
        metadata,
        background,
        bpm_min,
        bpm_max,
        slider_multiplier: timing.slider_multiplier,
        spans,
        breaks,
        bookmarks,
        elapsed: total_start_time.elapsed(),
    }
}

/// All highlight ranges for a track, in storage order: breaks first, then
/// object coverage, then bookmarks. Renderers re-sort to put bookmarks on
/// top.
pub fn build_track_highlights(
    spans: &HitSpans,
    breaks: &[BreakPeriod],
    bookmarks: &[i32],
    duration_ms: f64,
) -> Vec<HighlightRange> {
    let mut ranges = build_break_ranges(breaks, duration_ms);
    ranges.extend(build_highlight_ranges(
        &spans.starts,
        &spans.ends,
        duration_ms,
    ));
    ranges.extend(build_bookmark_ranges(bookmarks, duration_ms));
    ranges
}
