use crate::events::BreakPeriod;
use crate::rounding::round_4;

pub const OBJECT_BUCKETS: usize = 120;
pub const BOOKMARK_BUCKETS: usize = 200;
/// Bookmarks are instants; the widened end keeps them visible at any width.
pub const BOOKMARK_WIDTH: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    Object,
    Break,
    Bookmark,
}

impl HighlightKind {
    pub const fn as_char(self) -> char {
        match self {
            Self::Object => 'o',
            Self::Break => 'b',
            Self::Bookmark => 'k',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'o' => Some(Self::Object),
            'b' => Some(Self::Break),
            'k' => Some(Self::Bookmark),
            _ => None,
        }
    }
}

/// A time-fraction span of the track, `0 <= start < end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightRange {
    pub start: f64,
    pub end: f64,
    pub kind: HighlightKind,
}

#[inline(always)]
fn bucket_of(time_ms: f64, duration_ms: f64, buckets: usize) -> usize {
    ((time_ms / duration_ms * buckets as f64).floor() as usize).min(buckets - 1)
}

/// Object coverage: marks every bucket a span overlaps, then merges
/// contiguous filled buckets. Empty when the duration is unusable or there
/// are no spans.
pub fn build_highlight_ranges(starts: &[i32], ends: &[i32], duration_ms: f64) -> Vec<HighlightRange> {
    if !(duration_ms > 0.0) || starts.is_empty() {
        return Vec::new();
    }

    let mut filled = [false; OBJECT_BUCKETS];
    for (&start, &end) in starts.iter().zip(ends) {
        let (start, end) = (f64::from(start), f64::from(end));
        if start > duration_ms || end < 0.0 {
            continue;
        }
        let first = bucket_of(start.max(0.0), duration_ms, OBJECT_BUCKETS);
        let last = bucket_of(end.min(duration_ms), duration_ms, OBJECT_BUCKETS);
        for slot in &mut filled[first..=last] {
            *slot = true;
        }
    }

    merge_buckets(&filled, OBJECT_BUCKETS, HighlightKind::Object)
}

fn merge_buckets(filled: &[bool], buckets: usize, kind: HighlightKind) -> Vec<HighlightRange> {
    let mut ranges = Vec::new();
    let mut run_start: Option<usize> = None;

    for i in 0..=buckets {
        let occupied = i < buckets && filled[i];
        match (run_start, occupied) {
            (None, true) => run_start = Some(i),
            (Some(first), false) => {
                ranges.push(HighlightRange {
                    start: first as f64 / buckets as f64,
                    end: i as f64 / buckets as f64,
                    kind,
                });
                run_start = None;
            }
            _ => {}
        }
    }

    ranges
}

/// Breaks scale directly (no bucketing); zero-width results are dropped.
pub fn build_break_ranges(breaks: &[BreakPeriod], duration_ms: f64) -> Vec<HighlightRange> {
    if !(duration_ms > 0.0) {
        return Vec::new();
    }
    breaks
        .iter()
        .filter_map(|period| {
            let start = (f64::from(period.start) / duration_ms).clamp(0.0, 1.0);
            let end = (f64::from(period.end) / duration_ms).clamp(0.0, 1.0);
            (end > start).then_some(HighlightRange {
                start,
                end,
                kind: HighlightKind::Break,
            })
        })
        .collect()
}

/// One range per occupied bookmark bucket, with the widened end.
pub fn build_bookmark_ranges(bookmarks: &[i32], duration_ms: f64) -> Vec<HighlightRange> {
    if !(duration_ms > 0.0) || bookmarks.is_empty() {
        return Vec::new();
    }

    let mut filled = [false; BOOKMARK_BUCKETS];
    for &time in bookmarks {
        if time < 0 {
            continue;
        }
        filled[bucket_of(f64::from(time), duration_ms, BOOKMARK_BUCKETS)] = true;
    }

    filled
        .iter()
        .enumerate()
        .filter(|&(_, &occupied)| occupied)
        .map(|(i, _)| HighlightRange {
            start: i as f64 / BOOKMARK_BUCKETS as f64,
            end: (i as f64 + BOOKMARK_WIDTH) / BOOKMARK_BUCKETS as f64,
            kind: HighlightKind::Bookmark,
        })
        .collect()
}

/// Persisted form: a JSON array of `[start, end, kind]` tuples, values
/// rounded to 4 decimals, kind as one of `"o"`, `"b"`, `"k"`.
pub fn serialize_highlights(ranges: &[HighlightRange]) -> String {
    let tuples: Vec<serde_json::Value> = ranges
        .iter()
        .map(|range| {
            serde_json::json!([
                round_4(range.start),
                round_4(range.end),
                range.kind.as_char().to_string(),
            ])
        })
        .collect();
    serde_json::Value::Array(tuples).to_string()
}

/// Inverse of `serialize_highlights`; malformed entries are dropped.
pub fn deserialize_highlights(raw: &str) -> Vec<HighlightRange> {
    let Ok(serde_json::Value::Array(items)) = serde_json::from_str(raw) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let tuple = item.as_array()?;
            let start = tuple.first()?.as_f64()?;
            let end = tuple.get(1)?.as_f64()?;
            let kind = HighlightKind::from_char(tuple.get(2)?.as_str()?.chars().next()?)?;
            Some(HighlightRange { start, end, kind })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_merge_end_to_end() {
        let ranges = build_highlight_ranges(&[0, 2000], &[1000, 3000], 10_000.0);
        assert_eq!(ranges.len(), 2);
        let tolerance = 1.5 / OBJECT_BUCKETS as f64;
        assert!((ranges[0].start - 0.0).abs() <= tolerance);
        assert!((ranges[0].end - 0.1).abs() <= tolerance);
        assert!((ranges[1].start - 0.2).abs() <= tolerance);
        assert!((ranges[1].end - 0.3).abs() <= tolerance);
        for range in &ranges {
            assert_eq!(range.kind, HighlightKind::Object);
            assert!(range.start < range.end);
        }
    }

    #[test]
    fn adjacent_spans_merge_into_one_range() {
        let ranges = build_highlight_ranges(&[0, 1000], &[1000, 2000], 2000.0);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start, 0.0);
        assert_eq!(ranges[0].end, 1.0);
    }

    #[test]
    fn empty_on_unusable_duration_or_no_spans() {
        assert!(build_highlight_ranges(&[0], &[100], 0.0).is_empty());
        assert!(build_highlight_ranges(&[0], &[100], f64::NAN).is_empty());
        assert!(build_highlight_ranges(&[], &[], 10_000.0).is_empty());
    }

    #[test]
    fn span_past_duration_clamps_to_last_bucket() {
        let ranges = build_highlight_ranges(&[9_900], &[25_000], 10_000.0);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].end, 1.0);
    }

    #[test]
    fn break_ranges_scale_and_drop_zero_width() {
        let breaks = [
            BreakPeriod {
                start: 2_500,
                end: 5_000,
            },
            BreakPeriod {
                start: 9_999,
                end: 20_000,
            },
        ];
        let ranges = build_break_ranges(&breaks, 10_000.0);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start, 0.25);
        assert_eq!(ranges[0].end, 0.5);
        assert_eq!(ranges[1].end, 1.0);

        let degenerate = [BreakPeriod {
            start: 15_000,
            end: 16_000,
        }];
        assert!(build_break_ranges(&degenerate, 10_000.0).is_empty());
    }

    #[test]
    fn bookmark_ranges_widen_and_stay_capped() {
        let ranges = build_bookmark_ranges(&[0, 5_000, 10_000], 10_000.0);
        assert_eq!(ranges.len(), 3);
        let cap = 1.0 + BOOKMARK_WIDTH / BOOKMARK_BUCKETS as f64;
        for range in &ranges {
            assert!(range.start < range.end);
            assert!(range.end <= cap);
            let width = range.end - range.start;
            assert!((width - BOOKMARK_WIDTH / BOOKMARK_BUCKETS as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn bookmarks_in_same_bucket_emit_one_range() {
        let ranges = build_bookmark_ranges(&[5_000, 5_001], 10_000.0);
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn serialization_round_trip() {
        let ranges = vec![
            HighlightRange {
                start: 0.0,
                end: 0.108_333,
                kind: HighlightKind::Object,
            },
            HighlightRange {
                start: 0.25,
                end: 0.5,
                kind: HighlightKind::Break,
            },
            HighlightRange {
                start: 0.995,
                end: 1.006,
                kind: HighlightKind::Bookmark,
            },
        ];
        let restored = deserialize_highlights(&serialize_highlights(&ranges));
        assert_eq!(restored.len(), ranges.len());
        for (left, right) in ranges.iter().zip(&restored) {
            assert!((left.start - right.start).abs() < 1e-4);
            assert!((left.end - right.end).abs() < 1e-4);
            assert_eq!(left.kind, right.kind);
        }
    }

    #[test]
    fn deserialize_drops_malformed_entries() {
        let restored = deserialize_highlights(r#"[[0.1,0.2,"o"],[0.3],"junk",[0.4,0.5,"x"]]"#);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].kind, HighlightKind::Object);
    }

    #[test]
    fn deserialize_tolerates_garbage_input() {
        assert!(deserialize_highlights("not json").is_empty());
        assert!(deserialize_highlights("{}").is_empty());
    }
}
