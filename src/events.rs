use crate::parse::{Section, key_is, key_value, parse_float, parse_int, section_lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPeriod {
    pub start: i32,
    pub end: i32,
}

/// Break periods from `[Events]`: lines whose first field is `2` or
/// `break` (any case), with at least 3 fields and a positive width.
pub fn parse_breaks(text: &str) -> Vec<BreakPeriod> {
    let mut breaks = Vec::new();

    for (section, line) in section_lines(text) {
        if section != Section::Events {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 3 {
            continue;
        }
        let tag = fields[0].trim();
        if tag != "2" && !tag.eq_ignore_ascii_case("break") {
            continue;
        }
        let (Some(start), Some(end)) = (parse_int(fields[1]), parse_int(fields[2])) else {
            continue;
        };
        if end > start {
            breaks.push(BreakPeriod { start, end });
        }
    }

    breaks
}

/// Bookmark timestamps from the first `Bookmarks:` line of `[Editor]`.
/// Non-numeric entries are dropped; later `Bookmarks:` lines are ignored.
pub fn parse_bookmarks(text: &str) -> Vec<i32> {
    for (section, line) in section_lines(text) {
        if section != Section::Editor {
            continue;
        }
        let Some((key, value)) = key_value(line) else {
            continue;
        };
        if !key_is(key, "bookmarks") {
            continue;
        }
        return value
            .split(',')
            .filter_map(parse_float)
            .map(|v| v.trunc() as i32)
            .collect();
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_filter_drops_inverted_periods() {
        let text = "[Events]\n2,1000,500\n2,500,1000\nBreak,2000,3000\n2,4000,4000\n";
        let breaks = parse_breaks(text);
        assert_eq!(
            breaks,
            vec![
                BreakPeriod {
                    start: 500,
                    end: 1000
                },
                BreakPeriod {
                    start: 2000,
                    end: 3000
                },
            ]
        );
    }

    #[test]
    fn break_needs_three_fields() {
        assert!(parse_breaks("[Events]\n2,1000\n").is_empty());
    }

    #[test]
    fn first_bookmarks_line_wins() {
        let text = "[Editor]\nBookmarks: 100,200,abc,300\nBookmarks: 999\n";
        assert_eq!(parse_bookmarks(text), vec![100, 200, 300]);
    }

    #[test]
    fn no_bookmarks_yields_empty() {
        assert!(parse_bookmarks("[Editor]\nBeatDivisor: 4\n").is_empty());
        assert!(parse_bookmarks("").is_empty());
    }
}
