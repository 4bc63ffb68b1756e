use std::fs::File;

use crate::highlight::{HighlightKind, HighlightRange};

#[derive(Debug, Clone, Copy)]
pub enum ColorScheme {
    Default,
    Alternative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

struct StripColors {
    background: [u8; 3],
    object: [u8; 3],
    break_: [u8; 3],
    bookmark: [u8; 3],
}

fn scheme_colors(scheme: &ColorScheme) -> StripColors {
    match scheme {
        ColorScheme::Default => StripColors {
            background: [30, 40, 47],
            object: [0, 184, 204],
            break_: [58, 74, 84],
            bookmark: [247, 243, 51],
        },
        ColorScheme::Alternative => StripColors {
            background: [30, 40, 47],
            object: [236, 122, 25],
            break_: [58, 74, 84],
            bookmark: [130, 0, 161],
        },
    }
}

// Breaks under objects, bookmarks on top.
#[inline(always)]
fn draw_priority(kind: HighlightKind) -> u8 {
    match kind {
        HighlightKind::Break => 0,
        HighlightKind::Object => 1,
        HighlightKind::Bookmark => 2,
    }
}

fn generate_strip_pixels(
    ranges: &[HighlightRange],
    width: u32,
    height: u32,
    colors: &StripColors,
) -> Vec<u8> {
    let mut img_buffer = vec![0; (width * height * 3) as usize];
    img_buffer
        .chunks_exact_mut(3)
        .for_each(|pixel| pixel.copy_from_slice(&colors.background));
    if width == 0 || height == 0 {
        return img_buffer;
    }

    let mut ordered: Vec<&HighlightRange> = ranges.iter().collect();
    ordered.sort_by_key(|range| draw_priority(range.kind));

    for range in ordered {
        if !(range.end > range.start) {
            continue;
        }
        let color = match range.kind {
            HighlightKind::Object => colors.object,
            HighlightKind::Break => colors.break_,
            HighlightKind::Bookmark => colors.bookmark,
        };
        let x0 = ((range.start.clamp(0.0, 1.0) * f64::from(width)).floor() as u32).min(width - 1);
        let x1 = ((range.end.clamp(0.0, 1.0) * f64::from(width)).ceil() as u32)
            .clamp(x0 + 1, width);
        for x in x0..x1 {
            for y in 0..height {
                let idx = (y * width + x) as usize * 3;
                img_buffer[idx..idx + 3].copy_from_slice(&color);
            }
        }
    }

    img_buffer
}

/// Writes a `{width}x{height}` highlight strip PNG next to the caller's cwd.
pub fn generate_highlight_strip_png(
    ranges: &[HighlightRange],
    filename: &str,
    color_scheme: &ColorScheme,
) -> std::io::Result<()> {
    const IMAGE_WIDTH: u32 = 1000;
    const STRIP_HEIGHT: u32 = 40;

    let colors = scheme_colors(color_scheme);
    let img_buffer_rgb = generate_strip_pixels(ranges, IMAGE_WIDTH, STRIP_HEIGHT, &colors);

    let file = File::create(filename)?;
    let mut encoder = png::Encoder::new(file, IMAGE_WIDTH, STRIP_HEIGHT);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&img_buffer_rgb)?;

    Ok(())
}

pub fn generate_highlight_strip_rgba_data(
    ranges: &[HighlightRange],
    width: u32,
    height: u32,
    color_scheme: &ColorScheme,
) -> StripImageData {
    let colors = scheme_colors(color_scheme);
    let rgb_data = generate_strip_pixels(ranges, width, height, &colors);

    let rgba_data = rgb_data
        .chunks_exact(3)
        .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
        .collect();

    StripImageData {
        width,
        height,
        data: rgba_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(data: &[u8], width: u32, x: u32, y: u32) -> [u8; 3] {
        let idx = (y * width + x) as usize * 3;
        [data[idx], data[idx + 1], data[idx + 2]]
    }

    #[test]
    fn bookmarks_draw_over_objects() {
        let ranges = vec![
            HighlightRange {
                start: 0.4,
                end: 0.41,
                kind: HighlightKind::Bookmark,
            },
            HighlightRange {
                start: 0.0,
                end: 1.0,
                kind: HighlightKind::Object,
            },
        ];
        let colors = scheme_colors(&ColorScheme::Default);
        let data = generate_strip_pixels(&ranges, 100, 4, &colors);
        assert_eq!(data.len(), 100 * 4 * 3);
        assert_eq!(pixel(&data, 100, 0, 0), colors.object);
        assert_eq!(pixel(&data, 100, 40, 0), colors.bookmark);
    }

    #[test]
    fn narrow_range_still_visible() {
        let ranges = vec![HighlightRange {
            start: 0.5,
            end: 0.5001,
            kind: HighlightKind::Object,
        }];
        let colors = scheme_colors(&ColorScheme::Default);
        let data = generate_strip_pixels(&ranges, 100, 1, &colors);
        assert_eq!(pixel(&data, 100, 50, 0), colors.object);
    }

    #[test]
    fn rgba_variant_pads_alpha() {
        let image = generate_highlight_strip_rgba_data(&[], 10, 2, &ColorScheme::Alternative);
        assert_eq!(image.data.len(), 10 * 2 * 4);
        assert!(image.data.iter().skip(3).step_by(4).all(|&a| a == 255));
    }
}
