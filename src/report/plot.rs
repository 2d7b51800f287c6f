use crate::error::Result;
use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 400;
const MARGIN: u32 = 40;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([64, 64, 64]);
const GRID: Rgb<u8> = Rgb([210, 210, 210]);
pub const LINE: Rgb<u8> = Rgb([31, 119, 180]);

/// Sentiment over comment sequence. x is the comment's position among scored
/// comments, y maps `[-1, 1]` bottom to top.
pub fn render_sentiment_plot(scores: &[f64]) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    let (left, right) = (MARGIN, WIDTH - MARGIN);
    let (top, bottom) = (MARGIN, HEIGHT - MARGIN);

    // zero line and +/-0.5 guides
    for score in [-0.5, 0.0, 0.5] {
        let y = y_for(score, top, bottom);
        for x in (left..=right).step_by(4) {
            img.put_pixel(x, y, GRID);
        }
    }
    draw_line(&mut img, (left, top), (left, bottom), AXIS);
    draw_line(&mut img, (left, bottom), (right, bottom), AXIS);

    let points = scores
        .iter()
        .enumerate()
        .map(|(i, score)| (x_for(i, scores.len(), left, right), y_for(*score, top, bottom)))
        .collect::<Vec<_>>();
    for pair in points.windows(2) {
        draw_line(&mut img, pair[0], pair[1], LINE);
    }
    for (x, y) in &points {
        draw_dot(&mut img, *x, *y, LINE);
    }
    img
}

pub fn save_sentiment_plot(scores: &[f64], path: &Path) -> Result<()> {
    render_sentiment_plot(scores).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn x_for(i: usize, n: usize, left: u32, right: u32) -> u32 {
    if n <= 1 {
        return (left + right) / 2;
    }
    left + ((right - left) as f64 * i as f64 / (n - 1) as f64).round() as u32
}

fn y_for(score: f64, top: u32, bottom: u32) -> u32 {
    let score = if score.is_finite() { score.clamp(-1.0, 1.0) } else { 0.0 };
    let ratio = (1.0 - score) / 2.0;
    top + ((bottom - top) as f64 * ratio).round() as u32
}

/// Bresenham line between two in-bounds points.
fn draw_line(img: &mut RgbImage, from: (u32, u32), to: (u32, u32), color: Rgb<u8>) {
    let (mut x0, mut y0) = (from.0 as i64, from.1 as i64);
    let (x1, y1) = (to.0 as i64, to.1 as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        img.put_pixel(x0 as u32, y0 as u32, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_dot(img: &mut RgbImage, x: u32, y: u32, color: Rgb<u8>) {
    for px in x.saturating_sub(2)..=(x + 2).min(img.width() - 1) {
        for py in y.saturating_sub(2)..=(y + 2).min(img.height() - 1) {
            img.put_pixel(px, py, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_land_where_expected() {
        let img = render_sentiment_plot(&[1.0, -1.0, 0.0]);
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
        // first point top-left, second bottom-center, third mid-right
        assert_eq!(*img.get_pixel(MARGIN, MARGIN), LINE);
        assert_eq!(*img.get_pixel(WIDTH / 2, HEIGHT - MARGIN), LINE);
        assert_eq!(*img.get_pixel(WIDTH - MARGIN, HEIGHT / 2), LINE);
    }

    #[test]
    fn test_single_point_is_centered() {
        let img = render_sentiment_plot(&[0.5]);
        assert_eq!(*img.get_pixel(WIDTH / 2, y_for(0.5, MARGIN, HEIGHT - MARGIN)), LINE);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        assert_eq!(y_for(3.0, 40, 360), 40);
        assert_eq!(y_for(-3.0, 40, 360), 360);
        assert_eq!(y_for(f64::NAN, 40, 360), 200);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");
        save_sentiment_plot(&[0.1, 0.4, -0.2], &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
