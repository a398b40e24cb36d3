use std::{path::Path, sync::OnceLock};

use plotters::{
    prelude::*,
    style::{register_font, FontStyle},
};
use thiserror::Error;

pub const RATING_BUCKETS: usize = 5;

const CHART_TITLE: &str = "Movie Rating Histogram";
const X_LABEL: &str = "Ratings";
const Y_LABEL: &str = "Number of Movies";
const FONT_FAMILY: &str = "sans-serif";
static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("could not draw histogram to {path}: {message}")]
    Draw { path: String, message: String },
}

/// Appends `.png` unless the path already names a PNG or JPEG file.
pub fn normalize_output_path(path: &str) -> String {
    let path = path.trim();
    if path.ends_with(".png") || path.ends_with(".jpeg") {
        path.to_string()
    } else {
        format!("{}.png", path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub start: f64,
    pub end: f64,
    pub count: u32,
}

/// Equal-width buckets spanning the smallest to the largest rating.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingHistogram {
    pub buckets: Vec<Bucket>,
}

impl RatingHistogram {
    pub fn from_ratings(ratings: &[f64], bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        let finite: Vec<f64> = ratings.iter().copied().filter(|r| r.is_finite()).collect();

        let (mut lo, mut hi) = match (
            finite.iter().copied().reduce(f64::min),
            finite.iter().copied().reduce(f64::max),
        ) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => (0.0, 10.0),
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bucket_count as f64;
        let mut buckets: Vec<Bucket> = (0..bucket_count)
            .map(|i| Bucket {
                start: lo + width * i as f64,
                end: if i + 1 == bucket_count {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for rating in finite {
            // The maximum belongs to the last, closed bucket.
            let idx = (((rating - lo) / width) as usize).min(bucket_count - 1);
            buckets[idx].count += 1;
        }

        RatingHistogram { buckets }
    }

    pub fn max_count(&self) -> u32 {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Makes the bundled font available to plotters under `FONT_FAMILY`.
/// Registration happens once per process.
fn register_chart_font() -> bool {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    *REGISTERED.get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA).is_ok())
}

/// Writes a rating histogram image.
pub trait HistogramRenderer {
    fn render(&self, histogram: &RatingHistogram, path: &Path) -> Result<(), RenderError>;
}

/// Bitmap renderer; the encoding follows the file extension.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    pub size: (u32, u32),
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        PlottersRenderer { size: (640, 480) }
    }
}

impl HistogramRenderer for PlottersRenderer {
    fn render(&self, histogram: &RatingHistogram, path: &Path) -> Result<(), RenderError> {
        let draw_error = |e: &dyn std::fmt::Display| RenderError::Draw {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let (Some(first), Some(last)) = (histogram.buckets.first(), histogram.buckets.last())
        else {
            return Err(draw_error(&"no buckets to draw"));
        };
        if !register_chart_font() {
            return Err(draw_error(&"bundled chart font is not a valid font file"));
        }

        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| draw_error(&e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(CHART_TITLE, (FONT_FAMILY, 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(first.start..last.end, 0u32..histogram.max_count() + 1)
            .map_err(|e| draw_error(&e))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .label_style((FONT_FAMILY, 14))
            .draw()
            .map_err(|e| draw_error(&e))?;

        chart
            .draw_series(histogram.buckets.iter().map(|b| {
                Rectangle::new([(b.start, 0), (b.end, b.count)], BLUE.mix(0.5).filled())
            }))
            .map_err(|e| draw_error(&e))?;
        chart
            .draw_series(
                histogram
                    .buckets
                    .iter()
                    .map(|b| Rectangle::new([(b.start, 0), (b.end, b.count)], BLUE.stroke_width(1))),
            )
            .map_err(|e| draw_error(&e))?;

        root.present().map_err(|e| draw_error(&e))?;
        log::info!("Histogram written to {}", path.display());
        Ok(())
    }
}
