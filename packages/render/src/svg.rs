//! SVG choropleth drawing.
//!
//! Draws one frame as a static SVG: every district path filled from the
//! viridis ramp (grey for no-data), a native `<title>` tooltip per
//! district, and a color bar pinned to the metric's fixed domain so
//! pages for different months stay visually comparable.

use epi_map_choropleth::format::rate_text;
use epi_map_choropleth::frame::{Frame, FrameEntry};
use epi_map_choropleth::scale::MetricDomain;
use epi_map_geography::DistrictGeometry;
use geo::{BoundingRect, LineString};

use crate::html::esc;
use crate::palette;

/// Drawing surface width in pixels.
pub const WIDTH: f64 = 900.0;

/// Drawing surface height in pixels.
pub const HEIGHT: f64 = 600.0;

/// Margin around the drawing.
const MARGIN: f64 = 40.0;

/// Horizontal room reserved for the color bar and its labels.
const BAR_GUTTER: f64 = 120.0;

/// Renders one frame over the district boundaries.
#[must_use]
pub fn render_svg(
    districts: &[DistrictGeometry],
    frame: &Frame,
    domain: MetricDomain,
    title: &str,
) -> String {
    let projector = Projector::fit(districts);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
         viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n"
    );
    svg.push_str(&format!(
        "<text x=\"{MARGIN}\" y=\"26\" font-family=\"sans-serif\" font-size=\"16\" \
         font-weight=\"bold\">{}</text>\n",
        esc(title)
    ));

    for district in districts {
        let Some(entry) = frame.entries.get(&district.key) else {
            continue;
        };
        svg.push_str(&district_path(district, entry, domain, &projector));
    }

    svg.push_str(&color_bar(domain, frame.metric.label()));
    svg.push_str("</svg>\n");
    svg
}

/// Maps lon/lat into pixel coordinates with a uniform scale, so shapes
/// keep their aspect ratio.
struct Projector {
    min_x: f64,
    min_y: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Projector {
    fn fit(districts: &[DistrictGeometry]) -> Self {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for district in districts {
            if let Some(rect) = district.boundary.bounding_rect() {
                min_x = min_x.min(rect.min().x);
                min_y = min_y.min(rect.min().y);
                max_x = max_x.max(rect.max().x);
                max_y = max_y.max(rect.max().y);
            }
        }

        let span_x = max_x - min_x;
        let span_y = max_y - min_y;
        if !span_x.is_finite() || !span_y.is_finite() || span_x <= 0.0 || span_y <= 0.0 {
            return Self {
                min_x: 0.0,
                min_y: 0.0,
                scale: 1.0,
                offset_x: MARGIN,
                offset_y: MARGIN,
            };
        }

        let margins = 2.0 * MARGIN;
        let usable_w = WIDTH - BAR_GUTTER - margins;
        let usable_h = HEIGHT - margins;
        let scale = (usable_w / span_x).min(usable_h / span_y);
        let fitted_w = span_x * scale;
        let fitted_h = span_y * scale;

        Self {
            min_x,
            min_y,
            scale,
            offset_x: MARGIN + (usable_w - fitted_w) / 2.0,
            offset_y: MARGIN + (usable_h - fitted_h) / 2.0,
        }
    }

    /// Projects a lon/lat coordinate; y grows downward in SVG.
    fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.min_x).mul_add(self.scale, self.offset_x),
            HEIGHT - (y - self.min_y).mul_add(self.scale, self.offset_y),
        )
    }
}

fn district_path(
    district: &DistrictGeometry,
    entry: &FrameEntry,
    domain: MetricDomain,
    projector: &Projector,
) -> String {
    let fill = if entry.is_zero {
        palette::NO_DATA_COLOR.to_string()
    } else {
        palette::viridis(domain.position(entry.color_value))
    };
    let opacity = if entry.dimmed {
        palette::DIM_OPACITY
    } else {
        1.0
    };

    let mut d = String::new();
    for polygon in &district.boundary.0 {
        ring_path(&mut d, polygon.exterior(), projector);
        for interior in polygon.interiors() {
            ring_path(&mut d, interior, projector);
        }
    }

    format!(
        "<path d=\"{d}\" fill=\"{fill}\" fill-opacity=\"{opacity}\" fill-rule=\"evenodd\" \
         stroke=\"{}\" stroke-width=\"{}\"><title>{}</title></path>\n",
        palette::STROKE_COLOR,
        palette::STROKE_WIDTH,
        tooltip(entry)
    )
}

fn ring_path(d: &mut String, ring: &LineString<f64>, projector: &Projector) {
    for (index, coord) in ring.coords().enumerate() {
        let (x, y) = projector.project(coord.x, coord.y);
        let op = if index == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{op}{x:.2} {y:.2} "));
    }
    d.push('Z');
    d.push(' ');
}

/// Tooltip rows matching the interactive hover: district, cases,
/// incidence, population. Missing values show as blank.
fn tooltip(entry: &FrameEntry) -> String {
    format!(
        "District: {}&#10;Cases: {}&#10;Incidence/100k: {}&#10;Population: {}",
        esc(&entry.district),
        esc(&entry.cases_text),
        esc(&entry.incidence_text),
        esc(&entry.population_text)
    )
}

fn color_bar(domain: MetricDomain, label: &str) -> String {
    let bar_x = WIDTH - BAR_GUTTER + 20.0;
    let bar_y = MARGIN + 20.0;
    let bar_w = 18.0;
    let bar_h = HEIGHT - 2.0 * MARGIN - 20.0;

    let mut stops = String::new();
    for index in 0..palette::VIRIDIS.len() {
        #[allow(clippy::cast_precision_loss)] // anchor count is tiny
        let offset = index as f64 / (palette::VIRIDIS.len() - 1) as f64 * 100.0;
        stops.push_str(&format!(
            "<stop offset=\"{offset:.1}%\" stop-color=\"{}\"/>",
            palette::anchor_hex(index)
        ));
    }

    format!(
        "<defs><linearGradient id=\"ramp\" x1=\"0\" y1=\"1\" x2=\"0\" y2=\"0\">{stops}</linearGradient></defs>\n\
         <text x=\"{bar_x}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"12\">{}</text>\n\
         <rect x=\"{bar_x}\" y=\"{bar_y}\" width=\"{bar_w}\" height=\"{bar_h}\" fill=\"url(#ramp)\" \
         stroke=\"{}\" stroke-width=\"0.5\"/>\n\
         <text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\">{}</text>\n\
         <text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\">{}</text>\n",
        bar_y - 8.0,
        esc(label),
        palette::STROKE_COLOR,
        bar_x + bar_w + 6.0,
        bar_y + 4.0,
        rate_text(Some(domain.high)),
        bar_x + bar_w + 6.0,
        bar_y + bar_h + 4.0,
        rate_text(Some(domain.low))
    )
}
