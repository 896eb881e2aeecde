// ============================================================
// BAR CHART RENDERING
// ============================================================
// Vertical bar charts written as standalone SVG documents

use std::path::Path;

use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;

use crate::domain::error::{AppError, Result};

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 700.0;
const MARGIN_LEFT: f64 = 120.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 210.0;
const TARGET_TICKS: f64 = 6.0;
const BAR_FILL: &str = "#1f77b4";

/// One chart: a category axis and the summed value per category.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, f64)>,
}

impl BarChart {
    /// File name derived from the title: `Gross Revenue by Company` ->
    /// `gross_revenue_by_company.svg`.
    pub fn file_name(&self) -> String {
        format!("{}.svg", self.title.to_lowercase().replace(' ', "_"))
    }
}

pub fn write_svg(chart: &BarChart, path: &Path) -> Result<()> {
    svg::save(path, &render(chart)).map_err(|e| {
        AppError::WriteError(format!("Failed to write chart {}: {}", path.display(), e))
    })
}

pub fn render(chart: &BarChart) -> Document {
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let plot_bottom = MARGIN_TOP + plot_height;

    let ticks = value_ticks(chart.bars.iter().map(|(_, value)| *value));
    let (axis_low, axis_high) = match (ticks.first(), ticks.last()) {
        (Some(low), Some(high)) if high > low => (*low, *high),
        _ => (0.0, 1.0),
    };
    let y_of = |value: f64| MARGIN_TOP + (axis_high - value) / (axis_high - axis_low) * plot_height;

    let mut grid = Group::new()
        .set("stroke", "#b0b0b0")
        .set("stroke-dasharray", "6 4")
        .set("opacity", 0.7);
    let mut tick_labels = Group::new()
        .set("font-size", 12)
        .set("text-anchor", "end");
    for tick in &ticks {
        let y = y_of(*tick);
        grid = grid.add(
            Line::new()
                .set("x1", MARGIN_LEFT)
                .set("x2", MARGIN_LEFT + plot_width)
                .set("y1", y)
                .set("y2", y),
        );
        tick_labels = tick_labels.add(
            Text::new(tick_label(*tick))
                .set("x", MARGIN_LEFT - 8.0)
                .set("y", y + 4.0),
        );
    }

    let band = if chart.bars.is_empty() {
        plot_width
    } else {
        plot_width / chart.bars.len() as f64
    };
    let zero_y = y_of(0.0);

    let mut bars = Group::new()
        .set("fill", BAR_FILL)
        .set("stroke", "black")
        .set("stroke-width", 1);
    let mut categories = Group::new()
        .set("font-size", 12)
        .set("text-anchor", "end");
    for (index, (category, value)) in chart.bars.iter().enumerate() {
        let x = MARGIN_LEFT + band * index as f64;
        let top = y_of(value.max(0.0));
        let bottom = y_of(value.min(0.0));
        bars = bars.add(
            Rectangle::new()
                .set("x", x + band * 0.1)
                .set("y", top)
                .set("width", band * 0.8)
                .set("height", (bottom - top).max(0.0)),
        );

        let label_x = x + band / 2.0;
        let label_y = plot_bottom + 16.0;
        categories = categories.add(
            Text::new(category.as_str())
                .set("x", label_x)
                .set("y", label_y)
                .set("transform", format!("rotate(-45 {} {})", label_x, label_y)),
        );
    }

    let axes = Group::new()
        .set("stroke", "black")
        .add(
            Line::new()
                .set("x1", MARGIN_LEFT)
                .set("x2", MARGIN_LEFT)
                .set("y1", MARGIN_TOP)
                .set("y2", plot_bottom),
        )
        .add(
            Line::new()
                .set("x1", MARGIN_LEFT)
                .set("x2", MARGIN_LEFT + plot_width)
                .set("y1", zero_y)
                .set("y2", zero_y),
        );

    let title = Text::new(chart.title.as_str())
        .set("x", WIDTH / 2.0)
        .set("y", MARGIN_TOP / 2.0 + 8.0)
        .set("font-size", 22)
        .set("text-anchor", "middle");
    let x_label = Text::new(chart.x_label.as_str())
        .set("x", MARGIN_LEFT + plot_width / 2.0)
        .set("y", HEIGHT - 16.0)
        .set("font-size", 16)
        .set("text-anchor", "middle");
    let y_label_x = 28.0;
    let y_label_y = MARGIN_TOP + plot_height / 2.0;
    let y_label = Text::new(chart.y_label.as_str())
        .set("x", y_label_x)
        .set("y", y_label_y)
        .set("font-size", 16)
        .set("text-anchor", "middle")
        .set("transform", format!("rotate(-90 {} {})", y_label_x, y_label_y));

    Document::new()
        .set("xmlns", "http://www.w3.org/2000/svg")
        .set("width", WIDTH)
        .set("height", HEIGHT)
        .set("viewBox", (0, 0, WIDTH as i32, HEIGHT as i32))
        .set("font-family", "sans-serif")
        .add(Rectangle::new().set("width", "100%").set("height", "100%").set("fill", "white"))
        .add(grid)
        .add(bars)
        .add(axes)
        .add(tick_labels)
        .add(categories)
        .add(title)
        .add(x_label)
        .add(y_label)
}

/// Evenly spaced ticks at a 1/2/2.5/5 x 10^n step covering the values and
/// zero.
fn value_ticks(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let (mut low, mut high) = (0.0f64, 0.0f64);
    for value in values.filter(|value| value.is_finite()) {
        low = low.min(value);
        high = high.max(value);
    }
    if high == low {
        high = low + 1.0;
    }

    let step = nice_step((high - low) / TARGET_TICKS);
    let first = (low / step).floor() as i64;
    let last = (high / step).ceil() as i64;
    (first..=last).map(|index| index as f64 * step).collect()
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 2.5 {
        2.5
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

fn tick_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BarChart {
        BarChart {
            title: "Gross Revenue by Company".to_string(),
            x_label: "Company".to_string(),
            y_label: "Gross Revenue".to_string(),
            bars: vec![("Acme Corp".to_string(), 1500.0), ("Beta".to_string(), -250.0)],
        }
    }

    #[test]
    fn test_file_name_from_title() {
        assert_eq!(sample().file_name(), "gross_revenue_by_company.svg");
    }

    #[test]
    fn test_ticks_cover_negative_and_positive() {
        let ticks = value_ticks([1500.0, -250.0].into_iter());
        assert_eq!(ticks.first().copied(), Some(-500.0));
        assert_eq!(ticks.last().copied(), Some(1500.0));
        assert!(ticks.contains(&0.0));
    }

    #[test]
    fn test_ticks_for_flat_series() {
        let ticks = value_ticks([0.0, 0.0].into_iter());
        assert_eq!(ticks.first().copied(), Some(0.0));
        assert_eq!(ticks.last().copied(), Some(1.0));
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(0.7), 1.0);
        assert_eq!(nice_step(291.0), 500.0);
        assert_eq!(nice_step(1.8), 2.0);
        assert_eq!(nice_step(22.0), 25.0);
    }

    #[test]
    fn test_tick_label() {
        assert_eq!(tick_label(1500.0), "1500");
        assert_eq!(tick_label(0.25), "0.25");
        assert_eq!(tick_label(2.5), "2.5");
    }

    #[test]
    fn test_written_chart_contains_labels() {
        let dir = tempfile::tempdir().unwrap();
        let chart = sample();
        let path = dir.path().join(chart.file_name());

        write_svg(&chart, &path).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("<svg"));
        assert!(body.contains("Gross Revenue by Company"));
        assert!(body.contains("Acme Corp"));
        assert_eq!(body.matches("<rect").count(), 3);
    }
}
