//! Headless chart rendering.
//!
//! Charts are drawn with the plotters SVG backend, rasterized to PNG with
//! resvg and handed back base64-encoded so they can be embedded in JSON
//! payloads as `data:image/png;base64,...`.

use std::sync::{Arc, OnceLock};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use plotters::prelude::*;
use resvg::{tiny_skia, usvg};

/// MIME type of every chart produced by this module.
pub const CHART_FORMAT: &str = "image/png";

const FONT: &str = "sans-serif";

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

fn palette(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

fn fonts() -> Arc<usvg::fontdb::Database> {
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "Loaded chart fonts");
            Arc::new(db)
        })
        .clone()
}

/// Rasterizes an SVG document to PNG bytes. Text without a matching system
/// font is skipped rather than failing the render.
fn rasterize(svg: &str) -> anyhow::Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb = fonts();

    let tree = usvg::Tree::from_str(svg, &options)?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("invalid chart size {}x{}", size.width(), size.height()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(pixmap.encode_png()?)
}

fn encode(svg: &str) -> anyhow::Result<String> {
    Ok(STANDARD.encode(rasterize(svg)?))
}

fn date_labels(dates: &[NaiveDate]) -> Vec<String> {
    dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect()
}

/// Maps an x position back to the label of the bucket it is centered on.
fn bucket_label(labels: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Pie chart of label → count with percentage labels.
pub fn pie_chart(title: &str, slices: &[(String, u64)]) -> anyhow::Result<String> {
    encode(&pie_svg(title, slices)?)
}

fn pie_svg(title: &str, slices: &[(String, u64)]) -> anyhow::Result<String> {
    anyhow::ensure!(!slices.is_empty(), "pie chart needs at least one slice");

    let sizes: Vec<f64> = slices.iter().map(|(_, count)| *count as f64).collect();
    let labels: Vec<&str> = slices.iter().map(|(label, _)| label.as_str()).collect();
    let colors: Vec<RGBColor> = (0..slices.len()).map(palette).collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (800, 640)).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled(title, (FONT, 24))?;

        let (width, height) = area.dim_in_pixel();
        let center = ((width / 2) as i32, (height / 2) as i32);
        let radius = f64::from(width.min(height)) * 0.35;

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style((FONT, 16).into_font());
        pie.percentages((FONT, 14).into_font().color(&WHITE));
        area.draw(&pie)?;

        root.present()?;
    }

    Ok(svg)
}

/// Line chart of daily counts.
pub fn line_chart(title: &str, points: &[(NaiveDate, u64)]) -> anyhow::Result<String> {
    encode(&line_svg(title, points)?)
}

fn line_svg(title: &str, points: &[(NaiveDate, u64)]) -> anyhow::Result<String> {
    anyhow::ensure!(!points.is_empty(), "line chart needs at least one point");

    let dates: Vec<NaiveDate> = points.iter().map(|(date, _)| *date).collect();
    let labels = date_labels(&dates);
    let max_count = points.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let buckets = points.len() as f64;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (960, 480)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..(buckets - 0.5), 0f64..(max_count as f64 * 1.1 + 1.0))?;

        let x_formatter = |x: &f64| bucket_label(&labels, *x);
        let y_formatter = |y: &f64| format!("{y:.0}");
        chart
            .configure_mesh()
            .x_labels(points.len() + 1)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .x_desc("Date")
            .y_desc("Number of Reports")
            .draw()?;

        let color = palette(0);
        let series = points
            .iter()
            .enumerate()
            .map(|(i, (_, count))| (i as f64, *count as f64));

        chart.draw_series(LineSeries::new(series.clone(), color.stroke_width(2)))?;
        chart.draw_series(series.map(|point| Circle::new(point, 4, color.filled())))?;

        root.present()?;
    }

    Ok(svg)
}

/// Per-day counts split by category, one row per category aligned with `dates`.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedSeries {
    pub dates: Vec<NaiveDate>,
    pub categories: Vec<(String, Vec<u64>)>,
}

impl StackedSeries {
    pub fn day_total(&self, day: usize) -> u64 {
        self.categories.iter().map(|(_, counts)| counts[day]).sum()
    }
}

/// Stacked bar chart, one bar per date and one stacked segment per category.
pub fn stacked_bar_chart(title: &str, data: &StackedSeries) -> anyhow::Result<String> {
    encode(&stacked_bar_svg(title, data)?)
}

fn stacked_bar_svg(title: &str, data: &StackedSeries) -> anyhow::Result<String> {
    anyhow::ensure!(!data.dates.is_empty(), "bar chart needs at least one date");

    let labels = date_labels(&data.dates);
    let max_total = (0..data.dates.len())
        .map(|day| data.day_total(day))
        .max()
        .unwrap_or(0);
    let buckets = data.dates.len() as f64;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (1120, 640)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..(buckets - 0.5), 0f64..(max_total as f64 * 1.1 + 1.0))?;

        let x_formatter = |x: &f64| bucket_label(&labels, *x);
        let y_formatter = |y: &f64| format!("{y:.0}");
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(data.dates.len() + 1)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .x_desc("Date")
            .y_desc("Number of Reports")
            .draw()?;

        let mut base = vec![0f64; data.dates.len()];
        for (index, (category, counts)) in data.categories.iter().enumerate() {
            let color = palette(index);
            let bars: Vec<Rectangle<(f64, f64)>> = counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(day, count)| {
                    let x = day as f64;
                    let bottom = base[day];
                    let top = bottom + *count as f64;
                    Rectangle::new([(x - 0.4, bottom), (x + 0.4, top)], color.filled())
                })
                .collect();

            for (day, count) in counts.iter().enumerate() {
                base[day] += *count as f64;
            }

            chart
                .draw_series(bars)?
                .label(category.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn decode(chart: &str) -> Vec<u8> {
        STANDARD.decode(chart).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn pie_chart_draws_title_and_encodes_png() {
        let slices = [("harassment".to_string(), 3), ("safety".to_string(), 1)];
        let svg = pie_svg("Distribution of Incident Reports by Category", &slices).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Distribution of Incident Reports by Category"));

        let png = decode(&pie_chart("Distribution of Incident Reports by Category", &slices).unwrap());
        assert!(png.starts_with(PNG_MAGIC));
    }

    #[test]
    fn pie_chart_rejects_empty_input() {
        assert!(pie_chart("empty", &[]).is_err());
    }

    #[test]
    fn line_chart_renders_single_point() {
        let svg = line_svg("Daily Report Trends (Last 30 days)", &[(day(1), 2)]).unwrap();
        assert!(svg.contains("Number of Reports"));

        let png = decode(&line_chart("Daily Report Trends (Last 30 days)", &[(day(1), 2)]).unwrap());
        assert!(png.starts_with(PNG_MAGIC));
    }

    #[test]
    fn stacked_bar_chart_renders_legend() {
        let data = StackedSeries {
            dates: vec![day(1), day(2)],
            categories: vec![
                ("harassment".into(), vec![1, 0]),
                ("safety".into(), vec![2, 3]),
            ],
        };
        assert_eq!(data.day_total(0), 3);
        assert_eq!(data.day_total(1), 3);

        let svg = stacked_bar_svg("Report Categories by Day (Last 7 days)", &data).unwrap();
        assert!(svg.contains("harassment"));
        assert!(svg.contains("safety"));

        let png = decode(&stacked_bar_chart("Report Categories by Day (Last 7 days)", &data).unwrap());
        assert!(png.starts_with(PNG_MAGIC));
    }

    #[test]
    fn rasterized_size_matches_canvas() {
        let png = rasterize(&line_svg("t", &[(day(1), 1)]).unwrap()).unwrap();
        // IHDR width and height, big-endian
        assert_eq!(u32::from_be_bytes(png[16..20].try_into().unwrap()), 960);
        assert_eq!(u32::from_be_bytes(png[20..24].try_into().unwrap()), 480);
    }

    #[test]
    fn bucket_labels_only_on_whole_positions() {
        let labels = vec!["2024-05-01".to_string(), "2024-05-02".to_string()];
        assert_eq!(bucket_label(&labels, 1.0), "2024-05-02");
        assert_eq!(bucket_label(&labels, 0.5), "");
        assert_eq!(bucket_label(&labels, -1.0), "");
        assert_eq!(bucket_label(&labels, 5.0), "");
    }
}
