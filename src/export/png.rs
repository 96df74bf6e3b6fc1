use std::io::Cursor;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::register_font;

use crate::analysis::histogram::Histogram;

/// Raster size of the exported chart, in pixels.
pub const CHART_SIZE: (u32, u32) = (800, 500);

const BAR_COLOR: RGBColor = RGBColor(99, 110, 250);

/// Family name every text element of the chart is drawn with.
const FONT: &str = "sans-serif";

/// Register the font egui already bundles, once per process.
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED.get_or_init(|| {
        register_font(FONT, FontStyle::Normal, epaint_default_fonts::UBUNTU_LIGHT).is_ok()
    });
    anyhow::ensure!(ok, "the bundled chart font could not be loaded");
    Ok(())
}

/// Draw the histogram into an RGB buffer and encode it as PNG.
///
/// The chart has a caption, tick labels on both axes and axis titles
/// (the column name and `count`).
pub fn render_histogram(histogram: &Histogram) -> Result<Vec<u8>> {
    ensure_font()?;

    let (width, height) = CHART_SIZE;
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    let x_lo = histogram.bins.first().map(|b| b.lower).unwrap_or(0.0);
    let x_hi = histogram.bins.last().map(|b| b.upper).unwrap_or(1.0);
    let y_hi = histogram.max_count().max(1) as f64 * 1.05;

    {
        let root = BitMapBackend::with_buffer(&mut buffer, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Histogram of {}", histogram.column), (FONT, 24))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(histogram.column.as_str())
            .y_desc("count")
            .y_label_formatter(&|v| format!("{v:.0}"))
            .label_style((FONT, 14))
            .axis_desc_style((FONT, 16))
            .draw()?;

        chart.draw_series(histogram.bins.iter().map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], BAR_COLOR.filled())
        }))?;
        chart.draw_series(histogram.bins.iter().map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], WHITE.stroke_width(1))
        }))?;

        root.present()?;
    }

    let image = image::RgbImage::from_raw(width, height, buffer)
        .context("chart buffer does not match the raster size")?;
    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, image::ImageFormat::Png)
        .context("encoding chart as PNG")?;
    Ok(png.into_inner())
}
