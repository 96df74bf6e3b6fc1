use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::analysis::anova::AnovaResult;
use crate::analysis::histogram::Histogram;
use crate::color::GroupColors;

const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Histogram (Visualization view)
// ---------------------------------------------------------------------------

pub fn histogram_plot(ui: &mut Ui, histogram: &Histogram) {
    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!("[{:.3}, {:.3}]", b.lower, b.upper))
        })
        .collect();

    let chart = BarChart::new(bars)
        .name(&histogram.column)
        .color(HISTOGRAM_COLOR);

    Plot::new("histogram_plot")
        .legend(Legend::default())
        .x_axis_label(&histogram.column)
        .y_axis_label("count")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

// ---------------------------------------------------------------------------
// Group means (ANOVA view)
// ---------------------------------------------------------------------------

/// One coloured bar per group at its pooled mean.
pub fn group_means_plot(ui: &mut Ui, result: &AnovaResult) {
    let colors = GroupColors::new(result.groups.iter().map(|g| g.label.as_str()));

    Plot::new("group_means_plot")
        .legend(Legend::default())
        .x_axis_label(&result.group_column)
        .y_axis_label("mean")
        .show_x(false)
        .show(ui, |plot_ui| {
            for (i, group) in result.groups.iter().enumerate() {
                let color = colors.color_for(&group.label);
                let bar = Bar::new(i as f64, group.mean)
                    .width(0.7)
                    .name(format!("n = {}", group.n))
                    .fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(&group.label).color(color));
            }
        });
}
