use eframe::egui::{Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot};

use segment_lens::analysis::report::{ChartData, SegmentMetrics, SegmentReport};
use segment_lens::data::model::Gender;

use crate::color::Palettes;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render metrics, charts and insights for the current segment.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to start  (File → Open…)");
        });
        return;
    };

    metric_tiles(ui, report.metrics());
    ui.separator();

    let SegmentReport::Populated { charts, insights, .. } = report else {
        ui.label(
            RichText::new("⚠ No customers match the current filters.")
                .color(Color32::RED)
                .strong(),
        );
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            age_histogram(ui, charts);
            age_by_marital_status(ui, charts, &state.palettes);
            spend_by_bracket(ui, charts, &state.palettes);
            population_pyramid(ui, charts, &state.palettes);
            gender_distribution(ui, charts, &state.palettes);

            ui.add_space(8.0);
            ui.heading("📌 Segment insights");
            for line in insights.lines() {
                ui.label(format!("• {line}"));
            }
        });
}

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

fn metric_tiles(ui: &mut Ui, metrics: &SegmentMetrics) {
    ui.columns(4, |cols: &mut [Ui]| {
        tile(&mut cols[0], "👤 Segmented customers", &metrics.count_label(), Some(metrics.share_label()));
        tile(&mut cols[1], "💰 Average spend", &metrics.spend_label(), None);
        tile(&mut cols[2], "🎂 Average age", &metrics.age_label(), None);
        tile(&mut cols[3], "⚧ Dominant gender", &metrics.gender_label(), metrics.gender_count_label());
    });
}

fn tile(ui: &mut Ui, title: &str, value: &str, delta: Option<String>) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(title).weak());
        ui.label(RichText::new(value).size(24.0).strong());
        if let Some(delta) = delta {
            ui.label(RichText::new(delta).color(Color32::from_rgb(80, 170, 90)));
        }
    });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn age_histogram(ui: &mut Ui, charts: &ChartData) {
    ui.heading("📊 Age distribution");
    let bars: Vec<Bar> = charts
        .age_histogram
        .iter()
        .map(|bin| {
            Bar::new((bin.low + bin.high) / 2.0, bin.count as f64)
                .width(bin.high - bin.low)
                .name(format!("{:.0}–{:.0}", bin.low, bin.high))
        })
        .collect();

    Plot::new("age_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Age")
        .y_axis_label("Customers")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE).name("Customers"));
        });
}

fn age_by_marital_status(ui: &mut Ui, charts: &ChartData, palettes: &Palettes) {
    ui.heading("🎂 Age by marital status");
    let boxes: Vec<BoxElem> = charts
        .age_by_marital_status
        .iter()
        .enumerate()
        .map(|(i, (status, s))| {
            let color = palettes.marital.color_for(status);
            BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                .name(status)
                .fill(color.linear_multiply(0.4))
                .stroke(Stroke::new(1.5, color))
                .box_width(0.6)
        })
        .collect();

    let labels: Vec<String> = charts.age_by_marital_status.keys().cloned().collect();
    Plot::new("age_by_marital_status")
        .height(CHART_HEIGHT)
        .y_axis_label("Age")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes).name("Age"));
        });

    TableBuilder::new(ui)
        .id_salt("age_by_marital_status_table")
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(110.0))
        .columns(Column::auto().at_least(60.0), 5)
        .header(20.0, |mut header| {
            for title in ["Status", "Min", "Q1", "Median", "Q3", "Max"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (status, s) in &charts.age_by_marital_status {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(status);
                    });
                    for v in [s.min, s.q1, s.median, s.q3, s.max] {
                        row.col(|ui: &mut Ui| {
                            ui.label(format!("{v:.1}"));
                        });
                    }
                });
            }
        });
}

fn spend_by_bracket(ui: &mut Ui, charts: &ChartData, palettes: &Palettes) {
    ui.heading("💵 Average spend by age bracket");
    let bars: Vec<Bar> = charts
        .mean_spend_by_age_bracket
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64, b.mean_total_spend)
                .width(0.7)
                .name(b.bracket.to_string())
                .fill(palettes.bracket.color_for(&b.bracket))
        })
        .collect();

    let labels: Vec<String> = charts
        .mean_spend_by_age_bracket
        .iter()
        .map(|b| b.bracket.to_string())
        .collect();
    Plot::new("spend_by_bracket")
        .height(CHART_HEIGHT)
        .y_axis_label("Average spend")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Average spend"));
        });
}

fn population_pyramid(ui: &mut Ui, charts: &ChartData, palettes: &Palettes) {
    ui.heading("👥 Population pyramid");
    // Men are drawn to the left of the axis.
    let men: Vec<Bar> = charts
        .population_pyramid
        .iter()
        .map(|(&age, row)| Bar::new(age as f64, -(row.hombre as f64)).width(0.9))
        .collect();
    let women: Vec<Bar> = charts
        .population_pyramid
        .iter()
        .map(|(&age, row)| Bar::new(age as f64, row.mujer as f64).width(0.9))
        .collect();

    Plot::new("population_pyramid")
        .height(CHART_HEIGHT * 1.5)
        .legend(Legend::default())
        .x_axis_label("Customers")
        .y_axis_label("Age")
        .x_axis_formatter(|mark, _range| format!("{}", mark.value.abs()))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(men)
                    .horizontal()
                    .color(palettes.gender.color_for(&Gender::Hombre))
                    .name("Hombres"),
            );
            plot_ui.bar_chart(
                BarChart::new(women)
                    .horizontal()
                    .color(palettes.gender.color_for(&Gender::Mujer))
                    .name("Mujeres"),
            );
        });
}

fn gender_distribution(ui: &mut Ui, charts: &ChartData, palettes: &Palettes) {
    ui.heading("⚧ Gender distribution");
    let total: usize = charts.gender_distribution.values().sum();

    ui.horizontal(|ui: &mut Ui| {
        for (gender, &n) in &charts.gender_distribution {
            let share = if total > 0 { n as f64 / total as f64 * 100.0 } else { 0.0 };
            ui.label(
                RichText::new(format!("{gender}: {n} ({share:.1}%)"))
                    .color(palettes.gender.color_for(gender)),
            );
        }
    });

    let bars: Vec<Bar> = charts
        .gender_distribution
        .iter()
        .enumerate()
        .map(|(i, (gender, &n))| {
            Bar::new(i as f64, n as f64)
                .width(0.6)
                .name(gender.to_string())
                .fill(palettes.gender.color_for(gender))
        })
        .collect();
    let labels: Vec<String> = charts.gender_distribution.keys().map(|g| g.to_string()).collect();

    Plot::new("gender_distribution")
        .height(CHART_HEIGHT * 0.75)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Customers"));
        });
}

/// Axis label for categorical charts drawn at integer positions.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_at_integers() {
        let labels = vec!["20-29".to_string(), "30-39".to_string()];
        assert_eq!(category_label(&labels, 1.0), "30-39");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 5.0), "");
    }
}
