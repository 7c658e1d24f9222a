use eframe::egui::{Align2, Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, Points, Text};

use cpt_dashboard::data::aggregate::ProviderCodeAverage;
use cpt_dashboard::DashboardView;

use super::format::{currency_whole, percent};
use crate::color::{generate_palette, translucent};

const BAR_WIDTH: f64 = 0.2;
const PLOT_HEIGHT: f32 = 320.0;

/// Tick label for integer positions, blank elsewhere.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Grouped bars: four averages per CPT code
// ---------------------------------------------------------------------------

/// Average Invoice / Repaid / Medicare / Medicaid per displayed code.
pub fn code_averages(ui: &mut Ui, view: &DashboardView) {
    let colors = generate_palette(4);
    let series: [(&str, fn(&ProviderCodeAverage) -> Option<f64>); 4] = [
        ("Invoice", |c| c.invoice),
        ("Repaid", |c| c.repaid),
        ("Medicare", |c| c.medicare),
        ("Medicaid", |c| c.medicaid),
    ];
    let labels: Vec<String> = view.codes.iter().map(|c| c.cpt_code.clone()).collect();

    Plot::new("code_averages_plot")
        .height(PLOT_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .legend(Legend::default())
        .y_axis_label("Average Amount ($)")
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            for (s, ((name, pick), color)) in series.iter().zip(&colors).enumerate() {
                let offset = (s as f64 - 1.5) * BAR_WIDTH;
                let bars: Vec<Bar> = view
                    .codes
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        Bar::new(i as f64 + offset, pick(c).unwrap_or(0.0))
                            .width(BAR_WIDTH)
                            .name(&c.cpt_code)
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(*name)
                        .color(translucent(*color, 0.8)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Averages with recovery percentages
// ---------------------------------------------------------------------------

/// Mean amounts across the displayed codes, next to the recovery percentages.
pub fn recovery(ui: &mut Ui, view: &DashboardView) {
    let r = &view.recovery;
    let labels = vec![
        "Invoice".to_string(),
        "Repaid".to_string(),
        "Avg(Invoice, Medicare, Medicaid)".to_string(),
    ];
    let amounts = [r.invoice, r.repaid, r.combined].map(|v| v.unwrap_or(0.0));
    let colors = generate_palette(3);
    let title = format!("Average Amounts and Recovery Percentages - {}", view.partner);

    ui.label(title);
    ui.columns(2, |cols| {
        Plot::new("recovery_amounts_plot")
            .height(PLOT_HEIGHT)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .y_axis_label("Average Amount ($)")
            .x_axis_formatter(category_formatter(labels.clone()))
            .show(&mut cols[0], |plot_ui| {
                for (i, (amount, color)) in amounts.iter().zip(&colors).enumerate() {
                    let bar = Bar::new(i as f64, *amount).width(0.4).name(&labels[i]);
                    plot_ui.bar_chart(BarChart::new(vec![bar]).color(translucent(*color, 0.6)));
                    plot_ui.text(
                        Text::new(PlotPoint::new(i as f64, *amount), currency_whole(*amount))
                            .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            });

        Plot::new("recovery_pct_plot")
            .height(PLOT_HEIGHT)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .y_axis_label("Percentage of Invoice (%)")
            .include_x(-0.5)
            .include_x(2.5)
            .include_y(0.0)
            .x_axis_formatter(category_formatter(labels.clone()))
            .show(&mut cols[1], |plot_ui| {
                for (x, pct, name, color) in [
                    (1.0, r.repaid_pct, "Repaid %", Color32::RED),
                    (2.0, r.combined_pct, "Combined %", Color32::GREEN),
                ] {
                    plot_ui.points(
                        Points::new(vec![[x, pct]])
                            .radius(7.0)
                            .color(color)
                            .name(name),
                    );
                    plot_ui.text(
                        Text::new(PlotPoint::new(x, pct), percent(pct))
                            .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            });
    });
}
