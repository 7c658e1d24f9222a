use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use cpt_dashboard::DashboardView;

use super::format::{currency, multiple, optional_currency, percent};
use super::plot;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Central panel – the report page
// ---------------------------------------------------------------------------

/// Render the whole report, or the reason it cannot be rendered.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("CPT Code Financial Dashboard by Partner");
            ui.add_space(8.0);

            match &state.view {
                None => {
                    ui.label("No claims data loaded  (File → Open…)");
                }
                Some(Err(e)) => {
                    ui.colored_label(Color32::RED, format!("Error processing data: {e}"));
                    ui.label("Please make sure the data contains the required columns.");
                }
                Some(Ok(view)) => report(ui, view),
            }
        });
}

fn report(ui: &mut Ui, view: &DashboardView) {
    ui.heading("Top 10 Providers by Total Invoice Amount");
    let rows: Vec<Vec<String>> = view
        .top_providers
        .iter()
        .map(|t| {
            vec![
                t.partner.clone(),
                currency(t.invoice),
                currency(t.repaid),
                percent(t.repaid_percentage),
            ]
        })
        .collect();
    data_table(
        ui,
        "top_providers",
        &["Provider", "Total Invoice", "Total Repaid", "Repaid %"],
        &rows,
    );
    ui.separator();

    ui.heading(format!(
        "Top {} CPT Metrics for {} (by Invoice Amount)",
        view.codes.len(),
        view.partner
    ));
    let rows: Vec<Vec<String>> = view
        .codes
        .iter()
        .map(|c| {
            vec![
                c.cpt_code.clone(),
                c.description.clone().unwrap_or_default(),
                optional_currency(c.invoice),
                optional_currency(c.repaid),
                optional_currency(c.medicare),
                optional_currency(c.medicaid),
            ]
        })
        .collect();
    data_table(
        ui,
        "partner_codes",
        &["CPT Code", "Description", "Invoice", "Repaid", "Medicare", "Medicaid"],
        &rows,
    );
    ui.add_space(12.0);

    ui.heading("Financial Averages by CPT Code");
    plot::code_averages(ui, view);
    ui.add_space(12.0);

    ui.heading("Average Amounts and Recovery Percentages");
    plot::recovery(ui, view);
    ui.add_space(12.0);

    summary_cards(ui, view);
    ui.separator();
    moic_cards(ui, view);
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn data_table(ui: &mut Ui, id: &str, headers: &[&str], rows: &[Vec<String>]) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(90.0).resizable(true), headers.len())
            .header(ROW_HEIGHT, |mut header| {
                for h in headers {
                    header.col(|ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let cells = &rows[row.index()];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn metric(ui: &mut Ui, label: &str, value: String, detail: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(22.0).strong());
        if !detail.is_empty() {
            ui.label(RichText::new(detail).small().color(Color32::from_rgb(40, 160, 80)));
        }
    });
}

fn summary_cards(ui: &mut Ui, view: &DashboardView) {
    let s = &view.summary;
    ui.heading("Summary Statistics");
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Total Invoice Amount", currency(s.invoice), String::new());
        metric(
            &mut cols[1],
            "Total Repaid Amount",
            currency(s.repaid),
            format!("{} of Invoice", percent(s.repaid_pct())),
        );
        metric(
            &mut cols[2],
            "Total Medicare",
            currency(s.medicare),
            format!("{} of Invoice", percent(s.medicare_pct())),
        );
        metric(
            &mut cols[3],
            "Total Medicaid",
            currency(s.medicaid),
            format!("{} of Invoice", percent(s.medicaid_pct())),
        );
    });
}

fn moic_cards(ui: &mut Ui, view: &DashboardView) {
    let m = &view.moic;
    ui.heading("MOIC Analysis");
    ui.columns(3, |cols| {
        metric(
            &mut cols[0],
            "Amount Advanced",
            currency(m.amount_advanced),
            format!("{}% of Invoice", m.advance_pct),
        );
        metric(
            &mut cols[1],
            "Current MOIC",
            multiple(m.current_moic),
            format!("Based on {} repaid", currency(view.summary.repaid)),
        );
        metric(
            &mut cols[2],
            "Estimated MOIC",
            multiple(m.estimated_moic),
            format!("Based on {} potential", currency(m.potential_recovery)),
        );
    });

    ui.add_space(8.0);
    egui::Frame::group(ui.style())
        .fill(ui.visuals().faint_bg_color)
        .show(ui, |ui: &mut Ui| {
            ui.strong("MOIC Calculation:");
            ui.label("• Amount Advanced = Total Invoice × Advance %");
            ui.label("• Current MOIC = Total Repaid ÷ Amount Advanced");
            ui.label("• Estimated MOIC = Average(Invoice + Medicare + Medicaid) ÷ Amount Advanced");
        });
}
