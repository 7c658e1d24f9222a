use anyhow::Result;

use cpt_dashboard::data::aggregate::{provider_code_averages, provider_totals};
use cpt_dashboard::data::filter::{claims, load_records, valid_records};
use cpt_dashboard::data::loader::load_embedded;
use cpt_dashboard::data::rank::{top_providers, TOP_PROVIDERS};
use cpt_dashboard::{ColumnMapping, DashboardView, Selection};

#[test]
fn totals_equal_sums_over_valid_records() -> Result<()> {
    let table = load_embedded()?;
    let mapping = ColumnMapping::default();
    let all = claims(&table, &mapping)?;
    let records = load_records(&table, &mapping)?;

    assert!(records.len() < all.len(), "embedded data has rows to filter");
    for t in provider_totals(&records) {
        let expected: f64 = all
            .iter()
            .filter(|c| c.partner.as_deref() == Some(t.partner.as_str()) && c.cpt_code.is_some())
            .filter(|c| c.medicare.unwrap_or(0.0) > 0.0 || c.medicaid.unwrap_or(0.0) > 0.0)
            .filter_map(|c| c.invoice)
            .sum();
        assert!(
            (t.invoice - expected).abs() < 1e-6,
            "{}: {} != {expected}",
            t.partner,
            t.invoice
        );
    }
    Ok(())
}

#[test]
fn filter_is_idempotent_on_embedded_data() -> Result<()> {
    let table = load_embedded()?;
    let records = load_records(&table, &ColumnMapping::default())?;
    let again = valid_records(records.iter().cloned().map(Into::into).collect());
    assert_eq!(records, again);
    Ok(())
}

#[test]
fn top_providers_are_bounded_and_descending() -> Result<()> {
    let table = load_embedded()?;
    let records = load_records(&table, &ColumnMapping::default())?;
    let totals = provider_totals(&records);
    let top = top_providers(&totals, TOP_PROVIDERS);

    assert!(top.len() <= TOP_PROVIDERS);
    assert!(top.len() <= totals.len());
    assert!(top.windows(2).all(|w| w[0].invoice >= w[1].invoice));
    Ok(())
}

#[test]
fn every_partner_renders() -> Result<()> {
    let table = load_embedded()?;
    let mapping = ColumnMapping::default();
    let first = DashboardView::build(&table, &mapping, &Selection::default())?;
    let averages = provider_code_averages(&load_records(&table, &mapping)?);

    for partner in &first.partners {
        let selection = Selection {
            partner: Some(partner.clone()),
            ..Selection::default()
        };
        let view = DashboardView::build(&table, &mapping, &selection)?;
        assert_eq!(&view.partner, partner);
        assert!(!view.codes.is_empty());
        assert_eq!(
            view.total_codes,
            averages.iter().filter(|a| &a.partner == partner).count()
        );
        assert_eq!(view.codes.len(), view.total_codes.min(10));
        assert!(view
            .codes
            .windows(2)
            .all(|w| w[0].invoice.unwrap_or(f64::MIN) >= w[1].invoice.unwrap_or(f64::MIN)));
        assert!(view.moic.current_moic.is_finite());
    }
    Ok(())
}

#[test]
fn zero_advance_gives_zero_moic() -> Result<()> {
    let table = load_embedded()?;
    let selection = Selection {
        advance_pct: 0,
        ..Selection::default()
    };
    let view = DashboardView::build(&table, &ColumnMapping::default(), &selection)?;
    assert_eq!(view.moic.amount_advanced, 0.0);
    assert_eq!(view.moic.current_moic, 0.0);
    assert_eq!(view.moic.estimated_moic, 0.0);
    Ok(())
}
