use std::cmp::Ordering;

use super::aggregate::{ProviderCodeAverage, ProviderTotal};

/// Providers shown in the headline table.
pub const TOP_PROVIDERS: usize = 10;

/// Codes shown for a partner until the user moves the slider.
pub const DEFAULT_CODE_COUNT: usize = 10;

/// Descending, with missing values last.
fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The `k` providers with the largest invoice totals.
/// Ties keep their input order.
pub fn top_providers(totals: &[ProviderTotal], k: usize) -> Vec<ProviderTotal> {
    let mut ranked = totals.to_vec();
    ranked.sort_by(|a, b| descending(Some(a.invoice), Some(b.invoice)));
    ranked.truncate(k);
    ranked
}

/// A partner's code rows, largest average invoice first.
pub fn partner_codes<'a>(averages: &'a [ProviderCodeAverage], partner: &str) -> Vec<&'a ProviderCodeAverage> {
    let mut rows: Vec<_> = averages.iter().filter(|a| a.partner == partner).collect();
    rows.sort_by(|a, b| descending(a.invoice, b.invoice));
    rows
}

/// Resolve a requested row count against `available` rows:
/// `None` means the default, anything else is clamped to `1..=available`.
pub fn code_count(requested: Option<usize>, available: usize) -> usize {
    requested
        .unwrap_or(DEFAULT_CODE_COUNT)
        .clamp(1, available.max(1))
        .min(available)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(partner: &str, invoice: f64) -> ProviderTotal {
        ProviderTotal {
            partner: partner.into(),
            invoice,
            repaid: 0.0,
            repaid_percentage: 0.0,
        }
    }

    fn avg(partner: &str, code: &str, invoice: Option<f64>) -> ProviderCodeAverage {
        ProviderCodeAverage {
            partner: partner.into(),
            cpt_code: code.into(),
            description: None,
            invoice,
            repaid: None,
            medicare: None,
            medicaid: None,
        }
    }

    #[test]
    fn top_providers_sorted_and_bounded() {
        let totals: Vec<_> = (0..15).map(|i| total(&format!("P{i:02}"), (i % 7) as f64)).collect();
        let top = top_providers(&totals, TOP_PROVIDERS);
        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].invoice >= w[1].invoice));

        let few = top_providers(&totals[..3], TOP_PROVIDERS);
        assert_eq!(few.len(), 3);
    }

    #[test]
    fn ties_keep_input_order() {
        let totals = vec![total("A", 5.0), total("B", 9.0), total("C", 5.0)];
        let names: Vec<_> = top_providers(&totals, 10).into_iter().map(|t| t.partner).collect();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[test]
    fn partner_codes_filters_and_sorts() {
        let averages = vec![
            avg("A", "1", Some(10.0)),
            avg("A", "2", None),
            avg("B", "3", Some(99.0)),
            avg("A", "4", Some(30.0)),
        ];
        let codes: Vec<_> = partner_codes(&averages, "A")
            .into_iter()
            .map(|a| a.cpt_code.as_str())
            .collect();
        assert_eq!(codes, ["4", "1", "2"]);
        assert!(partner_codes(&averages, "Z").is_empty());
    }

    #[test]
    fn code_count_defaults_and_clamps() {
        assert_eq!(code_count(None, 25), 10);
        assert_eq!(code_count(None, 4), 4);
        assert_eq!(code_count(Some(0), 4), 1);
        assert_eq!(code_count(Some(12), 4), 4);
        assert_eq!(code_count(Some(3), 4), 3);
        assert_eq!(code_count(None, 0), 0);
    }
}
