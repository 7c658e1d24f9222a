use std::collections::BTreeMap;

use super::model::Record;

/// Round to `decimals` places, ties to even on the scaled value.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// `part / whole × 100`, or 0 when there is nothing to divide by.
fn share_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Provider totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTotal {
    pub partner: String,
    pub invoice: f64,
    pub repaid: f64,
    /// Repaid / Invoice × 100 to one decimal; 0 when Invoice ≤ 0.
    pub repaid_percentage: f64,
}

/// One row per partner, ordered by partner.
pub fn provider_totals(records: &[Record]) -> Vec<ProviderTotal> {
    let mut sums: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for r in records {
        let entry = sums.entry(r.partner.as_str()).or_default();
        entry.0 += r.invoice.unwrap_or(0.0);
        entry.1 += r.repaid.unwrap_or(0.0);
    }
    sums.into_iter()
        .map(|(partner, (invoice, repaid))| ProviderTotal {
            partner: partner.to_string(),
            invoice,
            repaid,
            repaid_percentage: round_to(share_of(repaid, invoice), 1),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Provider × CPT code averages
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, v: Option<f64>) {
        if let Some(v) = v {
            self.sum += v;
            self.count += 1;
        }
    }

    fn rounded(self) -> Option<f64> {
        (self.count > 0).then(|| round_to(self.sum / self.count as f64, 2))
    }
}

#[derive(Debug, Default)]
struct CodeAccumulator<'a> {
    description: Option<&'a str>,
    invoice: Mean,
    repaid: Mean,
    medicare: Mean,
    medicaid: Mean,
}

/// Per (partner, code) averages. `None` means no value was present.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCodeAverage {
    pub partner: String,
    pub cpt_code: String,
    pub description: Option<String>,
    pub invoice: Option<f64>,
    pub repaid: Option<f64>,
    pub medicare: Option<f64>,
    pub medicaid: Option<f64>,
}

/// One row per (partner, code), ordered by partner then code.
pub fn provider_code_averages(records: &[Record]) -> Vec<ProviderCodeAverage> {
    let mut groups: BTreeMap<(&str, &str), CodeAccumulator> = BTreeMap::new();
    for r in records {
        let acc = groups
            .entry((r.partner.as_str(), r.cpt_code.as_str()))
            .or_default();
        if acc.description.is_none() {
            acc.description = r.description.as_deref();
        }
        acc.invoice.push(r.invoice);
        acc.repaid.push(r.repaid);
        acc.medicare.push(r.medicare);
        acc.medicaid.push(r.medicaid);
    }
    groups
        .into_iter()
        .map(|((partner, cpt_code), acc)| ProviderCodeAverage {
            partner: partner.to_string(),
            cpt_code: cpt_code.to_string(),
            description: acc.description.map(str::to_string),
            invoice: acc.invoice.rounded(),
            repaid: acc.repaid.rounded(),
            medicare: acc.medicare.rounded(),
            medicaid: acc.medicaid.rounded(),
        })
        .collect()
}

/// Sorted distinct partners, for the provider selector.
pub fn partners(averages: &[ProviderCodeAverage]) -> Vec<String> {
    let mut out: Vec<String> = averages.iter().map(|a| a.partner.clone()).collect();
    out.dedup();
    out
}

// ---------------------------------------------------------------------------
// Partner summary
// ---------------------------------------------------------------------------

/// Sums over one partner's valid records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartnerSummary {
    pub invoice: f64,
    pub repaid: f64,
    pub medicare: f64,
    pub medicaid: f64,
}

impl PartnerSummary {
    pub fn for_partner(records: &[Record], partner: &str) -> Self {
        records
            .iter()
            .filter(|r| r.partner == partner)
            .fold(Self::default(), |acc, r| Self {
                invoice: acc.invoice + r.invoice.unwrap_or(0.0),
                repaid: acc.repaid + r.repaid.unwrap_or(0.0),
                medicare: acc.medicare + r.medicare.unwrap_or(0.0),
                medicaid: acc.medicaid + r.medicaid.unwrap_or(0.0),
            })
    }

    pub fn repaid_pct(&self) -> f64 {
        share_of(self.repaid, self.invoice)
    }

    pub fn medicare_pct(&self) -> f64 {
        share_of(self.medicare, self.invoice)
    }

    pub fn medicaid_pct(&self) -> f64 {
        share_of(self.medicaid, self.invoice)
    }
}

// ---------------------------------------------------------------------------
// Recovery averages over the displayed codes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryAverages {
    pub invoice: Option<f64>,
    pub repaid: Option<f64>,
    /// (mean Invoice + mean Medicare + mean Medicaid) / 3
    pub combined: Option<f64>,
    pub repaid_pct: f64,
    pub combined_pct: f64,
}

impl RecoveryAverages {
    pub fn from_rows(rows: &[ProviderCodeAverage]) -> Self {
        let mean = |pick: fn(&ProviderCodeAverage) -> Option<f64>| {
            let mut m = Mean::default();
            rows.iter().for_each(|r| m.push(pick(r)));
            (m.count > 0).then(|| m.sum / m.count as f64)
        };
        let invoice = mean(|r| r.invoice);
        let repaid = mean(|r| r.repaid);
        let combined = match (invoice, mean(|r| r.medicare), mean(|r| r.medicaid)) {
            (Some(i), Some(mc), Some(md)) => Some((i + mc + md) / 3.0),
            _ => None,
        };
        let pct = |v: Option<f64>| match (v, invoice) {
            (Some(v), Some(i)) => share_of(v, i),
            _ => 0.0,
        };
        Self {
            invoice,
            repaid,
            combined,
            repaid_pct: pct(repaid),
            combined_pct: pct(combined),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(partner: &str, code: &str, invoice: f64, repaid: f64, medicare: f64, medicaid: f64) -> Record {
        Record {
            partner: partner.into(),
            cpt_code: code.into(),
            description: None,
            invoice: Some(invoice),
            repaid: Some(repaid),
            medicare: Some(medicare),
            medicaid: Some(medicaid),
        }
    }

    #[test]
    fn provider_total_example() {
        let records = vec![
            record("A", "1", 100.0, 50.0, 10.0, 0.0),
            record("A", "1", 200.0, 100.0, 0.0, 20.0),
        ];
        let totals = provider_totals(&records);
        assert_eq!(
            totals,
            vec![ProviderTotal {
                partner: "A".into(),
                invoice: 300.0,
                repaid: 150.0,
                repaid_percentage: 50.0,
            }]
        );
    }

    #[test]
    fn totals_match_per_partner_sums() {
        let records = vec![
            record("B", "1", 10.0, 1.0, 1.0, 0.0),
            record("A", "2", 20.0, 2.0, 1.0, 0.0),
            record("B", "3", 30.5, 3.0, 0.0, 1.0),
        ];
        for t in provider_totals(&records) {
            let expected: f64 = records
                .iter()
                .filter(|r| r.partner == t.partner)
                .filter_map(|r| r.invoice)
                .sum();
            assert_eq!(t.invoice, expected);
        }
        let names: Vec<_> = provider_totals(&records).into_iter().map(|t| t.partner).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn zero_invoice_has_zero_repaid_percentage() {
        let totals = provider_totals(&[record("A", "1", 0.0, 25.0, 1.0, 0.0)]);
        assert_eq!(totals[0].repaid_percentage, 0.0);
    }

    #[test]
    fn repaid_percentage_rounds_to_one_decimal() {
        let totals = provider_totals(&[record("A", "1", 3.0, 1.0, 1.0, 0.0)]);
        assert_eq!(totals[0].repaid_percentage, 33.3);
    }

    #[test]
    fn averages_take_first_description_and_skip_missing() {
        let mut first = record("A", "99213", 100.0, 10.0, 5.0, 0.0);
        first.description = None;
        let mut second = record("A", "99213", 201.0, 20.0, 5.0, 1.0);
        second.description = Some("Office visit".into());
        second.repaid = None;
        let mut third = record("A", "99213", 0.0, 30.0, 5.0, 0.0);
        third.description = Some("Later text".into());
        let other = record("A", "99214", 1.0, 1.0, 1.0, 1.0);

        let avgs = provider_code_averages(&[first, second, third, other]);
        assert_eq!(avgs.len(), 2);
        let a = &avgs[0];
        assert_eq!(a.cpt_code, "99213");
        assert_eq!(a.description.as_deref(), Some("Office visit"));
        assert_eq!(a.invoice, Some(100.33));
        assert_eq!(a.repaid, Some(20.0));
        assert_eq!(a.medicaid, Some(0.33));
        assert_eq!(partners(&avgs), ["A"]);
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-1.25, 1), -1.2);
    }

    #[test]
    fn partner_summary_and_shares() {
        let records = vec![
            record("A", "1", 200.0, 50.0, 20.0, 10.0),
            record("B", "1", 999.0, 1.0, 1.0, 1.0),
            record("A", "2", 200.0, 50.0, 20.0, 10.0),
        ];
        let s = PartnerSummary::for_partner(&records, "A");
        assert_eq!(s.invoice, 400.0);
        assert_eq!(s.repaid_pct(), 25.0);
        assert_eq!(s.medicare_pct(), 10.0);
        assert_eq!(s.medicaid_pct(), 5.0);
        assert_eq!(PartnerSummary::default().repaid_pct(), 0.0);
    }

    #[test]
    fn recovery_averages_over_rows() {
        let row = |invoice, repaid, medicare, medicaid| ProviderCodeAverage {
            partner: "A".into(),
            cpt_code: "1".into(),
            description: None,
            invoice: Some(invoice),
            repaid: Some(repaid),
            medicare: Some(medicare),
            medicaid: Some(medicaid),
        };
        let r = RecoveryAverages::from_rows(&[row(100.0, 40.0, 50.0, 0.0), row(300.0, 60.0, 70.0, 30.0)]);
        assert_eq!(r.invoice, Some(200.0));
        assert_eq!(r.repaid, Some(50.0));
        assert_eq!(r.combined, Some((200.0 + 60.0 + 15.0) / 3.0));
        assert_eq!(r.repaid_pct, 25.0);

        let empty = RecoveryAverages::from_rows(&[]);
        assert_eq!(empty.invoice, None);
        assert_eq!(empty.repaid_pct, 0.0);
        assert_eq!(empty.combined_pct, 0.0);
    }
}
