use super::aggregate::PartnerSummary;

/// Advance percentage the slider starts at.
pub const DEFAULT_ADVANCE_PCT: u32 = 70;

/// Multiple-of-invested-capital figures for one partner and advance rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoicAnalysis {
    pub advance_pct: u32,
    pub amount_advanced: f64,
    pub current_moic: f64,
    pub potential_recovery: f64,
    pub estimated_moic: f64,
}

impl MoicAnalysis {
    /// Evaluate the calculator; `advance_pct` is clamped to 0..=100.
    ///
    /// Both multiples are 0 when nothing was advanced.
    pub fn compute(totals: &PartnerSummary, advance_pct: u32) -> Self {
        let advance_pct = advance_pct.min(100);
        let amount_advanced = totals.invoice * (f64::from(advance_pct) / 100.0);
        let potential_recovery = (totals.invoice + totals.medicare + totals.medicaid) / 3.0;

        let (current_moic, estimated_moic) = if amount_advanced > 0.0 {
            (
                totals.repaid / amount_advanced,
                potential_recovery / amount_advanced,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            advance_pct,
            amount_advanced,
            current_moic,
            potential_recovery,
            estimated_moic,
        }
    }
}
