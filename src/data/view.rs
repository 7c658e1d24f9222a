use super::aggregate::{
    partners, provider_code_averages, provider_totals, PartnerSummary, ProviderCodeAverage,
    ProviderTotal, RecoveryAverages,
};
use super::filter::{load_records, ColumnMapping};
use super::model::ColumnTable;
use super::moic::{MoicAnalysis, DEFAULT_ADVANCE_PCT};
use super::rank::{code_count, partner_codes, top_providers, TOP_PROVIDERS};
use crate::error::ProcessingError;

/// The user's widget state.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// `None`, or a partner no longer present, selects the first partner.
    pub partner: Option<String>,
    /// `None` shows the default number of codes.
    pub code_count: Option<usize>,
    pub advance_pct: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            partner: None,
            code_count: None,
            advance_pct: DEFAULT_ADVANCE_PCT,
        }
    }
}

/// Everything one render pass displays.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub record_count: usize,
    pub top_providers: Vec<ProviderTotal>,
    /// Sorted distinct partners for the selector.
    pub partners: Vec<String>,
    pub partner: String,
    /// Codes available for `partner`.
    pub total_codes: usize,
    /// Top codes by average invoice, `code_count` of them.
    pub codes: Vec<ProviderCodeAverage>,
    pub recovery: RecoveryAverages,
    pub summary: PartnerSummary,
    pub moic: MoicAnalysis,
}

impl DashboardView {
    /// Run the full pipeline for one interaction. All-or-nothing.
    pub fn build(
        table: &ColumnTable,
        mapping: &ColumnMapping,
        selection: &Selection,
    ) -> Result<Self, ProcessingError> {
        let records = load_records(table, mapping)?;

        let top_providers = top_providers(&provider_totals(&records), TOP_PROVIDERS);

        let averages = provider_code_averages(&records);
        let partners = partners(&averages);
        let partner = selection
            .partner
            .as_ref()
            .filter(|p| partners.contains(*p))
            .or_else(|| partners.first())
            .cloned()
            .ok_or(ProcessingError::NoPayerData)?;

        let ranked = partner_codes(&averages, &partner);
        let total_codes = ranked.len();
        let shown = code_count(selection.code_count, total_codes);
        let codes: Vec<ProviderCodeAverage> = ranked.into_iter().take(shown).cloned().collect();

        let recovery = RecoveryAverages::from_rows(&codes);
        let summary = PartnerSummary::for_partner(&records, &partner);
        let moic = MoicAnalysis::compute(&summary, selection.advance_pct);

        log::debug!(
            "view for '{partner}': {shown}/{total_codes} codes, advance {}%",
            moic.advance_pct
        );

        Ok(Self {
            record_count: records.len(),
            top_providers,
            partners,
            partner,
            total_codes,
            codes,
            recovery,
            summary,
            moic,
        })
    }
}
