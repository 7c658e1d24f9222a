use cpt_dashboard::data::loader;
use cpt_dashboard::{ColumnMapping, ColumnTable, DashboardView, ProcessingError, Selection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Claims table for this session (None only if the embedded one failed).
    pub table: Option<ColumnTable>,

    /// Where the table came from, for the top bar.
    pub source: String,

    pub mapping: ColumnMapping,

    /// Widget values.
    pub selection: Selection,

    /// Result of the last render pass (cached until a widget changes).
    pub view: Option<Result<DashboardView, ProcessingError>>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let mut state = Self {
            table: None,
            source: loader::EMBEDDED_PATH.to_string(),
            mapping: ColumnMapping::default(),
            selection: Selection::default(),
            view: None,
            status_message: None,
        };
        match loader::load_embedded() {
            Ok(table) => state.set_table(table, loader::EMBEDDED_PATH),
            Err(e) => {
                log::error!("Failed to load embedded claims: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
        state
    }
}

impl AppState {
    /// Ingest a newly loaded table and render it with a fresh selection.
    pub fn set_table(&mut self, table: ColumnTable, source: &str) {
        log::info!("Using {} claim rows from {source}", table.len());
        self.table = Some(table);
        self.source = source.to_string();
        self.selection = Selection::default();
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the whole view from the table after a widget change.
    pub fn refresh(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let result = DashboardView::build(table, &self.mapping, &self.selection);
        if let Err(e) = &result {
            log::error!("Error processing data: {e}");
        }
        self.view = Some(result);
    }

    /// Switch partner; the code count goes back to its default.
    pub fn select_partner(&mut self, partner: String) {
        if self.selection.partner.as_ref() != Some(&partner) {
            self.selection.partner = Some(partner);
            self.selection.code_count = None;
            self.refresh();
        }
    }

    pub fn set_code_count(&mut self, n: usize) {
        self.selection.code_count = Some(n);
        self.refresh();
    }

    pub fn set_advance_pct(&mut self, pct: u32) {
        self.selection.advance_pct = pct;
        self.refresh();
    }

    /// The current view, if the last render pass succeeded.
    pub fn ready_view(&self) -> Option<&DashboardView> {
        self.view.as_ref().and_then(|v| v.as_ref().ok())
    }
}
