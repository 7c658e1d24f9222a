use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the claims table
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell.
/// Missing values of every flavour (empty, NaN, error cells) are `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

// -- Manual Eq/Ord so CellValue can key ordered maps --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Build a float cell, folding NaN and infinities into `Null` and integral
    /// values into `Integer` (spreadsheets store every number as a float).
    /// JSON has no spelling for non-finite numbers.
    pub fn from_f64(v: f64) -> Self {
        if !v.is_finite() {
            CellValue::Null
        } else if v.fract() == 0.0 && v.abs() < 9.0e15 {
            CellValue::Integer(v as i64)
        } else {
            CellValue::Float(v)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the cell, if it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text view of the cell; `None` for nulls.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnTable – the converted spreadsheet
// ---------------------------------------------------------------------------

/// Column-oriented table: column name → one value per source row.
/// Every column has the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<CellValue>>",
    into = "BTreeMap<String, Vec<CellValue>>"
)]
pub struct ColumnTable {
    columns: BTreeMap<String, Vec<CellValue>>,
    rows: usize,
}

impl TryFrom<BTreeMap<String, Vec<CellValue>>> for ColumnTable {
    type Error = String;

    fn try_from(columns: BTreeMap<String, Vec<CellValue>>) -> Result<Self, Self::Error> {
        let mut lengths = columns.iter().map(|(name, values)| (name, values.len()));
        let rows = match lengths.next() {
            Some((_, n)) => n,
            None => 0,
        };
        if let Some((name, n)) = lengths.find(|(_, n)| *n != rows) {
            return Err(format!(
                "column '{name}' has {n} values, expected {rows}"
            ));
        }
        Ok(ColumnTable { columns, rows })
    }
}

impl From<ColumnTable> for BTreeMap<String, Vec<CellValue>> {
    fn from(table: ColumnTable) -> Self {
        table.columns
    }
}

impl ColumnTable {
    /// Assemble a table from a header row and row-major cells.
    ///
    /// Headers must be unique and every row must have one cell per header.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, String> {
        let mut seen = BTreeSet::new();
        for h in &headers {
            if !seen.insert(h.as_str()) {
                return Err(format!("duplicate column header '{h}'"));
            }
        }

        let mut columns: Vec<Vec<CellValue>> =
            headers.iter().map(|_| Vec::with_capacity(rows.len())).collect();
        for (row_no, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(format!(
                    "row {row_no} has {} cells but there are {} headers",
                    row.len(),
                    headers.len()
                ));
            }
            for (col, cell) in columns.iter_mut().zip(row) {
                col.push(cell);
            }
        }

        Self::try_from(headers.into_iter().zip(columns).collect::<BTreeMap<_, _>>())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Count of null cells per column, for load diagnostics.
    pub fn null_counts(&self) -> BTreeMap<&str, usize> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.iter().filter(|v| v.is_null()).count()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Claim / Record – one billing row under canonical names
// ---------------------------------------------------------------------------

/// One row after renaming to canonical columns, before validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Claim {
    pub partner: Option<String>,
    pub cpt_code: Option<String>,
    pub description: Option<String>,
    pub invoice: Option<f64>,
    pub repaid: Option<f64>,
    pub medicare: Option<f64>,
    pub medicaid: Option<f64>,
}

/// A claim that has both grouping keys and some payer data.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub partner: String,
    pub cpt_code: String,
    pub description: Option<String>,
    pub invoice: Option<f64>,
    pub repaid: Option<f64>,
    pub medicare: Option<f64>,
    pub medicaid: Option<f64>,
}

impl From<Record> for Claim {
    fn from(r: Record) -> Self {
        Claim {
            partner: Some(r.partner),
            cpt_code: Some(r.cpt_code),
            description: r.description,
            invoice: r.invoice,
            repaid: r.repaid,
            medicare: r.medicare,
            medicaid: r.medicaid,
        }
    }
}
