use super::model::{CellValue, Claim, ColumnTable, Record};
use crate::error::ProcessingError;

// ---------------------------------------------------------------------------
// Column mapping: source header → canonical field
// ---------------------------------------------------------------------------

/// Source header names for the seven business columns.
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub partner: String,
    pub cpt_code: String,
    pub repaid: String,
    pub invoice: String,
    pub medicare: String,
    pub medicaid: String,
    pub description: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            partner: "Partner Account".into(),
            cpt_code: "CPT Code 1".into(),
            repaid: "Total Amounts Repaid 1 + 2".into(),
            invoice: "Invoice Amount".into(),
            medicare: "Medicare".into(),
            medicaid: "Medicaid".into(),
            description: "Description".into(),
        }
    }
}

impl ColumnMapping {
    /// The seven source headers, in canonical order.
    pub fn headers(&self) -> [&str; 7] {
        [
            self.partner.as_str(),
            self.cpt_code.as_str(),
            self.repaid.as_str(),
            self.invoice.as_str(),
            self.medicare.as_str(),
            self.medicaid.as_str(),
            self.description.as_str(),
        ]
    }

    /// Headers this table lacks.
    pub fn missing_from<'a>(&'a self, table: &ColumnTable) -> Vec<&'a str> {
        self.headers()
            .into_iter()
            .filter(|h| table.column(h).is_none())
            .collect()
    }
}

/// Rename the mapped columns and return one [`Claim`] per table row.
pub fn claims(table: &ColumnTable, mapping: &ColumnMapping) -> Result<Vec<Claim>, ProcessingError> {
    let column = |name: &str| {
        table
            .column(name)
            .ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))
    };
    let partner = column(&mapping.partner)?;
    let cpt_code = column(&mapping.cpt_code)?;
    let description = column(&mapping.description)?;
    let invoice = column(&mapping.invoice)?;
    let repaid = column(&mapping.repaid)?;
    let medicare = column(&mapping.medicare)?;
    let medicaid = column(&mapping.medicaid)?;

    let amount = |values: &[CellValue], name: &str, row: usize| -> Result<Option<f64>, ProcessingError> {
        match &values[row] {
            CellValue::Null => Ok(None),
            CellValue::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
            cell =>cell.as_f64().map(Some).ok_or_else(|| ProcessingError::NonNumeric {
                column: name.to_string(),
                row,
                value: cell.to_string(),
            }),
        }
    };

    (0..table.len())
        .map(|row| {
            Ok(Claim {
                partner: partner[row].as_text(),
                cpt_code: cpt_code[row].as_text(),
                description: description[row].as_text(),
                invoice: amount(invoice, &mapping.invoice, row)?,
                repaid: amount(repaid, &mapping.repaid, row)?,
                medicare: amount(medicare, &mapping.medicare, row)?,
                medicaid: amount(medicaid, &mapping.medicaid, row)?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Validity filters
// ---------------------------------------------------------------------------

/// Keep claims that have both grouping keys and positive Medicare or
/// Medicaid data, in input order.
pub fn valid_records(claims: Vec<Claim>) -> Vec<Record> {
    claims
        .into_iter()
        .filter(has_payer_data)
        .filter_map(|c| {
            Some(Record {
                partner: c.partner?,
                cpt_code: c.cpt_code?,
                description: c.description,
                invoice: c.invoice,
                repaid: c.repaid,
                medicare: c.medicare,
                medicaid: c.medicaid,
            })
        })
        .collect()
}

/// Missing amounts count as "not positive".
fn has_payer_data(claim: &Claim) -> bool {
    let positive = |v: Option<f64>| v.is_some_and(|x| x > 0.0);
    positive(claim.medicare) || positive(claim.medicaid)
}

/// Rename, then filter: the working record set for every aggregate.
pub fn load_records(table: &ColumnTable, mapping: &ColumnMapping) -> Result<Vec<Record>, ProcessingError> {
    let claims = claims(table, mapping)?;
    let total = claims.len();
    let records = valid_records(claims);
    log::debug!("{} of {total} claims kept after validity filters", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(partner: Option<&str>, code: Option<&str>, medicare: Option<f64>, medicaid: Option<f64>) -> Claim {
        Claim {
            partner: partner.map(str::to_string),
            cpt_code: code.map(str::to_string),
            description: None,
            invoice: Some(100.0),
            repaid: Some(40.0),
            medicare,
            medicaid,
        }
    }

    fn table(rows: Vec<[CellValue; 7]>) -> ColumnTable {
        let m = ColumnMapping::default();
        let headers = vec![
            m.partner, m.cpt_code, m.description, m.invoice, m.repaid, m.medicare, m.medicaid,
        ];
        ColumnTable::from_rows(headers, rows.into_iter().map(Vec::from).collect()).unwrap()
    }

    #[test]
    fn null_partner_or_code_is_dropped() {
        let records = valid_records(vec![
            claim(None, Some("99213"), Some(10.0), None),
            claim(Some("Acme"), None, Some(10.0), None),
            claim(Some("Acme"), Some("99213"), Some(10.0), None),
        ]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].partner, "Acme");
    }

    #[test]
    fn rows_without_payer_data_are_dropped() {
        let records = valid_records(vec![
            claim(Some("Acme"), Some("1"), Some(0.0), Some(0.0)),
            claim(Some("Acme"), Some("2"), None, None),
            claim(Some("Acme"), Some("3"), Some(-5.0), None),
            claim(Some("Acme"), Some("4"), None, Some(0.01)),
        ]);
        let codes: Vec<_> = records.iter().map(|r| r.cpt_code.as_str()).collect();
        assert_eq!(codes, ["4"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let once = valid_records(vec![
            claim(Some("Acme"), Some("1"), Some(5.0), None),
            claim(None, Some("1"), Some(5.0), None),
            claim(Some("Bolt"), Some("2"), None, Some(3.0)),
            claim(Some("Bolt"), Some("3"), None, None),
        ]);
        let twice = valid_records(once.iter().cloned().map(Claim::from).collect());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn renaming_reads_mapped_columns() {
        use CellValue::*;
        let t = table(vec![
            [
                String("Acme".into()),
                Integer(99213),
                String("Office visit".into()),
                Integer(100),
                Float(50.5),
                Integer(10),
                Null,
            ],
            [Null, Integer(99214), Null, Null, Null, Null, Integer(7)],
        ]);
        let claims = claims(&t, &ColumnMapping::default()).unwrap();
        assert_eq!(claims[0].cpt_code.as_deref(), Some("99213"));
        assert_eq!(claims[0].repaid, Some(50.5));
        assert_eq!(claims[0].medicaid, None);
        assert_eq!(claims[1].partner, None);

        let records = load_records(&t, &ColumnMapping::default()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn boolean_amounts_count_as_one_or_zero() {
        use CellValue::*;
        let t = table(vec![
            [String("Acme".into()), Integer(1), Null, Integer(100), Null, Bool(true), Null],
            [String("Acme".into()), Integer(2), Null, Integer(100), Null, Bool(false), Bool(false)],
        ]);
        let claims = claims(&t, &ColumnMapping::default()).unwrap();
        assert_eq!(claims[0].medicare, Some(1.0));
        assert_eq!(claims[1].medicaid, Some(0.0));

        let records = valid_records(claims);
        let codes: Vec<_> = records.iter().map(|r| r.cpt_code.as_str()).collect();
        assert_eq!(codes, ["1"]);
    }

    #[test]
    fn keys_group_by_text_form() {
        use CellValue::*;
        let t = table(vec![
            [String("Acme".into()), Integer(5), Null, Integer(10), Null, Integer(1), Null],
            [String("Acme".into()), String("5".into()), Null, Integer(20), Null, Integer(1), Null],
        ]);
        let records = load_records(&t, &ColumnMapping::default()).unwrap();
        assert_eq!(records[0].cpt_code, records[1].cpt_code);
        assert_eq!(records[0].cpt_code, "5");
    }

    #[test]
    fn missing_headers_are_listed() {
        let t = ColumnTable::from_rows(vec!["Partner Account".into(), "Medicare".into()], vec![]).unwrap();
        let mapping = ColumnMapping::default();
        let missing = mapping.missing_from(&t);
        assert_eq!(missing.len(), 5);
        assert!(missing.contains(&"Invoice Amount"));
        assert!(!missing.contains(&"Medicare"));
    }

    #[test]
    fn missing_column_is_reported() {
        let t = ColumnTable::from_rows(vec!["Partner Account".into()], vec![]).unwrap();
        let err = load_records(&t, &ColumnMapping::default()).unwrap_err();
        assert_eq!(err, ProcessingError::MissingColumn("CPT Code 1".into()));
    }

    #[test]
    fn text_in_amount_column_is_reported() {
        use CellValue::*;
        let t = table(vec![[
            String("Acme".into()),
            Integer(1),
            Null,
            String("$1,200".into()),
            Null,
            Integer(1),
            Null,
        ]]);
        let err = load_records(&t, &ColumnMapping::default()).unwrap_err();
        assert_eq!(
            err,
            ProcessingError::NonNumeric {
                column: "Invoice Amount".into(),
                row: 0,
                value: "$1,200".into(),
            }
        );
    }
}
