//! Write a synthetic claims table to `sample_claims.parquet`.
//!
//! The file has the same headers as the billing spreadsheet, so it can be fed
//! to `convert_claims` or opened from the dashboard.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const OUTPUT_PATH: &str = "sample_claims.parquet";

const PARTNERS: &[&str] = &[
    "Peachtree Family Medicine",
    "Savannah Coastal Health",
    "Augusta Pediatrics Group",
    "Macon Orthopedic Associates",
    "Athens Behavioral Health",
    "Columbus Internal Medicine",
    "Valdosta Rural Clinic",
    "Rome Cardiology Partners",
    "Dalton Primary Care",
    "Brunswick Urgent Care",
    "Gainesville Pain Center",
    "Albany Women's Care",
];

const CODES: &[(&str, &str)] = &[
    ("99213", "Office/outpatient visit, est. patient, low"),
    ("99214", "Office/outpatient visit, est. patient, moderate"),
    ("99203", "Office/outpatient visit, new patient, low"),
    ("90834", "Psychotherapy, 45 minutes"),
    ("20610", "Arthrocentesis, major joint"),
    ("93000", "Electrocardiogram, complete"),
    ("J1100", "Injection, dexamethasone sodium phosphate"),
    ("96372", "Therapeutic injection, SC/IM"),
];

/// Columns of the generated table.
#[derive(Default)]
struct Claims {
    partner: Vec<Option<String>>,
    code: Vec<Option<String>>,
    description: Vec<Option<String>>,
    invoice: Vec<f64>,
    repaid: Vec<f64>,
    medicare: Vec<Option<f64>>,
    medicaid: Vec<Option<f64>>,
    claim_number: Vec<i64>,
}

fn cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate(rng: &mut StdRng, rows: usize) -> Claims {
    let mut claims = Claims::default();
    for n in 0..rows {
        let partner = PARTNERS[rng.random_range(0..PARTNERS.len())];
        let (code, description) = CODES[rng.random_range(0..CODES.len())];
        let invoice = cents(rng.random_range(80.0..1800.0));

        // Roughly a third Medicare-only, a third Medicaid-only, the rest both;
        // a few rows carry no payer data at all.
        let mode: f64 = rng.random();
        let no_payer = rng.random_bool(0.08);
        let medicare = (mode < 0.66 && !no_payer).then(|| cents(invoice * rng.random_range(0.2..0.6)));
        let medicaid = (mode > 0.33 && !no_payer).then(|| cents(invoice * rng.random_range(0.1..0.5)));

        claims.partner.push((!rng.random_bool(0.02)).then(|| partner.to_string()));
        claims.code.push((!rng.random_bool(0.02)).then(|| code.to_string()));
        claims.description.push((!rng.random_bool(0.1)).then(|| description.to_string()));
        claims.invoice.push(invoice);
        claims.repaid.push(cents(invoice * rng.random_range(0.1..0.9)));
        claims.medicare.push(medicare);
        claims.medicaid.push(medicaid);
        claims.claim_number.push(100_000 + n as i64);
    }
    claims
}

fn to_batch(claims: Claims) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Partner Account", DataType::Utf8, true),
        Field::new("CPT Code 1", DataType::Utf8, true),
        Field::new("Description", DataType::Utf8, true),
        Field::new("Invoice Amount", DataType::Float64, false),
        Field::new("Total Amounts Repaid 1 + 2", DataType::Float64, false),
        Field::new("Medicare", DataType::Float64, true),
        Field::new("Medicaid", DataType::Float64, true),
        Field::new("Claim Number", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(claims.partner)),
        Arc::new(StringArray::from(claims.code)),
        Arc::new(StringArray::from(claims.description)),
        Arc::new(Float64Array::from(claims.invoice)),
        Arc::new(Float64Array::from(claims.repaid)),
        Arc::new(Float64Array::from(claims.medicare)),
        Arc::new(Float64Array::from(claims.medicaid)),
        Arc::new(Int64Array::from(claims.claim_number)),
    ];
    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = StdRng::seed_from_u64(42);
    let batch = to_batch(generate(&mut rng, 500))?;

    let file = std::fs::File::create(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing claims")?;
    writer.close().context("closing parquet writer")?;

    log::info!(
        "First rows:\n{}",
        pretty_format_batches(&[batch.slice(0, 5)]).context("formatting preview")?
    );
    println!("Wrote {} claims to {OUTPUT_PATH}", batch.num_rows());
    Ok(())
}
