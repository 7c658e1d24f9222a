use std::fs::File;
use std::io::Write;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tempfile::NamedTempFile;

use super::model::{CellValue, ColumnTable};
use crate::error::LoadError;

/// Where the converter writes the artifact that the dashboard embeds.
pub const EMBEDDED_PATH: &str = "data/claims.json";

const EMBEDDED_TABLE: &str = include_str!("../../data/claims.json");

/// Text cells read as missing, the same set pandas treats as NaN.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// The claims table compiled into the binary.
pub fn load_embedded() -> Result<ColumnTable, LoadError> {
    parse_artifact(EMBEDDED_TABLE, Path::new(EMBEDDED_PATH))
}

/// Load a claims table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet, header row first
/// * `.csv`     – header row, one claim per line
/// * `.parquet` – flat columns, as written by `df.to_parquet()`
/// * `.json`    – a previously converted artifact
pub fn load_file(path: &Path) -> Result<ColumnTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    // Surface a missing or unreadable file the same way for every format.
    File::open(path).map_err(|e| LoadError::access(path, e))?;

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_spreadsheet(path)?,
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|e| LoadError::access(path, e))?;
            parse_artifact(&text, path)?
        }
        _ => {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    log::info!(
        "Loaded {} rows, {} columns from {}",
        table.len(),
        table.column_names().count(),
        path.display()
    );
    Ok(table)
}

/// Read `input` and write it as a JSON artifact at `output`.
///
/// Nothing is written unless the whole input parsed.
pub fn convert(input: &Path, output: &Path) -> Result<ColumnTable, LoadError> {
    let table = load_file(input)?;
    write_artifact(&table, output)?;
    Ok(table)
}

/// Serialize `table` to `path`, replacing any previous artifact atomically.
pub fn write_artifact(table: &ColumnTable, path: &Path) -> Result<(), LoadError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| LoadError::access(dir, e))?;

    let mut json = serde_json::to_string_pretty(table).map_err(|e| LoadError::format(path, e))?;
    json.push('\n');

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| LoadError::access(dir, e))?;
    if let Err(e) = tmp.write_all(json.as_bytes()) {
        return Err(LoadError::access(tmp.path(), e));
    }
    tmp.persist(path)
        .map_err(|e| LoadError::access(path, e.error))?;

    log::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn parse_artifact(text: &str, origin: &Path) -> Result<ColumnTable, LoadError> {
    serde_json::from_str(text).map_err(|e| LoadError::format(origin, e))
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path) -> Result<ColumnTable, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::format(path, e))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::format(path, "workbook has no worksheets"))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LoadError::format(path, e))?;
    log::debug!("Reading worksheet '{sheet}' ({:?} cells)", range.get_size());

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| LoadError::format(path, format!("worksheet '{sheet}' is empty")))?
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            // Header text is taken literally, even when it reads "NA".
            Data::String(s) if !s.is_empty() => s.clone(),
            _ => match spreadsheet_cell(cell) {
                CellValue::Null => format!("Unnamed: {i}"),
                other => other.to_string(),
            },
        })
        .collect();

    let body: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(spreadsheet_cell).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| !c.is_null()))
        .collect();

    ColumnTable::from_rows(headers, body).map_err(|e| LoadError::format(path, e))
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::from_f64(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if NA_MARKERS.contains(&s.as_str()) => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<ColumnTable, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::access(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::format(path, e))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if h.is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::format(path, e))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    ColumnTable::from_rows(headers, rows).map_err(|e| LoadError::format(path, e))
}

fn guess_cell_type(s: &str) -> CellValue {
    if NA_MARKERS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::from_f64(f);
    }
    match s {
        "True" | "true" => CellValue::Bool(true),
        "False" | "false" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file; every column becomes a table column.
fn load_parquet(path: &Path) -> Result<ColumnTable, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::access(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| LoadError::format(path, e))?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(|e| LoadError::format(path, e))?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| LoadError::format(path, e))?;
        let columns = batch
            .columns()
            .iter()
            .map(arrow_cells)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LoadError::format(path, e))?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    ColumnTable::from_rows(headers, rows).map_err(|e| LoadError::format(path, e))
}

/// Convert one Arrow column into cells.
fn arrow_cells(col: &ArrayRef) -> Result<Vec<CellValue>, arrow::error::ArrowError> {
    let n = col.len();
    match col.data_type() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => {
            let ints = cast(col, &DataType::Int64)?;
            let ints = ints.as_primitive::<Int64Type>();
            Ok(ints
                .iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::Integer))
                .collect())
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let floats = cast(col, &DataType::Float64)?;
            let floats = floats.as_primitive::<Float64Type>();
            Ok(floats
                .iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::from_f64))
                .collect())
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let strings = cast(col, &DataType::Utf8)?;
            Ok(strings
                .as_string::<i32>()
                .iter()
                .map(|v| match v {
                    None | Some("") => CellValue::Null,
                    Some(s) => CellValue::String(s.to_string()),
                })
                .collect())
        }
        DataType::Boolean => Ok(col
            .as_boolean()
            .iter()
            .map(|v| v.map_or(CellValue::Null, CellValue::Bool))
            .collect()),
        // Dates, decimals and the rest keep their display form.
        _ => (0..n)
            .map(|row| {
                if col.is_null(row) {
                    Ok(CellValue::Null)
                } else {
                    array_value_to_string(col, row).map(CellValue::String)
                }
            })
            .collect(),
    }
}
