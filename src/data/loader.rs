use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Dataset, Observation};
use crate::error::DatasetError;

/// Columns every source must provide.
pub const REQUIRED_COLUMNS: [&str; 6] =
    ["country", "continent", "year", "lifeExp", "pop", "gdpPercap"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the Gapminder table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "country": ..., "year": ..., ... }, ...]` (records orient)
/// * `.parquet` – flat columns, as written by Pandas or Polars
///
/// A table with zero rows is rejected: there would be no year to select.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let observations = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(DatasetError::UnsupportedFormat(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if observations.is_empty() {
        return Err(anyhow::Error::new(DatasetError::Empty)
            .context(format!("loading {}", path.display())));
    }

    Ok(Dataset::from_observations(observations))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column order does not matter and extra columns are ignored.
fn load_csv(path: &Path) -> Result<Vec<Observation>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DatasetError::MissingColumn(required.to_string()).into());
        }
    }

    reader
        .deserialize::<Observation>()
        .enumerate()
        .map(|(row_no, record)| record.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "country": "Afghanistan", "continent": "Asia", "year": 1952,
///     "lifeExp": 28.801, "pop": 8425333, "gdpPercap": 779.4453145 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Observation>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one row per observation.
///
/// String columns may be plain or dictionary encoded (Pandas categoricals);
/// numeric columns of any integer / float width are widened.
fn load_parquet(path: &Path) -> Result<Vec<Observation>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut observations = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = observations.len();

        let country = string_column(&batch, "country", offset)?;
        let continent = string_column(&batch, "continent", offset)?;
        let year = int_column(&batch, "year", offset)?;
        let life_exp = float_column(&batch, "lifeExp", offset)?;
        let pop = float_column(&batch, "pop", offset)?;
        let gdp_percap = float_column(&batch, "gdpPercap", offset)?;
        let iso_alpha = optional_string_column(&batch, "iso_alpha")?;
        let iso_num = optional_int_column(&batch, "iso_num")?;

        for row in 0..batch.num_rows() {
            let year = i32::try_from(year[row])
                .with_context(|| format!("Row {}: year {} out of range", offset + row, year[row]))?;

            observations.push(Observation {
                country: country[row].clone(),
                continent: continent[row].clone(),
                year,
                life_exp: life_exp[row],
                pop: pop[row],
                gdp_percap: gdp_percap[row],
                iso_alpha: iso_alpha.as_ref().and_then(|col| col[row].clone()),
                iso_num: iso_num.as_ref().and_then(|col| col[row]),
            });
        }
    }

    Ok(observations)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, DatasetError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
}

fn type_error(name: &str, expected: &'static str, col: &ArrayRef) -> DatasetError {
    DatasetError::ColumnType {
        column: name.to_string(),
        expected,
        found: format!("{:?}", col.data_type()),
    }
}

fn is_string_type(data_type: &DataType) -> bool {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 => true,
        DataType::Dictionary(_, value) => is_string_type(value),
        _ => false,
    }
}

/// Cast a string-like column to `Utf8` and return one entry per row.
fn cast_strings(col: &ArrayRef, name: &str) -> Result<Vec<Option<String>>> {
    if !is_string_type(col.data_type()) {
        return Err(type_error(name, "string", col).into());
    }
    let utf8 = arrow::compute::cast(col.as_ref(), &DataType::Utf8)
        .with_context(|| format!("casting '{name}' to Utf8"))?;
    let arr = utf8.as_string::<i32>();
    Ok(arr.iter().map(|v| v.map(str::to_string)).collect())
}

fn cast_ints(col: &ArrayRef, name: &str) -> Result<Vec<Option<i64>>> {
    if !col.data_type().is_integer() {
        return Err(type_error(name, "integer", col).into());
    }
    let wide = arrow::compute::cast(col.as_ref(), &DataType::Int64)
        .with_context(|| format!("casting '{name}' to Int64"))?;
    Ok(wide.as_primitive::<Int64Type>().iter().collect())
}

fn require_all<T>(values: Vec<Option<T>>, name: &str, offset: usize) -> Result<Vec<T>> {
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                anyhow::Error::from(DatasetError::NullValue {
                    row: offset + row,
                    column: name.to_string(),
                })
            })
        })
        .collect()
}

fn string_column(batch: &RecordBatch, name: &str, offset: usize) -> Result<Vec<String>> {
    let col = column(batch, name)?;
    require_all(cast_strings(col, name)?, name, offset)
}

fn int_column(batch: &RecordBatch, name: &str, offset: usize) -> Result<Vec<i64>> {
    let col = column(batch, name)?;
    require_all(cast_ints(col, name)?, name, offset)
}

fn float_column(batch: &RecordBatch, name: &str, offset: usize) -> Result<Vec<f64>> {
    let col = column(batch, name)?;
    if !col.data_type().is_numeric() {
        return Err(type_error(name, "numeric", col).into());
    }
    let wide = arrow::compute::cast(col.as_ref(), &DataType::Float64)
        .with_context(|| format!("casting '{name}' to Float64"))?;
    let values = wide.as_primitive::<Float64Type>().iter().collect();
    require_all(values, name, offset)
}

fn optional_string_column(batch: &RecordBatch, name: &str) -> Result<Option<Vec<Option<String>>>> {
    batch
        .column_by_name(name)
        .map(|col| cast_strings(col, name))
        .transpose()
}

fn optional_int_column(batch: &RecordBatch, name: &str) -> Result<Option<Vec<Option<i64>>>> {
    batch
        .column_by_name(name)
        .map(|col| cast_ints(col, name))
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const CSV_SAMPLE: &str = "\
country,continent,year,lifeExp,pop,gdpPercap,iso_alpha,iso_num
Afghanistan,Asia,1952,28.801,8425333,779.4453145,AFG,4
Afghanistan,Asia,1957,30.332,9240934,820.8530296,AFG,4
Albania,Europe,1952,55.23,1282697,1601.056136,ALB,8
";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    fn dataset_error(err: &anyhow::Error) -> Option<&DatasetError> {
        err.chain().find_map(|e| e.downcast_ref::<DatasetError>())
    }

    #[test]
    fn loads_csv_with_optional_columns() {
        let file = write_temp(".csv", CSV_SAMPLE);
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.available_years(), &[1952, 1957]);
        let first = &ds.observations()[0];
        assert_eq!(first.country, "Afghanistan");
        assert_eq!(first.pop, 8425333.0);
        assert_eq!(first.iso_alpha.as_deref(), Some("AFG"));
        assert_eq!(first.iso_num, Some(4));
    }

    #[test]
    fn csv_without_iso_columns_is_accepted() {
        let file = write_temp(
            ".csv",
            "continent,country,year,lifeExp,pop,gdpPercap\nAsia,Japan,2007,82.6,127467972,31656.07\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.observations()[0].country, "Japan");
        assert_eq!(ds.observations()[0].iso_alpha, None);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let file = write_temp(".csv", "country,continent,year,lifeExp,pop\nJapan,Asia,2007,82.6,1\n");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            dataset_error(&err),
            Some(&DatasetError::MissingColumn("gdpPercap".to_string()))
        );
    }

    #[test]
    fn csv_bad_number_fails() {
        let file = write_temp(
            ".csv",
            "country,continent,year,lifeExp,pop,gdpPercap\nJapan,Asia,soon,82.6,1,2\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 0"));
    }

    #[test]
    fn header_only_csv_is_empty() {
        let file = write_temp(".csv", "country,continent,year,lifeExp,pop,gdpPercap\n");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(dataset_error(&err), Some(&DatasetError::Empty));
    }

    #[test]
    fn loads_json_records() {
        let file = write_temp(
            ".json",
            r#"[{"country":"Chad","continent":"Africa","year":1952,"lifeExp":38.092,"pop":2682462,"gdpPercap":1178.665927}]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.observations()[0].gdp_percap, 1178.665927);
    }

    #[test]
    fn unsupported_extension_fails() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            dataset_error(&err),
            Some(&DatasetError::UnsupportedFormat("xlsx".to_string()))
        );
    }

    #[test]
    fn missing_file_fails() {
        assert!(load_file(Path::new("/nonexistent/gapminder.csv")).is_err());
    }

    fn write_parquet(schema: Schema, columns: Vec<ArrayRef>) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .expect("create temp file");
        let schema = Arc::new(schema);
        let batch = RecordBatch::try_new(schema.clone(), columns).expect("record batch");
        let mut writer =
            ArrowWriter::try_new(file.reopen().expect("reopen"), schema, None).expect("writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close writer");
        file
    }

    #[test]
    fn loads_parquet_with_narrow_types() {
        let schema = Schema::new(vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("continent", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("lifeExp", DataType::Float64, false),
            Field::new("pop", DataType::Int64, false),
            Field::new("gdpPercap", DataType::Float64, false),
        ]);
        let file = write_parquet(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["Chile", "Peru"])),
                Arc::new(StringArray::from(vec!["Americas", "Americas"])),
                Arc::new(Int32Array::from(vec![2002, 2007])),
                Arc::new(Float64Array::from(vec![77.86, 71.42])),
                Arc::new(Int64Array::from(vec![15497046, 28674757])),
                Arc::new(Float64Array::from(vec![10778.78, 7408.91])),
            ],
        );

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.available_years(), &[2002, 2007]);
        assert_eq!(ds.observations()[1].pop, 28674757.0);
    }

    #[test]
    fn parquet_with_string_year_is_rejected() {
        let schema = Schema::new(vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("continent", DataType::Utf8, false),
            Field::new("year", DataType::Utf8, false),
            Field::new("lifeExp", DataType::Float64, false),
            Field::new("pop", DataType::Float64, false),
            Field::new("gdpPercap", DataType::Float64, false),
        ]);
        let file = write_parquet(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["Chile"])),
                Arc::new(StringArray::from(vec!["Americas"])),
                Arc::new(StringArray::from(vec!["2007"])),
                Arc::new(Float64Array::from(vec![77.86])),
                Arc::new(Float64Array::from(vec![1.5e7])),
                Arc::new(Float64Array::from(vec![10778.78])),
            ],
        );

        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            dataset_error(&err),
            Some(DatasetError::ColumnType { column, expected: "integer", .. }) if column == "year"
        ));
    }
}
