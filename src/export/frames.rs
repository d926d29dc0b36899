//! Flat tabular export of joined records and summaries through polars.

use crate::export::error::ExportError;
use crate::types::date_range::API_DATE_FORMAT;
use crate::types::day_category::DayCategory;
use crate::types::merged_record::MergedRecord;
use crate::types::summary::Summary;
use crate::types::weather_point::MagnitudeField;
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub const DATE_COLUMN: &str = "date";
pub const GROUP_COLUMN: &str = "group";
pub const RATIO_COLUMN: &str = "ratio";
pub const DAY_TYPE_COLUMN: &str = "day_type";

/// One row per joined record:
/// `date, group, ratio, precipitation_sum, rain_sum, snowfall_sum, day_type`.
///
/// Absent weather readings become nulls.
pub fn records_frame(records: &[MergedRecord]) -> Result<DataFrame, ExportError> {
    let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    let groups: Vec<&str> = records.iter().map(|r| r.group.as_str()).collect();
    let ratios: Vec<f64> = records.iter().map(|r| r.ratio).collect();
    let field = |select: fn(&MergedRecord) -> Option<f64>| -> Vec<Option<f64>> {
        records.iter().map(select).collect()
    };
    let day_types: Vec<&str> = records.iter().map(|r| r.category.as_str()).collect();

    DataFrame::new(vec![
        Column::new(DATE_COLUMN.into(), dates),
        Column::new(GROUP_COLUMN.into(), groups),
        Column::new(RATIO_COLUMN.into(), ratios),
        Column::new(
            MagnitudeField::Precipitation.column_name().into(),
            field(|r| r.precipitation_sum),
        ),
        Column::new(
            MagnitudeField::Rain.column_name().into(),
            field(|r| r.rain_sum),
        ),
        Column::new(
            MagnitudeField::Snowfall.column_name().into(),
            field(|r| r.snowfall_sum),
        ),
        Column::new(DAY_TYPE_COLUMN.into(), day_types),
    ])
    .map_err(|source| ExportError::Frame {
        table: "records",
        source,
    })
}

/// One row per group, with columns in [`Summary::columns`] order: `group`,
/// each category observed anywhere in the data, then
/// `rain_vs_dry, snow_vs_dry, mixed_vs_dry` when a dry baseline exists.
///
/// A group without records in an observed category holds `0.0` there.
pub fn summary_frame(summary: &Summary) -> Result<DataFrame, ExportError> {
    let groups: Vec<&str> = summary.rows.iter().map(|r| r.group.as_str()).collect();
    let mut columns = vec![Column::new(GROUP_COLUMN.into(), groups)];

    for &category in &summary.categories {
        let means: Vec<f64> = summary.rows.iter().map(|r| r.mean(category)).collect();
        columns.push(Column::new(category.as_str().into(), means));
    }
    if summary.has_baseline() {
        for category in DayCategory::ALL {
            if let Some(name) = category.delta_column() {
                let deltas: Vec<Option<f64>> = summary
                    .rows
                    .iter()
                    .map(|r| r.delta_vs_dry(category))
                    .collect();
                columns.push(Column::new(name.into(), deltas));
            }
        }
    }

    DataFrame::new(columns).map_err(|source| ExportError::Frame {
        table: "summary",
        source,
    })
}

/// Writes `frame` as comma separated text with a header row.
pub fn write_csv(frame: &mut DataFrame, path: &Path) -> Result<(), ExportError> {
    let mut file = File::create(path).map_err(|e| ExportError::Io(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(frame)
        .map_err(|e| ExportError::CsvWrite(path.to_path_buf(), e))?;
    info!("Wrote {} rows to {}", frame.height(), path.display());
    Ok(())
}

fn typed_column(df: &DataFrame, name: &str, dtype: &DataType) -> Result<Column, ExportError> {
    let column = df
        .column(name)
        .map_err(|e| ExportError::ColumnNotFound(name.to_string(), e))?;
    column
        .cast(dtype)
        .map_err(|e| ExportError::ColumnType(name.to_string(), e))
}

/// Loads a file written from [`records_frame`] back into records.
///
/// `date`, `group` and `day_type` are read as text, so group names such as
/// `007` survive unchanged. The `day_type` column is trusted as written; it
/// is not recomputed from the weather columns.
pub fn read_records_csv(path: &Path) -> Result<Vec<MergedRecord>, ExportError> {
    let text_columns: Schema = [DATE_COLUMN, GROUP_COLUMN, DAY_TYPE_COLUMN]
        .into_iter()
        .map(|name| Field::new(name.into(), DataType::String))
        .collect();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(text_columns)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| ExportError::CsvRead(path.to_path_buf(), e))?;

    let dates = typed_column(&df, DATE_COLUMN, &DataType::String)?;
    let groups = typed_column(&df, GROUP_COLUMN, &DataType::String)?;
    let ratios = typed_column(&df, RATIO_COLUMN, &DataType::Float64)?;
    let precipitation = typed_column(
        &df,
        MagnitudeField::Precipitation.column_name(),
        &DataType::Float64,
    )?;
    let rain = typed_column(&df, MagnitudeField::Rain.column_name(), &DataType::Float64)?;
    let snowfall = typed_column(
        &df,
        MagnitudeField::Snowfall.column_name(),
        &DataType::Float64,
    )?;
    let day_types = typed_column(&df, DAY_TYPE_COLUMN, &DataType::String)?;

    let as_str = |c: &Column, name: &str| {
        c.str()
            .cloned()
            .map_err(|e| ExportError::ColumnType(name.to_string(), e))
    };
    let as_f64 = |c: &Column, name: &str| {
        c.f64()
            .cloned()
            .map_err(|e| ExportError::ColumnType(name.to_string(), e))
    };
    let dates = as_str(&dates, DATE_COLUMN)?;
    let groups = as_str(&groups, GROUP_COLUMN)?;
    let ratios = as_f64(&ratios, RATIO_COLUMN)?;
    let precipitation = as_f64(&precipitation, "precipitation_sum")?;
    let rain = as_f64(&rain, "rain_sum")?;
    let snowfall = as_f64(&snowfall, "snowfall_sum")?;
    let day_types = as_str(&day_types, DAY_TYPE_COLUMN)?;

    let missing = |row: usize, column: &'static str| ExportError::InvalidValue {
        row,
        column,
        message: "value is empty".to_string(),
    };

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let date_text = dates.get(row).ok_or_else(|| missing(row, DATE_COLUMN))?;
        let date = NaiveDate::parse_from_str(date_text, API_DATE_FORMAT).map_err(|e| {
            ExportError::InvalidValue {
                row,
                column: DATE_COLUMN,
                message: e.to_string(),
            }
        })?;
        let category = day_types
            .get(row)
            .ok_or_else(|| missing(row, DAY_TYPE_COLUMN))?
            .parse::<DayCategory>()
            .map_err(|e| ExportError::InvalidValue {
                row,
                column: DAY_TYPE_COLUMN,
                message: e.to_string(),
            })?;

        records.push(MergedRecord {
            date,
            group: groups
                .get(row)
                .ok_or_else(|| missing(row, GROUP_COLUMN))?
                .to_string(),
            ratio: ratios.get(row).ok_or_else(|| missing(row, RATIO_COLUMN))?,
            precipitation_sum: precipitation.get(row),
            rain_sum: rain.get(row),
            snowfall_sum: snowfall.get(row),
            category,
        });
    }

    info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}
