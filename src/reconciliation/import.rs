use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::warn;

use super::aliases::{FieldLayout, FieldResolver, LogicalField};
use super::domain::{OrderRecord, RosterEntry};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read {dataset} export: {source}")]
    Io {
        dataset: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {dataset} CSV data: {source}")]
    Csv {
        dataset: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("{dataset} export has no recognizable '{field}' column")]
    MissingColumn {
        dataset: &'static str,
        field: &'static str,
    },
}

pub fn orders_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<OrderRecord>, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        dataset: "orders",
        source,
    })?;
    orders_from_csv(file)
}

pub fn roster_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RosterEntry>, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        dataset: "roster",
        source,
    })?;
    roster_from_csv(file)
}

pub fn orders_from_csv<R: Read>(reader: R) -> Result<Vec<OrderRecord>, ImportError> {
    let (layout, headers, rows) = read_csv("orders", reader)?;
    require(&layout, "orders", &[LogicalField::DriverName, LogicalField::Hub])?;

    Ok(rows
        .iter()
        .map(|row| {
            let cell = |field| cell_at(row, layout.position(field));
            OrderRecord {
                driver_name: cell(LogicalField::DriverName),
                hub: cell(LogicalField::Hub),
                order_number: non_blank(cell(LogicalField::OrderNumber)),
                fields: headers
                    .iter()
                    .zip(row.iter())
                    .map(|(header, value)| (header.clone(), Value::String(value.to_string())))
                    .collect(),
            }
        })
        .collect())
}

pub fn roster_from_csv<R: Read>(reader: R) -> Result<Vec<RosterEntry>, ImportError> {
    let (layout, _, rows) = read_csv("roster", reader)?;
    require(&layout, "roster", &[LogicalField::DriverName, LogicalField::Hub])?;

    Ok(rows
        .iter()
        .map(|row| {
            let cell = |field| cell_at(row, layout.position(field));
            let optional = |field| non_blank(cell(field));
            RosterEntry {
                driver_name: cell(LogicalField::DriverName),
                hub: cell(LogicalField::Hub),
                phone: optional(LogicalField::Phone),
                alternate_phone: optional(LogicalField::AlternatePhone),
                status: optional(LogicalField::Status),
            }
        })
        .collect())
}

/// Converts backend JSON objects into order records. Missing logical fields
/// become empty strings, which leaves the row unmatchable. The object itself
/// is kept verbatim in `fields`.
pub fn orders_from_json(objects: &[Map<String, Value>]) -> Vec<OrderRecord> {
    let mut resolver = FieldResolver::new();

    objects
        .iter()
        .map(|object| {
            let keys = sorted_keys(object);
            let layout = resolver.layout_for(&keys);
            let value_of = |field| json_value(object, &keys, layout.position(field));

            OrderRecord {
                driver_name: value_of(LogicalField::DriverName).unwrap_or_default(),
                hub: value_of(LogicalField::Hub).unwrap_or_default(),
                order_number: value_of(LogicalField::OrderNumber).and_then(non_blank),
                fields: object.clone(),
            }
        })
        .collect()
}

pub fn roster_from_json(objects: &[Map<String, Value>]) -> Vec<RosterEntry> {
    let mut resolver = FieldResolver::new();

    objects
        .iter()
        .map(|object| {
            let keys = sorted_keys(object);
            let layout = resolver.layout_for(&keys);
            let value_of = |field| json_value(object, &keys, layout.position(field));
            let optional = |field| value_of(field).and_then(non_blank);

            RosterEntry {
                driver_name: value_of(LogicalField::DriverName).unwrap_or_default(),
                hub: value_of(LogicalField::Hub).unwrap_or_default(),
                phone: optional(LogicalField::Phone),
                alternate_phone: optional(LogicalField::AlternatePhone),
                status: optional(LogicalField::Status),
            }
        })
        .collect()
}

/// Splits records into those the matcher will consider and those it drops.
pub fn partition_matchable(records: Vec<OrderRecord>) -> (Vec<OrderRecord>, Vec<OrderRecord>) {
    records.into_iter().partition(OrderRecord::is_matchable)
}

fn read_csv<R: Read>(
    dataset: &'static str,
    reader: R,
) -> Result<(FieldLayout, Vec<String>, Vec<csv::StringRecord>), ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|source| ImportError::Csv { dataset, source })?
        .iter()
        .map(str::to_string)
        .collect();
    let layout = FieldLayout::resolve(&headers);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        rows.push(record.map_err(|source| ImportError::Csv { dataset, source })?);
    }

    Ok((layout, headers, rows))
}

fn require(
    layout: &FieldLayout,
    dataset: &'static str,
    fields: &[LogicalField],
) -> Result<(), ImportError> {
    for field in fields {
        if layout.position(*field).is_none() {
            warn!(dataset, field = field.label(), "required column missing from export");
            return Err(ImportError::MissingColumn {
                dataset,
                field: field.label(),
            });
        }
    }
    Ok(())
}

fn cell_at(row: &csv::StringRecord, position: Option<usize>) -> String {
    position
        .and_then(|index| row.get(index))
        .unwrap_or_default()
        .to_string()
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn sorted_keys(object: &Map<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = object.keys().cloned().collect();
    keys.sort();
    keys
}

fn json_value(object: &Map<String, Value>, keys: &[String], position: Option<usize>) -> Option<String> {
    position
        .and_then(|index| keys.get(index))
        .and_then(|key| object.get(key))
        .and_then(stringify)
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}
