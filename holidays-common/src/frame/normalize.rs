use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::Error;

use super::HolidayFrame;

const NESTED_KEY_SEPARATOR: &str = ".";

impl HolidayFrame {
    /// Normalizes a JSON payload into a frame.
    /// ---
    /// Accepts an array of objects (one row each) or a single object
    /// (one row). Nested objects are flattened into `parent.child` columns,
    /// columns appear in first-seen order and keys absent from a record
    /// become empty cells.
    pub fn from_json(payload: &Value) -> Result<Self, Error> {
        let records: Vec<&Map<String, Value>> = match payload {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    item.as_object().ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "Element {} of the payload is a JSON {}, expected an object",
                            idx,
                            json_type_name(item)
                        ))
                    })
                })
                .collect::<Result<_, _>>()?,
            Value::Object(record) => vec![record],
            other => {
                return Err(Error::InvalidInput(format!(
                    "Expected a JSON array or object payload, got a JSON {}",
                    json_type_name(other)
                )));
            }
        };

        let mut columns: Vec<String> = Vec::new();
        let mut column_idx: HashMap<String, usize> = HashMap::new();
        let mut flat_records = Vec::with_capacity(records.len());

        for record in records {
            let mut flat = Vec::new();
            flatten_into(None, record, &mut flat);

            for (name, _) in &flat {
                if !column_idx.contains_key(name) {
                    column_idx.insert(name.clone(), columns.len());
                    columns.push(name.clone());
                }
            }

            flat_records.push(flat);
        }

        let rows = flat_records
            .into_iter()
            .map(|flat| {
                let mut row = vec![String::new(); columns.len()];
                for (name, cell) in flat {
                    if let Some(idx) = column_idx.get(&name) {
                        row[*idx] = cell;
                    }
                }
                row
            })
            .collect();

        Ok(Self { columns, rows })
    }
}

fn flatten_into(prefix: Option<&str>, record: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, value) in record {
        let name = match prefix {
            Some(prefix) => format!("{prefix}{NESTED_KEY_SEPARATOR}{key}"),
            None => key.clone(),
        };

        match value {
            Value::Object(nested) => flatten_into(Some(&name), nested, out),
            scalar => out.push((name, render_cell(scalar))),
        }
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // Arrays stay as compact JSON text in a single cell
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
