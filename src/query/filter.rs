//! Filter descriptor parsing
//!
//! Clients constrain listing queries with a sequence of serialized
//! descriptors, each a `{field, operator, value}` triple. This module
//! decodes and validates them into [`FilterDescriptor`] values; nothing
//! outside the closed [`FilterOp`] set or the filterable field set makes it
//! past this boundary.

use serde_json::Value;

use crate::core::FilterError;

/// Comparison operators recognized in filter descriptors
///
/// Exactly two operators exist in the present design; anything else is
/// rejected at parse time rather than silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `>=` — lower bound, inclusive
    Gte,
    /// `<=` — upper bound, inclusive
    Lte,
}

impl FilterOp {
    /// Resolve a wire-format operator symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">=" => Some(FilterOp::Gte),
            "<=" => Some(FilterOp::Lte),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }
}

/// Numeric apartment attributes that can appear in a filter descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Price,
    Sqm,
    NumberBedrooms,
    NumberBathrooms,
}

impl NumericField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "price" => Some(NumericField::Price),
            "sqm" => Some(NumericField::Sqm),
            "number_bedrooms" => Some(NumericField::NumberBedrooms),
            "number_bathrooms" => Some(NumericField::NumberBathrooms),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NumericField::Price => "price",
            NumericField::Sqm => "sqm",
            NumericField::NumberBedrooms => "number_bedrooms",
            NumericField::NumberBathrooms => "number_bathrooms",
        }
    }
}

/// A validated filter descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDescriptor {
    pub field: NumericField,
    pub op: FilterOp,
    pub value: f64,
}

/// Parse the raw `filters` query parameter into validated descriptors
///
/// Accepts a JSON array whose elements are descriptor objects or
/// JSON-encoded descriptor strings (clients historically encode each
/// element separately), or a single bare descriptor object.
pub fn parse_filters(raw: &str) -> Result<Vec<FilterDescriptor>, FilterError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| FilterError::Malformed {
        message: e.to_string(),
    })?;

    let elements = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => {
            return Err(FilterError::Malformed {
                message: format!("expected a descriptor array, got {}", type_name(&other)),
            });
        }
    };

    elements.into_iter().map(descriptor_from_value).collect()
}

fn descriptor_from_value(value: Value) -> Result<FilterDescriptor, FilterError> {
    let value = match value {
        Value::String(encoded) => {
            serde_json::from_str(&encoded).map_err(|e| FilterError::Malformed {
                message: e.to_string(),
            })?
        }
        other => other,
    };

    let descriptor = value.as_object().ok_or_else(|| FilterError::Malformed {
        message: format!("expected a descriptor object, got {}", type_name(&value)),
    })?;

    let field_name =
        descriptor
            .get("field")
            .and_then(Value::as_str)
            .ok_or_else(|| FilterError::Malformed {
                message: "descriptor is missing 'field'".to_string(),
            })?;
    let field = NumericField::from_name(field_name).ok_or_else(|| FilterError::UnknownField {
        field: field_name.to_string(),
    })?;

    let operator =
        descriptor
            .get("operator")
            .and_then(Value::as_str)
            .ok_or_else(|| FilterError::Malformed {
                message: "descriptor is missing 'operator'".to_string(),
            })?;
    let op = FilterOp::from_symbol(operator).ok_or_else(|| FilterError::UnknownOperator {
        operator: operator.to_string(),
    })?;

    let value = numeric_value(descriptor.get("value"), field_name)?;

    Ok(FilterDescriptor { field, op, value })
}

/// Coerce a descriptor value to a number
///
/// Numbers pass through; strings are parsed (the form layer is stringly
/// typed). An absent, empty, or non-numeric value is a client error.
fn numeric_value(value: Option<&Value>, field: &str) -> Result<f64, FilterError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| FilterError::NonNumericValue {
        field: field.to_string(),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
