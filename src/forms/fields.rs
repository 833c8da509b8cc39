//! Form field declarations, raw values and client-side validation

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Value};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a field is edited and coerced before it is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Date,
    Bool,
    Choice(&'static [&'static str]),
    /// Global id of another record
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min_length: Option<usize>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            min_length: None,
        }
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    pub const fn min_length(self, min: usize) -> Self {
        Self {
            min_length: Some(min),
            ..self
        }
    }

    /// Coerce one raw value into the JSON sent to the server
    pub fn coerce(&self, raw: &str) -> Result<Value, String> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if self.required {
                return Err("This field is required".to_string());
            }
            return Ok(match self.kind {
                FieldKind::Text | FieldKind::TextArea => Value::String(String::new()),
                FieldKind::Bool => Value::Bool(false),
                FieldKind::Date | FieldKind::Choice(_) | FieldKind::Reference => Value::Null,
            });
        }

        match self.kind {
            FieldKind::Text | FieldKind::TextArea => {
                if let Some(min) = self.min_length {
                    if trimmed.chars().count() < min {
                        return Err(format!("Minimum length is {} characters", min));
                    }
                }
                Ok(Value::String(trimmed.to_string()))
            }
            FieldKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(|date| Value::String(date.format(DATE_FORMAT).to_string()))
                .map_err(|_| "Invalid date (YYYY-MM-DD)".to_string()),
            FieldKind::Bool => parse_bool(trimmed)
                .map(Value::Bool)
                .ok_or_else(|| "Enter yes or no".to_string()),
            FieldKind::Choice(options) => options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(trimmed))
                .map(|option| Value::String(option.to_string()))
                .ok_or_else(|| format!("Choose one of: {}", options.join(", "))),
            FieldKind::Reference => Ok(Value::String(trimmed.to_string())),
        }
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

/// Raw text values keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay `other` on top of these values
    pub fn merge(&mut self, other: FormValues) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Validate every declared field, returning the coerced values by name
pub fn validate(fields: &[FieldSpec], values: &FormValues) -> Result<Map<String, Value>, FieldErrors> {
    let mut coerced = Map::new();
    let mut errors = FieldErrors::default();

    for field in fields {
        match field.coerce(values.get(field.name)) {
            Ok(value) => {
                coerced.insert(field.name.to_string(), value);
            }
            Err(message) => errors.insert(field.name, message),
        }
    }

    if errors.is_empty() {
        Ok(coerced)
    } else {
        Err(errors)
    }
}
