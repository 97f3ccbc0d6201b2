use std::{collections::BTreeMap, fmt};

use maud::{html, Markup, Render};
use serde::Deserialize;
use serde_json::{Number, Value};

/// Scalar count for one title. Arrays and nested objects are not counts.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Value")]
pub struct EntryCount(Value);

impl TryFrom<Value> for EntryCount {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(_) | Value::Object(_) => {
                Err(format!("expected a scalar entry count, got {value}"))
            }
            scalar => Ok(Self(scalar)),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, number: &Number) -> fmt::Result {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e21 => {
            // 1.0 and 1e2 are whole counts; -0.0 prints as 0
            write!(f, "{:.0}", float + 0.0)
        }
        _ => write!(f, "{number}"),
    }
}

impl fmt::Display for EntryCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Number(number) => write_number(f, number),
            Value::String(text) => f.write_str(text),
            other => write!(f, "{other}"),
        }
    }
}

impl Render for EntryCount {
    fn render(&self) -> Markup {
        html! { (self.to_string()) }
    }
}

pub type SearchResponse = BTreeMap<String, EntryCount>;

pub fn parse(body: &str) -> Result<SearchResponse, serde_json::Error> {
    serde_json::from_str(body)
}
