// src/domain/logic.rs

//! Field derivation rules. Every function here is total: missing, null,
//! empty or unparsable upstream values map to "N/A" or zero.

use crate::domain::unit::{ExteriorType, Parking, PropertyType};
use crate::feed::models::{Program, RawUnit};
use serde_json::{Number, Value};

pub const NOT_AVAILABLE: &str = "N/A";

/// Only units sold under one of these tax schemes are published.
pub const ALLOWED_FISCAL_REGIMES: [&str; 3] = ["Accession", "Déficit Foncier", "Droit Commun"];

/// Upstream key and label of every exterior. Declaration order decides ties
/// between exteriors of equal surface.
pub const EXTERIORS: [(&str, ExteriorType); 5] = [
    ("terrasse", ExteriorType::Terrace),
    ("balcon", ExteriorType::Balcony),
    ("balcon_2", ExteriorType::Balcony2),
    ("jardin", ExteriorType::Garden),
    ("loggia", ExteriorType::Loggia),
];

/// Values shared by every unit of one stock program.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramContext {
    pub promoter_name: String,
    pub program_name: String,
    pub city: String,
    pub postal_code: String,
    pub publication_address: String,
    pub delivery_date: String,
}

impl ProgramContext {
    pub fn new(promoter_name: &str, program: &Program) -> Self {
        let (city, postal_code) = city_and_postcode(program.city.as_ref());

        ProgramContext {
            promoter_name: promoter_name.to_string(),
            program_name: text_or_na(program.name.as_ref()),
            city,
            postal_code,
            publication_address: publication_address(program.address.as_ref()),
            delivery_date: delivery_date(
                program.deliv_year.as_ref(),
                program.deliv_trimestre.as_ref(),
            ),
        }
    }
}

/// Parse-or-default: numbers pass through, numeric strings are parsed,
/// anything else is 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Text rendering of a scalar, or `None` when it is missing, null, an empty
/// string, zero or false.
pub fn present_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => (n.as_f64() != Some(0.0)).then(|| n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Like `present_text`, but a literal zero is still a value.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        other => present_text(Some(other)),
    }
}

pub fn text_or_na(value: Option<&Value>) -> String {
    scalar_text(value).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            !s.is_empty() && s != "0"
        }
        _ => false,
    }
}

/// Keeps the upstream value as-is unless it is missing or blank.
pub fn passthrough(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::String(NOT_AVAILABLE.to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => Value::String(NOT_AVAILABLE.to_string()),
        Some(v) => v.clone(),
    }
}

pub fn number_or_na(value: Option<&Value>) -> Option<Number> {
    match value? {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => serde_json::from_str::<Number>(s.trim()).ok(),
        _ => None,
    }
}

pub fn city_and_postcode(city: Option<&Value>) -> (String, String) {
    match city {
        Some(Value::Object(fields)) => (
            text_or_na(fields.get("name")),
            text_or_na(fields.get("postcode")),
        ),
        Some(scalar @ (Value::String(_) | Value::Number(_))) => {
            (text_or_na(Some(scalar)), NOT_AVAILABLE.to_string())
        }
        _ => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
    }
}

pub fn publication_address(address: Option<&Value>) -> String {
    let joined = match address {
        Some(Value::Object(fields)) => {
            let number = scalar_text(fields.get("number")).unwrap_or_default();
            let street = scalar_text(fields.get("street")).unwrap_or_default();
            format!("{number} {street}")
        }
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };

    let trimmed = joined.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// "T<quarter> <year>", or just the year, or "N/A" without a year.
pub fn delivery_date(year: Option<&Value>, quarter: Option<&Value>) -> String {
    match (present_text(year), present_text(quarter)) {
        (Some(year), Some(quarter)) => format!("T{quarter} {year}"),
        (Some(year), None) => year,
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn allowed_fiscal_regime(value: Option<&Value>) -> Option<&'static str> {
    let regime = value?.as_str()?;
    ALLOWED_FISCAL_REGIMES
        .iter()
        .copied()
        .find(|allowed| *allowed == regime)
}

/// Literal equality with numeric 0. Other status codes are not interpreted.
pub fn is_available(status: Option<&Value>) -> bool {
    matches!(status, Some(Value::Number(n)) if n.as_f64() == Some(0.0))
}

fn integral_code(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn property_type(code: Option<&Value>) -> PropertyType {
    match integral_code(code) {
        Some(0) => PropertyType::House,
        Some(1) => PropertyType::Apartment,
        _ => match present_text(code) {
            Some(code) => PropertyType::Coded(code),
            None => PropertyType::NotAvailable,
        },
    }
}

pub fn parking(value: Option<&Value>) -> Parking {
    let spaces = coerce_number(value);
    if spaces < 1.0 {
        Parking::None
    } else {
        Parking::Spaces(spaces.min(u32::MAX as f64) as u32)
    }
}

pub fn room_count(rooms: Option<&Value>) -> i64 {
    coerce_number(rooms) as i64
}

pub fn typology(rooms: Option<&Value>) -> String {
    match present_text(rooms) {
        Some(rooms) => format!("{rooms} pièces"),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn bedroom_count(rooms: i64) -> u32 {
    match rooms {
        i64::MIN..=1 => 0,
        2 => 1,
        n => u32::try_from(n - 1).unwrap_or(u32::MAX),
    }
}

/// Coarse estimate: one bathroom up to three rooms, two from four rooms on.
pub fn bathroom_count(rooms: i64) -> u32 {
    if rooms <= 3 {
        1
    } else {
        2
    }
}

/// Largest positive exterior wins; among equal surfaces the first one in
/// `EXTERIORS` is kept.
pub fn primary_exterior(unit: &RawUnit) -> (ExteriorType, Option<f64>) {
    let mut best: Option<(ExteriorType, f64)> = None;

    for (key, kind) in EXTERIORS {
        let surface = coerce_number(unit.field(key));
        if surface <= 0.0 {
            continue;
        }
        match best {
            Some((_, max)) if surface <= max => {}
            _ => best = Some((kind, surface)),
        }
    }

    match best {
        Some((kind, surface)) => (kind, Some(surface)),
        None => (ExteriorType::None, None),
    }
}
