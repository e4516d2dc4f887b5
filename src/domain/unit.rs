// src/domain/unit.rs

use crate::domain::logic::{self, ProgramContext, NOT_AVAILABLE};
use crate::feed::models::RawUnit;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;

/// One sellable unit, flattened out of promoter → program → unit and
/// normalized into the published field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub city: String,
    pub postal_code: String,
    pub publication_address: String,
    pub property_type: PropertyType,
    pub typology: String,
    pub floor: Value,
    #[serde(with = "na")]
    pub surface_m2: Option<Number>,
    #[serde(with = "na")]
    pub price: Option<Number>,
    pub vat: Value,
    pub parking: Parking,
    #[serde(with = "yes_no")]
    pub has_cellar: bool,
    pub primary_exterior_type: ExteriorType,
    #[serde(with = "na")]
    pub primary_exterior_surface: Option<f64>,
    pub bedroom_count: u32,
    pub bathroom_count: u32,
    pub delivery_date: String,
    pub promoter_name: String,
    pub program_name: String,
    pub reference: Value,
    pub fiscal_regime: String,
    pub status: Value,
}

/// Why a unit was left out of the output. Not an error: filtered units are
/// simply skipped.
#[derive(Debug, PartialEq)]
pub enum Exclusion {
    FiscalRegime(Option<Value>),
    Status(Option<Value>),
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::FiscalRegime(v) => write!(f, "fiscal regime {v:?} not allowed"),
            Exclusion::Status(v) => write!(f, "status {v:?} is not 0"),
        }
    }
}

impl UnitRecord {
    /// Applies the inclusion filters, then derives every output field.
    /// Field derivation never fails; odd upstream values become "N/A" or zero.
    pub fn from_raw(program: &ProgramContext, unit: &RawUnit) -> Result<Self, Exclusion> {
        let fiscal_regime = logic::allowed_fiscal_regime(unit.fiscality.as_ref())
            .ok_or_else(|| Exclusion::FiscalRegime(unit.fiscality.clone()))?;

        if !logic::is_available(unit.status.as_ref()) {
            return Err(Exclusion::Status(unit.status.clone()));
        }

        let rooms = logic::room_count(unit.rooms.as_ref());
        let (primary_exterior_type, primary_exterior_surface) = logic::primary_exterior(unit);

        Ok(UnitRecord {
            city: program.city.clone(),
            postal_code: program.postal_code.clone(),
            publication_address: program.publication_address.clone(),
            property_type: logic::property_type(unit.type_code.as_ref()),
            typology: logic::typology(unit.rooms.as_ref()),
            floor: logic::passthrough(unit.floor.as_ref()),
            surface_m2: logic::number_or_na(unit.surface.as_ref()),
            price: logic::number_or_na(unit.price.as_ref()),
            vat: logic::passthrough(unit.vat.as_ref()),
            parking: logic::parking(unit.parking.as_ref()),
            has_cellar: logic::is_truthy(unit.cave.as_ref()),
            primary_exterior_type,
            primary_exterior_surface,
            bedroom_count: logic::bedroom_count(rooms),
            bathroom_count: logic::bathroom_count(rooms),
            delivery_date: program.delivery_date.clone(),
            promoter_name: program.promoter_name.clone(),
            program_name: program.program_name.clone(),
            reference: logic::passthrough(unit.reference.as_ref()),
            fiscal_regime: fiscal_regime.to_string(),
            status: logic::passthrough(unit.status.as_ref()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyType {
    House,
    Apartment,
    /// Any other upstream code, rendered as `Type-<code>`.
    Coded(String),
    NotAvailable,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::House => f.write_str("House"),
            PropertyType::Apartment => f.write_str("Apartment"),
            PropertyType::Coded(code) => write!(f, "Type-{code}"),
            PropertyType::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for PropertyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(match label.as_str() {
            "House" => PropertyType::House,
            "Apartment" => PropertyType::Apartment,
            NOT_AVAILABLE => PropertyType::NotAvailable,
            other => match other.strip_prefix("Type-") {
                Some(code) => PropertyType::Coded(code.to_string()),
                None => {
                    return Err(de::Error::invalid_value(
                        de::Unexpected::Str(other),
                        &"House, Apartment, Type-<code> or N/A",
                    ))
                }
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parking {
    None,
    Spaces(u32),
}

impl fmt::Display for Parking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parking::None | Parking::Spaces(0) => f.write_str("None"),
            Parking::Spaces(1) => f.write_str("1 space"),
            Parking::Spaces(n) => write!(f, "{n} spaces"),
        }
    }
}

impl Serialize for Parking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Parking {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        if label == "None" {
            return Ok(Parking::None);
        }

        label
            .strip_suffix(" spaces")
            .or_else(|| label.strip_suffix(" space"))
            .and_then(|n| n.parse::<u32>().ok())
            .map(Parking::Spaces)
            .ok_or_else(|| {
                de::Error::invalid_value(de::Unexpected::Str(&label), &"None or \"<n> space(s)\"")
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExteriorType {
    Terrace,
    Balcony,
    #[serde(rename = "Balcony-2")]
    Balcony2,
    Garden,
    Loggia,
    None,
}

impl ExteriorType {
    pub fn label(self) -> &'static str {
        match self {
            ExteriorType::Terrace => "Terrace",
            ExteriorType::Balcony => "Balcony",
            ExteriorType::Balcony2 => "Balcony-2",
            ExteriorType::Garden => "Garden",
            ExteriorType::Loggia => "Loggia",
            ExteriorType::None => "None",
        }
    }
}

/// `Option<T>` as either the value itself or the string "N/A".
mod na {
    use super::NOT_AVAILABLE;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OrMarker<T> {
        Value(T),
        Marker(String),
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        match OrMarker::<T>::deserialize(deserializer)? {
            OrMarker::Value(v) => Ok(Some(v)),
            OrMarker::Marker(_) => Ok(None),
        }
    }
}

mod yes_no {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "Yes" } else { "No" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let label = String::deserialize(deserializer)?;
        match label.as_str() {
            "Yes" => Ok(true),
            "No" => Ok(false),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &"Yes or No",
            )),
        }
    }
}
