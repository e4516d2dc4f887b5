use serde::Deserialize;
use serde_json::{Map, Value};

// original
//  └── data[]
//       └── promoter
//            ├── name
//            └── stock[]
//                 ├── name
//                 ├── address           { number, street }
//                 ├── city              { name, postcode } | "name"
//                 ├── deliv_year
//                 ├── deliv_trimestre
//                 └── properties[]
//                      ├── ref, type, rooms, floor, surface
//                      ├── price, vat, parking, cave
//                      ├── terrasse, balcon, balcon_2, jardin, loggia
//                      └── fiscality, status
//
// Leaves stay as raw JSON values: the upstream mixes numbers, strings and
// nulls for the same field, and each one is coerced on its own later.

#[derive(Debug, Deserialize)]
pub struct PromoterEntry {
    pub promoter: Option<Promoter>,
}

#[derive(Debug, Deserialize)]
pub struct Promoter {
    pub name: Option<Value>,
    pub stock: Option<Vec<Program>>,
}

#[derive(Debug, Deserialize)]
pub struct Program {
    pub name: Option<Value>,
    pub address: Option<Value>,
    pub city: Option<Value>,
    pub deliv_year: Option<Value>,
    pub deliv_trimestre: Option<Value>,
    pub properties: Option<Vec<RawUnit>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawUnit {
    #[serde(rename = "ref")]
    pub reference: Option<Value>,
    #[serde(rename = "type")]
    pub type_code: Option<Value>,
    pub rooms: Option<Value>,
    pub floor: Option<Value>,
    pub surface: Option<Value>,
    pub price: Option<Value>,
    pub vat: Option<Value>,
    pub parking: Option<Value>,
    pub cave: Option<Value>,

    pub fiscality: Option<Value>,
    pub status: Option<Value>,

    /// Everything else, exterior surfaces included (see `logic::EXTERIORS`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawUnit {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
