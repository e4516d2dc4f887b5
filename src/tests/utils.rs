use crate::config::FeedSettings;
use crate::domain::unit::{ExteriorType, Parking, PropertyType, UnitRecord};
use crate::http::{ApiRequest, HttpReply, Transport, TransportError};
use crate::publish::HostingTarget;
use reqwest::StatusCode;
use serde_json::{json, Number, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;

pub fn reply(status: u16, body: &str) -> HttpReply {
    HttpReply {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub request: ApiRequest,
    pub body: Option<Value>,
}

/// Hands out canned replies in order and records every request.
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<HttpReply>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<HttpReply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    fn answer(
        &self,
        method: &'static str,
        req: &ApiRequest,
        body: Option<&Value>,
    ) -> Result<HttpReply, TransportError> {
        self.calls.borrow_mut().push(RecordedCall {
            method,
            request: req.clone(),
            body: body.cloned(),
        });
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| TransportError(format!("no scripted reply for {method} {}", req.url)))
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, req: &ApiRequest) -> Result<HttpReply, TransportError> {
        self.answer("GET", req, None)
    }

    fn put_json(&self, req: &ApiRequest, body: &Value) -> Result<HttpReply, TransportError> {
        self.answer("PUT", req, Some(body))
    }
}

pub fn sample_feed_settings(raw_dump_path: &Path) -> FeedSettings {
    FeedSettings {
        api_url: "https://miizy.test/miizy/stock".to_string(),
        token: "feed-token".to_string(),
        promoters_per_page: 200,
        estates_per_promoter: 200,
        raw_dump_path: raw_dump_path.to_path_buf(),
        reuse_dump: false,
    }
}

pub fn sample_target() -> HostingTarget {
    HostingTarget {
        api_url: "https://api.github.com".to_string(),
        owner: "acme".to_string(),
        repo: "listings".to_string(),
        path: "out.json".to_string(),
        branch: "main".to_string(),
        token: "hosting-token".to_string(),
        commit_message: "Update out.json via miizy_sync".to_string(),
    }
}

pub fn sample_record(city: &str, price: u64) -> UnitRecord {
    UnitRecord {
        city: city.to_string(),
        postal_code: "N/A".to_string(),
        publication_address: "1 place du Marché".to_string(),
        property_type: PropertyType::Apartment,
        typology: "2 pièces".to_string(),
        floor: json!(1),
        surface_m2: Some(Number::from(45)),
        price: Some(Number::from(price)),
        vat: json!(20),
        parking: Parking::None,
        has_cellar: false,
        primary_exterior_type: ExteriorType::None,
        primary_exterior_surface: None,
        bedroom_count: 1,
        bathroom_count: 1,
        delivery_date: "2026".to_string(),
        promoter_name: "Alpha".to_string(),
        program_name: "Résidence Test".to_string(),
        reference: json!("R1"),
        fiscal_regime: "Accession".to_string(),
        status: json!(0),
    }
}

/// Two promoters with one program each and three units; the middle unit is
/// sold under a fiscal regime that is filtered out.
pub fn two_promoter_feed() -> Value {
    json!({ "original": { "data": [
        { "promoter": { "name": "Bouygues Immobilier", "stock": [
            { "name": "Les Terrasses du Parc",
              "address": { "number": "18", "street": "avenue Foch" },
              "city": { "name": "Paris", "postcode": "75016" },
              "deliv_year": 2026, "deliv_trimestre": 2,
              "properties": [
                { "ref": "LTP-01", "type": 1, "rooms": 4, "floor": 3, "surface": 82.4,
                  "price": 645000, "vat": 20, "parking": 1, "cave": 1,
                  "terrasse": 12, "balcon": 8, "jardin": 12,
                  "fiscality": "Droit Commun", "status": 0 },
                { "ref": "LTP-02", "type": 1, "rooms": 2, "price": 310000,
                  "fiscality": "Pinel", "status": 0 }
              ] }
        ] } },
        { "promoter": { "name": "Kaufman & Broad", "stock": [
            { "name": "Villa Rhône", "city": "Lyon", "deliv_year": "2027",
              "properties": [
                { "ref": "VR-11", "type": 0, "rooms": 1, "surface": "28",
                  "price": "149000", "fiscality": "Accession", "status": 0 }
              ] }
        ] } }
    ] } })
}
