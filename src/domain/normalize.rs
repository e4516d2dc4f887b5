use crate::domain::logic::{text_or_na, ProgramContext};
use crate::domain::UnitRecord;
use crate::feed::models::PromoterEntry;
use crate::feed::LoadError;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Flattens promoters → stock programs → units into records, keeping feed
/// order. A wrong top-level shape aborts; odd unit fields never do.
pub fn normalize(feed: &Value) -> Result<Vec<UnitRecord>, LoadError> {
    let entries = feed["original"]["data"].as_array().ok_or_else(|| {
        LoadError::Shape("original.data missing or not an array".to_string())
    })?;

    let mut records = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let entry = PromoterEntry::deserialize(entry)
            .map_err(|e| LoadError::Shape(format!("promoter entry {index}: {e}")))?;

        let Some(promoter) = entry.promoter else {
            continue;
        };
        let promoter_name = text_or_na(promoter.name.as_ref());

        for program in promoter.stock.iter().flatten() {
            let context = ProgramContext::new(&promoter_name, program);

            for unit in program.properties.iter().flatten() {
                match UnitRecord::from_raw(&context, unit) {
                    Ok(record) => records.push(record),
                    Err(reason) => debug!(
                        promoter = %context.promoter_name,
                        program = %context.program_name,
                        %reason,
                        "unit skipped"
                    ),
                }
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_feed_order_across_promoters_and_programs() {
        let feed = json!({ "original": { "data": [
            { "promoter": { "name": "Alpha", "stock": [
                { "name": "P1", "city": "Lyon", "properties": [
                    { "ref": "a1", "fiscality": "Accession", "status": 0 },
                    { "ref": "a2", "fiscality": "Droit Commun", "status": 0 }
                ]},
                { "name": "P2", "properties": [
                    { "ref": "a3", "fiscality": "Déficit Foncier", "status": 0 }
                ]}
            ]}},
            { "promoter": { "name": "Beta", "stock": [
                { "name": "P3", "properties": [
                    { "ref": "b1", "fiscality": "Accession", "status": 0 }
                ]}
            ]}}
        ]}});

        let refs: Vec<_> = normalize(&feed)
            .unwrap()
            .into_iter()
            .map(|r| (r.promoter_name, r.program_name, r.reference))
            .collect();

        assert_eq!(
            refs,
            vec![
                ("Alpha".to_string(), "P1".to_string(), json!("a1")),
                ("Alpha".to_string(), "P1".to_string(), json!("a2")),
                ("Alpha".to_string(), "P2".to_string(), json!("a3")),
                ("Beta".to_string(), "P3".to_string(), json!("b1")),
            ]
        );
    }

    #[test]
    fn excluded_units_never_reach_the_output() {
        let feed = json!({ "original": { "data": [
            { "promoter": { "name": "Alpha", "stock": [
                { "name": "P1", "properties": [
                    { "ref": 1, "fiscality": "Pinel", "status": 0 },
                    { "ref": 2, "fiscality": "LMNP", "status": 0 },
                    { "ref": 3, "status": 0 },
                    { "ref": 4, "fiscality": "Accession", "status": 1 },
                    { "ref": 5, "fiscality": "Accession", "status": "0" },
                    { "ref": 6, "fiscality": "Accession" },
                    { "ref": 7, "fiscality": "Accession", "status": 0 }
                ]}
            ]}}
        ]}});

        let records = normalize(&feed).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reference, json!(7));
        assert!(records.iter().all(|r| r.status == json!(0)));
    }

    #[test]
    fn null_or_missing_containers_are_empty() {
        let feed = json!({ "original": { "data": [
            {},
            { "promoter": null },
            { "promoter": { "name": "Alpha", "stock": null } },
            { "promoter": { "name": "Beta", "stock": [ { "name": "P", "properties": null } ] } }
        ]}});

        assert!(normalize(&feed).unwrap().is_empty());
    }

    #[test]
    fn program_fields_are_shared_by_its_units() {
        let feed = json!({ "original": { "data": [
            { "promoter": { "stock": [
                { "name": "Le Clos",
                  "address": { "number": "4", "street": "impasse Verte" },
                  "city": { "name": "Paris", "postcode": "75011" },
                  "deliv_year": 2026, "deliv_trimestre": 4,
                  "properties": [ { "fiscality": "Accession", "status": 0 } ] }
            ]}}
        ]}});

        let record = &normalize(&feed).unwrap()[0];

        assert_eq!(record.promoter_name, "N/A");
        assert_eq!(record.program_name, "Le Clos");
        assert_eq!(record.publication_address, "4 impasse Verte");
        assert_eq!(record.city, "Paris");
        assert_eq!(record.postal_code, "75011");
        assert_eq!(record.delivery_date, "T4 2026");
    }

    #[test]
    fn malformed_top_level_is_a_load_error() {
        for feed in [
            json!({}),
            json!({ "original": {} }),
            json!({ "original": { "data": { "promoter": {} } } }),
            json!([]),
        ] {
            assert!(matches!(
                normalize(&feed),
                Err(LoadError::Shape(_))
            ));
        }

        let bad_entry = json!({ "original": { "data": [ { "promoter": { "stock": "none" } } ] } });
        assert!(matches!(
            normalize(&bad_entry),
            Err(LoadError::Shape(_))
        ));
    }
}
