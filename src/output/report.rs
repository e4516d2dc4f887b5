use crate::domain::{ExteriorType, UnitRecord};
use std::collections::HashMap;
use std::fmt;

const TOP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBucket {
    Under200k,
    From200kTo400k,
    From400kTo600k,
    Over600k,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 4] = [
        PriceBucket::Under200k,
        PriceBucket::From200kTo400k,
        PriceBucket::From400kTo600k,
        PriceBucket::Over600k,
    ];

    pub fn for_price(price: f64) -> Self {
        if price < 200_000.0 {
            PriceBucket::Under200k
        } else if price < 400_000.0 {
            PriceBucket::From200kTo400k
        } else if price < 600_000.0 {
            PriceBucket::From400kTo600k
        } else {
            PriceBucket::Over600k
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::Under200k => "0-200k",
            PriceBucket::From200kTo400k => "200k-400k",
            PriceBucket::From400kTo600k => "400k-600k",
            PriceBucket::Over600k => "600k+",
        }
    }
}

/// Aggregates over a finished record list. Computed once, printed once.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub top_cities: Vec<(String, usize)>,
    pub top_promoters: Vec<(String, usize)>,
    pub by_type: Vec<(String, usize)>,
    pub price_buckets: [(PriceBucket, usize); 4],
    pub by_exterior: Vec<(String, usize)>,
    pub with_exterior: usize,
    pub average_exterior_surface: Option<f64>,
}

impl Statistics {
    pub fn compute(records: &[UnitRecord]) -> Self {
        let mut top_cities = rank(records.iter().map(|r| r.city.clone()));
        top_cities.truncate(TOP);

        let mut top_promoters = rank(records.iter().map(|r| r.promoter_name.clone()));
        top_promoters.truncate(TOP);

        let by_type = rank(records.iter().map(|r| r.property_type.to_string()));

        let mut price_buckets = PriceBucket::ALL.map(|bucket| (bucket, 0));
        for price in records.iter().filter_map(|r| r.price.as_ref()?.as_f64()) {
            let bucket = PriceBucket::for_price(price);
            if let Some(slot) = price_buckets.iter_mut().find(|(b, _)| *b == bucket) {
                slot.1 += 1;
            }
        }

        let with_exterior: Vec<&UnitRecord> = records
            .iter()
            .filter(|r| r.primary_exterior_type != ExteriorType::None)
            .collect();
        let by_exterior = rank(
            with_exterior
                .iter()
                .map(|r| r.primary_exterior_type.label().to_string()),
        );
        let surfaces: Vec<f64> = with_exterior
            .iter()
            .filter_map(|r| r.primary_exterior_surface)
            .collect();
        let average_exterior_surface =
            (!surfaces.is_empty()).then(|| surfaces.iter().sum::<f64>() / surfaces.len() as f64);

        Statistics {
            total: records.len(),
            top_cities,
            top_promoters,
            by_type,
            price_buckets,
            by_exterior,
            with_exterior: with_exterior.len(),
            average_exterior_surface,
        }
    }
}

/// Counts per key, most frequent first. Equal counts keep the order in
/// which keys were first seen.
fn rank(keys: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n📈 STATISTICS ({} units):", self.total)?;
        writeln!(f, "{}", "=".repeat(30))?;

        writeln!(f, "\n🏙️ Top {TOP} cities:")?;
        for (city, count) in &self.top_cities {
            writeln!(f, "   - {city}: {count} units")?;
        }

        writeln!(f, "\n🏢 Top {TOP} promoters:")?;
        for (promoter, count) in &self.top_promoters {
            writeln!(f, "   - {promoter}: {count} units")?;
        }

        writeln!(f, "\n🏠 By property type:")?;
        for (kind, count) in &self.by_type {
            writeln!(f, "   - {kind}: {count} units")?;
        }

        writeln!(f, "\n💰 By price range:")?;
        for (bucket, count) in self.price_buckets.iter().filter(|(_, c)| *c > 0) {
            writeln!(f, "   - {}: {count} units", bucket.label())?;
        }

        writeln!(f, "\n🌿 By main exterior ({} units with one):", self.with_exterior)?;
        for (kind, count) in &self.by_exterior {
            writeln!(f, "   - {kind}: {count} units")?;
        }
        if let Some(avg) = self.average_exterior_surface {
            writeln!(f, "   average surface: {avg:.1} m²")?;
        }

        Ok(())
    }
}
