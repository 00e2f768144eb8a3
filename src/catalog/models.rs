use serde::{Deserialize, Deserializer, Serialize};

use super::CatalogEntity;

/// Accept a price as either a JSON number or a numeric string; the admin
/// front-end sends both depending on the form path.
pub fn price_from_json<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }
    match Raw::deserialize(de)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub fn opt_price_from_json<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "price_from_json")] f64);
    Ok(Option::<Wrap>::deserialize(de)?.map(|w| w.0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(rename = "priceUSD", deserialize_with = "price_from_json")]
    pub price_usd: f64,
    #[serde(rename = "priceINR", deserialize_with = "price_from_json")]
    pub price_inr: f64,
}

impl CatalogEntity for Product {
    const FILE_NAME: &'static str = "products.json";

    fn id(&self) -> u64 { self.id }
    fn assign_id(&mut self, id: u64) { self.id = id; }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(rename = "priceINR", deserialize_with = "price_from_json")]
    pub price_inr: f64,
    #[serde(rename = "videoLink", default)]
    pub video_link: String,
}

impl CatalogEntity for Membership {
    const FILE_NAME: &'static str = "memberships.json";

    fn id(&self) -> u64 { self.id }
    fn assign_id(&mut self, id: u64) { self.id = id; }

    /// Fixed plans: id and name never change after seeding, only priceINR
    /// and videoLink are admin-editable.
    fn seed() -> Vec<Self> {
        vec![
            Membership { id: 1, name: "Basic".into(), price_inr: 999.0, video_link: String::new() },
            Membership { id: 2, name: "Standard".into(), price_inr: 1999.0, video_link: String::new() },
            Membership { id: 3, name: "Premium".into(), price_inr: 2999.0, video_link: String::new() },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: String,
}

impl CatalogEntity for Video {
    const FILE_NAME: &'static str = "videos.json";

    fn id(&self) -> u64 { self.id }
    fn assign_id(&mut self, id: u64) { self.id = id; }
}
