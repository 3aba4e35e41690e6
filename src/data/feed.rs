//! NASA NeoWs feed payload as received
//!
//! The upstream schema is loose: numeric values arrive as strings, fields go
//! missing, and the occasional entry is `null`. Every field here is optional
//! and scalars are read leniently, so a single odd value degrades to "absent"
//! instead of rejecting the whole payload.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level response of `GET /neo/rest/v1/feed`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedResponse {
    /// Pagination links (unused)
    #[serde(default)]
    pub links: Option<Value>,
    /// Total number of objects across all dates
    #[serde(default, deserialize_with = "lenient_i64")]
    pub element_count: Option<i64>,
    /// Objects grouped by approach date (`YYYY-MM-DD`)
    #[serde(default, deserialize_with = "lenient_date_map")]
    pub near_earth_objects: Option<BTreeMap<String, Vec<NeoObject>>>,
}

impl FeedResponse {
    /// Builds a feed holding `objects` under a single date key
    pub fn for_date(date_key: impl Into<String>, objects: Vec<NeoObject>) -> Self {
        let mut grouped = BTreeMap::new();
        grouped.insert(date_key.into(), objects);
        Self {
            links: None,
            element_count: None,
            near_earth_objects: Some(grouped),
        }
    }

    /// Objects listed under `date_key`, if any
    pub fn objects_for(&self, date_key: &str) -> Option<&[NeoObject]> {
        self.near_earth_objects
            .as_ref()?
            .get(date_key)
            .map(Vec::as_slice)
    }
}

/// A single near-Earth object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeoObject {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nasa_jpl_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub absolute_magnitude_h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_potentially_hazardous_asteroid: Option<bool>,
    #[serde(default, deserialize_with = "lenient_struct")]
    pub estimated_diameter: Option<EstimatedDiameter>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub close_approach_data: Vec<CloseApproach>,
}

/// Diameter estimates in several units; only meters is read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimatedDiameter {
    #[serde(default, deserialize_with = "lenient_struct")]
    pub meters: Option<DiameterRange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiameterRange {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub estimated_diameter_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub estimated_diameter_max: Option<f64>,
}

/// One predicted or observed close approach
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloseApproach {
    /// Approach date, `YYYY-MM-DD`
    #[serde(default, deserialize_with = "lenient_string")]
    pub close_approach_date: Option<String>,
    /// Approach time, e.g. `2026-Feb-01 13:45`
    #[serde(default, deserialize_with = "lenient_string")]
    pub close_approach_date_full: Option<String>,
    /// Approach instant in epoch milliseconds
    #[serde(default, deserialize_with = "lenient_i64")]
    pub epoch_date_close_approach: Option<i64>,
    #[serde(default, deserialize_with = "lenient_struct")]
    pub relative_velocity: Option<Velocity>,
    #[serde(default, deserialize_with = "lenient_struct")]
    pub miss_distance: Option<MissDistance>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub orbiting_body: Option<String>,
}

/// Relative velocity, numeric text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Velocity {
    #[serde(default, deserialize_with = "lenient_string")]
    pub kilometers_per_second: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub kilometers_per_hour: Option<String>,
}

/// Miss distance, numeric text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MissDistance {
    #[serde(default, deserialize_with = "lenient_string")]
    pub astronomical: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lunar: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub kilometers: Option<String>,
}

/// Text or number, kept as text
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_struct<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Array of objects; `null` and non-object entries are skipped
fn lenient_list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => collect_objects(items),
        _ => Vec::new(),
    })
}

fn lenient_date_map<'de, D>(d: D) -> Result<Option<BTreeMap<String, Vec<NeoObject>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Object(map)) => Some(
            map.into_iter()
                .map(|(date, objects)| {
                    let objects = match objects {
                        Value::Array(items) => collect_objects(items),
                        _ => Vec::new(),
                    };
                    (date, objects)
                })
                .collect(),
        ),
        _ => None,
    })
}

fn collect_objects<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}
