//! Record types decoded from the catalog service
//!
//! The service returns far larger documents than the CLI needs; only the fields
//! below are decoded and everything else is ignored.

pub mod client;
pub mod pagination;

pub use client::{CatalogClient, CatalogError, PayloadOrigin, DEFAULT_BASE_URL};
pub use pagination::{NextPage, PaginationCursor};

use serde::{Deserialize, Deserializer, Serialize};

/// A `{name, url}` reference to another catalog resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of the location-area collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPage {
    /// Total number of location areas in the collection
    #[serde(default)]
    pub count: u32,
    /// Link to the following page, `None` on the last page
    #[serde(default)]
    pub next: Option<String>,
    /// Link to the preceding page
    ///
    /// Only a JSON string counts as a link; `null`, a missing field or any other
    /// value decodes to `None`.
    #[serde(default, deserialize_with = "string_link")]
    pub previous: Option<String>,
    /// Location areas on this page
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// Detail record for a single location area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationArea {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    /// Creatures that can be encountered in this area
    #[serde(default)]
    pub pokemon_encounters: Vec<Encounter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub pokemon: NamedResource,
}

/// Detail record for a single creature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    /// Experience gained for defeating it; also drives how hard it is to catch
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Height in decimetres
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub stats: Vec<CreatureStat>,
    #[serde(default)]
    pub types: Vec<CreatureType>,
}

/// A base stat value such as `hp` or `speed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureStat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

/// One of a creature's elemental types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureType {
    #[serde(default)]
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

impl LocationArea {
    /// Names of every creature encountered in the area, in service order
    pub fn encounter_names(&self) -> impl Iterator<Item = &str> {
        self.pokemon_encounters
            .iter()
            .map(|encounter| encounter.pokemon.name.as_str())
    }
}

/// Accepts any JSON value and keeps it only if it is a string
fn string_link<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(link)) => Some(link),
        _ => None,
    })
}
