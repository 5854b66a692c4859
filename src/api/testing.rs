//! In-memory catalog used by unit tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::client::CatalogClient;
use super::types::{NamedResource, PageListing, RawCreature, RawSpecies};
use crate::error::{DexError, Result};

const STAT_NAMES: [&str; 6] = [
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];

pub struct FakeCatalog {
    total: usize,
    creatures: HashMap<u32, Value>,
    species: HashMap<u32, Value>,
    failing_creatures: HashSet<u32>,
    failing_species: HashSet<u32>,
    listing_failures: AtomicUsize,
    list_delay: Duration,
    listing_calls: Mutex<Vec<(usize, u32)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeCatalog {
    /// Catalog with records `1..=total`
    pub fn with_records(total: usize) -> Self {
        let mut creatures = HashMap::new();
        let mut species = HashMap::new();

        for id in 1..=total as u32 {
            let stats: Vec<Value> = STAT_NAMES
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    json!({
                        "base_stat": 40 + i as u32 + id,
                        "effort": 0,
                        "stat": {"name": name, "url": "fake://stat/"}
                    })
                })
                .collect();
            creatures.insert(
                id,
                json!({
                    "id": id,
                    "name": format!("creature-{}", id),
                    "species": {"name": format!("creature-{}", id), "url": Self::species_url(id)},
                    "types": [
                        {"slot": 1, "type": {"name": "grass", "url": "fake://type/12/"}},
                        {"slot": 2, "type": {"name": "poison", "url": "fake://type/4/"}}
                    ],
                    "sprites": {"front_default": format!("https://img.example/{}.png", id)},
                    "stats": stats
                }),
            );
            species.insert(
                id,
                json!({
                    "names": [
                        {"name": format!("Creature {}", id), "language": {"name": "en", "url": "fake://language/9/"}},
                        {"name": format!("Kreatur {}", id), "language": {"name": "de", "url": "fake://language/6/"}}
                    ]
                }),
            );
        }

        Self {
            total,
            creatures,
            species,
            failing_creatures: HashSet::new(),
            failing_species: HashSet::new(),
            listing_failures: AtomicUsize::new(0),
            list_delay: Duration::ZERO,
            listing_calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn creature_url(&self, id: u32) -> String {
        format!("fake://catalog/pokemon/{}/", id)
    }

    pub fn species_url(id: u32) -> String {
        format!("fake://catalog/pokemon-species/{}/", id)
    }

    pub fn fail_creature(&mut self, id: u32) {
        self.failing_creatures.insert(id);
    }

    pub fn fail_species(&mut self, id: u32) {
        self.failing_species.insert(id);
    }

    pub fn fail_next_listings(&self, count: usize) {
        self.listing_failures.store(count, Ordering::SeqCst);
    }

    pub fn drop_localization(&mut self, id: u32) {
        if let Some(species) = self.species.get_mut(&id) {
            species["names"] = json!([
                {"name": format!("Creature {}", id), "language": {"name": "en", "url": "fake://language/9/"}}
            ]);
        }
    }

    pub fn clear_types(&mut self, id: u32) {
        if let Some(creature) = self.creatures.get_mut(&id) {
            creature["types"] = json!([]);
        }
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = delay;
        self
    }

    pub fn listing_calls(&self) -> Vec<(usize, u32)> {
        self.listing_calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn id_from_url(url: &str) -> Option<u32> {
        url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
    }

    async fn track<T>(&self, lookup: impl FnOnce() -> Result<T>) -> Result<T> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let result = lookup();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn lookup<T: serde::de::DeserializeOwned>(
        table: &HashMap<u32, Value>,
        failing: &HashSet<u32>,
        url: &str,
    ) -> Result<T> {
        let not_found = || DexError::Http {
            status: 404,
            url: url.to_string(),
        };
        let id = Self::id_from_url(url).ok_or_else(not_found)?;
        if failing.contains(&id) {
            return Err(DexError::ServerError(format!("injected failure for {}", url)));
        }
        let value = table.get(&id).ok_or_else(not_found)?;
        Ok(serde_json::from_value(value.clone())?)
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn list_page(&self, offset: usize, limit: u32) -> Result<PageListing> {
        self.listing_calls.lock().unwrap().push((offset, limit));
        if !self.list_delay.is_zero() {
            tokio::time::sleep(self.list_delay).await;
        }

        let pending = self.listing_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.listing_failures.store(pending - 1, Ordering::SeqCst);
            return Err(DexError::ServerError("injected listing failure".to_string()));
        }

        let end = (offset + limit as usize).min(self.total);
        let results = (offset.min(end)..end)
            .map(|index| {
                let id = index as u32 + 1;
                NamedResource {
                    name: format!("creature-{}", id),
                    url: self.creature_url(id),
                }
            })
            .collect();

        Ok(PageListing {
            count: self.total as u32,
            next: None,
            previous: None,
            results,
        })
    }

    async fn get_creature(&self, url: &str) -> Result<RawCreature> {
        self.track(|| Self::lookup(&self.creatures, &self.failing_creatures, url))
            .await
    }

    async fn get_species(&self, url: &str) -> Result<RawSpecies> {
        self.track(|| Self::lookup(&self.species, &self.failing_species, url))
            .await
    }
}
