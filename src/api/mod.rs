pub mod client;
pub mod fetcher;
pub mod http_client;
pub mod pokeapi;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{CatalogClient, ClientConfig};
pub use fetcher::RecordFetcher;
pub use pokeapi::PokeApiClient;
