use std::sync::Arc;

use dexview::api::{ClientConfig, PokeApiClient, RecordFetcher};
use dexview::cache::key::CacheKeyGenerator;
use dexview::cache::{CacheConfig, CacheStore};
use dexview::catalog::{
    CategoryResolver, CollectionStore, Direction, PageSizes, PaginationController, ViewCoordinator,
};
use dexview::cli::OutputFormat;
use dexview::output::TerminalRenderer;
use mockito::{Matcher, Mock, Server, ServerGuard};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

type View = ViewCoordinator<TerminalRenderer<Vec<u8>>>;

fn listing_url(server: &ServerGuard) -> String {
    format!("{}/api/v2/pokemon/", server.url())
}

fn creature_url(server: &ServerGuard, id: u32) -> String {
    format!("{}/api/v2/pokemon/{}/", server.url(), id)
}

/// Listing page mock for `offset`/`limit` returning `ids`
async fn mount_listing(
    server: &mut ServerGuard,
    offset: usize,
    limit: u32,
    ids: impl IntoIterator<Item = u32>,
) -> Mock {
    let results: Vec<_> = ids
        .into_iter()
        .map(|id| json!({ "name": format!("creature-{}", id), "url": creature_url(server, id) }))
        .collect();
    let body = json!({ "count": 1000, "next": null, "previous": null, "results": results });

    server
        .mock("GET", "/api/v2/pokemon/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".to_string(), offset.to_string()),
            Matcher::UrlEncoded("limit".to_string(), limit.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// Creature + species mocks for one record
async fn mount_creature(server: &mut ServerGuard, id: u32) -> Vec<Mock> {
    let creature = json!({
        "id": id,
        "name": format!("creature-{}", id),
        "species": {
            "name": format!("creature-{}", id),
            "url": format!("{}/api/v2/pokemon-species/{}/", server.url(), id)
        },
        "types": [
            { "slot": 1, "type": { "name": "fire", "url": "" } },
            { "slot": 2, "type": { "name": "flying", "url": "" } }
        ],
        "sprites": { "front_default": format!("https://img.example/{}.png", id) },
        "stats": [
            { "base_stat": 39, "stat": { "name": "hp", "url": "" } },
            { "base_stat": 52, "stat": { "name": "attack", "url": "" } }
        ]
    });
    let species = json!({
        "names": [
            { "name": format!("Creature {}", id), "language": { "name": "en", "url": "" } },
            { "name": format!("Kreatur {}", id), "language": { "name": "de", "url": "" } }
        ]
    });

    let creature_mock = server
        .mock("GET", format!("/api/v2/pokemon/{}/", id).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(creature.to_string())
        .create_async()
        .await;
    let species_mock = server
        .mock("GET", format!("/api/v2/pokemon-species/{}/", id).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(species.to_string())
        .create_async()
        .await;
    vec![creature_mock, species_mock]
}

fn view_for(
    server: &ServerGuard,
    store: CollectionStore,
    sizes: PageSizes,
    concurrency: usize,
    format: OutputFormat,
) -> View {
    let client = PokeApiClient::new(ClientConfig {
        base_url: listing_url(server),
        max_retries: 1,
        retry_base_delay: 1,
        ..Default::default()
    })
    .unwrap();
    let fetcher = RecordFetcher::new(Arc::new(client), CategoryResolver::new("de"))
        .with_concurrency(concurrency);

    ViewCoordinator::new(
        store,
        PaginationController::new(fetcher),
        TerminalRenderer::new(Vec::new(), format),
        sizes,
    )
}

fn output(view: &View) -> String {
    String::from_utf8(view.renderer().get_ref().clone()).unwrap()
}

fn ids(view: &mut View) -> Vec<u32> {
    view.records().iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn test_cold_start_skips_failed_record() {
    let mut server = Server::new_async().await;
    let _listing = mount_listing(&mut server, 0, 5, 1..=5).await;
    let mut mocks = Vec::new();
    for id in [1, 2, 4, 5] {
        mocks.extend(mount_creature(&mut server, id).await);
    }
    let _missing = server
        .mock("GET", "/api/v2/pokemon/3/")
        .with_status(404)
        .create_async()
        .await;

    let sizes = PageSizes { initial: 5, more: 2 };
    let mut view = view_for(&server, CollectionStore::in_memory(), sizes, 1, OutputFormat::Csv);

    assert_eq!(view.init().await, 4);
    assert_eq!(ids(&mut view), vec![1, 2, 4, 5]);

    let record = &view.records()[0];
    assert_eq!(record.localized_name.as_deref(), Some("Kreatur 1"));
    assert_eq!(record.categories, vec!["Feuer", "Flug"]);

    let out = output(&view);
    assert!(out.contains("1,creature-1,Kreatur 1,Feuer/Flug,https://img.example/1.png"));
    assert!(!out.contains("creature-3"));
}

#[tokio::test]
async fn test_load_more_continues_at_collection_size() {
    let mut server = Server::new_async().await;
    let first = mount_listing(&mut server, 0, 4, 1..=4).await;
    let second = mount_listing(&mut server, 4, 2, 5..=6).await;
    let mut mocks = Vec::new();
    for id in 1..=6 {
        mocks.extend(mount_creature(&mut server, id).await);
    }

    let sizes = PageSizes { initial: 4, more: 2 };
    let mut view = view_for(&server, CollectionStore::in_memory(), sizes, 1, OutputFormat::Json);
    view.init().await;

    let outcome = view.load_more().await;
    let loaded: Vec<u32> = outcome.records().iter().map(|r| r.id).collect();
    assert_eq!(loaded, vec![5, 6]);
    assert_eq!(ids(&mut view), vec![1, 2, 3, 4, 5, 6]);

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_concurrent_fetch_keeps_listing_order() {
    let mut server = Server::new_async().await;
    let _listing = mount_listing(&mut server, 0, 6, [6, 2, 5, 1, 4, 3]).await;
    let mut mocks = Vec::new();
    for id in 1..=6 {
        mocks.extend(mount_creature(&mut server, id).await);
    }

    let sizes = PageSizes { initial: 6, more: 2 };
    let mut view = view_for(&server, CollectionStore::in_memory(), sizes, 3, OutputFormat::Json);
    view.init().await;

    assert_eq!(ids(&mut view), vec![6, 2, 5, 1, 4, 3]);
}

#[tokio::test]
async fn test_collection_survives_restart() {
    let dir = TempDir::new().unwrap();
    let cache_config = CacheConfig {
        db_path: dir.path().join("cache.db"),
        ..Default::default()
    };

    let mut server = Server::new_async().await;
    // A mock expects exactly one hit unless told otherwise
    let listing = mount_listing(&mut server, 0, 3, 1..=3).await;
    let mut mocks = Vec::new();
    for id in 1..=3 {
        mocks.extend(mount_creature(&mut server, id).await);
    }
    let key = CacheKeyGenerator::collection_key(&listing_url(&server), "de");
    let sizes = PageSizes { initial: 3, more: 2 };

    {
        let cache = Arc::new(CacheStore::new(cache_config.clone()).await.unwrap());
        let store = CollectionStore::new(Some(cache), key.clone());
        let mut view = view_for(&server, store, sizes, 1, OutputFormat::Json);
        assert_eq!(view.init().await, 3);
    }

    let cache = Arc::new(CacheStore::new(cache_config).await.unwrap());
    let store = CollectionStore::new(Some(cache), key);
    let mut view = view_for(&server, store, sizes, 1, OutputFormat::Json);
    assert_eq!(view.init().await, 3);
    assert_eq!(ids(&mut view), vec![1, 2, 3]);

    listing.assert_async().await;
}

#[tokio::test]
async fn test_listing_failure_leaves_empty_collection() {
    let mut server = Server::new_async().await;
    let _listing = server
        .mock("GET", "/api/v2/pokemon/")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let mut view = view_for(
        &server,
        CollectionStore::in_memory(),
        PageSizes::default(),
        1,
        OutputFormat::Json,
    );

    assert_eq!(view.init().await, 0);
    assert!(view.load_more().await.is_failed());
    assert_eq!(output(&view).trim(), "[]");
}

#[tokio::test]
async fn test_search_and_detail_navigation() {
    let mut server = Server::new_async().await;
    let _listing = mount_listing(&mut server, 0, 3, 1..=3).await;
    let mut mocks = Vec::new();
    for id in 1..=3 {
        mocks.extend(mount_creature(&mut server, id).await);
    }

    let sizes = PageSizes { initial: 3, more: 2 };
    let mut view = view_for(&server, CollectionStore::in_memory(), sizes, 1, OutputFormat::Json);
    view.init().await;

    assert_eq!(view.search("kreatur 2"), 1);
    assert_eq!(view.search("KR"), 3);

    view.open_detail(3).unwrap();
    assert_eq!(view.navigate(Direction::Next), Some(1));
    view.toggle_pane();

    let current = view.current().map(|r| r.id);
    assert_eq!(current, Some(1));

    let out = output(&view);
    let last_detail = out.rfind("\"position\"").unwrap();
    assert!(out[last_detail..].starts_with("\"position\": 1"));
}
