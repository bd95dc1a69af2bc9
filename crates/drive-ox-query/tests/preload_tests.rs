use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use drive_ox::{Drive, FileQuery, FileView};
use drive_ox_query::{Navigator, Preloader, ProgressSink, QueryCache, QueryKey, Route};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &Route) {
        self.routes
            .lock()
            .expect("navigator lock")
            .push(route.clone());
    }
}

#[derive(Default)]
struct RecordingProgress {
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl ProgressSink for RecordingProgress {
    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

fn page_body(ids: &[&str], current: u32, total: u32) -> serde_json::Value {
    json!({
        "files": ids.iter().map(|id| json!({
            "id": id,
            "name": format!("{id}.txt"),
            "type": "file",
            "mimeType": "text/plain",
            "size": "10",
        })).collect::<Vec<_>>(),
        "meta": {"currentPage": current, "totalPages": total},
    })
}

fn preloader(
    cache: &QueryCache,
    server_uri: String,
) -> (Preloader, Arc<RecordingNavigator>, Arc<RecordingProgress>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let progress = Arc::new(RecordingProgress::default());
    let preloader = Preloader::new(
        cache.clone(),
        Drive::new(server_uri),
        Arc::clone(&navigator) as Arc<dyn Navigator>,
    )
    .with_progress(Arc::clone(&progress) as Arc<dyn ProgressSink>);
    (preloader, navigator, progress)
}

#[tokio::test]
async fn cache_hit_navigates_without_progress() {
    let server = MockServer::start().await;
    let query = FileQuery::new(FileView::MyDrive, "/docs");
    let cache = QueryCache::new();
    cache.set_value(QueryKey::Files(query.clone()), json!([page_body(&["a"], 1, 1)]));

    let (preloader, navigator, progress) = preloader(&cache, server.uri());
    preloader
        .open_files(&query)
        .await
        .expect("preload should succeed");

    assert_eq!(progress.starts.load(Ordering::SeqCst), 0);
    assert_eq!(progress.stops.load(Ordering::SeqCst), 0);
    let routes = navigator.routes.lock().expect("navigator lock");
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].to_location(), "/my-drive/docs");
}

#[tokio::test]
async fn cache_miss_walks_every_page_then_navigates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["a", "b"], 1, 2)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["c"], 2, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let query = FileQuery::new(FileView::Recent, "/");
    let cache = QueryCache::new();
    let (preloader, navigator, progress) = preloader(&cache, server.uri());

    preloader
        .open_files(&query)
        .await
        .expect("preload should succeed");

    // Indicator shown start-then-stop exactly once.
    assert_eq!(progress.starts.load(Ordering::SeqCst), 1);
    assert_eq!(progress.stops.load(Ordering::SeqCst), 1);
    assert_eq!(navigator.routes.lock().expect("navigator lock").len(), 1);

    // Both pages landed in the cache, in order.
    let key = QueryKey::Files(query);
    assert!(cache.contains(&key));
    let pages = cache.get_value(&key).expect("cached pages");
    assert_eq!(pages.as_array().expect("array").len(), 2);
    assert_eq!(pages[0]["meta"]["currentPage"], json!(1));
    assert_eq!(pages[1]["meta"]["currentPage"], json!(2));
}

#[tokio::test]
async fn failed_preload_still_stops_the_indicator_and_does_not_navigate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let query = FileQuery::new(FileView::Starred, "/");
    let cache = QueryCache::new();
    let (preloader, navigator, progress) = preloader(&cache, server.uri());

    let result = preloader.open_files(&query).await;
    assert!(result.is_err());

    assert_eq!(progress.starts.load(Ordering::SeqCst), 1);
    assert_eq!(progress.stops.load(Ordering::SeqCst), 1);
    assert!(navigator.routes.lock().expect("navigator lock").is_empty());
}

#[tokio::test]
async fn storage_preload_warms_both_dashboards_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uploads/stats"))
        .and(query_param("days", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"uploadDate": "2026-08-01T00:00:00Z", "totalUploaded": 42u64},
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/files/category/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"category": "image", "totalSize": 7u64},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let cache = QueryCache::new();
    let (preloader, navigator, progress) = preloader(&cache, server.uri());

    preloader
        .open_storage(30)
        .await
        .expect("preload should succeed");

    assert_eq!(progress.starts.load(Ordering::SeqCst), 1);
    assert_eq!(progress.stops.load(Ordering::SeqCst), 1);
    let routes = navigator.routes.lock().expect("navigator lock");
    assert_eq!(routes.as_slice(), &[Route::Storage]);
    assert!(cache.contains(&QueryKey::UploadStats(30)));
    assert!(cache.contains(&QueryKey::CategoryStorage));
}

#[tokio::test]
async fn storage_preload_hit_skips_the_indicator() {
    let server = MockServer::start().await;
    let cache = QueryCache::new();
    cache.set_value(QueryKey::UploadStats(30), json!([]));
    cache.set_value(QueryKey::CategoryStorage, json!([]));

    let (preloader, navigator, progress) = preloader(&cache, server.uri());
    preloader
        .open_storage(30)
        .await
        .expect("preload should succeed");

    assert_eq!(progress.starts.load(Ordering::SeqCst), 0);
    assert_eq!(progress.stops.load(Ordering::SeqCst), 0);
    assert_eq!(navigator.routes.lock().expect("navigator lock").len(), 1);
}
