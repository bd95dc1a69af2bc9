use std::collections::BTreeMap;
use std::sync::Arc;

use drive_ox::{Drive, FileQuery, view::normalize_path};
use tracing::debug;

use crate::cache::{QueryCache, QueryKey};
use crate::error::QueryError;
use crate::queries::{CategoryStorageQuery, FilesQuery, UploadStatsQuery};

/// Navigation targets the preloader knows how to warm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The splat file route: view plus path, with the active filter as
    /// search state.
    Files {
        view: drive_ox::FileView,
        path: String,
        search: BTreeMap<String, String>,
    },
    /// The storage dashboard.
    Storage,
}

impl Route {
    pub fn from_query(query: &FileQuery) -> Self {
        Route::Files {
            view: query.view,
            path: query.path.clone(),
            search: query.filter.clone(),
        }
    }

    /// Render the route as a location path plus query string.
    pub fn to_location(&self) -> String {
        match self {
            Route::Files { view, path, search } => {
                let mut location = format!("/{view}{}", normalize_path(path));
                if !search.is_empty() {
                    let qs: Vec<String> = search
                        .iter()
                        .map(|(k, v)| format!("{}={}", urlencode(k), urlencode(v)))
                        .collect();
                    location.push('?');
                    location.push_str(&qs.join("&"));
                }
                location
            }
            Route::Storage => "/storage".to_string(),
        }
    }
}

/// Percent-encode one query-string component.
fn urlencode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Collaborator seam for the router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &Route);
}

/// Collaborator seam for the progress indicator UI.
pub trait ProgressSink: Send + Sync {
    fn start(&self);
    fn stop(&self);
}

/// Progress indicator that shows nothing; the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn start(&self) {}
    fn stop(&self) {}
}

/// Stops the progress indicator when dropped, so the stop call survives
/// every exit path out of a preload.
struct ProgressGuard<'a> {
    sink: &'a dyn ProgressSink,
}

impl<'a> ProgressGuard<'a> {
    fn start(sink: &'a dyn ProgressSink) -> Self {
        sink.start();
        Self { sink }
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.sink.stop();
    }
}

/// Warms the cache for a target route before navigating to it.
///
/// Cache hit: navigate immediately, no indicator. Miss: indicator shown
/// for the duration of the prefetch, guaranteed hidden afterwards, then
/// navigate. Concurrent preloads of the same target are not deduplicated.
#[derive(Clone)]
pub struct Preloader {
    cache: QueryCache,
    client: Drive,
    navigator: Arc<dyn Navigator>,
    progress: Arc<dyn ProgressSink>,
}

impl Preloader {
    pub fn new(cache: QueryCache, client: Drive, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            cache,
            client,
            navigator,
            progress: Arc::new(SilentProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Preload a file listing and navigate to its route.
    pub async fn open_files(&self, query: &FileQuery) -> Result<(), QueryError> {
        let key = QueryKey::Files(query.clone());
        let route = Route::from_query(query);

        if self.cache.contains(&key) {
            debug!(?key, "preload hit, navigating immediately");
            self.navigator.navigate(&route);
            return Ok(());
        }

        let _guard = ProgressGuard::start(&*self.progress);
        FilesQuery::new(self.cache.clone(), self.client.clone(), query.clone())
            .fetch_all()
            .await?;
        self.navigator.navigate(&route);
        Ok(())
    }

    /// Preload the storage dashboard data and navigate to it.
    pub async fn open_storage(&self, days: u32) -> Result<(), QueryError> {
        let stats_key = QueryKey::UploadStats(days);
        let category_key = QueryKey::CategoryStorage;

        if self.cache.contains(&stats_key) && self.cache.contains(&category_key) {
            debug!("storage preload hit, navigating immediately");
            self.navigator.navigate(&Route::Storage);
            return Ok(());
        }

        let _guard = ProgressGuard::start(&*self.progress);
        UploadStatsQuery::new(self.cache.clone(), self.client.clone(), days)
            .fetch()
            .await?;
        CategoryStorageQuery::new(self.cache.clone(), self.client.clone())
            .fetch()
            .await?;
        self.navigator.navigate(&Route::Storage);
        Ok(())
    }
}

impl std::fmt::Debug for Preloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preloader")
            .field("cache", &self.cache)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_ox::FileView;

    #[test]
    fn files_route_includes_view_path_and_search() {
        let query = FileQuery::new(FileView::Search, "docs").with_filter("name", "tax report");
        let route = Route::from_query(&query);
        assert_eq!(route.to_location(), "/search/docs?name=tax%20report");
    }

    #[test]
    fn storage_route_is_fixed() {
        assert_eq!(Route::Storage.to_location(), "/storage");
    }
}
