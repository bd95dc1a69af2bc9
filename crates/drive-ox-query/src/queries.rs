use chrono::{DateTime, Utc};
use drive_ox::{
    CategoryStorage, Drive, FileData, FileListPage, FileQuery, Session, UploadStat, UserSession,
    ViewMapper,
};
use serde::{Deserialize, Serialize};

use crate::cache::{QueryCache, QueryKey};
use crate::error::QueryError;

/// Bytes per gibibyte, for the upload stats transform.
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Cache-bound query for `GET /api/auth/session`.
#[derive(Debug, Clone)]
pub struct SessionQuery {
    cache: QueryCache,
    client: Drive,
}

impl SessionQuery {
    pub fn new(cache: QueryCache, client: Drive) -> Self {
        Self { cache, client }
    }

    /// Cached session, fetching on a miss. `None` is a cacheable answer:
    /// a non-JSON response body means no session, not an error.
    pub async fn fetch(&self) -> Result<Option<Session>, QueryError> {
        self.cache
            .fetch_with(&QueryKey::Session, self.client.session())
            .await
    }
}

/// Cache-bound query for `GET /api/users/sessions`.
#[derive(Debug, Clone)]
pub struct SessionListQuery {
    cache: QueryCache,
    client: Drive,
}

impl SessionListQuery {
    pub fn new(cache: QueryCache, client: Drive) -> Self {
        Self { cache, client }
    }

    pub async fn fetch(&self) -> Result<Vec<UserSession>, QueryError> {
        self.cache
            .fetch_with(&QueryKey::Sessions, self.client.sessions())
            .await
    }
}

/// Paginated, cache-bound file listing for one [`FileQuery`].
///
/// Pages accumulate in order under `QueryKey::Files(query)`; page N+1 is
/// fetched only after page N resolved and reported more pages remain.
#[derive(Debug, Clone)]
pub struct FilesQuery {
    cache: QueryCache,
    client: Drive,
    query: FileQuery,
}

impl FilesQuery {
    pub fn new(cache: QueryCache, client: Drive, query: FileQuery) -> Self {
        Self {
            cache,
            client,
            query,
        }
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::Files(self.query.clone())
    }

    /// Walk every page for this query, returning the accumulated sequence.
    ///
    /// A fresh cache entry short-circuits the walk entirely.
    pub async fn fetch_all(&self) -> Result<Vec<FileListPage>, QueryError> {
        let key = self.key();
        self.cache
            .fetch_with(&key, async {
                let mut pages = Vec::new();
                let mut page = 1;
                loop {
                    let fetched = self.client.list_files(&self.query, page).await?;
                    let next = fetched.meta.next_page();
                    pages.push(fetched);
                    match next {
                        Some(n) => page = n,
                        None => break,
                    }
                }
                Ok(pages)
            })
            .await
    }

    /// Pages currently in the cache for this query, fetched or patched.
    pub fn cached_pages(&self) -> Result<Vec<FileListPage>, QueryError> {
        Ok(self.cache.get(&self.key())?.unwrap_or_default())
    }

    /// The select transform: flatten whatever pages the cache currently
    /// holds into one ordered view-model sequence.
    pub fn view_models(
        &self,
        mapper: &ViewMapper,
        session_id: &str,
    ) -> Result<Vec<FileData>, QueryError> {
        let pages = self.cached_pages()?;
        let mut out = Vec::new();
        for page in &pages {
            out.extend(mapper.map(&page.files, session_id));
        }
        Ok(out)
    }
}

/// Display row for one day of upload statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRow {
    /// Date formatted as e.g. `12 Jan 2026`.
    pub date: String,
    /// Uploaded volume in gibibytes, rounded to two decimals.
    pub gigabytes: f64,
}

impl UploadRow {
    fn from_stat(stat: &UploadStat) -> Self {
        Self {
            date: format_upload_date(&stat.upload_date),
            gigabytes: (stat.total_uploaded as f64 / GIB * 100.0).round() / 100.0,
        }
    }
}

/// Fixed-format date for upload rows; chrono's `%b` is always English.
fn format_upload_date(date: &DateTime<Utc>) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Cache-bound query for `GET /api/uploads/stats?days=N`.
#[derive(Debug, Clone)]
pub struct UploadStatsQuery {
    cache: QueryCache,
    client: Drive,
    days: u32,
}

impl UploadStatsQuery {
    pub fn new(cache: QueryCache, client: Drive, days: u32) -> Self {
        Self {
            cache,
            client,
            days,
        }
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::UploadStats(self.days)
    }

    pub async fn fetch(&self) -> Result<Vec<UploadStat>, QueryError> {
        self.cache
            .fetch_with(&self.key(), self.client.upload_stats(self.days))
            .await
    }

    /// Fetch and shape for display; pure and order-preserving.
    pub async fn fetch_rows(&self) -> Result<Vec<UploadRow>, QueryError> {
        let stats = self.fetch().await?;
        Ok(stats.iter().map(UploadRow::from_stat).collect())
    }
}

/// Cache-bound query for `GET /api/files/category/stats`.
#[derive(Debug, Clone)]
pub struct CategoryStorageQuery {
    cache: QueryCache,
    client: Drive,
}

impl CategoryStorageQuery {
    pub fn new(cache: QueryCache, client: Drive) -> Self {
        Self { cache, client }
    }

    pub async fn fetch(&self) -> Result<Vec<CategoryStorage>, QueryError> {
        self.cache
            .fetch_with(&QueryKey::CategoryStorage, self.client.category_stats())
            .await
    }
}
