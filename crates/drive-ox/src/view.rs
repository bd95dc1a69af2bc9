use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Page size used when the client does not configure one.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Sort applied to the my-drive view.
const MY_DRIVE_SORT: (&str, &str) = ("updatedAt", "desc");

/// The closed set of file listing views.
///
/// Every view builds its request parameters differently; the enum keeps the
/// dispatch exhaustive so an unhandled view cannot compile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FileView {
    MyDrive,
    Search,
    Starred,
    Recent,
    Category,
    Browse,
}

impl FileView {
    /// Default sort and order for views other than my-drive.
    fn default_sort(self) -> (&'static str, &'static str) {
        match self {
            FileView::MyDrive => MY_DRIVE_SORT,
            FileView::Search | FileView::Starred | FileView::Browse => ("updatedAt", "desc"),
            FileView::Recent | FileView::Category => ("createdAt", "desc"),
        }
    }
}

/// Identifies one page source: a view plus its path and filter.
///
/// Doubles as cache-key material, so the filter is an ordered map and the
/// whole struct is `Eq + Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileQuery {
    pub view: FileView,
    pub path: String,
    #[serde(default)]
    pub filter: BTreeMap<String, String>,
}

impl FileQuery {
    pub fn new(view: FileView, path: impl Into<String>) -> Self {
        Self {
            view,
            path: path.into(),
            filter: BTreeMap::new(),
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    /// Build the flat parameter list for `GET /api/files`.
    ///
    /// Per-view rules:
    /// - my-drive: `path` normalized to begin with `/`; my-drive sort.
    /// - search: `op=find`; every filter entry copied verbatim.
    /// - starred: `op=find`, `starred=true`.
    /// - recent: `op=find`, `type=file`.
    /// - category: `op=find`, `type=file`, `category` = path stripped of `/`.
    /// - browse: `parentId` from the filter, when present.
    ///
    /// Always appends `sort`/`order` (unless the search filter supplied them
    /// verbatim) plus `page` and `pageSize`.
    pub fn list_params(&self, page: u32, page_size: Option<u32>) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = Vec::new();
        let mut push = |k: &str, v: String| params.push((k.to_string(), v));

        match self.view {
            FileView::MyDrive => {
                push("path", normalize_path(&self.path));
            }
            FileView::Search => {
                push("op", "find".to_string());
                for (key, value) in &self.filter {
                    push(key, value.clone());
                }
            }
            FileView::Starred => {
                push("op", "find".to_string());
                push("starred", "true".to_string());
            }
            FileView::Recent => {
                push("op", "find".to_string());
                push("type", "file".to_string());
            }
            FileView::Category => {
                push("op", "find".to_string());
                push("type", "file".to_string());
                push("category", self.path.replace('/', ""));
            }
            FileView::Browse => {
                if let Some(parent_id) = self.filter.get("parentId") {
                    push("parentId", parent_id.clone());
                }
            }
        }

        let (sort, order) = self.view.default_sort();
        // The verbatim-copy rule for search already emitted any
        // filter-supplied sort/order; do not shadow it with defaults.
        let search_overrides = |key: &str| self.view == FileView::Search && self.filter.contains_key(key);
        if !search_overrides("sort") {
            push("sort", sort.to_string());
        }
        if !search_overrides("order") {
            push("order", order.to_string());
        }

        push("page", page.to_string());
        push("pageSize", page_size.unwrap_or(DEFAULT_PAGE_SIZE).to_string());

        params
    }
}

/// Prepend `/` unless the path already starts with one. Idempotent.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        assert_eq!(normalize_path("docs"), "/docs");
        assert_eq!(normalize_path("/docs"), "/docs");
        assert_eq!(normalize_path(&normalize_path("docs")), "/docs");
    }

    #[test]
    fn view_names_are_kebab_case() {
        assert_eq!(FileView::MyDrive.to_string(), "my-drive");
        assert_eq!(FileView::Category.to_string(), "category");
    }
}
