use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mime type the server assigns to folder records.
pub const FOLDER_MIME: &str = "drive/folder";

/// A file record as the server stores it.
///
/// Immutable from the client's perspective except through the mutation
/// endpoints; the UI-facing projection is [`crate::mapper::FileData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub mime_type: String,
    /// File size in bytes, sent by the server as a decimal string.
    pub size: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub encrypted: bool,
}

impl FileRecord {
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME
    }

    /// Size in bytes; the server field is decimal digits by contract,
    /// anything else maps to zero.
    pub fn size_bytes(&self) -> u64 {
        self.size.parse().unwrap_or(0)
    }
}

/// Pagination metadata attached to every file listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u32,
}

impl PageMeta {
    /// The next page to request, if any.
    ///
    /// Page `current + 1` is requested iff `current + 1 <= total`; at the
    /// boundary (`current == total`, or a stale `current > total`) no
    /// further page is requested.
    pub fn next_page(&self) -> Option<u32> {
        let next = self.current_page + 1;
        (next <= self.total_pages).then_some(next)
    }
}

/// One page of a file listing response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileListPage {
    pub files: Vec<FileRecord>,
    pub meta: PageMeta,
}

/// Raw upload statistics record for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStat {
    pub upload_date: DateTime<Utc>,
    /// Total bytes uploaded on that day.
    pub total_uploaded: u64,
}

/// Storage consumed per file category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStorage {
    pub category: String,
    pub total_size: u64,
    #[serde(default)]
    pub file_count: u32,
}

/// The authenticated session, as returned by `GET /api/auth/session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: SessionUser,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

/// User identity carried inside a [`Session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One device session from `GET /api/users/sessions`, deletable by hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub hash: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for `POST /api/files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    #[builder(into)]
    pub name: String,
    #[serde(rename = "type")]
    #[builder(into)]
    pub kind: String,
    #[builder(into)]
    pub mime_type: String,
    /// Size in bytes as a decimal string, mirroring [`FileRecord::size`].
    #[builder(into)]
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub parent_id: Option<String>,
}

/// Partial update for `PATCH /api/files/{id}`.
///
/// Only set fields are serialized; the server merges them into the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFilePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub parent_id: Option<String>,
}
