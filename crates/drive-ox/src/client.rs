use bon::Builder;
use core::fmt;
use drive_ox_common::request_builder::{Endpoint, HttpMethod};

use crate::{
    error::DriveRequestError,
    internal::DriveRequestHelper,
    model::{
        CategoryStorage, CreateFileRequest, FileListPage, FileRecord, Session, UpdateFilePayload,
        UploadStat, UserSession,
    },
    view::FileQuery,
};

const BASE_URL: &str = "http://localhost:3000";
const SESSION_URL: &str = "api/auth/session";
const SESSIONS_URL: &str = "api/users/sessions";
const UPLOAD_STATS_URL: &str = "api/uploads/stats";
const CATEGORY_STATS_URL: &str = "api/files/category/stats";
const FILES_URL: &str = "api/files";
const FILES_DELETE_URL: &str = "api/files/delete";

/// Typed client for the drive server's HTTP API.
#[derive(Clone, Default, Builder)]
pub struct Drive {
    /// Bearer token; takes precedence over the session cookie.
    #[builder(into)]
    pub(crate) token: Option<String>,
    /// Value of the session cookie issued by the server.
    #[builder(into)]
    pub(crate) session_cookie: Option<String>,
    #[builder(default)]
    pub(crate) client: reqwest::Client,
    #[builder(default = BASE_URL.to_string(), into)]
    pub(crate) base_url: String,
    /// Listing page size; server fallback applies when unset.
    pub(crate) page_size: Option<u32>,
    #[builder(default)]
    pub(crate) headers: std::collections::HashMap<String, String>,
}

impl Drive {
    /// Create a client for the given server with no authentication.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            token: None,
            session_cookie: None,
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            page_size: None,
            headers: std::collections::HashMap::new(),
        }
    }

    pub fn load_from_env() -> Result<Self, std::env::VarError> {
        let base_url = std::env::var("DRIVE_BASE_URL")?;
        match std::env::var("DRIVE_TOKEN") {
            Ok(token) => Ok(Self::builder().base_url(base_url).token(token).build()),
            Err(_) => Ok(Self::builder().base_url(base_url).build()),
        }
    }

    /// Add a custom header to the client
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Create request helper for internal use
    fn request_helper(&self) -> DriveRequestHelper {
        DriveRequestHelper::new(
            self.client.clone(),
            &self.base_url,
            &self.token,
            &self.session_cookie,
            &self.headers,
        )
    }
}

impl Drive {
    /// Fetch the current session.
    ///
    /// The server answers with a non-JSON page when no session exists;
    /// that maps to `Ok(None)` rather than an error.
    pub async fn session(&self) -> Result<Option<Session>, DriveRequestError> {
        let endpoint = Endpoint::new(SESSION_URL, HttpMethod::Get);
        self.request_helper().request_optional(&endpoint).await
    }

    /// List the user's device sessions.
    pub async fn sessions(&self) -> Result<Vec<UserSession>, DriveRequestError> {
        let endpoint = Endpoint::new(SESSIONS_URL, HttpMethod::Get);
        self.request_helper().request(&endpoint).await
    }

    /// Delete a device session by its hash.
    pub async fn delete_session(&self, hash: &str) -> Result<(), DriveRequestError> {
        let endpoint = Endpoint::new(format!("{SESSIONS_URL}/{hash}"), HttpMethod::Delete);
        self.request_helper().request_unit(&endpoint).await
    }

    /// Upload statistics for the trailing `days` days.
    pub async fn upload_stats(&self, days: u32) -> Result<Vec<UploadStat>, DriveRequestError> {
        let endpoint = Endpoint::new(UPLOAD_STATS_URL, HttpMethod::Get)
            .with_query_params(vec![("days".to_string(), days.to_string())]);
        self.request_helper().request(&endpoint).await
    }

    /// Storage consumed per category.
    pub async fn category_stats(&self) -> Result<Vec<CategoryStorage>, DriveRequestError> {
        let endpoint = Endpoint::new(CATEGORY_STATS_URL, HttpMethod::Get);
        self.request_helper().request(&endpoint).await
    }

    /// Fetch one page of a file listing for the given query.
    pub async fn list_files(
        &self,
        query: &FileQuery,
        page: u32,
    ) -> Result<FileListPage, DriveRequestError> {
        let endpoint = Endpoint::new(FILES_URL, HttpMethod::Get)
            .with_query_params(query.list_params(page, self.page_size));
        self.request_helper().request(&endpoint).await
    }

    /// Create a file record.
    pub async fn create_file(
        &self,
        request: &CreateFileRequest,
    ) -> Result<FileRecord, DriveRequestError> {
        let endpoint = Endpoint::new(FILES_URL, HttpMethod::Post);
        self.request_helper().request_json(&endpoint, request).await
    }

    /// Merge the payload into the file record with the given id.
    pub async fn update_file(
        &self,
        id: &str,
        payload: &UpdateFilePayload,
    ) -> Result<FileRecord, DriveRequestError> {
        let endpoint = Endpoint::new(format!("{FILES_URL}/{id}"), HttpMethod::Patch);
        self.request_helper().request_json(&endpoint, payload).await
    }

    /// Delete the files with the given ids.
    pub async fn delete_files(&self, ids: &[String]) -> Result<(), DriveRequestError> {
        let endpoint = Endpoint::new(FILES_DELETE_URL, HttpMethod::Post);
        let body = serde_json::json!({ "files": ids });
        self.request_helper().request_json_unit(&endpoint, &body).await
    }
}

impl fmt::Debug for Drive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drive")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .field("client", &self.client)
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
