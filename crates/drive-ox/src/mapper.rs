use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::FileRecord;
use crate::preview::{ExtensionClassifier, PreviewClassifier, PreviewKind};

/// UI-ready projection of a [`FileRecord`].
///
/// Derived deterministically from the record plus mapper configuration;
/// never sent back to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub mime_type: String,
    pub size: u64,
    #[serde(skip)]
    pub preview: Option<PreviewKind>,
    pub thumbnail_url: String,
    pub starred: bool,
    pub encrypted: bool,
    pub is_dir: bool,
    pub openable: bool,
}

/// Converts server file records into [`FileData`] view models.
pub struct ViewMapper {
    base_url: String,
    resizing_host: Option<String>,
    classifier: Arc<dyn PreviewClassifier>,
}

impl ViewMapper {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            resizing_host: None,
            classifier: Arc::new(ExtensionClassifier),
        }
    }

    /// Host prepended to the encoded media URL to produce thumbnails.
    /// Without one, thumbnail URLs stay empty.
    pub fn with_resizing_host(mut self, host: impl Into<String>) -> Self {
        self.resizing_host = Some(host.into());
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn PreviewClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Map records 1:1, preserving order and count.
    pub fn map(&self, records: &[FileRecord], session_id: &str) -> Vec<FileData> {
        records
            .iter()
            .map(|record| self.map_one(record, session_id))
            .collect()
    }

    fn map_one(&self, record: &FileRecord, session_id: &str) -> FileData {
        if record.is_folder() {
            return FileData {
                id: record.id.clone(),
                name: record.name.clone(),
                kind: record.kind.clone(),
                mime_type: record.mime_type.clone(),
                size: 0,
                preview: None,
                thumbnail_url: String::new(),
                starred: record.starred,
                encrypted: record.encrypted,
                is_dir: true,
                openable: false,
            };
        }

        let preview = self.classifier.classify(&record.name, &record.mime_type);
        let thumbnail_url = if preview == PreviewKind::Image {
            self.thumbnail_url(record, session_id)
        } else {
            String::new()
        };

        FileData {
            id: record.id.clone(),
            name: record.name.clone(),
            kind: record.kind.clone(),
            mime_type: record.mime_type.clone(),
            size: record.size_bytes(),
            preview: Some(preview),
            thumbnail_url,
            starred: record.starred,
            encrypted: record.encrypted,
            is_dir: false,
            openable: self.classifier.is_openable(preview),
        }
    }

    /// `resizing_host + encoded(media_url)`, or empty without a host.
    fn thumbnail_url(&self, record: &FileRecord, session_id: &str) -> String {
        match &self.resizing_host {
            Some(host) => {
                let media_url = self.media_url(record, session_id);
                format!("{host}{}", urlencoding::encode(&media_url))
            }
            None => String::new(),
        }
    }

    /// Raw preview URL for a file, scoped to the viewer's session.
    fn media_url(&self, record: &FileRecord, session_id: &str) -> String {
        format!(
            "{}/api/files/{}/preview?session={}",
            self.base_url.trim_end_matches('/'),
            record.id,
            session_id
        )
    }
}

impl std::fmt::Debug for ViewMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewMapper")
            .field("base_url", &self.base_url)
            .field("resizing_host", &self.resizing_host)
            .finish_non_exhaustive()
    }
}
