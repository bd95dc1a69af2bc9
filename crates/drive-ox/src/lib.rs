#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

pub mod client;
pub mod error;
mod internal;
pub mod mapper;
pub mod model;
pub mod preview;
pub mod view;

// Re-export main types
pub use client::Drive;
pub use error::DriveRequestError;
pub use mapper::{FileData, ViewMapper};
pub use model::{
    CategoryStorage, CreateFileRequest, FileListPage, FileRecord, PageMeta, Session, SessionUser,
    UpdateFilePayload, UploadStat, UserSession,
};
pub use preview::{ExtensionClassifier, PreviewClassifier, PreviewKind};
pub use view::{FileQuery, FileView};
