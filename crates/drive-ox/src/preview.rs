/// Preview categories the UI knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PreviewKind {
    Image,
    Video,
    Audio,
    Pdf,
    Text,
    Archive,
    Unknown,
}

/// Collaborator seam for preview classification.
///
/// The mapper only asks two questions: what kind of preview does a file
/// get, and is a handler registered for that kind. Applications with their
/// own preview registry implement this trait; [`ExtensionClassifier`] is a
/// reasonable default.
pub trait PreviewClassifier: Send + Sync {
    fn classify(&self, name: &str, mime_type: &str) -> PreviewKind;

    fn is_openable(&self, kind: PreviewKind) -> bool;
}

/// Classifies by file extension with a mime-prefix fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionClassifier;

impl ExtensionClassifier {
    fn from_extension(ext: &str) -> Option<PreviewKind> {
        let kind = match ext {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "svg" | "ico" | "avif" => {
                PreviewKind::Image
            }
            "mp4" | "mkv" | "webm" | "mov" | "avi" | "m4v" => PreviewKind::Video,
            "mp3" | "wav" | "flac" | "ogg" | "m4a" | "aac" => PreviewKind::Audio,
            "pdf" => PreviewKind::Pdf,
            "txt" | "md" | "json" | "yaml" | "yml" | "toml" | "csv" | "log" | "rs" | "ts"
            | "js" | "py" | "html" | "css" => PreviewKind::Text,
            "zip" | "tar" | "gz" | "7z" | "rar" => PreviewKind::Archive,
            _ => return None,
        };
        Some(kind)
    }

    fn from_mime(mime_type: &str) -> PreviewKind {
        let prefix = mime_type.split('/').next().unwrap_or("");
        match prefix {
            "image" => PreviewKind::Image,
            "video" => PreviewKind::Video,
            "audio" => PreviewKind::Audio,
            "text" => PreviewKind::Text,
            _ if mime_type == "application/pdf" => PreviewKind::Pdf,
            _ => PreviewKind::Unknown,
        }
    }
}

impl PreviewClassifier for ExtensionClassifier {
    fn classify(&self, name: &str, mime_type: &str) -> PreviewKind {
        name.rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .and_then(|ext| Self::from_extension(&ext))
            .unwrap_or_else(|| Self::from_mime(mime_type))
    }

    fn is_openable(&self, kind: PreviewKind) -> bool {
        !matches!(kind, PreviewKind::Archive | PreviewKind::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_wins_over_mime() {
        let c = ExtensionClassifier;
        assert_eq!(c.classify("cover.png", "application/octet-stream"), PreviewKind::Image);
    }

    #[test]
    fn mime_prefix_is_the_fallback() {
        let c = ExtensionClassifier;
        assert_eq!(c.classify("noext", "video/x-matroska"), PreviewKind::Video);
        assert_eq!(c.classify("noext", "application/x-thing"), PreviewKind::Unknown);
    }

    #[test]
    fn archives_are_not_openable() {
        let c = ExtensionClassifier;
        assert!(!c.is_openable(PreviewKind::Archive));
        assert!(c.is_openable(PreviewKind::Pdf));
    }
}
