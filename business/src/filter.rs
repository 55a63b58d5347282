//! Accepted input filter for the upload queue.

use std::path::Path;

use crate::FileRef;

/// Container extensions accepted regardless of the detected MIME type.
pub const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm"];

const VIDEO_MIME_PREFIX: &str = "video/";

/// Returns true if the file looks like a video: either its MIME type starts
/// with `video/` or its name ends in one of [`VIDEO_EXTENSIONS`]
/// (case-insensitive).
pub fn is_accepted_video(file: &FileRef) -> bool {
    let mime_ok = file
        .mime_type()
        .is_some_and(|mime| mime.to_ascii_lowercase().starts_with(VIDEO_MIME_PREFIX));

    mime_ok || has_video_extension(file.name())
}

/// Extension half of [`is_accepted_video`].
pub fn has_video_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Human readable list of accepted extensions, e.g. `MP4, MKV, ...`.
pub fn accepted_extensions_label() -> String {
    VIDEO_EXTENSIONS
        .iter()
        .map(|ext| ext.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: Option<&str>) -> FileRef {
        FileRef::in_memory(name, Vec::new(), mime.map(str::to_owned))
    }

    #[test]
    fn accepts_known_extensions_case_insensitively() {
        for name in ["a.mp4", "b.MKV", "c.Avi", "d.mov", "e.wmv", "f.flv", "g.WebM"] {
            assert!(is_accepted_video(&file(name, None)), "{name} should pass");
        }
    }

    #[test]
    fn accepts_any_video_mime() {
        assert!(is_accepted_video(&file("clip.bin", Some("video/mp2t"))));
        assert!(is_accepted_video(&file("clip", Some("Video/Quicktime"))));
    }

    #[test]
    fn rejects_other_files() {
        assert!(!is_accepted_video(&file("notes.txt", Some("text/plain"))));
        assert!(!is_accepted_video(&file("photo.jpg", Some("image/jpeg"))));
        assert!(!is_accepted_video(&file("mp4", None)));
        assert!(!is_accepted_video(&file("archive.mp4.zip", None)));
    }

    #[test]
    fn label_lists_every_extension() {
        assert_eq!(
            accepted_extensions_label(),
            "MP4, MKV, AVI, MOV, WMV, FLV, WEBM"
        );
    }
}
