//! Turns user supplied paths into upload candidates.
//!
//! A file path becomes one [`FileRef`]. A directory is walked recursively and
//! every regular file under it is included, sorted by path relative to the
//! directory. Hidden entries (names starting with `.`) are skipped during the
//! walk, but a hidden file named explicitly is kept.
//!
//! No filtering by type happens here; the upload queue decides what it
//! accepts.

use std::io;
use std::path::{Path, PathBuf};

use reelup_business::FileRef;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InputError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// MIME type guessed from the file extension, if any.
pub fn guess_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_owned())
}

/// Builds a [`FileRef`] for one regular file on disk.
pub async fn describe_file(path: &Path) -> Result<FileRef, InputError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|err| InputError::io(path, err))?;
    Ok(file_ref(path, metadata.len()))
}

/// Resolves `paths` into files, expanding directories.
///
/// Argument order is preserved. Fails on the first path that does not exist
/// or cannot be read.
pub async fn collect_files(paths: &[PathBuf]) -> Result<Vec<FileRef>, InputError> {
    let mut files = Vec::new();

    for path in paths {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|err| InputError::io(path, err))?;

        if metadata.is_dir() {
            let found = walk_dir(path).await?;
            log::debug!(
                target: "reelup::input",
                "expanded dir={} files={}",
                path.display(),
                found.len()
            );
            files.extend(found);
        } else {
            files.push(describe_file(path).await?);
        }
    }

    Ok(files)
}

/// Collects the regular files under `root`.
///
/// Symlinks to files are followed. Symlinks to directories are not, so a link
/// pointing back up the tree cannot loop the walk. Dangling links are skipped.
async fn walk_dir(root: &Path) -> Result<Vec<FileRef>, InputError> {
    let mut found: Vec<(PathBuf, u64)> = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(current) = stack.pop() {
        let mut entries = tokio::fs::read_dir(&current)
            .await
            .map_err(|err| InputError::io(&current, err))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| InputError::io(&current, err))?
        {
            let path = entry.path();
            if is_hidden(&path) {
                continue;
            }

            let file_type = entry
                .file_type()
                .await
                .map_err(|err| InputError::io(&path, err))?;
            if file_type.is_dir() {
                stack.push(path);
            } else if file_type.is_file() {
                let metadata = entry
                    .metadata()
                    .await
                    .map_err(|err| InputError::io(&path, err))?;
                found.push((path, metadata.len()));
            } else if file_type.is_symlink() {
                match tokio::fs::metadata(&path).await {
                    Ok(metadata) if metadata.is_file() => found.push((path, metadata.len())),
                    Ok(_) => log::debug!(
                        target: "reelup::input",
                        "skipped linked dir={}",
                        path.display()
                    ),
                    Err(err) => log::debug!(
                        target: "reelup::input",
                        "skipped link={} err={err}",
                        path.display()
                    ),
                }
            }
        }
    }

    // Every entry shares `root`, so full paths order the same as relative ones.
    found.sort_by(|(a, _), (b, _)| a.cmp(b));

    Ok(found
        .into_iter()
        .map(|(path, size)| file_ref(path, size))
        .collect())
}

fn file_ref(path: impl Into<PathBuf>, size: u64) -> FileRef {
    let path = path.into();
    let mime = guess_mime(&path);
    FileRef::on_disk(path, size, mime)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
