//! Path lists read from stdin, one path per line.
//!
//! Blank lines and lines starting with `#` are ignored, and surrounding
//! whitespace is trimmed. This lets `find ... | reelup upload --stdin` and
//! hand-written lists both work.
//!
//! # Example
//!
//! ```ignore
//! use reelup_input::stdin::{PathListReader, RealPathListReader};
//!
//! let mut reader = RealPathListReader::new();
//! let paths = reader.read_paths()?;
//!
//! // In tests:
//! let mut reader = MockPathListReader::new("a.mp4\nb.mkv\n");
//! ```

use std::io::{self, BufRead as _, Read};
use std::path::PathBuf;

/// Source of a newline separated path list.
pub trait PathListReader {
    /// Reads until EOF and returns the listed paths in order.
    fn read_paths(&mut self) -> io::Result<Vec<PathBuf>>;
}

/// Splits `content` into paths, skipping blank lines and `#` comments.
pub fn parse_path_list(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}

/// Reads the path list from `std::io::stdin()` or any other reader.
pub struct RealPathListReader<R: Read> {
    reader: io::BufReader<R>,
}

impl RealPathListReader<io::Stdin> {
    pub fn new() -> Self {
        Self {
            reader: io::BufReader::new(io::stdin()),
        }
    }
}

impl Default for RealPathListReader<io::Stdin> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read> RealPathListReader<R> {
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader: io::BufReader::new(reader),
        }
    }
}

impl<R: Read> PathListReader for RealPathListReader<R> {
    fn read_paths(&mut self) -> io::Result<Vec<PathBuf>> {
        let mut content = String::new();
        // read_line returns 0 at EOF (Ctrl+D on Unix, Ctrl+Z Enter on Windows).
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line)? {
                0 => break,
                _ => content.push_str(&line),
            }
        }
        Ok(parse_path_list(&content))
    }
}

/// Mock reader returning fixed content once.
#[derive(Debug, Clone)]
pub struct MockPathListReader {
    content: Option<String>,
}

impl MockPathListReader {
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// Simulates immediate EOF.
    pub fn empty() -> Self {
        Self { content: None }
    }
}

impl PathListReader for MockPathListReader {
    fn read_paths(&mut self) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .content
            .take()
            .map(|content| parse_path_list(&content))
            .unwrap_or_default())
    }
}
