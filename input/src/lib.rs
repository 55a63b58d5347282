//! Input sources for reelup: files named on the command line, directories
//! expanded into the files they contain, and path lists piped through stdin.
//!
//! # Modules
//!
//! - [`selection`]: turns paths into [`FileRef`](reelup_business::FileRef)s
//! - [`stdin`]: newline separated path lists with trait-based readers
//!
//! Readers come in a real and a mock flavour so callers can be tested without
//! touching the process stdin.

pub mod selection;
pub mod stdin;

pub use selection::{InputError, collect_files, describe_file, guess_mime};
pub use stdin::{MockPathListReader, PathListReader, RealPathListReader, parse_path_list};
