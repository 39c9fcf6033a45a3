//! Page processing.
//!
//! Turns one accepted URL into report artifacts and exactly one
//! [`ProcessingOutcome`]. Nothing that goes wrong for a single page escapes
//! this module.

mod filename;
mod outcome;
mod page;
mod run_dir;

pub use filename::{derive_base_filename, is_valid_filename, sanitize_filename_part, FilenameError};
pub use outcome::{FailureInfo, ProcessingOutcome};
pub use page::{process_page, to_indented_json, PageContext, PageSettings};
pub use run_dir::{run_directory_name, write_artifact, RunDirectory};
