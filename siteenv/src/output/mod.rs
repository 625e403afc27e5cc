//! User-facing output.
//!
//! - [`Reporter`] is the sink every component prints through.
//! - [`CommandFormatter`] and [`format_heading`] render commands and
//!   headings the way the terminal shows them.
//! - [`print_summary`] prints the dry-run view of a resolved plan.

mod format;
mod report;
mod summary;

pub use format::{capitalize_words, format_heading, key_value_lines, CommandFormatter};
pub use report::{ConsoleReporter, Record, RecordingReporter, Reporter, Severity};
pub use summary::{inline_value, print_summary};
