mod format;
mod path;

pub use format::{format_share, format_size};
pub use path::{posix_join, root_label};
