mod layout;
mod snapshot;

pub use layout::{DependencyLayout, DEPENDENCY_DIR, UNKNOWN_PACKAGE};
pub use snapshot::{aggregate, PackageGroup, PathSizeRecord, ReleaseSnapshot};
