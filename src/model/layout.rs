/// Directory name npm installs third-party packages into
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Bucket for dependency paths that carry no package segment
pub const UNKNOWN_PACKAGE: &str = "(unknown)";

/// Decides which scanned paths belong to installed dependencies and which
/// package they belong to.
///
/// Classification is a literal prefix test on the POSIX-style path string.
/// Nothing is normalized, so `package/./node_modules/x` is a project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyLayout {
    prefix: String,
}

impl Default for DependencyLayout {
    fn default() -> Self {
        Self::for_root("package")
    }
}

impl DependencyLayout {
    /// Layout with an explicit prefix, e.g. `"package/node_modules/"`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Layout for the dependency directory directly under a scan root
    pub fn for_root(root_label: &str) -> Self {
        let root = root_label.trim_end_matches('/');
        if root.is_empty() {
            Self::new(format!("{}/", DEPENDENCY_DIR))
        } else {
            Self::new(format!("{}/{}/", root, DEPENDENCY_DIR))
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn is_dependency(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Package a dependency path belongs to.
    ///
    /// - `foo/lib/index.js` -> `foo`
    /// - `@scope/name/index.js` -> `@scope/name` (a file directly under
    ///   `@scope/` groups as `@scope`)
    /// - `a/node_modules/b/x.js` -> `a`, nested installs count toward the
    ///   outer package
    /// - an empty segment, or a path outside the prefix -> [`UNKNOWN_PACKAGE`]
    pub fn package_name<'a>(&self, path: &'a str) -> &'a str {
        let Some(rest) = path.strip_prefix(self.prefix.as_str()) else {
            return UNKNOWN_PACKAGE;
        };

        let mut segments = rest.splitn(3, '/');
        let first = segments.next().unwrap_or_default();
        if first.is_empty() {
            return UNKNOWN_PACKAGE;
        }

        if first.starts_with('@') {
            // Only a directory under the scope is a package; a bare file is not
            if let (Some(name), Some(_)) = (segments.next(), segments.next()) {
                if !name.is_empty() {
                    return &rest[..first.len() + 1 + name.len()];
                }
            }
        }

        first
    }
}
