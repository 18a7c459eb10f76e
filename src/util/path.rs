use std::path::{Component, Path};

/// Joins a scan-root label and a path relative to it with `/` separators,
/// regardless of platform. Non-UTF-8 components are converted lossily.
///
/// `("package", "node_modules/foo/index.js")` -> `"package/node_modules/foo/index.js"`
pub fn posix_join(root_label: &str, relative: &Path) -> String {
    let mut out = root_label.trim_end_matches(['/', '\\']).to_string();

    for component in relative.components() {
        if let Component::Normal(part) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&part.to_string_lossy());
        }
    }

    out
}

/// Label used for a scan root in emitted paths: the argument as given,
/// with trailing separators removed and backslashes turned into `/`.
pub fn root_label(root: &Path) -> String {
    root.to_string_lossy()
        .replace('\\', "/")
        .trim_end_matches('/')
        .to_string()
}
