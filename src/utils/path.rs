//! Input path normalization.
//!
//! CLI callers hand over plain paths or `file:///` URIs; both are reduced to
//! a clean filesystem path before any existence check.

use std::path::{Component, Path, PathBuf};

/// Normalizes a raw CLI input into a filesystem path.
///
/// Strips one leading `file:///` scheme (keeping the path absolute), expands
/// a leading `~` to the user's home directory, and lexically normalizes
/// `.`/`..` components and separators.
pub fn normalize_input_path(input: &str) -> PathBuf {
    let without_scheme = match input.strip_prefix("file:///") {
        Some(rest) => format!("/{rest}"),
        None => input.to_string(),
    };

    let expanded = expand_home(&without_scheme);
    normalize_components(Path::new(&expanded))
}

fn expand_home(path: &str) -> String {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home.to_string_lossy().into_owned();
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().into_owned();
        }
    }
    path.to_string()
}

/// Lexically resolves `.` and `..` components, like `os.path.normpath`:
/// no filesystem access, `..` at the root is dropped, and an empty result
/// becomes `.`.
fn normalize_components(path: &Path) -> PathBuf {
    let has_root = path.has_root();
    let mut out = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !has_root {
                    out.push("..");
                }
            }
            Component::Normal(name) => {
                out.push(name);
                depth += 1;
            }
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
