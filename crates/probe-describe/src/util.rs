//! Path helpers.

use std::path::{Component, Path};

/// Path of `to` relative to the directory `from`.
///
/// Both paths are compared component by component without touching the
/// filesystem. Equal paths give `"."`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use probe_describe::util::relative_path;
///
/// assert_eq!(relative_path(Path::new("/srv/app"), Path::new("/srv/app/src/routes.rs")), "src/routes.rs");
/// assert_eq!(relative_path(Path::new("/srv/app/web"), Path::new("/srv/app/src/a.rs")), "../src/a.rs");
/// ```
#[must_use]
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from_segs = segments(from);
    let to_segs = segments(to);

    let common = from_segs
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_segs.len() - common;
    let mut parts: Vec<&str> = std::iter::repeat_n("..", ups).collect();
    parts.extend(to_segs[common..].iter().copied());

    if parts.is_empty() {
        ".".to_owned()
    } else {
        parts.join("/")
    }
}

fn segments(path: &Path) -> Vec<&str> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            Component::ParentDir => Some(".."),
            Component::RootDir | Component::CurDir | Component::Prefix(_) => None,
        })
        .collect()
}
