//! Filesystem helpers built on `cap-std` and `camino`.

use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 path for reading using ambient authority.
///
/// # Errors
/// Returns the I/O error raised when the file cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create every missing directory above `path`.
///
/// # Errors
/// Returns the I/O error raised when a directory cannot be created.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use wikilink_data::fs::ensure_parent_dir;
///
/// let temp = tempfile::tempdir().expect("create temp dir");
/// let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp dir");
/// let target = root.join("nested/cache/wikidata.db");
///
/// ensure_parent_dir(&target).expect("create parents");
/// assert!(root.join("nested/cache").is_dir());
/// ```
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let (anchor, relative) = split_anchor(parent);
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?.create_dir_all(&relative)
}

/// Report whether `path` names an existing regular file.
///
/// A missing file or parent directory yields `Ok(false)`.
///
/// # Errors
/// Returns any other I/O error raised while reading the metadata.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let Some(name) = path.file_name() else {
        return Ok(false);
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let metadata = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.metadata(name));
    match metadata {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Split a directory into the ambient anchor that cap-std must open first and
/// the relative remainder beneath it.
///
/// The anchor holds any drive prefix, the root and leading `..` components;
/// relative paths are anchored at `.`.
fn split_anchor(dir: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut anchor = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in dir.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir => anchor.push(component.as_str()),
            Utf8Component::ParentDir if relative.as_str().is_empty() => {
                anchor.push(component.as_str());
            }
            Utf8Component::CurDir => {}
            other => relative.push(other.as_str()),
        }
    }
    if anchor.as_str().is_empty() {
        anchor.push(".");
    }
    (anchor, relative)
}
