//! Filesystem side of the dataset: image enumeration and the `.txt`
//! sidecar files that hold each image's comma-separated tags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::DatasetError;

pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Recursively collect every image file under `root`, in path order so a
/// reload of the same tree always yields the same sequence.
pub fn enumerate_images(root: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    if !root.is_dir() {
        return Err(DatasetError::RootNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(match err.into_io_error() {
                    Some(io_err) => DatasetError::Io(io_err),
                    None => DatasetError::RootNotFound(root.to_path_buf()),
                });
            }
            Err(err) => {
                warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_file() && is_image_path(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

/// Load the ordered tags for an image. A missing sidecar means the image
/// simply has no tags yet.
pub fn load_tags(image_path: &Path) -> io::Result<Vec<String>> {
    let tags_path = sidecar_path(image_path);
    if !tags_path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(tags_path)?;
    Ok(content
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect())
}

/// Write the sidecar as one comma-space-joined line. Blank values are
/// pending edits and never hit disk.
pub fn save_tags(image_path: &Path, tags: &[String]) -> io::Result<()> {
    let line = tags
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    fs::write(sidecar_path(image_path), line)
}
