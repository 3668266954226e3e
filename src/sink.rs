use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::Batch;
use crate::error::FeedError;

/// Write a batch document to `dir`, creating the directory if needed.
/// File names are zero-padded so a directory listing sorts in batch order.
pub fn write_batch(dir: &Path, batch: &Batch) -> Result<PathBuf, FeedError> {
    let persistence = |path: PathBuf, source: std::io::Error| FeedError::Persistence {
        index: batch.index,
        path,
        source,
    };

    fs::create_dir_all(dir).map_err(|e| persistence(dir.to_path_buf(), e))?;
    let path = dir.join(format!("batch_{:03}.xml", batch.index));
    fs::write(&path, &batch.text).map_err(|e| persistence(path.clone(), e))?;
    Ok(path)
}
