//! Bundles the rendered documents into a single ZIP archive for download.

use crate::error::ReportError;
use crate::render::RenderError;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

/// Media type of the bundle
pub const ARCHIVE_MEDIA_TYPE: &str = "application/zip";

/// Writes `paths` into a deflate archive at `archive_path`, each entry named
/// by its file name. A path listed more than once is stored once.
pub fn bundle<P: AsRef<Path>>(paths: &[P], archive_path: &Path) -> Result<PathBuf, ReportError> {
    write_archive(paths, archive_path).map_err(|source| ReportError::RenderError {
        customer: String::new(),
        source,
    })?;
    Ok(archive_path.to_path_buf())
}

fn write_archive<P: AsRef<Path>>(paths: &[P], archive_path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = archive_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(BufWriter::new(File::create(archive_path)?));
    let mut entries: Vec<String> = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let Some(name) = path.file_name().map(|name| name.to_string_lossy().to_string()) else {
            continue;
        };
        if entries.contains(&name) {
            debug!("Skipping duplicate archive entry '{}'", name);
            continue;
        }
        writer.start_file(name.as_str(), options)?;
        std::io::copy(&mut File::open(path)?, &mut writer)?;
        entries.push(name);
    }
    writer.finish()?;
    info!("Bundled {} document(s) into '{}'", entries.len(), archive_path.display());
    Ok(())
}
