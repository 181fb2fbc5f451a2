use std::{
    fs, io,
    path::{Path, PathBuf},
};

use image::ImageFormat;
use tracing::info;

use super::{ReportError, SummaryReport};

pub const REPORT_FILE_NAME: &str = "summary.png";
const TMP_FILE_NAME: &str = "summary.png.tmp";

/// The on-disk home of the latest summary image.
#[derive(Debug, Clone)]
pub struct ReportCache {
    dir: PathBuf,
}

impl ReportCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(REPORT_FILE_NAME)
    }

    /// Render `report` and replace the cached PNG.
    ///
    /// The image is encoded into a sibling temp file and renamed into place.
    pub fn write(&self, report: &SummaryReport) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.dir)?;

        let tmp = self.dir.join(TMP_FILE_NAME);
        let path = self.path();
        report.render().save_with_format(&tmp, ImageFormat::Png)?;
        fs::rename(&tmp, &path)?;

        info!(path = %path.display(), entries = report.top_gdp.len(), "summary image written");
        Ok(path)
    }

    /// PNG bytes of the cached image, `None` when no refresh has produced one yet.
    pub fn read(&self) -> Result<Option<Vec<u8>>, ReportError> {
        match fs::read(self.path()) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
