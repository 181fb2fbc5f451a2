//! Summary image generated after every committed refresh.
//!
//! [`SummaryReport`] is the text layout, read back from the store. [`render`]
//! turns it into an 800x400 raster and [`ReportCache`] keeps exactly one PNG
//! at `<cache_dir>/summary.png`, replaced wholesale on each write.

mod cache;
pub mod render;

use image::RgbImage;
use thiserror::Error;

pub use cache::{REPORT_FILE_NAME, ReportCache};

use crate::store::{CountryStore, StoreError};

/// How many countries the GDP ranking lists.
pub const TOP_N: i64 = 5;

pub const TITLE: &str = "Country Summary";
pub const TOP_HEADER: &str = "Top 5 countries by estimated GDP";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("reading report data failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub total_countries: i64,
    /// `(name, estimated_gdp)`, highest first, at most [`TOP_N`] entries.
    pub top_gdp: Vec<(String, f64)>,
    pub last_refreshed_at: String,
}

impl SummaryReport {
    /// Read the current store state. `last_refreshed_at` is the batch that
    /// triggered this report.
    pub fn collect(store: &CountryStore, last_refreshed_at: &str) -> Result<Self, ReportError> {
        let (status, top_gdp) = store.report_snapshot(TOP_N)?;
        Ok(Self {
            total_countries: status.total_countries,
            top_gdp,
            last_refreshed_at: last_refreshed_at.to_string(),
        })
    }

    /// Title, count, header, one line per ranked country, footer.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.top_gdp.len() + 4);
        lines.push(TITLE.to_string());
        lines.push(format!("Total Number Of Countries: {}", self.total_countries));
        lines.push(TOP_HEADER.to_string());
        lines.extend(self.entry_lines());
        lines.push(self.footer());
        lines
    }

    fn entry_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.top_gdp
            .iter()
            .map(|(name, gdp)| format!("{name}: {gdp:.2}"))
    }

    fn footer(&self) -> String {
        format!("Last Refreshed At: {}", self.last_refreshed_at)
    }

    /// Draw the fixed layout on a white canvas.
    pub fn render(&self) -> RgbImage {
        use render::{BLACK, LEFT, canvas, draw_text};

        let mut img = canvas();
        draw_text(&mut img, LEFT, 50, TITLE, BLACK);
        draw_text(
            &mut img,
            LEFT,
            100,
            &format!("Total Number Of Countries: {}", self.total_countries),
            BLACK,
        );
        draw_text(&mut img, LEFT, 140, TOP_HEADER, BLACK);
        for (i, line) in self.entry_lines().enumerate() {
            draw_text(&mut img, LEFT, 175 + 25 * i as u32, &line, BLACK);
        }
        draw_text(&mut img, LEFT, 320, &self.footer(), BLACK);
        img
    }
}
