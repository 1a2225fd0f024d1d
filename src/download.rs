//! "Download Dataset" binding

use crate::dataset::Dataset;
use crate::error::Result;

/// Name the downloaded file is saved under
pub const DOWNLOAD_FILENAME: &str = "PEDOT_experiment.csv";
pub const DOWNLOAD_MIME: &str = "text/csv";

/// A file attachment produced for a single click
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPayload {
    pub filename: &'static str,
    pub mime: &'static str,
    pub content: String,
}

impl DownloadPayload {
    /// `Content-Disposition` header value for this attachment
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Serialize the whole dataset for download.
///
/// `n_clicks` is the button's click counter. Zero means the page has just
/// loaded and nobody clicked, so nothing is produced.
pub fn download_dataset(dataset: &Dataset, n_clicks: u32) -> Result<Option<DownloadPayload>> {
    if n_clicks == 0 {
        return Ok(None);
    }

    let mut buf = Vec::new();
    dataset.write_csv(&mut buf)?;
    let content = String::from_utf8(buf).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;

    log::info!("Download #{}: {} rows, {} bytes", n_clicks, dataset.len(), content.len());
    Ok(Some(DownloadPayload {
        filename: DOWNLOAD_FILENAME,
        mime: DOWNLOAD_MIME,
        content,
    }))
}
