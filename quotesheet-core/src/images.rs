//! Image download and embedding

use crate::docx::{Alignment, Document, EMU_PER_INCH, Picture};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
#[cfg(feature = "image-download")]
use std::time::Duration;

/// Source of image bytes for a URL. Any failure yields `None`.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Option<Vec<u8>>;
}

/// Downloads images over HTTP with a fixed deadline
#[cfg(feature = "image-download")]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "image-download")]
impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[cfg(feature = "image-download")]
impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        match self.client.get(url).send() {
            Ok(response) if response.status().is_success() => match response.bytes() {
                Ok(bytes) => Some(bytes.to_vec()),
                Err(e) => {
                    tracing::warn!(%url, error = %e, "failed to read image body");
                    None
                }
            },
            Ok(response) => {
                tracing::warn!(%url, status = %response.status(), "image download failed");
                None
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "image download failed");
                None
            }
        }
    }
}

/// Never fetches anything
pub struct NoFetch;

impl ImageFetcher for NoFetch {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        tracing::debug!(%url, "image downloads disabled");
        None
    }
}

/// The fetcher used when the caller does not supply one
pub fn default_fetcher(timeout_secs: u64) -> Box<dyn ImageFetcher> {
    #[cfg(feature = "image-download")]
    {
        match HttpFetcher::new(timeout_secs) {
            Ok(fetcher) => return Box::new(fetcher),
            Err(e) => tracing::warn!(error = %e, "HTTP client unavailable, images disabled"),
        }
    }
    #[cfg(not(feature = "image-download"))]
    let _ = timeout_secs;
    Box::new(NoFetch)
}

/// Format and pixel size of encoded image bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Inspect image bytes without decoding the pixels
pub fn probe_image(bytes: &[u8]) -> Option<ImageInfo> {
    let format = image::guess_format(bytes).ok()?;
    let extension = *format.extensions_str().first()?;
    let (width, height) = image::ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(ImageInfo {
        extension,
        width,
        height,
    })
}

/// Register `bytes` as media and build a picture `width_inches` wide,
/// keeping the aspect ratio
pub fn picture_from_bytes(
    doc: &mut Document,
    bytes: Vec<u8>,
    width_inches: f64,
    name: &str,
) -> Option<Picture> {
    let info = probe_image(&bytes)?;
    let width_emu = (width_inches * EMU_PER_INCH).round() as u64;
    let height_emu =
        (width_emu as f64 * info.height as f64 / info.width as f64).round() as u64;
    let media = doc.add_media(bytes, info.extension);
    Some(Picture {
        media,
        width_emu,
        height_emu,
        name: name.to_string(),
    })
}

/// Fetches, optionally saves, and embeds images for one report.
///
/// Files are named `imageNNN.<ext>` from a counter that advances for every
/// attempt, successful or not.
pub struct ImageEmbedder<'a> {
    fetcher: &'a dyn ImageFetcher,
    save_dir: Option<PathBuf>,
    counter: u32,
}

impl<'a> ImageEmbedder<'a> {
    pub fn new(fetcher: &'a dyn ImageFetcher, save_dir: Option<PathBuf>) -> Self {
        Self {
            fetcher,
            save_dir,
            counter: 0,
        }
    }

    /// Add a centred picture paragraph for `url`. Returns false (and leaves the
    /// document untouched) when the image is skipped.
    pub fn embed_url(&mut self, doc: &mut Document, url: &str, width_inches: f64) -> bool {
        self.counter += 1;
        let url = url.trim();
        if url.is_empty() {
            tracing::warn!(image = self.counter, "no image URL, skipping image");
            return false;
        }

        let Some(bytes) = self.fetcher.fetch(url) else {
            tracing::warn!(image = self.counter, %url, "skipping image, download failed");
            return false;
        };
        let Some(info) = probe_image(&bytes) else {
            tracing::warn!(image = self.counter, %url, "skipping image, unrecognised format");
            return false;
        };

        let file_name = format!("image{:03}.{}", self.counter, info.extension);
        if let Some(dir) = &self.save_dir {
            let path = dir.join(&file_name);
            let saved = fs::create_dir_all(dir).and_then(|_| fs::write(&path, &bytes));
            match saved {
                Ok(()) => tracing::info!(path = %path.display(), "saved image"),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping image, save failed");
                    return false;
                }
            }
        }

        let Some(picture) = picture_from_bytes(doc, bytes, width_inches, &file_name) else {
            return false;
        };
        let paragraph = doc.add_paragraph();
        paragraph.add_run("").add_picture(picture);
        paragraph.align(Alignment::Center);
        true
    }
}
