//! Photo attachments for listings.

use adforge_error::{FormError, FormErrorKind};
use serde::{Deserialize, Serialize};

/// An uploaded listing photo, carried as base64 with its MIME type.
///
/// The browser-facing surface submits photos as `data:` URLs
/// (`data:image/jpeg;base64,...`); [`Photo::from_data_url`] splits these into
/// the MIME type and payload the provider API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// MIME type, e.g. "image/jpeg"
    pub mime: String,
    /// Base64-encoded image bytes (no data-URL prefix)
    pub data: String,
}

impl Photo {
    /// Parse a `data:image/...;base64,...` URL into a photo.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] when the string is not an image data URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use adforge_core::Photo;
    ///
    /// let photo = Photo::from_data_url("data:image/png;base64,aGVsbG8=").unwrap();
    /// assert_eq!(photo.mime, "image/png");
    /// assert_eq!(photo.data, "aGVsbG8=");
    /// ```
    pub fn from_data_url(url: &str) -> Result<Self, FormError> {
        if !url.starts_with("data:image") {
            return Err(FormError::new(FormErrorKind::InvalidPhoto(
                "expected a data:image URL".to_string(),
            )));
        }

        let rest = &url["data:".len()..];
        let (header, data) = rest.split_once(',').ok_or_else(|| {
            FormError::new(FormErrorKind::InvalidPhoto(
                "data URL missing payload separator".to_string(),
            ))
        })?;

        let mime = header.split(';').next().unwrap_or_default();
        if mime.is_empty() {
            return Err(FormError::new(FormErrorKind::InvalidPhoto(
                "data URL missing MIME type".to_string(),
            )));
        }
        if data.is_empty() {
            return Err(FormError::new(FormErrorKind::InvalidPhoto(
                "data URL has empty payload".to_string(),
            )));
        }

        Ok(Self {
            mime: mime.to_string(),
            data: data.to_string(),
        })
    }

    /// Approximate decoded size of the payload in bytes.
    pub fn approx_size_bytes(&self) -> usize {
        // Base64 expands by 4/3; good enough for limit checks.
        self.data.len() / 4 * 3
    }
}
