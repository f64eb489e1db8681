//! Inline image embedding and attachment content types.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const FALLBACK_IMAGE_TYPE: &str = "image/png";

fn guess(path: &str) -> mime_guess::MimeGuess {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    mime_guess::from_path(Path::new(path))
}

fn guess_image(path: &str) -> Option<&'static str> {
    guess(path).first_raw().filter(|mime| mime.starts_with("image/"))
}

/// Whether `src` points at a local image file that should be embedded.
pub(crate) fn is_local_image(src: &str) -> bool {
    if src.starts_with("data:") || src.starts_with("http://") || src.starts_with("https://") {
        return false;
    }
    guess_image(src).is_some()
}

/// MIME type for an image path, `image/png` when unknown.
pub(crate) fn image_type(path: &str) -> &'static str {
    guess_image(path).unwrap_or(FALLBACK_IMAGE_TYPE)
}

/// Content type for an uploaded attachment.
pub(crate) fn attachment_type(path: &str) -> &'static str {
    guess(path).first_raw().unwrap_or("application/octet-stream")
}

/// Build a `data:` URL for image bytes.
pub(crate) fn data_url(path: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", image_type(path), STANDARD.encode(bytes))
}
