//! Reading local files into upload bodies.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use makan_core::{
  asset::{MIME_JPEG, MIME_PDF, MIME_PNG, NewAsset},
  restaurant::image_data_url,
};

/// MIME type implied by a file's extension.
pub fn guess_mime(path: &Path) -> Option<&'static str> {
  let ext = path.extension()?.to_str()?.to_ascii_lowercase();
  match ext.as_str() {
    "pdf" => Some(MIME_PDF),
    "png" => Some(MIME_PNG),
    "jpg" | "jpeg" => Some(MIME_JPEG),
    _ => None,
  }
}

/// Read `path` and encode it as an upload for `restaurant`.
pub async fn read_upload(restaurant: &str, path: &Path) -> Result<NewAsset> {
  let file_type = guess_mime(path)
    .ok_or_else(|| anyhow!("cannot tell the file type of {}", path.display()))?;
  let file_name = path
    .file_name()
    .and_then(|n| n.to_str())
    .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;
  let bytes = tokio::fs::read(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;
  Ok(NewAsset::from_bytes(restaurant, file_name, file_type, &bytes))
}

/// Read an image file into a `data:` URL for a restaurant's card.
pub async fn read_image(path: &Path) -> Result<String> {
  let file_type = guess_mime(path)
    .filter(|t| t.starts_with("image/"))
    .ok_or_else(|| anyhow!("{} is not a PNG or JPEG image", path.display()))?;
  let bytes = tokio::fs::read(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;
  Ok(image_data_url(file_type, &bytes))
}
