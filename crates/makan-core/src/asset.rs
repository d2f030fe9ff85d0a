//! Uploaded files attached to a restaurant: curated menus and gallery photos.
//!
//! Payloads are kept as standard base64 text so that every table can be
//! exported as plain CSV.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result, restaurant::required};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";

/// Largest file, in decoded bytes, accepted by an upload.
pub const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Request-body room needed to carry `bytes` of file as base64, plus
/// `overhead` for the surrounding fields.
pub const fn base64_body_limit(bytes: usize, overhead: usize) -> usize {
  bytes.div_ceil(3) * 4 + overhead
}

/// Which asset table a file belongs to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetKind {
  Menu,
  Gallery,
}

impl AssetKind {
  /// MIME types accepted for uploads of this kind.
  pub fn accepted_types(self) -> &'static [&'static str] {
    match self {
      Self::Menu => &[MIME_PDF, MIME_PNG, MIME_JPEG],
      Self::Gallery => &[MIME_PNG, MIME_JPEG],
    }
  }
}

/// A stored menu file or gallery image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
  pub asset_id:        Uuid,
  pub kind:            AssetKind,
  pub restaurant_name: String,
  pub file_name:       String,
  pub file_type:       String,
  pub base64_data:     String,
  pub timestamp:       DateTime<Utc>,
}

/// How a client should present an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetDisplay {
  /// Render inline from this `data:` URL.
  Image(String),
  /// Offer the decoded bytes as a download.
  Document { file_name: String, bytes: Vec<u8> },
  Unsupported,
}

/// Size of the data a standard base64 string decodes to, without decoding it.
pub fn decoded_len(base64: &str) -> usize {
  let base64 = base64.trim_end();
  let padding = base64.bytes().rev().take_while(|&b| b == b'=').take(2).count();
  (base64.len() * 3 / 4).saturating_sub(padding)
}

impl Asset {
  /// Decoded size of the stored file.
  pub fn size(&self) -> usize {
    decoded_len(&self.base64_data)
  }

  pub fn display(&self) -> AssetDisplay {
    if self.file_type.starts_with("image/") {
      AssetDisplay::Image(format!(
        "data:{};base64,{}",
        self.file_type, self.base64_data
      ))
    } else if self.file_type == MIME_PDF {
      match B64.decode(&self.base64_data) {
        Ok(bytes) => AssetDisplay::Document {
          file_name: self.file_name.clone(),
          bytes,
        },
        Err(_) => AssetDisplay::Unsupported,
      }
    } else {
      AssetDisplay::Unsupported
    }
  }
}

/// Input to [`crate::store::DirectoryStore::add_asset`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
  pub restaurant_name: String,
  pub file_name:       String,
  pub file_type:       String,
  pub base64_data:     String,
}

impl NewAsset {
  /// Encode raw file bytes into an upload.
  pub fn from_bytes(
    restaurant_name: impl Into<String>,
    file_name: impl Into<String>,
    file_type: impl Into<String>,
    bytes: &[u8],
  ) -> Self {
    Self {
      restaurant_name: restaurant_name.into(),
      file_name:       file_name.into(),
      file_type:       file_type.into(),
      base64_data:     B64.encode(bytes),
    }
  }

  /// Check the upload against the rules for `kind`, stamping it with
  /// `timestamp`.
  pub fn validate(self, kind: AssetKind, timestamp: DateTime<Utc>) -> Result<Asset> {
    let restaurant_name = required("restaurant_name", self.restaurant_name)?;
    let file_name = required("file_name", self.file_name)?;
    if self.base64_data.trim().is_empty() {
      return Err(Error::MissingField("base64_data"));
    }

    let file_type = self.file_type.trim().to_ascii_lowercase();
    if !kind.accepted_types().contains(&file_type.as_str()) {
      return Err(Error::UnsupportedFileType {
        kind: kind.into(),
        file_type,
      });
    }

    let base64_data = self.base64_data.trim().to_owned();
    B64.decode(&base64_data)?;

    Ok(Asset {
      asset_id: Uuid::new_v4(),
      kind,
      restaurant_name,
      file_name,
      file_type,
      base64_data,
      timestamp,
    })
  }
}
