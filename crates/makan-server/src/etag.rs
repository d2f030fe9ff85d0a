//! ETag computation for table downloads.
//!
//! An ETag is the SHA-256 of the exported bytes, so it changes exactly when
//! the download would.

use sha2::{Digest, Sha256};

/// Quoted hex SHA-256 of `body`.
pub fn compute_etag(body: &[u8]) -> String {
  let hash = Sha256::digest(body);
  format!("\"{}\"", hex::encode(hash))
}
