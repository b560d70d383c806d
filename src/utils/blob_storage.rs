// heimdall-service/src/utils/blob_storage.rs
//
// Blob side of the store: binary files live under
// <storage_root>/blobs/<bucket>/<path> and are publicly reachable at
// <public_storage_base_url>/<bucket>/<path>. The URL is derived, not
// returned by the store.
use crate::models::ServiceError;
use crate::utils::config::CONFIG;
use crate::utils::fs_utils;
use log::{error, info};
use std::fs;

// Store one binary blob under a bucket-scoped path
pub fn save_blob(bucket: &str, path: &str, bytes: &[u8]) -> Result<(), ServiceError> {
    let blob_path = fs_utils::collection_dir("blobs").join(bucket).join(path);

    if let Some(parent) = blob_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            error!("Failed to create blob directory: {:?}", e);
            ServiceError::Upload(e.to_string())
        })?;
    }

    fs::write(&blob_path, bytes).map_err(|e| {
        error!("Failed to write blob {}/{}: {:?}", bucket, path, e);
        ServiceError::Upload(e.to_string())
    })?;

    info!("✅ Stored blob: {}/{}", bucket, path);
    Ok(())
}

// Public URL for a stored blob, derived from the configured base
pub fn public_url(bucket: &str, path: &str) -> String {
    format!(
        "{}/{}/{}",
        CONFIG.public_storage_base_url.trim_end_matches('/'),
        bucket,
        path
    )
}

// Same derivation for stored paths that already carry their bucket prefix
// (content rows are seeded that way)
pub fn public_url_for_path(path: &str) -> String {
    format!(
        "{}/{}",
        CONFIG.public_storage_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
