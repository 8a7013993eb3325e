//! The on-disk session artifact of the messaging client.
//!
//! Its contents are opaque to the bot; only its lifetime is managed here.

use std::{fs, path::Path};

use tracing::{info, warn};

/// Delete the session file if it exists. Returns whether a file was removed.
///
/// Failure to remove is logged, not returned.
pub fn cleanup_session(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    match fs::remove_file(path) {
        Ok(()) => {
            info!("session file cleaned up: {}", path.display());
            true
        }
        Err(e) => {
            warn!("could not remove session file {}: {e}", path.display());
            false
        }
    }
}
