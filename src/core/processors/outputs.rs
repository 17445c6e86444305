use std::path::Path;

use sha1::{Digest, Sha1};
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

use super::data::{data_literal, placeholder_key, resolve_placeholder};
use super::profile::{InstallProfile, Processor};

const MISSING_OUTPUT: &str = "<missing>";

/// Check every file a processor declares in `outputs` against the SHA-1
/// recorded in install data.
pub async fn verify_outputs(
    profile: &InstallProfile,
    processor: &Processor,
    libraries_root: &Path,
) -> LauncherResult<()> {
    for (output, checksum) in &processor.outputs {
        let path = resolve_placeholder(profile, output, libraries_root)?;
        let expected = data_literal(profile, placeholder_key(checksum)?)?.to_ascii_lowercase();

        let actual = match tokio::fs::read(&path).await {
            Ok(bytes) => hex::encode(Sha1::digest(&bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MISSING_OUTPUT.to_string(),
            Err(source) => return Err(LauncherError::Io { path, source }),
        };

        if actual != expected {
            return Err(LauncherError::OutputMismatch {
                path,
                expected,
                actual,
            });
        }
        debug!("Verified processor output {:?}", path);
    }

    Ok(())
}
