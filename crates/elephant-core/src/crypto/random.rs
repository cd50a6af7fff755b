//! OS randomness for salts, IVs and keys.

use zeroize::Zeroizing;

use crate::error::{ArchiveError, Result};

/// Fill a fresh array from the operating system CSPRNG.
pub fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| ArchiveError::System(format!("Random generation failed: {}", e)))?;
    Ok(bytes)
}

/// Like [`random_array`], for values that are secret keys.
pub(crate) fn random_key<const N: usize>() -> Result<Zeroizing<[u8; N]>> {
    let mut key = Zeroizing::new([0u8; N]);
    getrandom::getrandom(&mut *key)
        .map_err(|e| ArchiveError::System(format!("Random generation failed: {}", e)))?;
    Ok(key)
}
