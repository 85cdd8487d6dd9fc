use super::NetworkSnapshot;
use crate::error::ExportError;

/// Version written in front of every binary snapshot
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

const HEADER_LEN: usize = 4;

/// Serialize a snapshot to bytes with version header
///
/// # Errors
/// Returns an error if `MessagePack` serialization fails
pub fn snapshot_to_bytes(snapshot: &NetworkSnapshot) -> Result<Vec<u8>, ExportError> {
    let body = rmp_serde::to_vec_named(snapshot)?;

    // [4 bytes u32 version][`MessagePack` data]
    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.extend_from_slice(&CURRENT_SNAPSHOT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Deserialize a snapshot from bytes with version header validation
///
/// # Errors
/// Returns an error if the data is too short, the version is unsupported, or decoding fails
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<NetworkSnapshot, ExportError> {
    let Some((header, body)) = bytes.split_first_chunk::<HEADER_LEN>() else {
        return Err(ExportError::Truncated(bytes.len()));
    };
    let version = u32::from_le_bytes(*header);
    if version != CURRENT_SNAPSHOT_VERSION {
        return Err(ExportError::UnsupportedVersion(version));
    }
    Ok(rmp_serde::from_slice(body)?)
}
