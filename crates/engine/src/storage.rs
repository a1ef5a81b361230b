//! Collection snapshot persistence
//!
//! The snapshot (`collection.snapshot`) stores the schema and every live
//! document. Layout: 4-byte magic, little-endian u32 format version, then the
//! MessagePack payload. Written atomically via temp + fsync + rename.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use zvec_core::{CollectionSchema, Doc, Error, Result};

/// Snapshot file name placed in the collection directory.
pub const SNAPSHOT_FILE_NAME: &str = "collection.snapshot";

const SNAPSHOT_MAGIC: &[u8; 4] = b"ZVCS";
const SNAPSHOT_VERSION: u32 = 1;
const HEADER_LEN: usize = 8;

/// Collection state as loaded from disk
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct SnapshotData {
    pub schema: CollectionSchema,
    /// Documents in primary-key order
    pub docs: Vec<Doc>,
}

/// Borrowed view with the same encoding as `SnapshotData`
#[derive(Serialize)]
struct SnapshotRef<'a> {
    schema: &'a CollectionSchema,
    docs: Vec<&'a Doc>,
}

/// Write a snapshot atomically (temp + rename).
pub(crate) fn write_snapshot<'a>(
    path: &Path,
    schema: &'a CollectionSchema,
    docs: impl IntoIterator<Item = &'a Doc>,
) -> Result<()> {
    let snapshot = SnapshotRef {
        schema,
        docs: docs.into_iter().collect(),
    };
    let payload =
        rmp_serde::to_vec(&snapshot).map_err(|e| Error::Serialization(e.to_string()))?;

    let mut buf = vec![0u8; HEADER_LEN];
    buf[0..4].copy_from_slice(SNAPSHOT_MAGIC);
    LittleEndian::write_u32(&mut buf[4..HEADER_LEN], SNAPSHOT_VERSION);
    buf.extend_from_slice(&payload);

    let tmp_path = path.with_extension("snapshot.tmp");
    {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(&buf)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load a snapshot.
///
/// # Errors
/// `Io` if the file cannot be read, `Serialization` if it is corrupt or
/// written by an unknown format version.
pub(crate) fn load_snapshot(path: &Path) -> Result<SnapshotData> {
    let buf = std::fs::read(path)?;
    if buf.len() < HEADER_LEN {
        return Err(Error::Serialization("snapshot too small".to_string()));
    }
    if &buf[0..4] != SNAPSHOT_MAGIC {
        return Err(Error::Serialization("bad snapshot magic".to_string()));
    }
    let version = LittleEndian::read_u32(&buf[4..HEADER_LEN]);
    if version != SNAPSHOT_VERSION {
        return Err(Error::Serialization(format!(
            "unsupported snapshot version {}",
            version
        )));
    }
    rmp_serde::from_slice(&buf[HEADER_LEN..]).map_err(|e| Error::Serialization(e.to_string()))
}
