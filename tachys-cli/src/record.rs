//! Binary export of move limits
//!
//! A postcard encoded [`LimitsRecord`] that a motion controller can load
//! as its kinematic limit set.

use eyre::{bail, eyre};
use serde::{Deserialize, Serialize};
use tachys_core::motion::MoveLimits;

/// "TCHY"
pub const RECORD_MAGIC: u32 = 0x5443_4859;

/// Record layout version
pub const RECORD_VERSION: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitsRecord {
    pub magic: u32,
    pub version: u16,
    pub limits: MoveLimits,
}

impl LimitsRecord {
    pub fn new(limits: MoveLimits) -> Self {
        Self {
            magic: RECORD_MAGIC,
            version: RECORD_VERSION,
            limits,
        }
    }

    pub fn to_bytes(&self) -> eyre::Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| eyre!("failed to encode limits record: {e}"))
    }

    /// Decode a record, rejecting foreign data and other versions
    pub fn from_bytes(bytes: &[u8]) -> eyre::Result<Self> {
        let record: Self = postcard::from_bytes(bytes)
            .map_err(|e| eyre!("failed to decode limits record: {e}"))?;
        if record.magic != RECORD_MAGIC {
            bail!("not a limits record (magic {:#010x})", record.magic);
        }
        if record.version != RECORD_VERSION {
            bail!(
                "limits record version mismatch: found {}, expected {RECORD_VERSION}",
                record.version
            );
        }
        Ok(record)
    }
}
