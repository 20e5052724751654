use std::convert::TryFrom;

use crate::error::{DecodeError, Error};
use crate::fixed_width::UUID_WIDTH;

/// A universally unique identifier as defined by RFC-4122 section 4.1.2.
///
/// encoding code = 0x98,
/// category = fixed, width = 16,
/// label = "UUID as defined in section 4.1.2 of RFC-4122"
///
/// Wraps the `uuid` crate's type rather than a bare `[u8; 16]`, since byte
/// layout alone does not give callers RFC-4122 variant/version inspection or
/// a human-readable `Display`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Uuid(uuid::Uuid);

impl Uuid {
    /// Consume the wrapper into its inner 16 bytes.
    pub fn into_inner(self) -> [u8; UUID_WIDTH] {
        *self.0.as_bytes()
    }

    /// Borrow the inner 16 bytes.
    pub fn as_bytes(&self) -> &[u8; UUID_WIDTH] {
        self.0.as_bytes()
    }
}

impl From<[u8; UUID_WIDTH]> for Uuid {
    fn from(val: [u8; UUID_WIDTH]) -> Self {
        Self(uuid::Uuid::from_bytes(val))
    }
}

impl From<Uuid> for [u8; UUID_WIDTH] {
    fn from(val: Uuid) -> Self {
        val.into_inner()
    }
}

impl From<uuid::Uuid> for Uuid {
    fn from(val: uuid::Uuid) -> Self {
        Self(val)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.len() != UUID_WIDTH {
            return Err(DecodeError::InvalidLength.into());
        }

        let mut buf = [0u8; UUID_WIDTH];
        buf.copy_from_slice(&value[..UUID_WIDTH]);
        Ok(Self::from(buf))
    }
}

impl std::fmt::Display for Uuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
