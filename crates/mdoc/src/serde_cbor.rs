//! # CBOR
//!
//! This module provides CBOR helper functions and types.

use anyhow::{Context, Result, ensure};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialize a value to a CBOR byte vector.
///
/// # Errors
///
/// Returns an error if the value cannot be represented as CBOR.
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: Serialize,
{
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf)?;
    Ok(buf)
}

/// Deserialize a value from a CBOR byte slice.
///
/// The slice must hold exactly one CBOR data item.
///
/// # Errors
///
/// Returns an error if the slice is not valid CBOR for `T` or if bytes remain
/// after the first data item.
pub fn from_slice<T>(slice: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut reader = slice;
    let value = ciborium::from_reader(&mut reader).context("failed to deserialize CBOR")?;
    ensure!(reader.is_empty(), "{} trailing bytes after CBOR data item", reader.len());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use ciborium::Value;

    use super::*;

    #[test]
    fn trailing_bytes() {
        // `1` followed by a stray `2`
        let err = from_slice::<Value>(&[0x01, 0x02]).expect_err("should reject trailing bytes");
        assert_eq!(err.to_string(), "1 trailing bytes after CBOR data item");
    }

    #[test]
    fn truncated() {
        // text string of length 8 with only 2 bytes present
        let err = from_slice::<Value>(&[0x68, 0x61, 0x62]).expect_err("should reject truncation");
        assert!(err.to_string().starts_with("failed to deserialize CBOR"));
    }
}
