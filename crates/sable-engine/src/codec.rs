//! Compiled-unit codec.
//!
//! On-disk layout:
//!
//! ```text
//! ┌──────────────┐
//! │ magic (4)    │  b"SBC\0"
//! ├──────────────┤
//! │ crc32 (4 LE) │  checksum of the payload
//! ├──────────────┤
//! │ payload      │  JSON-serialized Program
//! └──────────────┘
//! ```

use crate::ast::Program;
use crate::error::DecodeError;

/// Magic bytes identifying a compiled sable unit.
pub const MAGIC: [u8; 4] = *b"SBC\0";

/// Size of the fixed header (magic + checksum).
pub const HEADER_SIZE: usize = 8;

/// Encode a program into the compiled-unit format.
pub fn encode(program: &Program) -> Result<Vec<u8>, serde_json::Error> {
    let payload = serde_json::to_vec(program)?;
    let checksum = crc32fast::hash(&payload);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&checksum.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a compiled unit, validating magic and checksum.
pub fn decode(bytes: &[u8]) -> Result<Program, DecodeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DecodeError::Truncated);
    }
    if bytes[..4] != MAGIC {
        return Err(DecodeError::BadMagic);
    }

    let mut crc_bytes = [0u8; 4];
    crc_bytes.copy_from_slice(&bytes[4..HEADER_SIZE]);
    let expected = u32::from_le_bytes(crc_bytes);

    let payload = &bytes[HEADER_SIZE..];
    let found = crc32fast::hash(payload);
    if found != expected {
        return Err(DecodeError::Checksum { expected, found });
    }

    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::compile_source;

    #[test]
    fn test_encode_decode() {
        let program = compile_source("VALUE = 42\nname = \"sable\"").unwrap();
        let bytes = encode(&program).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, program);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let program = compile_source("x = 1").unwrap();
        let mut bytes = encode(&program).unwrap();
        bytes[0] = b'X';
        assert!(matches!(decode(&bytes), Err(DecodeError::BadMagic)));
    }

    #[test]
    fn test_truncated_rejected() {
        assert!(matches!(decode(b"SBC"), Err(DecodeError::Truncated)));
    }

    #[test]
    fn test_corrupted_payload_rejected() {
        let program = compile_source("x = 1").unwrap();
        let mut bytes = encode(&program).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        assert!(matches!(decode(&bytes), Err(DecodeError::Checksum { .. })));
    }
}
