//! Zero-byte padding, the only padding scheme the modes work with.

use crate::error::{Error, Result};

/// Fill `block` with zeros from `offset` to the end, returning the number of
/// pad bytes written.
pub fn add_padding(block: &mut [u8], offset: usize) -> Result<usize> {
    if offset > block.len() {
        return Err(Error::BufferTooShort {
            origin: "ZeroPad",
            detail: "the padding offset is beyond the end of the block",
        });
    }
    for b in &mut block[offset..] {
        *b = 0;
    }
    Ok(block.len() - offset)
}

/// The number of trailing zero bytes in `block`.
pub fn padding_length(block: &[u8]) -> usize {
    block.iter().rev().take_while(|&&b| b == 0).count()
}
