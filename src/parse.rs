use byteorder::{ByteOrder, LittleEndian};

use crate::error::SampQueryError;

/// Take `len` bytes at index `offset` from `data`.
///
/// Mutates `offset` to the index after the bytes.
pub fn get_bytes<'a>(data: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8], SampQueryError> {
    let end: usize = offset
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or(SampQueryError::UnexpectedEof { offset: *offset, needed: len })?;

    let bytes: &[u8] = &data[*offset..end];
    *offset = end;
    Ok(bytes)
}

/// Get the [u8] at index `offset` from `data`.
///
/// Mutates `offset` to the index after the byte.
pub fn get_u8(data: &[u8], offset: &mut usize) -> Result<u8, SampQueryError> {
    Ok(get_bytes(data, offset, 1)?[0])
}

/// Get 2 little-endian bytes (as a [u16]) at index `offset` from `data`.
///
/// Mutates `offset` to the index after the bytes.
pub fn get_u16(data: &[u8], offset: &mut usize) -> Result<u16, SampQueryError> {
    Ok(LittleEndian::read_u16(get_bytes(data, offset, 2)?))
}

/// Get 4 little-endian bytes (as a [u32]) at index `offset` from `data`.
///
/// Mutates `offset` to the index after the bytes.
pub fn get_u32(data: &[u8], offset: &mut usize) -> Result<u32, SampQueryError> {
    Ok(LittleEndian::read_u32(get_bytes(data, offset, 4)?))
}

/// Get 4 little-endian bytes (as an [i32]) at index `offset` from `data`.
///
/// Mutates `offset` to the index after the bytes.
pub fn get_i32(data: &[u8], offset: &mut usize) -> Result<i32, SampQueryError> {
    Ok(LittleEndian::read_i32(get_bytes(data, offset, 4)?))
}

/// Get a string prefixed by a single length byte.
pub fn get_short_bytes<'a>(data: &'a [u8], offset: &mut usize) -> Result<&'a [u8], SampQueryError> {
    let len: usize = get_u8(data, offset)? as usize;
    get_bytes(data, offset, len)
}

/// Get a string prefixed by a 4 byte little-endian length.
pub fn get_long_bytes<'a>(data: &'a [u8], offset: &mut usize) -> Result<&'a [u8], SampQueryError> {
    let len: usize = get_u32(data, offset)? as usize;
    get_bytes(data, offset, len)
}

/// Plain (non-sniffed) string decoding, as used for rule and player names.
pub fn lossy_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
