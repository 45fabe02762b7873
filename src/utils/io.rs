// Byte-level read helpers for the format parsers
//
// Everything here operates on plain `Read`/`Seek` bounds so the parsers work
// the same over files, buffered readers, and in-memory cursors.

use std::io::{Read, Result, Seek, SeekFrom};

/// Read exactly N bytes into a fixed-size array
pub fn read_array<const N: usize, R: Read>(reader: &mut R) -> Result<[u8; N]> {
    let mut buffer = [0u8; N];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

/// Read little-endian 16-bit integer
pub fn read_le_u16<R: Read>(reader: &mut R) -> Result<u16> {
    Ok(u16::from_le_bytes(read_array::<2, R>(reader)?))
}

/// Read little-endian 32-bit integer
pub fn read_le_u32<R: Read>(reader: &mut R) -> Result<u32> {
    Ok(u32::from_le_bytes(read_array::<4, R>(reader)?))
}

/// Read big-endian 32-bit integer
pub fn read_be_u32<R: Read>(reader: &mut R) -> Result<u32> {
    Ok(u32::from_be_bytes(read_array::<4, R>(reader)?))
}

/// Decode a 28-bit ID3v2 syncsafe integer (7 bits per byte)
pub fn decode_syncsafe(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | u32::from(b & 0x7F))
}

/// Skip `count` bytes forward from the current position
pub fn skip_forward<R: Seek>(reader: &mut R, count: u64) -> Result<u64> {
    reader.seek(SeekFrom::Current(count as i64))
}
