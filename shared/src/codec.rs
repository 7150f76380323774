//! Byte-level primitives of the OSC wire format: NUL-padded strings
//! aligned to 4 bytes, length-prefixed blobs, and the big-endian cursor
//! the decoders run on.

use crate::error::DecodeError;

/// Number of padding bytes written after a string of `len` bytes to
/// reach the next 4-byte boundary. Always in `1..=4`, so a padded
/// string is guaranteed its NUL terminator.
pub fn pad_len(len: usize) -> usize {
    4 * (len / 4 + 1) - len
}

/// Padding bytes written after a blob of `len` bytes. Blobs carry an
/// explicit length word, so an already-aligned payload needs no pad.
fn blob_pad_len(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Appends `s` to `buf` as an OSC padded string: the string bytes, a
/// NUL terminator, then further NULs out to a 4-byte boundary.
pub fn write_padded_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.resize(buf.len() + pad_len(s.len()), 0);
}

/// Appends `data` to `buf` as an OSC blob: a big-endian u32 length, the
/// raw bytes, then zero padding to a 4-byte boundary. The length word
/// itself is never padded.
pub fn write_blob(buf: &mut Vec<u8>, data: &[u8]) {
    buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
    buf.extend_from_slice(data);
    buf.resize(buf.len() + blob_pad_len(data.len()), 0);
}

/// Big-endian cursor over one received datagram.
///
/// All reads bounds-check against the remaining input and fail with a
/// [`DecodeError`] instead of panicking: the input is
/// attacker-controllable network data and must never be trusted to be
/// well formed.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The next byte, without consuming it. Used by the packet sniffer.
    pub fn peek_u8(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    fn take_bytes(
        &mut self,
        len: usize,
        element: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::TruncatedInput { element });
        }
        let start = self.cursor;
        self.cursor += len;
        Ok(&self.bytes[start..self.cursor])
    }

    /// Splits off a sub-reader over exactly `len` bytes. Used for
    /// length-prefixed bundle elements; a length that overruns the
    /// remaining input is rejected before anything is read from it.
    pub fn take(&mut self, len: usize) -> Result<Reader<'a>, DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::MalformedLength {
                declared: len,
                remaining: self.remaining(),
            });
        }
        Ok(Reader::new(self.take_bytes(len, "bundle element")?))
    }

    pub fn read_u32(&mut self, element: &'static str) -> Result<u32, DecodeError> {
        let bytes = self.take_bytes(4, element)?;
        Ok(u32::from_be_bytes(bytes.try_into().expect("4-byte slice")))
    }

    pub fn read_u64(&mut self, element: &'static str) -> Result<u64, DecodeError> {
        let bytes = self.take_bytes(8, element)?;
        Ok(u64::from_be_bytes(bytes.try_into().expect("8-byte slice")))
    }

    pub fn read_i32(&mut self, element: &'static str) -> Result<i32, DecodeError> {
        Ok(self.read_u32(element)? as i32)
    }

    pub fn read_i64(&mut self, element: &'static str) -> Result<i64, DecodeError> {
        Ok(self.read_u64(element)? as i64)
    }

    pub fn read_f32(&mut self, element: &'static str) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(self.read_u32(element)?))
    }

    pub fn read_f64(&mut self, element: &'static str) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.read_u64(element)?))
    }

    /// Reads a padded string: everything up to the first NUL, then the
    /// remaining pad bytes out to the 4-byte boundary. Fails with
    /// `TruncatedInput` if the terminator or the padding never arrives.
    pub fn read_padded_string(&mut self) -> Result<String, DecodeError> {
        let rest = &self.bytes[self.cursor..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::TruncatedInput {
                element: "padded string",
            })?;
        let s = String::from_utf8_lossy(&rest[..len]).into_owned();
        // the terminator counts as the first pad byte
        self.take_bytes(len + pad_len(len), "string padding")?;
        Ok(s)
    }

    /// Reads a blob: a u32 length, that many raw bytes, then the pad.
    /// A declared length larger than the remaining input fails with
    /// `MalformedLength` before any allocation.
    pub fn read_blob(&mut self) -> Result<Vec<u8>, DecodeError> {
        let declared = self.read_u32("blob length")? as usize;
        if declared > self.remaining() {
            return Err(DecodeError::MalformedLength {
                declared,
                remaining: self.remaining(),
            });
        }
        let data = self.take_bytes(declared, "blob payload")?.to_vec();
        self.take_bytes(blob_pad_len(declared), "blob padding")?;
        Ok(data)
    }
}
