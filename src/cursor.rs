use std::time::{Duration, SystemTime};

use crate::result::{Error, Result};

/// 100-ns ticks between the FILETIME epoch (1601-01-01) and the Unix epoch.
pub(crate) const FILETIME_UNIX_DIFF_TICKS: u64 = 116_444_736_000_000_000;
const TICKS_PER_SECOND: u64 = 10_000_000;

/// A borrowed byte buffer plus a read offset. Mirrors the format's own notion
/// of a single forward-moving read head; nothing here ever rewinds past a
/// byte the caller has already consumed, aside from the documented
/// fixed-window look-ahead.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEof {
                offset: self.offset,
                needed: n,
            });
        }
        let slice = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    /// Advances by `n` bytes without interpreting them.
    pub fn seek_forward(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Reads an unsigned little-endian integer of `n` bytes (1, 2, 4, 8 or 16).
    pub fn read_int(&mut self, n: usize) -> Result<u128> {
        let bytes = self.take(n)?;
        let mut buf = [0u8; 16];
        buf[..n].copy_from_slice(bytes);
        Ok(u128::from_le_bytes(buf))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.read_int(2)? as u16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.read_int(4)? as u32)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.read_int(8)? as u64)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let bytes: [u8; 4] = self.take(4)?.try_into().unwrap();
        Ok(f32::from_le_bytes(bytes))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let bytes: [u8; 8] = self.take(8)?.try_into().unwrap();
        Ok(f64::from_le_bytes(bytes))
    }

    fn decode_utf16(&self, units: &[u8]) -> Result<String> {
        if units.len() % 2 != 0 {
            return Err(Error::InvalidEncoding {
                offset: self.offset,
                kind: "UTF-16LE byte count must be even",
            });
        }
        let code_units: Vec<u16> = units
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16(&code_units).map_err(|_| Error::InvalidEncoding {
            offset: self.offset,
            kind: "ill-formed UTF-16",
        })
    }

    /// `n` bytes interpreted as UTF-16LE, trailing NULs stripped.
    pub fn read_fixed_str(&mut self, n: usize) -> Result<String> {
        let start = self.offset;
        let bytes = self.take(n)?;
        let decoded = self.decode_utf16(bytes).map_err(|_| Error::InvalidEncoding {
            offset: start,
            kind: "ill-formed UTF-16",
        })?;
        Ok(decoded.trim_end_matches('\u{0}').to_owned())
    }

    /// `prefix`-byte length, then `count * mult` bytes of UTF-16LE, NUL-trimmed.
    pub fn read_var_str(&mut self, prefix: usize, mult: usize) -> Result<String> {
        let count = self.read_int(prefix)? as usize;
        let bytes = self.take(count * mult)?;
        let decoded = self.decode_utf16(bytes)?;
        Ok(decoded.trim_end_matches('\u{0}').to_owned())
    }

    /// 4-byte byte-length, then that many bytes as an independent sub-cursor.
    pub fn read_sub_blob(&mut self) -> Result<Cursor<'a>> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        Ok(Cursor::new(bytes))
    }

    /// 4-byte length (expected 8) followed by a FILETIME (100ns ticks since
    /// 1601-01-01 UTC) in the leading 8 bytes of that region, converted to a
    /// UTC instant.
    pub fn read_filetime_var(&mut self) -> Result<SystemTime> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        let mut tick_bytes = [0u8; 8];
        tick_bytes.copy_from_slice(&bytes[..8.min(bytes.len())]);
        Ok(filetime_to_instant(u64::from_le_bytes(tick_bytes)))
    }

    /// 8-byte 100ns tick count converted to a duration.
    pub fn read_duration_ticks(&mut self) -> Result<Duration> {
        let ticks = self.read_u64()?;
        Ok(ticks_to_duration(ticks))
    }

    /// skip 4, u16 count, u32 element stride, then `count` raw elements.
    pub fn read_array(&mut self) -> Result<(u16, Vec<&'a [u8]>)> {
        self.seek_forward(4)?;
        let count = self.read_u16()?;
        let element_len = self.read_u32()? as usize;
        let mut elements = Vec::with_capacity(count as usize);
        for _ in 0..count {
            elements.push(self.take(element_len)?);
        }
        Ok((count, elements))
    }

    /// Reads 8 bytes; the caller is expected to compare them against
    /// [`crate::constants::END_MARKER`] and warn (not fail) on mismatch.
    pub fn read_end_marker(&mut self) -> Result<[u8; 8]> {
        Ok(self.take(8)?.try_into().unwrap())
    }

    /// All bytes from the current offset to the end of this cursor's buffer.
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    /// Non-consuming comparison of the next `pattern.len()` bytes.
    pub fn lookahead(&self, pattern: &[u8]) -> bool {
        self.bytes
            .get(self.offset..self.offset + pattern.len())
            .map(|window| window == pattern)
            .unwrap_or(false)
    }
}

pub fn filetime_to_instant(ticks: u64) -> SystemTime {
    let unix_ticks = ticks.saturating_sub(FILETIME_UNIX_DIFF_TICKS);
    let secs = unix_ticks / TICKS_PER_SECOND;
    let subsec_ticks = unix_ticks % TICKS_PER_SECOND;
    let nanos = subsec_ticks * 100;
    SystemTime::UNIX_EPOCH + Duration::new(secs, nanos as u32)
}

pub fn ticks_to_duration(ticks: u64) -> Duration {
    let secs = ticks / TICKS_PER_SECOND;
    let subsec_ticks = ticks % TICKS_PER_SECOND;
    Duration::new(secs, (subsec_ticks * 100) as u32)
}
