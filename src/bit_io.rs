/*!
Bit IO over byte streams.

Bits travel most-significant-bit first within each byte. The writer pads
the final partial byte with zeros on flush and records no length metadata;
whoever frames the stream persists the symbol count alongside it.
*/

use core::slice;
use std::io::{self, ErrorKind, Read, Write};

use bitvec::prelude::*;

/// EOF kept apart from real IO failures, so a decoder can tell
/// "ran out of bits" from a broken stream.
#[derive(Debug)]
pub enum ReadError {
    Eof,
    Other(ErrorKind),
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof => Self::Eof,
            kind => Self::Other(kind),
        }
    }
}

/// A `BitReader` yields the bits of an `io::Read` stream in packing order.
#[derive(Debug)]
pub struct BitReader<R> {
    bit_queue: BitQueue,
    inner: R,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self { bit_queue: BitQueue::new(), inner }
    }

    /// Reads the next bit, or `ReadError::Eof` past the last byte.
    pub fn read_bit(&mut self) -> Result<u8, ReadError> {
        if let Some(bit) = self.bit_queue.pop() {
            return Ok(bit);
        }

        let mut byte: u8 = 0;
        self.inner
            .read_exact(slice::from_mut(&mut byte))
            .map(|_| {
                self.bit_queue.fill(byte);
                self.bit_queue.pop().unwrap()
            })
            .map_err(ReadError::from)
    }
}

/// A `BitWriter` buffers bits into bytes MSB-first and writes them to an
/// `io::Write` stream.
#[derive(Debug)]
pub struct BitWriter<W> {
    inner: W,
    bit_queue: BitQueue,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, bit_queue: BitQueue::new() }
    }

    /// Writes a single bit (0 or 1).
    pub fn write_bit(&mut self, bit: u8) -> io::Result<()> {
        debug_assert!(bit <= 1, "tried to write an invalid bit");
        self.bit_queue.push(bit);
        match self.bit_queue.try_flush() {
            Some(byte) => self.inner.write_all(&[byte]),
            None => Ok(()), // queued, reaches the stream once the byte fills
        }
    }

    /// Writes every bit of a code, in order.
    pub fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> io::Result<()> {
        for bit in bits {
            self.write_bit(u8::from(*bit))?;
        }
        Ok(())
    }

    /// Zero-pads the last partial byte and flushes the inner writer.
    pub fn flush(&mut self) -> io::Result<()> {
        while !self.bit_queue.is_empty() {
            self.bit_queue.push(0);
            if let Some(byte) = self.bit_queue.try_flush() {
                self.inner.write_all(&[byte])?;
            }
        }
        self.inner.flush()
    }

    /// Hands back the inner writer after a flush.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Packs a bit sequence into bytes, MSB-first, zero-padding the tail.
pub fn pack(bits: &BitSlice<u8, Msb0>) -> Vec<u8> {
    let mut writer = BitWriter::new(Vec::with_capacity(bits.len().div_ceil(8)));
    // writing to a Vec<u8> cannot fail
    writer.write_bits(bits).unwrap();
    writer.flush().unwrap();
    writer.into_inner()
}

/// Unpacks bytes back into the bit sequence, pad bits included.
/// The caller knows where valid data ends; this function does not.
pub fn unpack(bytes: &[u8]) -> BitVec<u8, Msb0> {
    BitVec::from_slice(bytes)
}

/// An 8 element bit queue (with internal store u8).
/// Overflow panics in debug and discards bits in release.
#[derive(Debug)]
struct BitQueue {
    t: u8,
    count: u8,
}

impl BitQueue {
    fn new() -> Self {
        Self { t: 0, count: 0 }
    }

    fn push(&mut self, bit: u8) {
        debug_assert!(!self.is_full()); // looses bits
        self.t = (self.t << 1) | bit;
        self.count += 1;
    }

    fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }

        self.count -= 1;
        Some((self.t >> self.count) & 1)
    }

    /// Only succeeds once a full byte is queued.
    fn try_flush(&mut self) -> Option<u8> {
        if !self.is_full() {
            return None;
        }

        self.count = 0;
        Some(self.t)
    }

    fn fill(&mut self, byte: u8) {
        debug_assert!(self.is_empty()); // we shouldn't skip bits
        self.count = 8;
        self.t = byte;
    }

    fn is_full(&self) -> bool {
        self.count == 8
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }
}
