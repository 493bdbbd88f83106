//! Adapters between byte streams and the bit streams the codec runs on.
//!
//! Bits travel most significant first within each byte. The reader reports
//! end of stream once the last byte's lowest bit has been handed out; the
//! writer packs bits back into bytes and zero-pads whatever is left of the
//! final byte when it is finished.

use std::io::{self, Read, Write};

/// A source of single bits.
pub trait BitRead {
    /// Returns the next bit, or `None` once the underlying stream is
    /// exhausted.
    fn read_bit(&mut self) -> io::Result<Option<bool>>;
}

/// A sink for single bits.
pub trait BitWrite {
    fn write_bit(&mut self, bit: bool) -> io::Result<()>;
}

/// Unpacks a byte reader into bits, most significant first.
pub struct BitReader<R> {
    inner: R,
    current: u8,
    /// Bits of `current` not yet handed out.
    remaining: u8,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            current: 0,
            remaining: 0,
            bytes_read: 0,
        }
    }

    /// Number of bytes consumed from the underlying reader so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> BitRead for BitReader<R> {
    fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            loop {
                match self.inner.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => break,
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(err) => return Err(err),
                }
            }
            self.current = byte[0];
            self.remaining = 8;
            self.bytes_read += 1;
        }

        self.remaining -= 1;
        Ok(Some(self.current & (1 << self.remaining) != 0))
    }
}

/// Packs bits into a byte writer, most significant first.
///
/// The final partial byte is zero-padded on its low bits and written out by
/// [`finish`], or from the destructor if `finish` was never called. Each
/// buffered byte reaches the writer exactly once; calling `finish` twice is
/// a no-op, and moving the value transfers the buffered bits along with the
/// flush obligation.
///
/// [`finish`]: BitWriter::finish
pub struct BitWriter<W: Write> {
    inner: W,
    current: u8,
    /// Bits of `current` already occupied, starting from the high end.
    filled: u8,
    bytes_written: u64,
    finished: bool,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            current: 0,
            filled: 0,
            bytes_written: 0,
            finished: false,
        }
    }

    /// Number of bytes emitted into the underlying writer so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Access to the underlying writer, e.g. to flush it after [`finish`].
    ///
    /// [`finish`]: BitWriter::finish
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Writes out any buffered partial byte, zero-padded on the low bits.
    ///
    /// Destructors cannot report failures, so callers that care about the
    /// final byte reaching the writer should call this themselves.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if self.filled > 0 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.filled = 0;
            self.bytes_written += 1;
        }
        Ok(())
    }
}

impl<W: Write> BitWrite for BitWriter<W> {
    fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        debug_assert!(!self.finished, "bit written into a finished writer");
        self.filled += 1;
        self.current |= u8::from(bit) << (8 - self.filled);
        if self.filled == 8 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.filled = 0;
            self.bytes_written += 1;
        }
        Ok(())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}
