//! A module for all decoding needs.

use std::fmt;
use std::io::{self, Read, Write};
use std::mem;

use crate::bits::{BitRead, BitReader, BitWrite, BitWriter};
use crate::codec;
use crate::table::CodeTable;
use crate::Code;

/// Summary of a whole-stream operation.
pub struct AllResult {
    /// The total number of bytes consumed from the reader.
    pub bytes_read: u64,
    /// The total number of bytes written into the writer.
    pub bytes_written: u64,
    pub status: io::Result<()>,
}

/// Failure while interpreting a compressed stream.
#[derive(Debug)]
pub enum DecodeError {
    /// A code word outside the valid range at its point in the stream.
    InvalidCode(Code),
    /// The underlying byte streams failed.
    Io(io::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidCode(code) => {
                write!(f, "code word {} is outside the code table", code)
            }
            DecodeError::Io(err) => write!(f, "stream failed: {}", err),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Io(err) => Some(err),
            DecodeError::InvalidCode(_) => None,
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        DecodeError::Io(err)
    }
}

/// The state for decompressing one bit stream.
///
/// Rebuilds the encoder's code table one step behind it: every code word
/// after the first triggers the insertion the encoder performed just after
/// emitting the previous one. A fresh value decodes exactly one stream.
pub struct Decoder {
    table: CodeTable,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            table: CodeTable::new(),
        }
    }

    /// Decompresses `source` into `sink`.
    ///
    /// Stops after the final code word of the END handshake; trailing
    /// padding bits are never interpreted. An empty source produces empty
    /// output. The sink is not finished here, see [`decode_all`].
    ///
    /// [`decode_all`]: Decoder::decode_all
    pub fn decode<R: BitRead, W: BitWrite>(
        &mut self,
        source: &mut R,
        sink: &mut W,
    ) -> Result<(), DecodeError> {
        // One slot on top of the table for the END code.
        let Some(first) = codec::read_code(source, self.table.len() + 1)? else {
            return Ok(());
        };
        if first == self.table.len() {
            // END before any content code word.
            return self.last_code(source, sink, &[]);
        }
        let Some(mut prev_node) = self.table.find_code(first) else {
            return Err(DecodeError::InvalidCode(first));
        };
        let mut prev = Vec::new();
        let mut entry = Vec::new();
        self.table.copy_string(first, &mut prev);
        write_bits(sink, &prev)?;

        loop {
            // Two slots on top of the table: the END code, and the entry
            // the encoder had already inserted when it wrote this word.
            let Some(code) = codec::read_code(source, self.table.len() + 2)? else {
                // The zero-padding tail.
                return Ok(());
            };
            if code == self.table.len() + 1 {
                return self.last_code(source, sink, &prev);
            }
            if code == self.table.len() {
                // The one code the encoder knows but we have not built
                // yet: the previous string extended by its own first bit.
                entry.clear();
                entry.extend_from_slice(&prev);
                entry.push(prev[0]);
                write_bits(sink, &entry)?;
                prev_node = self.table.derive(prev_node, prev[0]);
            } else if let Some(node) = self.table.find_code(code) {
                self.table.copy_string(code, &mut entry);
                write_bits(sink, &entry)?;
                self.table.derive(prev_node, entry[0]);
                prev_node = node;
            } else {
                return Err(DecodeError::InvalidCode(code));
            }
            self.table.drop_oldest_redundant();
            mem::swap(&mut prev, &mut entry);
        }
    }

    /// The END handshake: restore all codes, then read the single code
    /// word for the encoder's residual match.
    fn last_code<R: BitRead, W: BitWrite>(
        &mut self,
        source: &mut R,
        sink: &mut W,
        prev: &[bool],
    ) -> Result<(), DecodeError> {
        self.table.restore_all_codes();
        // The table still lacks the entry behind the last content code
        // word; the width accounts for it unless END came first.
        let space = self.table.len() + usize::from(!prev.is_empty());
        let Some(code) = codec::read_code(source, space)? else {
            return Ok(());
        };
        if self.table.contains_code(code) {
            write_bits(sink, &self.table.string_of(code))?;
        } else if code == self.table.len() && !prev.is_empty() {
            // The residual match is exactly the entry we never built.
            write_bits(sink, prev)?;
            sink.write_bit(prev[0])?;
        } else {
            return Err(DecodeError::InvalidCode(code));
        }
        Ok(())
    }

    /// Decompresses a whole byte stream into a byte stream.
    ///
    /// Invalid code words surface as [`io::ErrorKind::InvalidData`] in the
    /// summary's status.
    pub fn decode_all(&mut self, read: impl Read, write: impl Write) -> AllResult {
        let mut source = BitReader::new(read);
        let mut sink = BitWriter::new(write);
        let status = match self.decode(&mut source, &mut sink) {
            Ok(()) => sink.finish(),
            Err(DecodeError::Io(err)) => Err(err),
            Err(err) => Err(io::Error::new(io::ErrorKind::InvalidData, err)),
        };
        AllResult {
            bytes_read: source.bytes_read(),
            bytes_written: sink.bytes_written(),
            status,
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

fn write_bits<W: BitWrite>(sink: &mut W, bits: &[bool]) -> io::Result<()> {
    for &bit in bits {
        sink.write_bit(bit)?;
    }
    Ok(())
}
