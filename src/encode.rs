//! A module for all encoding needs.

use std::io::{self, Read, Write};

use crate::bits::{BitRead, BitReader, BitWrite, BitWriter};
use crate::codec;
use crate::decode::AllResult;
use crate::table::{CodeTable, NodeId};

/// The state for compressing one bit stream.
///
/// Reads bits one at a time, extends the longest match known to the code
/// table for as long as possible, and emits the match's code the moment it
/// can no longer grow. A fresh value encodes exactly one stream.
pub struct Encoder {
    table: CodeTable,
    /// End of the longest match so far; the root while no bits are pending.
    current: NodeId,
    /// Whether any input bit has been consumed yet.
    seen_input: bool,
}

impl Encoder {
    pub fn new() -> Self {
        let table = CodeTable::new();
        let current = table.root();
        Encoder {
            table,
            current,
            seen_input: false,
        }
    }

    /// Compresses `source` into `sink`, draining the source.
    ///
    /// An empty source emits nothing at all, not even the END code. The
    /// sink is not finished here; callers that want the zero-padded tail
    /// written out use [`encode_all`] or finish the sink themselves.
    ///
    /// [`encode_all`]: Encoder::encode_all
    pub fn encode<R: BitRead, W: BitWrite>(
        &mut self,
        source: &mut R,
        sink: &mut W,
    ) -> io::Result<()> {
        while let Some(bit) = source.read_bit()? {
            self.seen_input = true;
            self.push_bit(bit, sink)?;
        }
        self.flush(sink)
    }

    fn push_bit<W: BitWrite>(&mut self, bit: bool, sink: &mut W) -> io::Result<()> {
        if let Some(child) = self.table.child(self.current, bit) {
            self.current = child;
            return Ok(());
        }

        // `current` ends the longest match. One slot on top of the table
        // reserves the END code's point.
        let code = self
            .table
            .code(self.current)
            .expect("a longest match is always coded");
        codec::write_code(sink, code, self.table.len() + 1)?;
        // Retire before inserting, so the code above was still valid at
        // the width it went out with; the decoder mirrors this order.
        self.table.drop_oldest_redundant();
        self.table.derive(self.current, bit);
        self.current = self
            .table
            .child(self.table.root(), bit)
            .expect("seed strings are always present");
        Ok(())
    }

    fn flush<W: BitWrite>(&mut self, sink: &mut W) -> io::Result<()> {
        if !self.seen_input {
            return Ok(());
        }
        // The END code is the one codepoint past the current table.
        codec::write_code(sink, self.table.len(), self.table.len() + 1)?;
        // Re-coding every string widens the space again, but lets the
        // residual match go out as a single unambiguous code word.
        self.table.restore_all_codes();
        let code = self
            .table
            .code(self.current)
            .expect("every string is coded after a restore");
        codec::write_code(sink, code, self.table.len())
    }

    /// Compresses a whole byte stream into a byte stream.
    ///
    /// Wraps the streams in the bit adapters, drives [`encode`] and writes
    /// out the zero-padded final byte.
    ///
    /// [`encode`]: Encoder::encode
    pub fn encode_all(&mut self, read: impl Read, write: impl Write) -> AllResult {
        let mut source = BitReader::new(read);
        let mut sink = BitWriter::new(write);
        let status = self
            .encode(&mut source, &mut sink)
            .and_then(|()| sink.finish());
        AllResult {
            bytes_read: source.bytes_read(),
            bytes_written: sink.bytes_written(),
            status,
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Encoder;

    #[test]
    fn empty_input_emits_nothing() {
        let mut compressed = vec![];
        let result = Encoder::new().encode_all(&[][..], &mut compressed);
        result.status.unwrap();
        assert_eq!(result.bytes_read, 0);
        assert_eq!(result.bytes_written, 0);
        assert!(compressed.is_empty());
    }

    #[test]
    fn a_zero_byte_compresses_to_known_bits() {
        // Codes 0, 2, 3 for the growing all-zeros prefixes, then END and
        // the residual "00" against the restored table.
        let mut compressed = vec![];
        let result = Encoder::new().encode_all(&[0x00u8][..], &mut compressed);
        result.status.unwrap();
        assert_eq!(compressed, [0x27, 0x50]);
        assert_eq!(result.bytes_read, 1);
        assert_eq!(result.bytes_written, 2);
    }

    #[test]
    fn byte_counts_match_the_buffers() {
        let data = b"mississippi";
        let mut compressed = vec![];
        let result = Encoder::new().encode_all(&data[..], &mut compressed);
        result.status.unwrap();
        assert_eq!(result.bytes_read, data.len() as u64);
        assert_eq!(result.bytes_written, compressed.len() as u64);
    }
}
