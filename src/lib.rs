//! # Bit-level LZW encoder and decoder
//!
//! This crate provides an `Encoder` and a `Decoder` for an LZW variant whose
//! dictionary is built over the binary alphabet rather than over bytes. Code
//! words are written with the smallest width able to address the dictionary
//! at the moment of emission, most significant bit first, and every
//! non-empty stream ends with an END code followed by one final code word
//! for the residual match.
//!
//! The en- and decoder consume and produce byte streams; the [`bits`]
//! module holds the adapters that unpack them into the bit streams the
//! algorithm actually runs on.
//!
//! Compressing a byte buffer in memory:
//!
//! ```
//! use lzb::{decode::Decoder, encode::Encoder};
//!
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//! let mut compressed = vec![];
//! let mut enc = Encoder::new();
//! enc.encode_all(&data[..], &mut compressed).status.unwrap();
//!
//! let mut restored = vec![];
//! let mut dec = Decoder::new();
//! dec.decode_all(&compressed[..], &mut restored).status.unwrap();
//! assert_eq!(&restored, data);
//! ```

/// Alias for a LZW code point.
pub type Code = usize;

pub mod bits;
pub mod codec;
pub mod decode;
pub mod encode;
pub mod table;

#[cfg(test)]
mod proptests;
