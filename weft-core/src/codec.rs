//! Helpers around `parity-scale-codec`, the SCALE implementation used for every value that
//! crosses the host boundary or lands in storage.
//!
//! The codec itself comes from the crate. What lives here is the runtime's view of it:
//! decoding that reports *why* it failed, the compact-integer width rules, and a way to
//! splice already-encoded values together without a length prefix.

use crate::LOG_TARGET;
use parity_scale_codec::{Decode, Encode, Error, Input, Output};
use scale_info::TypeInfo;
use sp_std::vec::Vec;

/// Why a byte sequence could not be decoded.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, TypeInfo)]
pub enum DecodeErrorReason {
    /// The input ended before the shape of the type was complete.
    BufferTooShort,
    /// A tag or mode byte named no known variant, or a field held an impossible value.
    InvalidDiscriminant,
    /// The value decoded, but bytes were left over where none were expected.
    TrailingInput,
}

/// A failure to decode. The codec never panics on malformed input; it returns one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
    pub reason: DecodeErrorReason,
}

impl DecodeError {
    pub const fn new(reason: DecodeErrorReason) -> Self {
        Self { reason }
    }
}

/// An `Input` over a byte slice that remembers whether a read asked for more than was left.
struct TrackedInput<'a> {
    remaining: &'a [u8],
    ran_dry: bool,
}

impl<'a> Input for TrackedInput<'a> {
    fn remaining_len(&mut self) -> Result<Option<usize>, Error> {
        // Withheld so that every shortfall surfaces through `read`.
        Ok(None)
    }

    fn read(&mut self, into: &mut [u8]) -> Result<(), Error> {
        if into.len() > self.remaining.len() {
            self.ran_dry = true;
            return Err("Not enough data to fill buffer".into());
        }
        let (head, tail) = self.remaining.split_at(into.len());
        into.copy_from_slice(head);
        self.remaining = tail;
        Ok(())
    }
}

/// Decode a `T` from the front of `bytes`, returning it together with the unread remainder.
pub fn decode_prefix<T: Decode>(bytes: &[u8]) -> Result<(T, &[u8]), DecodeError> {
    let mut input = TrackedInput {
        remaining: bytes,
        ran_dry: false,
    };

    match T::decode(&mut input) {
        Ok(value) => Ok((value, input.remaining)),
        Err(e) => {
            log::debug!(
                target: LOG_TARGET,
                "Failed to decode {}: {:?}",
                core::any::type_name::<T>(),
                e
            );
            let reason = if input.ran_dry {
                DecodeErrorReason::BufferTooShort
            } else {
                DecodeErrorReason::InvalidDiscriminant
            };
            Err(DecodeError::new(reason))
        }
    }
}

/// Decode a `T` that must span all of `bytes`.
pub fn decode_all<T: Decode>(bytes: &[u8]) -> Result<T, DecodeError> {
    let (value, rest) = decode_prefix(bytes)?;
    crate::ensure!(
        rest.is_empty(),
        DecodeError::new(DecodeErrorReason::TrailingInput)
    );
    Ok(value)
}

/// The width a compact integer is encoded with. The mode is carried in the two low bits
/// of the first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactMode {
    /// `0b00`: values below 2^6, one byte.
    SingleByte,
    /// `0b01`: values below 2^14, two bytes.
    TwoByte,
    /// `0b10`: values below 2^30, four bytes.
    FourByte,
    /// `0b11`: anything larger. The upper six bits of the first byte hold the number of
    /// value bytes that follow, minus four.
    BigInteger,
}

impl CompactMode {
    /// Which mode `value` is encoded with.
    pub fn of(value: u128) -> Self {
        match value {
            v if v < 1 << 6 => Self::SingleByte,
            v if v < 1 << 14 => Self::TwoByte,
            v if v < 1 << 30 => Self::FourByte,
            _ => Self::BigInteger,
        }
    }

    /// Which mode an encoding starting with `first` announces.
    pub fn from_prefix(first: u8) -> Self {
        match first & 0b11 {
            0b00 => Self::SingleByte,
            0b01 => Self::TwoByte,
            0b10 => Self::FourByte,
            _ => Self::BigInteger,
        }
    }

    /// The total number of bytes `value` occupies once compact encoded.
    pub fn encoded_len(value: u128) -> usize {
        match Self::of(value) {
            Self::SingleByte => 1,
            Self::TwoByte => 2,
            Self::FourByte => 4,
            Self::BigInteger => {
                let significant = (128 - value.leading_zeros() as usize + 7) / 8;
                1 + significant.max(4)
            }
        }
    }
}

/// Bytes that are already SCALE encoded and are written out as-is, with no length prefix.
///
/// Concatenating the encodings of several values this way yields exactly the encoding of
/// the tuple of those values, which is how the additional-signed data of an extension
/// chain is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Concat(pub Vec<u8>);

impl Concat {
    /// Append the encoding of `value`.
    pub fn push<T: Encode + ?Sized>(&mut self, value: &T) {
        value.encode_to(&mut self.0);
    }
}

impl Encode for Concat {
    fn size_hint(&self) -> usize {
        self.0.len()
    }

    fn encode_to<O: Output + ?Sized>(&self, dest: &mut O) {
        dest.write(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parity_scale_codec::Compact;

    #[derive(Encode, Decode, Debug, PartialEq, Eq)]
    enum Shape {
        #[codec(index = 0)]
        Point,
        #[codec(index = 3)]
        Line(u16, u16),
    }

    #[test]
    fn fixed_width_integers_are_little_endian() {
        assert_eq!(1u32.encode(), vec![1, 0, 0, 0]);
        assert_eq!(0x0102u16.encode(), vec![2, 1]);
        assert_eq!(u64::MAX.encode(), vec![0xff; 8]);
    }

    #[test]
    fn compact_widths_switch_exactly_at_the_boundaries() {
        let cases: [(u32, CompactMode, usize); 7] = [
            (0, CompactMode::SingleByte, 1),
            (63, CompactMode::SingleByte, 1),
            (64, CompactMode::TwoByte, 2),
            (16383, CompactMode::TwoByte, 2),
            (16384, CompactMode::FourByte, 4),
            ((1 << 30) - 1, CompactMode::FourByte, 4),
            (1 << 30, CompactMode::BigInteger, 5),
        ];

        for (value, mode, len) in cases {
            let encoded = Compact(value).encode();
            assert_eq!(CompactMode::of(value as u128), mode, "mode of {value}");
            assert_eq!(CompactMode::from_prefix(encoded[0]), mode, "prefix of {value}");
            assert_eq!(encoded.len(), len, "length of {value}");
            assert_eq!(CompactMode::encoded_len(value as u128), len);

            let (decoded, rest) = decode_prefix::<Compact<u32>>(&encoded).unwrap();
            assert_eq!(decoded.0, value);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn compact_known_vectors() {
        assert_eq!(Compact(0u32).encode(), vec![0x00]);
        assert_eq!(Compact(63u32).encode(), vec![0xfc]);
        assert_eq!(Compact(64u32).encode(), vec![0x01, 0x01]);
        assert_eq!(Compact(1u32 << 30).encode(), vec![0x03, 0x00, 0x00, 0x00, 0x40]);
        assert_eq!(
            Compact(u64::MAX).encode(),
            vec![0x13, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
        assert_eq!(CompactMode::encoded_len(u64::MAX as u128), 9);
    }

    #[test]
    fn decode_prefix_leaves_the_rest() {
        let mut bytes = 7u16.encode();
        bytes.extend_from_slice(&[9, 9]);

        let (value, rest) = decode_prefix::<u16>(&bytes).unwrap();
        assert_eq!(value, 7);
        assert_eq!(rest, &[9, 9]);
    }

    #[test]
    fn truncated_input_is_buffer_too_short() {
        let encoded = Shape::Line(1, 2).encode();
        assert_eq!(
            decode_prefix::<Shape>(&encoded[..3]).unwrap_err().reason,
            DecodeErrorReason::BufferTooShort
        );
        assert_eq!(
            decode_prefix::<u32>(&[]).unwrap_err().reason,
            DecodeErrorReason::BufferTooShort
        );
    }

    #[test]
    fn vector_longer_than_input_is_buffer_too_short() {
        // Announces 10 bytes, carries 2.
        let bytes = [Compact(10u32).encode(), vec![1, 2]].concat();
        assert_eq!(
            decode_prefix::<Vec<u8>>(&bytes).unwrap_err().reason,
            DecodeErrorReason::BufferTooShort
        );
    }

    #[test]
    fn unknown_tag_is_invalid_discriminant() {
        assert_eq!(
            decode_prefix::<Shape>(&[1]).unwrap_err().reason,
            DecodeErrorReason::InvalidDiscriminant
        );
        assert_eq!(decode_all::<Shape>(&[0]), Ok(Shape::Point));
    }

    #[test]
    fn decode_all_rejects_trailing_bytes() {
        assert_eq!(
            decode_all::<u8>(&[1, 2]).unwrap_err().reason,
            DecodeErrorReason::TrailingInput
        );
    }

    #[test]
    fn concat_matches_tuple_encoding() {
        let mut concat = Concat::default();
        concat.push(&100u32);
        concat.push(&Compact(5u64));
        concat.push(&());

        assert_eq!(concat.encode(), (100u32, Compact(5u64), ()).encode());
    }
}
