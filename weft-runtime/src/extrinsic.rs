//! The extrinsic format and the payload its signature covers.
//!
//! On the wire an extrinsic is a length-prefixed byte vector. Inside, one version byte
//! whose top bit says whether a signature follows, then the optional
//! `(signer, signature, extra)` triple, then the call.

use crate::{Call, SignedExtra};
use parity_scale_codec::{Compact, Decode, Encode, Error, Input, Output};
use sp_core::sr25519;
use sp_std::vec::Vec;
use weft_core::{codec::Concat, types::AccountId};

/// The only extrinsic format version this runtime understands.
pub const EXTRINSIC_FORMAT_VERSION: u8 = 4;

/// Set in the version byte of signed extrinsics.
const SIGNED_FLAG: u8 = 0b1000_0000;

/// Payloads longer than this are hashed before signing.
const MAX_UNHASHED_PAYLOAD: usize = 256;

/// An extrinsic as it arrives from outside. Nothing about it has been checked.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UncheckedExtrinsic {
    pub signature: Option<(AccountId, sr25519::Signature, SignedExtra)>,
    pub function: Call,
}

impl UncheckedExtrinsic {
    pub fn new_signed(
        function: Call,
        signer: AccountId,
        signature: sr25519::Signature,
        extra: SignedExtra,
    ) -> Self {
        Self {
            signature: Some((signer, signature, extra)),
            function,
        }
    }

    pub fn new_unsigned(function: Call) -> Self {
        Self {
            signature: None,
            function,
        }
    }

    /// Sign `function` with `pair`, computing the additional-signed data from `storage` as
    /// the runtime will when it checks the extrinsic.
    #[cfg(feature = "std")]
    pub fn sign<S: weft_core::Storage>(
        function: Call,
        extra: SignedExtra,
        pair: &sr25519::Pair,
        storage: &S,
    ) -> Result<Self, weft_core::validity::TransactionValidityError> {
        use sp_core::Pair;

        let additional = extra
            .extensions()
            .additional_signed::<Call, _>(&crate::CONFIG, storage)?;
        let signature =
            SignedPayload::new(&function, &extra, additional).using_encoded(|m| pair.sign(m));

        Ok(Self::new_signed(
            function,
            pair.public().into(),
            signature,
            extra,
        ))
    }
}

impl Encode for UncheckedExtrinsic {
    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        let mut body = Vec::new();
        match &self.signature {
            Some(signature) => {
                body.push(EXTRINSIC_FORMAT_VERSION | SIGNED_FLAG);
                signature.encode_to(&mut body);
            }
            None => body.push(EXTRINSIC_FORMAT_VERSION),
        }
        self.function.encode_to(&mut body);

        Compact::<u32>(body.len() as u32).encode_to(dest);
        dest.write(&body);
    }
}

/// Counts the bytes read through it, so the body can be checked against its length prefix.
struct CountedInput<'a, I> {
    inner: &'a mut I,
    consumed: usize,
}

impl<'a, I: Input> Input for CountedInput<'a, I> {
    fn remaining_len(&mut self) -> Result<Option<usize>, Error> {
        self.inner.remaining_len()
    }

    fn read(&mut self, into: &mut [u8]) -> Result<(), Error> {
        self.inner.read(into)?;
        self.consumed += into.len();
        Ok(())
    }
}

impl Decode for UncheckedExtrinsic {
    fn decode<I: Input>(input: &mut I) -> Result<Self, Error> {
        // The body is read straight from `input`, so running out of bytes mid-body is seen
        // by whoever supplied them. The prefix must match what the body actually used.
        let expected = Compact::<u32>::decode(input)?.0 as usize;
        let mut body = CountedInput {
            inner: input,
            consumed: 0,
        };

        let version = body.read_byte()?;
        if version & !SIGNED_FLAG != EXTRINSIC_FORMAT_VERSION {
            return Err("Unsupported extrinsic format version".into());
        }

        let signature = if version & SIGNED_FLAG != 0 {
            Some(Decode::decode(&mut body)?)
        } else {
            None
        };
        let function = Call::decode(&mut body)?;

        if body.consumed != expected {
            return Err("Extrinsic length prefix does not match its contents".into());
        }

        Ok(Self {
            signature,
            function,
        })
    }
}

/// The bytes a signer signs: the call, the extra and the additional-signed data, hashed
/// with blake2-256 when longer than 256 bytes.
pub struct SignedPayload<'a> {
    call: &'a Call,
    extra: &'a SignedExtra,
    additional: Concat,
}

impl<'a> SignedPayload<'a> {
    pub fn new(call: &'a Call, extra: &'a SignedExtra, additional: Concat) -> Self {
        Self {
            call,
            extra,
            additional,
        }
    }
}

impl<'a> Encode for SignedPayload<'a> {
    fn using_encoded<R, F: FnOnce(&[u8]) -> R>(&self, f: F) -> R {
        (self.call, self.extra, &self.additional).using_encoded(|payload| {
            if payload.len() > MAX_UNHASHED_PAYLOAD {
                f(&sp_io::hashing::blake2_256(payload)[..])
            } else {
                f(payload)
            }
        })
    }
}
