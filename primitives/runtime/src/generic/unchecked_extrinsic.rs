// This file is part of Substrate.

// Copyright (C) Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Generic implementation of an unchecked (pre-verification) extrinsic.

use super::CheckedExtrinsic;
use crate::{
	traits::{DecodeCall, IsInherent, SignedExtension, StaticLookup},
	transaction_validity::InvalidTransaction,
	AccountId32, Address, ApplyError, DecodeError, MultiSignature,
};
use alloc::vec::Vec;
use codec::{Compact, Decode, Encode, EncodeLike, Error, Input};
use core::fmt;
use stf_io::Externalities;

/// Current version of the [`UncheckedExtrinsic`] encoded format.
///
/// This version needs to be bumped if the encoded representation changes.
/// It ensures that if the representation is changed and the format is not known,
/// the decoding fails.
pub const EXTRINSIC_FORMAT_VERSION: u8 = 4;

/// The high bit of the version byte marks a signed extrinsic.
const SIGNED_FLAG: u8 = 0b1000_0000;
const VERSION_MASK: u8 = 0b0111_1111;

/// Payloads longer than this are hashed before being signed.
const MAX_RAW_PAYLOAD_LEN: usize = 256;

/// An extrinsic right from the external world. This is unchecked and so can contain a signature.
///
/// Decoding produces it from untrusted bytes without touching storage or verifying anything;
/// [`Self::check`] turns it into a [`CheckedExtrinsic`].
#[derive(PartialEq, Eq, Clone)]
pub struct UncheckedExtrinsic<Call, Extra: SignedExtension> {
	/// The signature, address, number of extrinsics have come before from the same signer and an
	/// era describing the longevity of this transaction, if this is a signed extrinsic.
	pub signature: Option<(Address, MultiSignature, Extra)>,
	/// The function that should be called.
	pub function: Call,
}

impl<Call, Extra: SignedExtension> UncheckedExtrinsic<Call, Extra> {
	/// New instance of a signed extrinsic aka "transaction".
	pub fn new_signed(function: Call, signed: Address, signature: MultiSignature, extra: Extra) -> Self {
		Self { signature: Some((signed, signature, extra)), function }
	}

	/// New instance of an unsigned extrinsic aka "inherent".
	pub fn new_unsigned(function: Call) -> Self {
		Self { signature: None, function }
	}

	/// Is this extrinsic signed?
	pub fn is_signed(&self) -> bool {
		self.signature.is_some()
	}
}

impl<Call: IsInherent, Extra: SignedExtension> UncheckedExtrinsic<Call, Extra> {
	/// An inherent is an unsigned extrinsic whose call is flagged as such.
	pub fn is_inherent(&self) -> bool {
		!self.is_signed() && self.function.is_inherent()
	}
}

impl<Call: DecodeCall, Extra: SignedExtension> UncheckedExtrinsic<Call, Extra> {
	/// Decode a length-prefixed extrinsic.
	///
	/// The compact length prefix must exactly cover the version byte, the optional signature
	/// and the call.
	pub fn decode_typed(input: &mut &[u8]) -> Result<Self, DecodeError> {
		let expected_length = Compact::<u32>::decode(input)?.0 as usize;
		if input.len() < expected_length {
			return Err(DecodeError::InvalidLengthPrefix)
		}

		let before_length = input.len();
		let xt = Self::decode_payload(input)?;

		if before_length - input.len() != expected_length {
			return Err(DecodeError::InvalidLengthPrefix)
		}

		Ok(xt)
	}

	fn decode_payload(input: &mut &[u8]) -> Result<Self, DecodeError> {
		let version = u8::decode(input)?;

		let is_signed = version & SIGNED_FLAG != 0;
		let version = version & VERSION_MASK;
		if version != EXTRINSIC_FORMAT_VERSION {
			return Err(DecodeError::InvalidExtrinsicVersion(version))
		}

		let signature = if is_signed {
			let address = Address::decode(input)?;
			let signature = MultiSignature::decode_typed(input)?;
			let extra = Extra::decode(input)?;
			Some((address, signature, extra))
		} else {
			None
		};
		let function = Call::decode_call(input)?;

		Ok(Self { signature, function })
	}
}

/// Decode a single length-prefixed extrinsic from `bytes`.
pub fn decode_unchecked_extrinsic<Call: DecodeCall, Extra: SignedExtension>(
	bytes: &[u8],
) -> Result<UncheckedExtrinsic<Call, Extra>, DecodeError> {
	let mut input = bytes;
	UncheckedExtrinsic::decode_typed(&mut input)
}

impl<Call, Extra> UncheckedExtrinsic<Call, Extra>
where
	Call: Encode,
	Extra: SignedExtension<AccountId = AccountId32, Call = Call> + Default,
{
	/// Verify the signature and turn `self` into a [`CheckedExtrinsic`].
	///
	/// Reads storage through the extensions' `additional_signed` but never writes to it.
	pub fn check<Lookup>(
		self,
		ext: &dyn Externalities,
	) -> Result<CheckedExtrinsic<AccountId32, Call, Extra>, ApplyError>
	where
		Lookup: StaticLookup<Source = Address, Target = AccountId32>,
	{
		Ok(match self.signature {
			Some((signed, signature, extra)) => {
				let signed = Lookup::lookup(signed)?;
				let raw_payload = SignedPayload::new(self.function, extra, ext)?;
				if !raw_payload.using_encoded(ext, |payload| signature.verify(ext, payload, &signed)) {
					return Err(InvalidTransaction::BadProof.into())
				}

				let (function, extra, _) = raw_payload.deconstruct();
				CheckedExtrinsic { signed: Some(signed), function, extra }
			},
			None => CheckedExtrinsic { signed: None, function: self.function, extra: Extra::default() },
		})
	}
}

/// A payload that has been signed for an unchecked extrinsics.
///
/// Note that the payload that we sign to produce unchecked extrinsic signature
/// is going to be different than the `SignaturePayload` - so the thing the extrinsic
/// actually contains.
pub struct SignedPayload<Call, Extra: SignedExtension>((Call, Extra, Extra::AdditionalSigned));

impl<Call, Extra> SignedPayload<Call, Extra>
where
	Call: Encode,
	Extra: SignedExtension,
{
	/// Create new `SignedPayload`.
	///
	/// This function may fail if `additional_signed` of `Extra` is not available.
	pub fn new(call: Call, extra: Extra, ext: &dyn Externalities) -> Result<Self, ApplyError> {
		let additional_signed = extra.additional_signed(ext)?;
		let raw_payload = (call, extra, additional_signed);
		Ok(Self(raw_payload))
	}

	/// Create new `SignedPayload` from raw components.
	pub fn from_raw(call: Call, extra: Extra, additional_signed: Extra::AdditionalSigned) -> Self {
		Self((call, extra, additional_signed))
	}

	/// Deconstruct the payload into it's components.
	pub fn deconstruct(self) -> (Call, Extra, Extra::AdditionalSigned) {
		self.0
	}

	/// Get an encoded version of this payload.
	///
	/// Payloads longer than 256 bytes are going to be `blake2_256`-hashed.
	pub fn using_encoded<R, F: FnOnce(&[u8]) -> R>(&self, ext: &dyn Externalities, f: F) -> R {
		self.0.using_encoded(|payload| {
			if payload.len() > MAX_RAW_PAYLOAD_LEN {
				f(&ext.blake2_256(payload)[..])
			} else {
				f(payload)
			}
		})
	}

	/// The exact bytes a signer has to sign.
	pub fn signing_bytes(&self, ext: &dyn Externalities) -> Vec<u8> {
		self.using_encoded(ext, |payload| payload.to_vec())
	}
}

impl<Call, Extra> Decode for UncheckedExtrinsic<Call, Extra>
where
	Call: DecodeCall,
	Extra: SignedExtension,
{
	fn decode<I: Input>(input: &mut I) -> Result<Self, Error> {
		// The whole extrinsic is a byte vector, so the prefix bounds what we may read.
		let bytes = Vec::<u8>::decode(input)?;
		let mut payload = &bytes[..];
		let xt = Self::decode_payload(&mut payload)?;
		if !payload.is_empty() {
			return Err(DecodeError::InvalidLengthPrefix.into())
		}
		Ok(xt)
	}
}

impl<Call, Extra> Encode for UncheckedExtrinsic<Call, Extra>
where
	Call: Encode,
	Extra: SignedExtension,
{
	fn encode(&self) -> Vec<u8> {
		let mut tmp = Vec::with_capacity(core::mem::size_of::<Self>());

		// 1 byte version id.
		match self.signature.as_ref() {
			Some(s) => {
				tmp.push(EXTRINSIC_FORMAT_VERSION | SIGNED_FLAG);
				s.encode_to(&mut tmp);
			},
			None => {
				tmp.push(EXTRINSIC_FORMAT_VERSION & VERSION_MASK);
			},
		}
		self.function.encode_to(&mut tmp);

		let compact_len = Compact::<u32>(tmp.len() as u32);

		// Allocate the output buffer with the correct length
		let mut output = Vec::with_capacity(compact_len.size_hint() + tmp.len());

		compact_len.encode_to(&mut output);
		output.extend(tmp);

		output
	}
}

impl<Call, Extra> EncodeLike for UncheckedExtrinsic<Call, Extra>
where
	Extra: SignedExtension,
	Call: Encode,
{
}

impl<Call, Extra> fmt::Debug for UncheckedExtrinsic<Call, Extra>
where
	Call: fmt::Debug,
	Extra: SignedExtension,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"UncheckedExtrinsic({:?}, {:?})",
			self.signature.as_ref().map(|x| (&x.0, &x.2)),
			self.function,
		)
	}
}
