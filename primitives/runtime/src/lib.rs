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

//! # Runtime primitives
//!
//! The data model shared by every part of the state-transition function: headers, blocks and
//! digests, the on-wire extrinsic format and its `Unchecked -> Checked` lifecycle, the
//! transaction-validity and dispatch error families, and the traits that connect calls, signed
//! extensions and lookups to the executive.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use codec::{Decode, Encode, MaxEncodedLen};
use core::fmt;
use scale_info::TypeInfo;
use stf_io::Externalities;

pub use stf_weights::{
	DispatchClass, DispatchInfo, Pays, Perbill, PostDispatchInfo, RuntimeDbWeight, Weight,
};

pub use primitive_types::H256;

pub mod generic;
pub mod inherents;
mod multiaddress;
pub mod traits;
pub mod transaction_validity;
mod version;

pub use multiaddress::{AccountIdLookup, MultiAddress};
pub use version::{ApiId, RuntimeVersion};

use transaction_validity::{TransactionValidityError, UnknownTransaction};

/// The hash type of blocks and state.
pub type Hash = H256;
/// The number of a block.
pub type BlockNumber = u32;
/// Index of a transaction in the chain.
pub type Nonce = u32;
/// Balance of an account.
pub type Balance = u128;
/// Milliseconds since the unix epoch.
pub type Moment = u64;
/// Identifier of an account.
pub type AccountId = AccountId32;
/// The address format used to describe the signer of an extrinsic.
pub type Address = MultiAddress;
/// The signature type of extrinsics.
pub type Signature = MultiSignature;

/// The maximum nesting depth of calls wrapping other calls.
pub const MAX_CALL_DEPTH: u32 = 256;

/// An opaque 32-byte account identifier.
///
/// For ed25519 and sr25519 signers this is the public key itself, for ecdsa signers the
/// `blake2_256` hash of the compressed public key.
#[derive(
	Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Encode, Decode, MaxEncodedLen, TypeInfo,
)]
pub struct AccountId32([u8; 32]);

impl AccountId32 {
	pub const fn new(inner: [u8; 32]) -> Self {
		Self(inner)
	}

	pub fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}
}

impl From<[u8; 32]> for AccountId32 {
	fn from(x: [u8; 32]) -> Self {
		Self::new(x)
	}
}

impl From<AccountId32> for [u8; 32] {
	fn from(x: AccountId32) -> [u8; 32] {
		x.0
	}
}

impl AsRef<[u8]> for AccountId32 {
	fn as_ref(&self) -> &[u8] {
		&self.0[..]
	}
}

impl fmt::Debug for AccountId32 {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x")?;
		for byte in &self.0 {
			write!(f, "{:02x}", byte)?;
		}
		Ok(())
	}
}

/// Signature container that can store known signature types.
#[derive(Eq, PartialEq, Clone, Encode, Decode, TypeInfo)]
pub enum MultiSignature {
	/// An Ed25519 signature.
	#[codec(index = 0)]
	Ed25519([u8; 64]),
	/// An Sr25519 signature.
	#[codec(index = 1)]
	Sr25519([u8; 64]),
	/// An ECDSA/SECP256k1 signature.
	#[codec(index = 2)]
	Ecdsa([u8; 65]),
}

impl fmt::Debug for MultiSignature {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Ed25519(_) => write!(f, "MultiSignature::Ed25519"),
			Self::Sr25519(_) => write!(f, "MultiSignature::Sr25519"),
			Self::Ecdsa(_) => write!(f, "MultiSignature::Ecdsa"),
		}
	}
}

impl MultiSignature {
	/// Decode a signature, reporting an unknown variant tag as a dedicated error.
	pub fn decode_typed(input: &mut &[u8]) -> Result<Self, DecodeError> {
		let tag = u8::decode(input)?;
		match tag {
			0 => Ok(Self::Ed25519(Decode::decode(input)?)),
			1 => Ok(Self::Sr25519(Decode::decode(input)?)),
			2 => Ok(Self::Ecdsa(Decode::decode(input)?)),
			other => Err(DecodeError::InvalidMultiSignatureType(other)),
		}
	}

	/// Verify `self` as a signature of `msg` made by `signer`.
	pub fn verify(&self, ext: &dyn Externalities, msg: &[u8], signer: &AccountId32) -> bool {
		match self {
			Self::Ed25519(sig) => ext.ed25519_verify(sig, msg, signer.as_bytes()),
			Self::Sr25519(sig) => ext.sr25519_verify(sig, msg, signer.as_bytes()),
			Self::Ecdsa(sig) => {
				let m = ext.blake2_256(msg);
				match ext.secp256k1_ecdsa_recover_compressed(sig, &m) {
					Ok(pubkey) => ext.blake2_256(&pubkey) == *signer.as_bytes(),
					_ => false,
				}
			},
		}
	}
}

/// Reason why a dispatch call failed.
#[derive(Eq, Clone, Copy, Encode, Decode, Debug, TypeInfo, MaxEncodedLen)]
pub struct ModuleError {
	/// Module index, matching the metadata module index.
	pub index: u8,
	/// Module specific error value.
	pub error: [u8; 4],
	/// Optional error message.
	#[codec(skip)]
	pub message: Option<&'static str>,
}

impl PartialEq for ModuleError {
	fn eq(&self, other: &Self) -> bool {
		(self.index == other.index) && (self.error == other.error)
	}
}

/// Errors related to transactional storage layers.
#[derive(Eq, PartialEq, Clone, Copy, Encode, Decode, Debug, TypeInfo, MaxEncodedLen)]
pub enum TransactionalError {
	/// Too many transactional layers have been spawned.
	LimitReached,
	/// A transactional layer was expected, but does not exist.
	NoLayer,
}

/// Description of what went wrong when trying to complete an operation on a token.
#[derive(Eq, PartialEq, Clone, Copy, Encode, Decode, Debug, TypeInfo, MaxEncodedLen)]
pub enum TokenError {
	/// Funds are unavailable.
	FundsUnavailable,
	/// Some part of the balance gives the only provider reference to the account and thus cannot
	/// be (re)moved.
	OnlyProvider,
	/// Account cannot exist with the funds that would be given.
	BelowMinimum,
	/// Account cannot be created.
	CannotCreate,
	/// The asset in question is unknown.
	UnknownAsset,
	/// Funds exist but are frozen.
	Frozen,
	/// Operation is not supported by the asset.
	Unsupported,
	/// Account cannot be created for a held balance.
	CannotCreateHold,
	/// Withdrawal would cause unwanted loss of account.
	NotExpendable,
	/// Account cannot receive the assets.
	Blocked,
}

/// Arithmetic errors.
#[derive(Eq, PartialEq, Clone, Copy, Encode, Decode, Debug, TypeInfo, MaxEncodedLen)]
pub enum ArithmeticError {
	/// Underflow.
	Underflow,
	/// Overflow.
	Overflow,
	/// Division by zero.
	DivisionByZero,
}

/// Reason why a dispatch call failed.
#[derive(Eq, Clone, Copy, Encode, Decode, Debug, TypeInfo, PartialEq, MaxEncodedLen)]
pub enum DispatchError {
	/// Some error occurred.
	Other(#[codec(skip)] &'static str),
	/// Failed to lookup some data.
	CannotLookup,
	/// A bad origin.
	BadOrigin,
	/// A custom error in a module.
	Module(ModuleError),
	/// At least one consumer is remaining so the account cannot be destroyed.
	ConsumerRemaining,
	/// There are no providers so the account cannot be created.
	NoProviders,
	/// There are too many consumers so the account cannot be created.
	TooManyConsumers,
	/// An error to do with tokens.
	Token(TokenError),
	/// An arithmetic error.
	Arithmetic(ArithmeticError),
	/// The number of transactional layers has been reached, or we are not in a transactional
	/// layer.
	Transactional(TransactionalError),
	/// Resources exhausted, e.g. attempt to read/write data which is too large to manipulate.
	Exhausted,
	/// The state is corrupt; this is generally not going to fix itself.
	Corruption,
	/// Some resource (e.g. a preimage) is unavailable right now. This might fix itself later.
	Unavailable,
	/// Root origin is not allowed.
	RootNotAllowed,
}

impl From<&'static str> for DispatchError {
	fn from(err: &'static str) -> DispatchError {
		DispatchError::Other(err)
	}
}

impl From<TokenError> for DispatchError {
	fn from(e: TokenError) -> DispatchError {
		Self::Token(e)
	}
}

impl From<ArithmeticError> for DispatchError {
	fn from(e: ArithmeticError) -> DispatchError {
		Self::Arithmetic(e)
	}
}

impl From<StorageError> for DispatchError {
	fn from(e: StorageError) -> DispatchError {
		log::error!(target: "runtime", "storage error during dispatch: {}", e);
		Self::Corruption
	}
}

impl From<traits::LookupError> for DispatchError {
	fn from(_: traits::LookupError) -> Self {
		Self::CannotLookup
	}
}

/// Result of a module function call; either nothing (functions are only called for "side
/// effects") or an error message.
pub type DispatchResult = Result<(), DispatchError>;

/// The error type contained in a `DispatchResultWithPostInfo`.
#[derive(Eq, PartialEq, Clone, Copy, Encode, Decode, Debug, TypeInfo)]
pub struct DispatchErrorWithPostInfo {
	/// Additional information about the `Dispatchable` which is only known post dispatch.
	pub post_info: PostDispatchInfo,
	/// The actual `DispatchResult` indicating whether the dispatch was successful.
	pub error: DispatchError,
}

impl<E> From<E> for DispatchErrorWithPostInfo
where
	E: Into<DispatchError>,
{
	fn from(error: E) -> Self {
		Self { post_info: Default::default(), error: error.into() }
	}
}

/// The return type of a `Dispatchable` in frame. When returned explicitly from
/// a dispatchable function it allows overriding the default `PostDispatchInfo`
/// returned from a dispatch.
pub type DispatchResultWithPostInfo = Result<PostDispatchInfo, DispatchErrorWithPostInfo>;

/// This type specifies the outcome of dispatching a call to a module.
///
/// In case of failure an error specific to the module is returned.
///
/// Failure of the module call dispatching doesn't invalidate the extrinsic and it is still included
/// in the block, therefore all state changes performed by the dispatched call are still persisted.
///
/// For example, if the dispatching of an extrinsic involves inclusion fee payment then these
/// changes are going to be preserved even if the call dispatched failed.
pub type DispatchOutcome = Result<(), DispatchError>;

/// The result of applying of an extrinsic.
///
/// This type is typically used in the context of `BlockBuilder` to signal that the extrinsic
/// in question cannot be included.
///
/// A block containing extrinsics that have a negative inclusion outcome is invalid. A negative
/// result can only occur during the block production, where such extrinsics are detected and
/// removed from the block that is being created and the transaction pool.
///
/// To rehash: every extrinsic in a valid block must return a positive `ApplyExtrinsicResult`.
///
/// Examples of reasons preventing inclusion in a block:
/// - More block weight is required to process the extrinsic than is left in the block being built.
///   This doesn't necessarily mean that the extrinsic is invalid, since it can still be included in
///   the next block if it has enough spare weight available.
/// - The sender doesn't have enough funds to pay the transaction inclusion fee. Including such a
///   transaction in the block doesn't make sense as an error then.
pub type ApplyExtrinsicResult = Result<DispatchOutcome, TransactionValidityError>;

/// A stored value could not be read back or a host-computed root has the wrong shape.
///
/// These are never expected on a healthy chain and abort the current invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
	/// The value under the given key does not decode into its declared type.
	Corrupted(Vec<u8>),
	/// The host returned a root that is not 32 bytes long.
	InvalidRootLength(usize),
}

impl fmt::Display for StorageError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Corrupted(key) => {
				write!(f, "corrupted value under key 0x")?;
				for byte in key {
					write!(f, "{:02x}", byte)?;
				}
				Ok(())
			},
			Self::InvalidRootLength(len) => write!(f, "host returned a {} byte root", len),
		}
	}
}

/// Failure of the `Check`, `Validate` and `Apply` steps of the extrinsic lifecycle.
///
/// Validity errors are an expected outcome for untrusted input; storage errors are fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyError {
	Validity(TransactionValidityError),
	Storage(StorageError),
}

impl<E: Into<TransactionValidityError>> From<E> for ApplyError {
	fn from(e: E) -> Self {
		Self::Validity(e.into())
	}
}

impl From<StorageError> for ApplyError {
	fn from(e: StorageError) -> Self {
		Self::Storage(e)
	}
}

impl From<traits::LookupError> for TransactionValidityError {
	fn from(_: traits::LookupError) -> Self {
		UnknownTransaction::CannotLookup.into()
	}
}

/// Typed failure of the wire decoder.
#[derive(Debug)]
pub enum DecodeError {
	/// The declared length of an extrinsic does not match the bytes it occupies.
	InvalidLengthPrefix,
	/// The extrinsic format version is not supported.
	InvalidExtrinsicVersion(u8),
	/// No module is registered under this index.
	UnknownModule(u8),
	/// The module has no function under this index.
	UnknownFunction(u8),
	/// Calls are nested deeper than [`MAX_CALL_DEPTH`].
	CallDepthExceeded,
	/// The signature variant tag is unknown.
	InvalidMultiSignatureType(u8),
	/// Any other codec failure.
	Codec(codec::Error),
}

impl DecodeError {
	fn as_str(&self) -> &'static str {
		match self {
			Self::InvalidLengthPrefix => "Invalid length prefix",
			Self::InvalidExtrinsicVersion(_) => "Invalid transaction version",
			Self::UnknownModule(_) => "Unknown module index",
			Self::UnknownFunction(_) => "Unknown function index",
			Self::CallDepthExceeded => "Maximum call depth exceeded",
			Self::InvalidMultiSignatureType(_) => "Invalid MultiSignature type",
			Self::Codec(_) => "Codec error",
		}
	}
}

impl fmt::Display for DecodeError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidExtrinsicVersion(v) => write!(f, "{} ({})", self.as_str(), v),
			Self::UnknownModule(i) | Self::UnknownFunction(i) =>
				write!(f, "{} ({})", self.as_str(), i),
			Self::InvalidMultiSignatureType(t) => write!(f, "{} ({})", self.as_str(), t),
			Self::Codec(e) => write!(f, "{}: {}", self.as_str(), e),
			_ => f.write_str(self.as_str()),
		}
	}
}

impl From<codec::Error> for DecodeError {
	fn from(e: codec::Error) -> Self {
		Self::Codec(e)
	}
}

impl From<DecodeError> for codec::Error {
	fn from(e: DecodeError) -> Self {
		match e {
			DecodeError::Codec(e) => e,
			other => other.as_str().into(),
		}
	}
}

/// Evaluate `$x:expr` and if not true return `Err($y:expr)`.
///
/// Used as `ensure!(expression_to_ensure, expression_to_return_on_false)`.
#[macro_export]
macro_rules! ensure {
	( $x:expr, $y:expr $(,)? ) => {{
		if !$x {
			return Err($y.into())
		}
	}};
}

#[cfg(test)]
mod tests {
	use super::*;
	use stf_io::{testing, TestExternalities};

	#[test]
	fn dispatch_error_encoding() {
		let err = DispatchError::Module(ModuleError {
			index: 4,
			error: [2, 0, 0, 0],
			message: Some("RequireSudo"),
		});
		assert_eq!(err.encode(), vec![3, 4, 2, 0, 0, 0]);
		let decoded = DispatchError::decode(&mut &err.encode()[..]).unwrap();
		assert_eq!(decoded, err);

		assert_eq!(DispatchError::Corruption.encode(), vec![11]);
		assert_eq!(DispatchError::Token(TokenError::FundsUnavailable).encode(), vec![7, 0]);
	}

	#[test]
	fn unknown_signature_tag_is_typed() {
		let bytes = [3u8; 70];
		assert!(matches!(
			MultiSignature::decode_typed(&mut &bytes[..]),
			Err(DecodeError::InvalidMultiSignatureType(3))
		));
	}

	#[test]
	fn ecdsa_signer_is_hash_of_public_key() {
		let ext = TestExternalities::default();
		let seed = [9u8; 32];
		let msg = b"payload";
		let signer = AccountId32::new(ext.blake2_256(&testing::ecdsa_public(&seed)));
		let sig = MultiSignature::Ecdsa(testing::ecdsa_sign(&seed, msg));

		assert!(sig.verify(&ext, msg, &signer));
		assert!(!sig.verify(&ext, b"other", &signer));
		assert!(!sig.verify(&ext, msg, &AccountId32::new([0u8; 32])));
	}

	#[test]
	fn storage_error_becomes_corruption() {
		let err: DispatchError = StorageError::Corrupted(vec![1, 2]).into();
		assert_eq!(err, DispatchError::Corruption);
		assert_eq!(format!("{}", StorageError::Corrupted(vec![0xab])), "corrupted value under key 0xab");
	}
}
