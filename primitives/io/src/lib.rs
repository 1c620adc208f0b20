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

//! # Host I/O
//!
//! The boundary between the state-transition function and the host executing it.
//!
//! Everything the runtime needs from the outside world goes through [`Externalities`]: key-value
//! storage (with nested storage transactions), hashing, trie roots and signature primitives. A
//! handle to it is passed explicitly into every operation for the duration of one invocation;
//! nothing is kept in ambient globals.
//!
//! Two implementations exist:
//!
//! - [`TestExternalities`] (with `std`): an in-memory storage backed by real hashing and signature
//!   verification, used natively and in tests.
//! - `wasm::HostExternalities` (inside the sandbox): forwards every method to the corresponding
//!   host function, e.g. `ext_storage_get_version_1`.
//!
//! Entry points receive their input as a `(pointer, length)` pair and return their output as a
//! single packed `u64`, see [`pack_ptr_and_len`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use codec::{Decode, Encode};
use scale_info::TypeInfo;

mod runtime_logger;
mod transactional;

#[cfg(feature = "std")]
mod test_ext;
#[cfg(feature = "std")]
pub mod testing;
#[cfg(feature = "std")]
pub mod trie;

#[cfg(all(target_arch = "wasm32", not(feature = "std")))]
pub mod wasm;

pub use runtime_logger::RuntimeLogger;
#[cfg(feature = "std")]
pub use test_ext::TestExternalities;
pub use transactional::{with_storage_layer, with_transaction, TransactionOutcome};

/// The version of the state layout used when computing a root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Encode, Decode, TypeInfo)]
pub enum StateVersion {
	/// Values are always inlined in the trie.
	#[default]
	V0 = 0,
	/// Large values are stored by hash.
	V1 = 1,
}

impl From<StateVersion> for u8 {
	fn from(version: StateVersion) -> u8 {
		version as u8
	}
}

/// Error verifying an ECDSA signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode, TypeInfo)]
pub enum EcdsaVerifyError {
	/// Incorrect value of R or S.
	BadRS,
	/// Incorrect value of V.
	BadV,
	/// Invalid signature.
	BadSignature,
}

/// Everything the runtime can ask of its host.
///
/// The trait is object safe and is used as `&mut dyn Externalities` throughout the pipeline.
pub trait Externalities {
	/// Read the value stored under `key`.
	fn storage(&self, key: &[u8]) -> Option<Vec<u8>>;

	/// Set `key` to `value`.
	fn set_storage(&mut self, key: &[u8], value: &[u8]);

	/// Remove the value stored under `key`.
	fn clear_storage(&mut self, key: &[u8]);

	/// Whether a value is stored under `key`.
	fn exists_storage(&self, key: &[u8]) -> bool {
		self.storage(key).is_some()
	}

	/// Remove up to `limit` values whose keys start with `prefix`. Returns how many were removed.
	fn clear_prefix(&mut self, prefix: &[u8], limit: Option<u32>) -> u32;

	/// Commit all pending changes and return the root of the resulting state.
	///
	/// The host is trusted to return a 32 byte hash; callers check the length anyway.
	fn storage_root(&mut self, version: StateVersion) -> Vec<u8>;

	/// Open a new nested storage transaction.
	fn storage_start_transaction(&mut self);

	/// Discard all changes made since the matching [`Self::storage_start_transaction`].
	fn storage_rollback_transaction(&mut self);

	/// Keep all changes made since the matching [`Self::storage_start_transaction`].
	fn storage_commit_transaction(&mut self);

	fn blake2_128(&self, data: &[u8]) -> [u8; 16];
	fn blake2_256(&self, data: &[u8]) -> [u8; 32];
	fn twox_64(&self, data: &[u8]) -> [u8; 8];
	fn twox_128(&self, data: &[u8]) -> [u8; 16];

	/// The root of a trie keyed by the compact-encoded index of each item in `input`.
	fn ordered_trie_root(&self, input: &[Vec<u8>], version: StateVersion) -> Vec<u8>;

	fn ed25519_verify(&self, sig: &[u8; 64], msg: &[u8], public: &[u8; 32]) -> bool;

	/// Verify an sr25519 signature made with the `substrate` signing context.
	fn sr25519_verify(&self, sig: &[u8; 64], msg: &[u8], public: &[u8; 32]) -> bool;

	/// Recover the compressed public key that produced `sig` over the pre-hashed `msg`.
	fn secp256k1_ecdsa_recover_compressed(
		&self,
		sig: &[u8; 65],
		msg: &[u8; 32],
	) -> Result<[u8; 33], EcdsaVerifyError>;
}

/// Pack a pointer and a length into the single `u64` returned by entry points and host functions.
///
/// The pointer occupies the lower 32 bits, the length the upper 32 bits.
pub const fn pack_ptr_and_len(ptr: u32, len: u32) -> u64 {
	(ptr as u64) | ((len as u64) << 32)
}

/// Reverse of [`pack_ptr_and_len`].
pub const fn unpack_ptr_and_len(val: u64) -> (u32, u32) {
	let ptr = (val & (!0u32 as u64)) as u32;
	let len = (val >> 32) as u32;
	(ptr, len)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pointer_packing_works() {
		let packed = pack_ptr_and_len(0x1234, 0xabcd);
		assert_eq!(packed, 0x0000_abcd_0000_1234);
		assert_eq!(unpack_ptr_and_len(packed), (0x1234, 0xabcd));
		assert_eq!(unpack_ptr_and_len(pack_ptr_and_len(u32::MAX, 0)), (u32::MAX, 0));
	}

	#[test]
	fn ecdsa_error_encoding_matches_host() {
		let res: Result<[u8; 33], EcdsaVerifyError> = Err(EcdsaVerifyError::BadSignature);
		assert_eq!(res.encode(), vec![1, 2]);
	}
}
