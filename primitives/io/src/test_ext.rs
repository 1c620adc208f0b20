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

//! In-memory host used natively and in tests.

use crate::{trie, EcdsaVerifyError, Externalities, StateVersion};
use std::collections::BTreeMap;

/// Signing context shared by every sr25519 signature checked by the runtime.
pub(crate) const SR25519_SIGNING_CTX: &[u8] = b"substrate";

/// A simple in-memory [`Externalities`] implementation.
///
/// Storage transactions are modelled as a stack of snapshots of the whole map. Roots are
/// Merkle-Patricia roots computed by [`crate::trie`].
#[derive(Clone, Debug, Default)]
pub struct TestExternalities {
	storage: BTreeMap<Vec<u8>, Vec<u8>>,
	transactions: Vec<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl TestExternalities {
	/// Create a new instance seeded with `storage`.
	pub fn new(storage: BTreeMap<Vec<u8>, Vec<u8>>) -> Self {
		Self { storage, transactions: Vec::new() }
	}

	/// Execute the given closure while `self` is set as the host.
	pub fn execute_with<R>(&mut self, f: impl FnOnce(&mut dyn Externalities) -> R) -> R {
		f(self)
	}

	/// A view of the current key-value pairs.
	pub fn pairs(&self) -> &BTreeMap<Vec<u8>, Vec<u8>> {
		&self.storage
	}

	/// Consume `self` and return the current key-value pairs.
	pub fn into_storage(self) -> BTreeMap<Vec<u8>, Vec<u8>> {
		self.storage
	}

	/// The number of currently open storage transactions.
	pub fn transaction_depth(&self) -> usize {
		self.transactions.len()
	}
}

impl From<BTreeMap<Vec<u8>, Vec<u8>>> for TestExternalities {
	fn from(storage: BTreeMap<Vec<u8>, Vec<u8>>) -> Self {
		Self::new(storage)
	}
}

impl Externalities for TestExternalities {
	fn storage(&self, key: &[u8]) -> Option<Vec<u8>> {
		self.storage.get(key).cloned()
	}

	fn set_storage(&mut self, key: &[u8], value: &[u8]) {
		self.storage.insert(key.to_vec(), value.to_vec());
	}

	fn clear_storage(&mut self, key: &[u8]) {
		self.storage.remove(key);
	}

	fn exists_storage(&self, key: &[u8]) -> bool {
		self.storage.contains_key(key)
	}

	fn clear_prefix(&mut self, prefix: &[u8], limit: Option<u32>) -> u32 {
		let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);
		let doomed = self
			.storage
			.range(prefix.to_vec()..)
			.take_while(|(k, _)| k.starts_with(prefix))
			.take(limit)
			.map(|(k, _)| k.clone())
			.collect::<Vec<_>>();
		for key in &doomed {
			self.storage.remove(key);
		}
		doomed.len() as u32
	}

	fn storage_root(&mut self, version: StateVersion) -> Vec<u8> {
		trie::trie_root(self.storage.iter(), version).to_vec()
	}

	fn storage_start_transaction(&mut self) {
		self.transactions.push(self.storage.clone());
	}

	fn storage_rollback_transaction(&mut self) {
		match self.transactions.pop() {
			Some(snapshot) => self.storage = snapshot,
			None => log::error!(target: "runtime::io", "rollback without an open transaction"),
		}
	}

	fn storage_commit_transaction(&mut self) {
		if self.transactions.pop().is_none() {
			log::error!(target: "runtime::io", "commit without an open transaction");
		}
	}

	fn blake2_128(&self, data: &[u8]) -> [u8; 16] {
		sp_crypto_hashing::blake2_128(data)
	}

	fn blake2_256(&self, data: &[u8]) -> [u8; 32] {
		sp_crypto_hashing::blake2_256(data)
	}

	fn twox_64(&self, data: &[u8]) -> [u8; 8] {
		sp_crypto_hashing::twox_64(data)
	}

	fn twox_128(&self, data: &[u8]) -> [u8; 16] {
		sp_crypto_hashing::twox_128(data)
	}

	fn ordered_trie_root(&self, input: &[Vec<u8>], version: StateVersion) -> Vec<u8> {
		trie::ordered_trie_root(input, version).to_vec()
	}

	fn ed25519_verify(&self, sig: &[u8; 64], msg: &[u8], public: &[u8; 32]) -> bool {
		let Ok(public) = ed25519_zebra::VerificationKey::try_from(&public[..]) else {
			return false
		};
		let sig = ed25519_zebra::Signature::from_bytes(sig);
		public.verify(&sig, msg).is_ok()
	}

	fn sr25519_verify(&self, sig: &[u8; 64], msg: &[u8], public: &[u8; 32]) -> bool {
		let Ok(sig) = schnorrkel::Signature::from_bytes(sig) else { return false };
		let Ok(public) = schnorrkel::PublicKey::from_bytes(public) else { return false };
		public.verify_simple(SR25519_SIGNING_CTX, msg, &sig).is_ok()
	}

	fn secp256k1_ecdsa_recover_compressed(
		&self,
		sig: &[u8; 65],
		msg: &[u8; 32],
	) -> Result<[u8; 33], EcdsaVerifyError> {
		let rid = libsecp256k1::RecoveryId::parse(if sig[64] > 26 { sig[64] - 27 } else { sig[64] })
			.map_err(|_| EcdsaVerifyError::BadV)?;
		let sig = libsecp256k1::Signature::parse_overflowing_slice(&sig[..64])
			.map_err(|_| EcdsaVerifyError::BadRS)?;
		let msg = libsecp256k1::Message::parse(msg);
		let pubkey =
			libsecp256k1::recover(&msg, &sig, &rid).map_err(|_| EcdsaVerifyError::BadSignature)?;
		Ok(pubkey.serialize_compressed())
	}
}
