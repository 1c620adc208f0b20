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

//! Typed access to the host key-value storage.
//!
//! Every item lives under `twox_128(pallet) ++ twox_128(item)`. Map items append the hashed key
//! to that prefix. A stored value that does not decode into its declared type is reported as
//! [`StorageError::Corrupted`], never replaced by a default.

use alloc::vec::Vec;
use codec::{Decode, Encode, EncodeAppend, EncodeLike, FullCodec};
use core::marker::PhantomData;
use stf_io::Externalities;
use stf_primitives::StorageError;

/// Keys that are not namespaced by a pallet.
pub mod well_known_keys {
	/// Index of the extrinsic currently being applied.
	pub const EXTRINSIC_INDEX: &[u8] = b":extrinsic_index";
	/// Number of wasm linear memory pages the host should provide.
	pub const HEAP_PAGES: &[u8] = b":heappages";
	/// The wasm code of the runtime.
	pub const CODE: &[u8] = b":code";
}

/// The pallet and item names a storage item is stored under.
pub trait StorageInstance {
	const PALLET_PREFIX: &'static str;
	const STORAGE_PREFIX: &'static str;
}

/// Declare a unit type implementing [`StorageInstance`].
#[macro_export]
macro_rules! storage_prefix {
	($vis:vis $name:ident, $pallet:literal, $item:literal) => {
		$vis struct $name;

		impl $crate::storage::StorageInstance for $name {
			const PALLET_PREFIX: &'static str = $pallet;
			const STORAGE_PREFIX: &'static str = $item;
		}
	};
}

/// `twox_128(pallet) ++ twox_128(item)`.
pub fn storage_prefix(ext: &dyn Externalities, pallet: &[u8], item: &[u8]) -> [u8; 32] {
	let mut final_key = [0u8; 32];
	final_key[0..16].copy_from_slice(&ext.twox_128(pallet));
	final_key[16..32].copy_from_slice(&ext.twox_128(item));
	final_key
}

/// Hasher used to build the key of a map entry.
pub trait StorageHasher {
	fn hash(ext: &dyn Externalities, x: &[u8]) -> Vec<u8>;
}

/// `blake2_128(key) ++ key`.
pub struct Blake2_128Concat;

impl StorageHasher for Blake2_128Concat {
	fn hash(ext: &dyn Externalities, x: &[u8]) -> Vec<u8> {
		ext.blake2_128(x).iter().chain(x.iter()).cloned().collect()
	}
}

/// `twox_64(key) ++ key`. Only for keys that can not be chosen by users.
pub struct Twox64Concat;

impl StorageHasher for Twox64Concat {
	fn hash(ext: &dyn Externalities, x: &[u8]) -> Vec<u8> {
		ext.twox_64(x).iter().chain(x.iter()).cloned().collect()
	}
}

/// The key itself.
pub struct Identity;

impl StorageHasher for Identity {
	fn hash(_: &dyn Externalities, x: &[u8]) -> Vec<u8> {
		x.to_vec()
	}
}

/// Raw access to keys that are not namespaced.
pub mod unhashed {
	use super::*;

	/// Read and decode the value under `key`.
	pub fn get<T: Decode>(ext: &dyn Externalities, key: &[u8]) -> Result<Option<T>, StorageError> {
		match ext.storage(key) {
			Some(raw) =>
				T::decode(&mut &raw[..]).map(Some).map_err(|_| StorageError::Corrupted(key.to_vec())),
			None => Ok(None),
		}
	}

	pub fn put<T: Encode + ?Sized>(ext: &mut dyn Externalities, key: &[u8], value: &T) {
		value.using_encoded(|slice| ext.set_storage(key, slice));
	}

	pub fn put_raw(ext: &mut dyn Externalities, key: &[u8], value: &[u8]) {
		ext.set_storage(key, value);
	}

	pub fn kill(ext: &mut dyn Externalities, key: &[u8]) {
		ext.clear_storage(key);
	}

	/// Read, decode and remove the value under `key`.
	pub fn take<T: Decode>(ext: &mut dyn Externalities, key: &[u8]) -> Result<Option<T>, StorageError> {
		let value = get(&*ext, key)?;
		kill(ext, key);
		Ok(value)
	}

	pub fn clear_prefix(ext: &mut dyn Externalities, prefix: &[u8], limit: Option<u32>) -> u32 {
		ext.clear_prefix(prefix, limit)
	}
}

/// A single value stored under `twox_128(pallet) ++ twox_128(item)`.
pub struct StorageValue<Prefix, Value>(PhantomData<(Prefix, Value)>);

impl<Prefix: StorageInstance, Value: FullCodec> StorageValue<Prefix, Value> {
	pub fn hashed_key(ext: &dyn Externalities) -> [u8; 32] {
		storage_prefix(ext, Prefix::PALLET_PREFIX.as_bytes(), Prefix::STORAGE_PREFIX.as_bytes())
	}

	/// The stored value, if any.
	pub fn try_get(ext: &dyn Externalities) -> Result<Option<Value>, StorageError> {
		unhashed::get(ext, &Self::hashed_key(ext))
	}

	pub fn exists(ext: &dyn Externalities) -> bool {
		ext.exists_storage(&Self::hashed_key(ext))
	}

	pub fn put<Arg: EncodeLike<Value>>(ext: &mut dyn Externalities, value: Arg) {
		let key = Self::hashed_key(&*ext);
		unhashed::put(ext, &key, &value);
	}

	pub fn kill(ext: &mut dyn Externalities) {
		let key = Self::hashed_key(&*ext);
		unhashed::kill(ext, &key);
	}

	/// Remove the value, returning what was stored.
	pub fn take_value(ext: &mut dyn Externalities) -> Result<Option<Value>, StorageError> {
		let key = Self::hashed_key(&*ext);
		unhashed::take(ext, &key)
	}
}

impl<Prefix: StorageInstance, Value: FullCodec + Default> StorageValue<Prefix, Value> {
	/// The stored value, or the default when nothing is stored.
	pub fn get(ext: &dyn Externalities) -> Result<Value, StorageError> {
		Self::try_get(ext).map(Option::unwrap_or_default)
	}

	/// Remove the value, returning what was stored or the default.
	pub fn take(ext: &mut dyn Externalities) -> Result<Value, StorageError> {
		Self::take_value(ext).map(Option::unwrap_or_default)
	}

	pub fn mutate<R>(
		ext: &mut dyn Externalities,
		f: impl FnOnce(&mut Value) -> R,
	) -> Result<R, StorageError> {
		let mut value = Self::get(&*ext)?;
		let r = f(&mut value);
		Self::put(ext, &value);
		Ok(r)
	}

	/// Mutate the value, writing it back only if `f` returns `Ok`.
	pub fn try_mutate<R, E: From<StorageError>>(
		ext: &mut dyn Externalities,
		f: impl FnOnce(&mut Value) -> Result<R, E>,
	) -> Result<R, E> {
		let mut value = Self::get(&*ext)?;
		let r = f(&mut value)?;
		Self::put(ext, &value);
		Ok(r)
	}
}

impl<Prefix: StorageInstance, Item: FullCodec> StorageValue<Prefix, Vec<Item>> {
	/// Append `item` without decoding the stored list.
	pub fn append<Arg: EncodeLike<Item>>(
		ext: &mut dyn Externalities,
		item: Arg,
	) -> Result<(), StorageError> {
		let key = Self::hashed_key(&*ext);
		let existing = ext.storage(&key).unwrap_or_default();
		let appended = <Vec<Item> as EncodeAppend>::append_or_new(existing, core::iter::once(item))
			.map_err(|_| StorageError::Corrupted(key.to_vec()))?;
		ext.set_storage(&key, &appended);
		Ok(())
	}
}

/// A map stored under `twox_128(pallet) ++ twox_128(item) ++ Hasher(encode(key))`.
pub struct StorageMap<Prefix, Hasher, Key, Value>(PhantomData<(Prefix, Hasher, Key, Value)>);

impl<Prefix, Hasher, Key, Value> StorageMap<Prefix, Hasher, Key, Value>
where
	Prefix: StorageInstance,
	Hasher: StorageHasher,
	Key: FullCodec,
	Value: FullCodec,
{
	/// The key under which all entries of the map are stored.
	pub fn final_prefix(ext: &dyn Externalities) -> [u8; 32] {
		storage_prefix(ext, Prefix::PALLET_PREFIX.as_bytes(), Prefix::STORAGE_PREFIX.as_bytes())
	}

	pub fn hashed_key_for<KeyArg: EncodeLike<Key>>(ext: &dyn Externalities, key: KeyArg) -> Vec<u8> {
		let prefix = Self::final_prefix(ext);
		let hashed = key.using_encoded(|k| Hasher::hash(ext, k));
		let mut final_key = Vec::with_capacity(prefix.len() + hashed.len());
		final_key.extend_from_slice(&prefix);
		final_key.extend_from_slice(&hashed);
		final_key
	}

	pub fn try_get<KeyArg: EncodeLike<Key>>(
		ext: &dyn Externalities,
		key: KeyArg,
	) -> Result<Option<Value>, StorageError> {
		unhashed::get(ext, &Self::hashed_key_for(ext, key))
	}

	pub fn contains_key<KeyArg: EncodeLike<Key>>(ext: &dyn Externalities, key: KeyArg) -> bool {
		ext.exists_storage(&Self::hashed_key_for(ext, key))
	}

	pub fn insert<KeyArg: EncodeLike<Key>, ValArg: EncodeLike<Value>>(
		ext: &mut dyn Externalities,
		key: KeyArg,
		value: ValArg,
	) {
		let key = Self::hashed_key_for(&*ext, key);
		unhashed::put(ext, &key, &value);
	}

	pub fn remove<KeyArg: EncodeLike<Key>>(ext: &mut dyn Externalities, key: KeyArg) {
		let key = Self::hashed_key_for(&*ext, key);
		unhashed::kill(ext, &key);
	}

	/// Remove the entry, returning what was stored.
	pub fn take_value<KeyArg: EncodeLike<Key>>(
		ext: &mut dyn Externalities,
		key: KeyArg,
	) -> Result<Option<Value>, StorageError> {
		let key = Self::hashed_key_for(&*ext, key);
		unhashed::take(ext, &key)
	}

	/// Remove up to `limit` entries of the map. Returns how many were removed.
	pub fn clear(ext: &mut dyn Externalities, limit: Option<u32>) -> u32 {
		let prefix = Self::final_prefix(&*ext);
		unhashed::clear_prefix(ext, &prefix, limit)
	}
}

impl<Prefix, Hasher, Key, Item> StorageMap<Prefix, Hasher, Key, Vec<Item>>
where
	Prefix: StorageInstance,
	Hasher: StorageHasher,
	Key: FullCodec,
	Item: FullCodec,
{
	/// Append `item` to the list under `key` without decoding it.
	pub fn append<KeyArg: EncodeLike<Key>, Arg: EncodeLike<Item>>(
		ext: &mut dyn Externalities,
		key: KeyArg,
		item: Arg,
	) -> Result<(), StorageError> {
		let final_key = Self::hashed_key_for(&*ext, key);
		let existing = ext.storage(&final_key).unwrap_or_default();
		let appended = <Vec<Item> as EncodeAppend>::append_or_new(existing, core::iter::once(item))
			.map_err(|_| StorageError::Corrupted(final_key.clone()))?;
		ext.set_storage(&final_key, &appended);
		Ok(())
	}
}

impl<Prefix, Hasher, Key, Value> StorageMap<Prefix, Hasher, Key, Value>
where
	Prefix: StorageInstance,
	Hasher: StorageHasher,
	Key: FullCodec,
	Value: FullCodec + Default,
{
	/// The stored value, or the default when nothing is stored.
	pub fn get<KeyArg: EncodeLike<Key>>(
		ext: &dyn Externalities,
		key: KeyArg,
	) -> Result<Value, StorageError> {
		Self::try_get(ext, key).map(Option::unwrap_or_default)
	}

	pub fn take<KeyArg: EncodeLike<Key>>(
		ext: &mut dyn Externalities,
		key: KeyArg,
	) -> Result<Value, StorageError> {
		Self::take_value(ext, key).map(Option::unwrap_or_default)
	}

	pub fn mutate<KeyArg: EncodeLike<Key>, R>(
		ext: &mut dyn Externalities,
		key: KeyArg,
		f: impl FnOnce(&mut Value) -> R,
	) -> Result<R, StorageError> {
		let final_key = Self::hashed_key_for(&*ext, key);
		let mut value: Value = unhashed::get(&*ext, &final_key)?.unwrap_or_default();
		let r = f(&mut value);
		unhashed::put(ext, &final_key, &value);
		Ok(r)
	}
}
