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

//! # System Module
//!
//! The System module provides low-level access to core types and cross-cutting utilities. It acts
//! as the base layer for other modules to interact with the runtime and the executive.
//!
//! ## Overview
//!
//! The System module defines the core data types used in a runtime. It also provides several
//! utility functions for other modules.
//!
//! In addition, it manages the storage items for extrinsic data, indices, event records and
//! digest items, among other things that support the execution of the current block.
//!
//! It also handles low-level tasks like depositing logs, basic set up and take down of temporary
//! storage entries, and access to previous block hashes.
//!
//! Every function that touches state takes the per-invocation host handle
//! (`&mut dyn Externalities`) explicitly.
//!
//! ## Signed Extensions
//!
//! The System module defines the following extensions:
//!
//!   - [`CheckWeight`]: Checks the weight and length of the block and ensure that it does not
//!     exceed the limits.
//!   - [`CheckNonce`]: Checks the nonce of the transaction. Contains a single payload of type
//!     `T::Nonce`.
//!   - [`CheckMortality`]: Checks the mortality of the transaction. Contains a single payload of
//!     type `Era`.
//!   - [`CheckGenesis`]: Checks the provided genesis hash of the transaction. Must be a part of the
//!     signed payload of the transaction.
//!   - [`CheckSpecVersion`]: Checks that the runtime version is the same as the one used to sign
//!     the transaction.
//!   - [`CheckTxVersion`]: Checks that the transaction version is the same as the one used to sign
//!     the transaction.
//!   - [`CheckNonZeroSender`]: Checks that the sender is not the all-zero account.
//!
//! Look up the runtime aggregator file (e.g. `runtime/src/lib.rs`) to see the full list of signed
//! extensions included in a chain.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::{borrow::Cow, vec::Vec};
use codec::{Compact, Decode, Encode, FullCodec, MaxEncodedLen};
use core::{fmt::Debug, marker::PhantomData};
use scale_info::TypeInfo;
use stf_io::Externalities;
use stf_primitives::{
	generic,
	traits::{BadOrigin, DecodeCall, Dispatchable, Get, GetDispatchInfo, StaticLookup},
	AccountId, Address, BlockNumber, DecodeError, DispatchError, DispatchResultWithPostInfo, Hash,
	ModuleError, Nonce, RuntimeVersion, StorageError,
};
use stf_weights::{
	extract_actual_pays_fee, extract_actual_weight, ConsumedWeight, DispatchClass, DispatchInfo,
	RuntimeDbWeight, Weight,
};

mod extensions;
pub mod limits;
pub mod storage;
mod traits;
pub mod weights;

#[cfg(test)]
pub(crate) mod mock;
#[cfg(test)]
mod tests;

pub use extensions::{
	check_genesis::CheckGenesis, check_mortality::CheckMortality,
	check_non_zero_sender::CheckNonZeroSender, check_nonce::CheckNonce,
	check_spec_version::CheckSpecVersion, check_tx_version::CheckTxVersion,
	check_weight::CheckWeight,
};
pub use traits::{
	BuildGenesisConfig, HookError, Hooks, OnRuntimeUpgrade, PalletInfo, UnfilteredDispatchable,
};
pub use weights::WeightInfo;

use storage::{unhashed, well_known_keys, Blake2_128Concat, StorageMap, StorageValue, Twox64Concat};

/// Log target of the System module.
pub const LOG_TARGET: &str = "runtime::system";

/// Number of references held on an account.
pub type RefCount = u32;

/// An arbitrary storage key.
pub type Key = Vec<u8>;

/// A storage key and value pair.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// System configuration trait. Implemented by runtime.
pub trait Config: 'static + Eq + Clone + Debug {
	/// The aggregated `RuntimeCall` type.
	type RuntimeCall: Dispatchable<RuntimeOrigin = RuntimeOrigin>
		+ GetDispatchInfo
		+ DecodeCall
		+ From<Call<Self>>
		+ Encode
		+ Clone
		+ Debug
		+ Eq;

	/// The aggregated event type of the runtime.
	type RuntimeEvent: From<Event> + FullCodec + Clone + Debug + Eq;

	/// Data to be associated with an account (other than nonce/transaction counter, which this
	/// module does regardless).
	type AccountData: FullCodec + MaxEncodedLen + Default + Clone + Debug + Eq;

	/// Converting trait to take a source type and convert to `AccountId`.
	///
	/// Used to define the type and conversion mechanism for referencing accounts in
	/// transactions.
	type Lookup: StaticLookup<Source = Address, Target = AccountId>;

	/// Block & extrinsics weights: base values and limits.
	type BlockWeights: Get<limits::BlockWeights>;

	/// The maximum length of a block (in bytes).
	type BlockLength: Get<limits::BlockLength>;

	/// The weight of runtime database operations the runtime can invoke.
	type DbWeight: Get<RuntimeDbWeight>;

	/// Get the chain's in-code version.
	type Version: Get<RuntimeVersion>;

	/// Maximum number of block number to block hash mappings to keep (oldest pruned first).
	type BlockHashCount: Get<BlockNumber>;

	/// Provides the index and name of every module of the runtime.
	type PalletInfo: PalletInfo;

	/// Weight information for the extrinsics of this module.
	type SystemWeightInfo: WeightInfo;
}

/// The System module.
pub struct Pallet<T>(PhantomData<T>);

/// Build the [`DispatchError`] for error number `error` of module `P`.
pub fn module_error<T: Config, P: 'static>(error: u8, message: &'static str) -> DispatchError {
	let index = T::PalletInfo::index::<P>()
		.and_then(|index| u8::try_from(index).ok())
		.unwrap_or(u8::MAX);
	DispatchError::Module(ModuleError { index, error: [error, 0, 0, 0], message: Some(message) })
}

/// Origin for the System module.
#[derive(PartialEq, Eq, Clone, Debug, Encode, Decode, TypeInfo, MaxEncodedLen)]
pub enum RawOrigin {
	/// The system itself ordained this dispatch to happen: this is the highest privilege level.
	Root,
	/// It is signed by some public key and we provide the `AccountId`.
	Signed(AccountId),
	/// It is signed by nobody, can be either:
	/// * included and agreed upon by the validators anyway,
	/// * or unsigned transaction validated by a module.
	None,
}

impl From<Option<AccountId>> for RawOrigin {
	fn from(s: Option<AccountId>) -> RawOrigin {
		match s {
			Some(who) => RawOrigin::Signed(who),
			None => RawOrigin::None,
		}
	}
}

/// The origin every call of the runtime is dispatched with.
pub type RuntimeOrigin = RawOrigin;

/// Ensure that the origin `o` represents a signed extrinsic (i.e. transaction).
/// Returns `Ok` with the account that signed the extrinsic or an `Err` otherwise.
pub fn ensure_signed(o: RawOrigin) -> Result<AccountId, BadOrigin> {
	match o {
		RawOrigin::Signed(t) => Ok(t),
		_ => Err(BadOrigin),
	}
}

/// Ensure that the origin `o` represents either a signed extrinsic (i.e. transaction) or the root.
/// Returns `Ok` with the account that signed the extrinsic, `None` if it was root, or an `Err`
/// otherwise.
pub fn ensure_signed_or_root(o: RawOrigin) -> Result<Option<AccountId>, BadOrigin> {
	match o {
		RawOrigin::Root => Ok(None),
		RawOrigin::Signed(t) => Ok(Some(t)),
		_ => Err(BadOrigin),
	}
}

/// Ensure that the origin `o` represents the root. Returns `Ok` or an `Err` otherwise.
pub fn ensure_root(o: RawOrigin) -> Result<(), BadOrigin> {
	match o {
		RawOrigin::Root => Ok(()),
		_ => Err(BadOrigin),
	}
}

/// Ensure that the origin `o` represents an unsigned extrinsic. Returns `Ok` or an `Err` otherwise.
pub fn ensure_none(o: RawOrigin) -> Result<(), BadOrigin> {
	match o {
		RawOrigin::None => Ok(()),
		_ => Err(BadOrigin),
	}
}

/// Information of an account.
#[derive(Clone, Eq, PartialEq, Default, Debug, Encode, Decode, TypeInfo, MaxEncodedLen)]
pub struct AccountInfo<AccountData> {
	/// The number of transactions this account has sent.
	pub nonce: Nonce,
	/// The number of other modules that currently depend on this account's existence. The account
	/// cannot be reaped until this is zero.
	pub consumers: RefCount,
	/// The number of other modules that allow this account to exist. The account may not be reaped
	/// until this and `sufficients` are both zero.
	pub providers: RefCount,
	/// The number of modules that allow this account to exist for their own purposes only. The
	/// account may not be reaped until this and `providers` are both zero.
	pub sufficients: RefCount,
	/// The additional data that belongs to this account. Used to store the balance(s) in a lot of
	/// chains.
	pub data: AccountData,
}

/// A phase of a block's execution.
#[derive(Encode, Decode, Debug, TypeInfo, MaxEncodedLen, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
	/// Applying an extrinsic.
	ApplyExtrinsic(u32),
	/// Finalizing the block.
	Finalization,
	/// Initializing the block.
	#[default]
	Initialization,
}

/// Record of an event happening.
#[derive(Encode, Decode, PartialEq, Eq, Clone, Debug, TypeInfo)]
pub struct EventRecord<E> {
	/// The phase of the block it happened in.
	pub phase: Phase,
	/// The event itself.
	pub event: E,
	/// The list of the topics this event has.
	pub topics: Vec<Hash>,
}

/// Stores the `spec_version` and `spec_name` of when the last runtime upgrade happened.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub struct LastRuntimeUpgradeInfo {
	pub spec_version: Compact<u32>,
	pub spec_name: Cow<'static, str>,
}

impl LastRuntimeUpgradeInfo {
	/// Returns if the runtime was upgraded in comparison of `self` and `current`.
	///
	/// Checks if either the `spec_version` increased or the `spec_name` changed.
	pub fn was_upgraded(&self, current: &RuntimeVersion) -> bool {
		current.spec_version > self.spec_version.0 || current.spec_name != self.spec_name
	}
}

impl From<RuntimeVersion> for LastRuntimeUpgradeInfo {
	fn from(version: RuntimeVersion) -> Self {
		Self { spec_version: version.spec_version.into(), spec_name: version.spec_name }
	}
}

/// Outcome of incrementing the providers of an account.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum IncRefStatus {
	/// Account was created.
	Created,
	/// Account already existed.
	Existed,
}

/// Outcome of decrementing the providers of an account.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DecRefStatus {
	/// Account was destroyed.
	Reaped,
	/// Account still exists.
	Exists,
}

/// Events of the System module.
#[derive(Clone, PartialEq, Eq, Debug, Encode, Decode, TypeInfo)]
pub enum Event {
	/// An extrinsic completed successfully.
	ExtrinsicSuccess { dispatch_info: DispatchInfo },
	/// An extrinsic failed.
	ExtrinsicFailed { dispatch_error: DispatchError, dispatch_info: DispatchInfo },
	/// `:code` was updated.
	CodeUpdated,
	/// A new account was created.
	NewAccount { account: AccountId },
	/// An account was reaped.
	KilledAccount { account: AccountId },
	/// On on-chain remark happened.
	Remarked { sender: AccountId, hash: Hash },
}

storage_prefix!(pub AccountPrefix, "System", "Account");
storage_prefix!(pub ExtrinsicCountPrefix, "System", "ExtrinsicCount");
storage_prefix!(pub BlockWeightPrefix, "System", "BlockWeight");
storage_prefix!(pub AllExtrinsicsLenPrefix, "System", "AllExtrinsicsLen");
storage_prefix!(pub BlockHashPrefix, "System", "BlockHash");
storage_prefix!(pub ExtrinsicDataPrefix, "System", "ExtrinsicData");
storage_prefix!(pub NumberPrefix, "System", "Number");
storage_prefix!(pub ParentHashPrefix, "System", "ParentHash");
storage_prefix!(pub DigestPrefix, "System", "Digest");
storage_prefix!(pub EventsPrefix, "System", "Events");
storage_prefix!(pub EventCountPrefix, "System", "EventCount");
storage_prefix!(pub EventTopicsPrefix, "System", "EventTopics");
storage_prefix!(pub LastRuntimeUpgradePrefix, "System", "LastRuntimeUpgrade");
storage_prefix!(pub ExecutionPhasePrefix, "System", "ExecutionPhase");

/// The full account information for a particular account ID.
pub type Account<T> =
	StorageMap<AccountPrefix, Blake2_128Concat, AccountId, AccountInfo<<T as Config>::AccountData>>;

/// Total extrinsics count for the current block.
pub type ExtrinsicCount = StorageValue<ExtrinsicCountPrefix, u32>;

/// The current weight for the block.
pub type BlockWeight = StorageValue<BlockWeightPrefix, ConsumedWeight>;

/// Total length (in bytes) for all extrinsics put together, for the current block.
pub type AllExtrinsicsLen = StorageValue<AllExtrinsicsLenPrefix, u32>;

/// Map of block numbers to block hashes.
pub type BlockHash = StorageMap<BlockHashPrefix, Twox64Concat, BlockNumber, Hash>;

/// Extrinsics data for the current block (maps an extrinsic's index to its data).
pub type ExtrinsicData = StorageMap<ExtrinsicDataPrefix, Twox64Concat, u32, Vec<u8>>;

/// The current block number being processed. Set by `execute_block`.
pub type Number = StorageValue<NumberPrefix, BlockNumber>;

/// Hash of the previous block.
pub type ParentHash = StorageValue<ParentHashPrefix, Hash>;

/// Digest of the current block, also part of the block header.
pub type Digest = StorageValue<DigestPrefix, generic::Digest>;

/// Events deposited for the current block.
///
/// Never read from within the runtime; it is meant to be queried by off-chain clients.
pub type Events<T> = StorageValue<EventsPrefix, Vec<EventRecord<<T as Config>::RuntimeEvent>>>;

/// The number of events in the `Events<T>` list.
pub type EventCount = StorageValue<EventCountPrefix, u32>;

/// Mapping between a topic (represented by `Hash`) and a vector of indexes of events in the
/// `<Events<T>>` list.
///
/// All topic vectors have deterministic storage locations depending on the topic. This allows
/// light-clients to leverage the changes trie storage tracking mechanism and in case of changes
/// fetch the list of events of interest.
pub type EventTopics = StorageMap<EventTopicsPrefix, Blake2_128Concat, Hash, Vec<(BlockNumber, u32)>>;

/// Stores the `spec_version` and `spec_name` of when the last runtime upgrade happened.
pub type LastRuntimeUpgrade = StorageValue<LastRuntimeUpgradePrefix, LastRuntimeUpgradeInfo>;

/// The execution phase of the block.
pub type ExecutionPhase = StorageValue<ExecutionPhasePrefix, Phase>;

/// Calls of the System module.
#[derive(Clone, PartialEq, Eq, Debug, Encode)]
#[codec(encode_bound())]
#[allow(non_camel_case_types)]
pub enum Call<T: Config> {
	/// Make some on-chain remark.
	#[codec(index = 0)]
	remark { remark: Vec<u8> },
	/// Set the number of pages in the WebAssembly environment's heap.
	#[codec(index = 1)]
	set_heap_pages { pages: u64 },
	/// Set some items of storage.
	#[codec(index = 4)]
	set_storage { items: Vec<KeyValue> },
	/// Kill some items from storage.
	#[codec(index = 5)]
	kill_storage { keys: Vec<Key> },
	/// Kill all storage items with a key that starts with the given prefix.
	///
	/// `subkeys` must be the number of keys under the prefix; it only bounds the weight.
	#[codec(index = 6)]
	kill_prefix { prefix: Key, subkeys: u32 },
	/// Make some on-chain remark and emit event.
	#[codec(index = 7)]
	remark_with_event { remark: Vec<u8> },
	#[doc(hidden)]
	#[codec(skip)]
	__Ignore(PhantomData<T>, core::convert::Infallible),
}

impl<T: Config> DecodeCall for Call<T> {
	fn decode_call_with_depth(input: &mut &[u8], _depth: u32) -> Result<Self, DecodeError> {
		let index = u8::decode(input)?;
		Ok(match index {
			0 => Call::remark { remark: Decode::decode(input)? },
			1 => Call::set_heap_pages { pages: Decode::decode(input)? },
			4 => Call::set_storage { items: Decode::decode(input)? },
			5 => Call::kill_storage { keys: Decode::decode(input)? },
			6 => Call::kill_prefix { prefix: Decode::decode(input)?, subkeys: Decode::decode(input)? },
			7 => Call::remark_with_event { remark: Decode::decode(input)? },
			other => return Err(DecodeError::UnknownFunction(other)),
		})
	}
}

impl<T: Config> GetDispatchInfo for Call<T> {
	fn base_weight(&self) -> Weight {
		match self {
			Call::remark { remark } => T::SystemWeightInfo::remark(remark.len() as u32),
			Call::set_heap_pages { .. } => T::SystemWeightInfo::set_heap_pages(),
			Call::set_storage { items } => T::SystemWeightInfo::set_storage(items.len() as u32),
			Call::kill_storage { keys } => T::SystemWeightInfo::kill_storage(keys.len() as u32),
			Call::kill_prefix { subkeys, .. } => T::SystemWeightInfo::kill_prefix(*subkeys),
			Call::remark_with_event { remark } =>
				T::SystemWeightInfo::remark_with_event(remark.len() as u32),
			Call::__Ignore(_, never) => match *never {},
		}
	}

	fn classify_dispatch(&self, _base: Weight) -> DispatchClass {
		match self {
			Call::remark { .. } | Call::remark_with_event { .. } => DispatchClass::Normal,
			_ => DispatchClass::Operational,
		}
	}
}

impl<T: Config> UnfilteredDispatchable for Call<T> {
	type RuntimeOrigin = RuntimeOrigin;

	fn dispatch_bypass_filter(
		self,
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
	) -> DispatchResultWithPostInfo {
		match self {
			Call::remark { remark } => Pallet::<T>::remark(origin, ext, remark),
			Call::set_heap_pages { pages } => Pallet::<T>::set_heap_pages(origin, ext, pages),
			Call::set_storage { items } => Pallet::<T>::set_storage(origin, ext, items),
			Call::kill_storage { keys } => Pallet::<T>::kill_storage(origin, ext, keys),
			Call::kill_prefix { prefix, subkeys } =>
				Pallet::<T>::kill_prefix(origin, ext, prefix, subkeys),
			Call::remark_with_event { remark } => Pallet::<T>::remark_with_event(origin, ext, remark),
			Call::__Ignore(_, never) => match never {},
		}
	}
}

// Dispatchable functions.
impl<T: Config> Pallet<T> {
	/// Make some on-chain remark.
	///
	/// Can be executed by every `origin`.
	pub fn remark(
		_origin: RuntimeOrigin,
		_ext: &mut dyn Externalities,
		remark: Vec<u8>,
	) -> DispatchResultWithPostInfo {
		let _ = remark;
		Ok(().into())
	}

	/// Set the number of pages in the WebAssembly environment's heap.
	pub fn set_heap_pages(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		pages: u64,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		unhashed::put(ext, well_known_keys::HEAP_PAGES, &pages);
		Self::deposit_log(ext, generic::DigestItem::RuntimeEnvironmentUpdated)?;
		Ok(().into())
	}

	/// Set some items of storage.
	pub fn set_storage(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		items: Vec<KeyValue>,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		for i in &items {
			unhashed::put_raw(ext, &i.0, &i.1);
		}
		Ok(().into())
	}

	/// Kill some items from storage.
	pub fn kill_storage(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		keys: Vec<Key>,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		for key in &keys {
			unhashed::kill(ext, key);
		}
		Ok(().into())
	}

	/// Kill all storage items with a key that starts with the given prefix.
	///
	/// **NOTE:** We rely on the Root origin to provide us the number of subkeys under
	/// the prefix we are removing to accurately calculate the weight of this function.
	pub fn kill_prefix(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		prefix: Key,
		subkeys: u32,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		let removed = unhashed::clear_prefix(ext, &prefix, Some(subkeys));
		log::debug!(target: LOG_TARGET, "kill_prefix removed {} keys", removed);
		Ok(().into())
	}

	/// Make some on-chain remark and emit event.
	pub fn remark_with_event(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		remark: Vec<u8>,
	) -> DispatchResultWithPostInfo {
		let who = ensure_signed(origin)?;
		let hash = Hash::from(ext.blake2_256(&remark[..]));
		Self::deposit_event(ext, Event::Remarked { sender: who, hash })?;
		Ok(().into())
	}
}

impl<T: Config> Hooks for Pallet<T> {}

/// Genesis configuration of the System module.
pub struct GenesisConfig<T> {
	/// The runtime code stored under `:code`. Left out when empty.
	pub code: Vec<u8>,
	#[doc(hidden)]
	pub _config: PhantomData<T>,
}

impl<T> Default for GenesisConfig<T> {
	fn default() -> Self {
		Self { code: Vec::new(), _config: PhantomData }
	}
}

impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
	fn build(&self, ext: &mut dyn Externalities) -> Result<(), StorageError> {
		BlockHash::insert(ext, 0u32, Hash::repeat_byte(69));
		ParentHash::put(ext, Hash::repeat_byte(69));
		LastRuntimeUpgrade::put(ext, LastRuntimeUpgradeInfo::from(T::Version::get()));
		unhashed::put(ext, well_known_keys::EXTRINSIC_INDEX, &0u32);
		if !self.code.is_empty() {
			unhashed::put_raw(ext, well_known_keys::CODE, &self.code);
		}
		Ok(())
	}
}

impl<T: Config> Pallet<T> {
	/// Deposits an event into this block's event record.
	///
	/// Events are not deposited on the genesis block.
	pub fn deposit_event(
		ext: &mut dyn Externalities,
		event: impl Into<T::RuntimeEvent>,
	) -> Result<(), StorageError> {
		Self::deposit_event_indexed(ext, &[], event.into())
	}

	/// Deposits an event into this block's event record adding this event
	/// to the corresponding topic indexes.
	///
	/// This will update storage entries that correspond to the specified topics.
	/// It is expected that light-clients could subscribe to this topics.
	pub fn deposit_event_indexed(
		ext: &mut dyn Externalities,
		topics: &[Hash],
		event: T::RuntimeEvent,
	) -> Result<(), StorageError> {
		let block_number = Number::get(&*ext)?;

		// Don't populate events on genesis.
		if block_number == 0 {
			return Ok(())
		}

		let phase = ExecutionPhase::get(&*ext)?;
		let event = EventRecord { phase, event, topics: topics.to_vec() };

		// Index of the event to be added.
		let event_idx = {
			let old_event_count = EventCount::get(&*ext)?;
			let new_event_count = match old_event_count.checked_add(1) {
				// We've reached the maximum number of events at this block, just
				// don't do anything and leave the event_count unaltered.
				None => return Ok(()),
				Some(nc) => nc,
			};
			EventCount::put(ext, new_event_count);
			old_event_count
		};

		Events::<T>::append(ext, event)?;

		for topic in topics {
			EventTopics::append(ext, topic, (block_number, event_idx))?;
		}
		Ok(())
	}

	/// Gets the index of extrinsic that is currently executing.
	pub fn extrinsic_index(ext: &dyn Externalities) -> Result<Option<u32>, StorageError> {
		unhashed::get(ext, well_known_keys::EXTRINSIC_INDEX)
	}

	/// Gets extrinsics count.
	pub fn extrinsic_count(ext: &dyn Externalities) -> Result<u32, StorageError> {
		ExtrinsicCount::get(ext)
	}

	/// Gets the weight consumed by the current block so far.
	pub fn block_weight(ext: &dyn Externalities) -> Result<ConsumedWeight, StorageError> {
		BlockWeight::get(ext)
	}

	/// Gets the total length of the extrinsics applied so far.
	pub fn all_extrinsics_len(ext: &dyn Externalities) -> Result<u32, StorageError> {
		AllExtrinsicsLen::get(ext)
	}

	/// Inform the system module of some additional weight that should be accounted for, in the
	/// current block.
	///
	/// NOTE: use with extra care; this function is made public only be used for certain modules
	/// that need it. A module that registers extra weight is also responsible for checking the
	/// block limits.
	pub fn register_extra_weight_unchecked(
		ext: &mut dyn Externalities,
		weight: Weight,
		class: DispatchClass,
	) -> Result<(), StorageError> {
		BlockWeight::mutate(ext, |current_weight| {
			current_weight.accrue(weight, class);
		})
	}

	/// Start the execution of a particular block.
	pub fn initialize(
		ext: &mut dyn Externalities,
		number: BlockNumber,
		parent_hash: &Hash,
		digest: &generic::Digest,
	) {
		// populate environment
		ExecutionPhase::put(ext, Phase::Initialization);
		unhashed::put(ext, well_known_keys::EXTRINSIC_INDEX, &0u32);
		Number::put(ext, number);
		Digest::put(ext, digest);
		ParentHash::put(ext, parent_hash);
		if let Some(parent_number) = number.checked_sub(1) {
			BlockHash::insert(ext, parent_number, parent_hash);
		}

		// Remove previous block data from storage
		BlockWeight::kill(ext);
	}

	/// Remove temporary "environment" entries in storage, compute the storage root and return the
	/// resulting header for this block.
	pub fn finalize(ext: &mut dyn Externalities) -> Result<generic::Header, StorageError> {
		let number = Number::get(&*ext)?;
		let extrinsic_count = ExtrinsicCount::take(ext)?;
		let all_extrinsics_len = AllExtrinsicsLen::get(&*ext)?;
		let block_weight = BlockWeight::get(&*ext)?;
		log::debug!(
			target: LOG_TARGET,
			"[{}] {} extrinsics, length: {} / normal weight: {} / op weight: {} / mandatory weight: {}",
			number,
			extrinsic_count,
			all_extrinsics_len,
			block_weight.get(DispatchClass::Normal).ref_time(),
			block_weight.get(DispatchClass::Operational).ref_time(),
			block_weight.get(DispatchClass::Mandatory).ref_time(),
		);

		ExecutionPhase::kill(ext);
		AllExtrinsicsLen::kill(ext);
		unhashed::kill(ext, well_known_keys::EXTRINSIC_INDEX);

		let parent_hash = ParentHash::get(&*ext)?;
		let digest = Digest::get(&*ext)?;

		let mut extrinsics = Vec::with_capacity(extrinsic_count as usize);
		for index in 0..extrinsic_count {
			extrinsics.push(ExtrinsicData::take(ext, index)?);
		}

		let version = T::Version::get();
		let extrinsics_root = Self::root_from_host(
			ext.ordered_trie_root(&extrinsics, version.extrinsics_root_state_version()),
		)?;

		// move block hash pruning window by one block
		let block_hash_count = T::BlockHashCount::get();
		let to_remove = number.saturating_sub(block_hash_count).saturating_sub(1);

		// keep genesis hash
		if to_remove != 0 {
			BlockHash::remove(ext, to_remove);
		}

		let storage_root = Self::root_from_host(ext.storage_root(version.state_version()))?;

		Ok(generic::Header::new(number, extrinsics_root, storage_root, parent_hash, digest))
	}

	fn root_from_host(raw: Vec<u8>) -> Result<Hash, StorageError> {
		<[u8; 32]>::try_from(raw.as_slice())
			.map(Hash::from)
			.map_err(|_| StorageError::InvalidRootLength(raw.len()))
	}

	/// Deposits a log and ensures it matches the block's log data.
	pub fn deposit_log(ext: &mut dyn Externalities, item: generic::DigestItem) -> Result<(), StorageError> {
		Digest::mutate(ext, |digest| digest.push(item))
	}

	/// Reset events.
	///
	/// This needs to be used in prior calling [`initialize`](Self::initialize) for each new block
	/// to clear events from previous block.
	pub fn reset_events(ext: &mut dyn Externalities) {
		Events::<T>::kill(ext);
		EventCount::kill(ext);
		EventTopics::clear(ext, None);
	}

	/// Get the current events deposited by the runtime.
	pub fn events(
		ext: &dyn Externalities,
	) -> Result<Vec<EventRecord<T::RuntimeEvent>>, StorageError> {
		Events::<T>::get(ext)
	}

	/// Get the current block number.
	pub fn block_number(ext: &dyn Externalities) -> Result<BlockNumber, StorageError> {
		Number::get(ext)
	}

	/// Get the hash of the parent of the current block.
	pub fn parent_hash(ext: &dyn Externalities) -> Result<Hash, StorageError> {
		ParentHash::get(ext)
	}

	/// Get the digest of the current block.
	pub fn digest(ext: &dyn Externalities) -> Result<generic::Digest, StorageError> {
		Digest::get(ext)
	}

	/// Get the hash of block `n`, or the zero hash if it is not known.
	pub fn block_hash(ext: &dyn Externalities, n: BlockNumber) -> Result<Hash, StorageError> {
		BlockHash::get(ext, n)
	}

	/// The current execution phase, if a block is being executed.
	pub fn execution_phase(ext: &dyn Externalities) -> Result<Option<Phase>, StorageError> {
		ExecutionPhase::try_get(ext)
	}

	/// The version of the runtime that last ran an upgrade.
	pub fn last_runtime_upgrade(
		ext: &dyn Externalities,
	) -> Result<Option<LastRuntimeUpgradeInfo>, StorageError> {
		LastRuntimeUpgrade::try_get(ext)
	}

	/// The runtime version of this code.
	pub fn runtime_version() -> RuntimeVersion {
		T::Version::get()
	}

	/// To be called immediately after an extrinsic has been applied.
	///
	/// Emits an `ExtrinsicSuccess` or `ExtrinsicFailed` event depending on the outcome.
	/// The emitted event contains the post-dispatch corrected weight including
	/// the base-weight for its dispatch class.
	pub fn note_applied_extrinsic(
		ext: &mut dyn Externalities,
		r: &DispatchResultWithPostInfo,
		info: DispatchInfo,
	) -> Result<(), StorageError> {
		let result = match r {
			Ok(post_info) => Ok(*post_info),
			Err(err) => Err((err.post_info, err.error)),
		};
		let weight = extract_actual_weight(&result, &info)
			.saturating_add(T::BlockWeights::get().get(info.class).base_extrinsic);
		let pays_fee = extract_actual_pays_fee(&result, &info);
		let dispatch_info = DispatchInfo { weight, class: info.class, pays_fee };

		let event = match result {
			Ok(_) => Event::ExtrinsicSuccess { dispatch_info },
			Err((_, err)) => {
				log::trace!(
					target: LOG_TARGET,
					"Extrinsic failed at block({:?}): {:?}",
					Self::block_number(&*ext),
					err,
				);
				Event::ExtrinsicFailed { dispatch_error: err, dispatch_info }
			},
		};
		Self::deposit_event(ext, event)?;

		let next_extrinsic_index = Self::extrinsic_index(&*ext)?.unwrap_or_default().saturating_add(1);

		unhashed::put(ext, well_known_keys::EXTRINSIC_INDEX, &next_extrinsic_index);
		ExecutionPhase::put(ext, Phase::ApplyExtrinsic(next_extrinsic_index));
		Ok(())
	}

	/// To be called immediately after `note_applied_extrinsic` of the last extrinsic of the block
	/// has been called.
	pub fn note_finished_extrinsics(ext: &mut dyn Externalities) -> Result<(), StorageError> {
		let extrinsic_index = Self::extrinsic_index(&*ext)?.unwrap_or_default();
		ExtrinsicCount::put(ext, extrinsic_index);
		ExecutionPhase::put(ext, Phase::Finalization);
		Ok(())
	}

	/// To be called immediately after finishing the initialization of the block
	/// (e.g., called `on_initialize` for all modules).
	pub fn note_finished_initialize(ext: &mut dyn Externalities) {
		ExecutionPhase::put(ext, Phase::ApplyExtrinsic(0))
	}

	/// Record an extrinsic's encoded bytes under the current extrinsic index.
	pub fn note_extrinsic(ext: &mut dyn Externalities, encoded_xt: Vec<u8>) -> Result<(), StorageError> {
		let index = Self::extrinsic_index(&*ext)?.unwrap_or_default();
		ExtrinsicData::insert(ext, index, encoded_xt);
		Ok(())
	}

	/// An account is being created.
	fn on_created_account(ext: &mut dyn Externalities, who: AccountId) -> Result<(), StorageError> {
		log::trace!(target: LOG_TARGET, "new account: {:?}", who);
		Self::deposit_event(ext, Event::NewAccount { account: who })
	}

	/// Do anything that needs to be done after an account has been killed.
	fn on_killed_account(ext: &mut dyn Externalities, who: AccountId) -> Result<(), StorageError> {
		log::trace!(target: LOG_TARGET, "killed account: {:?}", who);
		Self::deposit_event(ext, Event::KilledAccount { account: who })
	}

	/// The account information of `who`, or the default if it does not exist.
	pub fn account(
		ext: &dyn Externalities,
		who: &AccountId,
	) -> Result<AccountInfo<T::AccountData>, StorageError> {
		Account::<T>::get(ext, who)
	}

	/// An account exists if it has at least one provider or sufficient reference.
	pub fn account_exists(ext: &dyn Externalities, who: &AccountId) -> bool {
		Account::<T>::contains_key(ext, who)
	}

	/// Retrieve the account transaction counter from storage.
	pub fn account_nonce(ext: &dyn Externalities, who: &AccountId) -> Result<Nonce, StorageError> {
		Ok(Account::<T>::get(ext, who)?.nonce)
	}

	/// Increment a particular account's nonce by 1.
	pub fn inc_account_nonce(ext: &mut dyn Externalities, who: &AccountId) -> Result<(), StorageError> {
		Account::<T>::mutate(ext, who, |a| a.nonce = a.nonce.saturating_add(1))
	}

	/// The number of outstanding provider references for the account `who`.
	pub fn providers(ext: &dyn Externalities, who: &AccountId) -> Result<RefCount, StorageError> {
		Ok(Account::<T>::get(ext, who)?.providers)
	}

	/// The number of outstanding consumer references for the account `who`.
	pub fn consumers(ext: &dyn Externalities, who: &AccountId) -> Result<RefCount, StorageError> {
		Ok(Account::<T>::get(ext, who)?.consumers)
	}

	/// Increment the provider reference counter on an account.
	pub fn inc_providers(
		ext: &mut dyn Externalities,
		who: &AccountId,
	) -> Result<IncRefStatus, StorageError> {
		let mut account = Account::<T>::get(&*ext, who)?;
		let status = if account.providers == 0 && account.sufficients == 0 {
			// Account is being created.
			account.providers = 1;
			IncRefStatus::Created
		} else {
			account.providers = account.providers.saturating_add(1);
			IncRefStatus::Existed
		};
		Account::<T>::insert(ext, who, &account);
		if status == IncRefStatus::Created {
			Self::on_created_account(ext, who.clone())?;
		}
		Ok(status)
	}

	/// Decrement the provider reference counter on an account.
	///
	/// This *MUST* only be done once for every time you called `inc_providers` on `who`.
	pub fn dec_providers(
		ext: &mut dyn Externalities,
		who: &AccountId,
	) -> Result<DecRefStatus, DispatchError> {
		let Some(mut account) = Account::<T>::try_get(&*ext, who)? else {
			log::error!(target: LOG_TARGET, "Logic error: Account already dead when reducing provider");
			return Ok(DecRefStatus::Reaped)
		};

		if account.providers == 0 {
			// Logic error - cannot decrement beyond zero.
			log::error!(target: LOG_TARGET, "Logic error: Unexpected underflow in reducing provider");
			account.providers = 1;
		}
		match (account.providers, account.consumers, account.sufficients) {
			(1, 0, 0) => {
				// No providers left (and no consumers) and no sufficients. Account dead.
				Account::<T>::remove(ext, who);
				Self::on_killed_account(ext, who.clone())?;
				Ok(DecRefStatus::Reaped)
			},
			(1, c, _) if c > 0 => {
				// Cannot remove last provider if there are consumers.
				Err(DispatchError::ConsumerRemaining)
			},
			(x, _, _) => {
				// Account will continue to exist as there is either > 1 provider or
				// > 0 sufficients.
				account.providers = x - 1;
				Account::<T>::insert(ext, who, &account);
				Ok(DecRefStatus::Exists)
			},
		}
	}

	/// Increment the reference counter on an account.
	///
	/// The account `who`'s `providers` must be non-zero or this will return an error.
	pub fn inc_consumers(ext: &mut dyn Externalities, who: &AccountId) -> Result<(), DispatchError> {
		Account::<T>::try_get(&*ext, who)?
			.filter(|a| a.providers > 0)
			.map(|mut a| {
				a.consumers = a.consumers.saturating_add(1);
				Account::<T>::insert(ext, who, &a);
			})
			.ok_or(DispatchError::NoProviders)
	}

	/// Decrement the reference counter on an account. This *MUST* only be done once for every time
	/// you called `inc_consumers` on `who`.
	pub fn dec_consumers(ext: &mut dyn Externalities, who: &AccountId) -> Result<(), StorageError> {
		let Some(mut account) = Account::<T>::try_get(&*ext, who)? else {
			log::error!(target: LOG_TARGET, "Logic error: Account already dead when reducing consumer");
			return Ok(())
		};
		if account.consumers == 0 {
			log::error!(target: LOG_TARGET, "Logic error: Unexpected underflow in reducing consumer");
		}
		account.consumers = account.consumers.saturating_sub(1);
		Account::<T>::insert(ext, who, &account);
		Ok(())
	}
}
