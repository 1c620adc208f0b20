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

//! A runtime assembling [`stf_system`], [`stf_timestamp`], [`stf_balances`],
//! [`stf_transaction_payment`] and [`stf_sudo`].
//!
//! The modules are registered under fixed indices in [`RuntimeCall`] and [`RuntimeEvent`]. Blocks
//! are run by [`Executive`], and the host reaches the runtime through the entry points of
//! [`apis`], exported from the wasm binary by name (`Core_execute_block`, ...).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::{borrow::Cow, vec::Vec};
use codec::{Decode, Encode};
use core::any::TypeId;
use stf_io::Externalities;
use stf_primitives::{
	generic::{self, Era},
	inherents::{CheckInherentsResult, Error as InherentError, InherentData, ProvideInherent},
	traits::{
		ConstU128, ConstU32, ConstU64, ConstU8, DecodeCall, Dispatchable, Get, GetDispatchInfo,
		IsInherent, NoUnsignedValidator, ValidateUnsigned,
	},
	transaction_validity::{TransactionSource, ValidTransaction},
	AccountId, AccountIdLookup, ApiId, ApplyError, Balance, DecodeError,
	DispatchResultWithPostInfo, Moment, Nonce, RuntimeVersion, StorageError,
};
use stf_system::{limits, BuildGenesisConfig, PalletInfo, RuntimeOrigin, UnfilteredDispatchable};
use stf_transaction_payment::{BalancesAdapter, ConstantMultiplier, IdentityFee};
use stf_weights::{constants::WEIGHT_REF_TIME_PER_SECOND, DispatchInfo, Perbill, RuntimeDbWeight, Weight};

pub mod apis;
pub mod genesis_config_presets;
#[cfg(all(target_arch = "wasm32", not(feature = "std")))]
mod wasm;

/// Log target of the runtime glue.
pub const LOG_TARGET: &str = "runtime";

/// The runtime APIs served by [`apis`], with their versions.
pub const RUNTIME_API_VERSIONS: &[(ApiId, u32)] = &[
	// Core
	([0xdf, 0x6a, 0xcb, 0x68, 0x99, 0x07, 0x60, 0x9b], 5),
	// BlockBuilder
	([0x40, 0xfe, 0x3a, 0xd4, 0x01, 0xf8, 0x95, 0x9a], 6),
	// TaggedTransactionQueue
	([0xd2, 0xbc, 0x98, 0x97, 0xee, 0xd0, 0x8f, 0x15], 3),
	// OffchainWorkerApi
	([0xf7, 0x8b, 0x27, 0x8b, 0xe5, 0x3f, 0x45, 0x4c], 2),
	// AccountNonceApi
	([0xbc, 0x9d, 0x89, 0x90, 0x4f, 0x5b, 0x92, 0x3f], 1),
];

/// The runtime version.
pub const VERSION: RuntimeVersion = RuntimeVersion {
	spec_name: Cow::Borrowed("stf-runtime"),
	impl_name: Cow::Borrowed("stf-runtime"),
	authoring_version: 1,
	spec_version: 100,
	impl_version: 1,
	apis: Cow::Borrowed(RUNTIME_API_VERSIONS),
	transaction_version: 1,
	system_version: 1,
};

/// Expected block time, in milliseconds.
pub const MILLI_SECS_PER_BLOCK: Moment = 6000;

/// One unit of the native token.
pub const UNIT: Balance = 1_000_000_000_000;
pub const MILLI_UNIT: Balance = 1_000_000_000;
pub const MICRO_UNIT: Balance = 1_000_000;

/// The existential deposit.
pub const EXISTENTIAL_DEPOSIT: Balance = MILLI_UNIT;

/// We allow `Normal` extrinsics to fill up the block up to 75%, the rest can be used by
/// `Operational` extrinsics.
const NORMAL_DISPATCH_RATIO: Perbill = Perbill::from_percent(75);

/// We allow for 2 seconds of compute with a 6 second average block time.
const MAXIMUM_BLOCK_WEIGHT: Weight =
	Weight::from_parts(WEIGHT_REF_TIME_PER_SECOND.saturating_mul(2), u64::MAX);

/// Maximum length of a block, in bytes.
const MAXIMUM_BLOCK_LENGTH: u32 = 5 * 1024 * 1024;

/// The concrete runtime.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Runtime;

pub type System = stf_system::Pallet<Runtime>;
pub type Timestamp = stf_timestamp::Pallet<Runtime>;
pub type Balances = stf_balances::Pallet<Runtime>;
pub type Sudo = stf_sudo::Pallet<Runtime>;
pub type TransactionPayment = stf_transaction_payment::Pallet<Runtime>;

/// All modules of the runtime, in the order their hooks run.
pub type AllPalletsWithSystem = (System, Timestamp, Balances, Sudo, TransactionPayment);

/// The signed extensions that are added to the runtime.
pub type SignedExtra = (
	// Checks that the sender is not the zero address.
	stf_system::CheckNonZeroSender<Runtime>,
	// Checks that the runtime version is correct.
	stf_system::CheckSpecVersion<Runtime>,
	// Checks that the transaction version is correct.
	stf_system::CheckTxVersion<Runtime>,
	// Checks that the genesis hash is correct.
	stf_system::CheckGenesis<Runtime>,
	// Checks that the era is valid.
	stf_system::CheckMortality<Runtime>,
	// Checks that the nonce is valid.
	stf_system::CheckNonce<Runtime>,
	// Checks that the weight is valid.
	stf_system::CheckWeight<Runtime>,
	// Ensures that the sender has enough funds to pay for the transaction
	// and deducts the fee from the sender's account.
	stf_transaction_payment::ChargeTransactionPayment<Runtime>,
);

/// Unchecked extrinsic type as expected by this runtime.
pub type UncheckedExtrinsic = stf_executive::UncheckedExtrinsicOf<Runtime, SignedExtra>;

/// The payload being signed in transactions.
pub type SignedPayload = generic::SignedPayload<RuntimeCall, SignedExtra>;

/// Block type as expected by this runtime.
pub type Block = stf_executive::BlockOf<Runtime, SignedExtra>;

/// Block header type as expected by this runtime.
pub type Header = generic::Header;

/// Executive: handles dispatch to the various modules.
pub type Executive = stf_executive::Executive<Runtime, SignedExtra, Runtime, AllPalletsWithSystem>;

/// Build the signed extensions of a transaction sent with `nonce`, living for `era` and tipping
/// `tip`.
pub fn signed_extra(nonce: Nonce, era: Era, tip: Balance) -> SignedExtra {
	(
		stf_system::CheckNonZeroSender::new(),
		stf_system::CheckSpecVersion::new(),
		stf_system::CheckTxVersion::new(),
		stf_system::CheckGenesis::new(),
		stf_system::CheckMortality::from(era),
		stf_system::CheckNonce::from(nonce),
		stf_system::CheckWeight::new(),
		stf_transaction_payment::ChargeTransactionPayment::from(tip),
	)
}

/// The call of every module of the runtime.
#[derive(Clone, PartialEq, Eq, Debug, Encode)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(stf_system::Call<Runtime>),
	#[codec(index = 1)]
	Timestamp(stf_timestamp::Call<Runtime>),
	#[codec(index = 2)]
	Balances(stf_balances::Call<Runtime>),
	#[codec(index = 3)]
	Sudo(stf_sudo::Call<Runtime>),
}

impl From<stf_system::Call<Runtime>> for RuntimeCall {
	fn from(call: stf_system::Call<Runtime>) -> Self {
		Self::System(call)
	}
}

impl From<stf_timestamp::Call<Runtime>> for RuntimeCall {
	fn from(call: stf_timestamp::Call<Runtime>) -> Self {
		Self::Timestamp(call)
	}
}

impl From<stf_balances::Call<Runtime>> for RuntimeCall {
	fn from(call: stf_balances::Call<Runtime>) -> Self {
		Self::Balances(call)
	}
}

impl From<stf_sudo::Call<Runtime>> for RuntimeCall {
	fn from(call: stf_sudo::Call<Runtime>) -> Self {
		Self::Sudo(call)
	}
}

impl DecodeCall for RuntimeCall {
	fn decode_call_with_depth(input: &mut &[u8], depth: u32) -> Result<Self, DecodeError> {
		match u8::decode(input)? {
			0 => Ok(Self::System(DecodeCall::decode_call_with_depth(input, depth)?)),
			1 => Ok(Self::Timestamp(DecodeCall::decode_call_with_depth(input, depth)?)),
			2 => Ok(Self::Balances(DecodeCall::decode_call_with_depth(input, depth)?)),
			3 => Ok(Self::Sudo(DecodeCall::decode_call_with_depth(input, depth)?)),
			other => Err(DecodeError::UnknownModule(other)),
		}
	}
}

impl UnfilteredDispatchable for RuntimeCall {
	type RuntimeOrigin = RuntimeOrigin;

	fn dispatch_bypass_filter(
		self,
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
	) -> DispatchResultWithPostInfo {
		match self {
			Self::System(call) => call.dispatch_bypass_filter(origin, ext),
			Self::Timestamp(call) => call.dispatch_bypass_filter(origin, ext),
			Self::Balances(call) => call.dispatch_bypass_filter(origin, ext),
			Self::Sudo(call) => call.dispatch_bypass_filter(origin, ext),
		}
	}
}

impl Dispatchable for RuntimeCall {
	type RuntimeOrigin = RuntimeOrigin;

	fn dispatch(self, origin: RuntimeOrigin, ext: &mut dyn Externalities) -> DispatchResultWithPostInfo {
		self.dispatch_bypass_filter(origin, ext)
	}
}

impl GetDispatchInfo for RuntimeCall {
	fn base_weight(&self) -> Weight {
		match self {
			Self::System(call) => call.base_weight(),
			Self::Timestamp(call) => call.base_weight(),
			Self::Balances(call) => call.base_weight(),
			Self::Sudo(call) => call.base_weight(),
		}
	}

	fn get_dispatch_info(&self) -> DispatchInfo {
		match self {
			Self::System(call) => call.get_dispatch_info(),
			Self::Timestamp(call) => call.get_dispatch_info(),
			Self::Balances(call) => call.get_dispatch_info(),
			Self::Sudo(call) => call.get_dispatch_info(),
		}
	}
}

impl IsInherent for RuntimeCall {
	fn is_inherent(&self) -> bool {
		match self {
			Self::Timestamp(call) => <Timestamp as ProvideInherent>::is_inherent(call),
			_ => false,
		}
	}
}

/// The event of every module of the runtime.
#[derive(Clone, PartialEq, Eq, Debug, Encode, Decode)]
pub enum RuntimeEvent {
	#[codec(index = 0)]
	System(stf_system::Event),
	#[codec(index = 2)]
	Balances(stf_balances::Event),
	#[codec(index = 3)]
	Sudo(stf_sudo::Event),
	#[codec(index = 4)]
	TransactionPayment(stf_transaction_payment::Event),
}

impl From<stf_system::Event> for RuntimeEvent {
	fn from(event: stf_system::Event) -> Self {
		Self::System(event)
	}
}

impl From<stf_balances::Event> for RuntimeEvent {
	fn from(event: stf_balances::Event) -> Self {
		Self::Balances(event)
	}
}

impl From<stf_sudo::Event> for RuntimeEvent {
	fn from(event: stf_sudo::Event) -> Self {
		Self::Sudo(event)
	}
}

impl From<stf_transaction_payment::Event> for RuntimeEvent {
	fn from(event: stf_transaction_payment::Event) -> Self {
		Self::TransactionPayment(event)
	}
}

/// Index and name of every module, matching the call and event indices.
pub struct RuntimePalletInfo;

impl RuntimePalletInfo {
	fn lookup<P: 'static>() -> Option<(usize, &'static str)> {
		let id = TypeId::of::<P>();
		if id == TypeId::of::<System>() {
			Some((0, "System"))
		} else if id == TypeId::of::<Timestamp>() {
			Some((1, "Timestamp"))
		} else if id == TypeId::of::<Balances>() {
			Some((2, "Balances"))
		} else if id == TypeId::of::<Sudo>() {
			Some((3, "Sudo"))
		} else if id == TypeId::of::<TransactionPayment>() {
			Some((4, "TransactionPayment"))
		} else {
			None
		}
	}
}

impl PalletInfo for RuntimePalletInfo {
	fn index<P: 'static>() -> Option<usize> {
		Self::lookup::<P>().map(|(index, _)| index)
	}

	fn name<P: 'static>() -> Option<&'static str> {
		Self::lookup::<P>().map(|(_, name)| name)
	}
}

pub struct BlockWeights;

impl Get<limits::BlockWeights> for BlockWeights {
	fn get() -> limits::BlockWeights {
		limits::BlockWeights::with_sensible_defaults(MAXIMUM_BLOCK_WEIGHT, NORMAL_DISPATCH_RATIO)
	}
}

pub struct BlockLength;

impl Get<limits::BlockLength> for BlockLength {
	fn get() -> limits::BlockLength {
		limits::BlockLength::max_with_normal_ratio(MAXIMUM_BLOCK_LENGTH, NORMAL_DISPATCH_RATIO)
	}
}

/// Weights of RocksDB operations, measured in picoseconds.
pub struct RocksDbWeight;

impl Get<RuntimeDbWeight> for RocksDbWeight {
	fn get() -> RuntimeDbWeight {
		RuntimeDbWeight { read: 25_000 * 1_000, write: 100_000 * 1_000 }
	}
}

pub struct Version;

impl Get<RuntimeVersion> for Version {
	fn get() -> RuntimeVersion {
		VERSION
	}
}

impl stf_system::Config for Runtime {
	type RuntimeCall = RuntimeCall;
	type RuntimeEvent = RuntimeEvent;
	type AccountData = stf_balances::AccountData;
	type Lookup = AccountIdLookup;
	type BlockWeights = BlockWeights;
	type BlockLength = BlockLength;
	type DbWeight = RocksDbWeight;
	type Version = Version;
	type BlockHashCount = ConstU32<2400>;
	type PalletInfo = RuntimePalletInfo;
	type SystemWeightInfo = ();
}

impl stf_timestamp::Config for Runtime {
	type MinimumPeriod = ConstU64<{ MILLI_SECS_PER_BLOCK / 2 }>;
	type WeightInfo = ();
}

impl stf_balances::Config for Runtime {
	type RuntimeEvent = RuntimeEvent;
	type ExistentialDeposit = ConstU128<EXISTENTIAL_DEPOSIT>;
	type WeightInfo = ();
}

impl stf_transaction_payment::Config for Runtime {
	type RuntimeEvent = RuntimeEvent;
	type OnChargeTransaction = BalancesAdapter<Runtime>;
	type WeightToFee = IdentityFee;
	type LengthToFee = ConstantMultiplier<ConstU128<MICRO_UNIT>>;
	type OperationalFeeMultiplier = ConstU8<5>;
}

impl stf_sudo::Config for Runtime {
	type RuntimeEvent = RuntimeEvent;
	type RuntimeCall = RuntimeCall;
	type WeightInfo = ();
}

// None of the modules validates unsigned calls: they are accepted inside blocks, where the
// executive only lets inherents through, and refused by the transaction pool.
impl ValidateUnsigned for Runtime {
	type Call = RuntimeCall;

	fn pre_dispatch(ext: &dyn Externalities, call: &RuntimeCall) -> Result<(), ApplyError> {
		NoUnsignedValidator::<RuntimeCall>::pre_dispatch(ext, call)
	}

	fn validate_unsigned(
		ext: &dyn Externalities,
		source: TransactionSource,
		call: &RuntimeCall,
	) -> Result<ValidTransaction, ApplyError> {
		NoUnsignedValidator::<RuntimeCall>::validate_unsigned(ext, source, call)
	}
}

impl Runtime {
	/// Create the inherent extrinsics of every module out of `data`.
	pub fn inherent_extrinsics(
		ext: &dyn Externalities,
		data: &InherentData,
	) -> Result<Vec<UncheckedExtrinsic>, StorageError> {
		let mut inherents = Vec::new();
		if let Some(call) = Timestamp::create_inherent(ext, data)? {
			inherents.push(UncheckedExtrinsic::new_unsigned(call.into()));
		}
		Ok(inherents)
	}

	/// Check the inherents at the front of `block` against `data`.
	///
	/// Stops at the first extrinsic that is not an inherent, or at the first fatal error.
	pub fn check_inherents(
		ext: &dyn Externalities,
		block: &Block,
		data: &InherentData,
	) -> Result<CheckInherentsResult, StorageError> {
		let mut result = CheckInherentsResult::new();

		for xt in block.extrinsics() {
			if !xt.is_inherent() {
				break
			}

			if let RuntimeCall::Timestamp(call) = &xt.function {
				if let Err(e) = Timestamp::check_inherent(ext, call, data)? {
					handle_put_error_result(result.put_error(
						<Timestamp as ProvideInherent>::INHERENT_IDENTIFIER,
						&e,
					));
					if result.fatal_error() {
						break
					}
				}
			}
		}

		Ok(result)
	}
}

fn handle_put_error_result(res: Result<(), InherentError>) {
	match res {
		Ok(()) => {},
		Err(InherentError::InherentDataExists(id)) => log::debug!(
			target: LOG_TARGET,
			"Some error already reported for inherent {:?}, new non fatal error is ignored",
			id,
		),
		Err(InherentError::FatalErrorReported) => log::error!(
			target: LOG_TARGET,
			"Fatal error already reported, unexpected considering there is only one fatal error",
		),
		Err(e) => log::error!(target: LOG_TARGET, "Unexpected error from `put_error`: {}", e),
	}
}

/// The genesis state of every module of the runtime.
#[derive(Default)]
pub struct RuntimeGenesisConfig {
	pub system: stf_system::GenesisConfig<Runtime>,
	pub balances: stf_balances::GenesisConfig<Runtime>,
	pub sudo: stf_sudo::GenesisConfig<Runtime>,
}

impl BuildGenesisConfig for RuntimeGenesisConfig {
	fn build(&self, ext: &mut dyn Externalities) -> Result<(), StorageError> {
		self.system.build(ext)?;
		self.balances.build(ext)?;
		self.sudo.build(ext)?;
		log::debug!(target: LOG_TARGET, "genesis state built");
		Ok(())
	}
}

/// The account nonce of `account`, as served by `AccountNonceApi_account_nonce`.
pub fn account_nonce(ext: &dyn Externalities, account: &AccountId) -> Result<Nonce, StorageError> {
	System::account_nonce(ext, account)
}

