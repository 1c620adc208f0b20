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

use crate::{self as stf_transaction_payment, BalancesAdapter, Config, ConstantMultiplier, IdentityFee};
use codec::{Decode, Encode};
use core::any::TypeId;
use stf_io::TestExternalities;
use stf_primitives::{
	traits::{ConstU128, ConstU32, ConstU8, DecodeCall, Dispatchable, Get, GetDispatchInfo},
	AccountId, AccountIdLookup, DecodeError, DispatchResultWithPostInfo, RuntimeVersion,
};
use stf_system::{limits, BuildGenesisConfig, PalletInfo, RuntimeOrigin, UnfilteredDispatchable};
use stf_weights::{DispatchClass, DispatchInfo, Weight};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Runtime;

pub type System = stf_system::Pallet<Runtime>;
pub type Balances = stf_balances::Pallet<Runtime>;
pub type TransactionPayment = stf_transaction_payment::Pallet<Runtime>;

#[derive(Clone, PartialEq, Eq, Debug, Encode)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(stf_system::Call<Runtime>),
	#[codec(index = 1)]
	Balances(stf_balances::Call<Runtime>),
}

impl From<stf_system::Call<Runtime>> for RuntimeCall {
	fn from(call: stf_system::Call<Runtime>) -> Self {
		Self::System(call)
	}
}

impl DecodeCall for RuntimeCall {
	fn decode_call_with_depth(input: &mut &[u8], depth: u32) -> Result<Self, DecodeError> {
		match u8::decode(input)? {
			0 => Ok(Self::System(DecodeCall::decode_call_with_depth(input, depth)?)),
			1 => Ok(Self::Balances(DecodeCall::decode_call_with_depth(input, depth)?)),
			other => Err(DecodeError::UnknownModule(other)),
		}
	}
}

impl Dispatchable for RuntimeCall {
	type RuntimeOrigin = RuntimeOrigin;

	fn dispatch(
		self,
		origin: RuntimeOrigin,
		ext: &mut dyn stf_io::Externalities,
	) -> DispatchResultWithPostInfo {
		match self {
			Self::System(call) => call.dispatch_bypass_filter(origin, ext),
			Self::Balances(call) => call.dispatch_bypass_filter(origin, ext),
		}
	}
}

impl GetDispatchInfo for RuntimeCall {
	fn base_weight(&self) -> Weight {
		match self {
			Self::System(call) => call.base_weight(),
			Self::Balances(call) => call.base_weight(),
		}
	}

	fn get_dispatch_info(&self) -> DispatchInfo {
		match self {
			Self::System(call) => call.get_dispatch_info(),
			Self::Balances(call) => call.get_dispatch_info(),
		}
	}
}

#[derive(Clone, PartialEq, Eq, Debug, Encode, Decode)]
pub enum RuntimeEvent {
	#[codec(index = 0)]
	System(stf_system::Event),
	#[codec(index = 1)]
	Balances(stf_balances::Event),
	#[codec(index = 2)]
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

impl From<stf_transaction_payment::Event> for RuntimeEvent {
	fn from(event: stf_transaction_payment::Event) -> Self {
		Self::TransactionPayment(event)
	}
}

pub struct TestPalletInfo;

impl TestPalletInfo {
	fn lookup<P: 'static>() -> Option<(usize, &'static str)> {
		let id = TypeId::of::<P>();
		if id == TypeId::of::<System>() {
			Some((0, "System"))
		} else if id == TypeId::of::<Balances>() {
			Some((1, "Balances"))
		} else if id == TypeId::of::<TransactionPayment>() {
			Some((2, "TransactionPayment"))
		} else {
			None
		}
	}
}

impl PalletInfo for TestPalletInfo {
	fn index<P: 'static>() -> Option<usize> {
		Self::lookup::<P>().map(|(index, _)| index)
	}

	fn name<P: 'static>() -> Option<&'static str> {
		Self::lookup::<P>().map(|(_, name)| name)
	}
}

pub const BASE_EXTRINSIC: u64 = 100;

pub struct BlockWeights;

impl Get<limits::BlockWeights> for BlockWeights {
	fn get() -> limits::BlockWeights {
		limits::BlockWeights::builder()
			.base_block(Weight::zero())
			.for_class(DispatchClass::all(), |weights| {
				weights.base_extrinsic = Weight::from_parts(BASE_EXTRINSIC, 0);
			})
			.for_class(DispatchClass::non_mandatory(), |weights| {
				weights.max_total = Some(Weight::from_parts(4096, u64::MAX));
			})
			.build()
			.expect("mock block weights are valid")
	}
}

pub struct BlockLength;

impl Get<limits::BlockLength> for BlockLength {
	fn get() -> limits::BlockLength {
		limits::BlockLength::max(1024)
	}
}

pub struct Version;

impl Get<RuntimeVersion> for Version {
	fn get() -> RuntimeVersion {
		RuntimeVersion {
			spec_name: alloc::borrow::Cow::Borrowed("payment-test"),
			impl_name: alloc::borrow::Cow::Borrowed("payment-test"),
			authoring_version: 1,
			spec_version: 1,
			impl_version: 1,
			apis: alloc::borrow::Cow::Borrowed(&[]),
			transaction_version: 1,
			system_version: 1,
		}
	}
}

impl stf_system::Config for Runtime {
	type RuntimeCall = RuntimeCall;
	type RuntimeEvent = RuntimeEvent;
	type AccountData = stf_balances::AccountData;
	type Lookup = AccountIdLookup;
	type BlockWeights = BlockWeights;
	type BlockLength = BlockLength;
	type DbWeight = ();
	type Version = Version;
	type BlockHashCount = ConstU32<250>;
	type PalletInfo = TestPalletInfo;
	type SystemWeightInfo = ();
}

impl stf_balances::Config for Runtime {
	type RuntimeEvent = RuntimeEvent;
	type ExistentialDeposit = ConstU128<10>;
	type WeightInfo = ();
}

impl Config for Runtime {
	type RuntimeEvent = RuntimeEvent;
	type OnChargeTransaction = BalancesAdapter<Runtime>;
	type WeightToFee = IdentityFee;
	type LengthToFee = ConstantMultiplier<ConstU128<1>>;
	type OperationalFeeMultiplier = ConstU8<5>;
}

pub fn account(n: u8) -> AccountId {
	AccountId::new([n; 32])
}

pub fn new_test_ext(balances: Vec<(AccountId, u128)>) -> TestExternalities {
	let _ = env_logger::builder().is_test(true).try_init();
	let mut ext = TestExternalities::default();
	stf_system::GenesisConfig::<Runtime>::default().build(&mut ext).unwrap();
	stf_balances::GenesisConfig::<Runtime> { balances, ..Default::default() }
		.build(&mut ext)
		.unwrap();
	ext.execute_with(|ext| stf_system::Number::put(ext, 1u32));
	ext
}
