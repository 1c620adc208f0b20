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

use crate::{
	self as stf_system, limits, BuildGenesisConfig, Call, Config, Event, GenesisConfig, Pallet,
	PalletInfo, RuntimeOrigin, UnfilteredDispatchable,
};
use codec::{Decode, Encode};
use core::any::TypeId;
use stf_io::TestExternalities;
use stf_primitives::{
	traits::{DecodeCall, Dispatchable, Get, GetDispatchInfo},
	AccountId, AccountIdLookup, DecodeError, DispatchResultWithPostInfo, RuntimeVersion,
};
use stf_weights::{DispatchClass, DispatchInfo, Perbill, RuntimeDbWeight, Weight};
use alloc::borrow::Cow;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Test;

pub type System = Pallet<Test>;

#[derive(Clone, PartialEq, Eq, Debug, Encode)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(Call<Test>),
}

impl From<Call<Test>> for RuntimeCall {
	fn from(call: Call<Test>) -> Self {
		Self::System(call)
	}
}

impl DecodeCall for RuntimeCall {
	fn decode_call_with_depth(input: &mut &[u8], depth: u32) -> Result<Self, DecodeError> {
		match u8::decode(input)? {
			0 => Ok(Self::System(Call::decode_call_with_depth(input, depth)?)),
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
		}
	}
}

impl GetDispatchInfo for RuntimeCall {
	fn base_weight(&self) -> Weight {
		match self {
			Self::System(call) => call.base_weight(),
		}
	}

	fn get_dispatch_info(&self) -> DispatchInfo {
		match self {
			Self::System(call) => call.get_dispatch_info(),
		}
	}
}

#[derive(Clone, PartialEq, Eq, Debug, Encode, Decode)]
pub enum RuntimeEvent {
	#[codec(index = 0)]
	System(Event),
}

impl From<Event> for RuntimeEvent {
	fn from(event: Event) -> Self {
		Self::System(event)
	}
}

pub struct TestPalletInfo;

impl PalletInfo for TestPalletInfo {
	fn index<P: 'static>() -> Option<usize> {
		(TypeId::of::<P>() == TypeId::of::<System>()).then_some(0)
	}

	fn name<P: 'static>() -> Option<&'static str> {
		(TypeId::of::<P>() == TypeId::of::<System>()).then_some("System")
	}
}

const NORMAL_DISPATCH_RATIO: Perbill = Perbill::from_percent(75);
const MAX_BLOCK_WEIGHT: Weight = Weight::from_parts(1024, u64::MAX);

pub struct RuntimeBlockWeights;

impl Get<limits::BlockWeights> for RuntimeBlockWeights {
	fn get() -> limits::BlockWeights {
		limits::BlockWeights::builder()
			.base_block(Weight::from_parts(10, 0))
			.for_class(DispatchClass::all(), |weights| {
				weights.base_extrinsic = Weight::from_parts(5, 0);
			})
			.for_class(DispatchClass::Normal, |weights| {
				weights.max_total = Some(NORMAL_DISPATCH_RATIO * MAX_BLOCK_WEIGHT);
			})
			.for_class(DispatchClass::Operational, |weights| {
				weights.base_extrinsic = Weight::from_parts(10, 0);
				weights.max_total = Some(MAX_BLOCK_WEIGHT);
				weights.reserved = Some(MAX_BLOCK_WEIGHT - NORMAL_DISPATCH_RATIO * MAX_BLOCK_WEIGHT);
			})
			.avg_block_initialization(Perbill::from_percent(0))
			.build()
			.expect("mock block weights are valid")
	}
}

pub struct RuntimeBlockLength;

impl Get<limits::BlockLength> for RuntimeBlockLength {
	fn get() -> limits::BlockLength {
		limits::BlockLength::max_with_normal_ratio(1024, NORMAL_DISPATCH_RATIO)
	}
}

pub struct DbWeight;

impl Get<RuntimeDbWeight> for DbWeight {
	fn get() -> RuntimeDbWeight {
		RuntimeDbWeight { read: 10, write: 100 }
	}
}

pub struct Version;

impl Get<RuntimeVersion> for Version {
	fn get() -> RuntimeVersion {
		RuntimeVersion {
			spec_name: Cow::Borrowed("test"),
			impl_name: Cow::Borrowed("system-test"),
			authoring_version: 1,
			spec_version: 1,
			impl_version: 1,
			apis: Cow::Borrowed(&[]),
			transaction_version: 1,
			system_version: 1,
		}
	}
}

pub struct BlockHashCount;

impl Get<u32> for BlockHashCount {
	fn get() -> u32 {
		10
	}
}

impl Config for Test {
	type RuntimeCall = RuntimeCall;
	type RuntimeEvent = RuntimeEvent;
	type AccountData = u128;
	type Lookup = AccountIdLookup;
	type BlockWeights = RuntimeBlockWeights;
	type BlockLength = RuntimeBlockLength;
	type DbWeight = DbWeight;
	type Version = Version;
	type BlockHashCount = BlockHashCount;
	type PalletInfo = TestPalletInfo;
	type SystemWeightInfo = ();
}

/// A call that costs nothing and can be dispatched by anyone.
pub fn call() -> RuntimeCall {
	RuntimeCall::System(stf_system::Call::remark { remark: vec![] })
}

pub fn account(n: u8) -> AccountId {
	AccountId::new([n; 32])
}

pub fn new_test_ext() -> TestExternalities {
	let _ = env_logger::builder().is_test(true).try_init();
	let mut ext = TestExternalities::default();
	GenesisConfig::<Test>::default().build(&mut ext).expect("genesis builds");
	// Add to each test the initial weight of a block
	ext.execute_with(|ext| {
		System::register_extra_weight_unchecked(
			ext,
			<Test as Config>::BlockWeights::get().base_block,
			DispatchClass::Mandatory,
		)
		.expect("block weight decodes")
	});
	ext
}

/// Give `who` a provider reference so it can transact.
pub fn fund(ext: &mut dyn stf_io::Externalities, who: &AccountId) {
	stf_system::Account::<Test>::mutate(ext, who, |a| a.providers = 1).expect("account decodes");
}
