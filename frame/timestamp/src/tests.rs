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

//! Tests for the Timestamp module.

use super::*;
use alloc::borrow::Cow;
use core::any::TypeId;
use pretty_assertions::assert_eq;
use stf_io::TestExternalities;
use stf_primitives::{
	traits::{ConstU32, ConstU64, Dispatchable},
	AccountId, AccountIdLookup, RuntimeVersion,
};
use stf_system::{limits, BuildGenesisConfig, PalletInfo};
use stf_weights::{DispatchInfo, Pays};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Test;

type System = stf_system::Pallet<Test>;
type Timestamp = Pallet<Test>;

#[derive(Clone, PartialEq, Eq, Debug, Encode)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(stf_system::Call<Test>),
	#[codec(index = 1)]
	Timestamp(Call<Test>),
}

impl From<stf_system::Call<Test>> for RuntimeCall {
	fn from(call: stf_system::Call<Test>) -> Self {
		Self::System(call)
	}
}

impl DecodeCall for RuntimeCall {
	fn decode_call_with_depth(input: &mut &[u8], depth: u32) -> Result<Self, DecodeError> {
		match u8::decode(input)? {
			0 => Ok(Self::System(DecodeCall::decode_call_with_depth(input, depth)?)),
			1 => Ok(Self::Timestamp(DecodeCall::decode_call_with_depth(input, depth)?)),
			other => Err(DecodeError::UnknownModule(other)),
		}
	}
}

impl Dispatchable for RuntimeCall {
	type RuntimeOrigin = RuntimeOrigin;

	fn dispatch(
		self,
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
	) -> DispatchResultWithPostInfo {
		match self {
			Self::System(call) => call.dispatch_bypass_filter(origin, ext),
			Self::Timestamp(call) => call.dispatch_bypass_filter(origin, ext),
		}
	}
}

impl GetDispatchInfo for RuntimeCall {
	fn base_weight(&self) -> Weight {
		match self {
			Self::System(call) => call.base_weight(),
			Self::Timestamp(call) => call.base_weight(),
		}
	}

	fn get_dispatch_info(&self) -> DispatchInfo {
		match self {
			Self::System(call) => call.get_dispatch_info(),
			Self::Timestamp(call) => call.get_dispatch_info(),
		}
	}
}

#[derive(Clone, PartialEq, Eq, Debug, Encode, Decode)]
pub enum RuntimeEvent {
	#[codec(index = 0)]
	System(stf_system::Event),
}

impl From<stf_system::Event> for RuntimeEvent {
	fn from(event: stf_system::Event) -> Self {
		Self::System(event)
	}
}

pub struct TestPalletInfo;

impl PalletInfo for TestPalletInfo {
	fn index<P: 'static>() -> Option<usize> {
		let id = TypeId::of::<P>();
		if id == TypeId::of::<System>() {
			Some(0)
		} else if id == TypeId::of::<Timestamp>() {
			Some(1)
		} else {
			None
		}
	}

	fn name<P: 'static>() -> Option<&'static str> {
		let id = TypeId::of::<P>();
		if id == TypeId::of::<System>() {
			Some("System")
		} else if id == TypeId::of::<Timestamp>() {
			Some("Timestamp")
		} else {
			None
		}
	}
}

pub struct BlockWeights;

impl Get<limits::BlockWeights> for BlockWeights {
	fn get() -> limits::BlockWeights {
		limits::BlockWeights::simple_max(Weight::from_parts(1024, u64::MAX))
	}
}

pub struct Version;

impl Get<RuntimeVersion> for Version {
	fn get() -> RuntimeVersion {
		RuntimeVersion {
			spec_name: Cow::Borrowed("timestamp-test"),
			impl_name: Cow::Borrowed("timestamp-test"),
			authoring_version: 1,
			spec_version: 1,
			impl_version: 1,
			apis: Cow::Borrowed(&[]),
			transaction_version: 1,
			system_version: 1,
		}
	}
}

impl stf_system::Config for Test {
	type RuntimeCall = RuntimeCall;
	type RuntimeEvent = RuntimeEvent;
	type AccountData = ();
	type Lookup = AccountIdLookup;
	type BlockWeights = BlockWeights;
	type BlockLength = ();
	type DbWeight = ();
	type Version = Version;
	type BlockHashCount = ConstU32<250>;
	type PalletInfo = TestPalletInfo;
	type SystemWeightInfo = ();
}

impl Config for Test {
	type MinimumPeriod = ConstU64<5>;
	type WeightInfo = ();
}

fn new_test_ext() -> TestExternalities {
	let _ = env_logger::builder().is_test(true).try_init();
	let mut ext = TestExternalities::default();
	stf_system::GenesisConfig::<Test>::default().build(&mut ext).unwrap();
	ext
}

fn inherent_data(now: Moment) -> InherentData {
	let mut data = InherentData::new();
	data.put_data(INHERENT_IDENTIFIER, &now).unwrap();
	data
}

#[test]
fn timestamp_works() {
	new_test_ext().execute_with(|ext| {
		Timestamp::set_timestamp(ext, 42);
		assert!(Timestamp::set(RuntimeOrigin::None, ext, 69).is_ok());
		assert_eq!(Timestamp::now(ext).unwrap(), 69);
		assert!(DidUpdate::get(ext).unwrap());
	});
}

#[test]
fn set_requires_none_origin() {
	new_test_ext().execute_with(|ext| {
		let who = AccountId::new([1; 32]);
		assert_eq!(
			Timestamp::set(RuntimeOrigin::Signed(who), ext, 69).map_err(|e| e.error),
			Err(DispatchError::BadOrigin)
		);
		assert_eq!(
			Timestamp::set(RuntimeOrigin::Root, ext, 69).map_err(|e| e.error),
			Err(DispatchError::BadOrigin)
		);
	});
}

#[test]
fn double_timestamp_should_fail() {
	new_test_ext().execute_with(|ext| {
		Timestamp::set_timestamp(ext, 42);
		assert!(Timestamp::set(RuntimeOrigin::None, ext, 69).is_ok());
		assert_eq!(
			Timestamp::set(RuntimeOrigin::None, ext, 70).map_err(|e| e.error),
			Err(DispatchError::Other("Timestamp must be updated only once in the block"))
		);
	});
}

#[test]
fn block_period_minimum_enforced() {
	new_test_ext().execute_with(|ext| {
		Timestamp::set_timestamp(ext, 42);
		assert_eq!(
			Timestamp::set(RuntimeOrigin::None, ext, 46).map_err(|e| e.error),
			Err(DispatchError::Other(
				"Timestamp must increment by at least <MinimumPeriod> between sequential blocks"
			))
		);
		assert!(Timestamp::set(RuntimeOrigin::None, ext, 47).is_ok());
	});
}

#[test]
fn first_timestamp_ignores_minimum_period() {
	new_test_ext().execute_with(|ext| {
		assert!(Timestamp::set(RuntimeOrigin::None, ext, 1).is_ok());
		assert_eq!(Timestamp::now(ext).unwrap(), 1);
	});
}

#[test]
fn on_finalize_requires_an_update() {
	new_test_ext().execute_with(|ext| {
		assert_eq!(
			Timestamp::on_finalize(ext, 1),
			Err(HookError::Invariant("Timestamp must be updated once in the block"))
		);

		assert!(Timestamp::set(RuntimeOrigin::None, ext, 69).is_ok());
		assert_eq!(Timestamp::on_finalize(ext, 1), Ok(()));
		// The flag is cleared for the next block.
		assert!(!DidUpdate::exists(ext));
		assert!(Timestamp::set(RuntimeOrigin::None, ext, 74).is_ok());
	});
}

#[test]
fn set_is_a_mandatory_inherent() {
	let call = RuntimeCall::Timestamp(Call::set { now: 69 });
	let info = call.get_dispatch_info();
	assert_eq!(info.class, DispatchClass::Mandatory);
	assert_eq!(info.pays_fee, Pays::Yes);
	assert_eq!(info.weight, <() as WeightInfo>::set());
	assert!(Timestamp::is_inherent(&Call::set { now: 69 }));

	// pallet index, call index, compact moment
	assert_eq!(call.encode(), vec![1, 0, 0x15, 0x01]);
	assert_eq!(RuntimeCall::decode_call(&mut &call.encode()[..]).unwrap(), call);
}

#[test]
fn create_inherent_respects_minimum_period() {
	new_test_ext().execute_with(|ext| {
		Timestamp::set_timestamp(ext, 42);
		assert_eq!(
			Timestamp::create_inherent(ext, &inherent_data(100)).unwrap(),
			Some(Call::set { now: 100 })
		);
		assert_eq!(
			Timestamp::create_inherent(ext, &inherent_data(44)).unwrap(),
			Some(Call::set { now: 47 })
		);
		assert_eq!(Timestamp::create_inherent(ext, &InherentData::new()).unwrap(), None);
	});
}

#[test]
fn check_inherent_rejects_drift_and_early_blocks() {
	new_test_ext().execute_with(|ext| {
		Timestamp::set_timestamp(ext, 42);
		let data = inherent_data(1_000);

		assert_eq!(Timestamp::check_inherent(ext, &Call::set { now: 1_000 }, &data).unwrap(), Ok(()));
		assert_eq!(
			Timestamp::check_inherent(ext, &Call::set { now: 1_000 + MAX_TIMESTAMP_DRIFT_MILLIS + 1 }, &data)
				.unwrap(),
			Err(InherentError::TooFarInFuture)
		);
		assert_eq!(
			Timestamp::check_inherent(ext, &Call::set { now: 45 }, &data).unwrap(),
			Err(InherentError::ValidAtTimestamp(47))
		);
		assert_eq!(
			Timestamp::check_inherent(ext, &Call::set { now: 1_000 }, &InherentData::new()).unwrap(),
			Err(InherentError::MissingData)
		);

		assert!(InherentError::TooFarInFuture.is_fatal_error());
		assert!(!InherentError::ValidAtTimestamp(47).is_fatal_error());
	});
}
