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

//! Test utilities and shared mock runtime.

use crate::{self as stf_balances, Config, GenesisConfig, Pallet};
use codec::{Decode, Encode};
use core::any::TypeId;
use stf_io::TestExternalities;
use stf_primitives::{
	traits::{ConstU128, DecodeCall, Dispatchable, Get, GetDispatchInfo},
	AccountId, AccountIdLookup, DecodeError, DispatchResultWithPostInfo, RuntimeVersion,
};
use stf_system::{limits, BuildGenesisConfig, PalletInfo, RuntimeOrigin, UnfilteredDispatchable};
use stf_weights::{DispatchInfo, RuntimeDbWeight, Weight};


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Test;

pub type System = stf_system::Pallet<Test>;
pub type Balances = Pallet<Test>;

#[derive(Clone, PartialEq, Eq, Debug, Encode)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(stf_system::Call<Test>),
	#[codec(index = 1)]
	Balances(stf_balances::Call<Test>),
}

impl From<stf_system::Call<Test>> for RuntimeCall {
	fn from(call: stf_system::Call<Test>) -> Self {
		Self::System(call)
	}
}

impl From<stf_balances::Call<Test>> for RuntimeCall {
	fn from(call: stf_balances::Call<Test>) -> Self {
		Self::Balances(call)
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

pub struct TestPalletInfo;

impl PalletInfo for TestPalletInfo {
	fn index<P: 'static>() -> Option<usize> {
		let id = TypeId::of::<P>();
		if id == TypeId::of::<System>() {
			Some(0)
		} else if id == TypeId::of::<Balances>() {
			Some(1)
		} else {
			None
		}
	}

	fn name<P: 'static>() -> Option<&'static str> {
		let id = TypeId::of::<P>();
		if id == TypeId::of::<System>() {
			Some("System")
		} else if id == TypeId::of::<Balances>() {
			Some("Balances")
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

pub struct BlockLength;

impl Get<limits::BlockLength> for BlockLength {
	fn get() -> limits::BlockLength {
		limits::BlockLength::max(2 * 1024)
	}
}

pub struct Version;

impl Get<RuntimeVersion> for Version {
	fn get() -> RuntimeVersion {
		RuntimeVersion {
			spec_name: alloc::borrow::Cow::Borrowed("balances-test"),
			impl_name: alloc::borrow::Cow::Borrowed("balances-test"),
			authoring_version: 1,
			spec_version: 1,
			impl_version: 1,
			apis: alloc::borrow::Cow::Borrowed(&[]),
			transaction_version: 1,
			system_version: 1,
		}
	}
}

impl stf_system::Config for Test {
	type RuntimeCall = RuntimeCall;
	type RuntimeEvent = RuntimeEvent;
	type AccountData = stf_balances::AccountData;
	type Lookup = AccountIdLookup;
	type BlockWeights = BlockWeights;
	type BlockLength = BlockLength;
	type DbWeight = ();
	type Version = Version;
	type BlockHashCount = stf_primitives::traits::ConstU32<250>;
	type PalletInfo = TestPalletInfo;
	type SystemWeightInfo = ();
}

impl Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type ExistentialDeposit = ConstU128<10>;
	type WeightInfo = ();
}

pub fn account(n: u8) -> AccountId {
	AccountId::new([n; 32])
}

pub struct ExtBuilder {
	balances: Vec<(AccountId, u128)>,
}

impl Default for ExtBuilder {
	fn default() -> Self {
		Self { balances: vec![(account(1), 100), (account(2), 200)] }
	}
}

impl ExtBuilder {
	pub fn balances(mut self, balances: Vec<(AccountId, u128)>) -> Self {
		self.balances = balances;
		self
	}

	pub fn build(self) -> TestExternalities {
		let _ = env_logger::builder().is_test(true).try_init();
		let mut ext = TestExternalities::default();
		stf_system::GenesisConfig::<Test>::default().build(&mut ext).unwrap();
		GenesisConfig::<Test> { balances: self.balances, ..Default::default() }
			.build(&mut ext)
			.unwrap();
		// Events are only recorded past genesis.
		ext.execute_with(|ext| stf_system::Number::put(ext, 1u32));
		ext
	}
}

pub fn balance_events(ext: &dyn stf_io::Externalities) -> Vec<stf_balances::Event> {
	System::events(ext)
		.unwrap()
		.into_iter()
		.filter_map(|record| match record.event {
			RuntimeEvent::Balances(event) => Some(event),
			_ => None,
		})
		.collect()
}

#[test]
fn calls_decode_by_index() {
	let call = RuntimeCall::Balances(stf_balances::Call::transfer_keep_alive {
		dest: account(2).into(),
		value: 42,
	});
	let encoded = call.encode();
	assert_eq!(&encoded[..2], &[1, 3]);
	assert_eq!(RuntimeCall::decode_call(&mut &encoded[..]).unwrap(), call);

	let unknown = [1u8, 9];
	assert!(matches!(
		RuntimeCall::decode_call(&mut &unknown[..]),
		Err(DecodeError::UnknownFunction(9))
	));
}

#[test]
fn genesis_skips_balances_below_existential_deposit() {
	ExtBuilder::default()
		.balances(vec![(account(1), 100), (account(3), 5)])
		.build()
		.execute_with(|ext| {
			assert_eq!(Balances::free_balance(ext, &account(1)).unwrap(), 100);
			assert_eq!(System::providers(ext, &account(1)).unwrap(), 1);
			assert!(!System::account_exists(ext, &account(3)));
			assert_eq!(Balances::total_issuance(ext).unwrap(), 100);
		});
}
