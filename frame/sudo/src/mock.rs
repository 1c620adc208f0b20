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

//! Test utilities

use crate::{self as sudo, Config, GenesisConfig};
use alloc::borrow::Cow;
use codec::{Decode, Encode};
use core::any::TypeId;
use stf_io::TestExternalities;
use stf_primitives::{
	traits::{ConstU32, DecodeCall, Dispatchable, Get, GetDispatchInfo},
	AccountId, AccountIdLookup, DecodeError, DispatchResultWithPostInfo, RuntimeVersion,
};
use stf_system::{limits, BuildGenesisConfig, PalletInfo, RuntimeOrigin, UnfilteredDispatchable};
use stf_weights::{DispatchInfo, Weight};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Test;

pub type System = stf_system::Pallet<Test>;
pub type Sudo = sudo::Pallet<Test>;

#[derive(Clone, PartialEq, Eq, Debug, Encode)]
pub enum RuntimeCall {
	#[codec(index = 0)]
	System(stf_system::Call<Test>),
	#[codec(index = 1)]
	Sudo(sudo::Call<Test>),
}

impl From<stf_system::Call<Test>> for RuntimeCall {
	fn from(call: stf_system::Call<Test>) -> Self {
		Self::System(call)
	}
}

impl From<sudo::Call<Test>> for RuntimeCall {
	fn from(call: sudo::Call<Test>) -> Self {
		Self::Sudo(call)
	}
}

impl DecodeCall for RuntimeCall {
	fn decode_call_with_depth(input: &mut &[u8], depth: u32) -> Result<Self, DecodeError> {
		match u8::decode(input)? {
			0 => Ok(Self::System(DecodeCall::decode_call_with_depth(input, depth)?)),
			1 => Ok(Self::Sudo(DecodeCall::decode_call_with_depth(input, depth)?)),
			other => Err(DecodeError::UnknownModule(other)),
		}
	}
}

impl UnfilteredDispatchable for RuntimeCall {
	type RuntimeOrigin = RuntimeOrigin;

	fn dispatch_bypass_filter(
		self,
		origin: RuntimeOrigin,
		ext: &mut dyn stf_io::Externalities,
	) -> DispatchResultWithPostInfo {
		match self {
			Self::System(call) => call.dispatch_bypass_filter(origin, ext),
			Self::Sudo(call) => call.dispatch_bypass_filter(origin, ext),
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
		self.dispatch_bypass_filter(origin, ext)
	}
}

impl GetDispatchInfo for RuntimeCall {
	fn base_weight(&self) -> Weight {
		match self {
			Self::System(call) => call.base_weight(),
			Self::Sudo(call) => call.base_weight(),
		}
	}

	fn get_dispatch_info(&self) -> DispatchInfo {
		match self {
			Self::System(call) => call.get_dispatch_info(),
			Self::Sudo(call) => call.get_dispatch_info(),
		}
	}
}

#[derive(Clone, PartialEq, Eq, Debug, Encode, Decode)]
pub enum RuntimeEvent {
	#[codec(index = 0)]
	System(stf_system::Event),
	#[codec(index = 1)]
	Sudo(sudo::Event),
}

impl From<stf_system::Event> for RuntimeEvent {
	fn from(event: stf_system::Event) -> Self {
		Self::System(event)
	}
}

impl From<sudo::Event> for RuntimeEvent {
	fn from(event: sudo::Event) -> Self {
		Self::Sudo(event)
	}
}

pub struct TestPalletInfo;

impl PalletInfo for TestPalletInfo {
	fn index<P: 'static>() -> Option<usize> {
		let id = TypeId::of::<P>();
		if id == TypeId::of::<System>() {
			Some(0)
		} else if id == TypeId::of::<Sudo>() {
			Some(1)
		} else {
			None
		}
	}

	fn name<P: 'static>() -> Option<&'static str> {
		let id = TypeId::of::<P>();
		if id == TypeId::of::<System>() {
			Some("System")
		} else if id == TypeId::of::<Sudo>() {
			Some("Sudo")
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
			spec_name: Cow::Borrowed("sudo-test"),
			impl_name: Cow::Borrowed("sudo-test"),
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
	type RuntimeEvent = RuntimeEvent;
	type RuntimeCall = RuntimeCall;
	type WeightInfo = ();
}

pub fn account(n: u8) -> AccountId {
	AccountId::new([n; 32])
}

// Build test environment by setting the root `key` for the Genesis.
pub fn new_test_ext(root_key: u8) -> TestExternalities {
	let _ = env_logger::builder().is_test(true).try_init();
	let mut ext = TestExternalities::default();
	stf_system::GenesisConfig::<Test>::default().build(&mut ext).unwrap();
	GenesisConfig::<Test> { key: Some(account(root_key)), ..Default::default() }
		.build(&mut ext)
		.unwrap();
	ext.execute_with(|ext| stf_system::Number::put(ext, 1u32));
	ext
}

pub fn sudo_events(ext: &dyn stf_io::Externalities) -> Vec<sudo::Event> {
	System::events(ext)
		.unwrap()
		.into_iter()
		.filter_map(|record| match record.event {
			RuntimeEvent::Sudo(event) => Some(event),
			_ => None,
		})
		.collect()
}
