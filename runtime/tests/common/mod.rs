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

//! Helpers shared by the integration tests of the runtime.

#![allow(dead_code)]

use codec::{Decode, Encode};
use stf_io::{Externalities, TestExternalities};
use stf_primitives::{
	generic::{Digest, Era},
	inherents::InherentData,
	AccountId, Balance, BlockNumber, Hash, MultiAddress, MultiSignature, Nonce,
};
use stf_runtime::{
	apis, genesis_config_presets::testnet_genesis, signed_extra, Block, Header, RuntimeCall,
	SignedPayload, UncheckedExtrinsic,
};
use stf_system::BuildGenesisConfig;

pub const ALICE: u8 = 1;
pub const BOB: u8 = 2;

/// Time of block 1, in milliseconds since the unix epoch.
pub const NOW: u64 = 1_600_000_000_000;

pub fn account(seed: u8) -> AccountId {
	AccountId::from(stf_io::testing::ed25519_public(&[seed; 32]))
}

/// Genesis state endowing Alice and Bob, with Alice as the sudo key.
pub fn new_test_ext() -> TestExternalities {
	let _ = env_logger::builder().is_test(true).try_init();
	let mut ext = TestExternalities::default();
	testnet_genesis(vec![account(ALICE), account(BOB)], account(ALICE))
		.build(&mut ext)
		.unwrap();
	ext
}

pub fn sign(ext: &dyn Externalities, seed: u8, call: RuntimeCall, nonce: Nonce) -> UncheckedExtrinsic {
	sign_with_tip(ext, seed, call, nonce, 0)
}

pub fn sign_with_tip(
	ext: &dyn Externalities,
	seed: u8,
	call: RuntimeCall,
	nonce: Nonce,
	tip: Balance,
) -> UncheckedExtrinsic {
	let extra = signed_extra(nonce, Era::Immortal, tip);
	let payload = SignedPayload::new(call.clone(), extra.clone(), ext).unwrap();
	let signature = stf_io::testing::ed25519_sign(&[seed; 32], &payload.signing_bytes(ext));
	UncheckedExtrinsic::new_signed(
		call,
		MultiAddress::Id(account(seed)),
		MultiSignature::Ed25519(signature),
		extra,
	)
}

pub fn transfer(dest: u8, value: Balance) -> RuntimeCall {
	stf_balances::Call::transfer_allow_death { dest: MultiAddress::Id(account(dest)), value }.into()
}

pub fn timestamp_data(now: u64) -> InherentData {
	let mut data = InherentData::new();
	data.put_data(stf_timestamp::INHERENT_IDENTIFIER, &now).unwrap();
	data
}

pub fn header(number: BlockNumber) -> Header {
	Header::new(number, Hash::zero(), Hash::zero(), Hash::repeat_byte(69), Digest::default())
}

/// Call `method` with the encoded `args` and decode its output.
pub fn call_api<R: Decode>(ext: &mut dyn Externalities, method: &str, args: impl Encode) -> R {
	let output = apis::call(ext, method, &args.encode()).unwrap();
	R::decode(&mut &output[..]).unwrap()
}

/// The inherents of `data`, as the block builder would ask for them.
pub fn inherents(ext: &mut dyn Externalities, data: &InherentData) -> Vec<UncheckedExtrinsic> {
	let output = apis::call(ext, "BlockBuilder_inherent_extrinsics", &data.encode()).unwrap();
	let mut input = &output[..];
	let count = codec::Compact::<u32>::decode(&mut input).unwrap().0;
	(0..count).map(|_| UncheckedExtrinsic::decode_typed(&mut input).unwrap()).collect()
}

/// Build block 1 out of the timestamp inherent and the extrinsics `make_xts` returns, going
/// through the block builder entry points.
pub fn build_block(make_xts: impl FnOnce(&dyn Externalities) -> Vec<UncheckedExtrinsic>) -> Block {
	new_test_ext().execute_with(|ext| {
		apis::call(ext, "Core_initialize_block", &header(1).encode()).unwrap();

		let mut xts = inherents(ext, &timestamp_data(NOW));
		xts.extend(make_xts(&*ext));
		for xt in &xts {
			let output = apis::call(ext, "BlockBuilder_apply_extrinsic", &xt.encode()).unwrap();
			let result = stf_primitives::ApplyExtrinsicResult::decode(&mut &output[..]).unwrap();
			assert!(result.is_ok(), "{:?} was not included: {:?}", xt, result);
		}

		let header: Header = call_api(ext, "BlockBuilder_finalize_block", ());
		Block::new(header, xts)
	})
}
