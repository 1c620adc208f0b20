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

//! Blocks built and imported through the host entry points.

mod common;

use codec::Encode;
use common::*;
use hex_literal::hex;
use pretty_assertions::assert_eq;
use stf_executive::ExecutiveError;
use stf_primitives::{
	inherents::CheckInherentsResult,
	transaction_validity::{
		InvalidTransaction, TransactionSource, TransactionValidity, UnknownTransaction,
	},
	ApplyExtrinsicResult, DecodeError, Hash, MultiSignature, Nonce, RuntimeVersion,
};
use stf_runtime::{
	apis::{self, RuntimeApiError},
	genesis_config_presets::{self, ENDOWMENT},
	Balances, Block, Header, RuntimeEvent, System, Timestamp, UncheckedExtrinsic, UNIT, VERSION,
};
use stf_timestamp::{InherentError, MAX_TIMESTAMP_DRIFT_MILLIS};

#[test]
fn core_version_returns_the_runtime_version() {
	new_test_ext().execute_with(|ext| {
		let version: RuntimeVersion = call_api(ext, "Core_version", ());
		assert_eq!(version, VERSION);
		assert_eq!(version.api_version(&hex!("df6acb689907609b")), Some(5));
		assert_eq!(version.api_version(&hex!("bc9d89904f5b923f")), Some(1));
	});
}

#[test]
fn unknown_method_is_an_error() {
	new_test_ext().execute_with(|ext| {
		let err = apis::call(ext, "Core_does_not_exist", &[]).unwrap_err();
		assert!(matches!(err, RuntimeApiError::UnknownMethod(ref m) if m == "Core_does_not_exist"));
		assert_eq!(err.to_string(), "Unknown runtime api method: Core_does_not_exist");
	});
}

#[test]
fn undecodable_arguments_are_an_error() {
	new_test_ext().execute_with(|ext| {
		let err = apis::call(ext, "Core_initialize_block", &[1, 2, 3]).unwrap_err();
		assert!(matches!(err, RuntimeApiError::Decode(DecodeError::Codec(_))));

		// One byte short of the declared length.
		let mut xt = UncheckedExtrinsic::new_unsigned(transfer(BOB, 1)).encode();
		xt.pop();
		let err = apis::call(ext, "BlockBuilder_apply_extrinsic", &xt).unwrap_err();
		assert!(matches!(err, RuntimeApiError::Decode(DecodeError::InvalidLengthPrefix)));
	});
}

#[test]
fn built_block_is_imported() {
	let block = build_block(|ext| vec![sign(ext, ALICE, transfer(BOB, 10 * UNIT), 0)]);
	assert_eq!(block.extrinsics.len(), 2);

	new_test_ext().execute_with(|ext| {
		apis::call(ext, "Core_execute_block", &block.encode()).unwrap();

		assert_eq!(System::block_number(&*ext).unwrap(), 1);
		assert_eq!(Timestamp::now(&*ext).unwrap(), NOW);
		assert_eq!(Balances::free_balance(&*ext, &account(BOB)).unwrap(), ENDOWMENT + 10 * UNIT);
		assert!(Balances::free_balance(&*ext, &account(ALICE)).unwrap() < ENDOWMENT - 10 * UNIT);

		let nonce: Nonce = call_api(ext, "AccountNonceApi_account_nonce", account(ALICE));
		assert_eq!(nonce, 1);

		let events: Vec<_> = System::events(&*ext).unwrap().into_iter().map(|r| r.event).collect();
		assert!(events.contains(&RuntimeEvent::Balances(stf_balances::Event::Transfer {
			from: account(ALICE),
			to: account(BOB),
			amount: 10 * UNIT,
		})));
		assert!(events
			.iter()
			.any(|e| matches!(e, RuntimeEvent::TransactionPayment(_))));
	});
}

#[test]
fn block_built_on_other_state_is_rejected() {
	let block = build_block(|ext| vec![sign(ext, ALICE, transfer(BOB, UNIT), 0)]);

	new_test_ext().execute_with(|ext| {
		ext.set_storage(b":unrelated:", b"value");
		let err = apis::call(ext, "Core_execute_block", &block.encode()).unwrap_err();
		assert!(matches!(err, RuntimeApiError::Executive(ExecutiveError::InvalidStorageRoot { .. })));
	});
}

#[test]
fn block_without_timestamp_can_not_be_finalized() {
	new_test_ext().execute_with(|ext| {
		apis::call(ext, "Core_initialize_block", &header(1).encode()).unwrap();
		let err = apis::call(ext, "BlockBuilder_finalize_block", &[]).unwrap_err();
		assert!(matches!(err, RuntimeApiError::Executive(ExecutiveError::Hook(_))));
	});
}

#[test]
fn inherent_after_transaction_is_rejected() {
	let mut block = build_block(|ext| vec![sign(ext, ALICE, transfer(BOB, UNIT), 0)]);
	block.extrinsics.swap(0, 1);

	new_test_ext().execute_with(|ext| {
		let err = apis::call(ext, "Core_execute_block", &block.encode()).unwrap_err();
		assert!(matches!(err, RuntimeApiError::Executive(ExecutiveError::InvalidInherentPosition(1))));
	});
}

#[test]
fn block_with_unknown_parent_is_rejected() {
	let block = build_block(|_| vec![]);
	let (header, extrinsics) = block.deconstruct();
	let header = Header { parent_hash: Hash::repeat_byte(1), ..header };

	new_test_ext().execute_with(|ext| {
		let err =
			apis::call(ext, "Core_execute_block", &Block::new(header, extrinsics).encode()).unwrap_err();
		assert!(matches!(err, RuntimeApiError::Executive(ExecutiveError::InvalidParentHash)));
	});
}

#[test]
fn bad_signature_is_not_applied() {
	new_test_ext().execute_with(|ext| {
		apis::call(ext, "Core_initialize_block", &header(1).encode()).unwrap();

		let mut xt = sign(ext, ALICE, transfer(BOB, UNIT), 0);
		if let Some((_, MultiSignature::Ed25519(sig), _)) = xt.signature.as_mut() {
			sig[0] ^= 1;
		}
		let result: ApplyExtrinsicResult = call_api(ext, "BlockBuilder_apply_extrinsic", xt);
		assert_eq!(result, Err(InvalidTransaction::BadProof.into()));
	});
}

#[test]
fn transaction_from_the_future_is_not_applied() {
	new_test_ext().execute_with(|ext| {
		apis::call(ext, "Core_initialize_block", &header(1).encode()).unwrap();

		let xt = sign(ext, ALICE, transfer(BOB, UNIT), 3);
		let result: ApplyExtrinsicResult = call_api(ext, "BlockBuilder_apply_extrinsic", xt);
		assert_eq!(result, Err(InvalidTransaction::Future.into()));
	});
}

#[test]
fn validate_transaction_works() {
	new_test_ext().execute_with(|ext| {
		let genesis = Hash::repeat_byte(69);

		let xt = sign(ext, ALICE, transfer(BOB, UNIT), 0);
		let validity: TransactionValidity = call_api(
			ext,
			"TaggedTransactionQueue_validate_transaction",
			(TransactionSource::External, xt, genesis),
		);
		let valid = validity.unwrap();
		assert!(!valid.provides.is_empty());
		assert!(valid.requires.is_empty());

		// The pool refuses unsigned calls and inherents alike.
		let unsigned = UncheckedExtrinsic::new_unsigned(transfer(BOB, UNIT));
		let validity: TransactionValidity = call_api(
			ext,
			"TaggedTransactionQueue_validate_transaction",
			(TransactionSource::External, unsigned, genesis),
		);
		assert_eq!(validity, Err(UnknownTransaction::NoUnsignedValidator.into()));

		let inherent = inherents(ext, &timestamp_data(NOW)).remove(0);
		let validity: TransactionValidity = call_api(
			ext,
			"TaggedTransactionQueue_validate_transaction",
			(TransactionSource::InBlock, inherent, genesis),
		);
		assert_eq!(validity, Err(InvalidTransaction::MandatoryValidation.into()));

		// Nothing of the validation is kept.
		assert_eq!(System::block_number(&*ext).unwrap(), 0);
		assert_eq!(System::account_nonce(&*ext, &account(ALICE)).unwrap(), 0);
	});
}

#[test]
fn check_inherents_accepts_built_block() {
	let block = build_block(|_| vec![]);

	new_test_ext().execute_with(|ext| {
		let result: CheckInherentsResult =
			call_api(ext, "BlockBuilder_check_inherents", (block, timestamp_data(NOW)));
		assert!(result.ok());
	});
}

#[test]
fn check_inherents_reports_timestamp_too_far_in_future() {
	let block = build_block(|_| vec![]);

	new_test_ext().execute_with(|ext| {
		// The local clock is behind the block author's by more than the allowed drift.
		let data = timestamp_data(NOW - MAX_TIMESTAMP_DRIFT_MILLIS - 1);
		let result: CheckInherentsResult = call_api(ext, "BlockBuilder_check_inherents", (block, data));
		assert!(!result.ok());
		assert!(result.fatal_error());
		assert_eq!(
			result.get_error(&stf_timestamp::INHERENT_IDENTIFIER).unwrap(),
			Some(InherentError::TooFarInFuture),
		);
	});
}

#[test]
fn offchain_worker_records_the_block_hash() {
	let block = build_block(|_| vec![]);

	new_test_ext().execute_with(|ext| {
		apis::call(ext, "Core_execute_block", &block.encode()).unwrap();
		apis::call(ext, "OffchainWorkerApi_offchain_worker", &block.header.encode()).unwrap();
		assert_eq!(System::block_hash(&*ext, 1).unwrap(), block.header.hash(&*ext));
	});
}

#[test]
fn genesis_presets_are_available() {
	let accounts = [account(ALICE), account(BOB)];
	for name in genesis_config_presets::preset_names() {
		let config = genesis_config_presets::get_preset(name, &accounts).unwrap();
		assert_eq!(config.sudo.key, Some(account(ALICE)));
	}

	let dev =
		genesis_config_presets::get_preset(genesis_config_presets::DEV_RUNTIME_PRESET, &accounts)
			.unwrap();
	assert_eq!(dev.balances.balances, vec![(account(ALICE), ENDOWMENT)]);
	assert!(genesis_config_presets::get_preset("unknown", &accounts).is_none());
	assert!(genesis_config_presets::get_preset(genesis_config_presets::DEV_RUNTIME_PRESET, &[])
		.is_none());
}

#[test]
fn inherent_extrinsics_respect_the_minimum_period() {
	new_test_ext().execute_with(|ext| {
		Timestamp::set_timestamp(ext, NOW);
		let xts = inherents(ext, &timestamp_data(NOW + 1));
		assert_eq!(xts.len(), 1);
		assert_eq!(
			xts[0].function,
			stf_timestamp::Call::set { now: NOW + 3000 }.into(),
		);

		// Without data there is no inherent to build.
		assert!(inherents(ext, &Default::default()).is_empty());
	});
}

#[test]
fn executive_errors_convert_into_entry_point_errors() {
	let err: RuntimeApiError =
		ExecutiveError::Storage(stf_primitives::StorageError::Corrupted(vec![1])).into();
	assert!(matches!(err, RuntimeApiError::Storage(_)));
	let err: RuntimeApiError = ExecutiveError::InvalidParentHash.into();
	assert_eq!(err.to_string(), "Parent hash should be valid.");
}
