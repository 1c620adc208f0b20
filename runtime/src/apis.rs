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

//! The runtime APIs, as called by the host.
//!
//! Every entry point takes the SCALE encoded arguments of the call and returns the SCALE encoded
//! result. An `Err` means the invocation can not complete; the wasm exports log it and trap.

use crate::{
	account_nonce, Block, Executive, Header, Runtime, RuntimeCall, SignedExtra, UncheckedExtrinsic,
	LOG_TARGET, VERSION,
};
use alloc::{string::String, vec::Vec};
use codec::{Decode, DecodeAll, Encode};
use core::fmt;
use stf_executive::ExecutiveError;
use stf_io::Externalities;
use stf_primitives::{
	inherents::InherentData, transaction_validity::TransactionSource, AccountId, DecodeError, Hash,
	StorageError,
};

/// Output of an entry point.
pub type ApiResult = Result<Vec<u8>, RuntimeApiError>;

/// Signature shared by every entry point.
pub type EntryPoint = fn(&mut dyn Externalities, &[u8]) -> ApiResult;

/// Failure of an entry point.
#[derive(Debug)]
pub enum RuntimeApiError {
	/// No entry point is exported under this name.
	UnknownMethod(String),
	/// The arguments of the call can not be decoded.
	Decode(DecodeError),
	/// The block being processed is invalid.
	Executive(ExecutiveError),
	/// State can not be read back.
	Storage(StorageError),
}

impl From<DecodeError> for RuntimeApiError {
	fn from(e: DecodeError) -> Self {
		Self::Decode(e)
	}
}

impl From<codec::Error> for RuntimeApiError {
	fn from(e: codec::Error) -> Self {
		Self::Decode(e.into())
	}
}

impl From<ExecutiveError> for RuntimeApiError {
	fn from(e: ExecutiveError) -> Self {
		match e {
			ExecutiveError::Storage(e) => Self::Storage(e),
			other => Self::Executive(other),
		}
	}
}

impl From<StorageError> for RuntimeApiError {
	fn from(e: StorageError) -> Self {
		Self::Storage(e)
	}
}

impl fmt::Display for RuntimeApiError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::UnknownMethod(method) => write!(f, "Unknown runtime api method: {}", method),
			Self::Decode(e) => write!(f, "Bad input data provided: {}", e),
			Self::Executive(e) => write!(f, "{}", e),
			Self::Storage(e) => write!(f, "{}", e),
		}
	}
}

/// Every entry point, by exported name.
pub const ENTRY_POINTS: &[(&str, EntryPoint)] = &[
	("Core_version", core_version),
	("Core_initialize_block", core_initialize_block),
	("Core_execute_block", core_execute_block),
	("BlockBuilder_apply_extrinsic", block_builder_apply_extrinsic),
	("BlockBuilder_finalize_block", block_builder_finalize_block),
	("BlockBuilder_inherent_extrinsics", block_builder_inherent_extrinsics),
	("BlockBuilder_check_inherents", block_builder_check_inherents),
	("TaggedTransactionQueue_validate_transaction", tagged_transaction_queue_validate_transaction),
	("OffchainWorkerApi_offchain_worker", offchain_worker_api_offchain_worker),
	("AccountNonceApi_account_nonce", account_nonce_api_account_nonce),
];

/// Call the entry point exported as `method`.
pub fn call(ext: &mut dyn Externalities, method: &str, input: &[u8]) -> ApiResult {
	let (_, entry_point) = ENTRY_POINTS
		.iter()
		.find(|(name, _)| *name == method)
		.ok_or_else(|| RuntimeApiError::UnknownMethod(method.into()))?;
	log::trace!(target: LOG_TARGET, "calling {} with {} bytes", method, input.len());
	entry_point(ext, input)
}

fn decode_args<T: Decode>(mut input: &[u8]) -> Result<T, RuntimeApiError> {
	Ok(T::decode_all(&mut input)?)
}

/// `Core_version() -> RuntimeVersion`
pub fn core_version(_ext: &mut dyn Externalities, _input: &[u8]) -> ApiResult {
	Ok(VERSION.encode())
}

/// `Core_initialize_block(header)`
pub fn core_initialize_block(ext: &mut dyn Externalities, input: &[u8]) -> ApiResult {
	let header: Header = decode_args(input)?;
	Executive::initialize_block(ext, &header)?;
	Ok(().encode())
}

/// `Core_execute_block(block)`
pub fn core_execute_block(ext: &mut dyn Externalities, input: &[u8]) -> ApiResult {
	let block = stf_primitives::generic::decode_block::<RuntimeCall, SignedExtra>(input)?;
	Executive::execute_block(ext, block)?;
	Ok(().encode())
}

/// `BlockBuilder_apply_extrinsic(extrinsic) -> ApplyExtrinsicResult`
pub fn block_builder_apply_extrinsic(ext: &mut dyn Externalities, input: &[u8]) -> ApiResult {
	let mut input = input;
	let extrinsic = UncheckedExtrinsic::decode_typed(&mut input)?;
	ensure_consumed(input)?;
	Ok(Executive::apply_extrinsic(ext, extrinsic)?.encode())
}

/// `BlockBuilder_finalize_block() -> Header`
pub fn block_builder_finalize_block(ext: &mut dyn Externalities, _input: &[u8]) -> ApiResult {
	Ok(Executive::finalize_block(ext)?.encode())
}

/// `BlockBuilder_inherent_extrinsics(InherentData) -> Vec<UncheckedExtrinsic>`
pub fn block_builder_inherent_extrinsics(ext: &mut dyn Externalities, input: &[u8]) -> ApiResult {
	let data: InherentData = decode_args(input)?;
	Ok(Runtime::inherent_extrinsics(&*ext, &data)?.encode())
}

/// `BlockBuilder_check_inherents(block, InherentData) -> CheckInherentsResult`
pub fn block_builder_check_inherents(ext: &mut dyn Externalities, input: &[u8]) -> ApiResult {
	let mut input = input;
	let block = Block::decode_typed(&mut input)?;
	let data = InherentData::decode_all(&mut input)?;
	Ok(Runtime::check_inherents(&*ext, &block, &data)?.encode())
}

/// `TaggedTransactionQueue_validate_transaction(source, extrinsic, block_hash)
/// -> TransactionValidity`
pub fn tagged_transaction_queue_validate_transaction(
	ext: &mut dyn Externalities,
	input: &[u8],
) -> ApiResult {
	let mut input = input;
	let source = TransactionSource::decode(&mut input)?;
	let extrinsic = UncheckedExtrinsic::decode_typed(&mut input)?;
	let block_hash = Hash::decode_all(&mut input)?;
	Ok(Executive::validate_transaction(ext, source, extrinsic, block_hash)?.encode())
}

/// `OffchainWorkerApi_offchain_worker(header)`
pub fn offchain_worker_api_offchain_worker(ext: &mut dyn Externalities, input: &[u8]) -> ApiResult {
	let header: Header = decode_args(input)?;
	Executive::offchain_worker(ext, &header)?;
	Ok(().encode())
}

/// `AccountNonceApi_account_nonce(account) -> Nonce`
pub fn account_nonce_api_account_nonce(ext: &mut dyn Externalities, input: &[u8]) -> ApiResult {
	let account: AccountId = decode_args(input)?;
	Ok(account_nonce(&*ext, &account)?.encode())
}

fn ensure_consumed(input: &[u8]) -> Result<(), RuntimeApiError> {
	if input.is_empty() {
		Ok(())
	} else {
		Err(codec::Error::from("Input buffer has still data left after decoding!").into())
	}
}
