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

//! Entry points exported from the wasm binary.
//!
//! Each export receives the pointer and length of its SCALE encoded arguments and returns the
//! packed pointer and length of the encoded result. A failing call is logged and traps.

use crate::{apis, LOG_TARGET};
use stf_io::{
	wasm::{input, output, trap, HostExternalities},
	RuntimeLogger,
};

fn run(method: &str, entry_point: apis::EntryPoint, ptr: u32, len: u32) -> u64 {
	RuntimeLogger::init();

	// SAFETY: `ptr` and `len` are the arguments the host called the export with.
	let input = unsafe { input(ptr, len) };
	let mut ext = HostExternalities::default();

	match entry_point(&mut ext, input) {
		Ok(result) => output(result),
		Err(e) => {
			log::error!(target: LOG_TARGET, "critical: {} failed: {}", method, e);
			trap()
		},
	}
}

macro_rules! export_entry_points {
	($($name:ident => $entry_point:path,)*) => {
		$(
			#[no_mangle]
			#[allow(non_snake_case)]
			pub extern "C" fn $name(ptr: u32, len: u32) -> u64 {
				run(stringify!($name), $entry_point, ptr, len)
			}
		)*
	};
}

export_entry_points! {
	Core_version => apis::core_version,
	Core_initialize_block => apis::core_initialize_block,
	Core_execute_block => apis::core_execute_block,
	BlockBuilder_apply_extrinsic => apis::block_builder_apply_extrinsic,
	BlockBuilder_finalize_block => apis::block_builder_finalize_block,
	BlockBuilder_inherent_extrinsics => apis::block_builder_inherent_extrinsics,
	BlockBuilder_check_inherents => apis::block_builder_check_inherents,
	TaggedTransactionQueue_validate_transaction => apis::tagged_transaction_queue_validate_transaction,
	OffchainWorkerApi_offchain_worker => apis::offchain_worker_api_offchain_worker,
	AccountNonceApi_account_nonce => apis::account_nonce_api_account_nonce,
}
