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

//! Host functions imported by the sandboxed runtime.
//!
//! Every pointer handed back by the host was allocated with `ext_allocator_malloc_version_1`,
//! which is also the runtime's global allocator, so returned buffers are copied and then freed.

use crate::{pack_ptr_and_len, unpack_ptr_and_len, EcdsaVerifyError, Externalities, StateVersion};
use alloc::vec::Vec;
use codec::{Decode, Encode};
use core::alloc::{GlobalAlloc, Layout};

extern "C" {
	fn ext_storage_get_version_1(key: u64) -> u64;
	fn ext_storage_set_version_1(key: u64, value: u64);
	fn ext_storage_clear_version_1(key: u64);
	fn ext_storage_exists_version_1(key: u64) -> u32;
	fn ext_storage_clear_prefix_version_2(prefix: u64, limit: u64) -> u64;
	fn ext_storage_root_version_2(version: u32) -> u64;
	fn ext_storage_start_transaction_version_1();
	fn ext_storage_rollback_transaction_version_1();
	fn ext_storage_commit_transaction_version_1();

	fn ext_hashing_blake2_128_version_1(data: u64) -> u32;
	fn ext_hashing_blake2_256_version_1(data: u64) -> u32;
	fn ext_hashing_twox_64_version_1(data: u64) -> u32;
	fn ext_hashing_twox_128_version_1(data: u64) -> u32;

	fn ext_trie_blake2_256_ordered_root_version_2(input: u64, version: u32) -> u32;

	fn ext_crypto_ed25519_verify_version_1(sig: u32, msg: u64, public: u32) -> u32;
	fn ext_crypto_sr25519_verify_version_2(sig: u32, msg: u64, public: u32) -> u32;
	fn ext_crypto_secp256k1_ecdsa_recover_compressed_version_2(sig: u32, msg: u32) -> u64;

	fn ext_allocator_malloc_version_1(size: u32) -> u32;
	fn ext_allocator_free_version_1(ptr: u32);

	fn ext_logging_log_version_1(level: u32, target: u64, message: u64);
	fn ext_logging_max_level_version_1() -> u32;
}

/// Allocator backed by the host's `ext_allocator_*` functions.
struct HostAllocator;

#[global_allocator]
static ALLOCATOR: HostAllocator = HostAllocator;

unsafe impl GlobalAlloc for HostAllocator {
	unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
		// The host allocator always returns 8-byte aligned memory.
		if layout.align() > 8 {
			return core::ptr::null_mut()
		}
		ext_allocator_malloc_version_1(layout.size() as u32) as *mut u8
	}

	unsafe fn dealloc(&self, ptr: *mut u8, _: Layout) {
		ext_allocator_free_version_1(ptr as u32)
	}
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
	log::error!(target: "runtime", "{}", info);
	core::arch::wasm32::unreachable()
}

/// Abort the current invocation.
pub fn trap() -> ! {
	core::arch::wasm32::unreachable()
}

fn fat(data: &[u8]) -> u64 {
	pack_ptr_and_len(data.as_ptr() as u32, data.len() as u32)
}

/// Copy a host-allocated buffer into an owned vector and free it.
unsafe fn take_buffer(packed: u64) -> Vec<u8> {
	let (ptr, len) = unpack_ptr_and_len(packed);
	let out = core::slice::from_raw_parts(ptr as *const u8, len as usize).to_vec();
	ext_allocator_free_version_1(ptr);
	out
}

unsafe fn take_array<const N: usize>(ptr: u32) -> [u8; N] {
	let mut out = [0u8; N];
	out.copy_from_slice(core::slice::from_raw_parts(ptr as *const u8, N));
	ext_allocator_free_version_1(ptr);
	out
}

/// Borrow the input buffer of an entry point.
///
/// # Safety
///
/// `ptr` and `len` must be the values the host passed to the entry point.
pub unsafe fn input<'a>(ptr: u32, len: u32) -> &'a [u8] {
	if len == 0 {
		return &[]
	}
	core::slice::from_raw_parts(ptr as *const u8, len as usize)
}

/// Hand `output` to the host, returning the packed pointer and length of the leaked buffer.
pub fn output(output: Vec<u8>) -> u64 {
	let output = output.leak();
	fat(output)
}

/// [`Externalities`] served by the executing host.
#[derive(Default)]
pub struct HostExternalities;

impl Externalities for HostExternalities {
	fn storage(&self, key: &[u8]) -> Option<Vec<u8>> {
		let encoded = unsafe { take_buffer(ext_storage_get_version_1(fat(key))) };
		// The host always returns a valid `Option<Vec<u8>>`.
		Option::<Vec<u8>>::decode(&mut &encoded[..]).unwrap_or_else(|_| trap())
	}

	fn set_storage(&mut self, key: &[u8], value: &[u8]) {
		unsafe { ext_storage_set_version_1(fat(key), fat(value)) }
	}

	fn clear_storage(&mut self, key: &[u8]) {
		unsafe { ext_storage_clear_version_1(fat(key)) }
	}

	fn exists_storage(&self, key: &[u8]) -> bool {
		unsafe { ext_storage_exists_version_1(fat(key)) == 1 }
	}

	fn clear_prefix(&mut self, prefix: &[u8], limit: Option<u32>) -> u32 {
		#[derive(Decode)]
		enum KillStorageResult {
			AllRemoved(u32),
			SomeRemaining(u32),
		}

		let limit = limit.encode();
		let encoded =
			unsafe { take_buffer(ext_storage_clear_prefix_version_2(fat(prefix), fat(&limit))) };
		match KillStorageResult::decode(&mut &encoded[..]) {
			Ok(KillStorageResult::AllRemoved(n)) | Ok(KillStorageResult::SomeRemaining(n)) => n,
			Err(_) => trap(),
		}
	}

	fn storage_root(&mut self, version: StateVersion) -> Vec<u8> {
		unsafe { take_buffer(ext_storage_root_version_2(u8::from(version) as u32)) }
	}

	fn storage_start_transaction(&mut self) {
		unsafe { ext_storage_start_transaction_version_1() }
	}

	fn storage_rollback_transaction(&mut self) {
		unsafe { ext_storage_rollback_transaction_version_1() }
	}

	fn storage_commit_transaction(&mut self) {
		unsafe { ext_storage_commit_transaction_version_1() }
	}

	fn blake2_128(&self, data: &[u8]) -> [u8; 16] {
		unsafe { take_array(ext_hashing_blake2_128_version_1(fat(data))) }
	}

	fn blake2_256(&self, data: &[u8]) -> [u8; 32] {
		unsafe { take_array(ext_hashing_blake2_256_version_1(fat(data))) }
	}

	fn twox_64(&self, data: &[u8]) -> [u8; 8] {
		unsafe { take_array(ext_hashing_twox_64_version_1(fat(data))) }
	}

	fn twox_128(&self, data: &[u8]) -> [u8; 16] {
		unsafe { take_array(ext_hashing_twox_128_version_1(fat(data))) }
	}

	fn ordered_trie_root(&self, input: &[Vec<u8>], version: StateVersion) -> Vec<u8> {
		let encoded = input.encode();
		let root: [u8; 32] = unsafe {
			take_array(ext_trie_blake2_256_ordered_root_version_2(
				fat(&encoded),
				u8::from(version) as u32,
			))
		};
		root.to_vec()
	}

	fn ed25519_verify(&self, sig: &[u8; 64], msg: &[u8], public: &[u8; 32]) -> bool {
		unsafe {
			ext_crypto_ed25519_verify_version_1(
				sig.as_ptr() as u32,
				fat(msg),
				public.as_ptr() as u32,
			) == 1
		}
	}

	fn sr25519_verify(&self, sig: &[u8; 64], msg: &[u8], public: &[u8; 32]) -> bool {
		unsafe {
			ext_crypto_sr25519_verify_version_2(
				sig.as_ptr() as u32,
				fat(msg),
				public.as_ptr() as u32,
			) == 1
		}
	}

	fn secp256k1_ecdsa_recover_compressed(
		&self,
		sig: &[u8; 65],
		msg: &[u8; 32],
	) -> Result<[u8; 33], EcdsaVerifyError> {
		let encoded = unsafe {
			take_buffer(ext_crypto_secp256k1_ecdsa_recover_compressed_version_2(
				sig.as_ptr() as u32,
				msg.as_ptr() as u32,
			))
		};
		Result::<[u8; 33], EcdsaVerifyError>::decode(&mut &encoded[..])
			.unwrap_or(Err(EcdsaVerifyError::BadSignature))
	}
}

pub mod logging {
	use super::*;

	fn level_to_host(level: log::Level) -> u32 {
		match level {
			log::Level::Error => 1,
			log::Level::Warn => 2,
			log::Level::Info => 3,
			log::Level::Debug => 4,
			log::Level::Trace => 5,
		}
	}

	/// Forward a log line to the host.
	pub fn log(level: log::Level, target: &str, message: &[u8]) {
		unsafe { ext_logging_log_version_1(level_to_host(level), fat(target.as_bytes()), fat(message)) }
	}

	/// The most verbose level the host is interested in.
	pub fn max_level() -> log::LevelFilter {
		match unsafe { ext_logging_max_level_version_1() } {
			0 => log::LevelFilter::Off,
			1 => log::LevelFilter::Error,
			2 => log::LevelFilter::Warn,
			3 => log::LevelFilter::Info,
			4 => log::LevelFilter::Debug,
			_ => log::LevelFilter::Trace,
		}
	}
}
