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

//! Traits connecting modules to the runtime and to the executive.

use core::fmt;
use stf_io::Externalities;
use stf_primitives::{BlockNumber, DispatchResultWithPostInfo, StorageError};
use stf_weights::Weight;

/// Failure of a block hook. Always fatal for the block being processed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookError {
	/// Reading module storage failed.
	Storage(StorageError),
	/// A module invariant does not hold at the end of the block.
	Invariant(&'static str),
}

impl From<StorageError> for HookError {
	fn from(e: StorageError) -> Self {
		Self::Storage(e)
	}
}

impl fmt::Display for HookError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Storage(e) => write!(f, "hook storage error: {}", e),
			Self::Invariant(msg) => write!(f, "hook invariant violated: {}", msg),
		}
	}
}

/// The block hooks of a module.
///
/// Implemented by every module and, for tuples of modules, by calling each element in order.
pub trait Hooks {
	/// Block initialization hook. Returns the weight it consumed.
	fn on_initialize(_ext: &mut dyn Externalities, _n: BlockNumber) -> Result<Weight, HookError> {
		Ok(Weight::zero())
	}

	/// Block finalization hook. Called after all extrinsics and `on_idle`.
	fn on_finalize(_ext: &mut dyn Externalities, _n: BlockNumber) -> Result<(), HookError> {
		Ok(())
	}

	/// Hook to consume the block's leftover weight. Returns the weight it consumed, which should
	/// not exceed `remaining_weight`.
	fn on_idle(
		_ext: &mut dyn Externalities,
		_n: BlockNumber,
		_remaining_weight: Weight,
	) -> Result<Weight, HookError> {
		Ok(Weight::zero())
	}

	/// Runs once, in the first block after the runtime version changed.
	fn on_runtime_upgrade(_ext: &mut dyn Externalities) -> Result<Weight, HookError> {
		Ok(Weight::zero())
	}

	/// Runs outside of block execution, after a block was imported.
	fn offchain_worker(_ext: &mut dyn Externalities, _n: BlockNumber) -> Result<(), HookError> {
		Ok(())
	}
}

#[impl_trait_for_tuples::impl_for_tuples(12)]
impl Hooks for Tuple {
	fn on_initialize(ext: &mut dyn Externalities, n: BlockNumber) -> Result<Weight, HookError> {
		let mut weight = Weight::zero();
		for_tuples!( #( weight = weight.saturating_add(Tuple::on_initialize(&mut *ext, n)?); )* );
		Ok(weight)
	}

	fn on_finalize(ext: &mut dyn Externalities, n: BlockNumber) -> Result<(), HookError> {
		for_tuples!( #( Tuple::on_finalize(&mut *ext, n)?; )* );
		Ok(())
	}

	fn on_idle(
		ext: &mut dyn Externalities,
		n: BlockNumber,
		remaining_weight: Weight,
	) -> Result<Weight, HookError> {
		let mut weight = Weight::zero();
		for_tuples!( #(
			let adjusted_remaining_weight = remaining_weight.saturating_sub(weight);
			weight = weight.saturating_add(Tuple::on_idle(&mut *ext, n, adjusted_remaining_weight)?);
		)* );
		Ok(weight)
	}

	fn on_runtime_upgrade(ext: &mut dyn Externalities) -> Result<Weight, HookError> {
		let mut weight = Weight::zero();
		for_tuples!( #( weight = weight.saturating_add(Tuple::on_runtime_upgrade(&mut *ext)?); )* );
		Ok(weight)
	}

	fn offchain_worker(ext: &mut dyn Externalities, n: BlockNumber) -> Result<(), HookError> {
		for_tuples!( #( Tuple::offchain_worker(&mut *ext, n)?; )* );
		Ok(())
	}
}

/// A runtime-level migration, run before the modules' own `on_runtime_upgrade`.
pub trait OnRuntimeUpgrade {
	fn on_runtime_upgrade(ext: &mut dyn Externalities) -> Result<Weight, HookError>;
}

#[impl_trait_for_tuples::impl_for_tuples(12)]
impl OnRuntimeUpgrade for Tuple {
	fn on_runtime_upgrade(ext: &mut dyn Externalities) -> Result<Weight, HookError> {
		let mut weight = Weight::zero();
		for_tuples!( #( weight = weight.saturating_add(Tuple::on_runtime_upgrade(&mut *ext)?); )* );
		Ok(weight)
	}
}

/// Provides the position and name of a module in the runtime.
///
/// `P` is the module's `Pallet` type.
pub trait PalletInfo {
	fn index<P: 'static>() -> Option<usize>;
	fn name<P: 'static>() -> Option<&'static str>;
}

/// Dispatch a module call without any origin filter.
pub trait UnfilteredDispatchable {
	type RuntimeOrigin;

	fn dispatch_bypass_filter(
		self,
		origin: Self::RuntimeOrigin,
		ext: &mut dyn Externalities,
	) -> DispatchResultWithPostInfo;
}

/// Writes the genesis state of a module.
pub trait BuildGenesisConfig {
	fn build(&self, ext: &mut dyn Externalities) -> Result<(), StorageError>;
}
