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

//! # Executive Module
//!
//! The Executive module acts as the orchestration layer for the runtime. It dispatches incoming
//! extrinsic calls to the respective modules in the runtime.
//!
//! ## Overview
//!
//! The executive module is not a typical module providing functionality around a specific feature.
//! It is a cross-cutting framework component for the runtime. It uses the System module and the
//! aggregated hooks of every module of the runtime to run a block through its lifecycle:
//!
//! - Initialize a block: run pending runtime upgrades, seed the System storage of the block and
//!   call `on_initialize` of every module.
//! - Apply extrinsics: check, dispatch and account for every extrinsic, in order.
//! - Finalize a block: run `on_idle` with the weight left in the block, then `on_finalize`, and
//!   produce the header.
//! - Check the transaction validity for the transaction pool.
//! - Start an off-chain worker.
//!
//! `execute_block` chains all of the above for an imported block and then compares the header it
//! computed with the one it was given.
//!
//! ## Usage
//!
//! The default way of using the executive is to declare a type alias in the runtime:
//!
//! ```ignore
//! pub type Executive = stf_executive::Executive<
//! 	Runtime,
//! 	SignedExtra,
//! 	ValidateUnsigned,
//! 	AllPalletsWithSystem,
//! >;
//! ```
//!
//! A custom runtime upgrade, run before the `on_runtime_upgrade` of the modules, can be given as
//! the last type parameter.
//!
//! ## Errors
//!
//! Transaction validity errors of `apply_extrinsic` and `validate_transaction` are normal
//! outcomes and are returned as values. Everything that makes the current block unprocessable is
//! an [`ExecutiveError`]; the host-facing entry points abort the invocation on it.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use codec::Encode;
use core::{fmt, marker::PhantomData};
use stf_io::{with_transaction, Externalities, TransactionOutcome};
use stf_primitives::{
	generic::{Block, CheckedExtrinsic, Header, UncheckedExtrinsic},
	traits::{Get, GetDispatchInfo, IsInherent, SignedExtension, ValidateUnsigned},
	transaction_validity::{
		InvalidTransaction, TransactionSource, TransactionValidity, TransactionValidityError,
	},
	AccountId, ApplyError, ApplyExtrinsicResult, Hash, StorageError,
};
use stf_system::{BlockHash, HookError, Hooks, LastRuntimeUpgrade, OnRuntimeUpgrade};
use stf_weights::{DispatchClass, Weight};


/// Log target of the executive.
pub const LOG_TARGET: &str = "runtime::executive";

/// The on-wire extrinsic of a runtime using `System` and the signed extensions `Extra`.
pub type UncheckedExtrinsicOf<System, Extra> =
	UncheckedExtrinsic<<System as stf_system::Config>::RuntimeCall, Extra>;

/// The block of a runtime using `System` and the signed extensions `Extra`.
pub type BlockOf<System, Extra> = Block<UncheckedExtrinsicOf<System, Extra>>;

/// An extrinsic that passed `check`.
pub type CheckedOf<System, Extra> =
	CheckedExtrinsic<AccountId, <System as stf_system::Config>::RuntimeCall, Extra>;

/// Failure making the block being processed invalid, or the state unusable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutiveError {
	/// The parent hash of the header is not the hash of the previous block.
	InvalidParentHash,
	/// An inherent was found after the first non-inherent extrinsic.
	InvalidInherentPosition(usize),
	/// The header declares a different number of digest items than were computed.
	InvalidDigestNum { expected: usize, computed: usize },
	/// The digest item at this position differs from the computed one.
	InvalidDigestItem(usize),
	/// The declared state root differs from the computed one.
	InvalidStorageRoot { expected: Hash, computed: Hash },
	/// The declared extrinsics root differs from the computed one.
	InvalidTxTrie { expected: Hash, computed: Hash },
	/// An extrinsic of the block can not be applied.
	InvalidExtrinsic(TransactionValidityError),
	/// A mandatory extrinsic of the block failed to dispatch.
	BadMandatory,
	/// A block hook failed.
	Hook(HookError),
	/// State can not be read back.
	Storage(StorageError),
}

impl From<StorageError> for ExecutiveError {
	fn from(e: StorageError) -> Self {
		Self::Storage(e)
	}
}

impl From<HookError> for ExecutiveError {
	fn from(e: HookError) -> Self {
		match e {
			HookError::Storage(e) => Self::Storage(e),
			other => Self::Hook(other),
		}
	}
}

impl fmt::Display for ExecutiveError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidParentHash => f.write_str("Parent hash should be valid."),
			Self::InvalidInherentPosition(i) =>
				write!(f, "Invalid inherent position for extrinsic at index {}", i),
			Self::InvalidDigestNum { expected, computed } => write!(
				f,
				"Number of digest items must match that calculated: {} declared, {} computed",
				expected, computed,
			),
			Self::InvalidDigestItem(i) =>
				write!(f, "Digest item must match that calculated (item {})", i),
			Self::InvalidStorageRoot { expected, computed } => write!(
				f,
				"Storage root must match that calculated: {:?} declared, {:?} computed",
				expected, computed,
			),
			Self::InvalidTxTrie { expected, computed } => write!(
				f,
				"Transaction trie root must be valid: {:?} declared, {:?} computed",
				expected, computed,
			),
			Self::InvalidExtrinsic(e) => write!(f, "Invalid extrinsic in block: {}", e),
			Self::BadMandatory => {
				let s: &'static str = InvalidTransaction::BadMandatory.into();
				f.write_str(s)
			},
			Self::Hook(e) => write!(f, "{}", e),
			Self::Storage(e) => write!(f, "{}", e),
		}
	}
}

/// Split a lifecycle failure into the validity outcome and the fatal storage error.
fn split_apply_error<R>(
	res: Result<R, ApplyError>,
) -> Result<Result<R, TransactionValidityError>, StorageError> {
	match res {
		Ok(r) => Ok(Ok(r)),
		Err(ApplyError::Validity(e)) => Ok(Err(e)),
		Err(ApplyError::Storage(e)) => Err(e),
	}
}

/// Main entry point for certain runtime actions as e.g. `execute_block`.
///
/// Generic parameters:
/// - `System`: Something that implements `stf_system::Config`
/// - `Extra`: The signed extensions of the runtime's extrinsics
/// - `UnsignedValidator`: The unsigned transaction validator of the runtime.
/// - `AllPalletsWithSystem`: The hooks of every module of the runtime, System included.
/// - `COnRuntimeUpgrade`: Custom logic that should be called after a runtime upgrade. Modules are
///   not required to use it, but it runs before their own `on_runtime_upgrade`.
pub struct Executive<
	System,
	Extra,
	UnsignedValidator,
	AllPalletsWithSystem,
	COnRuntimeUpgrade = (),
>(PhantomData<(System, Extra, UnsignedValidator, AllPalletsWithSystem, COnRuntimeUpgrade)>);

impl<System, Extra, UnsignedValidator, AllPalletsWithSystem, COnRuntimeUpgrade>
	Executive<System, Extra, UnsignedValidator, AllPalletsWithSystem, COnRuntimeUpgrade>
where
	System: stf_system::Config,
	System::RuntimeCall: IsInherent,
	Extra: SignedExtension<AccountId = AccountId, Call = System::RuntimeCall> + Default,
	UnsignedValidator: ValidateUnsigned<Call = System::RuntimeCall>,
	AllPalletsWithSystem: Hooks,
	COnRuntimeUpgrade: OnRuntimeUpgrade,
{
	/// Execute all `OnRuntimeUpgrade` of this runtime, and return the aggregate weight.
	pub fn execute_on_runtime_upgrade(ext: &mut dyn Externalities) -> Result<Weight, HookError> {
		let weight = COnRuntimeUpgrade::on_runtime_upgrade(&mut *ext)?;
		Ok(weight.saturating_add(AllPalletsWithSystem::on_runtime_upgrade(ext)?))
	}

	/// Returns if the runtime has been upgraded, based on [`LastRuntimeUpgrade`].
	pub fn runtime_upgraded(ext: &dyn Externalities) -> Result<bool, StorageError> {
		let last = LastRuntimeUpgrade::try_get(ext)?;
		let current = <System::Version as Get<_>>::get();
		Ok(last.map(|v| v.was_upgraded(&current)).unwrap_or(true))
	}

	/// Start the execution of a particular block.
	pub fn initialize_block(
		ext: &mut dyn Externalities,
		header: &Header,
	) -> Result<(), ExecutiveError> {
		log::trace!(target: LOG_TARGET, "initialize_block({:?})", header.number);
		stf_system::Pallet::<System>::reset_events(ext);

		let mut weight = Weight::zero();
		if Self::runtime_upgraded(&*ext)? {
			weight = weight.saturating_add(Self::execute_on_runtime_upgrade(ext)?);
			let version = <System::Version as Get<_>>::get();
			log::info!(
				target: LOG_TARGET,
				"runtime upgraded to {} v{}",
				version.spec_name,
				version.spec_version,
			);
			LastRuntimeUpgrade::put(ext, stf_system::LastRuntimeUpgradeInfo::from(version));
		}

		stf_system::Pallet::<System>::initialize(
			ext,
			header.number,
			&header.parent_hash,
			&header.digest,
		);
		weight = weight.saturating_add(AllPalletsWithSystem::on_initialize(ext, header.number)?);
		weight = weight.saturating_add(<System::BlockWeights as Get<_>>::get().base_block);
		stf_system::Pallet::<System>::register_extra_weight_unchecked(
			ext,
			weight,
			DispatchClass::Mandatory,
		)?;

		stf_system::Pallet::<System>::note_finished_initialize(ext);
		Ok(())
	}

	/// Actually execute all transitions for `block`.
	pub fn execute_block(
		ext: &mut dyn Externalities,
		block: BlockOf<System, Extra>,
	) -> Result<(), ExecutiveError> {
		log::trace!(target: LOG_TARGET, "execute_block({:?})", block.header.number);

		Self::check_parent_hash(&*ext, &block.header)?;
		Self::initialize_block(ext, &block.header)?;
		Self::check_inherent_positions(&block)?;

		let (header, extrinsics) = block.deconstruct();
		for xt in extrinsics {
			match Self::apply_extrinsic(ext, xt)? {
				Ok(_outcome) => {},
				Err(e) if e.was_mandatory() => return Err(ExecutiveError::BadMandatory),
				Err(e) => return Err(ExecutiveError::InvalidExtrinsic(e)),
			}
		}

		stf_system::Pallet::<System>::note_finished_extrinsics(ext)?;
		Self::idle_and_finalize_hook(ext, header.number)?;

		Self::final_checks(ext, &header)
	}

	/// Block number `n` is only valid on top of the block recorded for `n - 1`, when there is one.
	/// Block 0 has no parent: executing it re-initializes the state it is built on.
	fn check_parent_hash(ext: &dyn Externalities, header: &Header) -> Result<(), ExecutiveError> {
		let Some(parent_number) = header.number.checked_sub(1) else { return Ok(()) };
		match BlockHash::try_get(ext, parent_number)? {
			Some(known) if known != header.parent_hash => {
				log::debug!(
					target: LOG_TARGET,
					"parent hash mismatch at {}: known {:?}, declared {:?}",
					header.number,
					known,
					header.parent_hash,
				);
				Err(ExecutiveError::InvalidParentHash)
			},
			_ => Ok(()),
		}
	}

	/// Inherents must form a prefix of the extrinsics of the block.
	fn check_inherent_positions(block: &BlockOf<System, Extra>) -> Result<(), ExecutiveError> {
		let mut first_signed_observed = false;
		for (i, xt) in block.extrinsics().iter().enumerate() {
			if xt.is_inherent() {
				if first_signed_observed {
					return Err(ExecutiveError::InvalidInherentPosition(i))
				}
			} else {
				first_signed_observed = true;
			}
		}
		Ok(())
	}

	/// Finalize the block - it is up the caller to ensure that all header fields are valid
	/// except state-root.
	pub fn finalize_block(ext: &mut dyn Externalities) -> Result<Header, ExecutiveError> {
		stf_system::Pallet::<System>::note_finished_extrinsics(ext)?;
		let block_number = stf_system::Pallet::<System>::block_number(&*ext)?;
		log::trace!(target: LOG_TARGET, "finalize_block({:?})", block_number);

		Self::idle_and_finalize_hook(ext, block_number)?;
		Ok(stf_system::Pallet::<System>::finalize(ext)?)
	}

	fn idle_and_finalize_hook(
		ext: &mut dyn Externalities,
		block_number: stf_primitives::BlockNumber,
	) -> Result<(), ExecutiveError> {
		let weight = stf_system::Pallet::<System>::block_weight(&*ext)?;
		let max_weight = <System::BlockWeights as Get<_>>::get().max_block;
		let remaining_weight = max_weight.saturating_sub(weight.total());

		if remaining_weight.all_gt(Weight::zero()) {
			let used_weight = AllPalletsWithSystem::on_idle(ext, block_number, remaining_weight)?;
			stf_system::Pallet::<System>::register_extra_weight_unchecked(
				ext,
				used_weight,
				DispatchClass::Mandatory,
			)?;
		}

		AllPalletsWithSystem::on_finalize(ext, block_number)?;
		Ok(())
	}

	/// Apply extrinsic outside of the block execution function.
	///
	/// This doesn't attempt to validate anything regarding the block, but it builds a list of uxt
	/// hashes. The outer `Err` is fatal; the inner result tells whether the extrinsic may be
	/// included in the block and, if so, how its dispatch went.
	pub fn apply_extrinsic(
		ext: &mut dyn Externalities,
		uxt: UncheckedExtrinsicOf<System, Extra>,
	) -> Result<ApplyExtrinsicResult, StorageError> {
		let encoded = uxt.encode();
		let encoded_len = encoded.len();
		log::trace!(target: LOG_TARGET, "apply_extrinsic: {:?}", uxt);

		// Verify that the signature is good.
		let xt = match split_apply_error(uxt.check::<System::Lookup>(&*ext))? {
			Ok(xt) => xt,
			Err(e) => return Ok(Err(e)),
		};

		// The extrinsic index only moves in `note_applied_extrinsic`, so the data of an extrinsic
		// rejected below is overwritten by the next one.
		stf_system::Pallet::<System>::note_extrinsic(ext, encoded)?;

		let dispatch_info = xt.function.get_dispatch_info();
		let r = match split_apply_error(xt.apply::<UnsignedValidator>(ext, &dispatch_info, encoded_len))?
		{
			Ok(r) => r,
			Err(e) => return Ok(Err(e)),
		};

		// Mandatory(inherents) are not allowed to fail.
		//
		// The entire block should be discarded if an inherent fails to apply. Otherwise
		// it may open an attack vector.
		if r.is_err() && dispatch_info.class == DispatchClass::Mandatory {
			return Ok(Err(InvalidTransaction::BadMandatory.into()))
		}

		stf_system::Pallet::<System>::note_applied_extrinsic(ext, &r, dispatch_info)?;

		Ok(Ok(r.map(|_| ()).map_err(|e| e.error)))
	}

	fn final_checks(ext: &mut dyn Externalities, header: &Header) -> Result<(), ExecutiveError> {
		// remove temporaries
		let new_header = stf_system::Pallet::<System>::finalize(ext)?;

		// check digest
		let items_expected = header.digest.logs();
		let items_computed = new_header.digest.logs();
		if items_expected.len() != items_computed.len() {
			return Err(ExecutiveError::InvalidDigestNum {
				expected: items_expected.len(),
				computed: items_computed.len(),
			})
		}
		for (i, (expected, computed)) in items_expected.iter().zip(items_computed).enumerate() {
			if expected != computed {
				return Err(ExecutiveError::InvalidDigestItem(i))
			}
		}

		// check storage root.
		if header.state_root != new_header.state_root {
			return Err(ExecutiveError::InvalidStorageRoot {
				expected: header.state_root,
				computed: new_header.state_root,
			})
		}

		// check transaction trie root represents the transactions.
		if header.extrinsics_root != new_header.extrinsics_root {
			return Err(ExecutiveError::InvalidTxTrie {
				expected: header.extrinsics_root,
				computed: new_header.extrinsics_root,
			})
		}

		Ok(())
	}

	/// Check a given signed transaction for validity. This doesn't execute any
	/// side-effects; it merely checks whether the transaction could be included on top of the
	/// current state.
	///
	/// Changes made to storage are discarded before returning.
	pub fn validate_transaction(
		ext: &mut dyn Externalities,
		source: TransactionSource,
		uxt: UncheckedExtrinsicOf<System, Extra>,
		block_hash: Hash,
	) -> Result<TransactionValidity, StorageError> {
		with_transaction(ext, |ext| {
			TransactionOutcome::Rollback(Self::validate_transaction_inner(ext, source, uxt, block_hash))
		})
	}

	fn validate_transaction_inner(
		ext: &mut dyn Externalities,
		source: TransactionSource,
		uxt: UncheckedExtrinsicOf<System, Extra>,
		block_hash: Hash,
	) -> Result<TransactionValidity, StorageError> {
		let number = stf_system::Pallet::<System>::block_number(&*ext)?.saturating_add(1);
		stf_system::Pallet::<System>::initialize(ext, number, &block_hash, &Default::default());

		log::trace!(target: LOG_TARGET, "validate_transaction: {:?}", uxt);
		let encoded_len = uxt.using_encoded(|d| d.len());

		let xt: CheckedOf<System, Extra> =
			match split_apply_error(uxt.check::<System::Lookup>(&*ext))? {
				Ok(xt) => xt,
				Err(e) => return Ok(Err(e)),
			};

		let dispatch_info = xt.function.get_dispatch_info();
		if dispatch_info.class == DispatchClass::Mandatory {
			return Ok(Err(InvalidTransaction::MandatoryValidation.into()))
		}

		split_apply_error(xt.validate::<UnsignedValidator>(&*ext, source, &dispatch_info, encoded_len))
	}

	/// Start an offchain worker and generate extrinsics.
	pub fn offchain_worker(ext: &mut dyn Externalities, header: &Header) -> Result<(), ExecutiveError> {
		// We need to keep events available for offchain workers,
		// hence we initialize the block manually.
		// OffchainWorker RuntimeApi should skip initialization.
		stf_system::Pallet::<System>::initialize(
			ext,
			header.number,
			&header.parent_hash,
			&header.digest,
		);

		// Frame system only inserts the parent hash into the block hashes as normally we don't know
		// the hash for the header before. However, here we are aware of the hash and we can add it
		// as well.
		let hash = header.hash(&*ext);
		BlockHash::insert(ext, header.number, hash);

		AllPalletsWithSystem::offchain_worker(ext, header.number)?;
		Ok(())
	}
}
