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

use crate::{limits::BlockWeights, AllExtrinsicsLen, BlockWeight, Config, Pallet, LOG_TARGET};
use codec::{Decode, Encode};
use scale_info::TypeInfo;
use stf_io::Externalities;
use stf_primitives::{
	traits::{Get, SignedExtension},
	transaction_validity::{InvalidTransaction, ValidTransaction},
	AccountId, ApplyError, DispatchResult,
};
use stf_weights::{ConsumedWeight, DispatchClass, DispatchInfo, PostDispatchInfo};

/// Block resource (weight) limit check.
///
/// # Transaction Validity
///
/// This extension does not influence any fields of `TransactionValidity` in case the
/// transaction is valid.
#[derive(Encode, Decode, Clone, Eq, PartialEq, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub struct CheckWeight<T: Config>(core::marker::PhantomData<T>);

impl<T: Config> CheckWeight<T> {
	/// Creates new `SignedExtension` to check weight of the extrinsic.
	pub fn new() -> Self {
		Self(core::marker::PhantomData)
	}

	/// Checks if the current extrinsic does not exceed the maximum weight a single extrinsic
	/// with given `DispatchClass` can have.
	fn check_extrinsic_weight(info: &DispatchInfo) -> Result<(), ApplyError> {
		let max = T::BlockWeights::get().get(info.class).max_extrinsic;
		match max {
			Some(max) if info.weight.any_gt(max) => {
				log::debug!(
					target: LOG_TARGET,
					"Extrinsic {} is greater than the max extrinsic {}",
					info.weight.ref_time(),
					max.ref_time(),
				);

				Err(InvalidTransaction::ExhaustsResources.into())
			},
			_ => Ok(()),
		}
	}

	/// Checks if the current extrinsic can fit into the block with respect to block weight limits.
	///
	/// Upon successes, it returns the new block weight as a `Result`.
	fn check_block_weight(
		ext: &dyn Externalities,
		info: &DispatchInfo,
	) -> Result<ConsumedWeight, ApplyError> {
		let maximum_weight = T::BlockWeights::get();
		let all_weight = Pallet::<T>::block_weight(ext)?;
		calculate_consumed_weight(&maximum_weight, all_weight, info)
	}

	/// Checks if the current extrinsic can fit into the block with respect to block length limits.
	///
	/// Upon successes, it returns the new block length as a `Result`.
	fn check_block_length(
		ext: &dyn Externalities,
		info: &DispatchInfo,
		len: usize,
	) -> Result<u32, ApplyError> {
		let length_limit = T::BlockLength::get();
		let current_len = Pallet::<T>::all_extrinsics_len(ext)?;
		let added_len = len as u32;
		let next_len = current_len.saturating_add(added_len);
		if next_len > *length_limit.max.get(info.class) {
			log::debug!(
				target: LOG_TARGET,
				"Exceeded block length limit: {} > {}",
				next_len,
				length_limit.max.get(info.class),
			);

			Err(InvalidTransaction::ExhaustsResources.into())
		} else {
			Ok(next_len)
		}
	}

	/// Do the pre-dispatch checks. This can be applied to both signed and unsigned.
	///
	/// It checks and notes the new weight and length.
	pub fn do_pre_dispatch(
		ext: &mut dyn Externalities,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(), ApplyError> {
		let next_len = Self::check_block_length(&*ext, info, len)?;
		Self::check_extrinsic_weight(info)?;
		let next_weight = Self::check_block_weight(&*ext, info)?;

		AllExtrinsicsLen::put(ext, next_len);
		BlockWeight::put(ext, next_weight);
		Ok(())
	}

	/// Do the validate checks. This can be applied to both signed and unsigned.
	///
	/// It only checks that the block weight and length limit will not exceed.
	pub fn do_validate(
		ext: &dyn Externalities,
		info: &DispatchInfo,
		len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		// ignore the next length. If they return `Ok`, then it is below the limit.
		let _ = Self::check_block_length(ext, info, len)?;
		// during validation we skip block limit check. Since the `validate_transaction`
		// call runs on an empty block anyway, by this we prevent `on_initialize` weight
		// consumption from causing false negatives.
		Self::check_extrinsic_weight(info)?;

		Ok(Default::default())
	}
}

/// Add `info.weight` plus the base extrinsic weight to `all_weight` and check the result against
/// the per-class and block limits in `maximum_weight`.
pub fn calculate_consumed_weight(
	maximum_weight: &BlockWeights,
	mut all_weight: ConsumedWeight,
	info: &DispatchInfo,
) -> Result<ConsumedWeight, ApplyError> {
	let extrinsic_weight =
		info.weight.saturating_add(maximum_weight.get(info.class).base_extrinsic);
	let limit_per_class = maximum_weight.get(info.class);

	// add the weight. If class is unlimited, use saturating add instead of checked one.
	if limit_per_class.max_total.is_none() && limit_per_class.reserved.is_none() {
		all_weight.accrue(extrinsic_weight, info.class)
	} else {
		all_weight
			.checked_accrue(extrinsic_weight, info.class)
			.map_err(|_| InvalidTransaction::ExhaustsResources)?;
	}

	let per_class = *all_weight.get(info.class);

	// Check if we don't exceed per-class allowance
	match limit_per_class.max_total {
		Some(max) if per_class.any_gt(max) => {
			log::debug!(
				target: LOG_TARGET,
				"Exceeded the per-class allowance.",
			);

			return Err(InvalidTransaction::ExhaustsResources.into())
		},
		// There is no `max_total` limit (`None`),
		// or we are below the limit.
		_ => {},
	}

	// In cases total block weight is exceeded, we need to fall back
	// to `reserved` pool if there is any.
	if all_weight.total().any_gt(maximum_weight.max_block) {
		match limit_per_class.reserved {
			// We are over the limit in reserved pool.
			Some(reserved) if per_class.any_gt(reserved) => {
				log::debug!(
					target: LOG_TARGET,
					"Total block weight is exceeded.",
				);

				return Err(InvalidTransaction::ExhaustsResources.into())
			},
			// There is either no limit in reserved pool (`None`),
			// or we are below the limit.
			_ => {},
		}
	}

	Ok(all_weight)
}

impl<T: Config> SignedExtension for CheckWeight<T> {
	const IDENTIFIER: &'static str = "CheckWeight";
	type AccountId = AccountId;
	type Call = T::RuntimeCall;
	type AdditionalSigned = ();
	type Pre = ();

	fn additional_signed(&self, _: &dyn Externalities) -> Result<(), ApplyError> {
		Ok(())
	}

	fn pre_dispatch(
		self,
		ext: &mut dyn Externalities,
		_who: &AccountId,
		_call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(), ApplyError> {
		Self::do_pre_dispatch(ext, info, len)
	}

	fn validate(
		&self,
		ext: &dyn Externalities,
		_who: &AccountId,
		_call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		Self::do_validate(ext, info, len)
	}

	fn pre_dispatch_unsigned(
		ext: &mut dyn Externalities,
		_call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(), ApplyError> {
		Self::do_pre_dispatch(ext, info, len)
	}

	fn validate_unsigned(
		ext: &dyn Externalities,
		_call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		Self::do_validate(ext, info, len)
	}

	fn post_dispatch(
		_pre: Option<Self::Pre>,
		ext: &mut dyn Externalities,
		info: &DispatchInfo,
		post_info: &PostDispatchInfo,
		_len: usize,
		_result: &DispatchResult,
	) -> Result<(), ApplyError> {
		let unspent = post_info.calc_unspent(info);
		if unspent.any_gt(stf_weights::Weight::zero()) {
			BlockWeight::mutate(ext, |current_weight| {
				current_weight.reduce(unspent, info.class);
			})?;
		}
		Ok(())
	}
}

impl<T: Config> Default for CheckWeight<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Config> core::fmt::Debug for CheckWeight<T> {
	#[cfg(feature = "std")]
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "CheckWeight")
	}

	#[cfg(not(feature = "std"))]
	fn fmt(&self, _: &mut core::fmt::Formatter) -> core::fmt::Result {
		Ok(())
	}
}
