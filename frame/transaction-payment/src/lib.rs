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

//! # Transaction Payment Module
//!
//! This module provides the basic logic needed to pay the absolute minimum amount needed for a
//! transaction to be included. This includes:
//!   - _base fee_: This is the minimum amount a user pays for a transaction. It is declared
//!     as a base _weight_ in the runtime and converted to a fee using `WeightToFee`.
//!   - _weight fee_: A fee proportional to amount of weight a transaction consumes.
//!   - _length fee_: A fee proportional to the encoded length of the transaction.
//!   - _tip_: An optional tip. Tip increases the priority of the transaction, giving it a higher
//!     chance to be included by the transaction queue.
//!
//! The base fee and weight fee are both converted with [`Config::WeightToFee`], the length fee
//! with [`Config::LengthToFee`]. Unlike the fee multiplier of production chains the final fee is a
//! plain sum:
//!
//! ```ignore
//! inclusion_fee = base_fee + length_fee + weight_fee;
//! final_fee = inclusion_fee + tip;
//! ```
//!
//! A call annotated with `Pays::No` only pays its tip.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use codec::{Decode, Encode};
use core::marker::PhantomData;
use scale_info::TypeInfo;
use stf_io::Externalities;
use stf_primitives::{
	traits::{Get, SignedExtension},
	transaction_validity::{TransactionPriority, ValidTransaction},
	AccountId, ApplyError, Balance, DispatchResult, StorageError,
};
use stf_system::Hooks;
use stf_weights::{DispatchClass, DispatchInfo, Pays, PostDispatchInfo, Weight};

#[cfg(test)]
mod mock;

mod payment;

pub use payment::*;

/// Log target of the Transaction Payment module.
pub const LOG_TARGET: &str = "runtime::transaction-payment";

/// A trait that allows the weight of a transaction to be turned into a fee.
pub trait WeightToFee {
	/// Calculates the fee from the passed `weight`.
	fn weight_to_fee(weight: &Weight) -> Balance;
}

/// Implementor of [`WeightToFee`] that maps one unit of `ref_time` to one unit of balance.
pub struct IdentityFee;

impl WeightToFee for IdentityFee {
	fn weight_to_fee(weight: &Weight) -> Balance {
		Balance::from(weight.ref_time())
	}
}

/// Implementor of [`WeightToFee`] that uses a constant multiplier.
///
/// Used as [`Config::LengthToFee`] the length in bytes is carried in `ref_time`.
pub struct ConstantMultiplier<M>(PhantomData<M>);

impl<M: Get<Balance>> WeightToFee for ConstantMultiplier<M> {
	fn weight_to_fee(weight: &Weight) -> Balance {
		Balance::from(weight.ref_time()).saturating_mul(M::get())
	}
}

/// Configuration of the Transaction Payment module.
pub trait Config: stf_system::Config {
	/// The overarching event type.
	type RuntimeEvent: From<Event> + Into<<Self as stf_system::Config>::RuntimeEvent>;

	/// Handler for withdrawing, refunding and depositing the transaction fee.
	type OnChargeTransaction: OnChargeTransaction<Self>;

	/// Convert a weight value into a deductible fee.
	type WeightToFee: WeightToFee;

	/// Convert a length value into a deductible fee.
	type LengthToFee: WeightToFee;

	/// A fee multiplier for `Operational` extrinsics to compute "virtual tip" to boost their
	/// `priority`.
	///
	/// This value is multiplied by the `final_fee` to obtain a "virtual tip" that is later
	/// added to a tip component in regular `priority` calculations.
	/// It means that a `Normal` transaction can front-run a similarly-sized `Operational`
	/// extrinsic (with no tip), by including a tip value greater than the virtual tip.
	type OperationalFeeMultiplier: Get<u8>;
}

/// Events of the Transaction Payment module.
#[derive(Clone, PartialEq, Eq, Debug, Encode, Decode, TypeInfo)]
pub enum Event {
	/// A transaction fee `actual_fee`, of which `tip` was added to the minimum inclusion fee,
	/// has been paid by `who`.
	#[codec(index = 0)]
	TransactionFeePaid { who: AccountId, actual_fee: Balance, tip: Balance },
}

/// The Transaction Payment module.
pub struct Pallet<T>(PhantomData<T>);

impl<T: Config> Hooks for Pallet<T> {}

impl<T: Config> Pallet<T> {
	/// Compute the final fee value for a particular transaction.
	pub fn compute_fee(len: u32, info: &DispatchInfo, tip: Balance) -> Balance {
		Self::compute_fee_raw(len, info.weight, tip, info.pays_fee, info.class)
	}

	/// Compute the actual post dispatch fee for a particular transaction.
	///
	/// Identical to `compute_fee` with the only difference that the post dispatch corrected
	/// weight is used for the weight fee calculation.
	pub fn compute_actual_fee(
		len: u32,
		info: &DispatchInfo,
		post_info: &PostDispatchInfo,
		tip: Balance,
	) -> Balance {
		Self::compute_fee_raw(
			len,
			post_info.calc_actual_weight(info),
			tip,
			post_info.pays_fee(info),
			info.class,
		)
	}

	fn compute_fee_raw(
		len: u32,
		weight: Weight,
		tip: Balance,
		pays_fee: Pays,
		class: DispatchClass,
	) -> Balance {
		if pays_fee == Pays::Yes {
			let base_fee =
				T::WeightToFee::weight_to_fee(&T::BlockWeights::get().get(class).base_extrinsic);
			let len_fee = T::LengthToFee::weight_to_fee(&Weight::from_parts(len as u64, 0));
			let weight_fee = T::WeightToFee::weight_to_fee(&weight);
			base_fee.saturating_add(len_fee).saturating_add(weight_fee).saturating_add(tip)
		} else {
			tip
		}
	}

	/// Get the priority of a transaction with the given `info`, `len`, `tip` and `final_fee`.
	///
	/// The tip is scaled by the maximum number of transactions of this size that fit in a block,
	/// so that a tip per unit of consumed resource is what orders transactions. `Operational`
	/// transactions additionally receive a virtual tip of
	/// `final_fee * OperationalFeeMultiplier`.
	pub fn get_priority(
		info: &DispatchInfo,
		len: usize,
		tip: Balance,
		final_fee: Balance,
	) -> TransactionPriority {
		// Calculate how many such extrinsics we could fit into an empty block and take the
		// limiting factor.
		let max_block_weight = T::BlockWeights::get().max_block.ref_time();
		let max_block_length = *T::BlockLength::get().max.get(info.class) as u64;

		// bounded_weight is used as a divisor later so we keep it non-zero.
		let bounded_weight = info.weight.ref_time().clamp(1, max_block_weight.max(1));
		let bounded_length = (len as u64).clamp(1, max_block_length.max(1));

		let max_tx_per_block_weight = max_block_weight / bounded_weight;
		let max_tx_per_block_length = max_block_length / bounded_length;
		// Given our current knowledge this value is going to be in a reasonable range - i.e.
		// less than 10^9 (2^30), so multiplying by the `tip` value is unlikely to overflow the
		// balance type. We still use saturating ops obviously, but the point is to end up with some
		// `priority` distribution instead of having all transactions saturate the priority.
		let max_tx_per_block = Balance::from(max_tx_per_block_length.min(max_tx_per_block_weight));
		let max_reward = |val: Balance| val.saturating_mul(max_tx_per_block);

		// To distribute no-tip transactions a little bit, we increase the tip value by one.
		// This means that given two transactions without a tip, smaller one will be preferred.
		let tip = tip.saturating_add(1);
		let scaled_tip = max_reward(tip);

		let priority = match info.class {
			DispatchClass::Normal => scaled_tip,
			DispatchClass::Mandatory => {
				// Mandatory extrinsics should be prohibited (e.g. by the [`CheckWeight`]
				// extensions), but just to be safe let's return the same priority as `Normal` here.
				scaled_tip
			},
			DispatchClass::Operational => {
				let fee_multiplier = Balance::from(T::OperationalFeeMultiplier::get());
				let virtual_tip = final_fee.saturating_mul(fee_multiplier);
				let scaled_virtual_tip = max_reward(virtual_tip);

				scaled_tip.saturating_add(scaled_virtual_tip)
			},
		};
		TransactionPriority::try_from(priority).unwrap_or(TransactionPriority::MAX)
	}

	fn deposit_event(ext: &mut dyn Externalities, event: Event) -> Result<(), StorageError> {
		let event: <T as Config>::RuntimeEvent = event.into();
		stf_system::Pallet::<T>::deposit_event(ext, event)
	}
}

/// Require the transactor pay for themselves and maybe include a tip to gain additional priority
/// in the queue.
///
/// # Transaction Validity
///
/// This extension sets the `priority` field of `TransactionValidity` depending on the amount
/// of tip being paid per weight unit.
///
/// Operational transactions will receive an additional priority bump, so that they are normally
/// considered before regular transactions.
#[derive(Encode, Decode, Clone, Eq, PartialEq, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub struct ChargeTransactionPayment<T: Config>(#[codec(compact)] Balance, PhantomData<T>);

impl<T: Config> ChargeTransactionPayment<T> {
	/// utility constructor. Used only in client/factory code.
	pub fn from(fee: Balance) -> Self {
		Self(fee, PhantomData)
	}

	/// Returns the tip as being chosen by the transaction sender.
	pub fn tip(&self) -> Balance {
		self.0
	}

	fn withdraw_fee(
		&self,
		ext: &mut dyn Externalities,
		who: &AccountId,
		call: &T::RuntimeCall,
		info: &DispatchInfo,
		len: usize,
	) -> Result<
		(Balance, <T::OnChargeTransaction as OnChargeTransaction<T>>::LiquidityInfo),
		ApplyError,
	> {
		let tip = self.0;
		let fee = Pallet::<T>::compute_fee(len as u32, info, tip);

		<T::OnChargeTransaction as OnChargeTransaction<T>>::withdraw_fee(
			ext, who, call, info, fee, tip,
		)
		.map(|i| (fee, i))
	}

	fn can_withdraw_fee(
		&self,
		ext: &dyn Externalities,
		who: &AccountId,
		call: &T::RuntimeCall,
		info: &DispatchInfo,
		len: usize,
	) -> Result<Balance, ApplyError> {
		let tip = self.0;
		let fee = Pallet::<T>::compute_fee(len as u32, info, tip);

		<T::OnChargeTransaction as OnChargeTransaction<T>>::can_withdraw_fee(
			ext, who, call, info, fee, tip,
		)?;
		Ok(fee)
	}
}

impl<T: Config> Default for ChargeTransactionPayment<T> {
	fn default() -> Self {
		Self::from(0)
	}
}

impl<T: Config> core::fmt::Debug for ChargeTransactionPayment<T> {
	#[cfg(feature = "std")]
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "ChargeTransactionPayment<{:?}>", self.0)
	}
	#[cfg(not(feature = "std"))]
	fn fmt(&self, _: &mut core::fmt::Formatter) -> core::fmt::Result {
		Ok(())
	}
}

impl<T: Config> SignedExtension for ChargeTransactionPayment<T> {
	const IDENTIFIER: &'static str = "ChargeTransactionPayment";
	type AccountId = AccountId;
	type Call = T::RuntimeCall;
	type AdditionalSigned = ();
	type Pre = (
		// tip
		Balance,
		// who paid the fee
		AccountId,
		// imbalance resulting from withdrawing the fee
		<T::OnChargeTransaction as OnChargeTransaction<T>>::LiquidityInfo,
	);

	fn additional_signed(&self, _: &dyn Externalities) -> Result<(), ApplyError> {
		Ok(())
	}

	fn validate(
		&self,
		ext: &dyn Externalities,
		who: &AccountId,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		let final_fee = self.can_withdraw_fee(ext, who, call, info, len)?;
		let tip = self.0;
		Ok(ValidTransaction {
			priority: Pallet::<T>::get_priority(info, len, tip, final_fee),
			..Default::default()
		})
	}

	fn pre_dispatch(
		self,
		ext: &mut dyn Externalities,
		who: &AccountId,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<Self::Pre, ApplyError> {
		let (_fee, imbalance) = self.withdraw_fee(ext, who, call, info, len)?;
		Ok((self.0, *who, imbalance))
	}

	fn post_dispatch(
		maybe_pre: Option<Self::Pre>,
		ext: &mut dyn Externalities,
		info: &DispatchInfo,
		post_info: &PostDispatchInfo,
		len: usize,
		_result: &DispatchResult,
	) -> Result<(), ApplyError> {
		if let Some((tip, who, imbalance)) = maybe_pre {
			let actual_fee = Pallet::<T>::compute_actual_fee(len as u32, info, post_info, tip);
			T::OnChargeTransaction::correct_and_deposit_fee(
				ext, &who, info, post_info, actual_fee, tip, imbalance,
			)?;
			Pallet::<T>::deposit_event(ext, Event::TransactionFeePaid { who, actual_fee, tip })?;
		}
		Ok(())
	}
}
