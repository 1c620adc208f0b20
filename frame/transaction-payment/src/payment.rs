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

//! Traits and default implementation for paying transaction fees.

use crate::{Config, LOG_TARGET};
use core::marker::PhantomData;
use stf_io::Externalities;
use stf_primitives::{transaction_validity::InvalidTransaction, AccountId, ApplyError, Balance};
use stf_weights::{DispatchInfo, PostDispatchInfo};

/// Handle withdrawing, refunding and depositing of transaction fees.
pub trait OnChargeTransaction<T: Config> {
	/// What `withdraw_fee` hands over to `correct_and_deposit_fee`.
	type LiquidityInfo: Default;

	/// Before the transaction is executed the payment of the transaction fees
	/// need to be secured.
	///
	/// Note: The `fee` already includes the `tip`.
	fn withdraw_fee(
		ext: &mut dyn Externalities,
		who: &AccountId,
		call: &T::RuntimeCall,
		dispatch_info: &DispatchInfo,
		fee: Balance,
		tip: Balance,
	) -> Result<Self::LiquidityInfo, ApplyError>;

	/// Check if the predicted fee from the transaction origin can be withdrawn.
	///
	/// Note: The `fee` already includes the `tip`.
	fn can_withdraw_fee(
		ext: &dyn Externalities,
		who: &AccountId,
		call: &T::RuntimeCall,
		dispatch_info: &DispatchInfo,
		fee: Balance,
		tip: Balance,
	) -> Result<(), ApplyError>;

	/// After the transaction was executed the actual fee can be calculated.
	/// This function should refund any overpaid fees and optionally deposit
	/// the corrected amount.
	///
	/// Note: The `fee` already includes the `tip`.
	fn correct_and_deposit_fee(
		ext: &mut dyn Externalities,
		who: &AccountId,
		dispatch_info: &DispatchInfo,
		post_info: &PostDispatchInfo,
		corrected_fee: Balance,
		tip: Balance,
		already_withdrawn: Self::LiquidityInfo,
	) -> Result<(), ApplyError>;
}

/// Implements transaction payment on top of the Balances module.
///
/// The withdrawn fee is burned; the overpaid part is minted back to the payer after dispatch.
pub struct BalancesAdapter<T>(PhantomData<T>);

impl<T> OnChargeTransaction<T> for BalancesAdapter<T>
where
	T: Config + stf_balances::Config,
{
	/// The amount withdrawn, if any.
	type LiquidityInfo = Option<Balance>;

	fn withdraw_fee(
		ext: &mut dyn Externalities,
		who: &AccountId,
		call: &T::RuntimeCall,
		dispatch_info: &DispatchInfo,
		fee: Balance,
		tip: Balance,
	) -> Result<Self::LiquidityInfo, ApplyError> {
		if fee == 0 {
			return Ok(None)
		}
		Self::can_withdraw_fee(&*ext, who, call, dispatch_info, fee, tip)?;
		match stf_balances::Pallet::<T>::withdraw(ext, who, fee) {
			Ok(()) => Ok(Some(fee)),
			Err(e) => {
				log::debug!(target: LOG_TARGET, "fee withdrawal from {:?} failed: {:?}", who, e);
				Err(InvalidTransaction::Payment.into())
			},
		}
	}

	fn can_withdraw_fee(
		ext: &dyn Externalities,
		who: &AccountId,
		_call: &T::RuntimeCall,
		_dispatch_info: &DispatchInfo,
		fee: Balance,
		_tip: Balance,
	) -> Result<(), ApplyError> {
		if fee == 0 {
			return Ok(())
		}
		if stf_balances::Pallet::<T>::can_withdraw(ext, who, fee)? {
			Ok(())
		} else {
			Err(InvalidTransaction::Payment.into())
		}
	}

	fn correct_and_deposit_fee(
		ext: &mut dyn Externalities,
		who: &AccountId,
		_dispatch_info: &DispatchInfo,
		_post_info: &PostDispatchInfo,
		corrected_fee: Balance,
		_tip: Balance,
		already_withdrawn: Self::LiquidityInfo,
	) -> Result<(), ApplyError> {
		let Some(paid) = already_withdrawn else { return Ok(()) };
		// Calculate how much refund we should return.
		let refund_amount = paid.saturating_sub(corrected_fee);
		if refund_amount == 0 {
			return Ok(())
		}
		// A reaped payer forfeits the refund.
		stf_balances::Pallet::<T>::deposit_into_existing(ext, who, refund_amount).map_err(|e| {
			log::debug!(target: LOG_TARGET, "fee refund to {:?} failed: {:?}", who, e);
			ApplyError::from(InvalidTransaction::Payment)
		})?;
		Ok(())
	}
}
