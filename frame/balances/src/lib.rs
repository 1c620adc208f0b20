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

//! # Balances Module
//!
//! The Balances module provides functionality for handling accounts and balances of the native
//! token.
//!
//! ## Overview
//!
//! The free balance of an account is stored in the `data` field of the System module's
//! [`AccountInfo`](stf_system::AccountInfo). An account is kept alive by the Balances module, which
//! holds one provider reference on it, as long as its free balance is at least the
//! [`Config::ExistentialDeposit`]. A balance that would drop below it is burned as dust and the
//! account is reaped.
//!
//! ### Terminology
//!
//! - **Existential Deposit:** The minimum balance required to create or keep an account open.
//! - **Total Issuance:** The total number of units in existence in the system.
//! - **Reaping an account:** The act of removing an account by resetting its nonce. Happens after
//!   its total balance has become less than the Existential Deposit.
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! - `transfer_allow_death` - Transfer some liquid free balance to another account.
//! - `transfer_keep_alive` - Same as `transfer_allow_death`, but refuses to reap the sender.
//! - `force_set_balance` - Set the free balance of an account. Root only.
//!
//! Other modules use [`Pallet::withdraw`], [`Pallet::can_withdraw`] and
//! [`Pallet::deposit_into_existing`] to charge and refund fees.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use codec::{Compact, Decode, Encode, MaxEncodedLen};
use core::marker::PhantomData;
use scale_info::TypeInfo;
use stf_io::Externalities;
use stf_primitives::{
	ensure,
	traits::{DecodeCall, Get, GetDispatchInfo, StaticLookup},
	AccountId, Address, ArithmeticError, Balance, DecodeError, DispatchError, DispatchResult,
	DispatchResultWithPostInfo, StorageError,
};
use stf_system::{
	ensure_root, ensure_signed,
	storage::{StorageValue},
	storage_prefix, BuildGenesisConfig, Hooks, RuntimeOrigin, UnfilteredDispatchable,
};
use stf_weights::{DispatchClass, Weight};

#[cfg(test)]
mod tests;
pub mod weights;

pub use weights::WeightInfo;

/// Log target of the Balances module.
pub const LOG_TARGET: &str = "runtime::balances";

type System<T> = stf_system::Pallet<T>;

/// Balance data of an account, stored by the System module.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Default, Debug, MaxEncodedLen, TypeInfo)]
pub struct AccountData {
	/// Non-reserved part of the balance. This is the only balance that matters for most
	/// operations.
	pub free: Balance,
}

/// Configuration of the Balances module.
pub trait Config: stf_system::Config<AccountData = AccountData> {
	/// The overarching event type.
	type RuntimeEvent: From<Event> + Into<<Self as stf_system::Config>::RuntimeEvent>;

	/// The minimum amount required to keep an account open.
	type ExistentialDeposit: Get<Balance>;

	/// Weight information for extrinsics in this module.
	type WeightInfo: WeightInfo;
}

/// The Balances module.
pub struct Pallet<T>(PhantomData<T>);

/// Events of the Balances module.
#[derive(Clone, PartialEq, Eq, Debug, Encode, Decode, TypeInfo)]
pub enum Event {
	/// An account was created with some free balance.
	#[codec(index = 0)]
	Endowed { account: AccountId, free_balance: Balance },
	/// An account was removed whose balance was non-zero but below ExistentialDeposit,
	/// resulting in an outright loss.
	#[codec(index = 1)]
	DustLost { account: AccountId, amount: Balance },
	/// Transfer succeeded.
	#[codec(index = 2)]
	Transfer { from: AccountId, to: AccountId, amount: Balance },
	/// A balance was set by root.
	#[codec(index = 3)]
	BalanceSet { who: AccountId, free: Balance },
	/// Some amount was deposited (e.g. for transaction fees).
	#[codec(index = 7)]
	Deposit { who: AccountId, amount: Balance },
	/// Some amount was withdrawn from the account (e.g. for transaction fees).
	#[codec(index = 8)]
	Withdraw { who: AccountId, amount: Balance },
}

/// Errors of the Balances module.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Error<T> {
	/// Balance too low to send value.
	InsufficientBalance,
	/// Value too low to create account due to existential deposit.
	ExistentialDeposit,
	/// Transfer/payment would kill account.
	Expendability,
	#[doc(hidden)]
	__Ignore(PhantomData<T>, core::convert::Infallible),
}

impl<T: Config> From<Error<T>> for DispatchError {
	fn from(e: Error<T>) -> Self {
		let (index, message) = match e {
			Error::InsufficientBalance => (2, "InsufficientBalance"),
			Error::ExistentialDeposit => (3, "ExistentialDeposit"),
			Error::Expendability => (4, "Expendability"),
			Error::__Ignore(_, never) => match never {},
		};
		stf_system::module_error::<T, Pallet<T>>(index, message)
	}
}

storage_prefix!(pub TotalIssuancePrefix, "Balances", "TotalIssuance");

/// The total units issued in the system.
pub type TotalIssuance = StorageValue<TotalIssuancePrefix, Balance>;

/// Calls of the Balances module.
#[derive(Clone, PartialEq, Eq, Debug, Encode)]
#[codec(encode_bound())]
#[allow(non_camel_case_types)]
pub enum Call<T: Config> {
	/// Transfer some liquid free balance to another account.
	///
	/// If the sender's account is below the existential deposit as a result
	/// of the transfer, the account will be reaped.
	#[codec(index = 0)]
	transfer_allow_death {
		dest: Address,
		#[codec(compact)]
		value: Balance,
	},
	/// Same as the `transfer_allow_death` call, but with a check that the transfer will not
	/// kill the origin account.
	#[codec(index = 3)]
	transfer_keep_alive {
		dest: Address,
		#[codec(compact)]
		value: Balance,
	},
	/// Set the regular balance of a given account.
	///
	/// The dispatch origin for this call is `root`.
	#[codec(index = 8)]
	force_set_balance {
		who: Address,
		#[codec(compact)]
		new_free: Balance,
	},
	#[doc(hidden)]
	#[codec(skip)]
	__Ignore(PhantomData<T>, core::convert::Infallible),
}

impl<T: Config> DecodeCall for Call<T> {
	fn decode_call_with_depth(input: &mut &[u8], _depth: u32) -> Result<Self, DecodeError> {
		let index = u8::decode(input)?;
		Ok(match index {
			0 => Call::transfer_allow_death {
				dest: Decode::decode(input)?,
				value: Compact::<Balance>::decode(input)?.0,
			},
			3 => Call::transfer_keep_alive {
				dest: Decode::decode(input)?,
				value: Compact::<Balance>::decode(input)?.0,
			},
			8 => Call::force_set_balance {
				who: Decode::decode(input)?,
				new_free: Compact::<Balance>::decode(input)?.0,
			},
			other => return Err(DecodeError::UnknownFunction(other)),
		})
	}
}

impl<T: Config> GetDispatchInfo for Call<T> {
	fn base_weight(&self) -> Weight {
		match self {
			Call::transfer_allow_death { .. } => T::WeightInfo::transfer_allow_death(),
			Call::transfer_keep_alive { .. } => T::WeightInfo::transfer_keep_alive(),
			Call::force_set_balance { .. } => T::WeightInfo::force_set_balance(),
			Call::__Ignore(_, never) => match *never {},
		}
	}

	fn classify_dispatch(&self, _base: Weight) -> DispatchClass {
		DispatchClass::Normal
	}
}

impl<T: Config> UnfilteredDispatchable for Call<T> {
	type RuntimeOrigin = RuntimeOrigin;

	fn dispatch_bypass_filter(
		self,
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
	) -> DispatchResultWithPostInfo {
		match self {
			Call::transfer_allow_death { dest, value } =>
				Pallet::<T>::transfer_allow_death(origin, ext, dest, value),
			Call::transfer_keep_alive { dest, value } =>
				Pallet::<T>::transfer_keep_alive(origin, ext, dest, value),
			Call::force_set_balance { who, new_free } =>
				Pallet::<T>::force_set_balance(origin, ext, who, new_free),
			Call::__Ignore(_, never) => match never {},
		}
	}
}

// Dispatchable functions.
impl<T: Config> Pallet<T> {
	/// Transfer some liquid free balance to another account.
	///
	/// The dispatch origin for this call must be `Signed` by the transactor.
	pub fn transfer_allow_death(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		dest: Address,
		value: Balance,
	) -> DispatchResultWithPostInfo {
		let source = ensure_signed(origin)?;
		let dest = T::Lookup::lookup(dest)?;
		Self::do_transfer(ext, &source, &dest, value, false)?;
		Ok(().into())
	}

	/// Same as the [`transfer_allow_death`](Self::transfer_allow_death) call, but with a check
	/// that the transfer will not kill the origin account.
	pub fn transfer_keep_alive(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		dest: Address,
		value: Balance,
	) -> DispatchResultWithPostInfo {
		let source = ensure_signed(origin)?;
		let dest = T::Lookup::lookup(dest)?;
		Self::do_transfer(ext, &source, &dest, value, true)?;
		Ok(().into())
	}

	/// Set the regular balance of a given account.
	///
	/// A balance below the existential deposit reaps the account.
	pub fn force_set_balance(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		who: Address,
		new_free: Balance,
	) -> DispatchResultWithPostInfo {
		ensure_root(origin)?;
		let who = T::Lookup::lookup(who)?;
		let old_free = Self::free_balance(&*ext, &who)?;
		let dust = Self::write_free(ext, &who, new_free)?;
		let new_free = new_free.saturating_sub(dust);

		TotalIssuance::mutate(ext, |issuance| {
			if new_free > old_free {
				*issuance = issuance.saturating_add(new_free - old_free);
			} else {
				*issuance = issuance.saturating_sub(old_free - new_free);
			}
		})?;

		Self::deposit_event(ext, Event::BalanceSet { who, free: new_free })?;
		Ok(().into())
	}
}

impl<T: Config> Hooks for Pallet<T> {}

impl<T: Config> Pallet<T> {
	fn deposit_event(ext: &mut dyn Externalities, event: Event) -> Result<(), StorageError> {
		let event: <T as Config>::RuntimeEvent = event.into();
		System::<T>::deposit_event(ext, event)
	}

	/// Get the free balance of an account.
	pub fn free_balance(ext: &dyn Externalities, who: &AccountId) -> Result<Balance, StorageError> {
		Ok(System::<T>::account(ext, who)?.data.free)
	}

	/// The total units issued in the system.
	pub fn total_issuance(ext: &dyn Externalities) -> Result<Balance, StorageError> {
		TotalIssuance::get(ext)
	}

	/// Transfer `value` from `source` to `dest`.
	///
	/// A zero value or a transfer to self is a no-op. With `keep_alive` the transfer fails rather
	/// than reaping `source`.
	pub fn do_transfer(
		ext: &mut dyn Externalities,
		source: &AccountId,
		dest: &AccountId,
		value: Balance,
		keep_alive: bool,
	) -> DispatchResult {
		if value == 0 || source == dest {
			return Ok(())
		}

		let new_source = Self::free_balance(&*ext, source)?
			.checked_sub(value)
			.ok_or(Error::<T>::InsufficientBalance)?;
		ensure!(!keep_alive || new_source >= T::ExistentialDeposit::get(), Error::<T>::Expendability);

		let new_dest =
			Self::free_balance(&*ext, dest)?.checked_add(value).ok_or(ArithmeticError::Overflow)?;
		ensure!(new_dest >= T::ExistentialDeposit::get(), Error::<T>::ExistentialDeposit);

		Self::write_free(ext, dest, new_dest)?;
		let dust = Self::write_free(ext, source, new_source)?;
		if dust > 0 {
			TotalIssuance::mutate(ext, |issuance| *issuance = issuance.saturating_sub(dust))?;
		}

		log::trace!(target: LOG_TARGET, "transfer {:?} -> {:?}: {}", source, dest, value);
		Self::deposit_event(ext, Event::Transfer { from: *source, to: *dest, amount: value })?;
		Ok(())
	}

	/// Whether `amount` can be withdrawn from `who` without reaping it.
	pub fn can_withdraw(
		ext: &dyn Externalities,
		who: &AccountId,
		amount: Balance,
	) -> Result<bool, StorageError> {
		Ok(Self::free_balance(ext, who)?
			.checked_sub(amount)
			.map_or(false, |new_free| new_free >= T::ExistentialDeposit::get()))
	}

	/// Withdraw and burn `amount` from `who`, keeping the account alive.
	pub fn withdraw(ext: &mut dyn Externalities, who: &AccountId, amount: Balance) -> DispatchResult {
		if amount == 0 {
			return Ok(())
		}
		ensure!(Self::can_withdraw(&*ext, who, amount)?, Error::<T>::InsufficientBalance);
		let new_free = Self::free_balance(&*ext, who)?.saturating_sub(amount);
		Self::write_free(ext, who, new_free)?;
		TotalIssuance::mutate(ext, |issuance| *issuance = issuance.saturating_sub(amount))?;
		Self::deposit_event(ext, Event::Withdraw { who: *who, amount })?;
		Ok(())
	}

	/// Mint `amount` into the account `who`, which must already exist.
	///
	/// Returns the amount actually deposited, zero for a dead account.
	pub fn deposit_into_existing(
		ext: &mut dyn Externalities,
		who: &AccountId,
		amount: Balance,
	) -> Result<Balance, DispatchError> {
		let free = Self::free_balance(&*ext, who)?;
		if amount == 0 || free == 0 {
			return Ok(0)
		}
		let new_free = free.checked_add(amount).ok_or(ArithmeticError::Overflow)?;
		Self::write_free(ext, who, new_free)?;
		TotalIssuance::mutate(ext, |issuance| *issuance = issuance.saturating_add(amount))?;
		Self::deposit_event(ext, Event::Deposit { who: *who, amount })?;
		Ok(amount)
	}

	/// Write the free balance of `who`, taking or releasing the provider reference this module
	/// holds on the account.
	///
	/// A balance below the existential deposit is written as zero; the difference is returned as
	/// dust and the caller is responsible for the total issuance.
	fn write_free(
		ext: &mut dyn Externalities,
		who: &AccountId,
		free: Balance,
	) -> Result<Balance, DispatchError> {
		let (free, dust) = if free < T::ExistentialDeposit::get() { (0, free) } else { (free, 0) };
		let existed = Self::free_balance(&*ext, who)? > 0;

		match (existed, free > 0) {
			(false, true) => {
				System::<T>::inc_providers(ext, who)?;
				Self::set_account_free(ext, who, free)?;
				Self::deposit_event(ext, Event::Endowed { account: *who, free_balance: free })?;
			},
			(true, false) => {
				Self::set_account_free(ext, who, 0)?;
				System::<T>::dec_providers(ext, who)?;
				if dust > 0 {
					Self::deposit_event(ext, Event::DustLost { account: *who, amount: dust })?;
				}
			},
			(true, true) => Self::set_account_free(ext, who, free)?,
			(false, false) => {},
		}
		Ok(dust)
	}

	fn set_account_free(
		ext: &mut dyn Externalities,
		who: &AccountId,
		free: Balance,
	) -> Result<(), StorageError> {
		stf_system::Account::<T>::mutate(ext, who, |account| account.data.free = free)
	}
}

/// Genesis configuration of the Balances module.
pub struct GenesisConfig<T> {
	/// The initial free balances.
	pub balances: Vec<(AccountId, Balance)>,
	#[doc(hidden)]
	pub _config: PhantomData<T>,
}

impl<T> Default for GenesisConfig<T> {
	fn default() -> Self {
		Self { balances: Vec::new(), _config: PhantomData }
	}
}

impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
	fn build(&self, ext: &mut dyn Externalities) -> Result<(), StorageError> {
		let mut total = TotalIssuance::get(&*ext)?;
		for (who, free) in &self.balances {
			if *free < T::ExistentialDeposit::get() {
				log::warn!(target: LOG_TARGET, "genesis balance of {:?} below existential deposit", who);
				continue
			}
			System::<T>::inc_providers(ext, who)?;
			Pallet::<T>::set_account_free(ext, who, *free)?;
			total = total.saturating_add(*free);
		}
		TotalIssuance::put(ext, total);
		Ok(())
	}
}
