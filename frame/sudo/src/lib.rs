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

//! # Sudo Module
//!
//! A module to provide a way to execute privileged runtime calls using a specified sudo ("superuser
//! do") account.
//!
//! ## Overview
//!
//! In Substrate-style blockchains, modules may contain dispatchable calls that can only be called
//! at the system level of the chain (i.e. dispatchables that require a `Root` origin). Setting a
//! privileged account, called the _sudo key_, allows you to make such calls as an extrinsic.
//!
//! Only one account can be the sudo key at a time. The current sudo key can transfer the sudo
//! privileges to another account with [`Call::set_key`].
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! Only the sudo key can call the dispatchable functions from the Sudo module.
//!
//! * `sudo` - Make a `Root` call to a dispatchable function.
//! * `sudo_unchecked_weight` - Same as `sudo`, with a weight supplied by the sudo key.
//! * `set_key` - Assign a new account to be the sudo key.
//! * `sudo_as` - Make a `Signed` call from the given account.
//!
//! ## Low Level / Implementation Details
//!
//! The caller of these dispatchables must be signed by the sudo key. A caller does not pay any
//! fees to dispatch a call; any other caller gets a [`Error::RequireSudo`] error.
//!
//! Once the origin is verified the wrapped call is dispatched through
//! [`UnfilteredDispatchable`] inside its own storage layer, so a failing call leaves no trace
//! besides the event reporting its result.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::boxed::Box;
use codec::{Decode, Encode};
use core::{fmt::Debug, marker::PhantomData};
use scale_info::TypeInfo;
use stf_io::{with_storage_layer, Externalities};
use stf_primitives::{
	ensure,
	traits::{decode_nested_call, DecodeCall, GetDispatchInfo, StaticLookup},
	AccountId, Address, DecodeError, DispatchError, DispatchResult, DispatchResultWithPostInfo,
	StorageError,
};
use stf_system::{
	ensure_signed, storage::StorageValue, storage_prefix, BuildGenesisConfig, Hooks, RawOrigin,
	RuntimeOrigin, UnfilteredDispatchable,
};
use stf_weights::{DispatchClass, Pays, Weight};

#[cfg(test)]
mod mock;
pub mod weights;

pub use weights::WeightInfo;

/// Log target of the Sudo module.
pub const LOG_TARGET: &str = "runtime::sudo";

type System<T> = stf_system::Pallet<T>;

/// Configuration of the Sudo module.
pub trait Config: stf_system::Config {
	/// The overarching event type.
	type RuntimeEvent: From<Event> + Into<<Self as stf_system::Config>::RuntimeEvent>;

	/// A sudo-able call.
	type RuntimeCall: UnfilteredDispatchable<RuntimeOrigin = RuntimeOrigin>
		+ GetDispatchInfo
		+ DecodeCall
		+ Encode
		+ Clone
		+ Debug
		+ Eq;

	/// Type representing the weight of this module.
	type WeightInfo: WeightInfo;
}

/// The Sudo module.
pub struct Pallet<T>(PhantomData<T>);

/// Events of the Sudo module.
#[derive(Clone, PartialEq, Eq, Debug, Encode, Decode, TypeInfo)]
pub enum Event {
	/// A sudo call just took place.
	#[codec(index = 0)]
	Sudid {
		/// The result of the call made by the sudo user.
		sudo_result: DispatchResult,
	},
	/// The sudo key has been updated.
	#[codec(index = 1)]
	KeyChanged {
		/// The old sudo key if one was previously set.
		old_sudoer: Option<AccountId>,
	},
	/// A [sudo_as](Pallet::sudo_as) call just took place.
	#[codec(index = 2)]
	SudoAsDone {
		/// The result of the call made by the sudo user.
		sudo_result: DispatchResult,
	},
}

/// Error for the Sudo module.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Error<T> {
	/// Sender must be the Sudo account.
	RequireSudo,
	#[doc(hidden)]
	__Ignore(PhantomData<T>, core::convert::Infallible),
}

impl<T: Config> From<Error<T>> for DispatchError {
	fn from(e: Error<T>) -> Self {
		match e {
			Error::RequireSudo => stf_system::module_error::<T, Pallet<T>>(0, "RequireSudo"),
			Error::__Ignore(_, never) => match never {},
		}
	}
}

storage_prefix!(pub KeyPrefix, "Sudo", "Key");

/// The `AccountId` of the sudo key.
pub type Key = StorageValue<KeyPrefix, AccountId>;

/// Calls of the Sudo module.
#[derive(Clone, PartialEq, Eq, Debug, Encode)]
#[codec(encode_bound())]
#[allow(non_camel_case_types)]
pub enum Call<T: Config> {
	/// Authenticates the sudo key and dispatches a function call with `Root` origin.
	#[codec(index = 0)]
	sudo { call: Box<<T as Config>::RuntimeCall> },
	/// Authenticates the sudo key and dispatches a function call with `Root` origin.
	/// This function does not check the weight of the call, and instead allows the
	/// Sudo user to specify the weight of the call.
	#[codec(index = 1)]
	sudo_unchecked_weight { call: Box<<T as Config>::RuntimeCall>, weight: Weight },
	/// Authenticates the current sudo key and sets the given account (`new`) as the new sudo
	/// key.
	#[codec(index = 2)]
	set_key { new: Address },
	/// Authenticates the sudo key and dispatches a function call with `Signed` origin from
	/// a given account.
	#[codec(index = 3)]
	sudo_as { who: Address, call: Box<<T as Config>::RuntimeCall> },
	#[doc(hidden)]
	#[codec(skip)]
	__Ignore(PhantomData<T>, core::convert::Infallible),
}

impl<T: Config> DecodeCall for Call<T> {
	fn decode_call_with_depth(input: &mut &[u8], depth: u32) -> Result<Self, DecodeError> {
		let index = u8::decode(input)?;
		Ok(match index {
			0 => Call::sudo { call: Box::new(decode_nested_call(input, depth)?) },
			1 => Call::sudo_unchecked_weight {
				call: Box::new(decode_nested_call(input, depth)?),
				weight: Decode::decode(input)?,
			},
			2 => Call::set_key { new: Decode::decode(input)? },
			3 => Call::sudo_as {
				who: Decode::decode(input)?,
				call: Box::new(decode_nested_call(input, depth)?),
			},
			other => return Err(DecodeError::UnknownFunction(other)),
		})
	}
}

impl<T: Config> GetDispatchInfo for Call<T> {
	fn base_weight(&self) -> Weight {
		match self {
			Call::sudo { call } =>
				T::WeightInfo::sudo().saturating_add(call.get_dispatch_info().weight),
			Call::sudo_unchecked_weight { weight, .. } => *weight,
			Call::set_key { .. } => T::WeightInfo::set_key(),
			Call::sudo_as { call, .. } =>
				T::WeightInfo::sudo_as().saturating_add(call.get_dispatch_info().weight),
			Call::__Ignore(_, never) => match *never {},
		}
	}

	fn classify_dispatch(&self, _base: Weight) -> DispatchClass {
		match self {
			Call::sudo { call } |
			Call::sudo_unchecked_weight { call, .. } |
			Call::sudo_as { call, .. } => call.get_dispatch_info().class,
			_ => DispatchClass::Normal,
		}
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
			Call::sudo { call } => Pallet::<T>::sudo(origin, ext, call),
			Call::sudo_unchecked_weight { call, weight } =>
				Pallet::<T>::sudo_unchecked_weight(origin, ext, call, weight),
			Call::set_key { new } => Pallet::<T>::set_key(origin, ext, new),
			Call::sudo_as { who, call } => Pallet::<T>::sudo_as(origin, ext, who, call),
			Call::__Ignore(_, never) => match never {},
		}
	}
}

// Dispatchable functions.
impl<T: Config> Pallet<T> {
	/// Authenticates the sudo key and dispatches a function call with `Root` origin.
	///
	/// The dispatch origin for this call must be _Signed_.
	pub fn sudo(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		call: Box<<T as Config>::RuntimeCall>,
	) -> DispatchResultWithPostInfo {
		// This is a public call, so we ensure that the origin is some signed account.
		Self::ensure_sudo(&*ext, origin)?;

		let res = Self::dispatch_as(ext, *call, RawOrigin::Root);
		Self::deposit_event(ext, Event::Sudid { sudo_result: res })?;
		// Sudo user does not pay a fee.
		Ok(Pays::No.into())
	}

	/// Authenticates the sudo key and dispatches a function call with `Root` origin, accounting
	/// for the weight supplied by the caller rather than the call's own.
	///
	/// The dispatch origin for this call must be _Signed_.
	pub fn sudo_unchecked_weight(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		call: Box<<T as Config>::RuntimeCall>,
		weight: Weight,
	) -> DispatchResultWithPostInfo {
		Self::ensure_sudo(&*ext, origin)?;
		// We don't check the weight witness since it is a root call.
		let _ = weight;

		let res = Self::dispatch_as(ext, *call, RawOrigin::Root);
		Self::deposit_event(ext, Event::Sudid { sudo_result: res })?;
		Ok(Pays::No.into())
	}

	/// Authenticates the current sudo key and sets the given account (`new`) as the new sudo
	/// key.
	///
	/// The dispatch origin for this call must be _Signed_.
	pub fn set_key(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		new: Address,
	) -> DispatchResultWithPostInfo {
		Self::ensure_sudo(&*ext, origin)?;
		let new = T::Lookup::lookup(new)?;

		let old_sudoer = Key::try_get(&*ext)?;
		Self::deposit_event(ext, Event::KeyChanged { old_sudoer })?;
		Key::put(ext, new);
		Ok(Pays::No.into())
	}

	/// Authenticates the sudo key and dispatches a function call with `Signed` origin from
	/// a given account.
	///
	/// The dispatch origin for this call must be _Signed_.
	pub fn sudo_as(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		who: Address,
		call: Box<<T as Config>::RuntimeCall>,
	) -> DispatchResultWithPostInfo {
		Self::ensure_sudo(&*ext, origin)?;
		let who = T::Lookup::lookup(who)?;

		let res = Self::dispatch_as(ext, *call, RawOrigin::Signed(who));
		Self::deposit_event(ext, Event::SudoAsDone { sudo_result: res })?;
		Ok(Pays::No.into())
	}
}

impl<T: Config> Hooks for Pallet<T> {}

impl<T: Config> Pallet<T> {
	/// The current sudo key, if any.
	pub fn key(ext: &dyn Externalities) -> Result<Option<AccountId>, StorageError> {
		Key::try_get(ext)
	}

	/// Ensure that the caller is the sudo key.
	fn ensure_sudo(ext: &dyn Externalities, origin: RuntimeOrigin) -> DispatchResult {
		let sender = ensure_signed(origin)?;
		ensure!(Self::key(ext)?.map_or(false, |k| sender == k), Error::<T>::RequireSudo);
		Ok(())
	}

	fn dispatch_as(
		ext: &mut dyn Externalities,
		call: <T as Config>::RuntimeCall,
		origin: RawOrigin,
	) -> DispatchResult {
		let res = with_storage_layer(ext, |ext| call.dispatch_bypass_filter(origin, ext))
			.map(|_| ())
			.map_err(|e| e.error);
		if let Err(e) = &res {
			log::debug!(target: LOG_TARGET, "sudo dispatch failed: {:?}", e);
		}
		res
	}

	fn deposit_event(ext: &mut dyn Externalities, event: Event) -> Result<(), StorageError> {
		let event: <T as Config>::RuntimeEvent = event.into();
		System::<T>::deposit_event(ext, event)
	}
}

/// Genesis configuration of the Sudo module.
pub struct GenesisConfig<T> {
	/// The `AccountId` of the sudo key.
	pub key: Option<AccountId>,
	#[doc(hidden)]
	pub _config: PhantomData<T>,
}

impl<T> Default for GenesisConfig<T> {
	fn default() -> Self {
		Self { key: None, _config: PhantomData }
	}
}

impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
	fn build(&self, ext: &mut dyn Externalities) -> Result<(), StorageError> {
		if let Some(key) = &self.key {
			Key::put(ext, key);
		}
		Ok(())
	}
}
