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

//! # Timestamp Module
//!
//! The Timestamp module provides functionality to get and set the on-chain time.
//!
//! ## Overview
//!
//! The timestamp is set by the block author through a mandatory inherent, [`Call::set`], once
//! per block. Every block must contain exactly one such inherent: a block without it fails in
//! `on_finalize`, a second one fails its dispatch. Consecutive timestamps must be at least
//! [`Config::MinimumPeriod`] apart.
//!
//! The module implements [`ProvideInherent`]: it builds the `set` inherent out of the
//! timestamp the node puts into the [`InherentData`] under [`INHERENT_IDENTIFIER`], and checks
//! that an imported block's timestamp does not drift too far from the local clock.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use codec::{Compact, Decode, Encode};
use core::marker::PhantomData;
use scale_info::TypeInfo;
use stf_io::Externalities;
use stf_primitives::{
	inherents::{InherentData, InherentIdentifier, IsFatalError, ProvideInherent},
	traits::{DecodeCall, Get, GetDispatchInfo},
	BlockNumber, DecodeError, DispatchError, DispatchResultWithPostInfo, Moment, StorageError,
};
use stf_system::{
	ensure_none, storage::StorageValue, storage_prefix, HookError, Hooks, RuntimeOrigin,
	UnfilteredDispatchable,
};
use stf_weights::{DispatchClass, Weight};

#[cfg(test)]
mod tests;
pub mod weights;

pub use weights::WeightInfo;

/// Log target of the Timestamp module.
pub const LOG_TARGET: &str = "runtime::timestamp";

/// The identifier for the `timstap0` inherent.
pub const INHERENT_IDENTIFIER: InherentIdentifier = *b"timstap0";

/// How far in the future (in milliseconds) an imported block's timestamp may be.
pub const MAX_TIMESTAMP_DRIFT_MILLIS: Moment = 30 * 1000;

/// Errors that can occur while checking the timestamp inherent.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, TypeInfo)]
pub enum InherentError {
	/// The time between the blocks is too short; the block is valid from the given timestamp.
	ValidAtTimestamp(Moment),
	/// The block has a time set too far into the future.
	TooFarInFuture,
	/// The inherent data carries no decodable timestamp.
	MissingData,
}

impl IsFatalError for InherentError {
	fn is_fatal_error(&self) -> bool {
		match self {
			InherentError::ValidAtTimestamp(_) => false,
			InherentError::TooFarInFuture | InherentError::MissingData => true,
		}
	}
}

/// Configuration of the Timestamp module.
pub trait Config: stf_system::Config {
	/// The minimum period between blocks.
	///
	/// Be aware that this is different to the *expected* period that the block production
	/// apparatus provides. Your chosen consensus system will generally work with this to
	/// determine a sensible block time. For example, in the Aura module it will be double this
	/// period on default settings.
	type MinimumPeriod: Get<Moment>;

	/// Weight information for extrinsics in this module.
	type WeightInfo: WeightInfo;
}

/// The Timestamp module.
pub struct Pallet<T>(PhantomData<T>);

storage_prefix!(pub NowPrefix, "Timestamp", "Now");
storage_prefix!(pub DidUpdatePrefix, "Timestamp", "DidUpdate");

/// The current time for the current block.
pub type Now = StorageValue<NowPrefix, Moment>;

/// Whether the timestamp has been updated in this block.
///
/// This value is updated to `true` upon successful submission of a timestamp by a node.
/// It is then checked at the end of each block execution in the `on_finalize` hook.
pub type DidUpdate = StorageValue<DidUpdatePrefix, bool>;

/// Calls of the Timestamp module.
#[derive(Clone, PartialEq, Eq, Debug, Encode)]
#[codec(encode_bound())]
#[allow(non_camel_case_types)]
pub enum Call<T: Config> {
	/// Set the current time.
	///
	/// This call should be invoked exactly once per block. It will panic at the finalization
	/// phase, if this call hasn't been invoked by that time.
	///
	/// The timestamp should be greater than the previous one by the amount specified by
	/// [`Config::MinimumPeriod`].
	///
	/// The dispatch origin for this call must be _None_.
	#[codec(index = 0)]
	set {
		#[codec(compact)]
		now: Moment,
	},
	#[doc(hidden)]
	#[codec(skip)]
	__Ignore(PhantomData<T>, core::convert::Infallible),
}

impl<T: Config> DecodeCall for Call<T> {
	fn decode_call_with_depth(input: &mut &[u8], _depth: u32) -> Result<Self, DecodeError> {
		match u8::decode(input)? {
			0 => Ok(Call::set { now: Compact::<Moment>::decode(input)?.0 }),
			other => Err(DecodeError::UnknownFunction(other)),
		}
	}
}

impl<T: Config> GetDispatchInfo for Call<T> {
	fn base_weight(&self) -> Weight {
		match self {
			Call::set { .. } => T::WeightInfo::set(),
			Call::__Ignore(_, never) => match *never {},
		}
	}

	fn classify_dispatch(&self, _base: Weight) -> DispatchClass {
		DispatchClass::Mandatory
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
			Call::set { now } => Pallet::<T>::set(origin, ext, now),
			Call::__Ignore(_, never) => match never {},
		}
	}
}

impl<T: Config> Pallet<T> {
	/// Set the current time.
	pub fn set(
		origin: RuntimeOrigin,
		ext: &mut dyn Externalities,
		now: Moment,
	) -> DispatchResultWithPostInfo {
		ensure_none(origin)?;
		if DidUpdate::exists(&*ext) {
			return Err(DispatchError::Other("Timestamp must be updated only once in the block").into())
		}
		let prev = Now::get(&*ext)?;
		if prev != 0 && now < prev.saturating_add(T::MinimumPeriod::get()) {
			return Err(DispatchError::Other(
				"Timestamp must increment by at least <MinimumPeriod> between sequential blocks",
			)
			.into())
		}
		Now::put(ext, now);
		DidUpdate::put(ext, true);
		log::trace!(target: LOG_TARGET, "timestamp set to {}", now);

		Ok(().into())
	}

	/// Get the current time for the current block.
	///
	/// NOTE: if this function is called prior to setting the timestamp,
	/// it will return the timestamp of the previous block.
	pub fn now(ext: &dyn Externalities) -> Result<Moment, StorageError> {
		Now::get(ext)
	}

	/// Set the timestamp to something in particular. Only used for tests and genesis.
	pub fn set_timestamp(ext: &mut dyn Externalities, now: Moment) {
		Now::put(ext, now);
	}
}

impl<T: Config> Hooks for Pallet<T> {
	fn on_initialize(_ext: &mut dyn Externalities, _n: BlockNumber) -> Result<Weight, HookError> {
		// `on_finalize` is the only hook doing work.
		Ok(T::WeightInfo::on_finalize())
	}

	fn on_finalize(ext: &mut dyn Externalities, _n: BlockNumber) -> Result<(), HookError> {
		let did_update = DidUpdate::take(ext)?;
		if !did_update {
			return Err(HookError::Invariant("Timestamp must be updated once in the block"))
		}
		Ok(())
	}
}

impl<T: Config> ProvideInherent for Pallet<T> {
	type Call = Call<T>;
	type Error = InherentError;
	const INHERENT_IDENTIFIER: InherentIdentifier = INHERENT_IDENTIFIER;

	fn create_inherent(
		ext: &dyn Externalities,
		data: &InherentData,
	) -> Result<Option<Self::Call>, StorageError> {
		let inherent_data = match data.get_data::<Moment>(&INHERENT_IDENTIFIER) {
			Ok(Some(moment)) => moment,
			Ok(None) => {
				log::error!(target: LOG_TARGET, "Timestamp inherent data must be provided");
				return Ok(None)
			},
			Err(e) => {
				log::error!(target: LOG_TARGET, "Timestamp inherent data not correctly encoded: {}", e);
				return Ok(None)
			},
		};

		let next_time =
			inherent_data.max(Now::get(ext)?.saturating_add(T::MinimumPeriod::get()));
		Ok(Some(Call::set { now: next_time }))
	}

	fn check_inherent(
		ext: &dyn Externalities,
		call: &Self::Call,
		data: &InherentData,
	) -> Result<Result<(), Self::Error>, StorageError> {
		let t = match call {
			Call::set { now } => *now,
			_ => return Ok(Ok(())),
		};

		let Ok(Some(data)) = data.get_data::<Moment>(&INHERENT_IDENTIFIER) else {
			return Ok(Err(InherentError::MissingData))
		};

		let minimum = Now::get(ext)?.saturating_add(T::MinimumPeriod::get());
		if t > data.saturating_add(MAX_TIMESTAMP_DRIFT_MILLIS) {
			Ok(Err(InherentError::TooFarInFuture))
		} else if t < minimum {
			Ok(Err(InherentError::ValidAtTimestamp(minimum)))
		} else {
			Ok(Ok(()))
		}
	}

	fn is_inherent(call: &Self::Call) -> bool {
		matches!(call, Call::set { .. })
	}
}
