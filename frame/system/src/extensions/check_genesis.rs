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

use crate::{Config, Pallet};
use codec::{Decode, Encode};
use scale_info::TypeInfo;
use stf_io::Externalities;
use stf_primitives::{traits::SignedExtension, AccountId, ApplyError, DispatchInfo, Hash};

/// Genesis hash check to provide replay protection between different networks.
///
/// # Transaction Validity
///
/// Note that while a transaction with invalid `genesis_hash` will fail to be decoded,
/// the extension does not affect any other fields of `TransactionValidity` directly.
#[derive(Encode, Decode, Clone, Eq, PartialEq, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub struct CheckGenesis<T: Config>(core::marker::PhantomData<T>);

impl<T: Config> core::fmt::Debug for CheckGenesis<T> {
	#[cfg(feature = "std")]
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "CheckGenesis")
	}

	#[cfg(not(feature = "std"))]
	fn fmt(&self, _: &mut core::fmt::Formatter) -> core::fmt::Result {
		Ok(())
	}
}

impl<T: Config> Default for CheckGenesis<T> {
	fn default() -> Self {
		Self(core::marker::PhantomData)
	}
}

impl<T: Config> CheckGenesis<T> {
	/// Creates new `SignedExtension` to check genesis hash.
	pub fn new() -> Self {
		Self(core::marker::PhantomData)
	}
}

impl<T: Config> SignedExtension for CheckGenesis<T> {
	const IDENTIFIER: &'static str = "CheckGenesis";
	type AccountId = AccountId;
	type Call = <T as Config>::RuntimeCall;
	type AdditionalSigned = Hash;
	type Pre = ();

	fn additional_signed(&self, ext: &dyn Externalities) -> Result<Hash, ApplyError> {
		Ok(<Pallet<T>>::block_hash(ext, 0)?)
	}

	fn pre_dispatch(
		self,
		_ext: &mut dyn Externalities,
		_who: &AccountId,
		_call: &Self::Call,
		_info: &DispatchInfo,
		_len: usize,
	) -> Result<(), ApplyError> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mock::{new_test_ext, Test};

	#[test]
	fn genesis_hash_is_signed() {
		new_test_ext().execute_with(|ext| {
			assert_eq!(
				CheckGenesis::<Test>::new().additional_signed(ext),
				Ok(Hash::repeat_byte(69))
			);
		})
	}
}
