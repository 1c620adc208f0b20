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

use crate::{BlockHash, Config, Pallet};
use codec::{Decode, Encode};
use scale_info::TypeInfo;
use stf_io::Externalities;
use stf_primitives::{
	generic::Era,
	traits::SignedExtension,
	transaction_validity::{InvalidTransaction, ValidTransaction},
	AccountId, ApplyError, BlockNumber, DispatchInfo, Hash,
};

/// Check for transaction mortality.
///
/// The extension adds `Era` to every signed extrinsic. It also contributes to the signed data, by
/// including the hash of the block at [`Era::birth`].
///
/// # Transaction Validity
///
/// The extension affects `longevity` of the transaction according to the [`Era`] definition.
#[derive(Encode, Decode, Clone, Eq, PartialEq, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub struct CheckMortality<T: Config>(pub Era, core::marker::PhantomData<T>);

impl<T: Config> CheckMortality<T> {
	/// utility constructor. Used only in client/factory code.
	pub fn from(era: Era) -> Self {
		Self(era, core::marker::PhantomData)
	}
}

impl<T: Config> Default for CheckMortality<T> {
	fn default() -> Self {
		Self::from(Era::Immortal)
	}
}

impl<T: Config> core::fmt::Debug for CheckMortality<T> {
	#[cfg(feature = "std")]
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "CheckMortality({:?})", self.0)
	}

	#[cfg(not(feature = "std"))]
	fn fmt(&self, _: &mut core::fmt::Formatter) -> core::fmt::Result {
		Ok(())
	}
}

impl<T: Config> SignedExtension for CheckMortality<T> {
	const IDENTIFIER: &'static str = "CheckMortality";
	type AccountId = AccountId;
	type Call = T::RuntimeCall;
	type AdditionalSigned = Hash;
	type Pre = ();

	fn validate(
		&self,
		ext: &dyn Externalities,
		_who: &AccountId,
		_call: &Self::Call,
		_info: &DispatchInfo,
		_len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		let current_u64 = <Pallet<T>>::block_number(ext)? as u64;
		let valid_till = self.0.death(current_u64);
		Ok(ValidTransaction {
			longevity: valid_till.saturating_sub(current_u64),
			..Default::default()
		})
	}

	fn additional_signed(&self, ext: &dyn Externalities) -> Result<Hash, ApplyError> {
		let current_u64 = <Pallet<T>>::block_number(ext)? as u64;
		let n = BlockNumber::try_from(self.0.birth(current_u64)).unwrap_or(BlockNumber::MAX);
		if !BlockHash::contains_key(ext, n) {
			Err(InvalidTransaction::AncientBirthBlock.into())
		} else {
			Ok(<Pallet<T>>::block_hash(ext, n)?)
		}
	}

	fn pre_dispatch(
		self,
		ext: &mut dyn Externalities,
		who: &AccountId,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(), ApplyError> {
		self.validate(&*ext, who, call, info, len).map(|_| ())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		mock::{account, call, new_test_ext, Test},
		CheckWeight, Number,
	};
	use stf_weights::{DispatchClass, Pays, Weight};

	#[test]
	fn signed_ext_check_era_should_work() {
		new_test_ext().execute_with(|ext| {
			// future
			assert_eq!(
				CheckMortality::<Test>::from(Era::mortal(4, 2)).additional_signed(ext),
				Err(InvalidTransaction::AncientBirthBlock.into())
			);

			// correct
			Number::put(ext, 13u32);
			BlockHash::insert(ext, 12u32, Hash::repeat_byte(1));
			assert_eq!(
				CheckMortality::<Test>::from(Era::mortal(4, 12)).additional_signed(ext),
				Ok(Hash::repeat_byte(1))
			);
		})
	}

	#[test]
	fn signed_ext_check_era_should_change_longevity() {
		new_test_ext().execute_with(|ext| {
			let normal = DispatchInfo {
				weight: Weight::from_parts(100, 0),
				class: DispatchClass::Normal,
				pays_fee: Pays::Yes,
			};
			let len = 0_usize;
			let extra =
				(CheckWeight::<Test>::new(), CheckMortality::<Test>::from(Era::mortal(16, 256)));
			Number::put(ext, 17u32);
			BlockHash::insert(ext, 16u32, Hash::repeat_byte(1));

			assert_eq!(extra.validate(ext, &account(1), &call(), &normal, len).unwrap().longevity, 15);
		})
	}
}
