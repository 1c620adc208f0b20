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

use crate::Config;
use codec::{Decode, Encode};
use core::marker::PhantomData;
use scale_info::TypeInfo;
use stf_io::Externalities;
use stf_primitives::{
	traits::SignedExtension,
	transaction_validity::{InvalidTransaction, ValidTransaction},
	AccountId, ApplyError, DispatchInfo,
};

/// Check to ensure that the sender is not the zero address.
#[derive(Encode, Decode, Clone, Eq, PartialEq, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub struct CheckNonZeroSender<T>(PhantomData<T>);

impl<T: Config> core::fmt::Debug for CheckNonZeroSender<T> {
	#[cfg(feature = "std")]
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "CheckNonZeroSender")
	}

	#[cfg(not(feature = "std"))]
	fn fmt(&self, _: &mut core::fmt::Formatter) -> core::fmt::Result {
		Ok(())
	}
}

impl<T> Default for CheckNonZeroSender<T> {
	fn default() -> Self {
		Self(PhantomData)
	}
}

impl<T: Config> CheckNonZeroSender<T> {
	/// Create new `SignedExtension` to check the sender.
	pub fn new() -> Self {
		Self(PhantomData)
	}
}

impl<T: Config> SignedExtension for CheckNonZeroSender<T> {
	const IDENTIFIER: &'static str = "CheckNonZeroSender";
	type AccountId = AccountId;
	type Call = T::RuntimeCall;
	type AdditionalSigned = ();
	type Pre = ();

	fn additional_signed(&self, _: &dyn Externalities) -> Result<(), ApplyError> {
		Ok(())
	}

	fn validate(
		&self,
		_ext: &dyn Externalities,
		who: &AccountId,
		_call: &T::RuntimeCall,
		_info: &DispatchInfo,
		_len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		if who.as_bytes().iter().all(|x| *x == 0) {
			return Err(InvalidTransaction::BadSigner.into())
		}
		Ok(ValidTransaction::default())
	}

	fn pre_dispatch(
		self,
		ext: &mut dyn Externalities,
		who: &AccountId,
		call: &T::RuntimeCall,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(), ApplyError> {
		self.validate(&*ext, who, call, info, len).map(|_| ())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mock::{account, call, new_test_ext, Test};

	#[test]
	fn zero_account_ban_works() {
		new_test_ext().execute_with(|ext| {
			let info = DispatchInfo::default();
			let len = 0_usize;
			assert_eq!(
				CheckNonZeroSender::<Test>::new().validate(ext, &account(0), &call(), &info, len),
				Err(InvalidTransaction::BadSigner.into())
			);
			assert_eq!(
				CheckNonZeroSender::<Test>::new().pre_dispatch(ext, &account(0), &call(), &info, len),
				Err(InvalidTransaction::BadSigner.into())
			);
			assert!(CheckNonZeroSender::<Test>::new()
				.validate(ext, &account(1), &call(), &info, len)
				.is_ok());
		})
	}
}
