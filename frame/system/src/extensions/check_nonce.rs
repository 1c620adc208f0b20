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
use alloc::vec;
use codec::{Decode, Encode};
use scale_info::TypeInfo;
use stf_io::Externalities;
use stf_primitives::{
	traits::SignedExtension,
	transaction_validity::{InvalidTransaction, TransactionLongevity, ValidTransaction},
	AccountId, ApplyError, DispatchInfo, Nonce,
};

/// Nonce check and increment to give replay protection for transactions.
///
/// # Transaction Validity
///
/// This extension affects `requires` and `provides` tags of validity, but DOES NOT
/// set the `priority` field. Make sure that AT LEAST one of the signed extension sets
/// some kind of priority upon validating transactions.
#[derive(Encode, Decode, Clone, Eq, PartialEq, TypeInfo)]
#[scale_info(skip_type_params(T))]
pub struct CheckNonce<T: Config>(#[codec(compact)] pub Nonce, core::marker::PhantomData<T>);

impl<T: Config> CheckNonce<T> {
	/// utility constructor. Used only in client/factory code.
	pub fn from(nonce: Nonce) -> Self {
		Self(nonce, core::marker::PhantomData)
	}
}

impl<T: Config> Default for CheckNonce<T> {
	fn default() -> Self {
		Self::from(0)
	}
}

impl<T: Config> core::fmt::Debug for CheckNonce<T> {
	#[cfg(feature = "std")]
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "CheckNonce({})", self.0)
	}

	#[cfg(not(feature = "std"))]
	fn fmt(&self, _: &mut core::fmt::Formatter) -> core::fmt::Result {
		Ok(())
	}
}

impl<T: Config> SignedExtension for CheckNonce<T> {
	const IDENTIFIER: &'static str = "CheckNonce";
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
		who: &AccountId,
		_call: &Self::Call,
		_info: &DispatchInfo,
		_len: usize,
	) -> Result<(), ApplyError> {
		let mut account = crate::Account::<T>::get(&*ext, who)?;
		if account.providers == 0 && account.sufficients == 0 {
			// Nonce storage not paid for
			return Err(InvalidTransaction::Payment.into())
		}
		if self.0 != account.nonce {
			return Err(if self.0 < account.nonce {
				InvalidTransaction::Stale
			} else {
				InvalidTransaction::Future
			}
			.into())
		}
		account.nonce = account.nonce.saturating_add(1);
		crate::Account::<T>::insert(ext, who, account);
		Ok(())
	}

	fn validate(
		&self,
		ext: &dyn Externalities,
		who: &AccountId,
		_call: &Self::Call,
		_info: &DispatchInfo,
		_len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		let account = crate::Account::<T>::get(ext, who)?;
		if account.providers == 0 && account.sufficients == 0 {
			// Nonce storage not paid for
			return Err(InvalidTransaction::Payment.into())
		}
		if self.0 < account.nonce {
			return Err(InvalidTransaction::Stale.into())
		}

		let provides = vec![Encode::encode(&(who, self.0))];
		let requires = if account.nonce < self.0 {
			vec![Encode::encode(&(who, self.0 - 1))]
		} else {
			vec![]
		};

		Ok(ValidTransaction {
			priority: 0,
			requires,
			provides,
			longevity: TransactionLongevity::MAX,
			propagate: true,
		})
	}
}
