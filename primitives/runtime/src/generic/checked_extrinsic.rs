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

//! Generic implementation of an extrinsic that has passed the verification
//! stage.

use crate::{
	traits::{Dispatchable, SignedExtension, ValidateUnsigned},
	transaction_validity::{TransactionSource, ValidTransaction},
	ApplyError, DispatchInfo, DispatchResultWithPostInfo,
};
use stf_io::{with_storage_layer, Externalities};

/// Definition of something that the external world might want to say; its
/// existence implies that it has been checked and is good, particularly with
/// regards to the signature.
///
/// It is consumed by exactly one of [`Self::validate`] (by reference, for the pool) or
/// [`Self::apply`] (by value, in a block).
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct CheckedExtrinsic<AccountId, Call, Extra> {
	/// Who this purports to be from, if anyone (note this is not a signature).
	pub signed: Option<AccountId>,

	/// The function that should be called.
	pub function: Call,

	/// The signed extensions, owned.
	pub extra: Extra,
}

impl<AccountId, Call, Extra> CheckedExtrinsic<AccountId, Call, Extra>
where
	Call: Dispatchable,
	Call::RuntimeOrigin: From<Option<AccountId>>,
	Extra: SignedExtension<AccountId = AccountId, Call = Call>,
{
	/// Check the transaction validity against current state, without executing the call.
	pub fn validate<U: ValidateUnsigned<Call = Call>>(
		&self,
		ext: &dyn Externalities,
		source: TransactionSource,
		info: &DispatchInfo,
		len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		if let Some(id) = &self.signed {
			self.extra.validate(ext, id, &self.function, info, len)
		} else {
			let valid = Extra::validate_unsigned(ext, &self.function, info, len)?;
			let unsigned_validation = U::validate_unsigned(ext, source, &self.function)?;
			Ok(valid.combine_with(unsigned_validation))
		}
	}

	/// Run the pre-dispatch checks, dispatch the call and run the post-dispatch hooks.
	///
	/// The outer `Err` means the extrinsic must not be included. The inner result is the
	/// dispatch outcome, which is recorded in the block either way. Storage changes of a failed
	/// dispatch are reverted; those of the pre-dispatch checks are kept.
	pub fn apply<U: ValidateUnsigned<Call = Call>>(
		self,
		ext: &mut dyn Externalities,
		info: &DispatchInfo,
		len: usize,
	) -> Result<DispatchResultWithPostInfo, ApplyError> {
		let (maybe_who, maybe_pre) = if let Some(id) = self.signed {
			let pre = self.extra.pre_dispatch(&mut *ext, &id, &self.function, info, len)?;
			(Some(id), Some(pre))
		} else {
			Extra::pre_dispatch_unsigned(&mut *ext, &self.function, info, len)?;
			U::pre_dispatch(&*ext, &self.function)?;
			(None, None)
		};

		let function = self.function;
		let res = with_storage_layer(&mut *ext, |ext| {
			function.dispatch(Call::RuntimeOrigin::from(maybe_who), ext)
		});
		let post_info = match res {
			Ok(info) => info,
			Err(err) => err.post_info,
		};
		Extra::post_dispatch(
			maybe_pre,
			ext,
			info,
			&post_info,
			len,
			&res.map(|_| ()).map_err(|e| e.error),
		)?;
		Ok(res)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		traits::NoUnsignedValidator,
		transaction_validity::{InvalidTransaction, UnknownTransaction},
		AccountId32, DispatchError, DispatchResult, PostDispatchInfo, Weight,
	};
	use codec::{Decode, Encode};
	use stf_io::TestExternalities;

	#[derive(Clone, PartialEq, Eq, Debug)]
	enum TestCall {
		/// Writes `CALL` and succeeds.
		Succeed,
		/// Writes `CALL` and fails.
		Fail,
	}

	impl Dispatchable for TestCall {
		type RuntimeOrigin = Option<AccountId32>;

		fn dispatch(
			self,
			origin: Self::RuntimeOrigin,
			ext: &mut dyn Externalities,
		) -> DispatchResultWithPostInfo {
			ext.set_storage(b"CALL", &origin.is_some().encode());
			match self {
				TestCall::Succeed => Ok(Some(Weight::from_parts(5, 0)).into()),
				TestCall::Fail => Err(DispatchError::Other("failed").into()),
			}
		}
	}

	/// Records its hooks in storage and rejects `Fail` calls when validating.
	#[derive(Debug, Encode, Decode, Clone, Eq, PartialEq, Default)]
	struct Recorder;

	impl SignedExtension for Recorder {
		const IDENTIFIER: &'static str = "Recorder";
		type AccountId = AccountId32;
		type Call = TestCall;
		type AdditionalSigned = ();
		type Pre = u8;

		fn additional_signed(&self, _: &dyn Externalities) -> Result<(), ApplyError> {
			Ok(())
		}

		fn validate(
			&self,
			_: &dyn Externalities,
			_: &AccountId32,
			call: &TestCall,
			_: &DispatchInfo,
			_: usize,
		) -> Result<ValidTransaction, ApplyError> {
			match call {
				TestCall::Succeed => Ok(ValidTransaction { priority: 7, ..Default::default() }),
				TestCall::Fail => Err(InvalidTransaction::Call.into()),
			}
		}

		fn pre_dispatch(
			self,
			ext: &mut dyn Externalities,
			_: &AccountId32,
			_: &TestCall,
			_: &DispatchInfo,
			_: usize,
		) -> Result<u8, ApplyError> {
			ext.set_storage(b"PRE", &[1]);
			Ok(42)
		}

		fn post_dispatch(
			pre: Option<u8>,
			ext: &mut dyn Externalities,
			_: &DispatchInfo,
			post_info: &PostDispatchInfo,
			_: usize,
			result: &DispatchResult,
		) -> Result<(), ApplyError> {
			ext.set_storage(b"POST", &(pre, post_info.actual_weight, result.is_ok()).encode());
			Ok(())
		}
	}

	type Xt = CheckedExtrinsic<AccountId32, TestCall, Recorder>;
	type Validator = NoUnsignedValidator<TestCall>;

	fn who() -> AccountId32 {
		AccountId32::new([1u8; 32])
	}

	fn post(ext: &TestExternalities) -> (Option<u8>, Option<Weight>, bool) {
		let raw = ext.storage(b"POST").unwrap();
		Decode::decode(&mut &raw[..]).unwrap()
	}

	#[test]
	fn signed_apply_runs_all_hooks() {
		let mut t = TestExternalities::default();
		let xt = Xt { signed: Some(who()), function: TestCall::Succeed, extra: Recorder };
		let res = t.execute_with(|ext| xt.apply::<Validator>(ext, &Default::default(), 10)).unwrap();

		assert_eq!(res.unwrap().actual_weight, Some(Weight::from_parts(5, 0)));
		t.execute_with(|ext| {
			assert_eq!(ext.storage(b"PRE"), Some(vec![1]));
			assert_eq!(ext.storage(b"CALL"), Some(true.encode()));
		});
		assert_eq!(post(&t), (Some(42), Some(Weight::from_parts(5, 0)), true));
	}

	#[test]
	fn failed_dispatch_is_reverted_but_pre_dispatch_is_kept() {
		let mut t = TestExternalities::default();
		let xt = Xt { signed: Some(who()), function: TestCall::Fail, extra: Recorder };
		let res = t.execute_with(|ext| xt.apply::<Validator>(ext, &Default::default(), 10)).unwrap();

		assert_eq!(res.map_err(|e| e.error), Err(DispatchError::Other("failed")));
		t.execute_with(|ext| {
			assert_eq!(ext.storage(b"PRE"), Some(vec![1]));
			assert_eq!(ext.storage(b"CALL"), None);
		});
		assert_eq!(post(&t), (Some(42), None, false));
	}

	#[test]
	fn unsigned_apply_has_no_pre() {
		let mut t = TestExternalities::default();
		let xt = Xt { signed: None, function: TestCall::Succeed, extra: Recorder };
		let res = t.execute_with(|ext| xt.apply::<Validator>(ext, &Default::default(), 10)).unwrap();

		assert!(res.is_ok());
		t.execute_with(|ext| {
			assert_eq!(ext.storage(b"PRE"), None);
			assert_eq!(ext.storage(b"CALL"), Some(false.encode()));
		});
		assert_eq!(post(&t), (None, Some(Weight::from_parts(5, 0)), true));
	}

	#[test]
	fn validate_uses_extensions_or_unsigned_validator() {
		let t = TestExternalities::default();
		let info = DispatchInfo::default();

		let xt = Xt { signed: Some(who()), function: TestCall::Succeed, extra: Recorder };
		let valid = xt.validate::<Validator>(&t, TransactionSource::External, &info, 0).unwrap();
		assert_eq!(valid.priority, 7);

		let xt = Xt { signed: Some(who()), function: TestCall::Fail, extra: Recorder };
		assert_eq!(
			xt.validate::<Validator>(&t, TransactionSource::External, &info, 0),
			Err(InvalidTransaction::Call.into())
		);

		let xt = Xt { signed: None, function: TestCall::Succeed, extra: Recorder };
		assert_eq!(
			xt.validate::<Validator>(&t, TransactionSource::External, &info, 0),
			Err(UnknownTransaction::NoUnsignedValidator.into())
		);
	}
}
