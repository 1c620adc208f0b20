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

//! Primitive traits for the runtime.

use crate::{
	transaction_validity::{TransactionSource, UnknownTransaction, ValidTransaction},
	ApplyError, DecodeError, DispatchResult, DispatchResultWithPostInfo,
};
use codec::{Codec, Decode, Encode};
use core::fmt::Debug;
use stf_io::Externalities;
use stf_weights::{
	ClassifyDispatch, DispatchClass, DispatchInfo, Pays, PaysFee, PostDispatchInfo, WeighData,
	Weight,
};

/// A trait for querying a single value from a type.
///
/// It is not required that the value is constant.
pub trait Get<T> {
	/// Return the current value.
	fn get() -> T;
}

impl<T: Default> Get<T> for () {
	fn get() -> T {
		T::default()
	}
}

macro_rules! impl_const_get {
	($name:ident, $t:ty) => {
		/// Const getter for a basic type.
		#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
		pub struct $name<const T: $t>;

		impl<const T: $t> Get<$t> for $name<T> {
			fn get() -> $t {
				T
			}
		}

		impl<const T: $t> Get<Option<$t>> for $name<T> {
			fn get() -> Option<$t> {
				Some(T)
			}
		}
	};
}

impl_const_get!(ConstBool, bool);
impl_const_get!(ConstU8, u8);
impl_const_get!(ConstU32, u32);
impl_const_get!(ConstU64, u64);
impl_const_get!(ConstU128, u128);

/// An error type that indicates that the origin is invalid.
#[derive(Encode, Decode, Debug, PartialEq, Eq)]
pub struct BadOrigin;

impl From<BadOrigin> for crate::DispatchError {
	fn from(_: BadOrigin) -> Self {
		Self::BadOrigin
	}
}

/// An error that indicates that a lookup failed.
#[derive(Encode, Decode, Debug, PartialEq, Eq, Clone, Copy)]
pub struct LookupError;

/// Means of changing one type into another in a manner dependent on the source type.
/// This variant is different to `Lookup` in that it doesn't (can cannot) require any
/// context.
pub trait StaticLookup {
	/// Type to lookup from.
	type Source: Codec + Clone + PartialEq + Debug;
	/// Type to lookup into.
	type Target;
	/// Attempt a lookup.
	fn lookup(s: Self::Source) -> Result<Self::Target, LookupError>;
	/// Convert from Target back to Source.
	fn unlookup(t: Self::Target) -> Self::Source;
}

/// A lazy call (module function and argument values) that can be executed via its `dispatch`
/// method.
pub trait Dispatchable {
	/// Every function call from your runtime has an origin, which specifies where the extrinsic was
	/// generated from. In the case of a signed extrinsic (transaction), the origin contains an
	/// identifier for the caller. The origin can be empty in the case of an inherent extrinsic.
	type RuntimeOrigin;

	/// Actually dispatch this call and return the result of it.
	fn dispatch(
		self,
		origin: Self::RuntimeOrigin,
		ext: &mut dyn Externalities,
	) -> DispatchResultWithPostInfo;
}

/// Static weight annotation of a call: its weight, dispatch class and fee behaviour.
///
/// The annotation is evaluated against the call's own arguments, so a call can weigh, classify
/// and price itself from the data it carries.
pub trait GetDispatchInfo {
	/// The weight the call is annotated with before looking at its arguments.
	fn base_weight(&self) -> Weight;

	/// The weight of this call given its `base` weight.
	fn weigh_data(&self, base: Weight) -> Weight {
		WeighData::<()>::weigh_data(&base, ())
	}

	/// The dispatch class of this call.
	fn classify_dispatch(&self, base: Weight) -> DispatchClass {
		ClassifyDispatch::<()>::classify_dispatch(&base, ())
	}

	/// Whether the signer pays a fee for this call.
	fn pays_fee(&self, base: Weight) -> Pays {
		PaysFee::<()>::pays_fee(&base, ())
	}

	/// Return a `DispatchInfo`, containing relevant information of this dispatch.
	///
	/// This is done independently of its encoded size.
	fn get_dispatch_info(&self) -> DispatchInfo {
		let base = self.base_weight();
		DispatchInfo {
			weight: self.weigh_data(base),
			class: self.classify_dispatch(base),
			pays_fee: self.pays_fee(base),
		}
	}
}

/// Decoding of calls from their `(module index, function index, arguments)` encoding.
///
/// Unknown indices are reported as typed errors. Calls may wrap other calls; the nesting is bounded
/// by [`crate::MAX_CALL_DEPTH`].
pub trait DecodeCall: Sized {
	/// Decode a top-level call.
	fn decode_call(input: &mut &[u8]) -> Result<Self, DecodeError> {
		Self::decode_call_with_depth(input, 0)
	}

	/// Decode a call that is nested `depth` levels deep inside other calls.
	fn decode_call_with_depth(input: &mut &[u8], depth: u32) -> Result<Self, DecodeError>;
}

/// Decode a call nested inside another one, one level deeper than `depth`.
pub fn decode_nested_call<Call: DecodeCall>(
	input: &mut &[u8],
	depth: u32,
) -> Result<Call, DecodeError> {
	let depth = depth.saturating_add(1);
	if depth > crate::MAX_CALL_DEPTH {
		return Err(DecodeError::CallDepthExceeded)
	}
	Call::decode_call_with_depth(input, depth)
}

/// Whether a call is an inherent: an unsigned call provided by the block author that must be
/// placed before every other extrinsic of the block.
pub trait IsInherent {
	fn is_inherent(&self) -> bool;
}

/// Means by which a transaction may be extended. This type embodies both the data and the logic
/// that should be additionally associated with the transaction. It should be plain old data.
///
/// Every method receives the host handle of the current invocation. Validity failures and fatal
/// storage failures are both carried by [`ApplyError`].
pub trait SignedExtension: Codec + Debug + Clone + Eq + PartialEq {
	/// Unique identifier of this signed extension.
	///
	/// This will be exposed in the metadata to identify the signed extension used
	/// in an extrinsic.
	const IDENTIFIER: &'static str;

	/// The type which encodes the sender identity.
	type AccountId;

	/// The type which encodes the call to be dispatched.
	type Call;

	/// Any additional data that will go into the signed payload. This may be created dynamically
	/// from the transaction using the `additional_signed` function.
	type AdditionalSigned: Encode;

	/// The type that encodes information that can be passed from pre_dispatch to post-dispatch.
	type Pre;

	/// Construct any additional data that should be in the signed payload of the transaction. Can
	/// also perform any pre-signature-verification checks and return an error if needed.
	fn additional_signed(&self, ext: &dyn Externalities) -> Result<Self::AdditionalSigned, ApplyError>;

	/// Validate a signed transaction for the transaction queue.
	///
	/// This function can be called frequently by the transaction queue,
	/// to obtain transaction validity against current state.
	/// It should perform all checks that determine a valid transaction,
	/// that can pay for its execution and quickly eliminate ones
	/// that are stale or incorrect.
	///
	/// Make sure to perform the same checks in `pre_dispatch` function.
	fn validate(
		&self,
		_ext: &dyn Externalities,
		_who: &Self::AccountId,
		_call: &Self::Call,
		_info: &DispatchInfo,
		_len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		Ok(ValidTransaction::default())
	}

	/// Do any pre-flight stuff for a signed transaction.
	///
	/// Make sure to perform the same checks as in [`Self::validate`].
	fn pre_dispatch(
		self,
		ext: &mut dyn Externalities,
		who: &Self::AccountId,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<Self::Pre, ApplyError>;

	/// Validate an unsigned transaction for the transaction queue.
	///
	/// This function can be called frequently by the transaction queue
	/// to obtain transaction validity against current state.
	/// It should perform all checks that determine a valid unsigned transaction,
	/// and quickly eliminate ones that are stale or incorrect.
	fn validate_unsigned(
		_ext: &dyn Externalities,
		_call: &Self::Call,
		_info: &DispatchInfo,
		_len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		Ok(ValidTransaction::default())
	}

	/// Do any pre-flight stuff for an unsigned transaction.
	///
	/// Note this function by default delegates to `validate_unsigned`, so that
	/// all checks performed for the transaction queue are also performed during
	/// the dispatch phase (applying the extrinsic).
	fn pre_dispatch_unsigned(
		ext: &mut dyn Externalities,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(), ApplyError> {
		Self::validate_unsigned(&*ext, call, info, len).map(|_| ())
	}

	/// Do any post-flight stuff for an extrinsic.
	///
	/// If the transaction is signed, then `_pre` will contain the output of `pre_dispatch`,
	/// and `None` otherwise.
	///
	/// This gets given the `DispatchResult` `_result` from the extrinsic and can, if desired,
	/// introspect it to determine whether it succeeded or failed.
	///
	/// An error returned here is fatal for the extrinsic: the block is not valid.
	fn post_dispatch(
		_pre: Option<Self::Pre>,
		_ext: &mut dyn Externalities,
		_info: &DispatchInfo,
		_post_info: &PostDispatchInfo,
		_len: usize,
		_result: &DispatchResult,
	) -> Result<(), ApplyError> {
		Ok(())
	}
}

#[impl_trait_for_tuples::impl_for_tuples(1, 12)]
impl<AccountId, Call> SignedExtension for Tuple {
	for_tuples!( where #( Tuple: SignedExtension<AccountId=AccountId, Call=Call,> )* );
	type AccountId = AccountId;
	type Call = Call;
	const IDENTIFIER: &'static str = "You should call `identifier()`!";
	for_tuples!( type AdditionalSigned = ( #( Tuple::AdditionalSigned ),* ); );
	for_tuples!( type Pre = ( #( Tuple::Pre ),* ); );

	fn additional_signed(&self, ext: &dyn Externalities) -> Result<Self::AdditionalSigned, ApplyError> {
		Ok(for_tuples!( ( #( Tuple.additional_signed(ext)? ),* ) ))
	}

	fn validate(
		&self,
		ext: &dyn Externalities,
		who: &Self::AccountId,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		let valid = ValidTransaction::default();
		for_tuples!( #( let valid = valid.combine_with(Tuple.validate(ext, who, call, info, len)?); )* );
		Ok(valid)
	}

	fn pre_dispatch(
		self,
		ext: &mut dyn Externalities,
		who: &Self::AccountId,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<Self::Pre, ApplyError> {
		Ok(for_tuples!( ( #( Tuple.pre_dispatch(&mut *ext, who, call, info, len)? ),* ) ))
	}

	fn validate_unsigned(
		ext: &dyn Externalities,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<ValidTransaction, ApplyError> {
		let valid = ValidTransaction::default();
		for_tuples!( #( let valid = valid.combine_with(Tuple::validate_unsigned(ext, call, info, len)?); )* );
		Ok(valid)
	}

	fn pre_dispatch_unsigned(
		ext: &mut dyn Externalities,
		call: &Self::Call,
		info: &DispatchInfo,
		len: usize,
	) -> Result<(), ApplyError> {
		for_tuples!( #( Tuple::pre_dispatch_unsigned(&mut *ext, call, info, len)?; )* );
		Ok(())
	}

	fn post_dispatch(
		pre: Option<Self::Pre>,
		ext: &mut dyn Externalities,
		info: &DispatchInfo,
		post_info: &PostDispatchInfo,
		len: usize,
		result: &DispatchResult,
	) -> Result<(), ApplyError> {
		match pre {
			Some(x) => {
				for_tuples!( #( Tuple::post_dispatch(Some(x.Tuple), &mut *ext, info, post_info, len, result)?; )* );
			},
			None => {
				for_tuples!( #( Tuple::post_dispatch(None, &mut *ext, info, post_info, len, result)?; )* );
			},
		}
		Ok(())
	}
}

impl SignedExtension for () {
	type AccountId = crate::AccountId;
	type AdditionalSigned = ();
	type Call = ();
	type Pre = ();
	const IDENTIFIER: &'static str = "UnitSignedExtension";

	fn additional_signed(&self, _: &dyn Externalities) -> Result<(), ApplyError> {
		Ok(())
	}

	fn pre_dispatch(
		self,
		_: &mut dyn Externalities,
		_: &Self::AccountId,
		_: &Self::Call,
		_: &DispatchInfo,
		_: usize,
	) -> Result<(), ApplyError> {
		Ok(())
	}
}

/// Provide validation for unsigned extrinsics.
///
/// This trait provides two functions [`pre_dispatch`](Self::pre_dispatch) and
/// [`validate_unsigned`](Self::validate_unsigned). The [`pre_dispatch`](Self::pre_dispatch)
/// function is called right before dispatching the call wrapped by an unsigned extrinsic. The
/// [`validate_unsigned`](Self::validate_unsigned) function is mainly being used in the context of
/// the transaction pool to check the validity of the call wrapped by an unsigned extrinsic.
pub trait ValidateUnsigned {
	/// The call to validate
	type Call;

	/// Validate the call right before dispatch.
	///
	/// This method should be used to prevent transactions already in the pool
	/// (i.e. passing [`validate_unsigned`](Self::validate_unsigned)) from being included in blocks
	/// in case they became invalid since being added to the pool.
	///
	/// By default it's a good idea to call [`validate_unsigned`](Self::validate_unsigned) from
	/// within this function again to make sure we never include an invalid transaction. Otherwise
	/// the implementation of the call or this method will need to provide proper validation to
	/// ensure that the transaction is valid.
	///
	/// Changes made to storage *WILL* be persisted if the call returns `Ok`.
	fn pre_dispatch(ext: &dyn Externalities, call: &Self::Call) -> Result<(), ApplyError> {
		Self::validate_unsigned(ext, TransactionSource::InBlock, call).map(|_| ())
	}

	/// Return the validity of the call
	///
	/// This method has no side-effects. It merely checks whether the call would be rejected
	/// by the runtime in an unsigned extrinsic.
	///
	/// The validity checks should be as lightweight as possible because every node will execute
	/// this code before the unsigned extrinsic enters the transaction pool and also periodically
	/// afterwards to ensure the validity. To prevent dos-ing a network with unsigned
	/// extrinsics, these validity checks should include some checks around uniqueness, for example,
	/// checking that the unsigned extrinsic was sent by an authority in the active set.
	///
	/// Changes made to storage should be discarded by caller.
	fn validate_unsigned(
		ext: &dyn Externalities,
		source: TransactionSource,
		call: &Self::Call,
	) -> Result<ValidTransaction, ApplyError>;
}

/// Unsigned validator that accepts every call in a block and rejects every call in the pool.
pub struct NoUnsignedValidator<Call>(core::marker::PhantomData<Call>);

impl<Call> ValidateUnsigned for NoUnsignedValidator<Call> {
	type Call = Call;

	fn pre_dispatch(_: &dyn Externalities, _: &Self::Call) -> Result<(), ApplyError> {
		Ok(())
	}

	fn validate_unsigned(
		_: &dyn Externalities,
		_: TransactionSource,
		_: &Self::Call,
	) -> Result<ValidTransaction, ApplyError> {
		Err(UnknownTransaction::NoUnsignedValidator.into())
	}
}
