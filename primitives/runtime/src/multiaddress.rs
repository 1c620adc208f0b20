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

//! MultiAddress type is a wrapper for multiple downstream account formats.

use crate::{
	traits::{LookupError, StaticLookup},
	AccountId32,
};
use alloc::vec::Vec;
use codec::{Decode, Encode};
use scale_info::TypeInfo;

/// A multi-format address wrapper for on-chain accounts.
#[derive(Encode, Decode, PartialEq, Eq, Clone, Debug, TypeInfo)]
pub enum MultiAddress {
	/// It's an account ID (pubkey).
	Id(AccountId32),
	/// It's an account index.
	Index(#[codec(compact)] u32),
	/// It's some arbitrary raw bytes.
	Raw(Vec<u8>),
	/// It's a 32 byte representation.
	Address32([u8; 32]),
	/// It's a 20 byte representation.
	Address20([u8; 20]),
}

impl From<AccountId32> for MultiAddress {
	fn from(a: AccountId32) -> Self {
		Self::Id(a)
	}
}

/// A lookup implementation returning the `AccountId` from a `MultiAddress`.
///
/// Only the `Id` and `Address32` forms resolve; there is no account index.
pub struct AccountIdLookup;

impl StaticLookup for AccountIdLookup {
	type Source = MultiAddress;
	type Target = AccountId32;

	fn lookup(x: Self::Source) -> Result<Self::Target, LookupError> {
		match x {
			MultiAddress::Id(i) => Ok(i),
			MultiAddress::Address32(bytes) => Ok(AccountId32::new(bytes)),
			_ => Err(LookupError),
		}
	}

	fn unlookup(x: Self::Target) -> Self::Source {
		MultiAddress::Id(x)
	}
}
