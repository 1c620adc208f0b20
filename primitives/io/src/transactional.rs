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

//! Nested storage layers on top of [`Externalities`].

use crate::Externalities;

/// Describes on what should happen with a storage transaction.
pub enum TransactionOutcome<R> {
	/// Commit the transaction.
	Commit(R),
	/// Rollback the transaction.
	Rollback(R),
}

impl<R> TransactionOutcome<R> {
	/// Convert into the inner type.
	pub fn into_inner(self) -> R {
		match self {
			Self::Commit(r) => r,
			Self::Rollback(r) => r,
		}
	}
}

/// Execute the supplied function in a new storage transaction.
///
/// All changes to storage performed by the supplied function are discarded if the returned
/// outcome is `TransactionOutcome::Rollback`.
pub fn with_transaction<R>(
	ext: &mut dyn Externalities,
	f: impl FnOnce(&mut dyn Externalities) -> TransactionOutcome<R>,
) -> R {
	ext.storage_start_transaction();

	match f(&mut *ext) {
		TransactionOutcome::Commit(res) => {
			ext.storage_commit_transaction();
			res
		},
		TransactionOutcome::Rollback(res) => {
			ext.storage_rollback_transaction();
			res
		},
	}
}

/// Execute the supplied function, adding a new storage layer.
///
/// This is the same as [`with_transaction`], but assuming that any function returning an `Err`
/// should rollback, and any function returning `Ok` should commit.
pub fn with_storage_layer<R, E>(
	ext: &mut dyn Externalities,
	f: impl FnOnce(&mut dyn Externalities) -> Result<R, E>,
) -> Result<R, E> {
	with_transaction(ext, |ext| {
		let r = f(ext);
		if r.is_ok() {
			TransactionOutcome::Commit(r)
		} else {
			TransactionOutcome::Rollback(r)
		}
	})
}
