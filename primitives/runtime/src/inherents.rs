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

//! Inherent extrinsics: data the block author puts into a block that is not signed by anyone.
//!
//! The node hands the runtime an [`InherentData`] map when a block is built
//! (`BlockBuilder_inherent_extrinsics`) and again when a block is imported
//! (`BlockBuilder_check_inherents`). Each module that provides an inherent reads its own entry,
//! keyed by an [`InherentIdentifier`].

use crate::StorageError;
use alloc::{collections::btree_map::BTreeMap, vec::Vec};
use codec::{Decode, Encode};
use core::fmt;
use scale_info::TypeInfo;
use stf_io::Externalities;

/// An identifier for an inherent.
pub type InherentIdentifier = [u8; 8];

/// Errors of the inherent data containers.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
	/// Inherent data already exists for the given identifier.
	InherentDataExists(InherentIdentifier),
	/// Failed to decode the inherent data for the given identifier.
	DecodingFailed(codec::Error, InherentIdentifier),
	/// A fatal error was already reported, no more errors are accepted.
	FatalErrorReported,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InherentDataExists(id) => write!(f, "Inherent data already exists for identifier: {:?}", id),
			Self::DecodingFailed(e, id) =>
				write!(f, "Failed to decode inherent data for identifier {:?}: {}", id, e),
			Self::FatalErrorReported =>
				f.write_str("There was already a fatal error reported and no other errors are allowed"),
		}
	}
}

/// Inherent data to include in a block.
#[derive(Clone, Default, Encode, Decode, PartialEq, Eq, Debug, TypeInfo)]
pub struct InherentData {
	/// All inherent data encoded with parity-scale-codec and an identifier.
	data: BTreeMap<InherentIdentifier, Vec<u8>>,
}

impl InherentData {
	/// Create a new instance.
	pub fn new() -> Self {
		Self::default()
	}

	/// Put data for an inherent into the internal storage.
	///
	/// Fails if there already is data for the given identifier.
	pub fn put_data<I: Encode>(
		&mut self,
		identifier: InherentIdentifier,
		inherent: &I,
	) -> Result<(), Error> {
		if self.data.contains_key(&identifier) {
			return Err(Error::InherentDataExists(identifier))
		}
		self.data.insert(identifier, inherent.encode());
		Ok(())
	}

	/// Replace the data for an inherent.
	///
	/// If it does not exist, the data is just inserted.
	pub fn replace_data<I: Encode>(&mut self, identifier: InherentIdentifier, inherent: &I) {
		self.data.insert(identifier, inherent.encode());
	}

	/// Returns the data for the requested inherent.
	///
	/// - `Ok(Some(I))` if the data could be found and deserialized.
	/// - `Ok(None)` if the data could not be found.
	/// - `Err(_)` if the data could be found, but deserialization did not work.
	pub fn get_data<I: Decode>(&self, identifier: &InherentIdentifier) -> Result<Option<I>, Error> {
		match self.data.get(identifier) {
			Some(inherent) => I::decode(&mut &inherent[..])
				.map_err(|e| Error::DecodingFailed(e, *identifier))
				.map(Some),
			None => Ok(None),
		}
	}

	/// Get the number of inherents in this instance
	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

/// Did we encounter a fatal error while checking an inherent?
///
/// A fatal error is everything that fails while checking an inherent error, e.g. the inherent
/// was not found, could not be decoded etc.
/// Then there are cases where you not want the inherent check to fail, but report that there is
/// an action required. For example a timestamp of a block is in the future, the timestamp is still
/// correct, but it is required to verify the block at a later time again and then the inherent
/// check will succeed.
pub trait IsFatalError {
	/// Returns `true` if the error is fatal.
	fn is_fatal_error(&self) -> bool;
}

/// The result of checking inherents.
///
/// It either returns okay for all checks, stores all occurred errors or just one fatal error.
///
/// When a fatal error occurs, all other errors are removed and the implementation needs to
/// abort checking inherents.
#[derive(Encode, Decode, Clone, Debug, PartialEq, Eq, TypeInfo)]
pub struct CheckInherentsResult {
	/// Did the check succeed?
	okay: bool,
	/// Did we encounter a fatal error?
	fatal_error: bool,
	/// We use the `InherentData` to store our errors.
	errors: InherentData,
}

impl Default for CheckInherentsResult {
	fn default() -> Self {
		Self { okay: true, errors: InherentData::new(), fatal_error: false }
	}
}

impl CheckInherentsResult {
	/// Create a new instance.
	pub fn new() -> Self {
		Self::default()
	}

	/// Put an error into the result.
	///
	/// This makes this result resolve to `ok() == false`.
	pub fn put_error<E: Encode + IsFatalError>(
		&mut self,
		identifier: InherentIdentifier,
		error: &E,
	) -> Result<(), Error> {
		// Don't accept any other error
		if self.fatal_error {
			return Err(Error::FatalErrorReported)
		}

		if error.is_fatal_error() {
			// remove the other errors.
			self.errors.data.clear();
		}

		self.errors.put_data(identifier, error)?;

		self.okay = false;
		self.fatal_error = error.is_fatal_error();
		Ok(())
	}

	/// Get an error out of the result.
	pub fn get_error<E: Decode>(&self, identifier: &InherentIdentifier) -> Result<Option<E>, Error> {
		self.errors.get_data(identifier)
	}

	/// Convert into an iterator over all contained errors.
	pub fn into_errors(self) -> impl Iterator<Item = (InherentIdentifier, Vec<u8>)> {
		self.errors.data.into_iter()
	}

	/// Is this result ok?
	pub fn ok(&self) -> bool {
		self.okay
	}

	/// Is this a fatal error?
	pub fn fatal_error(&self) -> bool {
		self.fatal_error
	}
}

/// A module that provides an inherent.
///
/// Reading storage may fail; the inner `Result` is the verdict on the inherent itself.
pub trait ProvideInherent {
	/// The call type of the module.
	type Call;
	/// The error returned by `check_inherent`.
	type Error: Encode + IsFatalError;
	/// The inherent identifier used by this inherent.
	const INHERENT_IDENTIFIER: InherentIdentifier;

	/// Create an inherent out of the given `InherentData`.
	fn create_inherent(
		ext: &dyn Externalities,
		data: &InherentData,
	) -> Result<Option<Self::Call>, StorageError>;

	/// Check whether the given inherent is valid. Checking the inherent is optional and can be
	/// omitted by using the default implementation.
	fn check_inherent(
		_ext: &dyn Externalities,
		_call: &Self::Call,
		_data: &InherentData,
	) -> Result<Result<(), Self::Error>, StorageError> {
		Ok(Ok(()))
	}

	/// Return whether the call is an inherent call of this module.
	fn is_inherent(call: &Self::Call) -> bool;
}
