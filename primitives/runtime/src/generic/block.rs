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

//! Generic implementation of a block.

use super::{Header, UncheckedExtrinsic};
use crate::{
	traits::{DecodeCall, SignedExtension},
	DecodeError, Hash,
};
use alloc::vec::Vec;
use codec::{Compact, Decode, Encode};
use stf_io::Externalities;

/// Abstraction over a substrate block.
#[derive(PartialEq, Eq, Clone, Encode, Decode, Debug)]
pub struct Block<Extrinsic> {
	/// The block header.
	pub header: Header,
	/// The accompanying extrinsics.
	pub extrinsics: Vec<Extrinsic>,
}

impl<Extrinsic> Block<Extrinsic> {
	pub fn new(header: Header, extrinsics: Vec<Extrinsic>) -> Self {
		Self { header, extrinsics }
	}

	pub fn header(&self) -> &Header {
		&self.header
	}

	pub fn extrinsics(&self) -> &[Extrinsic] {
		&self.extrinsics[..]
	}

	pub fn deconstruct(self) -> (Header, Vec<Extrinsic>) {
		(self.header, self.extrinsics)
	}

	/// The hash of the block, which is the hash of its header.
	pub fn hash(&self, ext: &dyn Externalities) -> Hash {
		self.header.hash(ext)
	}
}

impl<Call: DecodeCall, Extra: SignedExtension> Block<UncheckedExtrinsic<Call, Extra>> {
	/// Decode a block from the front of `input`, keeping the typed errors of the extrinsic
	/// decoder.
	pub fn decode_typed(input: &mut &[u8]) -> Result<Self, DecodeError> {
		let header = Header::decode(input)?;
		let count = Compact::<u32>::decode(input)?.0;

		// The count is untrusted, every extrinsic occupies at least one byte.
		let mut extrinsics = Vec::with_capacity((count as usize).min(input.len()));
		for _ in 0..count {
			extrinsics.push(UncheckedExtrinsic::decode_typed(input)?);
		}

		Ok(Block { header, extrinsics })
	}
}

/// Decode a block, keeping the typed errors of the extrinsic decoder.
///
/// The whole input must be consumed.
pub fn decode_block<Call: DecodeCall, Extra: SignedExtension>(
	bytes: &[u8],
) -> Result<Block<UncheckedExtrinsic<Call, Extra>>, DecodeError> {
	let mut input = bytes;
	let block = Block::decode_typed(&mut input)?;

	if !input.is_empty() {
		return Err(codec::Error::from("Input buffer has still data left after decoding!").into())
	}

	Ok(block)
}
