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

//! Merkle-Patricia roots in the base-16 no-extension layout.
//!
//! Nodes are encoded with a two-bit header (leaf, branch without value, branch with value) or the
//! longer headers of hashed-value nodes, followed by the packed partial key. Branches carry a
//! 16-bit child bitmap and children shorter than a hash are inlined.

use codec::{Compact, Encode};
use hash_db::Hasher;
use trie_root::{TrieStream, Value};

use crate::StateVersion;

const EMPTY_TRIE: u8 = 0;
const NIBBLE_SIZE_BOUND: usize = u16::MAX as usize;
const LEAF_PREFIX_MASK: u8 = 0b_01 << 6;
const BRANCH_WITHOUT_MASK: u8 = 0b_10 << 6;
const BRANCH_WITH_MASK: u8 = 0b_11 << 6;
const HASHED_VALUE_LEAF_PREFIX_MASK: u8 = 0b_001 << 5;
const HASHED_VALUE_BRANCH_PREFIX_MASK: u8 = 0b_0001 << 4;

/// Values of at least this many bytes are stored by hash under [`StateVersion::V1`].
pub const VALUE_NODE_THRESHOLD: u32 = 33;

/// `blake2_256` as a trie hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Blake2Hasher;

impl Hasher for Blake2Hasher {
	type Out = [u8; 32];
	type StdHasher = hash256_std_hasher::Hash256StdHasher;
	const LENGTH: usize = 32;

	fn hash(data: &[u8]) -> Self::Out {
		sp_crypto_hashing::blake2_256(data)
	}
}

impl StateVersion {
	/// The size from which values are stored by hash, if any.
	pub fn value_threshold(self) -> Option<u32> {
		match self {
			StateVersion::V0 => None,
			StateVersion::V1 => Some(VALUE_NODE_THRESHOLD),
		}
	}
}

/// Root of the trie holding `input`.
pub fn trie_root<I, A, B>(input: I, version: StateVersion) -> [u8; 32]
where
	I: IntoIterator<Item = (A, B)>,
	A: AsRef<[u8]> + Ord,
	B: AsRef<[u8]>,
{
	trie_root::trie_root_no_extension::<Blake2Hasher, NodeStream, _, _, _>(
		input,
		version.value_threshold(),
	)
}

/// Root of the trie mapping each compact-encoded index to the item at that index.
pub fn ordered_trie_root<I>(input: I, version: StateVersion) -> [u8; 32]
where
	I: IntoIterator,
	I::Item: AsRef<[u8]>,
{
	trie_root(
		input.into_iter().enumerate().map(|(i, v)| (Compact(i as u32).encode(), v)),
		version,
	)
}

enum NodeKind {
	Leaf,
	BranchNoValue,
	BranchWithValue,
	HashedValueLeaf,
	HashedValueBranch,
}

/// Header byte(s) followed by the partial key packed two nibbles per byte.
fn fuse_nibbles_node(nibbles: &[u8], kind: NodeKind) -> impl Iterator<Item = u8> + '_ {
	let size = nibbles.len().min(NIBBLE_SIZE_BOUND);
	let header = match kind {
		NodeKind::Leaf => size_and_prefix_iterator(size, LEAF_PREFIX_MASK, 2),
		NodeKind::BranchNoValue => size_and_prefix_iterator(size, BRANCH_WITHOUT_MASK, 2),
		NodeKind::BranchWithValue => size_and_prefix_iterator(size, BRANCH_WITH_MASK, 2),
		NodeKind::HashedValueLeaf =>
			size_and_prefix_iterator(size, HASHED_VALUE_LEAF_PREFIX_MASK, 3),
		NodeKind::HashedValueBranch =>
			size_and_prefix_iterator(size, HASHED_VALUE_BRANCH_PREFIX_MASK, 4),
	};
	let odd = nibbles.len() % 2;
	header
		.chain(if odd == 1 { Some(nibbles[0]) } else { None })
		.chain(nibbles[odd..].chunks(2).map(|pair| pair[0] << 4 | pair[1]))
}

/// The nibble count shares the first byte with the node prefix and spills over into following
/// bytes, each adding up to 255.
fn size_and_prefix_iterator(
	size: usize,
	prefix: u8,
	prefix_bits: usize,
) -> impl Iterator<Item = u8> {
	let max_value = 255u8 >> prefix_bits;
	let first = (max_value as usize).saturating_sub(1).min(size);
	let (first_byte, mut rem) = if size == first {
		(prefix + first as u8, 0)
	} else {
		(prefix + max_value, size - first)
	};
	let next = move || {
		if rem == 0 {
			None
		} else if rem < 256 {
			let last = rem - 1;
			rem = 0;
			Some(last as u8)
		} else {
			rem = rem.saturating_sub(255);
			Some(255)
		}
	};
	core::iter::once(first_byte).chain(core::iter::from_fn(next))
}

fn branch_node_bit_mask(has_children: impl Iterator<Item = bool>) -> [u8; 2] {
	let mut bitmap: u16 = 0;
	let mut cursor: u16 = 1;
	for has_child in has_children {
		if has_child {
			bitmap |= cursor;
		}
		cursor <<= 1;
	}
	bitmap.to_le_bytes()
}

/// Builds the encoding of a node and its children while `trie_root` walks the sorted input.
#[derive(Default, Clone)]
pub struct NodeStream {
	buffer: Vec<u8>,
}

impl NodeStream {
	fn append_value(&mut self, value: Value) {
		match value {
			Value::Inline(value) => {
				Compact(value.len() as u32).encode_to(&mut self.buffer);
				self.buffer.extend_from_slice(value);
			},
			Value::Node(hash) => self.buffer.extend_from_slice(hash.as_slice()),
		}
	}
}

impl TrieStream for NodeStream {
	fn new() -> Self {
		Self::default()
	}

	fn append_empty_data(&mut self) {
		self.buffer.push(EMPTY_TRIE);
	}

	fn append_leaf(&mut self, key: &[u8], value: Value) {
		let kind = match &value {
			Value::Inline(..) => NodeKind::Leaf,
			Value::Node(..) => NodeKind::HashedValueLeaf,
		};
		self.buffer.extend(fuse_nibbles_node(key, kind));
		self.append_value(value);
	}

	fn begin_branch(
		&mut self,
		maybe_partial: Option<&[u8]>,
		maybe_value: Option<Value>,
		has_children: impl Iterator<Item = bool>,
	) {
		let kind = match &maybe_value {
			None => NodeKind::BranchNoValue,
			Some(Value::Inline(..)) => NodeKind::BranchWithValue,
			Some(Value::Node(..)) => NodeKind::HashedValueBranch,
		};
		self.buffer.extend(fuse_nibbles_node(maybe_partial.unwrap_or_default(), kind));
		self.buffer.extend(branch_node_bit_mask(has_children));
		if let Some(value) = maybe_value {
			self.append_value(value);
		}
	}

	fn append_extension(&mut self, _key: &[u8]) {
		debug_assert!(false, "the no-extension layout never emits extension nodes");
	}

	fn append_substream<H: Hasher>(&mut self, other: Self) {
		let data = other.out();
		if data.len() < H::LENGTH {
			data.encode_to(&mut self.buffer);
		} else {
			H::hash(&data).as_ref().encode_to(&mut self.buffer);
		}
	}

	fn out(self) -> Vec<u8> {
		self.buffer
	}
}
