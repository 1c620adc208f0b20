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

//! Weights for the System module.

use stf_weights::Weight;

/// Weight functions needed for the System module.
pub trait WeightInfo {
	fn remark(b: u32) -> Weight;
	fn remark_with_event(b: u32) -> Weight;
	fn set_heap_pages() -> Weight;
	fn set_storage(i: u32) -> Weight;
	fn kill_storage(i: u32) -> Weight;
	fn kill_prefix(p: u32) -> Weight;
}

/// Reference weights, with a read costing 25µs and a write 100µs.
impl WeightInfo for () {
	fn remark(b: u32) -> Weight {
		Weight::from_parts(2_000_000, 0).saturating_add(Weight::from_parts(360, 0).saturating_mul(b as u64))
	}
	fn remark_with_event(b: u32) -> Weight {
		Weight::from_parts(8_000_000, 0).saturating_add(Weight::from_parts(1_300, 0).saturating_mul(b as u64))
	}
	fn set_heap_pages() -> Weight {
		Weight::from_parts(4_000_000, 0).saturating_add(Weight::from_parts(100_000_000, 0))
	}
	fn set_storage(i: u32) -> Weight {
		Weight::from_parts(2_000_000, 0).saturating_add(Weight::from_parts(100_000_000, 0).saturating_mul(i as u64))
	}
	fn kill_storage(i: u32) -> Weight {
		Weight::from_parts(2_000_000, 0).saturating_add(Weight::from_parts(100_000_000, 0).saturating_mul(i as u64))
	}
	fn kill_prefix(p: u32) -> Weight {
		Weight::from_parts(4_000_000, 0).saturating_add(Weight::from_parts(100_000_000, 0).saturating_mul(p as u64))
	}
}
