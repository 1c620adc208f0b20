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

//! Weights for the Balances module.

use stf_weights::Weight;

/// Weight functions needed for the Balances module.
pub trait WeightInfo {
	fn transfer_allow_death() -> Weight;
	fn transfer_keep_alive() -> Weight;
	fn force_set_balance() -> Weight;
}

// Two account reads and writes plus the issuance for every call.
impl WeightInfo for () {
	fn transfer_allow_death() -> Weight {
		Weight::from_parts(48_000_000, 3_593)
	}
	fn transfer_keep_alive() -> Weight {
		Weight::from_parts(37_000_000, 3_593)
	}
	fn force_set_balance() -> Weight {
		Weight::from_parts(16_000_000, 3_593)
	}
}
