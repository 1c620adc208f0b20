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

//! Predefined genesis configurations.

use crate::{AccountId, Balance, RuntimeGenesisConfig, UNIT};
use alloc::{vec, vec::Vec};

/// Preset of a single-authority development chain.
pub const DEV_RUNTIME_PRESET: &str = "development";
/// Preset of a local testnet.
pub const LOCAL_TESTNET_RUNTIME_PRESET: &str = "local_testnet";

/// The free balance every endowed account starts with.
pub const ENDOWMENT: Balance = 1_000_000 * UNIT;

/// Endow `endowed_accounts` and make `root` the sudo key.
pub fn testnet_genesis(endowed_accounts: Vec<AccountId>, root: AccountId) -> RuntimeGenesisConfig {
	RuntimeGenesisConfig {
		system: Default::default(),
		balances: stf_balances::GenesisConfig {
			balances: endowed_accounts.into_iter().map(|k| (k, ENDOWMENT)).collect(),
			..Default::default()
		},
		sudo: stf_sudo::GenesisConfig { key: Some(root), ..Default::default() },
	}
}

/// The genesis configuration of preset `id`.
///
/// The first of `accounts` is the sudo key; the development preset endows it alone, the local
/// testnet preset endows every account.
pub fn get_preset(id: &str, accounts: &[AccountId]) -> Option<RuntimeGenesisConfig> {
	let root = *accounts.first()?;
	match id {
		DEV_RUNTIME_PRESET => Some(testnet_genesis(vec![root], root)),
		LOCAL_TESTNET_RUNTIME_PRESET => Some(testnet_genesis(accounts.to_vec(), root)),
		_ => None,
	}
}

/// List of supported presets.
pub fn preset_names() -> Vec<&'static str> {
	vec![DEV_RUNTIME_PRESET, LOCAL_TESTNET_RUNTIME_PRESET]
}
