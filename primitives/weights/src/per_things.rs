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

use crate::Weight;
use codec::{Decode, Encode, MaxEncodedLen};
use core::ops::Mul;
use scale_info::TypeInfo;

const ACCURACY: u32 = 1_000_000_000;

/// A fixed point representation of a number in the range [0, 1], in parts per billion.
///
/// Multiplication rounds down.
#[derive(Encode, Decode, MaxEncodedLen, TypeInfo, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Perbill(u32);

impl Perbill {
	/// Build from parts per billion, saturating at one.
	pub const fn from_parts(parts: u32) -> Self {
		if parts > ACCURACY {
			Self(ACCURACY)
		} else {
			Self(parts)
		}
	}

	/// Build from a percentage, saturating at 100.
	pub const fn from_percent(percent: u32) -> Self {
		let percent = if percent > 100 { 100 } else { percent };
		Self(percent * (ACCURACY / 100))
	}

	pub const fn one() -> Self {
		Self(ACCURACY)
	}

	pub const fn zero() -> Self {
		Self(0)
	}

	/// The parts per billion.
	pub const fn deconstruct(self) -> u32 {
		self.0
	}

	/// `self * x`, rounded down.
	pub const fn mul_floor(self, x: u64) -> u64 {
		(x as u128 * self.0 as u128 / ACCURACY as u128) as u64
	}

	/// The complement `1 - self`.
	pub const fn left_from_one(self) -> Self {
		Self(ACCURACY - self.0)
	}
}

impl Mul<u64> for Perbill {
	type Output = u64;

	fn mul(self, b: u64) -> u64 {
		self.mul_floor(b)
	}
}

impl Mul<u32> for Perbill {
	type Output = u32;

	fn mul(self, b: u32) -> u32 {
		// Never exceeds `b`.
		self.mul_floor(b as u64) as u32
	}
}

impl Mul<Weight> for Perbill {
	type Output = Weight;

	fn mul(self, b: Weight) -> Weight {
		Weight::from_parts(self * b.ref_time(), self * b.proof_size())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn percent_multiplication_rounds_down() {
		let p = Perbill::from_percent(75);
		assert_eq!(p * 100u64, 75);
		assert_eq!(p * 3u32, 2);
		assert_eq!(p * u64::MAX, 13_835_058_055_282_163_711);
		assert_eq!(p.left_from_one(), Perbill::from_percent(25));
	}

	#[test]
	fn saturates_at_one() {
		assert_eq!(Perbill::from_percent(150), Perbill::one());
		assert_eq!(Perbill::from_parts(u32::MAX), Perbill::one());
		assert_eq!(Perbill::one() * 7u64, 7);
		assert_eq!(Perbill::zero() * 7u64, 0);
	}

	#[test]
	fn weight_is_scaled_per_dimension() {
		let w = Weight::from_parts(1000, 400);
		assert_eq!(Perbill::from_percent(10) * w, Weight::from_parts(100, 40));
	}
}
