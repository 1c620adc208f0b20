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

//! Deterministic key pairs for tests.
//!
//! Every key is derived from a 32 byte seed. The signatures produced here are the ones
//! [`crate::TestExternalities`] (and a real host) accept.

use crate::test_ext::SR25519_SIGNING_CTX;

pub fn ed25519_public(seed: &[u8; 32]) -> [u8; 32] {
	let secret = ed25519_zebra::SigningKey::from(*seed);
	ed25519_zebra::VerificationKey::from(&secret).into()
}

pub fn ed25519_sign(seed: &[u8; 32], msg: &[u8]) -> [u8; 64] {
	ed25519_zebra::SigningKey::from(*seed).sign(msg).to_bytes()
}

fn sr25519_pair(seed: &[u8; 32]) -> schnorrkel::Keypair {
	schnorrkel::MiniSecretKey::from_bytes(seed)
		.expect("32 bytes can always build a MiniSecretKey; qed")
		.expand_to_keypair(schnorrkel::ExpansionMode::Ed25519)
}

pub fn sr25519_public(seed: &[u8; 32]) -> [u8; 32] {
	sr25519_pair(seed).public.to_bytes()
}

pub fn sr25519_sign(seed: &[u8; 32], msg: &[u8]) -> [u8; 64] {
	sr25519_pair(seed).sign_simple(SR25519_SIGNING_CTX, msg).to_bytes()
}

fn ecdsa_secret(seed: &[u8; 32]) -> libsecp256k1::SecretKey {
	libsecp256k1::SecretKey::parse(seed).expect("seed must be a valid secp256k1 secret key")
}

/// The compressed public key of the ecdsa pair derived from `seed`.
pub fn ecdsa_public(seed: &[u8; 32]) -> [u8; 33] {
	libsecp256k1::PublicKey::from_secret_key(&ecdsa_secret(seed)).serialize_compressed()
}

/// Sign the `blake2_256` hash of `msg`, returning `r ++ s ++ v`.
pub fn ecdsa_sign(seed: &[u8; 32], msg: &[u8]) -> [u8; 65] {
	let hashed = sp_crypto_hashing::blake2_256(msg);
	let (sig, recovery_id) =
		libsecp256k1::sign(&libsecp256k1::Message::parse(&hashed), &ecdsa_secret(seed));
	let mut r = [0u8; 65];
	r[0..64].copy_from_slice(&sig.serialize()[..]);
	r[64] = recovery_id.serialize();
	r
}
