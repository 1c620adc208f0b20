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

use crate::{mock::*, *};
use pretty_assertions::assert_eq;
use stf_primitives::{DispatchErrorWithPostInfo, PostDispatchInfo};
use stf_weights::Pays;

fn records(ext: &dyn Externalities) -> Vec<EventRecord<RuntimeEvent>> {
	System::events(ext).unwrap()
}

#[test]
fn stored_map_works() {
	new_test_ext().execute_with(|ext| {
		assert_eq!(System::inc_providers(ext, &account(0)).unwrap(), IncRefStatus::Created);
		assert!(System::account_exists(ext, &account(0)));
		assert_eq!(System::inc_providers(ext, &account(0)).unwrap(), IncRefStatus::Existed);
		assert_eq!(System::providers(ext, &account(0)).unwrap(), 2);

		System::inc_consumers(ext, &account(0)).unwrap();
		assert_eq!(System::dec_providers(ext, &account(0)).unwrap(), DecRefStatus::Exists);
		assert_eq!(System::dec_providers(ext, &account(0)), Err(DispatchError::ConsumerRemaining));

		System::dec_consumers(ext, &account(0)).unwrap();
		assert_eq!(System::dec_providers(ext, &account(0)).unwrap(), DecRefStatus::Reaped);
		assert!(!System::account_exists(ext, &account(0)));
	});
}

#[test]
fn inc_consumers_requires_a_provider() {
	new_test_ext().execute_with(|ext| {
		assert_eq!(System::inc_consumers(ext, &account(1)), Err(DispatchError::NoProviders));
		fund(ext, &account(1));
		assert!(System::inc_consumers(ext, &account(1)).is_ok());
		assert_eq!(System::consumers(ext, &account(1)).unwrap(), 1);
	});
}

#[test]
fn new_and_killed_account_events_are_deposited() {
	new_test_ext().execute_with(|ext| {
		System::initialize(ext, 1, &Hash::repeat_byte(69), &Default::default());
		System::inc_providers(ext, &account(2)).unwrap();
		System::dec_providers(ext, &account(2)).unwrap();
		assert_eq!(
			records(ext).into_iter().map(|r| r.event).collect::<Vec<_>>(),
			vec![
				RuntimeEvent::System(Event::NewAccount { account: account(2) }),
				RuntimeEvent::System(Event::KilledAccount { account: account(2) }),
			]
		);
	});
}

#[test]
fn account_nonce_increments() {
	new_test_ext().execute_with(|ext| {
		assert_eq!(System::account_nonce(ext, &account(1)).unwrap(), 0);
		System::inc_account_nonce(ext, &account(1)).unwrap();
		System::inc_account_nonce(ext, &account(1)).unwrap();
		assert_eq!(System::account_nonce(ext, &account(1)).unwrap(), 2);
	});
}

#[test]
fn events_are_not_deposited_on_genesis() {
	new_test_ext().execute_with(|ext| {
		System::deposit_event(ext, Event::CodeUpdated).unwrap();
		assert!(records(ext).is_empty());
		assert_eq!(EventCount::get(ext).unwrap(), 0);
	});
}

#[test]
fn deposit_event_should_work() {
	new_test_ext().execute_with(|ext| {
		System::reset_events(ext);
		System::initialize(ext, 1, &Hash::repeat_byte(69), &Default::default());
		System::note_finished_extrinsics(ext).unwrap();
		System::deposit_event(ext, Event::CodeUpdated).unwrap();
		System::finalize(ext).unwrap();
		assert_eq!(
			records(ext),
			vec![EventRecord {
				phase: Phase::Finalization,
				event: RuntimeEvent::System(Event::CodeUpdated),
				topics: vec![],
			}]
		);

		let normal_base = <Test as Config>::BlockWeights::get()
			.get(DispatchClass::Normal)
			.base_extrinsic;

		System::reset_events(ext);
		System::initialize(ext, 2, &Hash::repeat_byte(69), &Default::default());
		System::deposit_event(ext, Event::NewAccount { account: account(32) }).unwrap();
		System::note_finished_initialize(ext);
		System::deposit_event(ext, Event::KilledAccount { account: account(42) }).unwrap();
		System::note_applied_extrinsic(ext, &Ok(().into()), Default::default()).unwrap();
		System::note_applied_extrinsic(
			ext,
			&Err(DispatchError::BadOrigin.into()),
			Default::default(),
		)
		.unwrap();
		System::note_finished_extrinsics(ext).unwrap();
		System::deposit_event(ext, Event::NewAccount { account: account(3) }).unwrap();
		System::finalize(ext).unwrap();
		assert_eq!(
			records(ext),
			vec![
				EventRecord {
					phase: Phase::Initialization,
					event: RuntimeEvent::System(Event::NewAccount { account: account(32) }),
					topics: vec![],
				},
				EventRecord {
					phase: Phase::ApplyExtrinsic(0),
					event: RuntimeEvent::System(Event::KilledAccount { account: account(42) }),
					topics: vec![],
				},
				EventRecord {
					phase: Phase::ApplyExtrinsic(0),
					event: RuntimeEvent::System(Event::ExtrinsicSuccess {
						dispatch_info: DispatchInfo { weight: normal_base, ..Default::default() }
					}),
					topics: vec![],
				},
				EventRecord {
					phase: Phase::ApplyExtrinsic(1),
					event: RuntimeEvent::System(Event::ExtrinsicFailed {
						dispatch_error: DispatchError::BadOrigin,
						dispatch_info: DispatchInfo { weight: normal_base, ..Default::default() }
					}),
					topics: vec![],
				},
				EventRecord {
					phase: Phase::Finalization,
					event: RuntimeEvent::System(Event::NewAccount { account: account(3) }),
					topics: vec![],
				},
			]
		);
	});
}

#[test]
fn deposit_event_uses_actual_weight_and_pays_fee() {
	new_test_ext().execute_with(|ext| {
		System::reset_events(ext);
		System::initialize(ext, 1, &Hash::repeat_byte(69), &Default::default());
		System::note_finished_initialize(ext);

		let pre_info = DispatchInfo { weight: Weight::from_parts(1000, 0), ..Default::default() };
		let normal_base = <Test as Config>::BlockWeights::get()
			.get(DispatchClass::Normal)
			.base_extrinsic;

		System::note_applied_extrinsic(ext, &Ok(Some(Weight::from_parts(300, 0)).into()), pre_info)
			.unwrap();
		System::note_applied_extrinsic(
			ext,
			&Ok((Some(Weight::from_parts(2000, 0)), Pays::No).into()),
			pre_info,
		)
		.unwrap();
		System::note_applied_extrinsic(
			ext,
			&Err(DispatchErrorWithPostInfo {
				post_info: PostDispatchInfo {
					actual_weight: Some(Weight::from_parts(999, 0)),
					pays_fee: Pays::Yes,
				},
				error: DispatchError::BadOrigin,
			}),
			pre_info,
		)
		.unwrap();

		let infos = records(ext)
			.into_iter()
			.map(|r| match r.event {
				RuntimeEvent::System(Event::ExtrinsicSuccess { dispatch_info }) => dispatch_info,
				RuntimeEvent::System(Event::ExtrinsicFailed { dispatch_info, .. }) =>
					dispatch_info,
				other => panic!("unexpected event {:?}", other),
			})
			.collect::<Vec<_>>();

		assert_eq!(
			infos,
			vec![
				DispatchInfo { weight: Weight::from_parts(300, 0) + normal_base, ..Default::default() },
				// actual weight is capped at the pre-dispatch weight
				DispatchInfo {
					weight: Weight::from_parts(1000, 0) + normal_base,
					pays_fee: Pays::No,
					..Default::default()
				},
				DispatchInfo { weight: Weight::from_parts(999, 0) + normal_base, ..Default::default() },
			]
		);
	});
}

#[test]
fn deposit_event_topics() {
	new_test_ext().execute_with(|ext| {
		const BLOCK_NUMBER: BlockNumber = 1;

		System::reset_events(ext);
		System::initialize(ext, BLOCK_NUMBER, &Hash::repeat_byte(69), &Default::default());
		System::note_finished_extrinsics(ext).unwrap();

		let topics = vec![Hash::repeat_byte(1), Hash::repeat_byte(2), Hash::repeat_byte(3)];

		// We deposit a few events with different sets of topics.
		System::deposit_event_indexed(ext, &topics[0..3], Event::CodeUpdated.into()).unwrap();
		System::deposit_event_indexed(ext, &topics[0..1], Event::NewAccount { account: account(2) }.into())
			.unwrap();
		System::deposit_event_indexed(ext, &topics[1..2], Event::KilledAccount { account: account(3) }.into())
			.unwrap();

		System::finalize(ext).unwrap();

		// Check that topics are reflected in the event record.
		assert_eq!(
			records(ext),
			vec![
				EventRecord {
					phase: Phase::Finalization,
					event: RuntimeEvent::System(Event::CodeUpdated),
					topics: topics[0..3].to_vec(),
				},
				EventRecord {
					phase: Phase::Finalization,
					event: RuntimeEvent::System(Event::NewAccount { account: account(2) }),
					topics: topics[0..1].to_vec(),
				},
				EventRecord {
					phase: Phase::Finalization,
					event: RuntimeEvent::System(Event::KilledAccount { account: account(3) }),
					topics: topics[1..2].to_vec(),
				},
			]
		);

		// Check that the topic-events mapping reflects the deposited topics.
		// Note that these are indexes of the events.
		assert_eq!(EventTopics::get(ext, topics[0]).unwrap(), vec![(BLOCK_NUMBER, 0), (BLOCK_NUMBER, 1)]);
		assert_eq!(EventTopics::get(ext, topics[1]).unwrap(), vec![(BLOCK_NUMBER, 0), (BLOCK_NUMBER, 2)]);
		assert_eq!(EventTopics::get(ext, topics[2]).unwrap(), vec![(BLOCK_NUMBER, 0)]);

		System::reset_events(ext);
		assert!(records(ext).is_empty());
		assert!(EventTopics::get(ext, topics[0]).unwrap().is_empty());
	});
}

#[test]
fn prunes_block_hash_mappings() {
	new_test_ext().execute_with(|ext| {
		// simulate import of 15 blocks
		for n in 1..=15 {
			System::reset_events(ext);
			System::initialize(ext, n, &Hash::repeat_byte(n as u8), &Default::default());
			System::finalize(ext).unwrap();
		}

		// first 5 block hashes are pruned
		for n in 1..5 {
			assert!(!BlockHash::contains_key(ext, n));
		}

		// the remaining 10 are kept
		for n in 5..15 {
			assert_eq!(System::block_hash(ext, n).unwrap(), Hash::repeat_byte((n + 1) as u8));
		}

		// the genesis hash is never pruned
		assert_eq!(System::block_hash(ext, 0).unwrap(), Hash::repeat_byte(1));
	});
}

#[test]
fn initialize_records_parent_hash() {
	new_test_ext().execute_with(|ext| {
		System::initialize(ext, 7, &Hash::repeat_byte(7), &Default::default());
		assert_eq!(System::block_number(ext).unwrap(), 7);
		assert_eq!(System::parent_hash(ext).unwrap(), Hash::repeat_byte(7));
		assert_eq!(System::block_hash(ext, 6).unwrap(), Hash::repeat_byte(7));
		assert_eq!(System::execution_phase(ext).unwrap(), Some(Phase::Initialization));
		assert_eq!(System::extrinsic_index(ext).unwrap(), Some(0));
		// the weight registered before initialization belongs to the previous block
		assert_eq!(System::block_weight(ext).unwrap().total(), Weight::zero());
	});
}

#[test]
fn finalize_clears_block_scoped_entries() {
	new_test_ext().execute_with(|ext| {
		System::initialize(ext, 1, &Hash::repeat_byte(69), &Default::default());
		System::note_finished_initialize(ext);
		System::note_extrinsic(ext, vec![1, 2, 3]).unwrap();
		System::note_applied_extrinsic(ext, &Ok(().into()), Default::default()).unwrap();
		AllExtrinsicsLen::put(ext, 3u32);
		System::note_finished_extrinsics(ext).unwrap();
		assert_eq!(System::extrinsic_count(ext).unwrap(), 1);

		let header = System::finalize(ext).unwrap();
		assert_eq!(header.number, 1);
		assert_eq!(header.parent_hash, Hash::repeat_byte(69));
		assert_eq!(System::extrinsic_count(ext).unwrap(), 0);
		assert_eq!(System::all_extrinsics_len(ext).unwrap(), 0);
		assert_eq!(System::execution_phase(ext).unwrap(), None);
		assert_eq!(System::extrinsic_index(ext).unwrap(), None);
		assert!(!ExtrinsicData::contains_key(ext, 0u32));
		let expected_root = Hash::from_slice(&ext.ordered_trie_root(
			&[vec![1, 2, 3]],
			<Test as Config>::Version::get().extrinsics_root_state_version(),
		));
		assert_eq!(header.extrinsics_root, expected_root);
	});
}

#[test]
fn deposit_log_is_part_of_the_header() {
	new_test_ext().execute_with(|ext| {
		System::initialize(ext, 1, &Hash::repeat_byte(69), &Default::default());
		System::deposit_log(ext, generic::DigestItem::RuntimeEnvironmentUpdated).unwrap();
		let header = System::finalize(ext).unwrap();
		assert_eq!(header.digest.logs, vec![generic::DigestItem::RuntimeEnvironmentUpdated]);
	});
}

#[test]
fn remark_with_event_works() {
	new_test_ext().execute_with(|ext| {
		System::initialize(ext, 1, &Hash::repeat_byte(69), &Default::default());
		let remark = b"hello world".to_vec();
		assert_eq!(
			Call::<Test>::remark_with_event { remark: remark.clone() }
				.dispatch_bypass_filter(RawOrigin::None, ext)
				.map_err(|e| e.error),
			Err(DispatchError::BadOrigin)
		);
		assert!(Call::<Test>::remark_with_event { remark: remark.clone() }
			.dispatch_bypass_filter(RawOrigin::Signed(account(1)), ext)
			.is_ok());
		let hash = Hash::from(ext.blake2_256(&remark));
		assert_eq!(
			records(ext).pop().map(|r| r.event),
			Some(RuntimeEvent::System(Event::Remarked { sender: account(1), hash }))
		);
	});
}

#[test]
fn set_heap_pages_requires_root_and_updates_digest() {
	new_test_ext().execute_with(|ext| {
		System::initialize(ext, 1, &Hash::repeat_byte(69), &Default::default());
		assert!(Call::<Test>::set_heap_pages { pages: 64 }
			.dispatch_bypass_filter(RawOrigin::Signed(account(1)), ext)
			.is_err());
		assert!(Call::<Test>::set_heap_pages { pages: 64 }
			.dispatch_bypass_filter(RawOrigin::Root, ext)
			.is_ok());
		assert_eq!(storage::unhashed::get::<u64>(ext, well_known_keys::HEAP_PAGES).unwrap(), Some(64));
		assert_eq!(
			System::digest(ext).unwrap().logs,
			vec![generic::DigestItem::RuntimeEnvironmentUpdated]
		);
	});
}

#[test]
fn storage_calls_work_with_root() {
	new_test_ext().execute_with(|ext| {
		let items = vec![(b"hello".to_vec(), b"world".to_vec()), (b"hey".to_vec(), b"you".to_vec())];
		assert!(Call::<Test>::set_storage { items: items.clone() }
			.dispatch_bypass_filter(RawOrigin::Signed(account(1)), ext)
			.is_err());
		assert!(Call::<Test>::set_storage { items }
			.dispatch_bypass_filter(RawOrigin::Root, ext)
			.is_ok());
		assert_eq!(ext.storage(b"hello"), Some(b"world".to_vec()));

		assert!(Call::<Test>::kill_storage { keys: vec![b"hello".to_vec()] }
			.dispatch_bypass_filter(RawOrigin::Root, ext)
			.is_ok());
		assert_eq!(ext.storage(b"hello"), None);

		assert!(Call::<Test>::kill_prefix { prefix: b"he".to_vec(), subkeys: 1 }
			.dispatch_bypass_filter(RawOrigin::Root, ext)
			.is_ok());
		assert_eq!(ext.storage(b"hey"), None);
	});
}

#[test]
fn calls_decode_and_weigh() {
	let call = RuntimeCall::System(Call::remark_with_event { remark: vec![1, 2] });
	let encoded = call.encode();
	assert_eq!(encoded[..2], [0, 7]);
	assert_eq!(RuntimeCall::decode_call(&mut &encoded[..]).unwrap(), call);
	assert_eq!(call.get_dispatch_info().class, DispatchClass::Normal);
	assert_eq!(
		RuntimeCall::System(Call::set_heap_pages { pages: 1 }).get_dispatch_info().class,
		DispatchClass::Operational
	);
	assert!(matches!(
		RuntimeCall::decode_call(&mut &[0u8, 2][..]),
		Err(DecodeError::UnknownFunction(2))
	));
	assert!(matches!(
		RuntimeCall::decode_call(&mut &[9u8, 0][..]),
		Err(DecodeError::UnknownModule(9))
	));
}

#[test]
fn origin_helpers() {
	assert_eq!(ensure_signed(RawOrigin::Signed(account(1))), Ok(account(1)));
	assert_eq!(ensure_signed(RawOrigin::Root), Err(BadOrigin));
	assert_eq!(ensure_signed_or_root(RawOrigin::Root), Ok(None));
	assert_eq!(ensure_root(RawOrigin::None), Err(BadOrigin));
	assert_eq!(ensure_none(RawOrigin::None), Ok(()));
	assert_eq!(RawOrigin::from(Some(account(1))), RawOrigin::Signed(account(1)));
	assert_eq!(RawOrigin::from(None), RawOrigin::None);
}

#[test]
fn last_runtime_upgrade_is_set_at_genesis() {
	new_test_ext().execute_with(|ext| {
		let info = System::last_runtime_upgrade(ext).unwrap().unwrap();
		let mut version = <Test as Config>::Version::get();
		assert!(!info.was_upgraded(&version));
		version.spec_version += 1;
		assert!(info.was_upgraded(&version));
	});
}
