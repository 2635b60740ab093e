//! End-to-end supply scenarios against a registry with a recording sink

use std::collections::HashSet;
use std::sync::Arc;
use tally_supply::{
    AuditEvent, BurnMode, MetadataFields, OpaqueId, SupplyOptions, SupplyRegistry, TallyError,
};
use tally_testkit::{opaque_ids, RecordingAuditSink, SupplyFixture, TrustedOrigin};

struct Badge;

#[test]
fn unlimited_record_issues_one_at_a_time() {
    let fixture = SupplyFixture::new();
    let badges = fixture.create::<Badge>(SupplyOptions::unlimited());
    let ids = opaque_ids("badge", 3);

    let sequences: Vec<u64> = ids
        .iter()
        .map(|id| badges.record.issue_one(&badges.issuance, *id).unwrap())
        .collect();
    assert_eq!(sequences, vec![1, 2, 3]);

    let snapshot = badges.record.snapshot();
    assert_eq!(snapshot.issued, 3);
    assert_eq!(snapshot.retired, 0);
    assert_eq!(snapshot.cap, None);
    assert_eq!(snapshot.tracked, 3);

    let owners: HashSet<_> = ids.iter().map(|id| badges.record.lookup(id)).collect();
    assert_eq!(owners.len(), 1);
    assert!(owners.contains(&Some(badges.record.id())));

    assert_eq!(fixture.sink.count_of("issued"), 3);
    let issuers: HashSet<_> = fixture
        .events()
        .into_iter()
        .filter_map(|e| match e {
            AuditEvent::Issued { issuer, .. } => Some(issuer),
            _ => None,
        })
        .collect();
    assert_eq!(issuers, HashSet::from([badges.issuance.id()]));
}

#[test]
fn capped_record_rejects_issue_past_cap() {
    let fixture = SupplyFixture::new();
    let badges = fixture.create::<Badge>(SupplyOptions::capped(5));

    badges
        .record
        .issue_batch(&badges.issuance, &opaque_ids("badge", 5))
        .unwrap();
    assert_eq!(badges.record.issued(), 5);
    assert_eq!(badges.record.remaining(), Some(0));

    let err = badges
        .record
        .issue_one(&badges.issuance, OpaqueId::derive("badge-extra"))
        .unwrap_err();
    assert!(matches!(
        err,
        TallyError::SupplyExceeded {
            requested: 1,
            issued: 5,
            cap: 5,
            ..
        }
    ));
    assert_eq!(badges.record.issued(), 5);
    assert!(!badges.record.is_tracked(&OpaqueId::derive("badge-extra")));
    assert_eq!(fixture.sink.count_of("batch_issued"), 1);
    assert_eq!(fixture.sink.count_of("issued"), 0);
}

#[test]
fn decentralized_record_only_retires_by_holder() {
    struct Ticket;

    // A second registry is the only way to hold a retirement authority for
    // the same type as a decentralized record.
    let other = SupplyRegistry::new(Arc::new(RecordingAuditSink::new()));
    let foreign = other
        .register::<Ticket, _>(TrustedOrigin::<Ticket>::new())
        .unwrap()
        .create(SupplyOptions::unlimited());
    let foreign_retirement = foreign.retirement.unwrap();

    let fixture = SupplyFixture::new();
    let tickets = fixture
        .create::<Ticket>(SupplyOptions::unlimited().with_burn_mode(BurnMode::Decentralized));
    assert!(tickets.retirement.is_none());

    let id = OpaqueId::derive("ticket-1");
    tickets.record.issue_one(&tickets.issuance, id).unwrap();

    let err = tickets
        .record
        .retire_centralized(&foreign_retirement, id)
        .unwrap_err();
    assert!(matches!(err, TallyError::WrongBurnMode { .. }));
    assert!(err.is_permanent());
    assert_eq!(tickets.record.retired(), 0);

    tickets.record.retire_by_holder(id).unwrap();
    assert_eq!(tickets.record.retired(), 1);
    assert_eq!(tickets.record.supply(), 0);

    let events = fixture.events();
    assert!(matches!(
        events.last(),
        Some(AuditEvent::Retired {
            retirer_kind: tally_supply::RetirerKind::Holder,
            ..
        })
    ));
}

#[test]
fn finalize_pins_cap_once() {
    let fixture = SupplyFixture::new();
    let badges = fixture.create::<Badge>(SupplyOptions::unlimited());

    for id in opaque_ids("badge", 10) {
        badges.record.issue_one(&badges.issuance, id).unwrap();
    }
    assert_eq!(badges.record.finalize(&badges.metadata).unwrap(), 10);
    assert_eq!(badges.record.cap(), Some(10));

    assert!(matches!(
        badges
            .record
            .issue_one(&badges.issuance, OpaqueId::derive("badge-10")),
        Err(TallyError::SupplyExceeded { .. })
    ));

    let err = badges.record.finalize(&badges.metadata).unwrap_err();
    assert!(matches!(err, TallyError::AlreadyFinalized { cap: 10, .. }));
    assert!(err.is_permanent());
    assert_eq!(fixture.sink.count_of("supply_finalized"), 1);
}

#[test]
fn lookup_of_unissued_id() {
    let fixture = SupplyFixture::new();
    let badges = fixture.create::<Badge>(SupplyOptions::unlimited());
    let never = OpaqueId::derive("never-issued");

    assert_eq!(badges.record.lookup(&never), None);
    assert!(matches!(
        badges.record.require_lookup(&never),
        Err(TallyError::NotTracked { .. })
    ));
}

#[test]
fn reissuing_an_id_is_a_duplicate_attachment() {
    let fixture = SupplyFixture::new();
    let badges = fixture.create::<Badge>(SupplyOptions::unlimited());
    let taken = OpaqueId::derive("badge-1");
    badges.record.issue_one(&badges.issuance, taken).unwrap();
    let before = badges.record.snapshot();

    assert!(matches!(
        badges.record.issue_one(&badges.issuance, taken),
        Err(TallyError::DuplicateAttachment { .. })
    ));

    let fresh = OpaqueId::derive("badge-2");
    assert!(matches!(
        badges.record.issue_batch(&badges.issuance, &[fresh, taken]),
        Err(TallyError::DuplicateAttachment { .. })
    ));
    assert!(matches!(
        badges.record.issue_batch(&badges.issuance, &[fresh, fresh]),
        Err(TallyError::DuplicateAttachment { .. })
    ));

    assert_eq!(badges.record.snapshot(), before);
    assert!(!badges.record.is_tracked(&fresh));
    assert_eq!(fixture.sink.count_of("issued"), 1);
    assert_eq!(fixture.sink.count_of("batch_issued"), 0);
}

#[test]
fn centralized_record_rejects_holder_retirement() {
    let fixture = SupplyFixture::new();
    let badges = fixture.create::<Badge>(SupplyOptions::unlimited());
    let id = OpaqueId::derive("badge-1");
    badges.record.issue_one(&badges.issuance, id).unwrap();

    assert!(matches!(
        badges.record.retire_by_holder(id),
        Err(TallyError::WrongBurnMode { .. })
    ));
    assert_eq!(badges.record.retired(), 0);
}

#[test]
fn frozen_metadata_is_permanent() {
    let fixture = SupplyFixture::new();
    let badges = fixture.create::<Badge>(SupplyOptions::unlimited());

    badges
        .record
        .record_metadata_change(&badges.metadata, MetadataFields::DESCRIPTION)
        .unwrap();
    badges.record.pause(&badges.metadata).unwrap();
    badges.record.freeze_metadata(badges.metadata).unwrap();

    // Paused forever: nothing can resume it.
    assert!(badges.record.is_metadata_frozen());
    assert!(badges.record.is_paused());
    assert!(matches!(
        badges
            .record
            .issue_one(&badges.issuance, OpaqueId::derive("badge-1")),
        Err(TallyError::Paused { .. })
    ));

    let types: Vec<_> = fixture.events().iter().map(|e| e.event_type()).collect();
    assert_eq!(
        types,
        vec![
            "registry_initialized",
            "record_registered",
            "metadata_changed",
            "paused",
            "metadata_frozen"
        ]
    );
}

#[test]
fn handles_share_one_record_across_threads() {
    let fixture = SupplyFixture::new();
    let badges = Arc::new(fixture.create::<Badge>(SupplyOptions::capped(40)));

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let badges = Arc::clone(&badges);
            std::thread::spawn(move || {
                let mut accepted = 0u64;
                for id in opaque_ids(&format!("worker-{worker}"), 10) {
                    if badges.record.issue_one(&badges.issuance, id).is_ok() {
                        accepted += 1;
                    }
                }
                accepted
            })
        })
        .collect();
    let accepted: u64 = workers.into_iter().map(|w| w.join().unwrap()).sum();

    assert_eq!(accepted, 40);
    assert_eq!(badges.record.issued(), 40);
    assert_eq!(badges.record.tracked_count(), 40);
    assert_eq!(fixture.sink.count_of("issued"), 40);
}
