//! # Ledger Integration Tests
//!
//! End-to-end behaviour of `MedicalLedger` through the `MedicalRecordsApi`
//! port.
//!
//! ## Test Categories
//!
//! 1. **Scenarios** - create/update/delete lifecycles
//! 2. **Tampering** - any edited block breaks validation at or after itself
//! 3. **Replay** - the patient index is derivable from the chain
//! 4. **Concurrency** - parallel appends keep the chain linear and valid

use chrono::{Duration, TimeZone, Utc};
use medchain_ledger::{
    Block, Chain, FaultKind, LedgerConfig, LedgerError, MedicalLedger, MedicalRecordsApi,
    PatientIndex, RecordChange, RecordFields, SteppingTimeSource,
};
use medchain_telemetry::{init_telemetry, TelemetryConfig};
use std::sync::{Arc, Once};

// =============================================================================
// TEST HELPERS
// =============================================================================

static TELEMETRY: Once = Once::new();

fn init_logging() {
    TELEMETRY.call_once(|| {
        let config = TelemetryConfig {
            log_level: "warn".to_string(),
            ..TelemetryConfig::default()
        };
        if let Ok(guard) = init_telemetry(config) {
            std::mem::forget(guard);
        }
    });
}

fn clock() -> Arc<SteppingTimeSource> {
    let start = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
    Arc::new(SteppingTimeSource::new(start, Duration::milliseconds(1500)))
}

fn make_ledger(difficulty: usize) -> MedicalLedger {
    init_logging();
    MedicalLedger::with_clock(LedgerConfig::default().with_difficulty(difficulty), clock()).unwrap()
}

fn fields(name: &str, diagnosis: &str) -> RecordFields {
    RecordFields::new(name, diagnosis, "Fluids and rest", "2026-10-17")
}

/// Ledger with three patients, one updated and one deleted
fn populated_ledger(difficulty: usize) -> MedicalLedger {
    let ledger = make_ledger(difficulty);
    let alice = ledger.append_create(fields("Alice Smith", "Flu")).unwrap();
    let bob = ledger.append_create(fields("Bob Jones", "Fracture")).unwrap();
    ledger.append_create(fields("Carol White", "Asthma")).unwrap();
    ledger
        .append_update(&alice.patient_id, fields("Alice Smith", "Bronchitis"))
        .unwrap();
    ledger.append_delete(&bob.patient_id).unwrap();
    ledger
}

fn rebuild_with(ledger: &MedicalLedger, tamper: impl FnOnce(&mut Vec<Block>)) -> MedicalLedger {
    let mut blocks = ledger.chain_snapshot().blocks().to_vec();
    tamper(&mut blocks);
    let chain = Chain::from_blocks(blocks).unwrap();
    MedicalLedger::from_chain(ledger.config().clone(), chain, clock()).unwrap()
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_create_then_delete_scenario() {
    let ledger = make_ledger(2);

    let receipt = ledger.append_create(fields("Alice Smith", "Flu")).unwrap();
    assert!(receipt.patient_id.starts_with("alicesmi_"));
    assert!(receipt.block_hash.starts_with("00"));

    let active = ledger.list_active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].change.patient_id(), Some(receipt.patient_id.as_str()));
    assert_eq!(active[0].hash, receipt.block_hash);

    ledger.append_delete(&receipt.patient_id).unwrap();
    assert!(ledger.list_active().is_empty());

    let history = ledger.history(&receipt.patient_id);
    assert_eq!(history.len(), 2);
    assert!(matches!(history[0].change, RecordChange::Create(_)));
    assert!(matches!(history[1].change, RecordChange::Delete(_)));
    assert!(!history[0].deleted);
    assert!(history[1].deleted);
    assert!(history[0].index < history[1].index);

    let tombstone = serde_json::to_value(&history[1]).unwrap();
    assert_eq!(tombstone["deleted"], true);
    assert_eq!(tombstone["patientName"], "Alice Smith");
}

#[test]
fn test_update_unknown_patient_is_not_found() {
    let ledger = make_ledger(1);
    ledger.append_create(fields("Alice Smith", "Flu")).unwrap();
    let before = ledger.chain_length();

    let err = ledger
        .append_update("ghost_0_0", fields("Ghost", "None"))
        .unwrap_err();

    assert!(matches!(err, LedgerError::NotFound { ref patient_id } if patient_id == "ghost_0_0"));
    assert!(err.is_recoverable());
    assert_eq!(ledger.chain_length(), before);
}

#[test]
fn test_delete_unknown_patient_is_not_found() {
    let ledger = make_ledger(0);
    let err = ledger.append_delete("nobody").unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
    assert_eq!(ledger.chain_length(), 1);
}

#[test]
fn test_update_after_delete_is_not_found() {
    let ledger = make_ledger(0);
    let receipt = ledger.append_create(fields("Erin", "Otitis")).unwrap();
    ledger.append_delete(&receipt.patient_id).unwrap();

    let err = ledger
        .append_update(&receipt.patient_id, fields("Erin", "Otitis"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
    assert_eq!(ledger.history(&receipt.patient_id).len(), 2);
}

#[test]
fn test_update_links_audit_trail() {
    let ledger = make_ledger(1);
    let receipt = ledger.append_create(fields("Frank", "Gout")).unwrap();
    let first = ledger
        .append_update(&receipt.patient_id, fields("Frank", "Gout, improving"))
        .unwrap();
    let second = ledger.append_delete(&receipt.patient_id).unwrap();

    let history = ledger.history(&receipt.patient_id);
    let trail: Vec<Option<&str>> = history
        .iter()
        .map(|view| match &view.change {
            RecordChange::Update(record) => Some(record.previous_hash.as_str()),
            RecordChange::Delete(record) => Some(record.previous_hash.as_str()),
            _ => None,
        })
        .collect();

    assert_eq!(
        trail,
        vec![None, Some(receipt.block_hash.as_str()), Some(first.as_str())]
    );
    assert_eq!(history[2].hash, second);
}

#[test]
fn test_validation_report_counts() {
    let ledger = populated_ledger(1);
    let report = ledger.validate_chain();

    assert!(report.valid);
    assert_eq!(report.chain_length, 6);
    assert_eq!(report.patient_count, 2);
    assert!(report.fault.is_none());
    assert_eq!(ledger.metrics().get_validations_run(), 1);
}

#[test]
fn test_every_mined_hash_meets_difficulty_and_rehashes() {
    let ledger = populated_ledger(2);
    let chain = ledger.chain_snapshot();

    for block in chain.blocks().iter().skip(1) {
        assert!(block.hash.starts_with("00"), "block {} under target", block.index);
        assert_eq!(block.calculate_hash().unwrap(), block.hash);
    }
    assert_eq!(chain.genesis().nonce, 0);
    assert_eq!(ledger.metrics().get_blocks_appended(), 5);
}

#[test]
fn test_views_serialize_like_flat_records() {
    let ledger = make_ledger(0);
    let receipt = ledger.append_create(fields("Gina", "Anemia")).unwrap();
    let view = ledger.latest_record(&receipt.patient_id).unwrap();
    let value = serde_json::to_value(&view).unwrap();

    assert_eq!(value["type"], "create");
    assert_eq!(value["patientId"], receipt.patient_id.as_str());
    assert_eq!(value["diagnosis"], "Anemia");
    assert_eq!(value["deleted"], false);
    assert_eq!(value["index"], 1);
    assert_eq!(value["timestamp"], "2026-10-18T09:30:01.500Z");
}

// =============================================================================
// TAMPERING
// =============================================================================

#[test]
fn test_tampered_payload_detected_at_block() {
    let ledger = populated_ledger(1);
    let tampered = rebuild_with(&ledger, |blocks| {
        if let RecordChange::Create(record) = &mut blocks[2].payload {
            record.diagnosis = "Nothing wrong".to_string();
        }
    });

    let report = tampered.validate_chain();
    assert!(!report.valid);
    let fault = report.fault.unwrap();
    assert_eq!(fault.index, 2);
    assert_eq!(fault.kind, FaultKind::HashMismatch);
}

#[test]
fn test_every_single_field_tamper_is_detected() {
    let ledger = populated_ledger(1);
    let length = ledger.chain_length();

    for target in 1..length {
        let tampers: Vec<(&str, Box<dyn Fn(&mut Block)>)> = vec![
            ("hash", Box::new(|b: &mut Block| b.hash = "0".repeat(64))),
            (
                "previous_hash",
                Box::new(|b: &mut Block| b.previous_hash = "f".repeat(64)),
            ),
            ("nonce", Box::new(|b: &mut Block| b.nonce += 1)),
            (
                "payload",
                Box::new(|b: &mut Block| {
                    b.payload = RecordChange::Genesis {
                        message: "forged".to_string(),
                    }
                }),
            ),
        ];

        for (field, tamper) in tampers {
            let rebuilt = rebuild_with(&ledger, |blocks| tamper(&mut blocks[target]));
            let report = rebuilt.validate_chain();
            assert!(!report.valid, "{} tamper at {} undetected", field, target);
            assert!(
                report.fault.unwrap().index >= target as u64,
                "{} tamper at {} reported too early",
                field,
                target
            );
        }
    }
}

#[test]
fn test_recomputed_hash_breaks_next_link() {
    let ledger = populated_ledger(0);
    let tampered = rebuild_with(&ledger, |blocks| {
        blocks[1].nonce = 99;
        blocks[1].hash = blocks[1].calculate_hash().unwrap();
    });

    let fault = tampered.validate_chain().fault.unwrap();
    assert_eq!(fault.index, 2);
    assert_eq!(fault.kind, FaultKind::BrokenLink);
}

#[test]
fn test_tampered_genesis_detected() {
    let ledger = populated_ledger(0);
    let tampered = rebuild_with(&ledger, |blocks| {
        blocks[0].payload = RecordChange::Genesis {
            message: "Rewritten history".to_string(),
        };
    });

    let report = tampered.validate_chain();
    assert!(!report.valid);
    assert_eq!(report.fault.unwrap().kind, FaultKind::BadGenesis);
    assert!(!tampered.chain_info().is_valid);
}

// =============================================================================
// REPLAY
// =============================================================================

#[test]
fn test_index_is_derivable_from_chain() {
    let ledger = populated_ledger(0);
    let replayed = MedicalLedger::from_chain(
        ledger.config().clone(),
        ledger.chain_snapshot(),
        clock(),
    )
    .unwrap();

    let ids = |l: &MedicalLedger| -> Vec<String> {
        l.list_active()
            .iter()
            .filter_map(|view| view.change.patient_id().map(str::to_string))
            .collect()
    };
    assert_eq!(ids(&ledger), ids(&replayed));
    assert_eq!(
        PatientIndex::rebuild(&ledger.chain_snapshot()).len(),
        ledger.validate_chain().patient_count
    );
}

#[test]
fn test_replayed_ledger_keeps_appending() {
    let ledger = populated_ledger(1);
    let replayed =
        MedicalLedger::from_chain(ledger.config().clone(), ledger.chain_snapshot(), clock())
            .unwrap();

    let receipt = replayed.append_create(fields("Hank", "Sinusitis")).unwrap();
    assert_eq!(replayed.chain_length(), 7);
    assert!(replayed.validate_chain().valid);
    assert!(replayed.latest_record(&receipt.patient_id).is_some());
}

// =============================================================================
// CONCURRENCY
// =============================================================================

#[test]
fn test_parallel_appends_stay_linear() {
    let ledger = Arc::new(make_ledger(1));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || {
                for i in 0..5 {
                    let name = format!("Worker{} Patient{}", worker, i);
                    let receipt = ledger.append_create(fields(&name, "Checkup")).unwrap();
                    ledger
                        .append_update(&receipt.patient_id, fields(&name, "Follow-up"))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let report = ledger.validate_chain();
    assert!(report.valid);
    assert_eq!(report.chain_length, 1 + 4 * 5 * 2);
    assert_eq!(report.patient_count, 20);

    let chain = ledger.chain_snapshot();
    for (position, block) in chain.blocks().iter().enumerate() {
        assert_eq!(block.index, position as u64);
    }
}
