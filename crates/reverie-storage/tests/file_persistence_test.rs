//! File-backed persistence: restart survival, WAL mode, migration idempotence.

use chrono::Utc;
use reverie_core::config::StorageConfig;
use reverie_core::models::{FeatureWeights, ModelWeights};
use reverie_core::observation::ObservationType;
use reverie_core::traits::{IModelStore, IObservationStore};
use reverie_storage::migrations::LATEST_VERSION;
use reverie_storage::pool::pragmas::verify_wal_mode;
use reverie_storage::StorageEngine;
use test_fixtures::ObservationBuilder;

#[test]
fn observations_and_weights_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reverie.db");

    {
        let engine = StorageEngine::open(&path).unwrap();
        engine
            .insert(
                &ObservationBuilder::new(1, ObservationType::Bugfix)
                    .title("persisted")
                    .build(),
            )
            .unwrap();
        engine.mark_superseded(1, 2).unwrap();
        engine
            .append_model_weights(&ModelWeights {
                weights: FeatureWeights::default(),
                examples_used: 75,
                loss: 0.3,
                accuracy: 0.9,
                trained_at: Utc::now(),
            })
            .unwrap();
    }

    let engine = StorageEngine::open(&path).unwrap();
    let back = engine.get(1).unwrap().unwrap();
    assert_eq!(back.title.as_deref(), Some("persisted"));
    assert_eq!(back.superseded_by, Some(2));
    assert_eq!(
        engine.latest_model_weights().unwrap().unwrap().examples_used,
        75
    );
}

#[test]
fn file_backed_engine_uses_wal() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open(&dir.path().join("wal.db")).unwrap();
    let wal = engine
        .pool()
        .writer
        .with_conn_sync(verify_wal_mode)
        .unwrap();
    assert!(wal);
}

#[test]
fn reopening_does_not_rerun_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migrate.db");
    let config = StorageConfig {
        db_path: path.to_string_lossy().into_owned(),
        read_pool_size: 2,
    };
    let first = StorageEngine::open_with_config(&config).unwrap();
    assert_eq!(first.schema_version().unwrap(), LATEST_VERSION);
    assert_eq!(first.pool().readers.size(), 2);
    drop(first);

    let second = StorageEngine::open_with_config(&config).unwrap();
    assert_eq!(second.schema_version().unwrap(), LATEST_VERSION);
}

#[test]
fn reads_go_through_pool_after_write() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open(&dir.path().join("pool.db")).unwrap();
    for id in 1..=4 {
        engine
            .insert(&ObservationBuilder::new(id, ObservationType::Feature).project("p").build())
            .unwrap();
    }
    // Every reader in the round-robin sees the committed rows.
    for _ in 0..8 {
        assert_eq!(engine.get_non_deprecated_observations("p").unwrap().len(), 4);
    }
}
