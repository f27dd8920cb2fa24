//! StorageEngine: owns the connection pool and implements the observation and model stores.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use reverie_core::config::StorageConfig;
use reverie_core::errors::ReverieResult;
use reverie_core::models::{ModelWeights, TierStats, TrainingExample};
use reverie_core::observation::{MemoryTier, Observation, ObservationId};
use reverie_core::traits::{IModelStore, IObservationStore};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{
    lifecycle_ops, observation_crud, observation_query, training_ops, weights_ops,
};

/// The main storage engine.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// File-backed engines read through the pool. In-memory engines read
    /// through the writer because pooled in-memory connections are separate databases.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a file-backed engine with the default read pool size.
    pub fn open(path: &Path) -> ReverieResult<Self> {
        Self::open_with_pool_size(path, StorageConfig::default().read_pool_size)
    }

    pub fn open_with_config(config: &StorageConfig) -> ReverieResult<Self> {
        Self::open_with_pool_size(Path::new(&config.db_path), config.read_pool_size)
    }

    fn open_with_pool_size(path: &Path, read_pool_size: usize) -> ReverieResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        info!(path = %path.display(), read_pool_size, "storage engine opened");
        Ok(engine)
    }

    /// Open an in-memory engine (for tests).
    pub fn open_in_memory() -> ReverieResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open_in_memory()?,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> ReverieResult<()> {
        let version = self.with_writer(migrations::run_migrations)?;
        debug!(version, "storage initialized");
        Ok(())
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Schema version currently recorded in the database.
    pub fn schema_version(&self) -> ReverieResult<u32> {
        self.pool.writer.with_conn_sync(migrations::current_version)
    }

    fn with_reader<F, T>(&self, f: F) -> ReverieResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> ReverieResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }

    fn with_writer<F, T>(&self, f: F) -> ReverieResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> ReverieResult<T>,
    {
        self.pool.writer.with_conn_sync(f)
    }
}

impl IObservationStore for StorageEngine {
    fn insert(&self, observation: &Observation) -> ReverieResult<ObservationId> {
        self.with_writer(|conn| observation_crud::insert_observation(conn, observation))
    }

    fn get(&self, id: ObservationId) -> ReverieResult<Option<Observation>> {
        self.with_reader(|conn| observation_crud::get_observation(conn, id))
    }

    fn get_active_observations(
        &self,
        project: &str,
        after: DateTime<Utc>,
        limit: usize,
    ) -> ReverieResult<Vec<Observation>> {
        self.with_reader(|conn| observation_query::active_since(conn, project, after, limit))
    }

    fn get_session_observations(&self, session_id: &str) -> ReverieResult<Vec<Observation>> {
        self.with_reader(|conn| observation_query::by_session(conn, session_id))
    }

    fn get_non_deprecated_observations(&self, project: &str) -> ReverieResult<Vec<Observation>> {
        self.with_reader(|conn| observation_query::non_deprecated(conn, project))
    }

    fn get_observations_by_memory_tier(
        &self,
        project: &str,
        tier: MemoryTier,
        limit: usize,
    ) -> ReverieResult<Vec<Observation>> {
        self.with_reader(|conn| observation_query::by_memory_tier(conn, project, tier, limit))
    }

    fn get_superseded_observations(
        &self,
        project: &str,
        limit: usize,
    ) -> ReverieResult<Vec<Observation>> {
        self.with_reader(|conn| observation_query::superseded(conn, project, limit))
    }

    fn get_superseded_before(
        &self,
        project: Option<&str>,
        before: DateTime<Utc>,
    ) -> ReverieResult<Vec<Observation>> {
        self.with_reader(|conn| observation_query::superseded_before(conn, project, before))
    }

    fn get_supersession_pairs(
        &self,
        project: Option<&str>,
        limit: usize,
    ) -> ReverieResult<Vec<(Observation, Observation)>> {
        self.with_reader(|conn| observation_query::supersession_pairs(conn, project, limit))
    }

    fn list_projects(&self) -> ReverieResult<Vec<String>> {
        self.with_reader(observation_query::list_projects)
    }

    fn mark_superseded(&self, older: ObservationId, newer: ObservationId) -> ReverieResult<bool> {
        self.with_writer(|conn| lifecycle_ops::mark_superseded(conn, older, newer))
    }

    fn deprecate(&self, id: ObservationId, reason: &str, at: DateTime<Utc>) -> ReverieResult<bool> {
        self.with_writer(|conn| lifecycle_ops::deprecate(conn, id, reason, at))
    }

    fn set_memory_tier(
        &self,
        id: ObservationId,
        tier: MemoryTier,
        at: DateTime<Utc>,
    ) -> ReverieResult<bool> {
        self.with_writer(|conn| lifecycle_ops::set_memory_tier(conn, id, tier, at))
    }

    fn increment_reference_count(
        &self,
        id: ObservationId,
        at: DateTime<Utc>,
    ) -> ReverieResult<bool> {
        self.with_writer(|conn| lifecycle_ops::increment_reference_count(conn, id, at))
    }

    fn update_last_accessed(&self, id: ObservationId, at: DateTime<Utc>) -> ReverieResult<bool> {
        self.with_writer(|conn| lifecycle_ops::update_last_accessed(conn, id, at))
    }

    fn memory_tier_counts(&self, project: &str) -> ReverieResult<TierStats> {
        self.with_reader(|conn| observation_query::memory_tier_counts(conn, project))
    }
}

impl IModelStore for StorageEngine {
    fn append_training_example(&self, example: &TrainingExample) -> ReverieResult<()> {
        self.with_writer(|conn| training_ops::append_example(conn, example))
    }

    fn recent_training_examples(&self, limit: usize) -> ReverieResult<Vec<TrainingExample>> {
        self.with_reader(|conn| training_ops::recent_examples(conn, limit))
    }

    fn count_training_examples_since(&self, since: DateTime<Utc>) -> ReverieResult<usize> {
        self.with_reader(|conn| training_ops::count_since(conn, since))
    }

    fn append_model_weights(&self, weights: &ModelWeights) -> ReverieResult<()> {
        self.with_writer(|conn| weights_ops::append_weights(conn, weights))
    }

    fn latest_model_weights(&self) -> ReverieResult<Option<ModelWeights>> {
        self.with_reader(weights_ops::latest_weights)
    }
}
