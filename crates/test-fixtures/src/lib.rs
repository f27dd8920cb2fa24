//! Shared test fixtures: observation builders, a scripted similarity provider,
//! and loaders for the golden scenario files under `golden/`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use reverie_core::errors::{ReverieResult, SimilarityError};
use reverie_core::models::{SimilarityFilter, SimilarityMatches};
use reverie_core::observation::{MemoryTier, Observation, ObservationId, ObservationType};
use reverie_core::traits::ISimilarityProvider;

// ── golden files ──

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Observation as written in a golden file. Times are relative to "now".
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationFixture {
    pub id: ObservationId,
    #[serde(default = "default_project")]
    pub project: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(rename = "type")]
    pub observation_type: ObservationType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub narrative: Option<String>,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub files_modified: Vec<String>,
    pub hours_ago: f64,
    #[serde(default)]
    pub reference_count: u64,
}

fn default_project() -> String {
    "golden".to_string()
}

impl ObservationFixture {
    pub fn to_observation(&self) -> Observation {
        let mut builder = ObservationBuilder::new(self.id, self.observation_type)
            .project(&self.project)
            .hours_ago(self.hours_ago)
            .concepts(&self.concepts.iter().map(String::as_str).collect::<Vec<_>>())
            .files_modified(&self.files_modified.iter().map(String::as_str).collect::<Vec<_>>())
            .reference_count(self.reference_count);
        if let Some(title) = &self.title {
            builder = builder.title(title);
        }
        if let Some(narrative) = &self.narrative {
            builder = builder.narrative(narrative);
        }
        if let Some(session) = &self.session_id {
            builder = builder.session(session);
        }
        builder.build()
    }
}

/// A golden supersession scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct SupersessionScenario {
    pub description: String,
    pub observations: Vec<ObservationFixture>,
    /// Expected `(older_id, newer_id)` links, in ranked order.
    pub expected_pairs: Vec<(ObservationId, ObservationId)>,
}

impl SupersessionScenario {
    pub fn load(name: &str) -> Self {
        load_fixture(&format!("supersession/{name}.json"))
    }

    pub fn observations(&self) -> Vec<Observation> {
        self.observations.iter().map(|o| o.to_observation()).collect()
    }
}

// ── builders ──

/// Fluent builder for observations. Defaults: project "test", created now, working tier.
#[derive(Debug, Clone)]
pub struct ObservationBuilder {
    obs: Observation,
}

impl ObservationBuilder {
    pub fn new(id: ObservationId, observation_type: ObservationType) -> Self {
        Self {
            obs: Observation {
                id,
                project: "test".to_string(),
                session_id: None,
                observation_type,
                title: None,
                subtitle: None,
                narrative: None,
                facts: Vec::new(),
                concepts: Vec::new(),
                files_read: Vec::new(),
                files_modified: Vec::new(),
                created_at: Utc::now(),
                superseded_by: None,
                deprecated: false,
                deprecated_at: None,
                deprecation_reason: None,
                memory_tier: MemoryTier::Working,
                memory_tier_updated_at: None,
                reference_count: 0,
                last_accessed_at: None,
            },
        }
    }

    pub fn project(mut self, project: &str) -> Self {
        self.obs.project = project.to_string();
        self
    }

    pub fn session(mut self, session_id: &str) -> Self {
        self.obs.session_id = Some(session_id.to_string());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.obs.title = Some(title.to_string());
        self
    }

    pub fn narrative(mut self, narrative: &str) -> Self {
        self.obs.narrative = Some(narrative.to_string());
        self
    }

    pub fn concepts(mut self, concepts: &[&str]) -> Self {
        self.obs.concepts = concepts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn files_modified(mut self, files: &[&str]) -> Self {
        self.obs.files_modified = files.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.obs.created_at = at;
        self
    }

    /// Created `hours` before now. Fractional hours are honoured to the millisecond.
    pub fn hours_ago(self, hours: f64) -> Self {
        self.created_at(Utc::now() - Duration::milliseconds((hours * 3_600_000.0) as i64))
    }

    pub fn days_ago(self, days: f64) -> Self {
        self.hours_ago(days * 24.0)
    }

    pub fn last_accessed_days_ago(mut self, days: f64) -> Self {
        self.obs.last_accessed_at =
            Some(Utc::now() - Duration::milliseconds((days * 86_400_000.0) as i64));
        self
    }

    pub fn reference_count(mut self, count: u64) -> Self {
        self.obs.reference_count = count;
        self
    }

    pub fn superseded_by(mut self, id: ObservationId) -> Self {
        self.obs.superseded_by = Some(id);
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.obs.deprecated = true;
        self.obs.deprecated_at = Some(Utc::now());
        self.obs.deprecation_reason = Some("fixture".to_string());
        self
    }

    pub fn tier(mut self, tier: MemoryTier) -> Self {
        self.obs.memory_tier = tier;
        self
    }

    pub fn build(self) -> Observation {
        self.obs
    }
}

// ── similarity provider ──

/// Similarity provider that answers from a script keyed by query text.
///
/// Unknown queries return no matches. Every call is counted.
#[derive(Debug, Default)]
pub struct ScriptedSimilarity {
    responses: HashMap<String, SimilarityMatches>,
    failing: bool,
    unavailable: bool,
    calls: AtomicUsize,
}

impl ScriptedSimilarity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `(id, distance)` pairs, closest first.
    pub fn respond(mut self, query: &str, matches: &[(ObservationId, f64)]) -> Self {
        self.responses.insert(
            query.to_string(),
            SimilarityMatches {
                ids: matches.iter().map(|(id, _)| *id).collect(),
                distances: matches.iter().map(|(_, d)| *d).collect(),
            },
        );
        self
    }

    /// Every query times out.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Reports itself as unavailable and refuses queries.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ISimilarityProvider for ScriptedSimilarity {
    fn query_similar(
        &self,
        text: &str,
        top_k: usize,
        _filter: &SimilarityFilter,
    ) -> ReverieResult<SimilarityMatches> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(SimilarityError::Unavailable {
                provider: self.name().to_string(),
            }
            .into());
        }
        if self.failing {
            return Err(SimilarityError::Timeout { elapsed_ms: 5_000 }.into());
        }
        let mut matches = self.responses.get(text).cloned().unwrap_or_default();
        matches.ids.truncate(top_k);
        matches.distances.truncate(top_k);
        Ok(matches)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        !self.unavailable
    }
}
