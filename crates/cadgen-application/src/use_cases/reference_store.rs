//! Reference Store Use Case
//!
//! In-memory view of the reference library backed by a
//! [`ReferenceRepository`]. Readers take a snapshot without locking;
//! writers are serialised and publish a new snapshot only after the
//! repository accepted the change.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use arc_swap::ArcSwap;
use cadgen_domain::entities::ReferenceExample;
use cadgen_domain::error::{Error, Result};
use cadgen_domain::repositories::ReferenceRepository;
use cadgen_domain::value_objects::ComplexityTier;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain_services::script::{derive_parameter_specs, detect_features};

/// Fields supplied when adding a reference
#[derive(Debug, Clone, PartialEq)]
pub struct NewReference {
    pub name: String,
    pub description: String,
    pub script: String,
    pub complexity: ComplexityTier,
    pub category: String,
}

/// Library statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LibraryStats {
    pub total: usize,
    pub by_complexity: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
}

#[derive(Debug, Default)]
struct StoreState {
    examples: Vec<Arc<ReferenceExample>>,
    by_name: HashMap<String, usize>,
}

/// Hand-written records may omit their parameter table and feature list
fn with_derived_specs(mut example: ReferenceExample) -> ReferenceExample {
    if example.features.is_empty() {
        example.features = detect_features(&example.script);
    }
    if example.parameters.is_empty() {
        example.parameters = derive_parameter_specs(&example.script, &example.features);
    }
    example
}

impl StoreState {
    fn from_examples(examples: Vec<ReferenceExample>) -> Self {
        let mut state = Self::default();
        for example in examples {
            if state.by_name.contains_key(&example.name) {
                warn!(name = %example.name, "Duplicate reference in storage, keeping the first");
                continue;
            }
            state.push(Arc::new(with_derived_specs(example)));
        }
        state
    }

    fn push(&mut self, example: Arc<ReferenceExample>) {
        self.by_name.insert(example.name.clone(), self.examples.len());
        self.examples.push(example);
    }
}

/// Reference library keyed by unique name
pub struct ReferenceStore {
    repository: Arc<dyn ReferenceRepository>,
    state: ArcSwap<StoreState>,
    write_lock: Mutex<()>,
}

impl ReferenceStore {
    /// Load the corpus from the repository
    pub async fn load(repository: Arc<dyn ReferenceRepository>) -> Result<Self> {
        let examples = repository.load_all().await?;
        let state = StoreState::from_examples(examples);
        info!(
            repository = repository.repository_name(),
            count = state.examples.len(),
            "Reference library loaded"
        );
        Ok(Self {
            repository,
            state: ArcSwap::from_pointee(state),
            write_lock: Mutex::new(()),
        })
    }

    /// Append a reference; duplicate names are rejected and nothing changes
    pub async fn add_reference_example(&self, new: NewReference) -> Result<Arc<ReferenceExample>> {
        for (field, value) in [
            ("name", &new.name),
            ("description", &new.description),
            ("script", &new.script),
            ("category", &new.category),
        ] {
            if value.trim().is_empty() {
                return Err(Error::invalid_argument(format!("reference {field} is empty")));
            }
        }

        let _guard = self.write_lock.lock().await;
        let current = self.state.load_full();
        if current.by_name.contains_key(&new.name) {
            return Err(Error::duplicate_reference(new.name));
        }

        let features = detect_features(&new.script);
        let parameters = derive_parameter_specs(&new.script, &features);
        let example = ReferenceExample {
            name: new.name,
            description: new.description,
            script: new.script,
            complexity: new.complexity,
            category: new.category,
            parameters,
            features,
            embedding: None,
        };
        self.repository.append(&example).await?;

        let example = Arc::new(example);
        let mut next = StoreState {
            examples: current.examples.clone(),
            by_name: current.by_name.clone(),
        };
        next.push(Arc::clone(&example));
        self.state.store(Arc::new(next));

        info!(name = %example.name, tier = %example.complexity, "Reference added");
        Ok(example)
    }

    /// Replace records with copies carrying fresh embedding caches
    ///
    /// Records are matched by name; the repository is asked to persist the caches.
    pub async fn replace_embeddings(&self, updated: &[ReferenceExample]) -> Result<()> {
        if updated.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().await;
        let current = self.state.load_full();
        let mut examples = current.examples.clone();
        for example in updated {
            if let Some(index) = current.by_name.get(&example.name) {
                examples[*index] = Arc::new(example.clone());
            }
        }
        self.repository.update_embeddings(updated).await?;
        self.state.store(Arc::new(StoreState {
            examples,
            by_name: current.by_name.clone(),
        }));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<ReferenceExample>> {
        let state = self.state.load();
        state
            .by_name
            .get(name)
            .map(|index| Arc::clone(&state.examples[*index]))
    }

    /// Every record in insertion order
    pub fn all(&self) -> Vec<Arc<ReferenceExample>> {
        self.state.load().examples.clone()
    }

    pub fn len(&self) -> usize {
        self.state.load().examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn by_complexity(&self, tier: ComplexityTier) -> Vec<Arc<ReferenceExample>> {
        self.filtered(|example| example.complexity == tier)
    }

    pub fn by_category(&self, category: &str) -> Vec<Arc<ReferenceExample>> {
        self.filtered(|example| example.category.eq_ignore_ascii_case(category))
    }

    pub fn stats(&self) -> LibraryStats {
        let state = self.state.load();
        let mut stats = LibraryStats {
            total: state.examples.len(),
            ..LibraryStats::default()
        };
        for tier in ComplexityTier::ALL {
            stats.by_complexity.insert(tier.to_string(), 0);
        }
        for example in &state.examples {
            *stats
                .by_complexity
                .entry(example.complexity.to_string())
                .or_default() += 1;
            *stats.by_category.entry(example.category.clone()).or_default() += 1;
        }
        stats
    }

    fn filtered(&self, keep: impl Fn(&ReferenceExample) -> bool) -> Vec<Arc<ReferenceExample>> {
        self.state
            .load()
            .examples
            .iter()
            .filter(|example| keep(example))
            .cloned()
            .collect()
    }
}
