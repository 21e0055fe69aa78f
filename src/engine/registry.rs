//! Shared engines keyed by store identity.
//!
//! Building a concept store is expensive, so every filter instance that
//! resolves to the same identity shares one [`ConceptQueryEngine`]. The
//! registry is passed explicitly to whoever creates filters; there is no
//! process-global state.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::engine::{ConceptQueryEngine, StoreIdentity};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct EngineRegistry {
    engines: Mutex<AHashMap<StoreIdentity, Arc<ConceptQueryEngine>>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        EngineRegistry::default()
    }

    pub fn get(&self, identity: &StoreIdentity) -> Option<Arc<ConceptQueryEngine>> {
        self.engines.lock().get(identity).cloned()
    }

    pub fn contains(&self, identity: &StoreIdentity) -> bool {
        self.engines.lock().contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.engines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.lock().is_empty()
    }

    /// Registered identities, sorted.
    pub fn identities(&self) -> Vec<StoreIdentity> {
        let mut identities: Vec<_> = self.engines.lock().keys().cloned().collect();
        identities.sort();
        identities
    }

    /// Return the engine for `identity`, building it with `build` first if
    /// needed.
    ///
    /// The registry lock is held while `build` runs, so concurrent callers
    /// asking for the same identity wait for the first build instead of
    /// starting their own. A failed build registers nothing.
    pub fn get_or_try_insert_with<F>(
        &self,
        identity: &StoreIdentity,
        build: F,
    ) -> Result<Arc<ConceptQueryEngine>>
    where
        F: FnOnce() -> Result<ConceptQueryEngine>,
    {
        let mut engines = self.engines.lock();
        if let Some(engine) = engines.get(identity) {
            debug!(store = identity.as_str(), "reusing concept engine");
            return Ok(Arc::clone(engine));
        }
        let engine = Arc::new(build()?);
        engines.insert(identity.clone(), Arc::clone(&engine));
        Ok(engine)
    }

    pub fn remove(&self, identity: &StoreIdentity) -> Option<Arc<ConceptQueryEngine>> {
        self.engines.lock().remove(identity)
    }
}
