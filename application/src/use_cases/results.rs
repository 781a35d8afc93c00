//! Results use case
//!
//! Read-through access to a session's results document:
//!
//! ```text
//! get(query) ──▶ TtlCache hit ──────────────────────────────▶ view
//!                   │ miss
//!                   ▼
//!            stored document? ──no──▶ recompute ──▶ store ──▶ view
//! ```
//!
//! `force_refresh` skips both the cache and the stored document.
//!
//! Recomputes of one session run one at a time, so the stored document
//! always reflects the latest vote set read. Each recompute bumps the
//! session's generation; a view read under an older generation is served
//! but not cached.

use crate::error::EngineError;
use crate::ports::session_store::SessionStore;
use crate::rate_limit::{TtlCache, lock};
use casino_domain::{
    GroupResults, LayerResults, OptionId, SessionId, SessionResults, VotingRound, aggregate,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Which slice of the results document to return
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsQuery {
    pub round: Option<VotingRound>,
    /// Round-two group; ignored for round one
    pub group: Option<OptionId>,
    pub force_refresh: bool,
}

impl ResultsQuery {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn round(round: VotingRound) -> Self {
        Self {
            round: Some(round),
            ..Default::default()
        }
    }

    pub fn group(group: OptionId) -> Self {
        Self {
            round: Some(VotingRound::Layer2),
            group: Some(group),
            force_refresh: false,
        }
    }

    pub fn refreshed(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResultsKey {
    session: SessionId,
    round: Option<VotingRound>,
    group: Option<OptionId>,
}

impl ResultsKey {
    fn new(session: &SessionId, query: &ResultsQuery) -> Self {
        let group = match query.round {
            Some(VotingRound::Layer1) => None,
            _ => query.group.clone(),
        };
        Self {
            session: session.clone(),
            round: query.round,
            group,
        }
    }
}

/// A results document or one slice of it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultsView {
    Full(Box<SessionResults>),
    Layer1(LayerResults),
    Layer2(BTreeMap<OptionId, GroupResults>),
    Group(GroupResults),
}

impl ResultsView {
    fn select(results: &SessionResults, key: &ResultsKey) -> Result<Self, EngineError> {
        match (key.round, &key.group) {
            (Some(VotingRound::Layer1), _) => Ok(ResultsView::Layer1(results.layer1.clone())),
            (_, Some(group)) => results
                .layer2
                .get(group)
                .cloned()
                .map(ResultsView::Group)
                .ok_or_else(|| EngineError::UnknownOption(group.clone())),
            (Some(VotingRound::Layer2), None) => Ok(ResultsView::Layer2(results.layer2.clone())),
            (None, None) => Ok(ResultsView::Full(Box::new(results.clone()))),
        }
    }

    pub fn as_full(&self) -> Option<&SessionResults> {
        match self {
            ResultsView::Full(results) => Some(results),
            _ => None,
        }
    }
}

/// Per-session recompute turn and generation counter
#[derive(Default)]
struct RecomputeSlot {
    turn: tokio::sync::Mutex<()>,
    generation: AtomicU64,
}

impl RecomputeSlot {
    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Use case for computing and reading results
pub struct ResultsUseCase<S: SessionStore + 'static> {
    store: Arc<S>,
    cache: TtlCache<ResultsKey, ResultsView>,
    slots: Mutex<HashMap<SessionId, Arc<RecomputeSlot>>>,
}

impl<S: SessionStore + 'static> ResultsUseCase<S> {
    pub fn new(store: Arc<S>, ttl: Duration) -> Self {
        Self {
            store,
            cache: TtlCache::new(ttl),
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, session_id: &SessionId) -> Arc<RecomputeSlot> {
        Arc::clone(lock(&self.slots).entry(session_id.clone()).or_default())
    }

    /// Recompute the full document from the vote set and store it
    ///
    /// Every cached view of the session is invalidated.
    pub async fn recompute(&self, session_id: &SessionId) -> Result<SessionResults, EngineError> {
        let slot = self.slot(session_id);
        self.recompute_in(&slot, session_id)
            .await
            .map(|(results, _)| results)
    }

    async fn recompute_in(
        &self,
        slot: &RecomputeSlot,
        session_id: &SessionId,
    ) -> Result<(SessionResults, u64), EngineError> {
        let _turn = slot.turn.lock().await;

        let session = self
            .store
            .get_session(session_id)
            .await?
            .ok_or_else(|| EngineError::SessionNotFound(session_id.clone()))?;
        let participants = self.store.list_participants(session_id).await?;
        let votes = self.store.list_votes(session_id, None).await?;

        let results = aggregate(&session, &participants, &votes);
        self.store.put_results(results.clone()).await?;
        // Bump before invalidating so an in-flight read cannot re-cache an older view
        let generation = slot.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cache.invalidate_where(|key| &key.session == session_id);

        debug!(
            "Recomputed results for session {} ({} votes, {} participants)",
            session_id,
            votes.len(),
            participants.len()
        );
        Ok((results, generation))
    }

    pub async fn get(
        &self,
        session_id: &SessionId,
        query: &ResultsQuery,
    ) -> Result<ResultsView, EngineError> {
        let key = ResultsKey::new(session_id, query);

        if !query.force_refresh
            && let Some(view) = self.cache.get(&key)
        {
            debug!("Results cache hit for session {}", session_id);
            return Ok(view);
        }

        let slot = self.slot(session_id);
        let (results, generation) = if query.force_refresh {
            self.recompute_in(&slot, session_id).await?
        } else {
            let generation = slot.generation();
            match self.store.get_results(session_id).await? {
                Some(results) => (results, generation),
                None => self.recompute_in(&slot, session_id).await?,
            }
        };

        let view = ResultsView::select(&results, &key)?;
        if !self
            .cache
            .insert_if(key, view.clone(), || slot.generation() == generation)
        {
            debug!("Results for session {} changed during read; not cached", session_id);
        }
        Ok(view)
    }

    /// Drop every cached view and recompute slot of a session
    pub fn evict(&self, session_id: &SessionId) {
        self.cache.invalidate_where(|key| &key.session == session_id);
        lock(&self.slots).remove(session_id);
    }

    /// Number of cached views, expired or not
    pub fn cached_views(&self) -> usize {
        self.cache.len()
    }
}
