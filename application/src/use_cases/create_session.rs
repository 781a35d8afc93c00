//! Create Session use case
//!
//! Copies the configured catalog and default settings into a new session,
//! merging the facilitator's overrides on top.

use crate::error::EngineError;
use crate::ports::session_store::SessionStore;
use casino_domain::{OptionCatalog, Session, SessionSettings, SettingsOverride};
use std::sync::Arc;
use tracing::info;

/// Input for the CreateSession use case
#[derive(Debug, Clone, Default)]
pub struct CreateSessionInput {
    pub facilitator_id: String,
    pub settings: SettingsOverride,
}

impl CreateSessionInput {
    pub fn new(facilitator_id: impl Into<String>) -> Self {
        Self {
            facilitator_id: facilitator_id.into(),
            settings: SettingsOverride::default(),
        }
    }

    pub fn with_settings(mut self, settings: SettingsOverride) -> Self {
        self.settings = settings;
        self
    }
}

/// Use case for creating a voting session
pub struct CreateSessionUseCase<S: SessionStore + 'static> {
    store: Arc<S>,
    defaults: SessionSettings,
    catalog: OptionCatalog,
}

impl<S: SessionStore + 'static> CreateSessionUseCase<S> {
    pub fn new(store: Arc<S>, defaults: SessionSettings, catalog: OptionCatalog) -> Self {
        Self {
            store,
            defaults,
            catalog,
        }
    }

    pub async fn execute(&self, input: CreateSessionInput) -> Result<Session, EngineError> {
        let settings = self.defaults.clone().with_override(&input.settings);
        settings.validate()?;
        let session = Session::new(input.facilitator_id, self.catalog.clone(), settings);

        self.store.insert_session(session.clone()).await?;
        info!(
            "Created session {} ({} chips per type, {} groups)",
            session.id,
            session.settings.chips_per_type,
            session.catalog.round_one().len()
        );
        Ok(session)
    }
}
