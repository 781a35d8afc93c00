//! Update Option Text use case
//!
//! Lets the facilitator reword a round-one or round-two option while the
//! session runs. Ids, tiers and group membership never change.

use crate::error::EngineError;
use crate::ports::session_store::SessionStore;
use casino_domain::{OptionId, SessionId};
use std::sync::Arc;
use tracing::info;

/// Input for the UpdateOptionText use case
#[derive(Debug, Clone)]
pub struct UpdateOptionTextInput {
    pub session_id: SessionId,
    pub option_id: OptionId,
    pub title: String,
    pub description: String,
}

pub struct UpdateOptionTextUseCase<S: SessionStore + 'static> {
    store: Arc<S>,
}

impl<S: SessionStore + 'static> UpdateOptionTextUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, input: UpdateOptionTextInput) -> Result<(), EngineError> {
        let title = input.title.trim();
        let description = input.description.trim();

        let updated = self
            .store
            .update_option_text(&input.session_id, &input.option_id, title, description)
            .await?;
        if !updated {
            return Err(EngineError::UnknownOption(input.option_id));
        }

        info!(
            "Option {} reworded in session {}",
            input.option_id, input.session_id
        );
        Ok(())
    }
}
