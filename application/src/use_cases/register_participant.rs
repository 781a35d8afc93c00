//! Register Participant use case

use crate::error::EngineError;
use crate::ports::session_store::{Registration, SessionStore};
use casino_domain::{Participant, SessionId};
use std::sync::Arc;
use tracing::{debug, info};

/// Input for the RegisterParticipant use case
#[derive(Debug, Clone)]
pub struct RegisterParticipantInput {
    pub session_id: SessionId,
    pub name: String,
    pub department: String,
    pub device_id: String,
}

/// Use case for joining a session
///
/// Registration is idempotent per (session, device): a second registration
/// from the same device returns the participant created the first time.
pub struct RegisterParticipantUseCase<S: SessionStore + 'static> {
    store: Arc<S>,
}

impl<S: SessionStore + 'static> RegisterParticipantUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, input: RegisterParticipantInput) -> Result<Registration, EngineError> {
        let session = self
            .store
            .get_session(&input.session_id)
            .await?
            .ok_or_else(|| EngineError::SessionNotFound(input.session_id.clone()))?;

        let name = input.name.trim();
        let department = input.department.trim();
        let device_id = input.device_id.trim();

        if name.is_empty() {
            return Err(EngineError::InvalidRegistration("name is required".into()));
        }
        if device_id.is_empty() {
            return Err(EngineError::InvalidRegistration("device id is required".into()));
        }
        if session.settings.require_department && department.is_empty() {
            return Err(EngineError::InvalidRegistration(
                "department is required".into(),
            ));
        }

        let participant = Participant::new(session.id.clone(), name, department, device_id);
        let registration = self.store.register_participant(participant).await?;

        let participant = registration.participant();
        if registration.is_new() {
            info!(
                "Participant {} joined session {} ({})",
                participant.id, session.id, participant.department
            );
        } else {
            debug!(
                "Device {} re-registered in session {}; reusing participant {}",
                participant.device_id, session.id, participant.id
            );
        }
        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::FakeStore;
    use casino_domain::{OptionCatalog, Session, SessionSettings};

    async fn setup(require_department: bool) -> (Arc<FakeStore>, SessionId) {
        let store = Arc::new(FakeStore::default());
        let settings = SessionSettings {
            require_department,
            ..Default::default()
        };
        let session = Session::new("fac", OptionCatalog::default_catalog(), settings);
        let id = session.id.clone();
        store.insert_session(session).await.unwrap();
        (store, id)
    }

    fn input(session_id: &SessionId, name: &str, department: &str, device: &str) -> RegisterParticipantInput {
        RegisterParticipantInput {
            session_id: session_id.clone(),
            name: name.into(),
            department: department.into(),
            device_id: device.into(),
        }
    }

    #[tokio::test]
    async fn test_registration_is_idempotent_per_device() {
        let (store, id) = setup(true).await;
        let use_case = RegisterParticipantUseCase::new(store.clone());

        let first = use_case.execute(input(&id, "Ada", "Training", "dev-1")).await.unwrap();
        let second = use_case.execute(input(&id, "Ada L.", "Training", "dev-1")).await.unwrap();

        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(first.participant().id, second.participant().id);
        assert_eq!(store.session(&id).metadata.total_participants, 1);
    }

    #[tokio::test]
    async fn test_fields_are_trimmed() {
        let (store, id) = setup(true).await;
        let use_case = RegisterParticipantUseCase::new(store);

        let registration = use_case
            .execute(input(&id, "  Ada ", " Safety ", " dev-1 "))
            .await
            .unwrap();
        let participant = registration.into_participant();
        assert_eq!(participant.name, "Ada");
        assert_eq!(participant.department, "Safety");
        assert_eq!(participant.device_id, "dev-1");
    }

    #[tokio::test]
    async fn test_department_required_when_configured() {
        let (store, id) = setup(true).await;
        let use_case = RegisterParticipantUseCase::new(store);

        let err = use_case.execute(input(&id, "Ada", "  ", "dev-1")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRegistration);
    }

    #[tokio::test]
    async fn test_department_optional_when_not_required() {
        let (store, id) = setup(false).await;
        let use_case = RegisterParticipantUseCase::new(store);

        let registration = use_case.execute(input(&id, "Ada", "", "dev-1")).await.unwrap();
        assert_eq!(registration.participant().department, "");
    }

    #[tokio::test]
    async fn test_blank_name_or_device_rejected() {
        let (store, id) = setup(false).await;
        let use_case = RegisterParticipantUseCase::new(store);

        let err = use_case.execute(input(&id, " ", "x", "dev-1")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRegistration);
        let err = use_case.execute(input(&id, "Ada", "x", "")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRegistration);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = Arc::new(FakeStore::default());
        let use_case = RegisterParticipantUseCase::new(store);

        let err = use_case
            .execute(input(&SessionId::new("missing"), "Ada", "x", "dev-1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
