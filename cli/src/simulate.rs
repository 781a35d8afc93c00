//! End-to-end session simulation
//!
//! Drives a full two-round session against the in-memory store:
//!
//! ```text
//! create → register N → betting_layer1 → N round-one votes
//!        → results_layer1 → routing → betting_layer2 → N round-two votes
//!        → results_layer2 → insights → (read results) → closed
//! ```
//!
//! Synthetic allocations come from a seeded generator, so a fixed seed
//! replays the same session.

use anyhow::{Context, Result};
use casino_application::{
    CompositePublisher, CreateSessionInput, EngineConfig, RandomSource, RegisterParticipantInput,
    ResultsQuery, SessionEventPublisher, SubmitVoteInput, VotingEngine,
};
use casino_domain::{
    AllocationRequest, OptionId, Participant, SessionId, SessionPhase, SessionResults,
    SubmittedChips, VotingRound,
};
use casino_infrastructure::{
    BroadcastEventPublisher, InMemorySessionStore, JsonlEventLog, SeededRandom,
};
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

const DEPARTMENTS: [&str; 5] = ["Operations", "Engineering", "Finance", "People", "Sales"];

/// Parameters of one simulated session
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub participants: usize,
    pub seed: u64,
    pub events: Option<PathBuf>,
}

/// Outcome of a simulated session
#[derive(Debug)]
pub struct SimulationReport {
    pub results: SessionResults,
    /// Events observed by a display subscribed to the session
    pub events_seen: u64,
}

pub async fn run(config: EngineConfig, options: SimulationOptions) -> Result<SimulationReport> {
    let broadcast = Arc::new(BroadcastEventPublisher::new());
    let mut publisher = CompositePublisher::default();
    publisher.push(Arc::clone(&broadcast) as Arc<dyn SessionEventPublisher>);
    if let Some(path) = &options.events {
        let log = JsonlEventLog::new(path)
            .with_context(|| format!("Could not open event log {}", path.display()))?;
        info!("Writing session events to {}", log.path().display());
        publisher.push(Arc::new(log));
    }

    let chips_per_type = config.session_defaults.chips_per_type;
    let draws = SeededRandom::new(options.seed);
    let routing = Arc::new(SeededRandom::new(options.seed.wrapping_add(1)));
    let engine = VotingEngine::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(publisher),
        routing,
        config,
    );

    let session = engine
        .create_session(CreateSessionInput::new("simulator"))
        .await?;
    let session_id = session.id.clone();
    info!(
        "Simulating session {} with {} participants (seed {})",
        session_id, options.participants, options.seed
    );

    let mut display = broadcast.subscribe(&session_id);
    let display = tokio::spawn(async move {
        let mut seen = 0u64;
        loop {
            match display.recv().await {
                Ok(_) => seen += 1,
                Err(RecvError::Lagged(skipped)) => seen += skipped,
                Err(RecvError::Closed) => break,
            }
        }
        seen
    });

    let mut participants = Vec::with_capacity(options.participants);
    for i in 0..options.participants {
        let department = DEPARTMENTS[draws.next_below(DEPARTMENTS.len() as u32) as usize];
        let participant = engine
            .register_participant(RegisterParticipantInput {
                session_id: session_id.clone(),
                name: format!("Participant {}", i + 1),
                department: department.to_string(),
                device_id: format!("sim-device-{}", i + 1),
            })
            .await?;
        participants.push(participant);
    }

    engine
        .transition_phase(&session_id, SessionPhase::BettingLayer1)
        .await?;
    let pain_points: Vec<OptionId> = session
        .catalog
        .round_one()
        .iter()
        .map(|o| o.id.clone())
        .collect();
    let round_one = participants.iter().map(|participant| {
        let allocations = synthetic_allocation(&draws, &pain_points, chips_per_type);
        submit(&engine, &session_id, participant, VotingRound::Layer1, allocations)
    });
    try_join_all(round_one).await?;

    for phase in [
        SessionPhase::ResultsLayer1,
        SessionPhase::Routing,
        SessionPhase::BettingLayer2,
    ] {
        engine.transition_phase(&session_id, phase).await?;
    }

    // Reload to pick up each participant's routing
    let routed = engine.list_participants(&session_id).await?;
    let mut round_two = Vec::with_capacity(routed.len());
    for participant in &routed {
        let Some(group) = &participant.layer1_selection else {
            warn!("Participant {} was never routed", participant.id);
            continue;
        };
        let Some(solutions) = session.catalog.group(group) else {
            warn!("Participant {} routed to unknown group {}", participant.id, group);
            continue;
        };
        let options: Vec<OptionId> = solutions.iter().map(|o| o.id.clone()).collect();
        let allocations = synthetic_allocation(&draws, &options, chips_per_type);
        round_two.push(submit(
            &engine,
            &session_id,
            participant,
            VotingRound::Layer2,
            allocations,
        ));
    }
    try_join_all(round_two).await?;

    engine
        .transition_phase(&session_id, SessionPhase::ResultsLayer2)
        .await?;
    engine
        .transition_phase(&session_id, SessionPhase::Insights)
        .await?;

    let view = engine
        .get_results(&session_id, &ResultsQuery::full().refreshed())
        .await?;
    let results = view
        .as_full()
        .cloned()
        .context("Full results query returned a partial view")?;

    engine
        .transition_phase(&session_id, SessionPhase::Closed)
        .await?;
    let events_seen = display.await.context("Display subscriber panicked")?;

    Ok(SimulationReport {
        results,
        events_seen,
    })
}

async fn submit<S>(
    engine: &VotingEngine<S>,
    session_id: &SessionId,
    participant: &Participant,
    round: VotingRound,
    allocations: AllocationRequest,
) -> Result<()>
where
    S: casino_application::SessionStore + 'static,
{
    engine
        .submit_vote(SubmitVoteInput {
            session_id: session_id.clone(),
            participant_id: participant.id.clone(),
            round,
            allocations,
            group_id: None,
        })
        .await
        .with_context(|| format!("{} vote of {} rejected", round, participant.name))?;
    Ok(())
}

/// Scatter `chips_per_type` chips of each type across `options`
fn synthetic_allocation(
    draws: &SeededRandom,
    options: &[OptionId],
    chips_per_type: u32,
) -> AllocationRequest {
    if options.is_empty() {
        return AllocationRequest::new();
    }
    let mut counts: BTreeMap<usize, [i64; 3]> = BTreeMap::new();
    // Skew towards one favourite so routing has a clear winner most of the time
    let favourite = draws.next_below(options.len() as u32) as usize;

    for chip in 0..3 {
        for _ in 0..chips_per_type {
            let index = if draws.next_f64() < 0.5 {
                favourite
            } else {
                draws.next_below(options.len() as u32) as usize
            };
            counts.entry(index).or_default()[chip] += 1;
        }
    }

    counts
        .into_iter()
        .map(|(index, [time, talent, trust])| {
            (
                options[index].clone(),
                SubmittedChips::new(time, talent, trust),
            )
        })
        .collect()
}
