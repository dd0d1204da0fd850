//! Scenario orchestrator
//!
//! Provisions a whole [`ScenarioConfig`] in dependency order:
//! owner and guests, then properties, then locks, then grants and tokens. A step whose
//! predecessor is unavailable is recorded as aborted and issues no request.

use super::error::{ProvisionError, ProvisionResult};
use super::provisioner::{generate_token_code, EntityProvisioner, TokenRequest};
use crate::api::ApiClient;
use crate::entities::{AccessGrant, AccessToken, Lock, Property, Provisioned, ResolvedUser, WindowText};
use crate::schedule::Clock;
use crate::types::{ConfigValidationError, EntityKind, RemoteId, ScenarioConfig, UserRole};
use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// How a step ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The record exists (remotely or simulated)
    Completed(T),
    /// The request failed
    Failed(ProvisionError),
    /// Skipped because a predecessor is unavailable
    Aborted {
        /// The unavailable predecessor
        missing: EntityKind,
    },
}

impl<T> Outcome<T> {
    /// The record, if the step completed
    pub fn completed(&self) -> Option<&T> {
        match self {
            Outcome::Completed(record) => Some(record),
            _ => None,
        }
    }

    /// The error, if the step failed
    pub fn error(&self) -> Option<&ProvisionError> {
        match self {
            Outcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Whether the step was skipped
    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted { .. })
    }
}

impl<T> From<Result<T, ProvisionError>> for Outcome<T> {
    fn from(result: Result<T, ProvisionError>) -> Self {
        match result {
            Ok(record) => Outcome::Completed(record),
            Err(error) => Outcome::Failed(error),
        }
    }
}

/// One provisioning step and its outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Step<T> {
    /// Human-readable label (email, property name, lock key, ...)
    pub label: String,
    /// What happened
    pub outcome: Outcome<T>,
}

impl<T> Step<T> {
    fn new(label: impl Into<String>, result: ProvisionResult<T>) -> Self {
        Self { label: label.into(), outcome: result.into() }
    }

    fn completed(label: impl Into<String>, record: T) -> Self {
        Self { label: label.into(), outcome: Outcome::Completed(record) }
    }

    fn aborted(label: impl Into<String>, missing: EntityKind) -> Self {
        Self { label: label.into(), outcome: Outcome::Aborted { missing } }
    }
}

/// Lock step together with the scenario key it was defined under
#[derive(Debug, Clone, PartialEq)]
pub struct LockStep {
    /// Scenario-local lock key
    pub key: String,
    /// Name of the property it belongs to
    pub property: String,
    /// The step
    pub step: Step<Lock>,
}

/// Everything a scenario run produced, in creation order
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRun {
    /// Instant the run started
    pub started_at: NaiveDateTime,
    /// Owner step, when the scenario has an owner
    pub owner: Option<Step<ResolvedUser>>,
    /// Guest steps
    pub guests: Vec<Step<ResolvedUser>>,
    /// Property steps
    pub properties: Vec<Step<Property>>,
    /// Lock steps
    pub locks: Vec<LockStep>,
    /// Access grant steps
    pub grants: Vec<Step<Provisioned<AccessGrant>>>,
    /// Access token steps
    pub tokens: Vec<Step<Provisioned<AccessToken>>>,
}

impl ScenarioRun {
    /// Number of steps that failed
    pub fn failure_count(&self) -> usize {
        self.outcomes().filter(|o| matches!(o, OutcomeKind::Failed)).count()
    }

    /// Number of steps that were skipped
    pub fn aborted_count(&self) -> usize {
        self.outcomes().filter(|o| matches!(o, OutcomeKind::Aborted)).count()
    }

    /// Number of grants and tokens held only locally
    pub fn simulated_count(&self) -> usize {
        let grants = self
            .grants
            .iter()
            .filter(|s| s.outcome.completed().is_some_and(Provisioned::is_simulated))
            .count();
        let tokens = self
            .tokens
            .iter()
            .filter(|s| s.outcome.completed().is_some_and(Provisioned::is_simulated))
            .count();
        grants + tokens
    }

    /// Whether every step completed
    pub fn is_complete(&self) -> bool {
        self.failure_count() == 0 && self.aborted_count() == 0
    }

    fn outcomes(&self) -> impl Iterator<Item = OutcomeKind> + '_ {
        self.owner
            .iter()
            .chain(self.guests.iter())
            .map(|s| OutcomeKind::of(&s.outcome))
            .chain(self.properties.iter().map(|s| OutcomeKind::of(&s.outcome)))
            .chain(self.locks.iter().map(|l| OutcomeKind::of(&l.step.outcome)))
            .chain(self.grants.iter().map(|s| OutcomeKind::of(&s.outcome)))
            .chain(self.tokens.iter().map(|s| OutcomeKind::of(&s.outcome)))
    }
}

/// Coarse outcome classification used for counting and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Completed with a remote record
    Persisted,
    /// Completed with a local record
    Simulated,
    /// Request failed
    Failed,
    /// Skipped
    Aborted,
}

impl OutcomeKind {
    /// Classify an outcome; completed records count as persisted
    pub fn of<T>(outcome: &Outcome<T>) -> Self {
        match outcome {
            Outcome::Completed(_) => OutcomeKind::Persisted,
            Outcome::Failed(_) => OutcomeKind::Failed,
            Outcome::Aborted { .. } => OutcomeKind::Aborted,
        }
    }

    /// Classify an outcome whose record may be simulated
    pub fn of_provisioned<T>(outcome: &Outcome<Provisioned<T>>) -> Self {
        match outcome {
            Outcome::Completed(record) if record.is_simulated() => OutcomeKind::Simulated,
            other => Self::of(other),
        }
    }
}

/// Drives a scenario through an [`EntityProvisioner`]
#[derive(Debug)]
pub struct ScenarioOrchestrator<'a> {
    provisioner: EntityProvisioner<'a>,
    clock: &'a dyn Clock,
    rng: StdRng,
}

impl<'a> ScenarioOrchestrator<'a> {
    /// Create an orchestrator over `client`, reading time from `clock`
    pub fn new(client: &'a ApiClient, clock: &'a dyn Clock) -> Self {
        Self { provisioner: EntityProvisioner::new(client), clock, rng: StdRng::from_entropy() }
    }

    /// Use a deterministic seed for generated token codes
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Provision the whole scenario.
    ///
    /// The scenario is validated and all windows resolved before the first request;
    /// once requests start, failures are recorded per step and never abort the run.
    #[instrument(
        skip(self, scenario),
        fields(
            guests = scenario.guests.len(),
            properties = scenario.properties.len(),
            locks = scenario.lock_count()
        )
    )]
    pub fn run(&mut self, scenario: &ScenarioConfig) -> Result<ScenarioRun, ConfigValidationError> {
        scenario.validate()?;
        let windows = scenario
            .accesses
            .iter()
            .map(|access| access.window.resolve_text(self.clock))
            .collect::<Result<Vec<WindowText>, _>>()?;

        let started_at = self.clock.now();
        info!(%started_at, "Provisioning scenario");

        let owner = scenario.owner.as_ref().map(|spec| {
            Step::new(spec.email.clone(), self.provisioner.provision_user(UserRole::Owner, spec))
        });
        let owner_id = owner.as_ref().and_then(|s| s.outcome.completed()).map(|u| u.account.id);

        let guests: Vec<Step<ResolvedUser>> = scenario
            .guests
            .iter()
            .map(|spec| {
                Step::new(spec.email.clone(), self.provisioner.provision_user(UserRole::Guest, spec))
            })
            .collect();
        let guest_ids: HashMap<&str, RemoteId> = scenario
            .guests
            .iter()
            .zip(&guests)
            .filter_map(|(spec, step)| Some((spec.email.as_str(), step.outcome.completed()?.account.id)))
            .collect();

        let mut properties = Vec::with_capacity(scenario.properties.len());
        let mut locks = Vec::with_capacity(scenario.lock_count());
        for spec in &scenario.properties {
            let step = match owner_id {
                Some(owner_id) => {
                    Step::new(spec.name.clone(), self.provisioner.provision_property(spec, owner_id))
                }
                None => {
                    warn!(property = %spec.name, "Skipping property: owner unavailable");
                    Step::aborted(spec.name.clone(), EntityKind::Owner)
                }
            };
            let property_id = step.outcome.completed().map(|p| p.id);

            for lock in &spec.locks {
                let lock_step = match property_id {
                    Some(property_id) => Step::new(
                        lock.key.clone(),
                        self.provisioner.provision_lock(lock, Some(property_id)),
                    ),
                    None => {
                        warn!(lock = %lock.key, "Skipping lock: property unavailable");
                        Step::aborted(lock.key.clone(), EntityKind::Property)
                    }
                };
                locks.push(LockStep {
                    key: lock.key.clone(),
                    property: spec.name.clone(),
                    step: lock_step,
                });
            }
            properties.push(step);
        }
        let lock_ids: HashMap<&str, RemoteId> = locks
            .iter()
            .filter_map(|l| Some((l.key.as_str(), l.step.outcome.completed()?.id)))
            .collect();

        let mut grants = Vec::with_capacity(scenario.accesses.len());
        for (access, window) in scenario.accesses.iter().zip(windows) {
            let label = format!("{} -> {}", access.guest_email, access.lock_key);
            let guest_id = guest_ids.get(access.guest_email.as_str()).copied();
            let lock_id = lock_ids.get(access.lock_key.as_str()).copied();
            let step = match (guest_id, lock_id) {
                (Some(guest_id), Some(lock_id)) => {
                    Step::completed(label, self.provisioner.provision_grant(guest_id, lock_id, window))
                }
                (None, _) => {
                    warn!(access = %label, "Skipping access grant: guest unavailable");
                    Step::aborted(label, EntityKind::Guest)
                }
                (_, None) => {
                    warn!(access = %label, "Skipping access grant: lock unavailable");
                    Step::aborted(label, EntityKind::Lock)
                }
            };
            grants.push(step);
        }

        let mut tokens = Vec::with_capacity(scenario.tokens.len());
        for spec in &scenario.tokens {
            let code = match &spec.code {
                Some(code) => code.clone(),
                None => generate_token_code(&mut self.rng),
            };
            let label = format!("{} -> {}", code, spec.lock_key);
            let step = match lock_ids.get(spec.lock_key.as_str()).copied() {
                Some(lock_id) => {
                    let request = TokenRequest {
                        code,
                        max_uses: spec.max_uses,
                        current_uses: spec.current_uses,
                        expires_at: spec.expires_at.clone(),
                        lock_id,
                    };
                    Step::completed(label, self.provisioner.provision_token(request))
                }
                None => {
                    warn!(token = %label, "Skipping token: lock unavailable");
                    Step::aborted(label, EntityKind::Lock)
                }
            };
            tokens.push(step);
        }

        let run = ScenarioRun { started_at, owner, guests, properties, locks, grants, tokens };
        info!(
            failed = run.failure_count(),
            aborted = run.aborted_count(),
            simulated = run.simulated_count(),
            "Scenario provisioning finished"
        );
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::api::{endpoints, HttpMethod};
    use crate::schedule::FixedClock;
    use crate::types::{LockSpec, PropertySpec, TokenSpec};

    fn clock() -> FixedClock {
        FixedClock::on_date(2025, 3, 31).unwrap()
    }

    fn script_success(transport: &ScriptedTransport) {
        transport
            .reply(HttpMethod::Post, endpoints::OWNERS, 201, r#"{"id": 1}"#)
            .reply(HttpMethod::Post, endpoints::GUEST_REGISTRATION, 201, r#"{"id": 2}"#)
            .reply(HttpMethod::Post, endpoints::PROPERTIES, 201, r#"{"id": 3}"#)
            .reply(HttpMethod::Post, endpoints::LOCK_CREATE, 201, r#"{"id": 4}"#)
            .reply(HttpMethod::Post, endpoints::ACCESSES, 201, r#"{"id": 5}"#)
            .reply(HttpMethod::Post, endpoints::TOKENS, 201, r#"{"id": 6}"#);
    }

    #[test]
    fn test_default_scenario_all_persisted() {
        let transport = ScriptedTransport::new();
        script_success(&transport);
        let client = ApiClient::new("http://api.test", Box::new(transport.clone()));
        let clock = clock();

        let run = ScenarioOrchestrator::new(&client, &clock).run(&ScenarioConfig::default()).unwrap();
        assert!(run.is_complete());
        assert_eq!(run.simulated_count(), 0);
        assert_eq!(run.locks[0].step.outcome.completed().unwrap().id, RemoteId(4));
        assert_eq!(transport.request_count(), 6);
    }

    #[test]
    fn test_property_failure_aborts_its_locks_and_dependents() {
        let fresh = ScriptedTransport::new();
        fresh
            .reply(HttpMethod::Post, endpoints::OWNERS, 201, r#"{"id": 1}"#)
            .reply(HttpMethod::Post, endpoints::GUEST_REGISTRATION, 201, r#"{"id": 2}"#)
            .reply(HttpMethod::Post, endpoints::PROPERTIES, 400, "bad address");
        let fresh_client = ApiClient::new("http://api.test", Box::new(fresh.clone()));
        let clock = clock();

        let run = ScenarioOrchestrator::new(&fresh_client, &clock).run(&ScenarioConfig::default()).unwrap();
        assert_eq!(run.failure_count(), 1);
        assert_eq!(run.locks[0].step.outcome, Outcome::Aborted { missing: EntityKind::Property });
        assert_eq!(run.grants[0].outcome, Outcome::Aborted { missing: EntityKind::Lock });
        assert_eq!(run.tokens[0].outcome, Outcome::Aborted { missing: EntityKind::Lock });
        assert!(fresh.requests_to(HttpMethod::Post, endpoints::LOCK_CREATE).is_empty());
        assert!(fresh.requests_to(HttpMethod::Post, endpoints::TOKENS).is_empty());
    }

    #[test]
    fn test_generated_token_code_when_missing() {
        let transport = ScriptedTransport::new();
        script_success(&transport);
        let client = ApiClient::new("http://api.test", Box::new(transport));
        let clock = clock();
        let mut scenario = ScenarioConfig::default();
        scenario.tokens = vec![TokenSpec {
            lock_key: "front-door".to_string(),
            code: None,
            max_uses: 0,
            current_uses: 0,
            expires_at: None,
        }];

        let run = ScenarioOrchestrator::new(&client, &clock).with_seed(42).run(&scenario).unwrap();
        let token = run.tokens[0].outcome.completed().unwrap().record();
        assert_eq!(token.code.len(), 6);
        assert_eq!(token.max_uses, 0);
    }

    #[test]
    fn test_invalid_scenario_sends_nothing() {
        let transport = ScriptedTransport::new();
        let client = ApiClient::new("http://api.test", Box::new(transport.clone()));
        let clock = clock();
        let mut scenario = ScenarioConfig::empty();
        scenario.properties.push(PropertySpec {
            name: "Loft".to_string(),
            address: "Gran Vía 1".to_string(),
            locks: vec![LockSpec { key: "loft".to_string(), model: "X".to_string(), locked: true }],
        });

        let result = ScenarioOrchestrator::new(&client, &clock).run(&scenario);
        assert!(matches!(result, Err(ConfigValidationError::MissingOwner)));
        assert_eq!(transport.request_count(), 0);
    }
}
