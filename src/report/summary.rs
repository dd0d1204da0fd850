//! Structured summary of a scenario run

use crate::entities::{AccessGrant, AccessToken, Lock, Property, Provisioned, ResolvedUser};
use crate::provisioning::{ErrorReport, Outcome, OutcomeKind, ScenarioRun, Step};
use crate::schedule::format_instant;
use crate::types::{AccessStatus, EntityId, EntityKind, RemoteId, Resolution, TokenState};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Per-outcome step counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    /// Records returned by the API
    pub persisted: usize,
    /// Records held only locally
    pub simulated: usize,
    /// Failed steps
    pub failed: usize,
    /// Skipped steps
    pub aborted: usize,
}

impl SummaryCounts {
    fn add(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Persisted => self.persisted += 1,
            OutcomeKind::Simulated => self.simulated += 1,
            OutcomeKind::Failed => self.failed += 1,
            OutcomeKind::Aborted => self.aborted += 1,
        }
    }
}

/// One step as shown in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<T> {
    /// Step label
    pub label: String,
    /// Persisted, simulated, failed or aborted
    pub outcome: OutcomeKind,
    /// The record, when the step completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<T>,
    /// Failure details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
    /// Predecessor that was unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<EntityKind>,
}

impl<T> Entry<T> {
    fn from_step<S>(step: &Step<S>, kind: OutcomeKind, view: impl FnOnce(&S) -> T) -> Self {
        let (record, error, missing) = match &step.outcome {
            Outcome::Completed(record) => (Some(view(record)), None, None),
            Outcome::Failed(error) => (None, Some(ErrorReport::from(error)), None),
            Outcome::Aborted { missing } => (None, None, Some(*missing)),
        };
        Self { label: step.label.clone(), outcome: kind, record, error, missing }
    }
}

/// Owner or guest as reported, including login credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    /// Remote id
    pub id: RemoteId,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Login password
    pub credential: String,
    /// Phone number
    pub phone: String,
    /// How the identity was obtained
    pub resolution: Resolution,
}

impl From<&ResolvedUser> for UserView {
    fn from(user: &ResolvedUser) -> Self {
        Self {
            id: user.account.id,
            name: user.account.name.clone(),
            email: user.account.email.clone(),
            credential: user.account.credential.clone(),
            phone: user.account.phone.clone(),
            resolution: user.resolution,
        }
    }
}

/// Lock as reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockView {
    /// The lock
    #[serde(flatten)]
    pub lock: Lock,
    /// Name of the property it was installed in
    pub property_name: String,
}

/// Access grant with its status at the evaluation instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantView {
    /// Remote or simulated id
    pub id: EntityId,
    /// Whether the grant exists only locally
    pub simulated: bool,
    /// Guest receiving access
    pub guest_id: RemoteId,
    /// Lock being granted
    pub lock_id: RemoteId,
    /// Window start
    pub start: String,
    /// Window end
    pub end: String,
    /// Status at the evaluation instant
    pub status: AccessStatus,
}

impl GrantView {
    fn new(grant: &Provisioned<AccessGrant>, now: NaiveDateTime) -> Self {
        let record = grant.record();
        Self {
            id: record.id,
            simulated: grant.is_simulated(),
            guest_id: record.guest_id,
            lock_id: record.lock_id,
            start: record.window.start.clone(),
            end: record.window.end.clone(),
            status: record.status(now),
        }
    }
}

/// Access token with its validity at the evaluation instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenView {
    /// Remote or simulated id
    pub id: EntityId,
    /// Whether the token exists only locally
    pub simulated: bool,
    /// Display code
    pub code: String,
    /// Lock the token opens
    pub lock_id: RemoteId,
    /// Uses as `current/max`
    pub usage: String,
    /// Expiry instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Validity at the evaluation instant
    pub state: TokenState,
}

impl TokenView {
    /// View of a token record
    pub fn new(token: &AccessToken, simulated: bool, now: NaiveDateTime) -> Self {
        Self {
            id: token.id,
            simulated,
            code: token.code.clone(),
            lock_id: token.lock_id,
            usage: token.usage_label(),
            expires_at: token.expires_at.clone(),
            state: token.state(now),
        }
    }
}

/// Report of a scenario run, keyed by entity type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    /// Instant statuses were computed for
    pub evaluated_at: String,
    /// Step counts by outcome
    pub counts: SummaryCounts,
    /// Owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Entry<UserView>>,
    /// Guests
    pub guests: Vec<Entry<UserView>>,
    /// Properties
    pub properties: Vec<Entry<Property>>,
    /// Locks
    pub locks: Vec<Entry<LockView>>,
    /// Access grants
    pub grants: Vec<Entry<GrantView>>,
    /// Access tokens
    pub tokens: Vec<Entry<TokenView>>,
}

impl ScenarioSummary {
    /// Build the summary, computing grant and token states at `now`
    pub fn build(run: &ScenarioRun, now: NaiveDateTime) -> Self {
        let user = |step: &Step<ResolvedUser>| {
            Entry::from_step(step, OutcomeKind::of(&step.outcome), |u| UserView::from(u))
        };

        let owner = run.owner.as_ref().map(user);
        let guests: Vec<_> = run.guests.iter().map(user).collect();
        let properties: Vec<_> = run
            .properties
            .iter()
            .map(|step| Entry::from_step(step, OutcomeKind::of(&step.outcome), Property::clone))
            .collect();
        let locks: Vec<_> = run
            .locks
            .iter()
            .map(|lock| {
                Entry::from_step(&lock.step, OutcomeKind::of(&lock.step.outcome), |record: &Lock| {
                    LockView { lock: record.clone(), property_name: lock.property.clone() }
                })
            })
            .collect();
        let grants: Vec<_> = run
            .grants
            .iter()
            .map(|step| {
                Entry::from_step(step, OutcomeKind::of_provisioned(&step.outcome), |grant| {
                    GrantView::new(grant, now)
                })
            })
            .collect();
        let tokens: Vec<_> = run
            .tokens
            .iter()
            .map(|step| {
                Entry::from_step(
                    step,
                    OutcomeKind::of_provisioned(&step.outcome),
                    |token: &Provisioned<AccessToken>| {
                        TokenView::new(token.record(), token.is_simulated(), now)
                    },
                )
            })
            .collect();

        let mut counts = SummaryCounts::default();
        owner
            .iter()
            .chain(&guests)
            .map(|e| e.outcome)
            .chain(properties.iter().map(|e| e.outcome))
            .chain(locks.iter().map(|e| e.outcome))
            .chain(grants.iter().map(|e| e.outcome))
            .chain(tokens.iter().map(|e| e.outcome))
            .for_each(|kind| counts.add(kind));

        Self {
            evaluated_at: format_instant(now),
            counts,
            owner,
            guests,
            properties,
            locks,
            grants,
            tokens,
        }
    }

    /// Whether every step completed, remotely or simulated
    pub fn is_complete(&self) -> bool {
        self.counts.failed == 0 && self.counts.aborted == 0
    }
}
