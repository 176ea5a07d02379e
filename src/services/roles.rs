use mongodb::bson::{doc, oid::ObjectId, Document};
use thiserror::Error;
use tracing::debug;

use super::store::{StoreError, UserStore};
use crate::models::{Role, TrainerProfile, TrainerStatus};

/// Fields that only exist while a record is an approved trainer.
const TRAINER_FIELDS: &[&str] = &["skills", "socials", "availableDays", "availableSlots", "experience"];

/// A role transition requested through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    /// Trainer-application approval. `grant` is the role the request asked
    /// for, defaulting to `trainer`.
    Approve { grant: Role },
    /// Revoke trainer standing and return the record to a plain user.
    Demote,
    /// Promote a plain user to admin. One-way; no route demotes an admin.
    Promote,
}

/// Role and approval status a transition leaves behind. `status: None`
/// means the stored status is not touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleState {
    pub role: Role,
    pub status: Option<TrainerStatus>,
}

impl RoleChange {
    /// Transition table: the state this change produces for a record
    /// currently holding `current`, or `None` when the change does not
    /// apply from that role.
    pub fn applied_to(self, current: Role) -> Option<RoleState> {
        let admissible = match (self, current) {
            // Approval never inspected the previous role in the deployed
            // service: an admin or an already-approved trainer can be
            // (re)granted. Kept that way.
            (RoleChange::Approve { .. }, _) => true,
            (RoleChange::Demote, Role::Trainer) => true,
            (RoleChange::Promote, Role::User) => true,
            _ => false,
        };
        admissible.then(|| self.target())
    }

    /// Where this change lands. Table rows only differ in which current
    /// roles they admit, never in the state they produce.
    fn target(self) -> RoleState {
        match self {
            RoleChange::Approve { grant } => RoleState {
                role: grant,
                status: Some(TrainerStatus::Approved),
            },
            RoleChange::Demote => RoleState {
                role: Role::User,
                status: Some(TrainerStatus::Disapproved),
            },
            RoleChange::Promote => RoleState {
                role: Role::Admin,
                status: None,
            },
        }
    }

    /// Compound filter for the conditional update: the caller's selector
    /// plus this change's admissible-role guard. A change admissible from
    /// every role matches on the selector alone.
    fn filter(self, mut selector: Document) -> Document {
        let admissible: Vec<Role> = Role::ALL
            .iter()
            .copied()
            .filter(|role| self.applied_to(*role).is_some())
            .collect();
        match admissible.as_slice() {
            all if all.len() == Role::ALL.len() => {}
            [only] => {
                selector.insert("role", only.as_str());
            }
            several => {
                let roles: Vec<&str> = several.iter().map(|role| role.as_str()).collect();
                selector.insert("role", doc! { "$in": roles });
            }
        }
        selector
    }
}

/// How a transition request resolved against the store. The HTTP layer
/// collapses the non-applied cases back into the legacy not-found style
/// responses; internally they stay distinct so callers and tests can
/// assert on the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A record matched the compound filter and was rewritten.
    Applied,
    /// A record matched but every value was already in place.
    NoChange,
    /// Nothing matches the identifier (or email).
    NotFound,
    /// The record exists but its current role does not admit this change.
    RoleMismatch,
}

/// Input and store failures for role transitions. Input errors are raised
/// before any store access; the message text is what the API returns.
#[derive(Debug, Error)]
pub enum RoleError {
    #[error("Invalid user ID format")]
    InvalidId,
    #[error("Missing trainerEmail")]
    MissingEmail,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Applies role/status changes to user records. Every write is a single
/// conditional update whose filter carries the transition table's role
/// guard, so the legality check and the mutation cannot interleave with a
/// concurrent change.
#[derive(Clone)]
pub struct RoleService<S> {
    store: S,
}

impl<S: UserStore> RoleService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Approve a trainer application, keyed by email. Writes the supplied
    /// profile fields and stamps status `approved`; the granted role
    /// defaults to `trainer`.
    pub async fn approve_trainer(
        &self,
        email: Option<&str>,
        grant: Option<Role>,
        profile: TrainerProfile,
    ) -> Result<Transition, RoleError> {
        let email = match email.map(str::trim) {
            Some(email) if !email.is_empty() => email,
            _ => return Err(RoleError::MissingEmail),
        };
        let change = RoleChange::Approve { grant: grant.unwrap_or(Role::Trainer) };
        self.run(doc! { "email": email }, change, profile.into_set(), &[]).await
    }

    /// Demote a trainer back to a plain user, clearing the trainer-only
    /// fields in the same update.
    pub async fn demote_trainer(&self, id: &str) -> Result<Transition, RoleError> {
        let id = ObjectId::parse_str(id).map_err(|_| RoleError::InvalidId)?;
        self.run(doc! { "_id": id }, RoleChange::Demote, Document::new(), TRAINER_FIELDS).await
    }

    /// Promote a plain user to admin.
    pub async fn promote_to_admin(&self, id: &str) -> Result<Transition, RoleError> {
        let id = ObjectId::parse_str(id).map_err(|_| RoleError::InvalidId)?;
        self.run(doc! { "_id": id }, RoleChange::Promote, Document::new(), &[]).await
    }

    async fn run(
        &self,
        selector: Document,
        change: RoleChange,
        mut set: Document,
        unset: &[&str],
    ) -> Result<Transition, RoleError> {
        let target = change.target();
        set.insert("role", target.role.as_str());
        if let Some(status) = target.status {
            set.insert("status", status.as_str());
        }
        let mut update = doc! { "$set": set };
        if !unset.is_empty() {
            let mut cleared = Document::new();
            for field in unset {
                cleared.insert(*field, "");
            }
            update.insert("$unset", cleared);
        }

        let report = self.store.update_one(change.filter(selector.clone()), update).await?;
        if report.matched == 0 {
            return Ok(self.explain_miss(selector, change).await?);
        }
        Ok(if report.modified > 0 { Transition::Applied } else { Transition::NoChange })
    }

    /// The conditional update is the atomic check; this read only names the
    /// reason it matched nothing.
    async fn explain_miss(&self, selector: Document, change: RoleChange) -> Result<Transition, StoreError> {
        let record = match self.store.find_one(selector).await? {
            Some(record) => record,
            None => return Ok(Transition::NotFound),
        };
        let current = record.get_str("role").ok().and_then(Role::parse);
        if current.is_some_and(|role| change.applied_to(role).is_some()) {
            // The record looks eligible again: a concurrent writer moved it
            // between the update and this read. The update itself saw
            // nothing to match.
            return Ok(Transition::NotFound);
        }
        debug!(
            role = record.get_str("role").unwrap_or("<absent>"),
            "role change rejected by current state"
        );
        Ok(Transition::RoleMismatch)
    }
}
