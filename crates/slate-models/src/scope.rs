//! Resolved identities and the role-scoped query planner.
//!
//! Every data-access operation receives an [`Identity`] resolved once at the
//! request boundary and derives a typed scope from it. The scope variants are
//! the only access predicates the aggregation services know how to execute,
//! so a handler cannot accidentally widen a caller's visibility: the planner
//! runs before any query is built.
//!
//! Planning is pure: resolving the rows a scope matches (a parent's
//! children, a teacher's subjects) happens inside the scope-bound SQL, not
//! here.

use serde::Serialize;
use utoipa::ToSchema;

use crate::ids::UserId;
use crate::roles::Role;

/// A caller identity resolved from a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Which exams a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamScope {
    /// Admin: every published exam.
    Published,
    /// Teacher: exams having at least one subject this teacher teaches.
    TaughtBy(UserId),
    /// Student: exams for the caller's own grade.
    GradeOf(UserId),
    /// Parent: exams for the grades of all the caller's children.
    ChildrenOf(UserId),
}

impl ExamScope {
    /// Plans the exam filter for a resolved identity. Total over all roles.
    pub fn for_identity(identity: &Identity) -> Self {
        match identity.role {
            Role::Admin => ExamScope::Published,
            Role::Teacher => ExamScope::TaughtBy(identity.user_id),
            Role::Student => ExamScope::GradeOf(identity.user_id),
            Role::Parent => ExamScope::ChildrenOf(identity.user_id),
        }
    }
}

/// Which report cards a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportCardScope {
    /// Teacher: cards belonging to the caller's own generation batches,
    /// drafts included.
    OwnBatches(UserId),
    /// Student: the caller's own cards, published only.
    OwnPublished(UserId),
    /// Parent: cards of all the caller's children, published only.
    ChildrenPublished(UserId),
}

impl ReportCardScope {
    /// Plans the report-card filter for a resolved identity.
    ///
    /// Admins have no listing predicate (they operate on generation batches
    /// directly), so planning for an admin yields `None` and the caller maps
    /// that to an authorization failure.
    pub fn for_identity(identity: &Identity) -> Option<Self> {
        match identity.role {
            Role::Admin => None,
            Role::Teacher => Some(ReportCardScope::OwnBatches(identity.user_id)),
            Role::Student => Some(ReportCardScope::OwnPublished(identity.user_id)),
            Role::Parent => Some(ReportCardScope::ChildrenPublished(identity.user_id)),
        }
    }

    /// Whether this scope is restricted to published cards.
    pub const fn published_only(&self) -> bool {
        matches!(
            self,
            ReportCardScope::OwnPublished(_) | ReportCardScope::ChildrenPublished(_)
        )
    }
}
