//! # Domain Invariants
//!
//! Invariants that MUST hold for every token's resource state.
//!
//! - INVARIANT-1: Pending and active are disjoint
//! - INVARIANT-2: No duplicates within pending or within active
//! - INVARIANT-3: Pending length never exceeds the configured cap
//! - INVARIANT-4: A priority reorder is an exact permutation of active
//! - INVARIANT-5: Overwrite proposals only exist for pending ids

use crate::domain::entities::TokenResourceState;
use crate::domain::value_objects::GlobalResourceId;
use crate::errors::{ResourceError, ResourceResult};
use std::collections::HashSet;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: Pending/Active Disjointness
#[must_use]
pub fn check_disjoint_invariant(state: &TokenResourceState) -> bool {
    let active: HashSet<_> = state.active().iter().collect();
    state.pending().iter().all(|id| !active.contains(id))
}

/// INVARIANT-2: Uniqueness within each list
#[must_use]
pub fn check_unique_invariant(state: &TokenResourceState) -> bool {
    has_no_duplicates(state.pending()) && has_no_duplicates(state.active())
}

/// INVARIANT-3: Pending Cap
#[must_use]
pub fn check_pending_cap_invariant(state: &TokenResourceState, max_pending: usize) -> bool {
    state.pending().len() <= max_pending
}

/// INVARIANT-4: Priority Permutation
///
/// `ordered` must contain exactly the ids of `active`, each once.
///
/// # Errors
///
/// - `BadLength` if the lengths differ
/// - `UnknownActiveResource` for the first id not in `active`
/// - `DuplicatePriorityEntry` for the first repeated id
pub fn check_priority_permutation(
    active: &[GlobalResourceId],
    ordered: &[GlobalResourceId],
) -> ResourceResult<()> {
    if ordered.len() != active.len() {
        return Err(ResourceError::BadLength {
            expected: active.len(),
            actual: ordered.len(),
        });
    }

    let members: HashSet<_> = active.iter().collect();
    let mut seen = HashSet::with_capacity(ordered.len());
    for id in ordered {
        if !members.contains(id) {
            return Err(ResourceError::UnknownActiveResource(*id));
        }
        if !seen.insert(id) {
            return Err(ResourceError::DuplicatePriorityEntry(*id));
        }
    }
    // Equal length, every id a member, no repeats: same set.
    Ok(())
}

/// INVARIANT-5: Overwrite Proposals Track Pending
#[must_use]
pub fn check_overwrite_invariant(state: &TokenResourceState) -> bool {
    let with_proposal = state
        .pending()
        .iter()
        .filter(|id| state.overwrite_of(**id).is_some())
        .count();
    with_proposal == state.overwrite_count()
}

/// Check all state invariants at once.
#[must_use]
pub fn check_all_invariants(state: &TokenResourceState, max_pending: usize) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_disjoint_invariant(state) {
        violations.push(InvariantViolation::PendingActiveOverlap);
    }

    if !check_unique_invariant(state) {
        violations.push(InvariantViolation::DuplicateEntry);
    }

    if !check_pending_cap_invariant(state, max_pending) {
        violations.push(InvariantViolation::PendingOverCap {
            len: state.pending().len(),
            max: max_pending,
        });
    }

    if !check_overwrite_invariant(state) {
        violations.push(InvariantViolation::DanglingOverwrite);
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

fn has_no_duplicates(ids: &[GlobalResourceId]) -> bool {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().all(|id| seen.insert(id))
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An id is both pending and active.
    PendingActiveOverlap,
    /// An id appears twice in one list.
    DuplicateEntry,
    /// Pending grew past the cap.
    PendingOverCap {
        /// Pending length found.
        len: usize,
        /// Configured cap.
        max: usize,
    },
    /// An overwrite proposal outlived its pending id.
    DanglingOverwrite,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PendingActiveOverlap => write!(f, "resource is both pending and active"),
            Self::DuplicateEntry => write!(f, "duplicate resource in list"),
            Self::PendingOverCap { len, max } => {
                write!(f, "pending list over cap: {len} > {max}")
            }
            Self::DanglingOverwrite => write!(f, "overwrite proposal without pending resource"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
