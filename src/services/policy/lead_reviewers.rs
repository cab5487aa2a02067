//! Lead reviewer coverage policy.
//!
//! A lead reviewer counts as covered once they appear in the aggregate at all,
//! whether their review is still pending or already submitted.

use std::collections::BTreeSet;

/// Whether one lead reviewer has been added to the pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadCoverage {
    pub reviewer: String,
    pub present: bool,
}

/// True iff every lead reviewer is among the invited logins.
///
/// Stops at the first missing lead. An empty lead list always passes.
pub fn decide(invited: &BTreeSet<&str>, leads: &[String]) -> bool {
    for lead in leads {
        if !invited.contains(lead.as_str()) {
            log::debug!("Lead reviewer '{}' has not been added", lead);
            return false;
        }
    }
    true
}

/// Membership of every lead reviewer, in configuration order.
pub fn coverage(invited: &BTreeSet<&str>, leads: &[String]) -> Vec<LeadCoverage> {
    leads
        .iter()
        .map(|lead| LeadCoverage {
            reviewer: lead.clone(),
            present: invited.contains(lead.as_str()),
        })
        .collect()
}
