use uuid::Uuid;

use super::batch::Distribution;
use super::contact::ContactRecord;
use super::errors::{UploadError, UploadResult};

/// Number of records each of `agents` receives for `total` records
///
/// The first `total % agents` entries get one extra record.
///
/// # Example
/// ```
/// use agent_lists_api::domain::lists::distributor::share_sizes;
///
/// assert_eq!(share_sizes(10, 3), vec![4, 3, 3]);
/// assert_eq!(share_sizes(2, 5), vec![1, 1, 0, 0, 0]);
/// ```
pub fn share_sizes(total: usize, agents: usize) -> Vec<usize> {
    if agents == 0 {
        return Vec::new();
    }

    let base = total / agents;
    let remainder = total % agents;

    (0..agents)
        .map(|index| base + usize::from(index < remainder))
        .collect()
}

/// Splits `records` into one contiguous slice per agent
///
/// Agents are served in the order given. Every record lands in exactly one
/// distribution and slice sizes differ by at most one; agents beyond the
/// record count receive an empty distribution.
///
/// # Errors
/// * `UploadError::NoAgents` - If `agent_ids` is empty
pub fn distribute(records: &[ContactRecord], agent_ids: &[Uuid]) -> UploadResult<Vec<Distribution>> {
    if agent_ids.is_empty() {
        return Err(UploadError::NoAgents);
    }

    let mut remaining = records;
    let distributions = agent_ids
        .iter()
        .zip(share_sizes(records.len(), agent_ids.len()))
        .map(|(agent_id, size)| {
            let (slice, rest) = remaining.split_at(size);
            remaining = rest;
            Distribution::new(*agent_id, slice.to_vec())
        })
        .collect();

    Ok(distributions)
}
