use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::contact::ContactRecord;

/// Contact records assigned to one agent within a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    agent_id: Uuid,
    records: Vec<ContactRecord>,
}

impl Distribution {
    pub fn new(agent_id: Uuid, records: Vec<ContactRecord>) -> Self {
        Self { agent_id, records }
    }

    pub fn agent_id(&self) -> Uuid {
        self.agent_id
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    /// Number of records assigned to the agent
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

/// One upload and the distribution it produced
///
/// Immutable audit record: there are no mutators, and the total is derived
/// from the distributions so the two can never disagree.
///
/// # Invariants
/// - At least one distribution
/// - `total_record_count` equals the sum of distribution counts
/// - Distribution counts differ by at most one
///
/// # Example
/// ```
/// use agent_lists_api::domain::lists::{ContactRecord, Distribution, UploadBatch};
/// use uuid::Uuid;
///
/// let record = ContactRecord::new("Ada", "555", "").unwrap();
/// let batch = UploadBatch::new(
///     "leads.csv".to_string(),
///     Uuid::new_v4(),
///     vec![Distribution::new(Uuid::new_v4(), vec![record])],
/// )
/// .expect("valid batch");
///
/// assert_eq!(batch.total_record_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct UploadBatch {
    id: Uuid,
    source_file_name: String,
    uploaded_by: Uuid,
    created_at: DateTime<Utc>,
    distributions: Vec<Distribution>,
}

impl UploadBatch {
    /// Creates a new batch from a completed distribution
    ///
    /// # Returns
    /// * `Ok(UploadBatch)` - New batch with a fresh id and creation time
    /// * `Err(String)` - If the distributions are empty or unbalanced
    pub fn new(
        source_file_name: String,
        uploaded_by: Uuid,
        distributions: Vec<Distribution>,
    ) -> Result<Self, String> {
        if distributions.is_empty() {
            return Err("Batch must contain at least one distribution".to_string());
        }

        let min = distributions.iter().map(Distribution::count).min().unwrap_or(0);
        let max = distributions.iter().map(Distribution::count).max().unwrap_or(0);
        if max - min > 1 {
            return Err(format!(
                "Distribution counts must differ by at most one (min {}, max {})",
                min, max
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            source_file_name,
            uploaded_by,
            created_at: Utc::now(),
            distributions,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_file_name(&self) -> &str {
        &self.source_file_name
    }

    /// Returns the user who uploaded the file
    pub fn uploaded_by(&self) -> Uuid {
        self.uploaded_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn distributions(&self) -> &[Distribution] {
        &self.distributions
    }

    /// Total number of records across all distributions
    pub fn total_record_count(&self) -> usize {
        self.distributions.iter().map(Distribution::count).sum()
    }

    /// Reconstructs a batch from persisted data
    ///
    /// Skips validation; only repository implementations should call this.
    pub fn from_persistence(
        id: Uuid,
        source_file_name: String,
        uploaded_by: Uuid,
        created_at: DateTime<Utc>,
        distributions: Vec<Distribution>,
    ) -> Self {
        Self {
            id,
            source_file_name,
            uploaded_by,
            created_at,
            distributions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ContactRecord {
        ContactRecord::new(name, "555", "").unwrap()
    }

    #[test]
    fn total_is_sum_of_counts() {
        let batch = UploadBatch::new(
            "leads.csv".to_string(),
            Uuid::new_v4(),
            vec![
                Distribution::new(Uuid::new_v4(), vec![record("a"), record("b")]),
                Distribution::new(Uuid::new_v4(), vec![record("c")]),
            ],
        )
        .unwrap();

        assert_eq!(batch.total_record_count(), 3);
        assert_eq!(batch.source_file_name(), "leads.csv");
        assert_eq!(batch.distributions().len(), 2);
    }

    #[test]
    fn empty_distribution_list_is_rejected() {
        let result = UploadBatch::new("x.csv".to_string(), Uuid::new_v4(), Vec::new());
        assert!(result.unwrap_err().contains("at least one"));
    }

    #[test]
    fn unbalanced_distribution_is_rejected() {
        let result = UploadBatch::new(
            "x.csv".to_string(),
            Uuid::new_v4(),
            vec![
                Distribution::new(Uuid::new_v4(), vec![record("a"), record("b")]),
                Distribution::new(Uuid::new_v4(), Vec::new()),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn distribution_count_matches_records() {
        let distribution = Distribution::new(Uuid::new_v4(), vec![record("a"), record("b")]);
        assert_eq!(distribution.count(), 2);
    }

    #[test]
    fn each_batch_gets_a_fresh_id() {
        let make = || {
            UploadBatch::new(
                "x.csv".to_string(),
                Uuid::new_v4(),
                vec![Distribution::new(Uuid::new_v4(), vec![record("a")])],
            )
            .unwrap()
        };
        assert_ne!(make().id(), make().id());
    }
}
