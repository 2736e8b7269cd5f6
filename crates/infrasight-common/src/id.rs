//! Maintenance record identifiers.
//!
//! Ids are Snowflake values rendered as decimal strings. A single
//! process-wide bucket issues them; [`configure`] chooses its worker bits
//! once, before the first id is drawn.

use snowflake::SnowflakeIdBucket;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Machine and node ids each occupy 5 bits of a Snowflake id.
pub const MAX_WORKER_ID: i32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field} {value} is outside 0..=31")]
pub struct WorkerIdError {
    pub field: &'static str,
    pub value: i32,
}

/// The worker bits stamped into every id this process issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerId {
    machine_id: i32,
    node_id: i32,
}

impl WorkerId {
    pub fn new(machine_id: i32, node_id: i32) -> Result<Self, WorkerIdError> {
        for (field, value) in [("machine_id", machine_id), ("node_id", node_id)] {
            if !(0..=MAX_WORKER_ID).contains(&value) {
                return Err(WorkerIdError { field, value });
            }
        }
        Ok(Self {
            machine_id,
            node_id,
        })
    }

    fn bucket(self) -> Mutex<SnowflakeIdBucket> {
        Mutex::new(SnowflakeIdBucket::new(self.machine_id, self.node_id))
    }
}

impl Default for WorkerId {
    fn default() -> Self {
        Self {
            machine_id: 1,
            node_id: 1,
        }
    }
}

static BUCKET: OnceLock<Mutex<SnowflakeIdBucket>> = OnceLock::new();

/// Installs `worker` as the id source.
///
/// Returns `false` when a bucket already exists, either from an earlier call
/// or because [`next_id`] ran first with [`WorkerId::default`].
pub fn configure(worker: WorkerId) -> bool {
    let mut installed = false;
    BUCKET.get_or_init(|| {
        installed = true;
        worker.bucket()
    });
    installed
}

/// Draws the next id.
pub fn next_id() -> String {
    let bucket = BUCKET.get_or_init(|| WorkerId::default().bucket());
    let mut bucket = bucket.lock().unwrap_or_else(PoisonError::into_inner);
    bucket.get_id().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn worker_id_rejects_out_of_range_bits() {
        assert!(WorkerId::new(0, MAX_WORKER_ID).is_ok());
        assert_eq!(
            WorkerId::new(32, 1),
            Err(WorkerIdError {
                field: "machine_id",
                value: 32
            })
        );
        let err = WorkerId::new(1, -1).unwrap_err();
        assert_eq!(err.field, "node_id");
        assert!(err.to_string().contains("0..=31"));
    }

    #[test]
    fn ids_are_positive_and_unique() {
        let ids: HashSet<i64> = (0..5000)
            .map(|_| next_id().parse::<i64>().expect("id should be an i64"))
            .collect();
        assert_eq!(ids.len(), 5000);
        assert!(ids.iter().all(|&id| id > 0));
    }

    #[test]
    fn configure_after_first_id_is_ignored() {
        next_id();
        assert!(!configure(WorkerId::default()));
    }
}
