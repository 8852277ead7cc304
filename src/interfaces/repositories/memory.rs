use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::{
    entities::contact::{ContactSubmission, SubmissionMetadata},
    errors::AppError,
    repositories::contact::ContactRepository,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredSubmission {
    pub id: Uuid,
    pub submission: ContactSubmission,
    pub metadata: SubmissionMetadata,
}

pub const DEFAULT_CAPACITY: usize = 500;

/// Process-local store used when no database is configured. Keeps only the
/// most recent `capacity` submissions.
#[derive(Debug)]
pub struct InMemoryContactRepo {
    submissions: Mutex<VecDeque<StoredSubmission>>,
    capacity: usize,
}

impl Default for InMemoryContactRepo {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InMemoryContactRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        InMemoryContactRepo {
            submissions: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn submissions(&self) -> Vec<StoredSubmission> {
        self.submissions.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.submissions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.lock().is_empty()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepo {
    async fn insert_submission(
        &self,
        submission: &ContactSubmission,
        metadata: &SubmissionMetadata,
    ) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let mut submissions = self.submissions.lock();
        while submissions.len() >= self.capacity {
            submissions.pop_front();
        }
        submissions.push_back(StoredSubmission {
            id,
            submission: submission.clone(),
            metadata: metadata.clone(),
        });
        Ok(id)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
