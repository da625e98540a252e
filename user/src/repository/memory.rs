use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::UserRecord;

use super::{DirectoryError, UserDirectory};

/// In memory directory.
pub struct Memory {
    users: Arc<RwLock<Vec<UserRecord>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            users: Arc::new(RwLock::new(records)),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for Memory {
    async fn read(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let users = self
            .users
            .read()
            .map_err(|err| DirectoryError::UpstreamUnavailable(err.to_string()))?;
        Ok(users.clone())
    }
}
