use async_trait::async_trait;
use mongodb::bson::Document;
use mongodb::Collection;
use thiserror::Error;

/// Failure surfaced by the backing document store.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct StoreError(#[from] mongodb::error::Error);

/// Matched/modified counts reported by a conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
}

/// The slice of the user collection the role service depends on: one
/// conditional update plus the lookup used to explain a miss. Injected so
/// the service runs against an in-memory store in tests.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError>;
    async fn update_one(&self, filter: Document, update: Document) -> Result<UpdateReport, StoreError>;
}

/// Store backed by the live user collection.
#[derive(Clone)]
pub struct MongoUsers {
    users: Collection<Document>,
}

impl MongoUsers {
    pub fn new(users: Collection<Document>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserStore for MongoUsers {
    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError> {
        Ok(self.users.find_one(filter).await?)
    }

    async fn update_one(&self, filter: Document, update: Document) -> Result<UpdateReport, StoreError> {
        let result = self.users.update_one(filter, update).await?;
        Ok(UpdateReport {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }
}
