use crate::domain::entities::{
    Collection, DeleteResult, DocumentFilter, DocumentId, Fields, InsertOneResult, SetFields,
    StoredDocument, UpdateResult,
};
use crate::domain::errors::DomainResult;

/// Single-collection document operations. Every call touches exactly one
/// collection and at most one document for writes.
#[async_trait::async_trait]
pub trait DocumentRepository: Send + Sync {
    /// All matching documents in natural (insertion) order
    async fn find(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
    ) -> DomainResult<Vec<StoredDocument>>;

    /// First matching document, if any
    async fn find_one(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
    ) -> DomainResult<Option<StoredDocument>>;

    /// Insert `fields` under a freshly generated identifier
    async fn insert_one(&self, collection: Collection, fields: Fields)
        -> DomainResult<InsertOneResult>;

    /// `$set` the given top-level fields on the document with `id`.
    /// With `upsert`, a missing document is created with that identifier.
    async fn update_one(
        &self,
        collection: Collection,
        id: &DocumentId,
        set: &SetFields,
        upsert: bool,
    ) -> DomainResult<UpdateResult>;

    async fn delete_one(&self, collection: Collection, id: &DocumentId)
        -> DomainResult<DeleteResult>;

    async fn count(&self, collection: Collection) -> DomainResult<u64>;
}
