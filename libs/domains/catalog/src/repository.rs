use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::ProvisionResult;
use crate::indexes::IndexSpec;
use crate::models::CatalogCollection;
use crate::schema::CollectionSpec;

/// Storage operations the provisioner needs from the document database
///
/// Every call is a single blocking step against the server; implementations
/// must not retry and must surface server failures as the matching
/// [`crate::ProvisionError`] variant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Create a collection with its validator attached
    async fn create_collection(&self, spec: &CollectionSpec) -> ProvisionResult<()>;

    /// Build indexes in the foreground, returning the created names
    async fn create_indexes(
        &self,
        collection: CatalogCollection,
        indexes: Vec<IndexSpec>,
    ) -> ProvisionResult<Vec<String>>;

    /// Ordered batch insert; stops at the first failing document
    async fn insert_documents(
        &self,
        collection: CatalogCollection,
        documents: Vec<Document>,
    ) -> ProvisionResult<u64>;

    async fn count_documents(&self, collection: CatalogCollection) -> ProvisionResult<u64>;

    async fn list_index_names(&self, collection: CatalogCollection) -> ProvisionResult<Vec<String>>;

    async fn list_collection_names(&self) -> ProvisionResult<Vec<String>>;

    /// Every document of the collection, raw
    async fn find_documents(&self, collection: CatalogCollection) -> ProvisionResult<Vec<Document>>;

    /// Drop a collection; dropping a missing collection succeeds
    async fn drop_collection(&self, collection: CatalogCollection) -> ProvisionResult<()>;
}
