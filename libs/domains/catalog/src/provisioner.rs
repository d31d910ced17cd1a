//! Provisioning runs: collections, indexes, seed data and verification

use chrono::{DateTime, Utc};
use mongodb::bson::{to_document, Document};
use serde::Serialize;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{ProvisionError, ProvisionResult};
use crate::indexes::{expected_index_names, indexes_for};
use crate::models::CatalogCollection;
use crate::report::{
    inspect_documents, CollectionReport, CollectionSummary, ProvisionSummary, VerificationReport,
};
use crate::repository::CatalogRepository;
use crate::schema::collection_spec;
use crate::seed::SeedData;

/// Sets up the catalog collections of one database
///
/// Each step is awaited in order and the first failure aborts the run. A
/// second `provision` against the same database fails with
/// `CollectionExists` or `DuplicateKey`; use [`Provisioner::reset`] to start
/// over.
pub struct Provisioner<R: CatalogRepository> {
    repository: R,
    database: String,
}

impl<R: CatalogRepository> Provisioner<R> {
    pub fn new(repository: R, database: impl Into<String>) -> Self {
        Self {
            repository,
            database: database.into(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Full run stamped with the current time
    pub async fn provision(&self) -> ProvisionResult<ProvisionSummary> {
        self.provision_at(Utc::now()).await
    }

    /// Create every collection with its indexes, then load the seed data
    pub async fn provision_at(&self, now: DateTime<Utc>) -> ProvisionResult<ProvisionSummary> {
        self.provision_with(SeedData::at(now)).await
    }

    /// Full run loading `seed` instead of the standard records
    ///
    /// The seed is validated before the first collection is created, so an
    /// invalid record leaves the database untouched.
    #[instrument(skip(self, seed), fields(database = %self.database))]
    pub async fn provision_with(&self, seed: SeedData) -> ProvisionResult<ProvisionSummary> {
        let batches = seed_batches(seed)?;
        let mut collections = Vec::with_capacity(CatalogCollection::ALL.len());

        for collection in CatalogCollection::ALL {
            self.create_collection(collection).await?;
            let indexes = self.create_indexes(collection).await?;
            collections.push(CollectionSummary {
                collection,
                indexes,
                inserted: 0,
            });
        }

        for (collection, inserted) in self.insert_batches(batches).await? {
            if let Some(summary) = collections.iter_mut().find(|s| s.collection == collection) {
                summary.inserted = inserted;
            }
        }

        info!("Provisioning complete");
        Ok(ProvisionSummary {
            database: self.database.clone(),
            collections,
        })
    }

    /// Create `collection` with its strict validator
    pub async fn create_collection(&self, collection: CatalogCollection) -> ProvisionResult<()> {
        self.repository
            .create_collection(&collection_spec(collection))
            .await
    }

    /// Create the named index set of `collection`
    pub async fn create_indexes(
        &self,
        collection: CatalogCollection,
    ) -> ProvisionResult<Vec<String>> {
        self.repository
            .create_indexes(collection, indexes_for(collection))
            .await
    }

    /// Insert seed products, then seed customers, one ordered batch each
    ///
    /// Every seed document is validated first; nothing is written when one
    /// of them breaks a rule.
    #[instrument(skip(self))]
    pub async fn seed(&self, now: DateTime<Utc>) -> ProvisionResult<Vec<(CatalogCollection, u64)>> {
        let batches = seed_batches(SeedData::at(now))?;
        self.insert_batches(batches).await
    }

    async fn insert_batches(
        &self,
        batches: Vec<(CatalogCollection, Vec<Document>)>,
    ) -> ProvisionResult<Vec<(CatalogCollection, u64)>> {
        let mut inserted = Vec::with_capacity(batches.len());
        for (collection, documents) in batches {
            let count = self
                .repository
                .insert_documents(collection, documents)
                .await?;
            inserted.push((collection, count));
        }
        Ok(inserted)
    }

    /// Inspect the database against the expected collections, indexes and
    /// document rules without changing anything
    #[instrument(skip(self), fields(database = %self.database))]
    pub async fn verify(&self) -> ProvisionResult<VerificationReport> {
        let existing = self.repository.list_collection_names().await?;
        let mut collections = Vec::with_capacity(CatalogCollection::ALL.len());

        for collection in CatalogCollection::ALL {
            let expected: Vec<String> = expected_index_names(collection)
                .into_iter()
                .map(str::to_string)
                .collect();

            if !existing.iter().any(|name| name == collection.name()) {
                warn!(collection = collection.name(), "Collection missing");
                collections.push(CollectionReport::missing(collection, expected));
                continue;
            }

            let present = self.repository.list_index_names(collection).await?;
            let missing_indexes = expected
                .into_iter()
                .filter(|name| !present.contains(name))
                .collect();
            let document_count = self.repository.count_documents(collection).await?;
            let documents = self.repository.find_documents(collection).await?;
            let findings = inspect_documents(collection, &documents);

            collections.push(CollectionReport {
                collection,
                exists: true,
                document_count,
                missing_indexes,
                findings,
            });
        }

        let report = VerificationReport {
            database: self.database.clone(),
            collections,
        };
        info!(clean = report.is_clean(), "Verification complete");
        Ok(report)
    }

    /// Drop every catalog collection together with its documents and indexes
    #[instrument(skip(self), fields(database = %self.database))]
    pub async fn reset(&self) -> ProvisionResult<()> {
        for collection in CatalogCollection::ALL {
            self.repository.drop_collection(collection).await?;
        }
        warn!("Catalog collections dropped");
        Ok(())
    }
}

/// Validate and serialize `seed`, products first
fn seed_batches(seed: SeedData) -> ProvisionResult<Vec<(CatalogCollection, Vec<Document>)>> {
    let products = to_documents(CatalogCollection::Products, seed.products, |p| {
        p.product_id.clone()
    })?;
    let customers = to_documents(CatalogCollection::Customers, seed.customers, |c| {
        c.customer_id.clone()
    })?;
    Ok(vec![
        (CatalogCollection::Products, products),
        (CatalogCollection::Customers, customers),
    ])
}

fn to_documents<T, F>(
    collection: CatalogCollection,
    entities: Vec<T>,
    identifier: F,
) -> ProvisionResult<Vec<Document>>
where
    T: Serialize + Validate,
    F: Fn(&T) -> String,
{
    entities
        .iter()
        .map(|entity| -> ProvisionResult<Document> {
            entity
                .validate()
                .map_err(|e| ProvisionError::InvalidDocument {
                    collection: collection.name().to_string(),
                    id: identifier(entity),
                    details: e.to_string(),
                })?;
            Ok(to_document(entity)?)
        })
        .collect()
}
