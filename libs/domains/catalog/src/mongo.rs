//! MongoDB implementation of CatalogRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{self, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::{ProvisionError, ProvisionResult};
use crate::indexes::IndexSpec;
use crate::models::CatalogCollection;
use crate::repository::CatalogRepository;
use crate::schema::{CollectionSpec, ValidationAction, ValidationLevel};

/// Provisions the catalog collections of one MongoDB database
pub struct MongoCatalogRepository {
    db: Database,
}

impl MongoCatalogRepository {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    pub fn database_name(&self) -> &str {
        self.db.name()
    }

    fn collection(&self, collection: CatalogCollection) -> Collection<Document> {
        self.db.collection::<Document>(collection.name())
    }
}

impl From<ValidationLevel> for options::ValidationLevel {
    fn from(level: ValidationLevel) -> Self {
        match level {
            ValidationLevel::Strict => options::ValidationLevel::Strict,
            ValidationLevel::Moderate => options::ValidationLevel::Moderate,
            ValidationLevel::Off => options::ValidationLevel::Off,
        }
    }
}

impl From<ValidationAction> for options::ValidationAction {
    fn from(action: ValidationAction) -> Self {
        match action {
            ValidationAction::Error => options::ValidationAction::Error,
            ValidationAction::Warn => options::ValidationAction::Warn,
        }
    }
}

impl From<IndexSpec> for IndexModel {
    fn from(spec: IndexSpec) -> Self {
        let mut options = IndexOptions::default();
        options.name = Some(spec.name.to_string());
        if spec.unique {
            options.unique = Some(true);
        }
        options.weights = spec.weights;
        options.default_language = spec.default_language.map(str::to_string);

        IndexModel::builder()
            .keys(spec.keys)
            .options(options)
            .build()
    }
}

#[async_trait]
impl CatalogRepository for MongoCatalogRepository {
    #[instrument(skip(self, spec), fields(collection = spec.name()))]
    async fn create_collection(&self, spec: &CollectionSpec) -> ProvisionResult<()> {
        self.db
            .create_collection(spec.name())
            .validator(spec.validator.clone())
            .validation_level(options::ValidationLevel::from(spec.validation_level))
            .validation_action(options::ValidationAction::from(spec.validation_action))
            .await
            .map_err(|e| ProvisionError::from_driver(spec.name(), e))?;

        tracing::info!(
            level = %spec.validation_level,
            action = %spec.validation_action,
            "Collection created with validator"
        );
        Ok(())
    }

    #[instrument(skip(self, indexes), fields(collection = collection.name(), count = indexes.len()))]
    async fn create_indexes(
        &self,
        collection: CatalogCollection,
        indexes: Vec<IndexSpec>,
    ) -> ProvisionResult<Vec<String>> {
        let models: Vec<IndexModel> = indexes.into_iter().map(IndexModel::from).collect();

        let result = self
            .collection(collection)
            .create_indexes(models)
            .await
            .map_err(|e| ProvisionError::from_driver(collection.name(), e))?;

        tracing::info!(indexes = ?result.index_names, "Indexes created");
        Ok(result.index_names)
    }

    #[instrument(skip(self, documents), fields(collection = collection.name(), count = documents.len()))]
    async fn insert_documents(
        &self,
        collection: CatalogCollection,
        documents: Vec<Document>,
    ) -> ProvisionResult<u64> {
        let result = self
            .collection(collection)
            .insert_many(documents)
            .await
            .map_err(|e| ProvisionError::from_driver(collection.name(), e))?;

        let inserted = result.inserted_ids.len() as u64;
        tracing::info!(inserted, "Documents inserted");
        Ok(inserted)
    }

    #[instrument(skip(self), fields(collection = collection.name()))]
    async fn count_documents(&self, collection: CatalogCollection) -> ProvisionResult<u64> {
        let count = self.collection(collection).count_documents(doc! {}).await?;
        Ok(count)
    }

    #[instrument(skip(self), fields(collection = collection.name()))]
    async fn list_index_names(&self, collection: CatalogCollection) -> ProvisionResult<Vec<String>> {
        let names = self.collection(collection).list_index_names().await?;
        Ok(names)
    }

    #[instrument(skip(self))]
    async fn list_collection_names(&self) -> ProvisionResult<Vec<String>> {
        let names = self.db.list_collection_names().await?;
        Ok(names)
    }

    #[instrument(skip(self), fields(collection = collection.name()))]
    async fn find_documents(&self, collection: CatalogCollection) -> ProvisionResult<Vec<Document>> {
        let cursor = self.collection(collection).find(doc! {}).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    #[instrument(skip(self), fields(collection = collection.name()))]
    async fn drop_collection(&self, collection: CatalogCollection) -> ProvisionResult<()> {
        self.collection(collection).drop().await?;
        tracing::warn!("Collection dropped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexes::indexes_for;

    #[test]
    fn test_unique_index_model() {
        let spec = indexes_for(CatalogCollection::Products).remove(0);
        let model = IndexModel::from(spec);
        let options = model.options.unwrap();
        assert_eq!(options.name.as_deref(), Some("idx_products_productId_unique"));
        assert_eq!(options.unique, Some(true));
        assert_eq!(model.keys, doc! { "productId": 1 });
    }

    #[test]
    fn test_text_index_model_carries_weights_and_language() {
        let spec = indexes_for(CatalogCollection::Customers)
            .into_iter()
            .find(IndexSpec::is_text)
            .unwrap();
        let options = IndexModel::from(spec).options.unwrap();
        assert_eq!(options.default_language.as_deref(), Some("spanish"));
        assert_eq!(options.weights, Some(doc! { "name": 10, "email": 5 }));
        assert_eq!(options.unique, None);
    }

    #[test]
    fn test_validation_options_map_to_driver() {
        assert!(matches!(
            options::ValidationLevel::from(ValidationLevel::Strict),
            options::ValidationLevel::Strict
        ));
        assert!(matches!(
            options::ValidationAction::from(ValidationAction::Error),
            options::ValidationAction::Error
        ));
    }
}
