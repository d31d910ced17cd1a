//! Catalog Domain
//!
//! Collections, validators, indexes and seed data of the e-commerce document
//! store, plus the provisioner that applies them to a MongoDB database.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ Provisioner │  ← provision / verify / reset runs
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Storage seam (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────────────────────┐
//! │ Schema · Indexes · Seed · Models │  ← Declarative store definition
//! └─────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{MongoCatalogRepository, Provisioner};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("global_mobility-apex-ecommerce");
//!
//! let provisioner = Provisioner::new(MongoCatalogRepository::new(&db), db.name());
//! let summary = provisioner.provision().await?;
//! assert_eq!(summary.collections.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod indexes;
pub mod models;
pub mod mongo;
pub mod provisioner;
pub mod report;
pub mod repository;
pub mod schema;
pub mod seed;

pub use error::{ProvisionError, ProvisionResult};
pub use indexes::{expected_index_names, indexes_for, IndexSpec};
pub use models::{CatalogCollection, Customer, Order, OrderItem, OrderStatus, Product};
pub use mongo::MongoCatalogRepository;
pub use provisioner::Provisioner;
pub use report::{
    CollectionReport, CollectionSummary, Finding, FindingKind, ProvisionSummary,
    VerificationReport,
};
pub use repository::CatalogRepository;
pub use seed::SeedData;
pub use schema::{collection_spec, collection_specs, CollectionSpec, ValidationAction, ValidationLevel};
