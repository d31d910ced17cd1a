//! Results of provisioning and verification runs

use std::collections::HashMap;

use mongodb::bson::{self, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::models::{CatalogCollection, Customer, Order, Product};

/// What one collection received during `provision`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSummary {
    pub collection: CatalogCollection,
    pub indexes: Vec<String>,
    pub inserted: u64,
}

/// Outcome of a full provisioning run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionSummary {
    pub database: String,
    pub collections: Vec<CollectionSummary>,
}

impl ProvisionSummary {
    pub fn inserted(&self, collection: CatalogCollection) -> u64 {
        self.collections
            .iter()
            .find(|c| c.collection == collection)
            .map_or(0, |c| c.inserted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Document does not decode into the expected shape
    Malformed,
    /// Document decodes but breaks a field constraint
    Invalid,
    DuplicateIdentifier,
    DuplicateEmail,
    /// Order line whose subtotal is not `price * quantity`
    SubtotalMismatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Natural identifier of the offending document
    pub document: String,
    pub kind: FindingKind,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport {
    pub collection: CatalogCollection,
    pub exists: bool,
    pub document_count: u64,
    pub missing_indexes: Vec<String>,
    pub findings: Vec<Finding>,
}

impl CollectionReport {
    pub fn missing(collection: CatalogCollection, expected_indexes: Vec<String>) -> Self {
        Self {
            collection,
            exists: false,
            document_count: 0,
            missing_indexes: expected_indexes,
            findings: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.exists && self.missing_indexes.is_empty() && self.findings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub database: String,
    pub collections: Vec<CollectionReport>,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.collections.iter().all(CollectionReport::is_clean)
    }

    pub fn collection(&self, collection: CatalogCollection) -> Option<&CollectionReport> {
        self.collections.iter().find(|c| c.collection == collection)
    }
}

/// A stored entity that can be checked against its client-side rules
trait Checked: DeserializeOwned + Validate {
    fn identifier(&self) -> &str;

    fn extra_findings(&self) -> Vec<Finding> {
        Vec::new()
    }
}

impl Checked for Product {
    fn identifier(&self) -> &str {
        &self.product_id
    }
}

impl Checked for Customer {
    fn identifier(&self) -> &str {
        &self.customer_id
    }
}

impl Checked for Order {
    fn identifier(&self) -> &str {
        &self.order_id
    }

    fn extra_findings(&self) -> Vec<Finding> {
        self.inconsistent_line_items()
            .into_iter()
            .map(|index| {
                let item = &self.items[index];
                Finding {
                    document: self.order_id.clone(),
                    kind: FindingKind::SubtotalMismatch,
                    detail: format!(
                        "item {} ({}): subtotal {:?} != {} x {}",
                        index, item.product_id, item.subtotal, item.price, item.quantity
                    ),
                }
            })
            .collect()
    }
}

/// Check raw documents of `collection` and list everything wrong with them
pub fn inspect_documents(collection: CatalogCollection, documents: &[Document]) -> Vec<Finding> {
    match collection {
        CatalogCollection::Products => inspect::<Product>(collection, documents, &[]),
        CatalogCollection::Customers => inspect::<Customer>(
            collection,
            documents,
            &[("email", FindingKind::DuplicateEmail)],
        ),
        CatalogCollection::Orders => inspect::<Order>(collection, documents, &[]),
    }
}

fn inspect<T: Checked>(
    collection: CatalogCollection,
    documents: &[Document],
    unique_fields: &[(&str, FindingKind)],
) -> Vec<Finding> {
    let id_field = collection.id_field();
    let mut findings = Vec::new();

    for document in documents {
        let id = document_label(document, id_field);
        match bson::from_document::<T>(document.clone()) {
            Ok(entity) => {
                if let Err(errors) = entity.validate() {
                    findings.push(Finding {
                        document: entity.identifier().to_string(),
                        kind: FindingKind::Invalid,
                        detail: errors.to_string(),
                    });
                }
                findings.extend(entity.extra_findings());
            }
            Err(e) => findings.push(Finding {
                document: id,
                kind: FindingKind::Malformed,
                detail: e.to_string(),
            }),
        }
    }

    findings.extend(duplicates(documents, id_field, FindingKind::DuplicateIdentifier));
    for &(field, kind) in unique_fields {
        findings.extend(duplicates(documents, field, kind));
    }
    findings
}

fn document_label(document: &Document, id_field: &str) -> String {
    match document.get_str(id_field) {
        Ok(id) => id.to_string(),
        Err(_) => document
            .get("_id")
            .map_or_else(|| "<unknown>".to_string(), |id| id.to_string()),
    }
}

fn duplicates(documents: &[Document], field: &str, kind: FindingKind) -> Vec<Finding> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for value in documents.iter().filter_map(|d| d.get_str(field).ok()) {
        *seen.entry(value).or_default() += 1;
    }

    let mut repeated: Vec<_> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    repeated.sort_unstable();
    repeated
        .into_iter()
        .map(|(value, n)| Finding {
            document: value.to_string(),
            kind,
            detail: format!("{field} '{value}' appears {n} times"),
        })
        .collect()
}
