//! Named secondary indexes per collection
//!
//! Names are explicit and stable. Re-creating an index with the same name and
//! keys is a no-op on the server; the same name with different keys or
//! options fails.

use mongodb::bson::{doc, Document};

use crate::models::CatalogCollection;

/// Tokenizer language of the text indexes
pub const TEXT_SEARCH_LANGUAGE: &str = "spanish";

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub keys: Document,
    pub unique: bool,
    /// Per-field weights, text indexes only
    pub weights: Option<Document>,
    pub default_language: Option<&'static str>,
}

impl IndexSpec {
    pub fn new(name: &'static str, keys: Document) -> Self {
        Self {
            name,
            keys,
            unique: false,
            weights: None,
            default_language: None,
        }
    }

    pub fn unique(name: &'static str, keys: Document) -> Self {
        Self {
            unique: true,
            ..Self::new(name, keys)
        }
    }

    /// Weighted text index tokenized as Spanish
    pub fn text(name: &'static str, keys: Document, weights: Document) -> Self {
        Self {
            weights: Some(weights),
            default_language: Some(TEXT_SEARCH_LANGUAGE),
            ..Self::new(name, keys)
        }
    }

    pub fn is_text(&self) -> bool {
        self.keys
            .values()
            .any(|v| v.as_str() == Some("text"))
    }
}

/// Indexes of `collection`, in creation order
pub fn indexes_for(collection: CatalogCollection) -> Vec<IndexSpec> {
    match collection {
        CatalogCollection::Products => vec![
            IndexSpec::unique("idx_products_productId_unique", doc! { "productId": 1 }),
            // Inventory listing
            IndexSpec::new("idx_products_active_stock", doc! { "active": 1, "stock": -1 }),
            // Catalog browsing
            IndexSpec::new("idx_products_category_price", doc! { "category": 1, "price": 1 }),
            IndexSpec::text(
                "idx_products_text_search",
                doc! { "name": "text", "description": "text" },
                doc! { "name": 10, "description": 5 },
            ),
            IndexSpec::new("idx_products_created_desc", doc! { "createdAt": -1 }),
            IndexSpec::new("idx_products_updated_desc", doc! { "updatedAt": -1 }),
        ],
        CatalogCollection::Customers => vec![
            IndexSpec::unique("idx_customers_customerId_unique", doc! { "customerId": 1 }),
            IndexSpec::unique("idx_customers_email_unique", doc! { "email": 1 }),
            IndexSpec::new("idx_customers_active", doc! { "active": 1 }),
            IndexSpec::text(
                "idx_customers_text_search",
                doc! { "name": "text", "email": "text" },
                doc! { "name": 10, "email": 5 },
            ),
            IndexSpec::new("idx_customers_created_desc", doc! { "createdAt": -1 }),
            IndexSpec::new("idx_customers_updated_desc", doc! { "updatedAt": -1 }),
        ],
        CatalogCollection::Orders => vec![
            IndexSpec::unique("idx_orders_orderId_unique", doc! { "orderId": 1 }),
            // Order history per customer
            IndexSpec::new(
                "idx_orders_customer_created",
                doc! { "customerId": 1, "createdAt": -1 },
            ),
            // Processing queue views
            IndexSpec::new("idx_orders_status_created", doc! { "status": 1, "createdAt": -1 }),
            IndexSpec::new("idx_orders_items_productId", doc! { "items.productId": 1 }),
            // Reporting
            IndexSpec::new("idx_orders_status_amount", doc! { "status": 1, "totalAmount": -1 }),
            IndexSpec::new("idx_orders_created_desc", doc! { "createdAt": -1 }),
            IndexSpec::new("idx_orders_updated_desc", doc! { "updatedAt": -1 }),
            IndexSpec::new("idx_orders_totalAmount_desc", doc! { "totalAmount": -1 }),
            IndexSpec::new("idx_orders_customerEmail", doc! { "customerEmail": 1 }),
        ],
    }
}

/// Names of the indexes `collection` is expected to carry
pub fn expected_index_names(collection: CatalogCollection) -> Vec<&'static str> {
    indexes_for(collection).iter().map(|i| i.name).collect()
}
