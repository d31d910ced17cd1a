//! `$jsonSchema` validators attached to each collection at creation time
//!
//! The validators are a floor, not a contract: `additionalProperties` stays
//! open so unlisted fields are accepted. They check shape only; identifier
//! uniqueness comes from the unique indexes in [`crate::indexes`].

use mongodb::bson::{doc, Document};
use serde::Serialize;
use strum::{Display, VariantNames};

use crate::models::{
    CatalogCollection, OrderStatus, CUSTOMER_ID_PATTERN, EMAIL_PATTERN, ORDER_ID_PATTERN,
    PRODUCT_ID_PATTERN,
};

/// Which writes the validator applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    /// Every insert and update
    Strict,
    /// Only documents that already pass
    Moderate,
    Off,
}

/// What the server does with a non-conforming write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ValidationAction {
    /// Reject the write
    Error,
    /// Accept and log
    Warn,
}

/// Everything needed to create one collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSpec {
    pub collection: CatalogCollection,
    pub validator: Document,
    pub validation_level: ValidationLevel,
    pub validation_action: ValidationAction,
}

impl CollectionSpec {
    /// Strict validation that rejects offending writes
    pub fn strict(collection: CatalogCollection, validator: Document) -> Self {
        Self {
            collection,
            validator,
            validation_level: ValidationLevel::Strict,
            validation_action: ValidationAction::Error,
        }
    }

    pub fn name(&self) -> &'static str {
        self.collection.name()
    }
}

/// Spec of `collection`
pub fn collection_spec(collection: CatalogCollection) -> CollectionSpec {
    let validator = match collection {
        CatalogCollection::Products => products_validator(),
        CatalogCollection::Customers => customers_validator(),
        CatalogCollection::Orders => orders_validator(),
    };
    CollectionSpec::strict(collection, validator)
}

/// Specs of all collections, in provisioning order
pub fn collection_specs() -> Vec<CollectionSpec> {
    CatalogCollection::ALL
        .into_iter()
        .map(collection_spec)
        .collect()
}

fn timestamp(description: &str) -> Document {
    doc! { "bsonType": "date", "description": description }
}

pub fn products_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "title": "Product Schema",
            "required": ["productId", "name", "price", "stock", "active", "createdAt", "updatedAt"],
            "additionalProperties": true,
            "properties": {
                "productId": {
                    "bsonType": "string",
                    "pattern": PRODUCT_ID_PATTERN,
                    "description": "Unique product identifier (format: product-N)",
                },
                "name": {
                    "bsonType": "string",
                    "minLength": 3,
                    "maxLength": 200,
                    "description": "Product name (3-200 chars)",
                },
                "description": {
                    "bsonType": "string",
                    "maxLength": 2000,
                    "description": "Detailed product description",
                },
                "category": {
                    "bsonType": "string",
                    "minLength": 2,
                    "maxLength": 100,
                    "description": "Product category",
                },
                "price": {
                    "bsonType": "double",
                    "minimum": 0,
                    "exclusiveMinimum": false,
                    "description": "Product price (must be >= 0)",
                },
                "stock": {
                    "bsonType": "int",
                    "minimum": 0,
                    "description": "Available stock quantity (must be >= 0)",
                },
                "active": {
                    "bsonType": "bool",
                    "description": "Product availability status",
                },
                "createdAt": timestamp("Record creation timestamp"),
                "updatedAt": timestamp("Last update timestamp"),
            }
        }
    }
}

pub fn customers_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "title": "Customer Schema",
            "required": ["customerId", "name", "email", "active", "createdAt", "updatedAt"],
            "additionalProperties": true,
            "properties": {
                "customerId": {
                    "bsonType": "string",
                    "pattern": CUSTOMER_ID_PATTERN,
                    "description": "Unique customer identifier (format: customer-N)",
                },
                "name": {
                    "bsonType": "string",
                    "minLength": 2,
                    "maxLength": 200,
                    "description": "Customer full name (2-200 chars)",
                },
                "email": {
                    "bsonType": "string",
                    "pattern": EMAIL_PATTERN,
                    "description": "Valid email address",
                },
                "phone": {
                    "bsonType": "string",
                    "description": "Contact phone number",
                },
                "active": {
                    "bsonType": "bool",
                    "description": "Customer active status",
                },
                "createdAt": timestamp("Record creation timestamp"),
                "updatedAt": timestamp("Last update timestamp"),
            }
        }
    }
}

fn order_item_schema() -> Document {
    doc! {
        "bsonType": "object",
        "required": ["productId", "name", "price", "quantity"],
        "properties": {
            "productId": { "bsonType": "string", "description": "Product identifier" },
            "name": { "bsonType": "string", "description": "Product name snapshot" },
            "description": { "bsonType": "string", "description": "Product description snapshot" },
            "price": {
                "bsonType": "double",
                "minimum": 0,
                "description": "Unit price at time of order",
            },
            "quantity": {
                "bsonType": "int",
                "minimum": 1,
                "description": "Quantity ordered",
            },
            "subtotal": {
                "bsonType": "double",
                "minimum": 0,
                "description": "Line total (price * quantity)",
            },
        }
    }
}

pub fn orders_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "title": "Order Schema",
            "required": [
                "orderId", "customerId", "customerName", "items",
                "totalAmount", "status", "createdAt", "updatedAt"
            ],
            "additionalProperties": true,
            "properties": {
                "orderId": {
                    "bsonType": "string",
                    "pattern": ORDER_ID_PATTERN,
                    "description": "Unique order identifier (format: order-N)",
                },
                "customerId": { "bsonType": "string", "description": "Reference to customer ID" },
                "customerName": { "bsonType": "string", "description": "Customer name snapshot" },
                "customerEmail": { "bsonType": "string", "description": "Customer email snapshot" },
                "items": {
                    "bsonType": "array",
                    "minItems": 1,
                    "description": "Order line items",
                    "items": order_item_schema(),
                },
                "totalAmount": {
                    "bsonType": "double",
                    "minimum": 0,
                    "description": "Total order amount",
                },
                "status": {
                    "enum": OrderStatus::VARIANTS.to_vec(),
                    "description": "Order status",
                },
                "createdAt": timestamp("Order creation timestamp"),
                "updatedAt": timestamp("Last update timestamp"),
            }
        }
    }
}
