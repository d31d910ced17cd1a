use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};
use validator::Validate;

/// Shape of `productId`: `product-<N>`
pub const PRODUCT_ID_PATTERN: &str = "^product-[0-9]+$";
/// Shape of `customerId`: `customer-<N>`
pub const CUSTOMER_ID_PATTERN: &str = "^customer-[0-9]+$";
/// Shape of `orderId`: `order-<N>`
pub const ORDER_ID_PATTERN: &str = "^order-[0-9]+$";
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Largest accepted gap between a stored subtotal and `price * quantity`
pub const SUBTOTAL_TOLERANCE: f64 = 0.005;

static PRODUCT_ID_RE: LazyLock<Regex> = LazyLock::new(|| server_regex(PRODUCT_ID_PATTERN));
static CUSTOMER_ID_RE: LazyLock<Regex> = LazyLock::new(|| server_regex(CUSTOMER_ID_PATTERN));
static ORDER_ID_RE: LazyLock<Regex> = LazyLock::new(|| server_regex(ORDER_ID_PATTERN));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| server_regex(EMAIL_PATTERN));

/// Compile a validator pattern so it accepts exactly what the server accepts
///
/// The server's PCRE `$` also matches before a single trailing newline while
/// `regex` anchors at the very end, so a trailing `$` becomes `\n?\z`.
fn server_regex(pattern: &str) -> Regex {
    let anchored = match pattern.strip_suffix('$') {
        Some(body) => format!(r"{body}\n?\z"),
        None => pattern.to_string(),
    };
    Regex::new(&anchored).expect("validator pattern compiles")
}

/// The three collections of the store, in provisioning order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CatalogCollection {
    Products,
    Customers,
    Orders,
}

impl CatalogCollection {
    pub const ALL: [CatalogCollection; 3] = [
        CatalogCollection::Products,
        CatalogCollection::Customers,
        CatalogCollection::Orders,
    ];

    /// Collection name on the server
    pub fn name(&self) -> &'static str {
        match self {
            CatalogCollection::Products => "products",
            CatalogCollection::Customers => "customers",
            CatalogCollection::Orders => "orders",
        }
    }

    /// Field carrying the natural identifier
    pub fn id_field(&self) -> &'static str {
        match self {
            CatalogCollection::Products => "productId",
            CatalogCollection::Customers => "customerId",
            CatalogCollection::Orders => "orderId",
        }
    }
}

/// Order lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
    Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

/// Product document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[validate(regex(path = *PRODUCT_ID_RE, message = "must match product-<N>"))]
    pub product_id: String,
    #[validate(length(min = 3, max = 200))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub stock: i32,
    pub active: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Customer document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[validate(regex(path = *CUSTOMER_ID_RE, message = "must match customer-<N>"))]
    pub customer_id: String,
    #[validate(length(min = 2, max = 200))]
    pub name: String,
    #[validate(regex(path = *EMAIL_RE, message = "must be a valid email address"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub active: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Line item of an order; product fields are a snapshot taken at order time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub subtotal: Option<f64>,
}

impl OrderItem {
    /// Snapshot `product` into a line item with its subtotal filled in
    pub fn from_product(product: &Product, quantity: i32) -> Self {
        let mut item = Self {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity,
            subtotal: None,
        };
        item.subtotal = Some(item.expected_subtotal());
        item
    }

    pub fn expected_subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// False when a stored subtotal disagrees with `price * quantity`
    pub fn is_consistent(&self) -> bool {
        self.subtotal
            .map_or(true, |s| (s - self.expected_subtotal()).abs() <= SUBTOTAL_TOLERANCE)
    }
}

/// Order document; customer fields are a snapshot, not a live reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[validate(regex(path = *ORDER_ID_RE, message = "must match order-<N>"))]
    pub order_id: String,
    pub customer_id: String,
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItem>,
    #[validate(range(min = 0.0))]
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a pending order for `customer`, totalling the item subtotals
    pub fn pending(
        order_id: impl Into<String>,
        customer: &Customer,
        items: Vec<OrderItem>,
        now: DateTime<Utc>,
    ) -> Self {
        let total_amount = items.iter().map(OrderItem::expected_subtotal).sum();
        Self {
            order_id: order_id.into(),
            customer_id: customer.customer_id.clone(),
            customer_name: customer.name.clone(),
            customer_email: Some(customer.email.clone()),
            items,
            total_amount,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Positions of line items whose subtotal is not `price * quantity`
    pub fn inconsistent_line_items(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_consistent())
            .map(|(index, _)| index)
            .collect()
    }
}
