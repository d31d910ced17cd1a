//! Demonstration records loaded into a freshly provisioned store.
//! Orders are never seeded.

use chrono::{DateTime, Utc};

use crate::models::{Customer, Product};

struct ProductSeed {
    product_id: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    price: f64,
    stock: i32,
}

const PRODUCTS: [ProductSeed; 3] = [
    ProductSeed {
        product_id: "product-1",
        name: "Laptop HP Pavilion 15",
        description: "Laptop empresarial de alta gama con procesador Intel i7, 16GB RAM, 512GB SSD",
        category: "Electronics",
        price: 999.99,
        stock: 10,
    },
    ProductSeed {
        product_id: "product-2",
        name: "Mouse Logitech MX Master 3",
        description: "Mouse inalámbrico ergonómico de precisión para profesionales",
        category: "Accessories",
        price: 29.99,
        stock: 50,
    },
    ProductSeed {
        product_id: "product-3",
        name: "Teclado Mecánico Corsair K95 RGB",
        description: "Teclado mecánico gaming con iluminación RGB y switches Cherry MX",
        category: "Accessories",
        price: 79.99,
        stock: 25,
    },
];

struct CustomerSeed {
    customer_id: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    active: bool,
}

const CUSTOMERS: [CustomerSeed; 3] = [
    CustomerSeed {
        customer_id: "customer-1",
        name: "Juan Pérez García",
        email: "juan.perez@example.com",
        phone: "+51 987654321",
        active: true,
    },
    CustomerSeed {
        customer_id: "customer-2",
        name: "María García López",
        email: "maria.garcia@example.com",
        phone: "+51 987654322",
        active: true,
    },
    CustomerSeed {
        customer_id: "customer-3",
        name: "Pedro López Martínez",
        email: "pedro.lopez@example.com",
        phone: "+51 987654323",
        active: false,
    },
];

/// Seed products, all stamped with `now`
pub fn seed_products(now: DateTime<Utc>) -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(|p| Product {
            product_id: p.product_id.to_string(),
            name: p.name.to_string(),
            description: Some(p.description.to_string()),
            category: Some(p.category.to_string()),
            price: p.price,
            stock: p.stock,
            active: true,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Seed customers, all stamped with `now`
pub fn seed_customers(now: DateTime<Utc>) -> Vec<Customer> {
    CUSTOMERS
        .iter()
        .map(|c| Customer {
            customer_id: c.customer_id.to_string(),
            name: c.name.to_string(),
            email: c.email.to_string(),
            phone: Some(c.phone.to_string()),
            active: c.active,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Records a provisioning run loads, one batch per seeded collection
#[derive(Debug, Clone, PartialEq)]
pub struct SeedData {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
}

impl SeedData {
    /// The standard seed set stamped with `now`
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            products: seed_products(now),
            customers: seed_customers(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use validator::Validate;

    #[test]
    fn test_seed_products_are_valid_and_unique() {
        let products = seed_products(Utc::now());
        assert_eq!(products.len(), 3);
        for product in &products {
            product.validate().unwrap();
        }
        let ids: HashSet<_> = products.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_seed_customers_are_valid_with_unique_emails() {
        let customers = seed_customers(Utc::now());
        assert_eq!(customers.len(), 3);
        for customer in &customers {
            customer.validate().unwrap();
        }
        let emails: HashSet<_> = customers.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails.len(), 3);
        assert!(!customers[2].active);
    }

    #[test]
    fn test_seed_shares_one_timestamp() {
        let now = Utc::now();
        let products = seed_products(now);
        let customers = seed_customers(now);
        assert!(products.iter().all(|p| p.created_at == now && p.updated_at == now));
        assert!(customers.iter().all(|c| c.created_at == now && c.updated_at == now));
    }

    #[test]
    fn test_seed_product_literals() {
        let products = seed_products(Utc::now());
        assert_eq!(products[0].name, "Laptop HP Pavilion 15");
        assert_eq!(products[0].price, 999.99);
        assert_eq!(products[1].category.as_deref(), Some("Accessories"));
        assert_eq!(products[2].stock, 25);
    }
}
