//! Provisioning against a real MongoDB server
//!
//! These tests start a MongoDB container through testcontainers and need a
//! Docker daemon: `cargo test -p domain_catalog -- --ignored`.

use chrono::Utc;
use domain_catalog::*;
use mongodb::bson::{doc, to_document, Bson};
use test_utils::{TestDataBuilder, TestMongo};

fn provisioner(mongo: &TestMongo, test_name: &str) -> Provisioner<MongoCatalogRepository> {
    let builder = TestDataBuilder::from_test_name(test_name);
    let db = mongo.database(&builder.database_name());
    Provisioner::new(MongoCatalogRepository::new(&db), db.name())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_fresh_database_gets_collections_indexes_and_seed() {
    let mongo = TestMongo::new().await;
    let provisioner = provisioner(&mongo, "fresh_database");

    let summary = provisioner.provision().await.unwrap();
    assert_eq!(summary.inserted(CatalogCollection::Products), 3);
    assert_eq!(summary.inserted(CatalogCollection::Customers), 3);
    assert_eq!(summary.inserted(CatalogCollection::Orders), 0);

    let repo = provisioner.repository();
    for collection in CatalogCollection::ALL {
        let present = repo.list_index_names(collection).await.unwrap();
        for expected in expected_index_names(collection) {
            assert!(
                present.iter().any(|name| name == expected),
                "{collection} missing {expected}"
            );
        }
    }
    assert_eq!(repo.count_documents(CatalogCollection::Products).await.unwrap(), 3);
    assert_eq!(repo.count_documents(CatalogCollection::Customers).await.unwrap(), 3);
    assert_eq!(repo.count_documents(CatalogCollection::Orders).await.unwrap(), 0);

    let report = provisioner.verify().await.unwrap();
    assert!(report.is_clean(), "{report:?}");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_second_run_fails() {
    let mongo = TestMongo::new().await;
    let provisioner = provisioner(&mongo, "second_run");

    provisioner.provision().await.unwrap();
    let err = provisioner.provision().await.unwrap_err();
    assert!(err.is_already_provisioned(), "{err}");

    // Nothing from the failed run was added
    let repo = provisioner.repository();
    assert_eq!(repo.count_documents(CatalogCollection::Products).await.unwrap(), 3);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_index_recreation_is_noop_but_redefinition_conflicts() {
    let mongo = TestMongo::new().await;
    let provisioner = provisioner(&mongo, "index_conflict");
    provisioner.provision().await.unwrap();

    let names = provisioner
        .create_indexes(CatalogCollection::Products)
        .await
        .unwrap();
    assert_eq!(names.len(), 6);

    let redefined = IndexSpec::new("idx_products_active_stock", doc! { "active": 1 });
    let err = provisioner
        .repository()
        .create_indexes(CatalogCollection::Products, vec![redefined])
        .await
        .unwrap_err();
    assert!(
        matches!(err, ProvisionError::IndexConflict { ref collection, .. } if collection == "products"),
        "{err}"
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_validator_rejects_negative_price() {
    let mongo = TestMongo::new().await;
    let provisioner = provisioner(&mongo, "negative_price");
    provisioner.provision().await.unwrap();

    let now = mongodb::bson::DateTime::now();
    let document = doc! {
        "productId": "product-99",
        "name": "Cable HDMI",
        "price": -1.0,
        "stock": 5,
        "active": true,
        "createdAt": now,
        "updatedAt": now,
    };
    let err = provisioner
        .repository()
        .insert_documents(CatalogCollection::Products, vec![document])
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisionError::DocumentValidation { .. }), "{err}");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_validator_rejects_malformed_identifier_and_email() {
    let mongo = TestMongo::new().await;
    let provisioner = provisioner(&mongo, "malformed_identifier");
    provisioner.provision().await.unwrap();

    let now = mongodb::bson::DateTime::now();
    let bad_id = doc! {
        "customerId": "cust-4",
        "name": "Lucía Ramos",
        "email": "lucia.ramos@example.com",
        "active": true,
        "createdAt": now,
        "updatedAt": now,
    };
    let mut bad_email = bad_id.clone();
    bad_email.insert("customerId", "customer-4");
    bad_email.insert("email", "lucia.ramos");

    let repo = provisioner.repository();
    for document in [bad_id, bad_email] {
        let err = repo
            .insert_documents(CatalogCollection::Customers, vec![document])
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::DocumentValidation { .. }), "{err}");
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unique_email_index_rejects_second_customer() {
    let mongo = TestMongo::new().await;
    let provisioner = provisioner(&mongo, "unique_email");
    provisioner.provision().await.unwrap();

    let builder = TestDataBuilder::from_test_name("unique_email");
    let mut customer = domain_catalog::seed::seed_customers(Utc::now()).remove(0);
    customer.customer_id = builder.entity_id("customer", 1);

    let err = provisioner
        .repository()
        .insert_documents(
            CatalogCollection::Customers,
            vec![to_document(&customer).unwrap()],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisionError::DuplicateKey { .. }), "{err}");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_verify_flags_order_subtotal_mismatch() {
    let mongo = TestMongo::new().await;
    let provisioner = provisioner(&mongo, "subtotal_mismatch");
    provisioner.provision().await.unwrap();

    let now = Utc::now();
    let product = domain_catalog::seed::seed_products(now).remove(1);
    let customer = domain_catalog::seed::seed_customers(now).remove(0);

    let mut item = OrderItem::from_product(&product, 3);
    item.subtotal = Some(29.99);
    let order = Order::pending("order-1", &customer, vec![item], now);

    // The validator only checks bounds, so the server accepts the order
    provisioner
        .repository()
        .insert_documents(CatalogCollection::Orders, vec![to_document(&order).unwrap()])
        .await
        .unwrap();

    let report = provisioner.verify().await.unwrap();
    let orders = report.collection(CatalogCollection::Orders).unwrap();
    assert_eq!(orders.document_count, 1);
    assert_eq!(orders.findings.len(), 1);
    assert_eq!(orders.findings[0].kind, FindingKind::SubtotalMismatch);
    assert_eq!(orders.findings[0].document, "order-1");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_reset_allows_fresh_provision() {
    let mongo = TestMongo::new().await;
    let provisioner = provisioner(&mongo, "reset");

    provisioner.provision().await.unwrap();
    provisioner.reset().await.unwrap();

    let report = provisioner.verify().await.unwrap();
    assert!(report.collections.iter().all(|c| !c.exists));

    let summary = provisioner.provision().await.unwrap();
    assert_eq!(summary.inserted(CatalogCollection::Products), 3);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_validator_is_attached_strict_with_error_action() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("collection_options");
    let db = mongo.database(&builder.database_name());
    Provisioner::new(MongoCatalogRepository::new(&db), db.name())
        .provision()
        .await
        .unwrap();

    let info = db
        .run_command(doc! { "listCollections": 1, "filter": { "name": "orders" } })
        .await
        .unwrap();
    let options = info
        .get_document("cursor")
        .and_then(|c| c.get_array("firstBatch"))
        .unwrap()
        .first()
        .and_then(Bson::as_document)
        .and_then(|c| c.get_document("options").ok())
        .unwrap()
        .clone();

    assert_eq!(options.get_str("validationLevel").unwrap(), "strict");
    assert_eq!(options.get_str("validationAction").unwrap(), "error");
    assert!(options.get_document("validator").unwrap().contains_key("$jsonSchema"));
}
