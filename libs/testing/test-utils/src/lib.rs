//! Shared test utilities for the provisioner crates
//!
//! - `TestMongo`: MongoDB container with automatic cleanup
//! - `TestDataBuilder`: deterministic database names and identifiers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! # async fn example() {
//! let mongo = TestMongo::new().await;
//! let builder = TestDataBuilder::from_test_name("provision_fresh_database");
//! let db = mongo.database(&builder.database_name());
//! # }
//! ```

mod mongo;

pub use mongo::TestMongo;

/// Builder for test data with deterministic values
///
/// Tests sharing one container stay isolated by working in a database named
/// after the test.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (seed is the hash of the name)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_verify_reports_missing_index");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Database name unique to this builder, within MongoDB's length limit
    pub fn database_name(&self) -> String {
        format!("test_{:016x}", self.seed)
    }

    /// Identifier in the `<entity>-<N>` shape, offset so it never collides
    /// with the seed records
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.entity_id("order", 1), "order-7001");
    /// ```
    pub fn entity_id(&self, entity: &str, n: u64) -> String {
        format!("{}-{}", entity, (self.seed % 1_000_000) * 1000 + n)
    }
}
