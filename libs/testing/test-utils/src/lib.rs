//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! Container-backed tests need Docker, so domain crates mark them `#[ignore]`
//! and CI runs them with `cargo test -- --ignored`.
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!     let db = mongo.database(&builder.database_name());
//!
//!     let user_id = builder.user_id();
//!     let category_name = builder.name("category", "root");
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
///
/// Tests stay reproducible because every value derives from one seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_category");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn user_id(&self) -> Uuid {
        self.uuid(0)
    }

    /// A second deterministic id, distinct from [`Self::user_id`].
    pub fn other_user_id(&self) -> Uuid {
        self.uuid(1)
    }

    fn uuid(&self, salt: u64) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let salted = (self.seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15)).to_be_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&salted);
        Uuid::from_bytes(uuid_bytes)
    }

    /// `test-{prefix}-{seed}-{suffix}`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("category", "root"), "test-category-7-root");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Database name unique to this seed. MongoDB caps names at 64 bytes.
    pub fn database_name(&self) -> String {
        format!("test_{:x}", self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.user_id(), builder2.user_id());
        assert_eq!(
            builder1.name("category", "root"),
            builder2.name("category", "root")
        );
    }

    #[test]
    fn test_data_builder_from_name() {
        let builder1 = TestDataBuilder::from_test_name("my_test");
        let builder2 = TestDataBuilder::from_test_name("my_test");

        assert_eq!(builder1.database_name(), builder2.database_name());
    }

    #[test]
    fn test_data_builder_distinct_ids() {
        let builder = TestDataBuilder::from_test_name("ids");
        assert_ne!(builder.user_id(), builder.other_user_id());

        let other = TestDataBuilder::from_test_name("other");
        assert_ne!(builder.user_id(), other.user_id());
    }
}
