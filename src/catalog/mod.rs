// Read contract over the exercise catalog

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCatalog;
pub use postgres::PgCatalog;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CatalogEntry, Contraindication};

/// Upper bound on substitutes offered for one excluded exercise
pub const MAX_ALTERNATIVES: usize = 3;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Catalog returned malformed data: {0}")]
    Malformed(String),
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read-only queries the composer issues against the catalog.
///
/// Implementations must be side-effect free; the composer may issue calls
/// concurrently.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Active mappings of the given body parts joined with their active
    /// templates and equipment requirements
    async fn fetch_mappings(&self, body_part_ids: &[Uuid]) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Active contraindications for the pair whose `pain_level_min` is unset
    /// or at most `pain_level`.
    ///
    /// Rows are returned whatever their `condition`; a hard rule for another
    /// condition is downgraded to a caution by the contraindication filter,
    /// which needs to see it.
    async fn fetch_contraindications(
        &self,
        template_id: Uuid,
        body_part_id: Uuid,
        pain_level: u8,
    ) -> Result<Vec<Contraindication>, CatalogError>;

    /// Up to [`MAX_ALTERNATIVES`] other templates mapped to the body part with
    /// a difficulty score of at most `max_difficulty`
    async fn fetch_alternatives(
        &self,
        excluded_template_id: Uuid,
        body_part_id: Uuid,
        max_difficulty: u8,
    ) -> Result<Vec<Uuid>, CatalogError>;
}
