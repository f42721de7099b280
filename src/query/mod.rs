pub mod filter;
pub mod update;

pub use filter::FilterBuilder;
pub use update::partial_update;

use thiserror::Error;

/// Field names starting with this marker carry protocol metadata (e.g. the
/// `_token` credential) and are never persisted.
pub const RESERVED_PREFIX: char = '_';

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("{column}: minimum bound must be less than maximum bound")]
    InvalidRange { column: String },

    #[error("No fields to update")]
    EmptyUpdate,
}
