//! # Repositories
//!
//! One repository per collection, each a thin struct over the shared
//! `SqlitePool`.
//!
//! ## Conventions
//! - Reads return `Option<T>` / `Vec<T>`; writes return `()` or the entity
//! - Guarded updates (`WHERE status = …`) report zero affected rows as
//!   `NotFound` or `Conflict`, never silently succeed
//! - Nested documents are JSON text columns decoded at this boundary;
//!   undecodable data surfaces as `DbError::Corrupt`

pub mod cart;
pub mod cook;
pub mod dish;
pub mod order;
pub mod support;
pub mod user;

use crate::error::{DbError, DbResult};

/// Decodes a JSON document column, attributing failures to the entity row.
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    entity: &str,
    id: &str,
    raw: &str,
) -> DbResult<T> {
    serde_json::from_str(raw).map_err(|e| DbError::corrupt(entity, id, e))
}

/// Encodes a JSON document column.
pub(crate) fn encode_json<T: serde::Serialize>(
    entity: &str,
    id: &str,
    value: &T,
) -> DbResult<String> {
    serde_json::to_string(value).map_err(|e| DbError::corrupt(entity, id, e))
}
