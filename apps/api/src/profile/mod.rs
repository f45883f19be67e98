//! Profile sync pipeline: convert an accumulated tag mapping into typed,
//! namespaced metafield records and upsert them to the profile store.

pub mod handlers;
pub mod metafields;
