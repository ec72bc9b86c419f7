//! ## Crate layout
//! - `base`: ready-made column processors.
//! - `core`: column model, request normalization, search planning, stores,
//!   caching and response serialization.
//!
//! The `prelude` module covers declaring a table, serving requests and the
//! helper processors.

pub use datagrid_core as core;

pub mod base;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{Error, ErrorClass};

///
/// Prelude
///

pub mod prelude {
    pub use crate::base::helper::{
        ItemKey, attr_getter, boolean_checkmark, boolean_checkmark_with, format_date,
        format_value, item_getter, link_to_model, link_to_related, through_filter,
    };
    pub use crate::core::prelude::*;
}
