//! Query planning.
//!
//! The planner decides which parts of a request the store can execute
//! (native) and which must be applied to materialized records (manual),
//! and builds the store predicates and orderings for the native part.

mod eval;
mod order;
mod predicate;
mod resolver;
mod search;


pub use order::{OrderDirection, OrderTerm, SortKey, split_real_fields};
pub use predicate::{CompareOp, ComparePredicate, DatePart, Predicate};
pub use resolver::FieldResolver;
pub use search::{
    SearchTarget, TermSearch, filter_real_fields, parse_date, split_terms, term_predicates,
};

pub(crate) use eval::eval;
pub(crate) use search::SearchPlanner;

use thiserror::Error as ThisError;

///
/// PlanError
///
/// Extensibility gaps found while planning. These are configuration bugs
/// and must surface; they are never caused by client input.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PlanError {
    #[error("no search strategy is registered for field kind '{kind}'")]
    UnsupportedFieldType { kind: String },
}
