//! Catalog synchronization: query state, request derivation and mutations.

mod engine;
mod mutation;
mod request;

pub use self::engine::{CatalogQueryEngine, FetchError, FetchOutcome, FetchTicket};
pub use self::mutation::{MutationCoordinator, MutationError, MutationKind};
pub use self::request::{CatalogRequest, derive_request};
