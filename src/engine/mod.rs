// ============================================================================
// Engine Module
// Contains the book and the handles that serialize access to it
// ============================================================================

mod book;
mod book_side;
mod shared;

#[cfg(feature = "async")]
mod actor;

pub mod factory;

#[cfg(feature = "async")]
pub use actor::BookActor;
pub use book::Book;
pub use book_side::BookSide;
pub use factory::{create_from_config, BookBuilder};
pub use shared::SharedBook;
