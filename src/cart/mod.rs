//! Cart module
//!
//! AJAX add-to-cart and the item count readouts it keeps in sync.

mod adder;
mod counter;
mod models;

pub use adder::{CartAdder, Submission};
pub use counter::CartCounterSync;
pub use models::*;
