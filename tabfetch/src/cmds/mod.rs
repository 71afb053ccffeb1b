pub use check::*;
pub use fetch::*;

mod check;
mod fetch;
