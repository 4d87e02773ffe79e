pub mod default;
mod object_store;

pub use default::*;
pub use object_store::*;
