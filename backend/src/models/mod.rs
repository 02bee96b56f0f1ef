pub mod horse;
pub mod macros;
pub mod owner;

pub use horse::*;
pub use owner::*;
