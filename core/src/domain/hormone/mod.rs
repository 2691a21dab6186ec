pub mod entities;
pub mod parser;
pub mod reference;

pub use entities::*;
