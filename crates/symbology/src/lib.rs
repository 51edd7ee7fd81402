pub mod eval;
pub mod expr;

pub use eval::*;
pub use expr::*;
