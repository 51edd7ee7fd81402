pub mod feature;
pub mod layer;
pub mod mock;
pub mod surface;

pub use feature::*;
pub use layer::*;
pub use mock::*;
pub use surface::*;
