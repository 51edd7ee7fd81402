pub mod config;
pub mod events;
pub mod height;
pub mod host;
pub mod panel;
pub mod selection;
pub mod state;
pub mod viewer;

pub use config::*;
pub use events::*;
pub use height::*;
pub use host::*;
pub use panel::*;
pub use selection::*;
pub use state::*;
pub use viewer::*;
