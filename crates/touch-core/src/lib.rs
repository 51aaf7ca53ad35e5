pub mod components;
pub mod config;
pub mod constants;
pub mod damping;
pub mod error;
pub mod filter;
pub mod finger;
pub mod gesture;
pub mod hub;
pub mod projection;
pub mod selectable;
pub mod signal;

pub use config::*;
pub use constants::*;
pub use damping::*;
pub use error::*;
pub use filter::*;
pub use finger::*;
pub use hub::*;
pub use projection::*;
pub use selectable::*;
pub use signal::*;
