//! HTTP request handlers.

pub mod devices;
pub mod events;
pub mod root;
pub mod users;

pub use devices::*;
pub use events::*;
pub use root::*;
pub use users::*;
