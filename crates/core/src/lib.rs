pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod options;
pub mod sanitize;
pub mod traits;

pub use config::*;
pub use error::*;
pub use filter::*;
pub use models::*;
pub use options::*;
pub use sanitize::*;
pub use traits::*;
