pub mod config;
pub mod editor;
pub mod logger;
pub mod people;
pub mod session;
pub mod vault;

pub use config::{PeopleSettings, Settings};
pub use session::AtPeople;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
