pub mod common;
pub mod health;
pub mod history;
pub mod locations;
pub mod status;

pub use health::health;
pub use history::get_history;
pub use locations::{get_locations, get_route};
pub use status::get_status;
