mod deliver;
mod health;

pub use deliver::{DeliverParams, deliver_handler};
pub use health::health_handler;
