pub mod client;
pub mod types;

pub use client::RoutingClient;
pub use types::DirectionResponse;
