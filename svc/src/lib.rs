pub mod configuration;
pub mod server;
pub mod telemetry;

pub use server::Server;
