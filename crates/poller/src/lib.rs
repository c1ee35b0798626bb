pub mod client;
pub mod error;
pub mod poller;
pub mod response;
