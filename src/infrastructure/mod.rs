// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod prediction_client;
pub mod response_decoder;
