/// Database configuration and connection management
pub mod database;

/// Payee account configuration from config.toml and environment variables
pub mod accounts;
