use crate::configuration::settings::Settings;

/// Builds the settings from fixed fallbacks overridden by environment
/// variables. Every database parameter and the listening port can be
/// supplied through the environment; anything absent keeps its default.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .set_default("database.host", "localhost")?
        .set_default("database.port", "5432")?
        .set_default("database.database_name", "crud_db")?
        .set_default("database.username", "postgres")?
        .set_default("database.password", "password")?
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", "3000")?
        .set_default("application.environment", "development")?
        .set_override_option("database.host", std::env::var("DB_HOST").ok())?
        .set_override_option("database.port", std::env::var("DB_PORT").ok())?
        .set_override_option("database.database_name", std::env::var("DB_NAME").ok())?
        .set_override_option("database.username", std::env::var("DB_USER").ok())?
        .set_override_option("database.password", std::env::var("DB_PASSWORD").ok())?
        .set_override_option("application.port", std::env::var("PORT").ok())?
        .set_override_option("application.environment", std::env::var("NODE_ENV").ok())?
        .build()?;

    settings.try_deserialize::<Settings>()
}
