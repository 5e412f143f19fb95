pub mod configuration;
pub mod doc;
pub mod domain;
pub mod errors;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod startup;
pub mod telemetry;
