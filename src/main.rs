use user_address_api::{
    configuration::loader::get_configuration, startup::Application, telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber =
        telemetry::get_subscriber("user_address_api".into(), "info".into(), std::io::stdout);
    telemetry::initialize_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");

    let application = Application::build(configuration).await?;

    application.run_until_stopped().await?;

    Ok(())
}
