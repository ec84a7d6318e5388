use apiharness::{
    logging::{self, ConsoleSink},
    mock::{MockServer, HEALTH, MESSAGE_LIST, MESSAGE_SEND, USER_ADD, USER_INFO},
    Config, Error,
};
use tracing::info;

fn main() -> Result<(), Error> {
    let config = Config::discover()?;
    logging::init(&config, ConsoleSink::Stdout)?;

    let server = MockServer::start(config.mock_address()?)?;
    let base_url = server.base_url();

    info!("{}", "=".repeat(60));
    info!("Mock API server is running");
    info!("Service URL: {}", base_url);
    info!("Health check: {}{}", base_url, HEALTH);
    for (method, path) in &[
        ("GET", USER_INFO),
        ("POST", USER_ADD),
        ("GET", MESSAGE_LIST),
        ("POST", MESSAGE_SEND),
    ] {
        info!("  {:<4} {}{}", method, base_url, path);
    }
    info!("{}", "=".repeat(60));

    server.wait();
    Ok(())
}
