#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use class_schedule::{AppConfig, ScheduleSession, http_api, logging};

    let config = AppConfig::from_env()?;
    logging::init(config.verbosity);
    let addr: SocketAddr = config.http_addr.parse()?;

    println!("class-schedule HTTP API listening on http://{addr}");
    let session = ScheduleSession::new(config.course_code.clone());
    http_api::serve(addr, session, config).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
