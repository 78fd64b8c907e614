#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use agenda_tool::{AgendaSettings, ScheduleConfig, http_api, settings};

    settings::init_tracing("info");

    let settings = AgendaSettings::from_env()?;
    let addr: SocketAddr = settings.http_addr.parse()?;

    let today = chrono::Local::now().date_naive();
    let draft = ScheduleConfig::new("Untitled agenda", today, today);
    http_api::serve(addr, http_api::AppState::new(draft, settings)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
