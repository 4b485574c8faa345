use presence_monitor::{presence_monitor, MonitorSettings};

#[tokio::main]
async fn main() {
    // construct a subscriber that prints formatted traces to stdout
    let subscriber = tracing_subscriber::FmtSubscriber::new();
    // use that subscriber to process traces emitted after this point
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing subscriber.");

    let settings = MonitorSettings::from_env().expect("Invalid radar settings");

    presence_monitor(settings)
        .await
        .expect("Presence monitor failed");
}
