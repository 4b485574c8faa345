use std::error::Error;
use std::thread::sleep;

use lite_radar::{LiteRadar, StatusChange, Transport};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub use settings::MonitorSettings;

pub mod settings;

pub async fn presence_monitor(settings: MonitorSettings) -> Result<(), Box<dyn Error>> {
    let cancel = CancellationToken::new();
    let cloned_cancel = cancel.clone();

    // Spawn shutdown signal handler
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received.");
        }
        cancel.cancel();
    });

    // Opening the port and waiting for acknowledgements both block, keep them off the
    // runtime threads.
    let changes = tokio::task::spawn_blocking(move || run(&settings, &cloned_cancel)).await??;

    info!("Monitor stopped after {changes} status changes.");
    Ok(())
}

/// Open the radar, apply the settings and watch it until cancelled.
pub fn run(settings: &MonitorSettings, cancel: &CancellationToken) -> Result<usize, lite_radar::Error> {
    let mut radar = LiteRadar::open(&settings.port, settings.baud)?;
    info!("Radar opened on {}.", settings.port);
    configure(&mut radar, settings)?;
    watch(&mut radar, settings, cancel)
}

/// Apply the optional scenario / sensitivity from the settings.
#[tracing::instrument(skip(radar))]
pub fn configure<T: Transport>(
    radar: &mut LiteRadar<T>,
    settings: &MonitorSettings,
) -> Result<(), lite_radar::Error> {
    if let Some(scenario) = settings.scenario {
        radar.set_scenario(scenario)?;
        info!("Scenario set to {scenario}.");
    }
    if let Some(sensitivity) = settings.sensitivity {
        radar.set_sensitivity(sensitivity)?;
        info!("Sensitivity set to {sensitivity}.");
    }
    Ok(())
}

/// Poll status until cancelled, logging every change. Returns the number of changes seen.
#[tracing::instrument(skip(radar, cancel))]
pub fn watch<T: Transport>(
    radar: &mut LiteRadar<T>,
    settings: &MonitorSettings,
    cancel: &CancellationToken,
) -> Result<usize, lite_radar::Error> {
    let mut changes = 0;
    while !cancel.is_cancelled() {
        match radar.poll_status() {
            Ok(StatusChange::Changed) => {
                changes += 1;
                info!(present = radar.is_present(), moving = radar.is_moving(), "Status changed.");
            }
            Ok(StatusChange::Unchanged) => sleep(settings.poll_interval),
            Err(lite_radar::Error::MalformedStream { len }) => {
                warn!("Discarded {len} bytes of malformed input.");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(changes)
}
