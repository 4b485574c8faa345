use std::thread::sleep;
use std::time::Duration;

use lite_radar::constants::{BEDROOM, DEFAULT_BAUD_RATE};
use lite_radar::{LiteRadar, StatusChange};

/// Simple demonstration that prints presence/movement whenever they change.
///
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Opening serial device");
    let mut radar = LiteRadar::open("/dev/serial0", DEFAULT_BAUD_RATE)?;
    println!("Setting scenario");
    radar.set_scenario(BEDROOM)?;
    radar.set_sensitivity(2)?;
    println!("Start sensor loop");
    loop {
        if radar.poll_status()? == StatusChange::Changed {
            println!("presence={}, movement={}", radar.is_present(), radar.is_moving());
        }
        sleep(Duration::from_millis(10));
    }
}
