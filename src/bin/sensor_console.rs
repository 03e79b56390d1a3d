// src/bin/sensor_console.rs

use clap::Parser;
use log::{error, info, warn};

use metasensor::manager::RouteOutcome;
use metasensor::transport::StdioTransport;
use metasensor::SensorManager;

/// Console host: reads protocol lines from stdin and routes them to the sensor fleet.
///
/// An empty line or end of input ends the session and prints every sensor.
#[derive(Parser, Debug)]
#[command(name = "sensor-console", version, long_about = None)]
struct Args {
    /// Build the fleet from a descriptor such as "?0:ADC&1:TH" (default: ADC 0, ADC 1, TH 2)
    #[arg(short, long, conflicts_with = "handshake")]
    descriptor: Option<String>,

    /// Ask for the descriptor on stdout and read it from stdin
    #[arg(long, default_value_t = false)]
    handshake: bool,

    /// Configuration messages applied before the session, e.g. "?type=ADC&id=0&resolution=10"
    #[arg(short, long)]
    config: Vec<String>,

    /// Synchronize every sensor before reading messages
    #[arg(long, default_value_t = false)]
    sync: bool,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let mut manager = SensorManager::new(StdioTransport::stdio());
    manager.init()?;

    let built = if args.handshake {
        manager.handshake()
    } else if let Some(descriptor) = &args.descriptor {
        manager.build(descriptor)
    } else {
        manager.build_default()
    };
    if let Err(err) = built {
        error!("Cannot build sensor fleet:\n{}", err.render_chain());
        return Err(err.into());
    }
    info!("{} sensors registered", manager.len());

    for message in &args.config {
        if manager.route_config(message) != RouteOutcome::Delivered {
            warn!("Configuration {:?} was not applied", message);
        }
    }

    if args.sync {
        let synced = manager.synchronize_all();
        info!("{}/{} sensors synchronized", synced, manager.len());
    }

    loop {
        match manager.poll() {
            Ok(Some(outcome)) => {
                log::debug!("Message {:?}", outcome);
                manager.redraw_all();
            }
            Ok(None) => break,
            Err(err) => {
                err.log();
                break;
            }
        }
    }

    manager.print_all();
    manager.reset_all();
    Ok(())
}
