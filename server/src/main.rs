use log::{error, info, warn};
use prometheus::{Encoder, TextEncoder};
use server::{HostEvent, TransporterThread};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use transporter::api::Event;
use transporter::config::Config;

fn main() {
    env_logger::init();
    let config = Config::load();
    let mut server = match TransporterThread::spawn(config) {
        Ok(server) => server,
        Err(error) => {
            error!("Unable to start transporter, {error}");
            return;
        }
    };
    info!("Reading host events from stdin");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                error!("Unable to read stdin, {error}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<HostEvent>(&line) {
            Ok(event) => {
                server.send(event);
            }
            Err(error) => warn!("Skip malformed host event, {error}"),
        }
        print_events(server.wait_events(Duration::from_millis(100)));
    }
    server.terminate();
    print_events(server.events());

    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    match encoder.encode(&server.registry.gather(), &mut buffer) {
        Ok(()) => info!("Metrics:\n{}", String::from_utf8_lossy(&buffer)),
        Err(error) => error!("Unable to encode metrics, {error}"),
    }
    info!("Bye!");
}

fn print_events(events: Vec<Event>) {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    for event in events {
        match serde_json::to_string(&event) {
            Ok(line) => {
                if writeln!(stdout, "{line}").is_err() {
                    return;
                }
            }
            Err(error) => error!("Unable to encode event, {error}"),
        }
    }
}
