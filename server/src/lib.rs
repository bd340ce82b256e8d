use datamap::{Storage, StorageError};
use log::{debug, error, info, warn};
use prometheus::Registry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use transporter::api::Event;
use transporter::config::Config;
use transporter::world::{PermissionSet, SimulatedWorld};
use transporter::Transporter;

pub use host::*;
pub use metrics::*;

mod host;
mod metrics;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("unable to open gate storage, {0}")]
    Storage(#[from] StorageError),
    #[error("unable to register metrics, {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Dedicated thread owning the gate context. Host events go in through a
/// channel, produced events come out through another.
pub struct TransporterThread {
    pub running: Arc<AtomicBool>,
    pub registry: Registry,
    host_events: Sender<HostEvent>,
    events: Receiver<Event>,
    handle: Option<JoinHandle<()>>,
}

impl TransporterThread {
    pub fn spawn(config: Config) -> Result<Self, ServerError> {
        let storage = Storage::open(&config.database)?;
        let registry = Registry::new();
        let metrics = ServerMetrics::new(&registry)?;
        let running = Arc::new(AtomicBool::new(true));
        let running_thread = running.clone();
        let (host_events, host_events_receiver) = channel::<HostEvent>();
        let (events_sender, events) = channel();
        let (notify_started, started) = channel();
        let handle = thread::spawn(move || {
            info!("Start transporter thread");
            let debug = config.debug;
            let designs = config.designs.clone();
            let mut transporter = Transporter::new(
                config,
                storage,
                Box::new(SimulatedWorld::default()),
                Box::new(PermissionSet::default()),
            );
            transporter.load_designs(&designs);
            let mut host = Host::new(transporter);
            let start = Instant::now();
            let mut produced = match host.transporter.load_worlds() {
                Ok(events) => events,
                Err(error) => {
                    error!("Unable to load worlds, {error}");
                    vec![]
                }
            };
            if notify_started.send(true).is_err() {
                warn!("Transporter thread owner is gone");
            }
            while running_thread.load(Ordering::Relaxed) {
                let now = start.elapsed().as_millis() as i64;
                produced.extend(host.transporter.update(now));

                for event in host_events_receiver.try_iter() {
                    if debug {
                        info!("Host event {event:?}");
                    }
                    metrics.host_events.with_label_values(&[event.kind()]).inc();
                    match host.dispatch(event) {
                        Ok(events) => produced.extend(events),
                        Err(error) => {
                            debug!("Host event failed, {error}");
                            metrics.failed_host_events.inc();
                        }
                    }
                }

                metrics.produced_events.inc_by(produced.len() as u64);
                for event in produced.drain(..) {
                    if events_sender.send(event).is_err() {
                        warn!("Event subscriber is gone");
                        break;
                    }
                }
                let gates = &host.transporter.gates;
                metrics.gates.set(gates.len() as i64);
                metrics
                    .open_gates
                    .set(gates.iter().filter(|gate| gate.portal_open).count() as i64);

                thread::sleep(Duration::from_millis(20));
            }
            host.transporter.shutdown();
            info!("Stop transporter thread");
        });
        if started.recv().is_err() {
            error!("Transporter thread stopped before start");
        }
        Ok(Self {
            running,
            registry,
            host_events,
            events,
            handle: Some(handle),
        })
    }

    pub fn send(&self, event: HostEvent) -> bool {
        self.host_events.send(event).is_ok()
    }

    /// Events produced since the previous call.
    pub fn events(&self) -> Vec<Event> {
        self.events.try_iter().collect()
    }

    pub fn wait_events(&self, timeout: Duration) -> Vec<Event> {
        let mut events: Vec<Event> = self.events.recv_timeout(timeout).into_iter().collect();
        events.extend(self.events.try_iter());
        events
    }

    /// Stops the loop and waits until every gate is saved.
    pub fn terminate(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Transporter thread panicked");
            }
        }
    }
}

impl Drop for TransporterThread {
    fn drop(&mut self) {
        self.terminate();
    }
}
