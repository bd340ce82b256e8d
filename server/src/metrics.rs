use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, IntCounter, IntCounterVec, IntGauge, Registry,
};

#[derive(Clone)]
pub struct ServerMetrics {
    pub host_events: IntCounterVec,
    pub failed_host_events: IntCounter,
    pub produced_events: IntCounter,
    pub open_gates: IntGauge,
    pub gates: IntGauge,
}

impl ServerMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let host_events = register_int_counter_vec_with_registry!(
            "server_host_events",
            "server_host_events",
            &["kind"],
            registry
        )?;

        let failed_host_events = register_int_counter_with_registry!(
            "server_failed_host_events",
            "server_failed_host_events",
            registry
        )?;

        let produced_events = register_int_counter_with_registry!(
            "server_produced_events",
            "server_produced_events",
            registry
        )?;

        let open_gates =
            register_int_gauge_with_registry!("server_open_gates", "server_open_gates", registry)?;

        let gates = register_int_gauge_with_registry!("server_gates", "server_gates", registry)?;

        Ok(Self {
            host_events,
            failed_host_events,
            produced_events,
            open_gates,
            gates,
        })
    }
}
