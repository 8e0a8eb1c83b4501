//! Request counters and the store size gauge, exposed in Prometheus text format.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
    sessions: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new(
                "talks_requests_total",
                "Session resource calls by operation",
            ),
            &["operation"],
        )?;
        let sessions = IntGauge::new("talks_sessions", "Sessions currently in the store")?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(sessions.clone()))?;

        Ok(Self {
            registry,
            requests,
            sessions,
        })
    }

    /// Counts one call of a session resource operation.
    pub fn record(&self, operation: &str) {
        self.requests.with_label_values(&[operation]).inc();
    }

    pub fn set_session_count(&self, count: usize) {
        self.sessions.set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    #[cfg(test)]
    pub fn count(&self, operation: &str) -> u64 {
        self.requests.with_label_values(&[operation]).get()
    }
}
