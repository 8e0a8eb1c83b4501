//! Health evaluation for orchestrator liveness and readiness probes.
//!
//! Two checks are exposed. The lenient `Session:successful-check` only looks
//! at whether the store answers a read. The strict `Session:failed-check` also
//! goes down when the external override says so or when an operator has
//! flagged the app down at runtime.
//!
//! Each check reports under its own name whatever the verdict, rather than
//! swapping names when the result flips.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use talks::data::{HealthCheck, HealthState};
use talks::log;

pub const SUCCESSFUL_CHECK: &str = "Session:successful-check";
pub const FAILED_CHECK: &str = "Session:failed-check";

/// The override value that forces the strict check down.
const OVERRIDE_DOWN: &str = "true";

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Something that can prove it still serves reads end to end.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn probe(&self) -> Result<(), ProbeError>;
}

/// Where the external "app is down" override comes from.
///
/// Read on every check so operators can flip it without a restart.
pub trait OverrideSource: Send + Sync {
    fn app_down(&self) -> Option<String>;
}

/// Reads the override from an environment variable.
pub struct EnvOverride {
    var: String,
}

impl EnvOverride {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl OverrideSource for EnvOverride {
    fn app_down(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

pub struct HealthEvaluator {
    probe: Arc<dyn ReadinessProbe>,
    override_source: Box<dyn OverrideSource>,
    app_down: AtomicBool,
}

impl HealthEvaluator {
    pub fn new(probe: Arc<dyn ReadinessProbe>, override_source: Box<dyn OverrideSource>) -> Self {
        Self {
            probe,
            override_source,
            app_down: AtomicBool::new(false),
        }
    }

    pub fn set_app_down(&self, down: bool) {
        self.app_down.store(down, Ordering::Relaxed);
    }

    pub fn is_app_down(&self) -> bool {
        self.app_down.load(Ordering::Relaxed)
    }

    async fn probe_state(&self) -> HealthState {
        match self.probe.probe().await {
            Ok(()) => HealthState::Up,
            Err(e) => {
                log::warn!("Health probe failed: {}", e);
                HealthState::Down
            }
        }
    }

    fn overridden(&self) -> bool {
        self.override_source
            .app_down()
            .is_some_and(|value| value == OVERRIDE_DOWN)
    }

    /// Up whenever the probe succeeds; ignores both down flags.
    pub async fn successful_check(&self) -> HealthCheck {
        HealthCheck::new(SUCCESSFUL_CHECK, self.probe_state().await)
    }

    /// Down if the probe fails, the override is `"true"`, or the runtime flag
    /// is set.
    pub async fn failed_check(&self) -> HealthCheck {
        let probe = self.probe_state().await;
        let state = if probe == HealthState::Down || self.overridden() || self.is_app_down() {
            HealthState::Down
        } else {
            HealthState::Up
        };
        HealthCheck::new(FAILED_CHECK, state)
    }

    pub async fn checks(&self) -> Vec<HealthCheck> {
        vec![self.successful_check().await, self.failed_check().await]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(bool);

    #[async_trait]
    impl ReadinessProbe for FixedProbe {
        async fn probe(&self) -> Result<(), ProbeError> {
            if self.0 {
                Ok(())
            } else {
                Err(ProbeError::Unavailable("probe stub".to_string()))
            }
        }
    }

    struct FixedOverride(Option<&'static str>);

    impl OverrideSource for FixedOverride {
        fn app_down(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn evaluator(probe_ok: bool, override_value: Option<&'static str>) -> HealthEvaluator {
        HealthEvaluator::new(
            Arc::new(FixedProbe(probe_ok)),
            Box::new(FixedOverride(override_value)),
        )
    }

    #[tokio::test]
    async fn healthy_by_default() {
        let health = evaluator(true, None);

        assert_eq!(health.successful_check().await.state, HealthState::Up);
        assert_eq!(health.failed_check().await.state, HealthState::Up);
        assert!(!health.is_app_down());
    }

    #[tokio::test]
    async fn runtime_flag_forces_strict_check_down() {
        let health = evaluator(true, None);
        health.set_app_down(true);

        let strict = health.failed_check().await;
        assert_eq!(strict.name, FAILED_CHECK);
        assert_eq!(strict.state, HealthState::Down);

        // The lenient check ignores the flag.
        assert_eq!(health.successful_check().await.state, HealthState::Up);

        health.set_app_down(false);
        assert_eq!(health.failed_check().await.state, HealthState::Up);
    }

    #[tokio::test]
    async fn only_the_literal_true_override_counts() {
        assert_eq!(
            evaluator(true, Some("true")).failed_check().await.state,
            HealthState::Down
        );
        for value in ["false", "TRUE", "1", ""] {
            assert_eq!(
                evaluator(true, Some(value)).failed_check().await.state,
                HealthState::Up,
                "override {value:?} should not count"
            );
        }
        assert_eq!(
            evaluator(true, Some("true")).successful_check().await.state,
            HealthState::Up
        );
    }

    #[tokio::test]
    async fn probe_failure_takes_both_checks_down() {
        let health = evaluator(false, None);

        let checks = health.checks().await;
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].name, SUCCESSFUL_CHECK);
        assert!(checks.iter().all(|check| check.state == HealthState::Down));
    }

    #[tokio::test]
    async fn check_names_do_not_follow_the_verdict() {
        for (probe_ok, app_down) in [(true, false), (true, true), (false, false)] {
            let health = evaluator(probe_ok, None);
            health.set_app_down(app_down);

            assert_eq!(health.successful_check().await.name, SUCCESSFUL_CHECK);
            assert_eq!(health.failed_check().await.name, FAILED_CHECK);
        }
    }

    #[tokio::test]
    async fn evaluation_does_not_touch_the_flag() {
        let health = evaluator(false, Some("true"));
        health.checks().await;
        health.checks().await;
        assert!(!health.is_app_down());
    }

    #[test]
    fn env_override_reads_the_named_variable() {
        let source = EnvOverride::new("TALKS_TEST_OVERRIDE_THAT_IS_NEVER_SET");
        assert_eq!(source.app_down(), None);
    }
}
