//! Health monitoring for the trolley service.
//!
//! Provides health checks and status reporting for the running service.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Health status levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    #[default]
    Healthy,
    /// Some issues but still operational
    Degraded,
    /// Critical issues, system may not be functioning
    Unhealthy,
}

/// Individual component health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Current status
    pub status: HealthStatus,
    /// Optional message
    pub message: Option<String>,
    /// Last check timestamp (epoch ms)
    pub last_checked: i64,
}

/// Overall health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status (worst of all components)
    pub status: HealthStatus,
    /// Process uptime in seconds
    pub uptime_secs: f64,
    /// Individual component health
    pub components: Vec<ComponentHealth>,
    /// Cart polls served since startup
    pub polls_served: u64,
    /// Sessions ended since startup
    pub sessions_completed: u64,
}

/// Health check manager
pub struct HealthCheck {
    start_time: Instant,
    components: RwLock<HashMap<String, ComponentState>>,
    polls_served: AtomicU64,
    sessions_completed: AtomicU64,
}

struct ComponentState {
    status: HealthStatus,
    message: Option<String>,
    last_checked: Instant,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthCheck {
    /// Create a new health check manager
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            components: RwLock::new(HashMap::new()),
            polls_served: AtomicU64::new(0),
            sessions_completed: AtomicU64::new(0),
        }
    }

    /// Register a component
    pub fn register_component(&self, name: &str) {
        let mut components = self.components.write();
        components.insert(
            name.to_string(),
            ComponentState {
                status: HealthStatus::Healthy,
                message: None,
                last_checked: Instant::now(),
            },
        );
        debug!("Registered health component: {}", name);
    }

    /// Update component status
    pub fn update_component(&self, name: &str, status: HealthStatus, message: Option<&str>) {
        let mut components = self.components.write();
        let now = Instant::now();

        if let Some(state) = components.get_mut(name) {
            let was_healthy = state.status == HealthStatus::Healthy;
            state.status = status;
            state.message = message.map(|s| s.to_string());
            state.last_checked = now;

            if was_healthy && status != HealthStatus::Healthy {
                warn!("Component {} became {:?}: {:?}", name, status, message);
            } else if !was_healthy && status == HealthStatus::Healthy {
                info!("Component {} recovered", name);
            }
        } else {
            components.insert(
                name.to_string(),
                ComponentState {
                    status,
                    message: message.map(|s| s.to_string()),
                    last_checked: now,
                },
            );
        }
    }

    /// Mark component as healthy
    pub fn mark_healthy(&self, name: &str) {
        self.update_component(name, HealthStatus::Healthy, None);
    }

    /// Mark component as degraded
    pub fn mark_degraded(&self, name: &str, message: &str) {
        self.update_component(name, HealthStatus::Degraded, Some(message));
    }

    /// Mark component as unhealthy
    pub fn mark_unhealthy(&self, name: &str, message: &str) {
        self.update_component(name, HealthStatus::Unhealthy, Some(message));
    }

    /// Record a served cart poll
    pub fn record_poll(&self) {
        self.polls_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an ended session
    pub fn record_session_end(&self) {
        self.sessions_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get overall health status
    pub fn status(&self) -> HealthStatus {
        let components = self.components.read();

        let mut worst = HealthStatus::Healthy;
        for state in components.values() {
            match state.status {
                HealthStatus::Unhealthy => return HealthStatus::Unhealthy,
                HealthStatus::Degraded => worst = HealthStatus::Degraded,
                HealthStatus::Healthy => {}
            }
        }
        worst
    }

    /// Generate a full health report
    pub fn report(&self) -> HealthReport {
        let components = self.components.read();
        let now = Instant::now();

        let component_health: Vec<ComponentHealth> = components
            .iter()
            .map(|(name, state)| ComponentHealth {
                name: name.clone(),
                status: state.status,
                message: state.message.clone(),
                last_checked: chrono::Utc::now().timestamp_millis()
                    - (now - state.last_checked).as_millis() as i64,
            })
            .collect();

        HealthReport {
            status: self.status(),
            uptime_secs: self.start_time.elapsed().as_secs_f64(),
            components: component_health,
            polls_served: self.polls_served.load(Ordering::Relaxed),
            sessions_completed: self.sessions_completed.load(Ordering::Relaxed),
        }
    }

    /// Check if the system is healthy
    pub fn is_healthy(&self) -> bool {
        self.status() == HealthStatus::Healthy
    }

    /// Check if the system is operational (healthy or degraded)
    pub fn is_operational(&self) -> bool {
        self.status() != HealthStatus::Unhealthy
    }
}

impl std::fmt::Display for HealthReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Health Report ===")?;
        writeln!(f, "Status: {:?}", self.status)?;
        writeln!(f, "Uptime: {:.0}s", self.uptime_secs)?;
        writeln!(f, "Polls Served: {}", self.polls_served)?;
        writeln!(f, "Sessions Completed: {}", self.sessions_completed)?;
        writeln!(f)?;
        writeln!(f, "Components:")?;
        for comp in &self.components {
            write!(f, "  {}: {:?}", comp.name, comp.status)?;
            if let Some(ref msg) = comp.message {
                write!(f, " - {}", msg)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_basic() {
        let health = HealthCheck::new();

        health.register_component("server");
        health.register_component("gateway");

        assert_eq!(health.status(), HealthStatus::Healthy);
        assert!(health.is_healthy());
    }

    #[test]
    fn health_degraded() {
        let health = HealthCheck::new();

        health.register_component("gateway");
        health.mark_degraded("gateway", "Slow responses");

        assert_eq!(health.status(), HealthStatus::Degraded);
        assert!(health.is_operational());
        assert!(!health.is_healthy());
    }

    #[test]
    fn health_unhealthy_wins() {
        let health = HealthCheck::new();

        health.register_component("server");
        health.register_component("gateway");
        health.mark_unhealthy("server", "Bind failed");

        assert_eq!(health.status(), HealthStatus::Unhealthy);
        assert!(!health.is_operational());
    }

    #[test]
    fn health_recovery() {
        let health = HealthCheck::new();

        health.register_component("gateway");
        health.mark_unhealthy("gateway", "Timeout");
        assert_eq!(health.status(), HealthStatus::Unhealthy);

        health.mark_healthy("gateway");
        assert_eq!(health.status(), HealthStatus::Healthy);
    }

    #[test]
    fn report_carries_counters() {
        let health = HealthCheck::new();

        health.register_component("server");
        health.record_poll();
        health.record_poll();
        health.record_session_end();

        let report = health.report();
        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.components.len(), 1);
        assert_eq!(report.polls_served, 2);
        assert_eq!(report.sessions_completed, 1);
    }
}
