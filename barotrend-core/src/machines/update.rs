//! Remote update availability
//!
//! The update listener is started lazily the first time the link reaches
//! `Ready`, and considered gone whenever the link leaves it. While active it is
//! serviced every tick; any error it reports maps to its own fatal condition.

use crate::config::DeviceConfig;
use crate::errors::{Component, FatalCondition, FatalResult};
use crate::traits::UpdateProvider;

/// Update service state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    /// Listener not running
    Inactive,
    /// Listener running and serviced every tick
    Active,
}

impl UpdateState {
    /// Name used in logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
        }
    }
}

/// Keeps the remote update listener available while the link is up
#[derive(Debug, Clone)]
pub struct RemoteUpdateService {
    state: UpdateState,
    activations: u32,
}

impl RemoteUpdateService {
    /// Service with the listener not yet started
    pub const fn new() -> Self {
        Self {
            state: UpdateState::Inactive,
            activations: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> UpdateState {
        self.state
    }

    /// Whether the listener is running
    pub fn is_active(&self) -> bool {
        self.state == UpdateState::Active
    }

    /// Times the listener has been started
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Advance one step
    pub fn step<U: UpdateProvider>(
        &mut self,
        updater: &mut U,
        config: &DeviceConfig,
        link_ready: bool,
    ) -> FatalResult {
        if !link_ready {
            if self.is_active() {
                log_info!("link down, update service unavailable");
                self.transition(UpdateState::Inactive);
            }
            return Ok(());
        }

        self.activate(updater, config);

        updater.poll().map_err(|error| {
            log_warn!("update transport reported an error");
            FatalCondition::from(error).raised_by(Component::RemoteUpdate)
        })
    }

    /// Configure and start the listener; no-op when already active
    pub fn activate<U: UpdateProvider>(&mut self, updater: &mut U, config: &DeviceConfig) {
        if self.is_active() {
            return;
        }

        log_info!(
            "starting update service on port {} as {}",
            config.update.port,
            config.client_id.as_str()
        );
        updater.configure(config.update.port, &config.client_id, config.update.password());
        updater.activate();
        self.activations = self.activations.saturating_add(1);
        self.transition(UpdateState::Active);
    }

    fn transition(&mut self, next: UpdateState) {
        log_debug!("remote-update: {} -> {}", self.state.as_str(), next.as_str());
        self.state = next;
    }
}

impl Default for RemoteUpdateService {
    fn default() -> Self {
        Self::new()
    }
}
