//! Network link bring-up
//!
//! ```text
//! Setup ──→ Idle ──down──→ Connecting ──request──→ WaitingForLink ──30 s──→ LinkStartFailure
//!            │                 ↑  │                      │
//!            up                │  up                     up (identifier forced)
//!            ↓                 │  ↓                      ↓
//!          Ready ←─────────────┼──┴──────────────────────┘
//!            │                 │
//!            └──────down───────┘
//! ```
//!
//! Every other network consumer waits for [`NetworkLinkMachine::is_ready`].
//! The client identifier is assigned once per boot when the link is found
//! already up, and re-assigned unconditionally after a fresh association.

use crate::config::DeviceConfig;
use crate::errors::{Component, FatalCondition, FatalResult};
use crate::time::{DeadlineTimer, Instant};
use crate::traits::{Credentials, NetworkLink};

/// Link machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Clear any stale association
    Setup,
    /// Observe the link
    Idle,
    /// Start associating
    Connecting,
    /// Association requested, deadline armed
    WaitingForLink,
    /// Link up and identified
    Ready,
}

impl LinkState {
    /// Name used in transition logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::WaitingForLink => "waiting-for-link",
            Self::Ready => "ready",
        }
    }
}

/// Drives the network link from boot to `Ready`
#[derive(Debug, Clone)]
pub struct NetworkLinkMachine {
    state: LinkState,
    timer: DeadlineTimer,
    identifier_assigned: bool,
}

impl NetworkLinkMachine {
    /// Link machine that brings the link up on its first step
    pub const fn new() -> Self {
        Self {
            state: LinkState::Setup,
            timer: DeadlineTimer::new(),
            identifier_assigned: false,
        }
    }

    /// Current state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Whether consumers may use the network
    pub fn is_ready(&self) -> bool {
        self.state == LinkState::Ready
    }

    /// Advance one step
    pub fn step<L: NetworkLink>(
        &mut self,
        link: &mut L,
        config: &DeviceConfig,
        now: Instant,
    ) -> FatalResult {
        match self.state {
            LinkState::Setup => {
                link.disconnect();
                link.set_persistence(false);
                self.transition(LinkState::Idle);
            }

            LinkState::Idle => {
                if link.is_connected() {
                    self.assign_identifier(link, &config.client_id, false);
                    self.transition(LinkState::Ready);
                } else {
                    self.transition(LinkState::Connecting);
                }
            }

            LinkState::Connecting => {
                if link.is_connected() {
                    self.assign_identifier(link, &config.client_id, false);
                    self.transition(LinkState::Ready);
                    return Ok(());
                }

                log_info!("connecting to {}", config.link.ssid.as_str());
                link.set_persistence(false);
                link.connect(&Credentials {
                    ssid: &config.link.ssid,
                    psk: &config.link.psk,
                });
                self.timer.start(now, config.timing.link_start_timeout());
                self.transition(LinkState::WaitingForLink);
            }

            LinkState::WaitingForLink => {
                if link.is_connected() {
                    self.timer.stop();
                    log_info!("link up, address {}", link.current_address());
                    self.assign_identifier(link, &config.client_id, true);
                    self.transition(LinkState::Ready);
                } else if self.timer.is_expired(now) {
                    log_warn!("link did not come up before its deadline");
                    return Err(FatalCondition::LinkStartFailure.raised_by(Component::NetworkLink));
                }
            }

            LinkState::Ready => {
                if !link.is_connected() {
                    log_warn!("link lost, reconnecting");
                    self.transition(LinkState::Connecting);
                }
            }
        }

        Ok(())
    }

    fn assign_identifier<L: NetworkLink>(&mut self, link: &mut L, name: &str, force: bool) {
        if name.is_empty() {
            log_warn!("no client identifier configured, skipping");
            return;
        }
        if self.identifier_assigned && !force {
            return;
        }

        self.identifier_assigned = link.set_client_identifier(name);
        if self.identifier_assigned {
            log_info!("client identifier set to {}", name);
        } else {
            log_warn!("client identifier {} was refused", name);
        }
    }

    fn transition(&mut self, next: LinkState) {
        log_debug!("network-link: {} -> {}", self.state.as_str(), next.as_str());
        self.state = next;
    }
}

impl Default for NetworkLinkMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LinkStatus;

    #[derive(Default)]
    struct FakeLink {
        up: bool,
        connects: u32,
        disconnects: u32,
        identifiers: u32,
        refuse_identifier: bool,
    }

    impl NetworkLink for FakeLink {
        fn connect(&mut self, _credentials: &Credentials<'_>) {
            self.connects += 1;
        }
        fn status(&self) -> LinkStatus {
            if self.up {
                LinkStatus::Connected
            } else {
                LinkStatus::Down
            }
        }
        fn disconnect(&mut self) {
            self.disconnects += 1;
        }
        fn set_persistence(&mut self, _persistent: bool) {}
        fn set_client_identifier(&mut self, _name: &str) -> bool {
            self.identifiers += 1;
            !self.refuse_identifier
        }
        fn current_address(&self) -> &str {
            "10.0.0.5"
        }
        fn ssid(&self) -> &str {
            "HomeNet"
        }
        fn mac_address(&self) -> &str {
            "AA:BB:CC:DD:EE:FF"
        }
    }

    fn config() -> DeviceConfig {
        DeviceConfig::new().with_network("HomeNet", "secret").unwrap()
    }

    fn at(ms: u64) -> Instant {
        Instant::from_ticks(ms)
    }

    #[test]
    fn cold_start_reaches_ready() {
        let mut machine = NetworkLinkMachine::new();
        let mut link = FakeLink::default();
        let config = config();

        machine.step(&mut link, &config, at(0)).unwrap();
        assert_eq!(machine.state(), LinkState::Idle);
        assert_eq!(link.disconnects, 1);

        machine.step(&mut link, &config, at(1)).unwrap();
        machine.step(&mut link, &config, at(2)).unwrap();
        assert_eq!(machine.state(), LinkState::WaitingForLink);
        assert_eq!(link.connects, 1);

        link.up = true;
        machine.step(&mut link, &config, at(5_000)).unwrap();
        assert!(machine.is_ready());
        assert_eq!(link.identifiers, 1);
    }

    #[test]
    fn deadline_raises_link_start_failure() {
        let mut machine = NetworkLinkMachine::new();
        let mut link = FakeLink::default();
        let config = config();

        for ms in 0..3 {
            machine.step(&mut link, &config, at(ms)).unwrap();
        }
        machine.step(&mut link, &config, at(30_001)).unwrap();
        let error = machine.step(&mut link, &config, at(30_002)).unwrap_err();

        assert_eq!(error.condition, FatalCondition::LinkStartFailure);
        assert_eq!(error.component, Component::NetworkLink);
    }

    #[test]
    fn already_up_skips_connect() {
        let mut machine = NetworkLinkMachine::new();
        let mut link = FakeLink {
            up: true,
            ..FakeLink::default()
        };
        let config = config();

        machine.step(&mut link, &config, at(0)).unwrap();
        machine.step(&mut link, &config, at(1)).unwrap();
        assert!(machine.is_ready());
        assert_eq!(link.connects, 0);
    }

    #[test]
    fn link_loss_reconnects_and_forces_identifier() {
        let mut machine = NetworkLinkMachine::new();
        let mut link = FakeLink {
            up: true,
            ..FakeLink::default()
        };
        let config = config();

        machine.step(&mut link, &config, at(0)).unwrap();
        machine.step(&mut link, &config, at(1)).unwrap();
        assert_eq!(link.identifiers, 1);

        link.up = false;
        machine.step(&mut link, &config, at(2)).unwrap();
        assert_eq!(machine.state(), LinkState::Connecting);
        machine.step(&mut link, &config, at(3)).unwrap();

        link.up = true;
        machine.step(&mut link, &config, at(4)).unwrap();
        assert!(machine.is_ready());
        assert_eq!(link.identifiers, 2);
    }

    #[test]
    fn refused_identifier_is_not_fatal() {
        let mut machine = NetworkLinkMachine::new();
        let mut link = FakeLink {
            up: true,
            refuse_identifier: true,
            ..FakeLink::default()
        };
        let config = config();

        machine.step(&mut link, &config, at(0)).unwrap();
        machine.step(&mut link, &config, at(1)).unwrap();
        assert!(machine.is_ready());
    }
}
