//! Network link provider

/// Link-layer state as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Not associated, or associated without an address
    Down,
    /// Associated and addressed
    Connected,
}

/// Network credentials passed to [`NetworkLink::connect`]
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    /// Network name
    pub ssid: &'a str,
    /// Pre-shared key, empty for an open network
    pub psk: &'a str,
}

/// Network link (Wi-Fi station or similar)
///
/// `connect` only starts association; completion is observed through
/// [`status`](NetworkLink::status).
pub trait NetworkLink {
    /// Begin associating with the given network
    fn connect(&mut self, credentials: &Credentials<'_>);

    /// Current link state
    fn status(&self) -> LinkStatus;

    /// Drop any association, stale or otherwise
    fn disconnect(&mut self);

    /// Whether the provider may persist credentials across restarts
    fn set_persistence(&mut self, persistent: bool);

    /// Assign the name the device announces on the network
    ///
    /// Returns `false` when the provider refused the name.
    fn set_client_identifier(&mut self, name: &str) -> bool;

    /// Current network address in text form
    fn current_address(&self) -> &str;

    /// Name of the associated network
    fn ssid(&self) -> &str;

    /// Hardware address of the interface
    fn mac_address(&self) -> &str;

    /// Convenience for `status() == Connected`
    fn is_connected(&self) -> bool {
        self.status() == LinkStatus::Connected
    }
}
