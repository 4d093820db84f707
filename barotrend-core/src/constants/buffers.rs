//! Buffer Sizes and Memory Constraints
//!
//! Every buffer in the core is fixed-size and allocated up front. Sizes are
//! chosen for a microcontroller with tens of kilobytes of free heap.

// ===== TELEMETRY QUEUE =====

/// Messages held between sampling and transport.
///
/// - 10 messages × ~390 bytes/message ≈ 4KB
/// - One sensor read produces two messages, one status report produces one
///
/// Overflow is fatal, never a silent drop.
pub const TELEMETRY_QUEUE_CAPACITY: usize = 10;

// ===== MESSAGE STRINGS =====

/// Maximum topic length in bytes.
///
/// `<prefix>/<client>/<device>/<measurement>` with the configured field
/// limits stays well inside this bound.
pub const MAX_TOPIC_LEN: usize = 128;

/// Maximum payload length in bytes.
///
/// Matches a 255-byte C buffer less its terminator.
pub const MAX_PAYLOAD_LEN: usize = 254;

// ===== CONFIGURATION STRINGS =====

/// Maximum network name length (802.11 SSID limit).
pub const MAX_SSID_LEN: usize = 32;

/// Maximum pre-shared key length (WPA2 passphrase limit).
pub const MAX_PSK_LEN: usize = 64;

/// Maximum client identifier length.
pub const MAX_CLIENT_ID_LEN: usize = 32;

/// Maximum broker host name length.
pub const MAX_HOST_LEN: usize = 64;

/// Maximum topic prefix length.
pub const MAX_PREFIX_LEN: usize = 32;

/// Maximum device key length (e.g. "bmp280").
pub const MAX_DEVICE_KEY_LEN: usize = 16;

/// Maximum update password length.
pub const MAX_PASSWORD_LEN: usize = 32;
