use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Advertising duty-cycle settings.
///
/// Intervals are passed through to the transport in BLE units of 0.625 ms;
/// duration and gap bound how long each queued frame stays on the air and
/// how long the radio rests before the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisingSettings {
    #[serde(default = "default_interval_min")]
    pub interval_min: u16,
    #[serde(default = "default_interval_max")]
    pub interval_max: u16,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_gap_ms")]
    pub gap_ms: u64,
}

fn default_interval_min() -> u16 {
    0x20
}

fn default_interval_max() -> u16 {
    0x40
}

fn default_duration_ms() -> u64 {
    300
}

fn default_gap_ms() -> u64 {
    100
}

impl Default for AdvertisingSettings {
    fn default() -> Self {
        Self {
            interval_min: default_interval_min(),
            interval_max: default_interval_max(),
            duration_ms: default_duration_ms(),
            gap_ms: default_gap_ms(),
        }
    }
}

/// Controller configuration: the 4-byte mesh key shared with the paired
/// lights, queue bounds, and advertising timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerSettings {
    pub mesh_key: [u8; 4],
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default)]
    pub advertising: AdvertisingSettings,
}

fn default_queue_capacity() -> usize {
    10
}

impl ControllerSettings {
    pub fn new(mesh_key: [u8; 4]) -> Self {
        Self {
            mesh_key,
            queue_capacity: default_queue_capacity(),
            advertising: AdvertisingSettings::default(),
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::new([0; 4])
    }
}

/// A broadcast frame waiting for its advertising slot.
#[derive(Debug, Clone)]
pub struct QueuedCommand {
    pub light_id: u32,
    pub payload: Vec<u8>,
    pub queued_at: DateTime<Utc>,
    pub retries: u8,
}

/// Where the controller currently is in its broadcast duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertiseState {
    /// Nothing on the air; the next queued command starts a cycle.
    Idle,
    /// A frame is being advertised since `since`.
    Advertising { since: Instant },
    /// Radio rest period between frames.
    Gap { since: Instant },
}
