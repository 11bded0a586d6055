use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::{info, trace, warn};

use fastcon_protocol::{prepare_payload, BROADCAST_ADDRESS, DEFAULT_ENCRYPT_KEY};

use crate::advertiser::{advertisement_frame, BleAdvertiser};
use crate::types::{AdvertiseState, ControllerSettings, QueuedCommand};

/// The Fastcon mesh controller.
///
/// Owns the command queue and the broadcast duty cycle, and encodes light
/// commands against the controller's mesh key. One controller serves every
/// light paired to the same mesh.
pub struct FastconController {
    settings: ControllerSettings,
    advertiser: Arc<dyn BleAdvertiser>,
    queue: Mutex<VecDeque<QueuedCommand>>,
    state: Mutex<AdvertiseState>,
    sequence: AtomicU8,
}

impl std::fmt::Debug for FastconController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastconController")
            .field("settings", &self.settings)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl FastconController {
    pub fn new(settings: ControllerSettings, advertiser: Arc<dyn BleAdvertiser>) -> Self {
        Self {
            settings,
            advertiser,
            queue: Mutex::new(VecDeque::new()),
            state: Mutex::new(AdvertiseState::Idle),
            sequence: AtomicU8::new(0),
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Log the active configuration. Called once when the component
    /// lifecycle brings the controller up.
    pub fn setup(&self) {
        let adv = &self.settings.advertising;
        info!("setting up Fastcon BLE controller");
        info!(
            interval_min = adv.interval_min,
            interval_max = adv.interval_max,
            duration_ms = adv.duration_ms,
            gap_ms = adv.gap_ms,
            queue_capacity = self.settings.queue_capacity,
            "controller configuration"
        );
    }

    // ========================================================================
    // COMMAND QUEUE
    // ========================================================================

    /// Queue a prepared frame for broadcast. A full queue drops the command
    /// with a warning; callers are never blocked on the radio.
    pub async fn queue_command(&self, light_id: u32, payload: Vec<u8>) {
        let mut queue = self.queue.lock().await;
        if queue.len() >= self.settings.queue_capacity {
            warn!(
                light_id,
                queue_size = queue.len(),
                "command queue full, dropping command"
            );
            return;
        }

        queue.push_back(QueuedCommand {
            light_id,
            payload,
            queued_at: Utc::now(),
            retries: 0,
        });
        trace!(queue_size = queue.len(), "command queued");
    }

    pub async fn clear_queue(&self) {
        self.queue.lock().await.clear();
    }

    pub async fn queue_len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn advertise_state(&self) -> AdvertiseState {
        *self.state.lock().await
    }

    // ========================================================================
    // BROADCAST DUTY CYCLE
    // ========================================================================

    /// Advance the duty cycle by one step. Driven from the host loop; every
    /// failure is logged and the cycle recovers on a later tick.
    pub async fn tick(&self) {
        let state = *self.state.lock().await;

        match state {
            AdvertiseState::Idle => {
                let command = self.queue.lock().await.pop_front();
                let Some(command) = command else {
                    return;
                };

                let frame = match advertisement_frame(&command.payload) {
                    Ok(frame) => frame,
                    Err(err) => {
                        warn!(
                            light_id = command.light_id,
                            error = %err,
                            "dropping command that does not fit an advertisement"
                        );
                        return;
                    }
                };

                if let Err(err) = self
                    .advertiser
                    .start_advertising(&self.settings.advertising, &frame)
                    .await
                {
                    warn!(error = %err, "error starting advertisement");
                    return;
                }

                *self.state.lock().await = AdvertiseState::Advertising {
                    since: Instant::now(),
                };
                trace!("started advertising");
            }

            AdvertiseState::Advertising { since } => {
                if since.elapsed() >= Duration::from_millis(self.settings.advertising.duration_ms) {
                    if let Err(err) = self.advertiser.stop_advertising().await {
                        warn!(error = %err, "error stopping advertisement");
                    }
                    *self.state.lock().await = AdvertiseState::Gap {
                        since: Instant::now(),
                    };
                    trace!("stopped advertising, entering gap period");
                }
            }

            AdvertiseState::Gap { since } => {
                if since.elapsed() >= Duration::from_millis(self.settings.advertising.gap_ms) {
                    *self.state.lock().await = AdvertiseState::Idle;
                    trace!("gap period complete");
                }
            }
        }
    }

    /// Drive the duty cycle until cancelled.
    pub async fn run(&self) {
        loop {
            self.tick().await;
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    // ========================================================================
    // COMMAND ENCODING
    // ========================================================================

    /// Encode a light's desired state into a ready-to-queue broadcast frame.
    ///
    /// Brightness and color channels are fractions in `0.0..=1.0`. An RGB
    /// value of all zeroes selects warm-white mode.
    pub fn light_advertisement(
        &self,
        light_id: u32,
        is_on: bool,
        brightness: f32,
        red: f32,
        green: f32,
        blue: f32,
    ) -> Vec<u8> {
        self.single_control(light_id, &light_payload(is_on, brightness, red, green, blue))
    }

    /// Wrap a light payload in a single-target control command.
    pub fn single_control(&self, light_id: u32, data: &[u8]) -> Vec<u8> {
        let body = single_control_body(light_id, data);
        self.generate_command(5, light_id, &body, true)
    }

    /// Build, encrypt, and frame a mesh command of type `n`.
    pub fn generate_command(&self, n: u8, light_id: u32, data: &[u8], forward: bool) -> Vec<u8> {
        let sequence = self.next_sequence();
        let body = command_body(&self.settings.mesh_key, n, light_id, sequence, data, forward);
        prepare_payload(&BROADCAST_ADDRESS, &body)
    }

    /// Emit the next mesh sequence number: 0 on the very first command,
    /// then cycling through 1..=254.
    fn next_sequence(&self) -> u8 {
        self.sequence
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |seq| {
                Some(if seq >= 254 { 1 } else { seq + 1 })
            })
            .unwrap_or_else(|prev| prev)
    }
}

/// Encode a light state into the 6-byte (or 1-byte off) payload carried by
/// a single-control command. Brightness maps to 0..=127 with the high bit
/// as the on flag; RGB channels are carried in BRG order.
fn light_payload(is_on: bool, brightness: f32, red: f32, green: f32, blue: f32) -> Vec<u8> {
    let bright = (brightness * 127.0).min(127.0) as u8;

    if !is_on {
        vec![0]
    } else if red == 0.0 && green == 0.0 && blue == 0.0 {
        // Warm white mode
        vec![128 + bright, 0, 0, 0, 127, 127]
    } else {
        let r = (red * 255.0) as u8;
        let g = (green * 255.0) as u8;
        let b = (blue * 255.0) as u8;
        vec![128 + bright, b, r, g, 0, 0]
    }
}

/// Fixed 12-byte single-control body: tag and payload length, target light,
/// payload, zero padding.
fn single_control_body(light_id: u32, data: &[u8]) -> Vec<u8> {
    let mut body = vec![0u8; 12];
    body[0] = 2 | ((data.len() as u8 + 1) << 4);
    body[1] = light_id as u8;
    body[2..2 + data.len()].copy_from_slice(data);
    body
}

/// Assemble and encrypt a mesh command body. The 4-byte header carries the
/// target group, command type, sequence number, and safe key, plus an
/// additive checksum over every other byte; the header is XORed with the
/// fixed key and the payload with the mesh key.
fn command_body(
    mesh_key: &[u8; 4],
    n: u8,
    light_id: u32,
    sequence: u8,
    data: &[u8],
    forward: bool,
) -> Vec<u8> {
    let mut body = vec![0u8; data.len() + 4];
    let group = (light_id / 256) as u8;

    body[0] = (group & 0x0F) | ((n & 0x07) << 4) | if forward { 0x80 } else { 0 };
    body[1] = sequence;
    body[2] = mesh_key[3];
    body[4..].copy_from_slice(data);

    let mut checksum = 0u8;
    for (i, byte) in body.iter().enumerate() {
        if i != 3 {
            checksum = checksum.wrapping_add(*byte);
        }
    }
    body[3] = checksum;

    for i in 0..4 {
        body[i] ^= DEFAULT_ENCRYPT_KEY[i];
    }
    for (i, byte) in body.iter_mut().enumerate().skip(4) {
        *byte ^= mesh_key[(i - 4) & 3];
    }

    body
}
