//! Sensor sampling
//!
//! ```text
//! Initialize ──start──→ Stabilize ──500 ms──→ Idle ──10 min──→ Read ──→ Idle
//!     │                                                         │  ↺ WouldBlock
//!     └─ SensorStartFailure                  SensorMalfunction ─┘
//! ```
//!
//! A read that is still converting when the read deadline (2 s by default)
//! expires is a malfunction, the same as a faulted read.
//!
//! Each read produces two telemetry messages, temperature first, then local
//! and sea-level pressure with the trend classification. A reading of exactly
//! zero is treated as a sensor fault, as is anything non-finite.

use crate::context::AppContext;
use crate::errors::{Component, FatalCondition, FatalError, FatalResult, MessageError};
use crate::physics::sea_level_pressure;
use crate::telemetry::{
    pressure_payload, temperature_payload, TelemetryMessage, TopicScheme, TOPIC_PRESSURE_KEY,
    TOPIC_TEMPERATURE_KEY,
};
use crate::time::{DeadlineTimer, Instant};
use crate::traits::{BarometricSensor, SensorFault};
use crate::trend::Trend;

/// Sampler machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Start the sensor
    Initialize,
    /// Let the sensor settle after power-up
    Stabilize,
    /// Wait for the next read
    Idle,
    /// Acquire and publish one reading
    Read,
}

impl SamplerState {
    /// Name used in transition logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Stabilize => "stabilize",
            Self::Idle => "idle",
            Self::Read => "read",
        }
    }
}

/// Most recent completed reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius
    pub temperature_c: f32,
    /// Station pressure in hPa
    pub local_hpa: f32,
    /// Pressure reduced to sea level in hPa
    pub sea_level_hpa: f32,
    /// Trend after this reading
    pub trend: Trend,
}

/// Periodically reads the sensor and queues the results
#[derive(Debug, Clone)]
pub struct SensorSampler {
    state: SamplerState,
    timer: DeadlineTimer,
    /// Temperature already acquired while pressure is still converting
    pending_temperature: Option<f32>,
    last: Option<Reading>,
    readings: u32,
}

impl SensorSampler {
    /// Sampler that starts the sensor on its first step
    pub const fn new() -> Self {
        Self {
            state: SamplerState::Initialize,
            timer: DeadlineTimer::new(),
            pending_temperature: None,
            last: None,
            readings: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Most recent completed reading, if any
    pub fn last_reading(&self) -> Option<Reading> {
        self.last
    }

    /// Completed readings since boot
    pub fn readings(&self) -> u32 {
        self.readings
    }

    /// Advance one step
    pub fn step<S: BarometricSensor>(
        &mut self,
        sensor: &mut S,
        context: &mut AppContext,
        now: Instant,
    ) -> FatalResult {
        match self.state {
            SamplerState::Initialize => {
                if !sensor.start() {
                    log_warn!("sensor did not answer its start sequence");
                    return Err(fatal(FatalCondition::SensorStartFailure));
                }
                self.timer.start(now, context.config.sensor.stabilisation());
                self.transition(SamplerState::Stabilize);
            }

            SamplerState::Stabilize => {
                if self.timer.is_expired(now) {
                    self.enter_idle(context, now);
                }
            }

            SamplerState::Idle => {
                if self.timer.is_expired(now) {
                    self.timer
                        .start(now, context.config.timing.sensor_read_timeout());
                    self.transition(SamplerState::Read);
                }
            }

            SamplerState::Read => {
                let temperature_c = match self.pending_temperature {
                    Some(value) => value,
                    None => match acquire(sensor.read_temperature())? {
                        Some(value) => {
                            self.pending_temperature = Some(value);
                            value
                        }
                        None => return self.still_converting(now),
                    },
                };

                let local_hpa = match acquire(sensor.read_pressure())? {
                    Some(value) => value,
                    None => return self.still_converting(now),
                };
                self.pending_temperature = None;

                self.publish(context, temperature_c, local_hpa)?;
                self.enter_idle(context, now);
            }
        }

        Ok(())
    }

    fn publish(&mut self, context: &mut AppContext, temperature_c: f32, local_hpa: f32) -> FatalResult {
        let sea_level_hpa =
            sea_level_pressure(local_hpa, temperature_c, context.config.sensor.altitude_m);
        let trend = context.trend.classify(f64::from(sea_level_hpa));

        log_info!(
            "read {} C, {} hPa local, {} hPa sea level, {}",
            temperature_c,
            local_hpa,
            sea_level_hpa,
            trend.as_str()
        );

        let (temperature, pressure) = build_messages(
            context,
            temperature_c,
            local_hpa,
            sea_level_hpa,
            trend,
        )
        .map_err(|_| fatal(FatalCondition::MessageOverflow))?;

        context.enqueue(Component::SensorSampler, temperature)?;
        context.enqueue(Component::SensorSampler, pressure)?;

        self.readings = self.readings.saturating_add(1);
        self.last = Some(Reading {
            temperature_c,
            local_hpa,
            sea_level_hpa,
            trend,
        });
        Ok(())
    }

    fn still_converting(&mut self, now: Instant) -> FatalResult {
        if !self.timer.is_expired(now) {
            return Ok(());
        }
        log_warn!("sensor conversion did not finish before the read deadline");
        self.pending_temperature = None;
        Err(fatal(FatalCondition::SensorMalfunction))
    }

    fn enter_idle(&mut self, context: &AppContext, now: Instant) {
        self.timer.start(now, context.config.sensor.scan_interval());
        self.transition(SamplerState::Idle);
    }

    fn transition(&mut self, next: SamplerState) {
        log_debug!("sensor-sampler: {} -> {}", self.state.as_str(), next.as_str());
        self.state = next;
    }
}

impl Default for SensorSampler {
    fn default() -> Self {
        Self::new()
    }
}

fn build_messages(
    context: &AppContext,
    temperature_c: f32,
    local_hpa: f32,
    sea_level_hpa: f32,
    trend: Trend,
) -> Result<(TelemetryMessage, TelemetryMessage), MessageError> {
    let config = &context.config;
    let device = &config.sensor.device_key;
    let scheme = TopicScheme::new(&config.broker.topic_prefix, &config.client_id);

    let temperature = TelemetryMessage::from_parts(
        scheme.measurement(device, TOPIC_TEMPERATURE_KEY)?,
        temperature_payload(temperature_c)?,
        false,
    );
    let pressure = TelemetryMessage::from_parts(
        scheme.measurement(device, TOPIC_PRESSURE_KEY)?,
        pressure_payload(local_hpa, sea_level_hpa, trend)?,
        false,
    );
    Ok((temperature, pressure))
}

/// `Ok(None)` while the sensor is still converting
fn acquire(result: nb::Result<f32, SensorFault>) -> Result<Option<f32>, FatalError> {
    match result {
        Ok(value) if value != 0.0 && value.is_finite() => Ok(Some(value)),
        Ok(_) => {
            log_warn!("sensor returned an invalid reading");
            Err(fatal(FatalCondition::SensorMalfunction))
        }
        Err(nb::Error::WouldBlock) => Ok(None),
        Err(nb::Error::Other(fault)) => {
            log_warn!("sensor fault: {}", fault);
            Err(fatal(FatalCondition::SensorMalfunction))
        }
    }
}

fn fatal(condition: FatalCondition) -> FatalError {
    condition.raised_by(Component::SensorSampler)
}
