//! LED indicator output action
//!
//! Drives two status LEDs: one lit while a device is attached, one lit
//! while any pad is held. Any
//! `embedded-hal` digital output works; pin errors are ignored because
//! an indicator has no meaningful fallback.

use crate::keyboard::PadHandler;

use embedded_hal::digital::OutputPin;

/// Two-LED [`PadHandler`]: an attachment indicator and a pad indicator
pub struct PadLed<A: OutputPin, P: OutputPin> {
    attach_led: A,
    pad_led: P,
}

impl<A: OutputPin, P: OutputPin> PadLed<A, P> {
    /// Wrap the attachment and pad indicator pins, both driven high
    /// when active
    pub fn new(attach_led: A, pad_led: P) -> Self {
        Self { attach_led, pad_led }
    }

    /// Give the pins back, for example on shutdown
    pub fn release(self) -> (A, P) {
        (self.attach_led, self.pad_led)
    }
}

impl<A: OutputPin, P: OutputPin> PadHandler for PadLed<A, P> {
    fn pad_pressed(&mut self, _note: u8, _velocity: u8) {
        self.pad_led.set_high().ok();
    }

    fn pad_released(&mut self, _note: u8) {
        self.pad_led.set_low().ok();
    }

    fn device_attached(&mut self) {
        self.attach_led.set_high().ok();
    }

    fn device_detached(&mut self) {
        self.attach_led.set_low().ok();
        self.pad_led.set_low().ok();
    }
}
