//! Samples every button once per tick and reports confirmed presses.
//!
//! Buttons are wired active-low with pull-ups, so a low level is a
//! press.  A failed pin read is indistinguishable from "released" and is
//! treated as such.

use embedded_hal::digital::InputPin;
use heapless::Vec;

use crate::debounce::{Debouncer, Edge};
use crate::keymap::Button;

/// One physical input and its debounce state.
pub struct InputLine<P> {
    pin: P,
    button: Button,
    index: u8,
    debouncer: Debouncer,
}

impl<P: InputPin> InputLine<P> {
    pub fn new(pin: P, button: Button, index: u8, debounce_ms: u64) -> Self {
        Self {
            pin,
            button,
            index,
            debouncer: Debouncer::new(debounce_ms),
        }
    }

    pub fn button(&self) -> Button {
        self.button
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn is_pressed(&self) -> bool {
        self.debouncer.is_pressed()
    }

    fn sample(&mut self, now_ms: u64) -> Option<Edge> {
        let raw = self.pin.is_low().unwrap_or(false);
        self.debouncer.update(raw, now_ms)
    }
}

/// Owns all input lines.
pub struct InputPoller<P, const N: usize> {
    lines: [InputLine<P>; N],
    releases: u32,
}

impl<P: InputPin, const N: usize> InputPoller<P, N> {
    pub fn new(lines: [InputLine<P>; N]) -> Self {
        Self { lines, releases: 0 }
    }

    /// Sample every line at `now_ms` and return the buttons whose press
    /// was confirmed on this tick, in line order.
    pub fn poll(&mut self, now_ms: u64) -> Vec<Button, N> {
        let mut pressed = Vec::new();
        for line in self.lines.iter_mut() {
            match line.sample(now_ms) {
                Some(Edge::Pressed) => {
                    // Capacity is N and each line pushes at most once.
                    let _ = pressed.push(line.button);
                }
                Some(Edge::Released) => self.releases = self.releases.wrapping_add(1),
                None => {}
            }
        }
        pressed
    }

    /// Buttons currently held (debounced).
    pub fn pressed_buttons(&self) -> Vec<Button, N> {
        self.lines
            .iter()
            .filter(|line| line.is_pressed())
            .map(|line| line.button)
            .collect()
    }

    /// Confirmed releases since boot.  Releases produce no output.
    pub fn release_count(&self) -> u32 {
        self.releases
    }

    pub fn lines(&self) -> &[InputLine<P>; N] {
        &self.lines
    }

    /// Tear down and hand the pins back.
    pub fn into_pins(self) -> [P; N] {
        self.lines.map(|line| line.pin)
    }
}
