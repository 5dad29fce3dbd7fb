//! Geometry of the clock-face time picker.
//!
//! Angles are in degrees measured clockwise from 12 o'clock. Offsets are in
//! screen space: `x` grows to the right and `y` grows downwards.

use crate::clock::ClockTime;

/// Distance from the face centre to the marks when nothing is configured.
pub const DEFAULT_RADIUS: f64 = 90.0;

const SLOTS: u8 = 12;
const DEGREES_PER_SLOT: f64 = 30.0;

/// Which part of the time the dial is currently picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialMode {
    Hours,
    Minutes,
}

/// One selectable number around the face.
#[derive(Debug, Clone, PartialEq)]
pub struct DialMark {
    /// Position around the face, 1 (one o'clock) through 12.
    pub slot: u8,
    /// Hour (1-12) or minute (0, 5, ..., 55) this mark selects.
    pub value: u8,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// Rotation of the indicator hand for the current selection.
pub fn hand_angle(mode: DialMode, time: &ClockTime) -> f64 {
    match mode {
        DialMode::Hours => f64::from(time.hour12() % 12) * 30.0,
        DialMode::Minutes => f64::from(time.minute()) * 6.0,
    }
}

/// Offset from the face centre of a point `radius` away at clock angle `angle`.
pub fn polar_offset(angle: f64, radius: f64) -> (f64, f64) {
    let rad = (angle - 90.0).to_radians();
    (radius * rad.cos(), radius * rad.sin())
}

/// Value selected by `slot` in the given mode.
pub fn slot_value(mode: DialMode, slot: u8) -> u8 {
    match mode {
        DialMode::Hours => slot,
        DialMode::Minutes if slot == SLOTS => 0,
        DialMode::Minutes => slot * 5,
    }
}

/// The 12 marks around the face, slot 1 first.
pub fn dial_marks(mode: DialMode, radius: f64) -> Vec<DialMark> {
    (1..=SLOTS)
        .map(|slot| {
            let value = slot_value(mode, slot);
            let label = match mode {
                DialMode::Hours => value.to_string(),
                DialMode::Minutes => format!("{:02}", value),
            };
            let (x, y) = polar_offset(f64::from(slot) * DEGREES_PER_SLOT, radius);
            DialMark { slot, value, label, x, y }
        })
        .collect()
}

pub fn is_selected(mark: &DialMark, mode: DialMode, time: &ClockTime) -> bool {
    match mode {
        DialMode::Hours => time.hour12() == mark.value,
        DialMode::Minutes => time.minute() == mark.value,
    }
}

/// Slot the current selection sits on, or the nearest one before it for
/// minutes that are not a multiple of five.
pub fn current_slot(mode: DialMode, time: &ClockTime) -> u8 {
    match mode {
        DialMode::Hours => time.hour12(),
        DialMode::Minutes => match time.minute() / 5 {
            0 => SLOTS,
            n => n,
        },
    }
}

/// Slot reached by moving `steps` positions clockwise (negative for
/// counter-clockwise), wrapping around the face.
pub fn step_slot(slot: u8, steps: i32) -> u8 {
    let zero_based = (i32::from(slot) - 1 + steps).rem_euclid(i32::from(SLOTS));
    // rem_euclid keeps this in 0..12
    zero_based as u8 + 1
}
