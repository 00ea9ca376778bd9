// Copyright Claudio Mattera 2025-2026.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Interface to UltraChip UC1698U LCD controllers over an 8080 parallel bus

#![no_std]

#[cfg(test)]
extern crate std;

mod blocking;
pub use self::blocking::Display;

mod color;
pub use self::color::Triplet;

mod command;

mod error;
pub use self::error::Error;

mod interface;
pub use self::interface::Interface;
pub use self::interface::Parallel8080;

mod state;
pub use self::state::BiasRatio;
pub use self::state::ColorMode;
pub use self::state::ColorPattern;
pub use self::state::DisplayMode;
pub use self::state::IncrementDirection;
pub use self::state::IncrementOrder;
pub use self::state::LineRate;
pub use self::state::NlineLines;
pub use self::state::PanelCapacitance;
pub use self::state::PowerSource;
pub use self::state::ScanSequence;
pub use self::state::ShadeOption;
pub use self::state::State;
pub use self::state::TemperatureCompensation;
pub use self::state::WindowMode;
