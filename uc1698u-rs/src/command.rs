// Copyright Claudio Mattera 2025-2026.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Commands
//!
//! Opcode prefixes for the UC1698U command set. Commands whose operand is
//! carried in the opcode byte itself are stored here as prefixes and OR-ed
//! with the operand bits; the remaining commands take one or more operand
//! bytes after the opcode.

/// Command prefix for setting the column address, low nibble
pub const COLUMN_ADDRESS_LSB: u8 = 0b0000_0000;

/// Command prefix for setting the column address, high bits
pub const COLUMN_ADDRESS_MSB: u8 = 0b0001_0000;

/// Command prefix for setting temperature compensation
pub const TEMPERATURE_COMPENSATION: u8 = 0b0010_0100;

/// Command prefix for setting power control
pub const POWER_CONTROL: u8 = 0b0010_1000;

/// Command prefix for setting the scroll line, low nibble
pub const SCROLL_LINE_LSB: u8 = 0b0100_0000;

/// Command prefix for setting the scroll line, high nibble
pub const SCROLL_LINE_MSB: u8 = 0b0101_0000;

/// Command prefix for setting the row address, low nibble
pub const ROW_ADDRESS_LSB: u8 = 0b0110_0000;

/// Command prefix for setting the row address, high nibble
pub const ROW_ADDRESS_MSB: u8 = 0b0111_0000;

/// Command for setting the V-bias potentiometer
pub const VBIAS_POTENTIOMETER: u8 = 0b1000_0001;

/// Command prefix for setting partial display control
pub const PARTIAL_DISPLAY_CONTROL: u8 = 0b1000_0100;

/// Command prefix for setting RAM address control
pub const RAM_ADDRESS_CONTROL: u8 = 0b1000_1000;

/// Command for setting fixed lines
pub const FIXED_LINES: u8 = 0b1001_0000;

/// Command prefix for setting the line rate
pub const LINE_RATE: u8 = 0b1010_0000;

/// Command prefix for turning all pixels on
pub const ALL_PIXELS_ON: u8 = 0b1010_0100;

/// Command prefix for setting inverse display
pub const INVERSE_DISPLAY: u8 = 0b1010_0110;

/// Command prefix for setting display enable
pub const DISPLAY_ENABLE: u8 = 0b1010_1000;

/// Command prefix for setting LCD mapping control
pub const LCD_MAPPING_CONTROL: u8 = 0b1100_0000;

/// Command for setting N-line inversion
pub const NLINE_INVERSION: u8 = 0b1100_1000;

/// Command prefix for setting the color pattern
pub const COLOR_PATTERN: u8 = 0b1101_0000;

/// Command prefix for setting the color mode
pub const COLOR_MODE: u8 = 0b1101_0100;

/// Command prefix for setting the COM scan function
pub const COM_SCAN_FUNCTION: u8 = 0b1101_1000;

/// Command for system reset
pub const SYSTEM_RESET: u8 = 0b1110_0010;

/// Command for no operation
pub const NOP: u8 = 0b1110_0011;

/// Command prefix for setting the LCD bias ratio
pub const BIAS_RATIO: u8 = 0b1110_1000;

/// Command for setting the COM end line
pub const COM_END: u8 = 0b1111_0001;

/// Command for setting the partial display start line
pub const PARTIAL_DISPLAY_START: u8 = 0b1111_0010;

/// Command for setting the partial display end line
pub const PARTIAL_DISPLAY_END: u8 = 0b1111_0011;

/// Command for setting the window program start column
pub const WINDOW_START_COLUMN: u8 = 0b1111_0100;

/// Command for setting the window program start row
pub const WINDOW_START_ROW: u8 = 0b1111_0101;

/// Command for setting the window program end column
pub const WINDOW_END_COLUMN: u8 = 0b1111_0110;

/// Command for setting the window program end row
pub const WINDOW_END_ROW: u8 = 0b1111_0111;

/// Command prefix for setting the window program mode
pub const WINDOW_MODE: u8 = 0b1111_1000;
