// Copyright Claudio Mattera 2025-2026.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Blocking display driver

use log::debug;

use embedded_hal::delay::DelayNs;

use crate::command;
use crate::color::Triplet;
use crate::interface::Interface;
use crate::state::BiasRatio;
use crate::state::ColorMode;
use crate::state::ColorPattern;
use crate::state::DisplayMode;
use crate::state::IncrementDirection;
use crate::state::IncrementOrder;
use crate::state::LineRate;
use crate::state::NlineLines;
use crate::state::PanelCapacitance;
use crate::state::PowerSource;
use crate::state::ScanSequence;
use crate::state::ShadeOption;
use crate::state::State;
use crate::state::TemperatureCompensation;
use crate::state::WindowMode;
use crate::Error;

/// A UC1698U display controller
///
/// The driver owns its bus interface exclusively and keeps a [`State`]
/// mirror of the chip configuration, updated in lock-step with every bus
/// write. Addressing and window parameters are passed through to the chip
/// unvalidated, matching the chip's own permissive behavior; out-of-range
/// values leave the chip in an unspecified state.
pub struct Display<BUS: Interface, DELAY: DelayNs> {
    /// Bus interface
    interface: BUS,

    /// Delay
    delay: DELAY,

    /// Mirrored controller state
    state: State,
}

impl<BUS, DELAY> Display<BUS, DELAY>
where
    BUS: Interface,
    DELAY: DelayNs,
{
    /// Create a new display
    #[must_use]
    pub fn new(interface: BUS, delay: DELAY) -> Self {
        Self {
            interface,
            delay,
            state: State::reset(),
        }
    }

    /// Get the mirrored controller state
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Initialize an ERC160160 panel
    ///
    /// Performs the full bring-up sequence: reset, power configuration,
    /// mapping, color mode, window programming and RAM clear. The display
    /// is left in sleep mode; call [`wake`](Self::wake) to turn it on.
    ///
    /// # Errors
    ///
    /// Returns an error if any command to the display fails
    pub fn initialize(&mut self) -> Result<(), Error> {
        debug!("Initialize display");

        self.delay.delay_ms(500);
        self.system_reset()?;
        self.delay.delay_ms(500);

        self.set_bias_ratio(BiasRatio::Ten)?;
        self.set_power_control(PowerSource::Internal, PanelCapacitance::Mid)?;
        self.set_temperature_compensation(TemperatureCompensation::Zero)?;
        self.set_vbias_potentiometer(0xbf)?;

        self.set_all_pixels_on(false)?;
        self.set_inverse_display(false)?;

        self.set_lcd_mapping_control(false, false, false)?;
        self.set_line_rate(LineRate::High)?;
        self.set_color_pattern(ColorPattern::RgbRgb)?;
        self.set_color_mode(ColorMode::Rgb64k)?;

        self.set_nline_inversion(NlineLines::Lines37, false, false)?;
        self.set_com_scan_function(ScanSequence::AebcdAebcd, false, ShadeOption::PwmOnSegOutput)?;

        self.set_window(37, 0, 90, 159, WindowMode::Inside)?;
        self.set_ram_address_control(
            true,
            IncrementOrder::ColumnFirst,
            IncrementDirection::Positive,
        )?;

        self.set_partial_display_control(false)?;
        self.set_com_end(159)?;
        self.set_partial_display_start(0)?;
        self.set_partial_display_end(159)?;

        self.fill(0)?;

        self.set_display_enable(false, DisplayMode::Shade32, false)?;

        debug!("Initialize display / Done");

        Ok(())
    }

    /// Wake the display, keeping its current mode
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn wake(&mut self) -> Result<(), Error> {
        self.set_display_enable(true, self.state.display_mode, self.state.green_enhance)
    }

    /// Put the display to sleep and return the inner hardware
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn release(mut self) -> Result<(BUS, DELAY), Error> {
        debug!("Release display");
        self.set_display_enable(false, self.state.display_mode, self.state.green_enhance)?;

        Ok((self.interface, self.delay))
    }

    /// Set the current address to the pixel `(x, y)`, relative to the
    /// window origin
    ///
    /// Three horizontal pixels share one column cell, so `x` is divided by
    /// three. Coordinates outside the programmed window are passed through
    /// unvalidated.
    ///
    /// # Errors
    ///
    /// Returns an error if any command cannot be written to the bus
    pub fn set_pixel_position(&mut self, x: u16, y: u16) -> Result<(), Error> {
        let (column, row) = self.pixel_address(x, y);
        self.set_column_address(column)?;
        self.set_row_address(row)?;

        Ok(())
    }

    /// Write one packed triplet at the current address
    ///
    /// The chip advances its own address pointer afterwards; the mirrored
    /// address keeps the last commanded value.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be written to the bus
    pub fn write_triplet(&mut self, triplet: Triplet) -> Result<(), Error> {
        self.interface.write_data(&triplet.to_bytes())
    }

    /// Write a single pixel, preserving the two other pixels of its cell
    ///
    /// This is the read-modify-write path: the cell is read back, the
    /// channel `x % 3` is replaced, and the cell is written again. Callers
    /// writing all three pixels of a cell should use
    /// [`write_triplet`](Self::write_triplet) and skip the read round-trip.
    ///
    /// # Errors
    ///
    /// Returns an error if any bus transfer fails
    pub fn write_pixel(&mut self, x: u16, y: u16, value: u8) -> Result<(), Error> {
        let (column, row) = self.pixel_address(x, y);
        self.set_column_address(column)?;
        self.set_row_address(row)?;

        // one leading dummy byte after switching to read mode
        let mut buffer = [0; 3];
        self.interface.read_data(&mut buffer)?;

        let mut triplet = Triplet::from_bytes([buffer[1], buffer[2]]);
        triplet.set_channel(x, value);

        // the read advanced the chip's address pointer
        self.set_row_address(row)?;
        self.set_column_address(column)?;
        self.write_triplet(triplet)?;

        Ok(())
    }

    /// Fill every cell of the programmed window with one value
    ///
    /// Iterates the window column-major to match the chip's auto-increment
    /// direction, with a single address set at the window origin.
    ///
    /// # Errors
    ///
    /// Returns an error if any bus transfer fails
    pub fn fill(&mut self, value: u8) -> Result<(), Error> {
        debug!("Fill window with {value}");

        let start_column = self.state.window_start_column;
        let end_column = self.state.window_end_column;
        let start_row = self.state.window_start_row;
        let end_row = self.state.window_end_row;
        let triplet = Triplet::splat(value);

        self.set_pixel_position(0, 0)?;
        for _column in start_column..=end_column {
            for _row in start_row..=end_row {
                self.write_triplet(triplet)?;
            }
        }

        debug!("Fill window / Done");

        Ok(())
    }

    /// Write a rectangular image block
    ///
    /// `data` holds one byte per pixel, row by row. Each row is written in
    /// groups of three pixels; if `width` is not a multiple of three the
    /// remainder of each row is silently dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if any bus transfer fails
    ///
    /// # Panics
    ///
    /// Panics if `data` is shorter than `width * height` bytes
    pub fn write_image(
        &mut self,
        data: &[u8],
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), Error> {
        debug!("Write {width}x{height} image block at ({x}, {y})");

        for row in 0..height {
            self.set_pixel_position(x, y + row)?;

            let start = usize::from(row) * usize::from(width);
            let end = start + usize::from(width);
            for chunk in data[start..end].chunks_exact(3) {
                self.write_triplet(Triplet::new(chunk[0], chunk[1], chunk[2]))?;
            }
        }

        debug!("Write image block / Done");

        Ok(())
    }

    /// Set the column address in cell units
    ///
    /// The 7-bit address is split over two commands, low nibble first.
    ///
    /// # Errors
    ///
    /// Returns an error if any command cannot be written to the bus
    pub fn set_column_address(&mut self, column: u8) -> Result<(), Error> {
        self.state.column_address = column & 0x7f;
        self.interface
            .write_command(&[command::COLUMN_ADDRESS_LSB | (column & 0x0f)])?;
        self.interface
            .write_command(&[command::COLUMN_ADDRESS_MSB | ((column >> 4) & 0x07)])?;

        Ok(())
    }

    /// Set the row address
    ///
    /// The 8-bit address is split over two commands, low nibble first.
    ///
    /// # Errors
    ///
    /// Returns an error if any command cannot be written to the bus
    pub fn set_row_address(&mut self, row: u8) -> Result<(), Error> {
        self.state.row_address = row;
        self.interface
            .write_command(&[command::ROW_ADDRESS_LSB | (row & 0x0f)])?;
        self.interface
            .write_command(&[command::ROW_ADDRESS_MSB | ((row >> 4) & 0x0f)])?;

        Ok(())
    }

    /// Set the temperature compensation coefficient
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_temperature_compensation(
        &mut self,
        compensation: TemperatureCompensation,
    ) -> Result<(), Error> {
        self.state.temperature_compensation = compensation;
        self.interface
            .write_command(&[command::TEMPERATURE_COMPENSATION | compensation.bits()])?;

        Ok(())
    }

    /// Set the power control options
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_power_control(
        &mut self,
        source: PowerSource,
        capacitance: PanelCapacitance,
    ) -> Result<(), Error> {
        self.state.power_source = source;
        self.state.panel_capacitance = capacitance;
        self.interface
            .write_command(&[command::POWER_CONTROL | (source.bits() << 1) | capacitance.bits()])?;

        Ok(())
    }

    /// Set the scroll line
    ///
    /// # Errors
    ///
    /// Returns an error if any command cannot be written to the bus
    pub fn set_scroll_line(&mut self, line: u8) -> Result<(), Error> {
        self.state.scroll_line = line;
        self.interface
            .write_command(&[command::SCROLL_LINE_LSB | (line & 0x0f)])?;
        self.interface
            .write_command(&[command::SCROLL_LINE_MSB | ((line >> 4) & 0x0f)])?;

        Ok(())
    }

    /// Set the V-bias potentiometer, which controls contrast
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_vbias_potentiometer(&mut self, value: u8) -> Result<(), Error> {
        self.state.vbias_potentiometer = value;
        self.interface
            .write_command(&[command::VBIAS_POTENTIOMETER, value])?;

        Ok(())
    }

    /// Enable or disable partial display
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_partial_display_control(&mut self, enabled: bool) -> Result<(), Error> {
        self.state.partial_display_enabled = enabled;
        self.interface
            .write_command(&[command::PARTIAL_DISPLAY_CONTROL | u8::from(enabled)])?;

        Ok(())
    }

    /// Set the RAM address auto-increment behavior
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_ram_address_control(
        &mut self,
        wrap: bool,
        order: IncrementOrder,
        direction: IncrementDirection,
    ) -> Result<(), Error> {
        self.state.auto_wrap = wrap;
        self.state.increment_order = order;
        self.state.increment_direction = direction;
        let bits = u8::from(wrap) | (order.bits() << 1) | (direction.bits() << 2);
        self.interface
            .write_command(&[command::RAM_ADDRESS_CONTROL | bits])?;

        Ok(())
    }

    /// Set the number of fixed lines on top and bottom, in units of two
    /// lines
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_fixed_lines(&mut self, top: u8, bottom: u8) -> Result<(), Error> {
        self.state.fixed_lines_top = top & 0x0f;
        self.state.fixed_lines_bottom = bottom & 0x0f;
        self.interface
            .write_command(&[command::FIXED_LINES, ((top & 0x0f) << 4) | (bottom & 0x0f)])?;

        Ok(())
    }

    /// Set the line rate
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_line_rate(&mut self, rate: LineRate) -> Result<(), Error> {
        self.state.line_rate = rate;
        self.interface
            .write_command(&[command::LINE_RATE | rate.bits()])?;

        Ok(())
    }

    /// Force all pixels on, regardless of RAM content
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_all_pixels_on(&mut self, enabled: bool) -> Result<(), Error> {
        self.state.all_pixels_on = enabled;
        self.interface
            .write_command(&[command::ALL_PIXELS_ON | u8::from(enabled)])?;

        Ok(())
    }

    /// Enable or disable pixel inversion
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_inverse_display(&mut self, enabled: bool) -> Result<(), Error> {
        self.state.inverse = enabled;
        self.interface
            .write_command(&[command::INVERSE_DISPLAY | u8::from(enabled)])?;

        Ok(())
    }

    /// Set sleep state, display mode and green enhance mode
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_display_enable(
        &mut self,
        awake: bool,
        mode: DisplayMode,
        green_enhance: bool,
    ) -> Result<(), Error> {
        // the register bit disables green enhance mode when set
        let green_enhance_bit = if green_enhance { 0 } else { 0b100 };
        let bits = green_enhance_bit | (mode.bits() << 1) | u8::from(awake);
        self.interface
            .write_command(&[command::DISPLAY_ENABLE | bits])?;

        if self.state.sleeping && awake {
            // wait for the inrush current pulse to settle
            self.delay.delay_ms(100);
        }

        self.state.sleeping = !awake;
        self.state.display_mode = mode;
        self.state.green_enhance = green_enhance;

        Ok(())
    }

    /// Set the LCD mapping control options
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_lcd_mapping_control(
        &mut self,
        fixed_lines_enabled: bool,
        mirror_x: bool,
        mirror_y: bool,
    ) -> Result<(), Error> {
        self.state.fixed_lines_enabled = fixed_lines_enabled;
        self.state.mirror_x = mirror_x;
        self.state.mirror_y = mirror_y;
        let bits =
            u8::from(fixed_lines_enabled) | (u8::from(mirror_x) << 1) | (u8::from(mirror_y) << 2);
        self.interface
            .write_command(&[command::LCD_MAPPING_CONTROL | bits])?;

        Ok(())
    }

    /// Set the N-line inversion options
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_nline_inversion(
        &mut self,
        lines: NlineLines,
        xor: bool,
        enabled: bool,
    ) -> Result<(), Error> {
        self.state.nline_lines = lines;
        self.state.nline_xor = xor;
        self.state.nline_enabled = enabled;
        let bits = lines.bits() | (u8::from(xor) << 3) | (u8::from(enabled) << 4);
        self.interface
            .write_command(&[command::NLINE_INVERSION, bits])?;

        Ok(())
    }

    /// Set the color filter stripe order
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_color_pattern(&mut self, pattern: ColorPattern) -> Result<(), Error> {
        self.state.color_pattern = pattern;
        self.interface
            .write_command(&[command::COLOR_PATTERN | pattern.bits()])?;

        Ok(())
    }

    /// Set the color mode
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_color_mode(&mut self, mode: ColorMode) -> Result<(), Error> {
        self.state.color_mode = mode;
        self.interface
            .write_command(&[command::COLOR_MODE | mode.bits()])?;

        Ok(())
    }

    /// Set the COM scan function options
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_com_scan_function(
        &mut self,
        sequence: ScanSequence,
        frc_enabled: bool,
        shade: ShadeOption,
    ) -> Result<(), Error> {
        self.state.scan_sequence = sequence;
        self.state.frc_enabled = frc_enabled;
        self.state.shade_option = shade;
        let bits = sequence.bits() | (u8::from(frc_enabled) << 1) | (shade.bits() << 2);
        self.interface
            .write_command(&[command::COM_SCAN_FUNCTION | bits])?;

        Ok(())
    }

    /// Reset the controller and the mirrored state
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn system_reset(&mut self) -> Result<(), Error> {
        self.state = State::reset();
        self.interface.write_command(&[command::SYSTEM_RESET])?;

        Ok(())
    }

    /// Issue a no-operation command
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn nop(&mut self) -> Result<(), Error> {
        self.interface.write_command(&[command::NOP])?;

        Ok(())
    }

    /// Set the LCD bias ratio
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_bias_ratio(&mut self, ratio: BiasRatio) -> Result<(), Error> {
        self.state.bias_ratio = ratio;
        self.interface
            .write_command(&[command::BIAS_RATIO | ratio.bits()])?;

        Ok(())
    }

    /// Set the last driven COM line
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_com_end(&mut self, last_line: u8) -> Result<(), Error> {
        // the datasheet claims a 7-bit operand, but all 8 bits are needed
        // to configure 160 COM lines
        self.state.com_end = last_line;
        self.interface.write_command(&[command::COM_END, last_line])?;

        Ok(())
    }

    /// Set the first line of the partial display area
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_partial_display_start(&mut self, line: u8) -> Result<(), Error> {
        self.state.partial_display_start = line;
        self.interface
            .write_command(&[command::PARTIAL_DISPLAY_START, line])?;

        Ok(())
    }

    /// Set the last line of the partial display area
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_partial_display_end(&mut self, line: u8) -> Result<(), Error> {
        self.state.partial_display_end = line;
        self.interface
            .write_command(&[command::PARTIAL_DISPLAY_END, line])?;

        Ok(())
    }

    /// Program the window and its mode
    ///
    /// No ordering check is performed; windows with `end < start` are
    /// passed through and leave the chip in an unspecified state.
    ///
    /// # Errors
    ///
    /// Returns an error if any command cannot be written to the bus
    pub fn set_window(
        &mut self,
        start_column: u8,
        start_row: u8,
        end_column: u8,
        end_row: u8,
        mode: WindowMode,
    ) -> Result<(), Error> {
        self.set_window_start_column(start_column)?;
        self.set_window_start_row(start_row)?;
        self.set_window_end_column(end_column)?;
        self.set_window_end_row(end_row)?;
        self.set_window_mode(mode)?;

        Ok(())
    }

    /// Set the first column of the window
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_window_start_column(&mut self, column: u8) -> Result<(), Error> {
        self.state.window_start_column = column & 0x7f;
        self.interface
            .write_command(&[command::WINDOW_START_COLUMN, column & 0x7f])?;

        Ok(())
    }

    /// Set the first row of the window
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_window_start_row(&mut self, row: u8) -> Result<(), Error> {
        self.state.window_start_row = row;
        self.interface
            .write_command(&[command::WINDOW_START_ROW, row])?;

        Ok(())
    }

    /// Set the last column of the window
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_window_end_column(&mut self, column: u8) -> Result<(), Error> {
        self.state.window_end_column = column & 0x7f;
        self.interface
            .write_command(&[command::WINDOW_END_COLUMN, column & 0x7f])?;

        Ok(())
    }

    /// Set the last row of the window
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_window_end_row(&mut self, row: u8) -> Result<(), Error> {
        self.state.window_end_row = row;
        self.interface
            .write_command(&[command::WINDOW_END_ROW, row])?;

        Ok(())
    }

    /// Set the window program mode
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be written to the bus
    pub fn set_window_mode(&mut self, mode: WindowMode) -> Result<(), Error> {
        self.state.window_mode = mode;
        self.interface
            .write_command(&[command::WINDOW_MODE | mode.bits()])?;

        Ok(())
    }

    /// Translate pixel coordinates to a cell column and row
    #[allow(clippy::cast_possible_truncation)]
    fn pixel_address(&self, x: u16, y: u16) -> (u8, u8) {
        let column = self.state.window_start_column.wrapping_add((x / 3) as u8);
        let row = self.state.window_start_row.wrapping_add(y as u8);
        (column, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;
    use std::vec;
    use std::vec::Vec;

    /// One recorded bus transaction
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Transaction {
        Command(Vec<u8>),
        Data(Vec<u8>),
        Read(usize),
    }

    /// Chip-side model behind the stub bus
    #[derive(Debug)]
    struct StubInner {
        transactions: Vec<Transaction>,
        ram: BTreeMap<(u8, u8), [u8; 2]>,
        column: u8,
        row: u8,
        window_start_column: u8,
        window_end_column: u8,
        window_start_row: u8,
        window_end_row: u8,
    }

    impl StubInner {
        fn new() -> Self {
            Self {
                transactions: Vec::new(),
                ram: BTreeMap::new(),
                column: 0,
                row: 0,
                window_start_column: 0,
                window_end_column: 127,
                window_start_row: 0,
                window_end_row: 159,
            }
        }

        fn apply_command(&mut self, bytes: &[u8]) {
            match *bytes {
                [opcode] => match opcode & 0xf0 {
                    0x00 => self.column = (self.column & 0x70) | (opcode & 0x0f),
                    0x10 => self.column = (self.column & 0x0f) | ((opcode & 0x07) << 4),
                    0x60 => self.row = (self.row & 0xf0) | (opcode & 0x0f),
                    0x70 => self.row = (self.row & 0x0f) | ((opcode & 0x0f) << 4),
                    _ => {}
                },
                [command::WINDOW_START_COLUMN, value] => self.window_start_column = value,
                [command::WINDOW_START_ROW, value] => self.window_start_row = value,
                [command::WINDOW_END_COLUMN, value] => self.window_end_column = value,
                [command::WINDOW_END_ROW, value] => self.window_end_row = value,
                _ => {}
            }
        }

        /// Advance the address pointer the way the chip does in its default
        /// column-first configuration: down the column, then to the next one
        fn advance(&mut self) {
            if self.row >= self.window_end_row {
                self.row = self.window_start_row;
                self.column = if self.column >= self.window_end_column {
                    self.window_start_column
                } else {
                    self.column + 1
                };
            } else {
                self.row += 1;
            }
        }
    }

    /// A stub bus recording transactions and emulating chip RAM
    #[derive(Clone)]
    struct BusStub {
        inner: Rc<RefCell<StubInner>>,
    }

    impl BusStub {
        fn new() -> Self {
            Self {
                inner: Rc::new(RefCell::new(StubInner::new())),
            }
        }

        fn split(&self) -> Self {
            self.clone()
        }

        fn transactions(&self) -> Vec<Transaction> {
            self.inner.borrow().transactions.clone()
        }

        fn clear_transactions(&self) {
            self.inner.borrow_mut().transactions.clear();
        }

        fn cell(&self, column: u8, row: u8) -> [u8; 2] {
            self.inner
                .borrow()
                .ram
                .get(&(column, row))
                .copied()
                .unwrap_or([0, 0])
        }

        fn preload(&self, column: u8, row: u8, bytes: [u8; 2]) {
            self.inner.borrow_mut().ram.insert((column, row), bytes);
        }

        fn ram_snapshot(&self) -> BTreeMap<(u8, u8), [u8; 2]> {
            self.inner.borrow().ram.clone()
        }
    }

    impl Interface for BusStub {
        fn write_command(&mut self, bytes: &[u8]) -> Result<(), Error> {
            let mut inner = self.inner.borrow_mut();
            inner.transactions.push(Transaction::Command(bytes.to_vec()));
            inner.apply_command(bytes);
            Ok(())
        }

        fn write_data(&mut self, bytes: &[u8]) -> Result<(), Error> {
            let mut inner = self.inner.borrow_mut();
            inner.transactions.push(Transaction::Data(bytes.to_vec()));
            if let [first, second] = *bytes {
                let address = (inner.column, inner.row);
                inner.ram.insert(address, [first, second]);
                inner.advance();
            }
            Ok(())
        }

        fn read_data(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
            let mut inner = self.inner.borrow_mut();
            inner.transactions.push(Transaction::Read(buffer.len()));
            let cell = inner
                .ram
                .get(&(inner.column, inner.row))
                .copied()
                .unwrap_or([0, 0]);
            buffer[0] = 0;
            buffer[1] = cell[0];
            buffer[2] = cell[1];
            inner.advance();
            Ok(())
        }
    }

    /// Delay that returns immediately
    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn make_display() -> (Display<BusStub, NoopDelay>, BusStub) {
        let stub = BusStub::new();
        let display = Display::new(stub.split(), NoopDelay);
        (display, stub)
    }

    #[test]
    fn pixel_position_mirrors_window_offset() {
        let (mut display, stub) = make_display();

        for x in 0..384 {
            for y in 0..160 {
                display.set_pixel_position(x, y).unwrap();
                assert_eq!(u16::from(display.state().column_address), x / 3);
                assert_eq!(u16::from(display.state().row_address), y);
            }
            stub.clear_transactions();
        }
    }

    #[test]
    fn pixel_position_is_relative_to_window_origin() {
        let (mut display, stub) = make_display();
        display.set_window(37, 5, 90, 100, WindowMode::Inside).unwrap();
        stub.clear_transactions();

        display.set_pixel_position(10, 20).unwrap();
        assert_eq!(display.state().column_address, 40);
        assert_eq!(display.state().row_address, 25);
        assert_eq!(
            stub.transactions(),
            vec![
                Transaction::Command(vec![0x08]),
                Transaction::Command(vec![0x12]),
                Transaction::Command(vec![0x69]),
                Transaction::Command(vec![0x71]),
            ]
        );
    }

    #[test]
    fn window_commands_update_mirror_and_bus() {
        let (mut display, stub) = make_display();
        display.set_window(37, 0, 90, 159, WindowMode::Outside).unwrap();

        assert_eq!(display.state().window_start_column, 37);
        assert_eq!(display.state().window_start_row, 0);
        assert_eq!(display.state().window_end_column, 90);
        assert_eq!(display.state().window_end_row, 159);
        assert_eq!(display.state().window_mode, WindowMode::Outside);
        assert_eq!(
            stub.transactions(),
            vec![
                Transaction::Command(vec![0xf4, 37]),
                Transaction::Command(vec![0xf5, 0]),
                Transaction::Command(vec![0xf6, 90]),
                Transaction::Command(vec![0xf7, 159]),
                Transaction::Command(vec![0xf9]),
            ]
        );
    }

    #[test]
    fn window_then_triplet_issues_expected_byte_sequence() {
        let (mut display, stub) = make_display();
        display.set_window(37, 0, 90, 159, WindowMode::Inside).unwrap();
        stub.clear_transactions();

        display.set_pixel_position(0, 0).unwrap();
        display.write_triplet(Triplet::new(16, 20, 16)).unwrap();

        assert_eq!(
            stub.transactions(),
            vec![
                Transaction::Command(vec![0x05]),
                Transaction::Command(vec![0x12]),
                Transaction::Command(vec![0x60]),
                Transaction::Command(vec![0x70]),
                Transaction::Data(vec![0x82, 0x90]),
            ]
        );
        assert_eq!(display.state().column_address, 37);
        assert_eq!(display.state().row_address, 0);
    }

    #[test]
    fn single_pixel_write_preserves_other_channels() {
        let (mut display, stub) = make_display();
        stub.preload(1, 7, Triplet::new(5, 10, 15).to_bytes());

        display.write_pixel(4, 7, 63).unwrap();

        assert_eq!(
            Triplet::from_bytes(stub.cell(1, 7)),
            Triplet::new(5, 63, 15)
        );
        assert!(stub.transactions().contains(&Transaction::Read(3)));
    }

    #[test]
    fn single_pixel_write_restores_address_before_writing() {
        let (mut display, stub) = make_display();
        stub.preload(0, 0, Triplet::new(1, 2, 3).to_bytes());

        display.write_pixel(0, 0, 31).unwrap();

        // the cell at the original address was rewritten, not its neighbor
        assert_eq!(
            Triplet::from_bytes(stub.cell(0, 0)),
            Triplet::new(31, 2, 3)
        );
        assert_eq!(stub.cell(0, 1), [0, 0]);
    }

    #[test]
    fn fill_is_idempotent_and_covers_the_window() {
        let (mut display, stub) = make_display();
        display.set_window(2, 3, 4, 6, WindowMode::Inside).unwrap();

        display.fill(9).unwrap();
        let first = stub.ram_snapshot();

        display.fill(9).unwrap();
        assert_eq!(stub.ram_snapshot(), first);

        assert_eq!(first.len(), 3 * 4);
        for ((column, row), bytes) in first {
            assert!((2..=4).contains(&column));
            assert!((3..=6).contains(&row));
            assert_eq!(bytes, Triplet::splat(9).to_bytes());
        }
    }

    #[test]
    fn image_block_drops_width_remainder() {
        let (mut display, stub) = make_display();
        let data: Vec<u8> = (0..8).collect();

        display.write_image(&data, 0, 0, 4, 2).unwrap();

        let data_writes = stub
            .transactions()
            .iter()
            .filter(|transaction| matches!(transaction, Transaction::Data(_)))
            .count();
        assert_eq!(data_writes, 2);
        assert_eq!(stub.cell(0, 0), Triplet::new(0, 1, 2).to_bytes());
        assert_eq!(stub.cell(0, 1), Triplet::new(4, 5, 6).to_bytes());
    }

    #[test]
    fn system_reset_restores_mirror_defaults() {
        let (mut display, stub) = make_display();
        display.set_window(10, 20, 30, 40, WindowMode::Outside).unwrap();
        display.set_column_address(12).unwrap();
        display.set_vbias_potentiometer(0xbf).unwrap();

        display.system_reset().unwrap();

        assert_eq!(*display.state(), State::reset());
        assert_eq!(
            stub.transactions().last().unwrap(),
            &Transaction::Command(vec![0xe2])
        );
    }

    #[test]
    fn display_enable_packs_its_bitmask() {
        let (mut display, stub) = make_display();
        display
            .set_display_enable(true, DisplayMode::Shade32, false)
            .unwrap();

        assert_eq!(
            stub.transactions(),
            vec![Transaction::Command(vec![0xaf])]
        );
        assert!(!display.state().sleeping);
        assert_eq!(display.state().display_mode, DisplayMode::Shade32);
        assert!(!display.state().green_enhance);
    }

    #[test]
    fn register_commands_update_mirror() {
        let (mut display, stub) = make_display();

        display.set_vbias_potentiometer(0xbf).unwrap();
        assert_eq!(display.state().vbias_potentiometer, 0xbf);

        display
            .set_ram_address_control(false, IncrementOrder::RowFirst, IncrementDirection::Negative)
            .unwrap();
        assert!(!display.state().auto_wrap);
        assert_eq!(display.state().increment_order, IncrementOrder::RowFirst);
        assert_eq!(
            display.state().increment_direction,
            IncrementDirection::Negative
        );

        display.set_color_mode(ColorMode::Normal4k).unwrap();
        assert_eq!(display.state().color_mode, ColorMode::Normal4k);

        assert_eq!(
            stub.transactions(),
            vec![
                Transaction::Command(vec![0x81, 0xbf]),
                Transaction::Command(vec![0x8e]),
                Transaction::Command(vec![0xd5]),
            ]
        );
    }

    #[test]
    fn scroll_line_is_split_over_two_nibbles() {
        let (mut display, stub) = make_display();
        display.set_scroll_line(0xab).unwrap();

        assert_eq!(display.state().scroll_line, 0xab);
        assert_eq!(
            stub.transactions(),
            vec![
                Transaction::Command(vec![0x4b]),
                Transaction::Command(vec![0x5a]),
            ]
        );
    }

    #[test]
    fn initialization_programs_the_panel() {
        let (mut display, stub) = make_display();
        display.initialize().unwrap();

        let state = display.state();
        assert_eq!(state.bias_ratio, BiasRatio::Ten);
        assert_eq!(state.vbias_potentiometer, 0xbf);
        assert_eq!(state.color_mode, ColorMode::Rgb64k);
        assert_eq!(state.window_start_column, 37);
        assert_eq!(state.window_end_column, 90);
        assert!(state.sleeping);

        // the RAM clear covered the whole programmed window
        let cells = stub.ram_snapshot();
        assert_eq!(cells.len(), (90 - 37 + 1) * 160);
        assert!(cells.values().all(|bytes| *bytes == [0, 0]));
    }
}
