// Copyright Claudio Mattera 2025-2026.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Bus transport
//!
//! The driver talks to the chip through the [`Interface`] trait, which
//! exposes the three primitives of the 8080-style bus: a command burst, a
//! data burst, and a data read. [`Parallel8080`] implements the trait on
//! top of `embedded-hal` digital pins.

use log::log_enabled;
use log::trace;
use log::Level::Trace;

use embedded_hal::digital::InputPin;
use embedded_hal::digital::OutputPin;

use crate::Error;

/// Transport to a UC1698U over its bus
///
/// Implementations must bracket every burst with chip select asserted for
/// the whole burst and released afterwards, also when a transfer fails.
pub trait Interface {
    /// Write a burst of command bytes
    ///
    /// # Errors
    ///
    /// Returns an error if driving the bus fails.
    fn write_command(&mut self, bytes: &[u8]) -> Result<(), Error>;

    /// Write a burst of data bytes
    ///
    /// # Errors
    ///
    /// Returns an error if driving the bus fails.
    fn write_data(&mut self, bytes: &[u8]) -> Result<(), Error>;

    /// Read data bytes into `buffer`
    ///
    /// The first byte the chip returns after switching to read mode is a
    /// protocol dummy; callers must account for it in the buffer length.
    ///
    /// # Errors
    ///
    /// Returns an error if driving or sampling the bus fails.
    fn read_data(&mut self, buffer: &mut [u8]) -> Result<(), Error>;
}

/// An 8080-style parallel bus made of digital pins
///
/// Writes strobe the write pin with a rising edge per byte; reads strobe
/// the read pin and then sample the data lines. The data pins must be
/// bidirectional, which the trait bounds express as `InputPin + OutputPin`.
pub struct Parallel8080<CS, CD, WR, RD, D> {
    /// Chip select pin, active low
    cs: CS,

    /// Command (low) / data (high) select pin
    cd: CD,

    /// Write strobe pin
    wr: WR,

    /// Read strobe pin
    rd: RD,

    /// Data bus pins, least significant bit first
    data: [D; 8],
}

impl<CS, CD, WR, RD, D> Parallel8080<CS, CD, WR, RD, D>
where
    CS: OutputPin,
    CD: OutputPin,
    WR: OutputPin,
    RD: OutputPin,
    D: InputPin + OutputPin,
{
    /// Create a new bus from its pins
    ///
    /// All pins must already be configured as outputs, with chip select and
    /// both strobes high.
    #[must_use]
    pub fn new(cs: CS, cd: CD, wr: WR, rd: RD, data: [D; 8]) -> Self {
        Self {
            cs,
            cd,
            wr,
            rd,
            data,
        }
    }

    /// Release the bus and return its pins
    #[must_use]
    pub fn release(self) -> (CS, CD, WR, RD, [D; 8]) {
        (self.cs, self.cd, self.wr, self.rd, self.data)
    }

    /// Assert chip select
    ///
    /// # Errors
    ///
    /// Returns an error if setting the pin fails.
    fn select(&mut self) -> Result<(), Error> {
        self.cs.set_low().map_err(Error::from_digital)
    }

    /// Release chip select
    ///
    /// # Errors
    ///
    /// Returns an error if setting the pin fails.
    fn deselect(&mut self) -> Result<(), Error> {
        self.cs.set_high().map_err(Error::from_digital)
    }

    /// Write a burst with chip select held for its duration
    ///
    /// Chip select is released also when a byte transfer fails, so a
    /// failure cannot leave the bus claimed.
    ///
    /// # Errors
    ///
    /// Returns an error if setting any pin fails.
    fn write_burst(&mut self, is_data: bool, bytes: &[u8]) -> Result<(), Error> {
        if log_enabled!(Trace) {
            trace!("Write {} bytes to bus (data: {is_data})", bytes.len());
        }

        self.select()?;
        let written = self.write_selected(is_data, bytes);
        let released = self.deselect();
        written.and(released)
    }

    /// Write burst body, with chip select already asserted
    ///
    /// # Errors
    ///
    /// Returns an error if setting any pin fails.
    fn write_selected(&mut self, is_data: bool, bytes: &[u8]) -> Result<(), Error> {
        if is_data {
            self.cd.set_high().map_err(Error::from_digital)?;
        } else {
            self.cd.set_low().map_err(Error::from_digital)?;
        }

        for &byte in bytes {
            for (bit, pin) in self.data.iter_mut().enumerate() {
                if byte & (1 << bit) == 0 {
                    pin.set_low().map_err(Error::from_digital)?;
                } else {
                    pin.set_high().map_err(Error::from_digital)?;
                }
            }

            self.wr.set_low().map_err(Error::from_digital)?;
            self.wr.set_high().map_err(Error::from_digital)?;
        }

        Ok(())
    }

    /// Read burst body, with chip select already asserted
    ///
    /// # Errors
    ///
    /// Returns an error if setting or sampling any pin fails.
    fn read_selected(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        self.cd.set_high().map_err(Error::from_digital)?;

        for slot in buffer.iter_mut() {
            self.rd.set_low().map_err(Error::from_digital)?;
            self.rd.set_high().map_err(Error::from_digital)?;

            let mut byte = 0;
            for (bit, pin) in self.data.iter_mut().enumerate() {
                if pin.is_high().map_err(Error::from_digital)? {
                    byte |= 1 << bit;
                }
            }
            *slot = byte;
        }

        Ok(())
    }
}

impl<CS, CD, WR, RD, D> Interface for Parallel8080<CS, CD, WR, RD, D>
where
    CS: OutputPin,
    CD: OutputPin,
    WR: OutputPin,
    RD: OutputPin,
    D: InputPin + OutputPin,
{
    fn write_command(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.write_burst(false, bytes)
    }

    fn write_data(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.write_burst(true, bytes)
    }

    fn read_data(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        if log_enabled!(Trace) {
            trace!("Read {} bytes from bus", buffer.len());
        }

        self.select()?;
        let read = self.read_selected(buffer);
        let released = self.deselect();
        read.and(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use embedded_hal::digital::Error as DigitalError;
    use embedded_hal::digital::ErrorKind;
    use embedded_hal::digital::ErrorType;

    /// Error type for test pins
    #[derive(Debug)]
    struct TestPinError;

    impl DigitalError for TestPinError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// A pin recording all level changes into a shared log
    #[derive(Clone)]
    struct TestPin {
        name: &'static str,
        level: Rc<Cell<bool>>,
        fail_writes: bool,
        log: Rc<RefCell<Vec<(&'static str, bool)>>>,
    }

    impl TestPin {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<(&'static str, bool)>>>) -> Self {
            Self {
                name,
                level: Rc::new(Cell::new(true)),
                fail_writes: false,
                log: Rc::clone(log),
            }
        }
    }

    impl ErrorType for TestPin {
        type Error = TestPinError;
    }

    impl OutputPin for TestPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            if self.fail_writes {
                return Err(TestPinError);
            }
            self.level.set(false);
            self.log.borrow_mut().push((self.name, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            if self.fail_writes {
                return Err(TestPinError);
            }
            self.level.set(true);
            self.log.borrow_mut().push((self.name, true));
            Ok(())
        }
    }

    impl InputPin for TestPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.level.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.level.get())
        }
    }

    /// Data pin names, least significant bit first
    const DATA_NAMES: [&str; 8] = ["d0", "d1", "d2", "d3", "d4", "d5", "d6", "d7"];

    type TestBus = Parallel8080<TestPin, TestPin, TestPin, TestPin, TestPin>;

    fn make_bus() -> (TestBus, Rc<RefCell<Vec<(&'static str, bool)>>>, [TestPin; 8]) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let data = DATA_NAMES.map(|name| TestPin::new(name, &log));
        let bus = Parallel8080::new(
            TestPin::new("cs", &log),
            TestPin::new("cd", &log),
            TestPin::new("wr", &log),
            TestPin::new("rd", &log),
            data.clone(),
        );
        (bus, log, data)
    }

    #[test]
    fn command_burst_is_chip_select_bracketed() {
        let (mut bus, log, _data) = make_bus();
        bus.write_command(&[0xa5]).unwrap();

        let log = log.borrow();
        assert_eq!(*log.first().unwrap(), ("cs", false));
        assert_eq!(*log.last().unwrap(), ("cs", true));

        // command mode selected before the strobe
        let cd_position = log.iter().position(|event| *event == ("cd", false)).unwrap();
        let wr_position = log.iter().position(|event| *event == ("wr", false)).unwrap();
        assert!(cd_position < wr_position);

        // data lines carry the byte, least significant bit first
        let data_levels: Vec<bool> = log
            .iter()
            .filter(|(name, _)| name.starts_with('d'))
            .map(|(_, level)| *level)
            .collect();
        let expected: Vec<bool> = (0..8).map(|bit| 0xa5_u8 & (1 << bit) != 0).collect();
        assert_eq!(data_levels, expected);
    }

    #[test]
    fn data_burst_strobes_once_per_byte() {
        let (mut bus, log, _data) = make_bus();
        bus.write_data(&[0x12, 0x34, 0x56]).unwrap();

        let log = log.borrow();
        let strobes = log.iter().filter(|event| **event == ("wr", false)).count();
        assert_eq!(strobes, 3);
        assert!(log.contains(&("cd", true)));
    }

    #[test]
    fn chip_select_is_released_on_write_failure() {
        let (mut bus, log, _data) = make_bus();
        bus.wr.fail_writes = true;

        let result = bus.write_command(&[0x00]);
        assert_eq!(result, Err(Error::Digital(ErrorKind::Other)));

        let log = log.borrow();
        assert_eq!(*log.last().unwrap(), ("cs", true));
    }

    #[test]
    fn read_samples_data_lines() {
        let (mut bus, log, data) = make_bus();
        for (bit, pin) in data.iter().enumerate() {
            pin.level.set(0x5a_u8 & (1 << bit) != 0);
        }

        let mut buffer = [0; 2];
        bus.read_data(&mut buffer).unwrap();
        assert_eq!(buffer, [0x5a, 0x5a]);

        let log = log.borrow();
        assert_eq!(*log.first().unwrap(), ("cs", false));
        assert_eq!(*log.last().unwrap(), ("cs", true));
        let strobes = log.iter().filter(|event| **event == ("rd", false)).count();
        assert_eq!(strobes, 2);
    }
}
