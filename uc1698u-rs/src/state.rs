// Copyright Claudio Mattera 2025-2026.
//
// Distributed under the MIT License or the Apache 2.0 License at your option.
// See the accompanying files LICENSE-MIT.txt and LICENSE-APACHE-2.0.txt, or
// online at
// https://opensource.org/licenses/MIT
// https://opensource.org/licenses/Apache-2.0

//! Mirrored controller state
//!
//! The UC1698U offers no way to read its configuration registers back, so
//! the driver keeps an in-memory mirror of every value the chip has been
//! commanded to adopt. The mirror is updated in lock-step with each bus
//! write and is what the addressing layer uses to compute offsets.

/// Temperature compensation coefficient
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TemperatureCompensation {
    /// 0.00 % per degree
    Zero,

    /// -0.05 % per degree
    Minus0p05,

    /// -0.15 % per degree
    Minus0p15,

    /// -0.25 % per degree
    Minus0p25,
}

impl TemperatureCompensation {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Zero => 0b00,
            Self::Minus0p05 => 0b01,
            Self::Minus0p15 => 0b10,
            Self::Minus0p25 => 0b11,
        }
    }
}

/// Source of the LCD driving voltages
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PowerSource {
    /// External VLCD source
    External,

    /// Internal charge pump
    Internal,
}

impl PowerSource {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::External => 0b0,
            Self::Internal => 0b1,
        }
    }
}

/// Capacitance of the attached LCD panel
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PanelCapacitance {
    /// Panel load up to 13 nF
    Low,

    /// Panel load between 13 nF and 22 nF
    Mid,
}

impl PanelCapacitance {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Low => 0b0,
            Self::Mid => 0b1,
        }
    }
}

/// Line rate
///
/// The resulting rate in kilo-lines per second depends on the display mode:
/// 25.2, 30.5, 37.0 or 44.8 in 32-shade mode, 8.2, 10.4, 12.6 or 15.2 in
/// on-off mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineRate {
    /// Lowest rate
    Lowest,

    /// Second lowest rate
    Low,

    /// Second highest rate
    High,

    /// Highest rate
    Highest,
}

impl LineRate {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Lowest => 0b00,
            Self::Low => 0b01,
            Self::High => 0b10,
            Self::Highest => 0b11,
        }
    }
}

/// Display mode
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DisplayMode {
    /// 1-bit on-off mode
    OnOff,

    /// 32-shade grayscale mode
    Shade32,
}

impl DisplayMode {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::OnOff => 0b0,
            Self::Shade32 => 0b1,
        }
    }
}

/// Order of the RGB color filter stripes on the panel
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColorPattern {
    /// BGR-BGR stripe order
    BgrBgr,

    /// RGB-RGB stripe order
    RgbRgb,
}

impl ColorPattern {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::BgrBgr => 0b0,
            Self::RgbRgb => 0b1,
        }
    }
}

/// Color mode
///
/// The register value `0b10` selects 64K color mode on both enhancement
/// paths, so `Rgb64k` covers what the datasheet lists separately as
/// "normal 64K" and "green-enhanced 64K". The two 4K modes do differ in
/// value and in channel widths, and are kept as distinct variants.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColorMode {
    /// 4K colors, 4R-4G-4B, green-enhance path
    GreenEnhanced4k,

    /// 4K colors, 4R-5G-3B
    Normal4k,

    /// 64K colors, 5R-6G-5B
    Rgb64k,
}

impl ColorMode {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::GreenEnhanced4k => 0b00,
            Self::Normal4k => 0b01,
            Self::Rgb64k => 0b10,
        }
    }
}

/// Number of lines per N-line inversion block
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NlineLines {
    /// 11 lines
    Lines11,

    /// 19 lines
    Lines19,

    /// 21 lines
    Lines21,

    /// 25 lines
    Lines25,

    /// 29 lines
    Lines29,

    /// 31 lines
    Lines31,

    /// 37 lines
    Lines37,

    /// 43 lines
    Lines43,
}

impl NlineLines {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Lines11 => 0b000,
            Self::Lines19 => 0b001,
            Self::Lines21 => 0b010,
            Self::Lines25 => 0b011,
            Self::Lines29 => 0b100,
            Self::Lines31 => 0b101,
            Self::Lines37 => 0b110,
            Self::Lines43 => 0b111,
        }
    }
}

/// COM scan sequence in low-resolution mode
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScanSequence {
    /// AEBCD-AEBCD sequence
    AebcdAebcd,

    /// AEBCD-EBCDA sequence
    AebcdEbcda,
}

impl ScanSequence {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::AebcdAebcd => 0b0,
            Self::AebcdEbcda => 0b1,
        }
    }
}

/// Gray shade generation option
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ShadeOption {
    /// Dither on input data
    DitherOnInput,

    /// PWM on segment output
    PwmOnSegOutput,
}

impl ShadeOption {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::DitherOnInput => 0b0,
            Self::PwmOnSegOutput => 0b1,
        }
    }
}

/// Which address advances first during auto-increment
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IncrementOrder {
    /// Column address first
    ColumnFirst,

    /// Row address first
    RowFirst,
}

impl IncrementOrder {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::ColumnFirst => 0b0,
            Self::RowFirst => 0b1,
        }
    }
}

/// Direction of row address auto-increment
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IncrementDirection {
    /// Row address increases
    Positive,

    /// Row address decreases
    Negative,
}

impl IncrementDirection {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Positive => 0b0,
            Self::Negative => 0b1,
        }
    }
}

/// LCD bias ratio
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BiasRatio {
    /// 1/5 bias
    Five,

    /// 1/10 bias
    Ten,

    /// 1/11 bias
    Eleven,

    /// 1/12 bias
    Twelve,
}

impl BiasRatio {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Five => 0b00,
            Self::Ten => 0b01,
            Self::Eleven => 0b10,
            Self::Twelve => 0b11,
        }
    }
}

/// Window program mode
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WindowMode {
    /// Auto-incrementing writes stay inside the window
    Inside,

    /// Auto-incrementing writes skip the window
    Outside,
}

impl WindowMode {
    /// Register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Inside => 0b0,
            Self::Outside => 0b1,
        }
    }
}

/// Mirror of the controller configuration
///
/// Field defaults match the register values after a system reset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct State {
    /// Current column address in cell units (0–127)
    pub column_address: u8,

    /// Current row address (0–159)
    pub row_address: u8,

    /// Whether the display is sleeping
    pub sleeping: bool,

    /// Display mode
    pub display_mode: DisplayMode,

    /// Whether green enhance mode is enabled
    pub green_enhance: bool,

    /// Whether pixel inversion is enabled
    pub inverse: bool,

    /// Whether all pixels are forced on
    pub all_pixels_on: bool,

    /// Whether the panel is mirrored along X
    pub mirror_x: bool,

    /// Whether the panel is mirrored along Y
    pub mirror_y: bool,

    /// Whether fixed lines are enabled
    pub fixed_lines_enabled: bool,

    /// N-line inversion block length
    pub nline_lines: NlineLines,

    /// Whether N-line inversion is XOR-ed with the frame signal
    pub nline_xor: bool,

    /// Whether N-line inversion is enabled
    pub nline_enabled: bool,

    /// Color filter stripe order
    pub color_pattern: ColorPattern,

    /// Color mode
    pub color_mode: ColorMode,

    /// Temperature compensation coefficient
    pub temperature_compensation: TemperatureCompensation,

    /// Fixed lines on top, in units of two lines
    pub fixed_lines_top: u8,

    /// Fixed lines on bottom, in units of two lines
    pub fixed_lines_bottom: u8,

    /// LCD voltage source
    pub power_source: PowerSource,

    /// Panel capacitance range
    pub panel_capacitance: PanelCapacitance,

    /// Line rate
    pub line_rate: LineRate,

    /// Whether partial display is enabled
    pub partial_display_enabled: bool,

    /// COM scan sequence
    pub scan_sequence: ScanSequence,

    /// Whether frame rate control is enabled
    pub frc_enabled: bool,

    /// Gray shade generation option
    pub shade_option: ShadeOption,

    /// Scroll line
    pub scroll_line: u8,

    /// V-bias potentiometer value, controls contrast
    pub vbias_potentiometer: u8,

    /// Whether the address wraps around at the window edge
    pub auto_wrap: bool,

    /// Auto-increment order
    pub increment_order: IncrementOrder,

    /// Auto-increment direction for the row address
    pub increment_direction: IncrementDirection,

    /// LCD bias ratio
    pub bias_ratio: BiasRatio,

    /// First line of the partial display area
    pub partial_display_start: u8,

    /// Last line of the partial display area
    pub partial_display_end: u8,

    /// Last COM line (number of driven lines minus one)
    pub com_end: u8,

    /// First column of the programmed window (0–127)
    pub window_start_column: u8,

    /// Last column of the programmed window (0–127)
    pub window_end_column: u8,

    /// First row of the programmed window (0–159)
    pub window_start_row: u8,

    /// Last row of the programmed window (0–159)
    pub window_end_row: u8,

    /// Window program mode
    pub window_mode: WindowMode,
}

impl State {
    /// Create a mirror with the post-reset register values
    #[must_use]
    pub const fn reset() -> Self {
        Self {
            column_address: 0,
            row_address: 0,
            sleeping: true,
            display_mode: DisplayMode::Shade32,
            green_enhance: false,
            inverse: false,
            all_pixels_on: false,
            mirror_x: false,
            mirror_y: false,
            fixed_lines_enabled: false,
            nline_lines: NlineLines::Lines31,
            nline_xor: true,
            nline_enabled: true,
            color_pattern: ColorPattern::RgbRgb,
            color_mode: ColorMode::Rgb64k,
            temperature_compensation: TemperatureCompensation::Zero,
            fixed_lines_top: 0,
            fixed_lines_bottom: 0,
            power_source: PowerSource::Internal,
            panel_capacitance: PanelCapacitance::Low,
            line_rate: LineRate::Lowest,
            partial_display_enabled: false,
            scan_sequence: ScanSequence::AebcdAebcd,
            frc_enabled: false,
            shade_option: ShadeOption::PwmOnSegOutput,
            scroll_line: 0,
            vbias_potentiometer: 0x40,
            auto_wrap: true,
            increment_order: IncrementOrder::ColumnFirst,
            increment_direction: IncrementDirection::Positive,
            bias_ratio: BiasRatio::Twelve,
            partial_display_start: 0,
            partial_display_end: 159,
            com_end: 159,
            window_start_column: 0,
            window_end_column: 127,
            window_start_row: 0,
            window_end_row: 159,
            window_mode: WindowMode::Inside,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::reset()
    }
}
