//! Pin-level view of a Tiny Tapeout user project, and a behavioral model of the AND-gate design.

/// The fixed I/O interface every Tiny Tapeout project exposes.
///
/// Setters only latch the new level; nothing propagates until [`TinyTapeoutPins::settle`]
/// evaluates the design.
pub trait TinyTapeoutPins {
    fn set_clk(&mut self, level: u8);
    fn set_rst_n(&mut self, level: u8);
    fn set_ena(&mut self, level: u8);
    fn set_ui_in(&mut self, value: u8);
    fn set_uio_in(&mut self, value: u8);

    /// Evaluate the design after an input change.
    fn settle(&mut self);

    fn uo_out(&self) -> u8;
    fn uio_out(&self) -> u8;
    fn uio_oe(&self) -> u8;
}

/// Pure-Rust model of `rtl/tt_um_and_gates.v`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndGates {
    pub clk: u8,
    pub rst_n: u8,
    pub ena: u8,
    pub ui_in: u8,
    pub uio_in: u8,
    pub uo_out: u8,
    pub uio_out: u8,
    pub uio_oe: u8,
}

impl AndGates {
    pub fn new() -> Self {
        Self::default()
    }

    /// The combinational function of the design.
    pub fn compute(ui_in: u8) -> u8 {
        let pair = |shift: u8| ((ui_in >> shift) & (ui_in >> (shift + 1)) & 1) << (shift / 2);
        let wide = u8::from(ui_in == 0xFF) << 4;
        pair(0) | pair(2) | pair(4) | pair(6) | wide
    }
}

impl TinyTapeoutPins for AndGates {
    fn set_clk(&mut self, level: u8) {
        self.clk = level;
    }

    fn set_rst_n(&mut self, level: u8) {
        self.rst_n = level;
    }

    fn set_ena(&mut self, level: u8) {
        self.ena = level;
    }

    fn set_ui_in(&mut self, value: u8) {
        self.ui_in = value;
    }

    fn set_uio_in(&mut self, value: u8) {
        self.uio_in = value;
    }

    fn settle(&mut self) {
        // ena, clk, rst_n and uio_in are tied off in the RTL
        self.uo_out = Self::compute(self.ui_in);
        self.uio_out = 0;
        self.uio_oe = 0;
    }

    fn uo_out(&self) -> u8 {
        self.uo_out
    }

    fn uio_out(&self) -> u8 {
        self.uio_out
    }

    fn uio_oe(&self) -> u8 {
        self.uio_oe
    }
}
