use camino::Utf8Path;
use eyre::Result;
use marlin::{
    verilator::{VerilatorRuntime, VerilatorRuntimeOptions},
    verilog::prelude::*,
};

use crate::config::TestbenchConfig;
use crate::pins::TinyTapeoutPins;

pub const RTL_TOP: &str = "rtl/tt_um_and_gates.v";

// Tiny Tapeout top level wrapping the five AND gates
#[verilog(src = "rtl/tt_um_and_gates.v", name = "tt_um_and_gates")]
pub struct AndGatesTop;

pub fn create_and_gates_runtime(config: &TestbenchConfig) -> Result<VerilatorRuntime> {
    let include_paths = [Utf8Path::new("rtl")];
    let src_files = [Utf8Path::new(RTL_TOP)];

    log::debug!("verilating {} into {}", RTL_TOP, config.artifacts_dir);

    VerilatorRuntime::new(
        config.artifacts_dir.as_path(),
        &src_files,
        &include_paths,
        [],
        VerilatorRuntimeOptions::default_logging(),
    )
    .map_err(|e| eyre::eyre!("Failed to create runtime: {}", e))
}

pub fn create_and_gates_model(runtime: &VerilatorRuntime) -> Result<AndGatesTop<'_>> {
    runtime
        .create_model_simple::<AndGatesTop>()
        .map_err(|e| eyre::eyre!("Failed to create and-gates model: {:?}", e))
}

impl TinyTapeoutPins for AndGatesTop<'_> {
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
        self.eval();
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
