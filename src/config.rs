use std::str::FromStr;

use camino::Utf8PathBuf;
use eyre::{eyre, Result, WrapErr};

/// Which simulator backs the circuit under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `rtl/tt_um_and_gates.v` verilated through marlin.
    Verilator,
    /// The pure-Rust [`crate::AndGates`] model.
    Model,
}

impl FromStr for Backend {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verilator" => Ok(Backend::Verilator),
            "model" => Ok(Backend::Model),
            other => Err(eyre!("unknown backend `{other}` (expected `verilator` or `model`)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestbenchConfig {
    pub backend: Backend,
    /// Full clock period; each phase lasts half of it, kept in picoseconds.
    pub clock_period_ns: u64,
    /// Sweep all 256 inputs of the 8-input gate instead of its three corners.
    pub exhaustive_wide_gate: bool,
    /// Where marlin puts the verilated build.
    pub artifacts_dir: Utf8PathBuf,
}

impl Default for TestbenchConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Verilator,
            clock_period_ns: 10,
            exhaustive_wide_gate: false,
            artifacts_dir: Utf8PathBuf::from("artifacts"),
        }
    }
}

impl TestbenchConfig {
    pub const BACKEND_VAR: &'static str = "AND_GATES_BACKEND";
    pub const CLOCK_PERIOD_VAR: &'static str = "AND_GATES_CLOCK_PERIOD_NS";
    pub const EXHAUSTIVE_VAR: &'static str = "AND_GATES_EXHAUSTIVE_WIDE_GATE";
    pub const ARTIFACTS_VAR: &'static str = "AND_GATES_ARTIFACTS";

    /// Defaults overridden by whichever `AND_GATES_*` variables are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::BACKEND_VAR) {
            config.backend = value
                .parse()
                .wrap_err_with(|| format!("invalid {}", Self::BACKEND_VAR))?;
        }
        if let Some(value) = lookup(Self::CLOCK_PERIOD_VAR) {
            config.clock_period_ns = value
                .trim()
                .parse()
                .wrap_err_with(|| format!("invalid {}: `{value}`", Self::CLOCK_PERIOD_VAR))?;
        }
        if let Some(value) = lookup(Self::EXHAUSTIVE_VAR) {
            config.exhaustive_wide_gate = parse_flag(&value)
                .ok_or_else(|| eyre!("invalid {}: `{value}`", Self::EXHAUSTIVE_VAR))?;
        }
        if let Some(value) = lookup(Self::ARTIFACTS_VAR) {
            config.artifacts_dir = Utf8PathBuf::from(value);
        }

        config.validate()?;
        Ok(config)
    }

    /// Longest period whose picosecond value still fits in a `u64`.
    pub const MAX_CLOCK_PERIOD_NS: u64 = u64::MAX / 1_000;

    pub fn validate(&self) -> Result<()> {
        if self.clock_period_ns == 0 || self.clock_period_ns > Self::MAX_CLOCK_PERIOD_NS {
            return Err(eyre!(
                "clock period must be between 1 and {} ns, got {}",
                Self::MAX_CLOCK_PERIOD_NS,
                self.clock_period_ns
            ));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
