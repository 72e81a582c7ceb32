pub mod config;
pub mod error;
pub mod pins;
pub mod simulator;
pub mod suite;
pub mod verifier;
pub mod verilated;

pub use config::{Backend, TestbenchConfig};
pub use error::Mismatch;
pub use pins::{AndGates, TinyTapeoutPins};
pub use simulator::{PinOutputs, Simulator};
pub use suite::{run_case, run_suite, CaseOutcome, SuiteReport, TestCase};
pub use verifier::{Gate, GateVerifier, PAIR_GATES, UNUSED_OUTPUTS, WIDE_GATE};
pub use verilated::{create_and_gates_model, create_and_gates_runtime, AndGatesTop};
