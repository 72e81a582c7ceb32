use eyre::Result;
use log::{error, info};

use crate::config::TestbenchConfig;
use crate::pins::TinyTapeoutPins;
use crate::simulator::Simulator;
use crate::verifier::GateVerifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCase {
    AndGates,
    ComprehensiveAndCombinations,
}

impl TestCase {
    pub const ALL: [TestCase; 2] = [TestCase::AndGates, TestCase::ComprehensiveAndCombinations];

    pub fn name(self) -> &'static str {
        match self {
            TestCase::AndGates => "test_and_gates",
            TestCase::ComprehensiveAndCombinations => "test_comprehensive_and_combinations",
        }
    }
}

#[derive(Debug)]
pub struct CaseOutcome {
    pub case: TestCase,
    pub sim_time_ns: u64,
    pub error: Option<eyre::Report>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Run one case against a freshly created design.
///
/// Only an invalid `config` is returned as an error; a failing check is recorded in the outcome.
pub async fn run_case<D: TinyTapeoutPins>(
    dut: D,
    case: TestCase,
    config: &TestbenchConfig,
) -> Result<CaseOutcome> {
    config.validate()?;
    let sim = Simulator::new(dut, config.clock_period_ns);
    let verifier = GateVerifier::new(&sim, config);

    info!("running {}", case.name());
    let result = sim
        .run(async {
            match case {
                TestCase::AndGates => verifier.test_and_gates().await,
                TestCase::ComprehensiveAndCombinations => {
                    verifier.test_comprehensive_and_combinations().await
                }
            }
        })
        .await;

    let sim_time_ns = sim.now_ns();
    match &result {
        Ok(()) => info!("{} passed ({} ns simulated)", case.name(), sim_time_ns),
        Err(e) => error!("{} failed at {} ns: {:#}", case.name(), sim_time_ns, e),
    }

    Ok(CaseOutcome {
        case,
        sim_time_ns,
        error: result.err(),
    })
}

/// Run every [`TestCase`] in order, each on its own instance from `make_dut`.
pub async fn run_suite<D, F>(mut make_dut: F, config: &TestbenchConfig) -> Result<SuiteReport>
where
    D: TinyTapeoutPins,
    F: FnMut() -> Result<D>,
{
    config.validate()?;
    let mut report = SuiteReport::default();
    for case in TestCase::ALL {
        let dut = make_dut()?;
        report.outcomes.push(run_case(dut, case, config).await?);
    }

    info!(
        "{} tests: {} passed, {} failed",
        report.outcomes.len(),
        report.passed(),
        report.failed()
    );
    Ok(report)
}
