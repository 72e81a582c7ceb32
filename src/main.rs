use and_gates_tb::{
    create_and_gates_model, create_and_gates_runtime, run_suite, AndGates, Backend,
    TestbenchConfig,
};
use eyre::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = TestbenchConfig::from_env()?;
    println!("AND gate testbench starting ({:?} backend)", config.backend);

    let report = match config.backend {
        Backend::Model => run_suite(|| Ok(AndGates::new()), &config).await?,
        Backend::Verilator => {
            let runtime = create_and_gates_runtime(&config)?;
            run_suite(|| create_and_gates_model(&runtime), &config).await?
        }
    };

    for outcome in &report.outcomes {
        let status = if outcome.passed() { "PASS" } else { "FAIL" };
        println!("{status}  {:<40} {:>8} ns", outcome.case.name(), outcome.sim_time_ns);
    }

    if !report.all_passed() {
        return Err(eyre::eyre!("{} of {} tests failed", report.failed(), report.outcomes.len()));
    }
    println!("All tests passed!");
    Ok(())
}
