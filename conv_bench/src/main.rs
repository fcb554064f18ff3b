use bench_probe::Reporter;
use conv_bench::{ConvConf, Result, run};
use log::debug;

fn main() -> Result<()> {
  log_init::init();
  let mut rep = Reporter::stdout();
  let report = run(&ConvConf::default(), &mut rep)?;
  debug!("{}", sonic_rs::to_string(&report)?);
  Ok(())
}
