use bench_probe::Reporter;
use log::debug;
use shelf_bench::{BenchConf, Result, run};

fn main() -> Result<()> {
  log_init::init();
  let rt = compio::runtime::Runtime::new()?;
  rt.block_on(async {
    let conf = BenchConf::default();
    let mut rep = Reporter::stdout();
    let report = run(&conf, &mut rep).await?;
    debug!("{}", sonic_rs::to_string(&report)?);
    Ok(())
  })
}
