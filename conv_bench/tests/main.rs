use aok::{OK, Void};
use bench_probe::Reporter;
use conv_bench::{ConvConf, Error, Kind, SETUP, Target, run};
use log::info;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_run_float() -> Void {
  let conf = ConvConf::default().with_n(10_000).with_seed(3);
  let mut rep = Reporter::new(Vec::new());
  let report = run(&conf, &mut rep)?;

  let targets: Vec<Target> = report.targets.iter().map(|t| t.target).collect();
  assert_eq!(targets, Target::ALL);

  let out = String::from_utf8(rep.into_inner())?;
  let lines: Vec<&str> = out.lines().collect();
  assert!(lines[0].starts_with("\tMemory increase: "));
  assert_eq!(lines[1], "Created array with size: 10,000 and type Float64");
  assert_eq!(lines[2], "Testing arrow:");
  assert!(lines[3].starts_with("\tMemory increase: "));
  assert!(lines[4].starts_with("\tConversion time from arrow to arrow:\t"));
  assert!(lines[4].ends_with(" seconds"));
  assert_eq!(lines.len(), 2 + 4 * 3);
  assert_eq!(lines[11], "Testing dense:");

  info!("{}", sonic_rs::to_string(&report)?);
  OK
}

#[test]
fn test_run_int() -> Void {
  let conf = ConvConf::default().with_n(1000).with_kind(Kind::Int);
  let mut rep = Reporter::new(Vec::new());
  run(&conf, &mut rep)?;
  let out = String::from_utf8(rep.into_inner())?;
  assert!(out.contains("Created array with size: 1,000 and type Int64"));
  OK
}

#[test]
fn test_empty_column_fails() {
  let conf = ConvConf::default().with_n(0);
  let mut rep = Reporter::new(Vec::new());
  let res = run(&conf, &mut rep);
  assert!(matches!(res, Err(Error::EmptyResult(SETUP))));
  // Fails before any line is printed
  // 在打印任何行之前失败
  assert!(rep.into_inner().is_empty());
}
