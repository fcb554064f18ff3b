// Conversion benchmark run
// 转换基准测试运行

use std::io::Write;

use arrow::array::PrimitiveArray;
use bench_probe::{Measured, Reporter, fmt_count, measure};
use log::debug;
use serde::Serialize;

use crate::{
  Column, ConvConf, Error, Result,
  column::setup,
  convert::{Fill, Target, convert},
};

/// Name reported when the source column is empty
/// 源列为空时报告的名称
pub const SETUP: &str = "setup";

/// Cost of one conversion / 单次转换的开销
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
  pub target: Target,
  pub secs: f64,
  /// Resident memory change in bytes / 常驻内存变化（字节）
  pub mem_delta: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvReport {
  pub conf: ConvConf,
  pub setup_mem_delta: i64,
  pub targets: Vec<TargetReport>,
}

/// Build the source column, then convert it to every target in order
/// 生成源列，然后依次转换为每个目标
pub fn run<W: Write>(conf: &ConvConf, rep: &mut Reporter<W>) -> Result<ConvReport> {
  let Measured {
    val: col, mem_delta, ..
  } = measure(|| setup(conf.n, conf.kind, conf.seed));
  if col.is_empty() {
    return Err(Error::EmptyResult(SETUP));
  }
  rep.report_mem(mem_delta);
  rep.line(format_args!(
    "Created array with size: {} and type {}",
    fmt_count(col.len() as u64),
    col.data_type()
  ));

  let targets = match &col {
    Column::Float(arr) => run_targets(arr, rep)?,
    Column::Int(arr) => run_targets(arr, rep)?,
  };
  Ok(ConvReport {
    conf: conf.clone(),
    setup_mem_delta: mem_delta,
    targets,
  })
}

fn run_targets<T: Fill, W: Write>(
  arr: &PrimitiveArray<T>,
  rep: &mut Reporter<W>,
) -> Result<Vec<TargetReport>> {
  let mut out = Vec::with_capacity(Target::ALL.len());
  for target in Target::ALL {
    rep.announce(format_args!("Testing {}:", target.name()));
    let m = measure(|| convert(target, arr));
    let (secs, mem_delta) = (m.secs(), m.mem_delta);
    let converted = m.val?;
    rep.report_mem(mem_delta);
    rep.line(format_args!(
      "\tConversion time from arrow to {}:\t{secs:.4} seconds",
      target.name()
    ));
    debug!("{}: {} values", target.name(), converted.len());
    // Released before the next target is measured
    // 在测量下一个目标前释放
    drop(converted);
    out.push(TargetReport {
      target,
      secs,
      mem_delta,
    });
  }
  Ok(out)
}
