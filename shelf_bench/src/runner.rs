// Benchmark run
// 基准测试运行

use std::io::Write;

use bench_probe::{Reporter, fmt_count};
use log::{debug, info};
use serde::Serialize;
use shelf::{Mode, Shelf};

use crate::{
  BenchConf, Result,
  driver::{fill, run_trials},
  phase::{Op, Phase, State},
};

/// Result of one phase / 单个阶段的结果
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
  pub phase: Phase,
  pub mode: &'static str,
  pub op: Op,
  /// Seconds per trial / 每次试验的秒数
  pub secs: Vec<f64>,
}

/// Result of a full run / 完整运行的结果
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub conf: BenchConf,
  pub phases: Vec<PhaseReport>,
}

/// Initialize the shelf, then run every phase in order
///
/// Any error aborts the run, no partial report is returned.
/// 初始化存储后按顺序运行所有阶段，任何错误都会中止运行，不返回部分结果。
pub async fn run<W: Write>(conf: &BenchConf, rep: &mut Reporter<W>) -> Result<RunReport> {
  compio::fs::create_dir_all(&conf.dir).await?;
  let path = conf.path();
  rep.announce(format_args!(
    "Benchmarking for {} iterations",
    fmt_count(conf.iter)
  ));

  let mut phases = Vec::with_capacity(Phase::ALL.len());
  let mut state = State::Uninitialized;
  loop {
    match state {
      State::Uninitialized => {
        rep.announce("Initializing shelf");
        let mut sh = Shelf::open(&path, Mode::Create, &conf.shelf).await?;
        fill(&mut sh, conf.iter).await?;
        sh.close().await?;
      }
      State::Initialized => {}
      State::Running(phase) => {
        rep.announce(phase.label());
        let mode = phase.mode();
        let mut sh = Shelf::open(&path, mode, &conf.shelf).await?;
        let durs = run_trials(&mut sh, phase.op(), conf.iter, conf.trials, rep).await?;
        sh.close().await?;
        phases.push(PhaseReport {
          phase,
          mode: mode.name(),
          op: phase.op(),
          secs: durs.iter().map(|d| d.as_secs_f64()).collect(),
        });
      }
      State::Done => break,
    }
    let next = state.next();
    debug!("{state:?} -> {next:?}");
    state = next;
  }

  info!("{}: {} phases done", path.display(), phases.len());
  Ok(RunReport {
    conf: conf.clone(),
    phases,
  })
}
