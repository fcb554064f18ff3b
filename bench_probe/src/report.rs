// Human readable progress reporter
// 可读进度报告器

use std::{
  fmt::{Arguments, Display},
  io::{self, Write},
};

use crate::fmt_mem;

/// Line reporter owned by the entry point and passed down
///
/// Write errors are ignored, reporting never fails.
/// 由入口创建并向下传递的行报告器，忽略写入错误，报告永不失败。
pub struct Reporter<W: Write = io::Stdout> {
  out: W,
}

impl Reporter<io::Stdout> {
  pub fn stdout() -> Self {
    Self::new(io::stdout())
  }
}

impl<W: Write> Reporter<W> {
  pub fn new(out: W) -> Self {
    Self { out }
  }

  /// Print a line before a phase begins
  /// 阶段开始前打印一行
  pub fn announce(&mut self, label: impl Display) {
    self.line(format_args!("{label}"));
  }

  /// Trial progress, 1-based
  /// 试验进度，从 1 开始
  pub fn trial(&mut self, run: u32, total: u32) {
    self.line(format_args!("\tRun {run}/{total}"));
  }

  /// Elapsed seconds of one trial, 4 decimals
  /// 单次试验耗时（秒），4 位小数
  pub fn report_duration(&mut self, secs: f64) {
    self.line(format_args!("\t{secs:.4} s"));
  }

  pub fn report_mem(&mut self, delta: i64) {
    self.line(format_args!("\tMemory increase: {}", fmt_mem(delta)));
  }

  pub fn line(&mut self, args: Arguments<'_>) {
    let _ = self.out.write_fmt(args);
    let _ = self.out.write_all(b"\n");
    let _ = self.out.flush();
  }

  pub fn into_inner(self) -> W {
    self.out
  }
}
