// Workload driver
// 负载驱动

use std::{fmt::Write as _, hint::black_box, io::Write, time::Duration};

use bench_probe::{Reporter, Timer};
use log::debug;
use shelf::Shelf;

use crate::{Result, phase::Op};

/// Decimal key of index i / 索引 i 的十进制键
#[inline]
pub fn key_of(i: u64, buf: &mut String) {
  buf.clear();
  let _ = write!(buf, "{i}");
}

/// Value stored under key i: decimal of 2*i
/// 键 i 对应的值：2*i 的十进制
#[inline]
pub fn val_of(i: u64, buf: &mut String) {
  buf.clear();
  let _ = write!(buf, "{}", i * 2);
}

/// Untimed write pass over "0".."n-1"
/// 对 "0".."n-1" 执行不计时的写入
pub async fn fill(sh: &mut Shelf, n: u64) -> Result<()> {
  let mut key = String::new();
  let mut val = String::new();
  for i in 0..n {
    key_of(i, &mut key);
    val_of(i, &mut val);
    sh.set(&key, &val).await?;
  }
  debug!("filled {n} keys");
  Ok(())
}

/// Run `trials` timed passes of n operations, one duration per pass
/// 运行 `trials` 次计时遍历，每次 n 个操作，每次返回一个耗时
pub async fn run_trials<W: Write>(
  sh: &mut Shelf,
  op: Op,
  n: u64,
  trials: u32,
  rep: &mut Reporter<W>,
) -> Result<Vec<Duration>> {
  let mut key = String::new();
  let mut val = String::new();
  let mut out = Vec::with_capacity(trials as usize);

  for run in 1..=trials {
    rep.trial(run, trials);
    let timer = Timer::start();
    match op {
      Op::Read => {
        for i in 0..n {
          key_of(i, &mut key);
          black_box(sh.get(&key).await?);
        }
      }
      Op::Write => {
        for i in 0..n {
          key_of(i, &mut key);
          val_of(i, &mut val);
          sh.set(&key, &val).await?;
        }
      }
    }
    let elapsed = timer.stop();
    rep.report_duration(elapsed.as_secs_f64());
    out.push(elapsed);
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_key_val() {
    let mut buf = String::from("stale");
    key_of(41, &mut buf);
    assert_eq!(buf, "41");
    val_of(41, &mut buf);
    assert_eq!(buf, "82");
    val_of(0, &mut buf);
    assert_eq!(buf, "0");
  }
}
