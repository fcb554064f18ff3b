// Benchmark probes: timer, memory delta, reporter
// 基准测试探针：计时器、内存变化、报告器

#![cfg_attr(docsrs, feature(doc_cfg))]

mod fmt;
mod mem;
mod report;
mod timer;

pub use fmt::{fmt_count, fmt_mem};
pub use mem::{MemBaseline, Measured, measure, process_mem};
pub use report::Reporter;
pub use timer::Timer;
