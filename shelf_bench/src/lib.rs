#![cfg_attr(docsrs, feature(doc_cfg))]

//! Read/write throughput of shelf under each open mode
//! shelf 各打开模式下的读写吞吐基准

mod conf;
pub mod driver;
mod error;
pub mod phase;
mod runner;

pub use conf::{BenchConf, DATA_DIR, NUM_ITER, NUM_TRIALS, SHELF_NAME};
pub use error::{Error, Result};
pub use phase::{Op, Phase, State};
pub use runner::{PhaseReport, RunReport, run};
