#![cfg_attr(docsrs, feature(doc_cfg))]

//! Time and memory cost of converting an Arrow column to other in-memory forms
//! Arrow 列转换为其他内存形式的时间与内存开销

mod column;
mod conf;
mod convert;
mod error;
mod runner;

pub use column::{Column, setup};
pub use conf::{ARRAY_SIZE, ConvConf, Kind, SEED};
pub use convert::{Converted, Fill, Target, convert};
pub use error::{Error, Result};
pub use runner::{ConvReport, SETUP, TargetReport, run};
