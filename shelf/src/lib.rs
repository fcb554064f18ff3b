#![cfg_attr(docsrs, feature(doc_cfg))]

//! # shelf - Persistent string key-value shelf
//! 持久化字符串键值存储
//!
//! Append-only CRC-checked log with an in-memory key index.
//! 仅追加、带 CRC 校验的日志，配合内存键索引。
//!
//! ## Modes / 模式
//!
//! | Mode            | Writes                                  |
//! |-----------------|-----------------------------------------|
//! | Create          | replace file, append per set            |
//! | ReadOnly        | rejected with `ReadOnlyViolation`       |
//! | WriteThrough    | append per set                          |
//! | WriteBackCached | memory only until `sync` / `close`      |

mod compact;
mod conf;
mod error;
mod fs;
mod load;
mod lock;
mod mode;
pub mod record;
mod shelf;

pub use compact::need_compact;
pub use conf::{Conf, DEFAULT_COMPACT_MIN};
pub use error::{Error, Result};
pub use fs::add_ext;
pub use load::{Index, Loc, Scan, scan};
pub use mode::Mode;
pub use shelf::{LOCK_EXT, Shelf};
