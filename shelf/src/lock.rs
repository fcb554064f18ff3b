//! Writer lock / 写锁
//!
//! Exclusive lock on `<name>.lock`, one writer per shelf.
//! Readers never take it, so they may read while a writer holds it.
//! 在 `<name>.lock` 上加排他锁，每个存储只允许一个写入者。
//! 读取者不加锁，写入者持锁时仍可读取。

use std::{fs, path::Path};

use fd_lock::RwLock;

use crate::{Error, Result};

type Guard = fd_lock::RwLockWriteGuard<'static, fs::File>;

/// Write lock holder / 写锁持有者
pub(crate) struct Lock {
  // SAFETY: _guard must be dropped before _lock. Rust drops fields in declaration order.
  // 安全：_guard 必须在 _lock 之前释放。Rust 按字段声明顺序 Drop。
  _guard: Guard,
  _lock: Box<RwLock<fs::File>>,
}

impl Lock {
  /// Try acquire lock, fail fast with `Locked`
  /// 尝试获取锁，失败立即返回 `Locked`
  pub fn try_new(path: &Path) -> Result<Self> {
    let file = fs::OpenOptions::new()
      .write(true)
      .create(true)
      .truncate(false)
      .open(path)
      .map_err(|e| Error::unavailable(path, e))?;

    let lock_ptr: *mut RwLock<fs::File> = Box::into_raw(Box::new(RwLock::new(file)));
    // SAFETY: Box provides stable address, guard lives shorter than lock
    // 安全：Box 提供稳定地址，guard 生命周期短于 lock
    let guard: Guard = match unsafe { (*lock_ptr).try_write() } {
      Ok(guard) => guard,
      Err(_) => {
        drop(unsafe { Box::from_raw(lock_ptr) });
        return Err(Error::Locked);
      }
    };
    let _lock = unsafe { Box::from_raw(lock_ptr) };
    Ok(Self {
      _guard: guard,
      _lock,
    })
  }
}
