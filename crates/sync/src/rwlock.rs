//! 读写锁
//!
//! 基于 `lock_api` 封装的自旋读写锁，读多写少的全局注册表使用它。
//! 与 [`crate::SpinLock`] 不同，读写锁不关中断，
//! 不要在中断上下文中使用。

use core::hint;
use core::sync::atomic::{AtomicUsize, Ordering};

/// 写者标志位；低位是读者计数
const WRITER: usize = usize::MAX / 2 + 1;

/// 自旋实现的裸读写锁，接入 lock_api
pub struct RawRwSpinLock {
    state: AtomicUsize,
}

unsafe impl lock_api::RawRwLock for RawRwSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawRwSpinLock {
        state: AtomicUsize::new(0),
    };

    type GuardMarker = lock_api::GuardSend;

    fn lock_shared(&self) {
        while !self.try_lock_shared() {
            hint::spin_loop();
        }
    }

    fn try_lock_shared(&self) -> bool {
        let state = self.state.load(Ordering::Relaxed);
        if state & WRITER != 0 {
            return false;
        }
        self.state
            .compare_exchange_weak(state, state + 1, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock_shared(&self) {
        self.state.fetch_sub(1, Ordering::Release);
    }

    fn lock_exclusive(&self) {
        while !self.try_lock_exclusive() {
            hint::spin_loop();
        }
    }

    fn try_lock_exclusive(&self) -> bool {
        self.state
            .compare_exchange(0, WRITER, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock_exclusive(&self) {
        self.state.fetch_and(!WRITER, Ordering::Release);
    }
}

/// 自旋读写锁
pub type RwLock<T> = lock_api::RwLock<RawRwSpinLock, T>;

/// 读写锁的读保护器
pub type RwLockReadGuard<'a, T> = lock_api::RwLockReadGuard<'a, RawRwSpinLock, T>;

/// 读写锁的写保护器
pub type RwLockWriteGuard<'a, T> = lock_api::RwLockWriteGuard<'a, RawRwSpinLock, T>;
