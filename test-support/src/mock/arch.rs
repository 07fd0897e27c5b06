//! 架构相关操作的 Mock 实现

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sync::ArchOps;

/// Mock 架构操作
///
/// 用一个原子布尔模拟本地中断的开关状态。
pub struct MockArchOps {
    pub interrupt_state: AtomicBool,
}

impl MockArchOps {
    pub const fn new() -> Self {
        Self {
            interrupt_state: AtomicBool::new(true),
        }
    }
}

impl Default for MockArchOps {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchOps for MockArchOps {
    unsafe fn read_and_disable_interrupts(&self) -> usize {
        self.interrupt_state.swap(false, Ordering::SeqCst) as usize
    }

    unsafe fn restore_interrupts(&self, flags: usize) {
        self.interrupt_state.store(flags != 0, Ordering::SeqCst);
    }
}

/// 全局 Mock 实例
pub static MOCK_ARCH_OPS: MockArchOps = MockArchOps::new();

// 0 = uninit, 1 = initializing, 2 = ready
static INIT_STATE: AtomicUsize = AtomicUsize::new(0);

/// 把全局 Mock 实例注册为 `sync` 的 ArchOps
///
/// 并发安全且可重复调用；每个用到锁的测试在入口处调用一次。
pub fn init_mock_arch_ops() {
    match INIT_STATE.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => {
            // SAFETY: 注册的是 'static 的全局 Mock 实例
            unsafe { sync::register_arch_ops(&MOCK_ARCH_OPS) };
            INIT_STATE.store(2, Ordering::Release);
        }
        Err(_) => {
            while INIT_STATE.load(Ordering::Acquire) != 2 {
                core::hint::spin_loop();
            }
        }
    }
}
