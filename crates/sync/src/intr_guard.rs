//! 中断保护器
//!
//! 基于 RAII 实现中断保护，在创建时禁用本地中断，销毁时恢复。
//!
//! 注意：禁用中断只能阻止**本地 CPU** 上任务与本地中断的并发，
//! 不能阻止其他 CPU 的并行访问；多核共享数据仍需配合自旋锁。

use crate::arch_ops;

/// 中断保护器
///
/// 创建时原子地禁用中断并保存之前的状态，
/// 离开作用域时自动恢复。
pub struct IntrGuard {
    flags: usize,
}

impl IntrGuard {
    /// 禁用本地中断并返回一个 IntrGuard 实例
    pub fn new() -> Self {
        // SAFETY: 保存的 flags 只会在 Drop 中原样传回 restore_interrupts
        let flags = unsafe { arch_ops().read_and_disable_interrupts() };
        IntrGuard { flags }
    }
}

impl Default for IntrGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IntrGuard {
    fn drop(&mut self) {
        // SAFETY: flags 是创建本实例时保存的中断状态
        unsafe { arch_ops().restore_interrupts(self.flags) };
    }
}
