//! 读侧 pin 门
//!
//! 保护"可能随时被拆除的资源"的读路径：读者在访问前 pin 住门，
//! 访问结束后释放；拆除方调用 [`PinGate::close`]，原子地禁止新的
//! pin 并自旋等待在途读者全部离开（drain-then-forbid 语义）。
//!
//! 与简单引用计数的区别在于"禁止新进入"与"等待清空"是同一个
//! 原语的两半：关闭位一旦置上，pin 就不可能再成功，不存在
//! 计数归零后又被拉起的窗口。
//!
//! 读者之间互不串行化；门只对"读者集合"与"关闭者"互斥。

use core::hint;
use core::sync::atomic::{AtomicUsize, Ordering};

/// 关闭标志位；低位是在途 pin 计数
const CLOSED: usize = usize::MAX / 2 + 1;

/// 读侧 pin 门
///
/// 初始为打开状态；[`PinGate::close`] 之后永久关闭，
/// 对应被保护资源的一次性拆除。
#[derive(Debug)]
pub struct PinGate {
    state: AtomicUsize,
}

impl PinGate {
    /// 创建一个打开的 PinGate
    pub const fn new() -> Self {
        PinGate {
            state: AtomicUsize::new(0),
        }
    }

    /// 尝试 pin 住门
    ///
    /// 门已关闭（拆除已开始）时返回 None；
    /// 成功时返回的保护器在 Drop 时释放 pin。
    pub fn pin(&self) -> Option<PinGuard<'_>> {
        let mut state = self.state.load(Ordering::Acquire);
        loop {
            if state & CLOSED != 0 {
                return None;
            }
            match self.state.compare_exchange_weak(
                state,
                state + 1,
                Ordering::Acquire,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(PinGuard { gate: self }),
                Err(observed) => state = observed,
            }
        }
    }

    /// 关闭门：禁止新的 pin，并等待在途 pin 全部释放
    ///
    /// 返回时保证不再有读者处于临界区内，之后也不会再有。
    /// 可重复调用（后续调用只等待，不改变状态）。
    pub fn close(&self) {
        self.state.fetch_or(CLOSED, Ordering::AcqRel);
        while self.state.load(Ordering::Acquire) & !CLOSED != 0 {
            hint::spin_loop();
        }
    }

    /// 门是否已关闭
    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) & CLOSED != 0
    }
}

impl Default for PinGate {
    fn default() -> Self {
        Self::new()
    }
}

/// pin 的 RAII 保护器，Drop 时释放
pub struct PinGuard<'a> {
    gate: &'a PinGate,
}

impl Drop for PinGuard<'_> {
    fn drop(&mut self) {
        self.gate.state.fetch_sub(1, Ordering::Release);
    }
}
