//! MMIO 窗口

/// 一段已映射的 MMIO 窗口
///
/// 由 [`crate::pci::PciDevice::iomap`] 得到；寄存器读写是
/// volatile 的，不会被编译器合并或重排掉。
#[derive(Debug, Clone)]
pub struct IoMem {
    base: usize,
    len: usize,
}

impl IoMem {
    /// 包装一段地址区间为 MMIO 窗口
    ///
    /// # Safety
    /// 调用者必须保证 `[base, base + len)` 在窗口的整个生命周期内
    /// 是可按 4 字节对齐宽度读写的有效内存。
    pub unsafe fn new(base: usize, len: usize) -> Self {
        IoMem { base, len }
    }

    /// 窗口长度（字节）
    pub fn len(&self) -> usize {
        self.len
    }

    /// 窗口是否为空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 读取 32 位寄存器
    ///
    /// 越界或未对齐的偏移是编程错误，直接 panic。
    pub fn read32(&self, offset: usize) -> u32 {
        assert!(offset % 4 == 0 && offset + 4 <= self.len);
        // SAFETY: 区间有效性由构造时的调用者保证，偏移已检查
        unsafe { core::ptr::read_volatile((self.base + offset) as *const u32) }
    }

    /// 写入 32 位寄存器
    pub fn write32(&self, offset: usize, value: u32) {
        assert!(offset % 4 == 0 && offset + 4 <= self.len);
        // SAFETY: 区间有效性由构造时的调用者保证，偏移已检查
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }
}
