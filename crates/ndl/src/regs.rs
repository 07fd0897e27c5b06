//! I210 寄存器访问
//!
//! 寄存器偏移与换算系数来自 I210 datasheet：`RR2DCDELAY` 记录
//! DMA 读请求到完成的最大往返时延，单位为 16 个 PCIe 时钟周期。

use device::IoMem;

/// RR2DCDELAY 寄存器在 BAR0 中的字节偏移
pub const I210_RR2DCDELAY: usize = 0x5BF4;

/// RR2DCDELAY 的计数单位：16 个 PCIe 时钟周期
pub const I210_RR2DCDELAY_INCR: u64 = 16;

/// 采样往返时延，换算为 PCIe 时钟周期数
///
/// 先拓宽到 `u64` 再乘换算系数，寄存器满量程也不会截断。
/// 调用者必须保证 `iomem` 指向一个仍然有效的 BAR0 映射。
pub fn read_rtd(iomem: &IoMem) -> u64 {
    u64::from(iomem.read32(I210_RR2DCDELAY)) * I210_RR2DCDELAY_INCR
}
