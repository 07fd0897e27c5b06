//! I210 DMA 往返时延诊断驱动
//!
//! 监视一个由 `igb` 驱动承载的 Intel I210 网卡，把其
//! `RR2DCDELAY` 寄存器（DMA 往返时延，经换算为 PCIe 时钟周期数）
//! 通过只读的 debugfs 文件 `ndl/rtd` 暴露出来。
//!
//! 驱动以接口名为配置（如 `"eth2"`）。目标设备注册时自动绑定并
//! 建立读出端点；设备注销时自动解绑并拆除端点。绑定与解绑由
//! netdevice 通知链驱动，也可在加载时对已存在的设备立即完成。
//!
//! # 读与拆除的竞争
//!
//! 每次读取都重新采样硬件。正在进行的读取会把文件节点 pin 住，
//! 解绑先拆端点并等在途读者离开，之后才撤掉 MMIO 映射，因此
//! 读者要么拿到一个完整有效的值，要么得到 `ResourceGone`。

#![no_std]

extern crate alloc;

mod driver;
mod error;
mod regs;
mod rtd;

pub use driver::{BindOutcome, Ndl, exit, init};
pub use error::NdlError;
pub use regs::{I210_RR2DCDELAY, I210_RR2DCDELAY_INCR, read_rtd};

/// 驱动名，同时也是 debugfs 下目录的名字
pub const DRIVER_NAME: &str = "ndl";

/// 驱动版本
pub const NDL_VERSION: &str = "1.0";
