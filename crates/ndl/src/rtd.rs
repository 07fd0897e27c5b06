//! `ndl/rtd` 读出端点
//!
//! 在 debugfs 根下建立 `ndl` 目录和其中的只读文件 `rtd`，
//! 文件内容为当前往返时延的十进制字符串（无前导零、无换行）。

use alloc::{format, sync::Arc, vec::Vec};
use debugfs::{ContentGenerator, DebugNode, FileMode, FsError, create_dir, create_file};
use device::IoMem;

use crate::regs::read_rtd;

/// `rtd` 文件的内容生成器
///
/// 绑定时按值捕获 MMIO 窗口，读路径不回头拿绑定状态的锁；
/// 每次读取都重新采样硬件，两次读取之间值可以变化。
struct RtdGenerator {
    iomem: IoMem,
}

impl ContentGenerator for RtdGenerator {
    fn generate(&self) -> Result<Vec<u8>, FsError> {
        Ok(format!("{}", read_rtd(&self.iomem)).into_bytes())
    }
}

/// 建立 `ndl/rtd` 端点，返回 `ndl` 目录节点
pub(crate) fn create_endpoint(iomem: IoMem) -> Result<Arc<DebugNode>, FsError> {
    let dir = create_dir(crate::DRIVER_NAME, None)?;
    let generator = Arc::new(RtdGenerator { iomem });
    if let Err(err) = create_file(
        "rtd",
        FileMode::from_bits_truncate(0o444),
        Some(&dir),
        generator,
    ) {
        debugfs::remove_recursive(&dir);
        return Err(err);
    }
    Ok(dir)
}
