//! 网络设备的 Mock 实现
//!
//! 注意：这里不直接依赖 `device` crate（避免循环依赖）。
//! `device` crate 在 `cfg(test)` 下为这些类型实现其 trait（例如 `NetDevice`）。

/// Mock 网卡
pub struct MockNic {
    pub name: &'static str,
    pub mac: [u8; 6],
}

impl MockNic {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            mac: [0x02, 0x00, 0x00, 0x00, 0x00, 0x00],
        }
    }
}
