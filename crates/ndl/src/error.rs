//! 驱动错误

/// 驱动操作错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NdlError {
    /// 未提供要监视的接口名
    ConfigMissing,
    /// 目标网络设备未注册
    DeviceNotFound,
    /// 找不到承载目标设备的 Intel PCI 网卡
    BackingDeviceNotFound,
    /// BAR0 无法映射为 MMIO 窗口
    MapFailed,
    /// 读出端点创建失败
    EndpointCreationFailed,
    /// 订阅 netdevice 通知链失败
    SubscriptionFailed,
}

impl NdlError {
    /// 转换为 errno
    pub fn to_errno(&self) -> i32 {
        match self {
            NdlError::ConfigMissing => -22,          // EINVAL
            NdlError::DeviceNotFound => -19,         // ENODEV
            NdlError::BackingDeviceNotFound => -19,  // ENODEV
            NdlError::MapFailed => -12,              // ENOMEM
            NdlError::EndpointCreationFailed => -12, // ENOMEM
            NdlError::SubscriptionFailed => -16,     // EBUSY
        }
    }
}
