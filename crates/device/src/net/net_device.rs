//! 网络设备接口定义

/// 网络设备错误
#[derive(Debug)]
pub enum NetDeviceError {
    /// IO 错误
    IoError,
    /// 设备未就绪
    DeviceNotReady,
    /// 不支持的操作
    NotSupported,
}

/// 网络设备接口
///
/// 诊断驱动只依赖 [`NetDevice::name`]；收发接口属于设备本体，
/// 由各网卡驱动实现。
pub trait NetDevice: Send + Sync {
    /// 获取设备名称（如 `eth2`）
    fn name(&self) -> &str;

    /// 获取 MAC 地址
    fn mac_address(&self) -> [u8; 6];

    /// 获取最大传输单元 (MTU)
    fn mtu(&self) -> usize;

    /// 发送数据包
    fn send(&self, packet: &[u8]) -> Result<(), NetDeviceError>;

    /// 接收数据包
    fn receive(&self, buf: &mut [u8]) -> Result<usize, NetDeviceError>;
}
