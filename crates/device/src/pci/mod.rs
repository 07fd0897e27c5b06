//! PCI 设备模型
//!
//! 提供诊断驱动需要的最小 PCI 枚举能力：按厂商过滤设备、
//! 查询当前接管设备的驱动、通过驱动私有数据回溯到网络设备，
//! 以及把 BAR 映射为 [`IoMem`] 窗口。

mod iomem;

use alloc::{
    string::{String, ToString},
    sync::{Arc, Weak},
    vec::Vec,
};
use lazy_static::lazy_static;
use sync::{RwLock, SpinLock};

use crate::net::NetDevice;

pub use iomem::IoMem;

/// Intel 的 PCI 厂商 ID
pub const PCI_VENDOR_ID_INTEL: u16 = 0x8086;

/// PCI 操作错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PciError {
    /// 请求的 BAR 不存在
    NoSuchBar,
}

/// 一个 BAR 描述的物理窗口
#[derive(Debug, Clone, Copy)]
pub struct BarWindow {
    /// 窗口基地址
    pub base: usize,
    /// 窗口长度（字节）
    pub len: usize,
}

/// 驱动接管状态：接管者的驱动名与驱动私有数据
///
/// 私有数据是指向所承载网络设备的弱引用，对应内核里
/// `pdev->dev.driver_data` 的回溯用法。
struct DriverBinding {
    name: String,
    drvdata: Weak<dyn NetDevice>,
}

/// 一个 PCI 功能
pub struct PciDevice {
    vendor_id: u16,
    device_id: u16,
    bar0: Option<BarWindow>,
    driver: SpinLock<Option<DriverBinding>>,
}

impl PciDevice {
    /// 创建一个 PCI 设备描述
    pub fn new(vendor_id: u16, device_id: u16, bar0: Option<BarWindow>) -> Arc<Self> {
        Arc::new(Self {
            vendor_id,
            device_id,
            bar0,
            driver: SpinLock::new(None),
        })
    }

    /// 厂商 ID
    pub fn vendor_id(&self) -> u16 {
        self.vendor_id
    }

    /// 设备 ID
    pub fn device_id(&self) -> u16 {
        self.device_id
    }

    /// 驱动接管此设备，记录驱动名与私有数据
    pub fn claim(&self, driver_name: &str, drvdata: &Arc<dyn NetDevice>) {
        *self.driver.lock() = Some(DriverBinding {
            name: driver_name.to_string(),
            drvdata: Arc::downgrade(drvdata),
        });
    }

    /// 驱动释放此设备
    pub fn release(&self) {
        *self.driver.lock() = None;
    }

    /// 是否由名为 `name` 的驱动接管
    pub fn driven_by(&self, name: &str) -> bool {
        match &*self.driver.lock() {
            Some(binding) => binding.name == name,
            None => false,
        }
    }

    /// 驱动私有数据是否指向给定的网络设备
    pub fn drvdata_is(&self, dev: &Arc<dyn NetDevice>) -> bool {
        match &*self.driver.lock() {
            Some(binding) => match binding.drvdata.upgrade() {
                Some(bound) => Arc::ptr_eq(&bound, dev),
                None => false,
            },
            None => false,
        }
    }

    /// 把第 `bar` 个 BAR 映射为 MMIO 窗口
    ///
    /// 目前只支持 BAR0（I210 的寄存器窗口）。
    pub fn iomap(&self, bar: usize) -> Result<IoMem, PciError> {
        if bar != 0 {
            return Err(PciError::NoSuchBar);
        }
        let window = self.bar0.ok_or(PciError::NoSuchBar)?;
        // SAFETY: BAR 窗口的有效性由设备的注册者保证
        Ok(unsafe { IoMem::new(window.base, window.len) })
    }
}

lazy_static! {
    /// PCI 设备注册表
    // NOTE: 只在设备插拔时有写操作，运行时均为读操作
    pub static ref PCI_DEVICES: RwLock<Vec<Arc<PciDevice>>> = RwLock::new(Vec::new());
}

/// 注册 PCI 设备
pub fn register_pci_device(dev: Arc<PciDevice>) {
    PCI_DEVICES.write().push(dev);
}

/// 注销 PCI 设备；不在注册表中时是 no-op
pub fn unregister_pci_device(dev: &Arc<PciDevice>) {
    PCI_DEVICES.write().retain(|d| !Arc::ptr_eq(d, dev));
}

/// 按厂商 ID 枚举 PCI 设备（快照）
pub fn pci_devices_by_vendor(vendor_id: u16) -> Vec<Arc<PciDevice>> {
    PCI_DEVICES
        .read()
        .iter()
        .filter(|dev| dev.vendor_id() == vendor_id)
        .cloned()
        .collect()
}
