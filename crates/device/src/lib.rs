//! 设备子系统
//!
//! 此 crate 提供驱动依赖的两类外部协作者：
//!
//! - [`net`] - 网络设备接口、全局注册表与 netdevice 通知链
//! - [`pci`] - PCI 设备模型、按厂商枚举与 BAR 内存映射
//!
//! 设备的引用获取/释放通过 `Arc` 的克隆与丢弃表达；
//! 注册表只在设备插拔时有写操作，运行时均为读操作。

#![no_std]
#![allow(clippy::module_inception)]

extern crate alloc;

pub mod net;
pub mod pci;

// Re-export net
pub use net::{
    NETWORK_DEVICES, NetDevice, NetDeviceError, NetdevEvent, NetdevNotifier, NotifierError,
    netdev_by_name, register_netdev, register_netdev_notifier, unregister_netdev,
    unregister_netdev_notifier,
};

// Re-export pci
pub use pci::{
    BarWindow, IoMem, PCI_DEVICES, PCI_VENDOR_ID_INTEL, PciDevice, PciError,
    pci_devices_by_vendor, register_pci_device, unregister_pci_device,
};
