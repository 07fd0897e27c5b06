//! 网络设备模块
//!
//! 全局网络设备注册表与 netdevice 通知链。

mod net_device;
mod notifier;

use alloc::{sync::Arc, vec::Vec};
use lazy_static::lazy_static;
use sync::RwLock;

pub use net_device::{NetDevice, NetDeviceError};
pub use notifier::{
    NetdevEvent, NetdevNotifier, NotifierError, register_netdev_notifier,
    unregister_netdev_notifier,
};

use notifier::call_netdev_notifiers;

lazy_static! {
    /// 网络设备注册表
    ///
    /// 存储系统中当前注册的所有网络设备。
    // NOTE: 只在设备插拔时有写操作，运行时均为读操作
    pub static ref NETWORK_DEVICES: RwLock<Vec<Arc<dyn NetDevice>>> = RwLock::new(Vec::new());
}

/// 注册网络设备，并向通知链派发 [`NetdevEvent::Register`]
///
/// 重复注册同一设备实例是 no-op。
pub fn register_netdev(dev: Arc<dyn NetDevice>) {
    {
        let mut devices = NETWORK_DEVICES.write();
        if devices.iter().any(|d| Arc::ptr_eq(d, &dev)) {
            log::warn!("net: device '{}' already registered", dev.name());
            return;
        }
        devices.push(Arc::clone(&dev));
    }
    // 锁外派发，订阅者回调中可以查注册表
    call_netdev_notifiers(NetdevEvent::Register, &dev);
}

/// 注销网络设备，并向通知链派发 [`NetdevEvent::Unregister`]
///
/// 设备不在注册表中时是 no-op。
pub fn unregister_netdev(dev: &Arc<dyn NetDevice>) {
    {
        let mut devices = NETWORK_DEVICES.write();
        let before = devices.len();
        devices.retain(|d| !Arc::ptr_eq(d, dev));
        if devices.len() == before {
            log::warn!("net: device '{}' is not registered", dev.name());
            return;
        }
    }
    call_netdev_notifiers(NetdevEvent::Unregister, dev);
}

/// 按名称查找网络设备
pub fn netdev_by_name(name: &str) -> Option<Arc<dyn NetDevice>> {
    NETWORK_DEVICES
        .read()
        .iter()
        .find(|dev| dev.name() == name)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::mock::arch::init_mock_arch_ops;
    use test_support::mock::net::MockNic;

    impl NetDevice for MockNic {
        fn name(&self) -> &str {
            self.name
        }

        fn mac_address(&self) -> [u8; 6] {
            self.mac
        }

        fn mtu(&self) -> usize {
            1500
        }

        fn send(&self, _packet: &[u8]) -> Result<(), NetDeviceError> {
            Ok(())
        }

        fn receive(&self, _buf: &mut [u8]) -> Result<usize, NetDeviceError> {
            Err(NetDeviceError::NotSupported)
        }
    }

    #[test]
    fn test_register_and_lookup_by_name() {
        init_mock_arch_ops();
        let nic: Arc<dyn NetDevice> = Arc::new(MockNic::new("mock_eth0"));
        register_netdev(Arc::clone(&nic));

        let found = netdev_by_name("mock_eth0").expect("device registered");
        assert!(Arc::ptr_eq(&found, &nic));
        assert!(netdev_by_name("mock_missing").is_none());

        unregister_netdev(&nic);
        assert!(netdev_by_name("mock_eth0").is_none());
    }

    #[test]
    fn test_duplicate_register_is_noop() {
        init_mock_arch_ops();
        let nic: Arc<dyn NetDevice> = Arc::new(MockNic::new("mock_eth1"));
        register_netdev(Arc::clone(&nic));
        register_netdev(Arc::clone(&nic));

        let count = NETWORK_DEVICES
            .read()
            .iter()
            .filter(|d| d.name() == "mock_eth1")
            .count();
        assert_eq!(count, 1);

        unregister_netdev(&nic);
        // 再次注销是 no-op
        unregister_netdev(&nic);
    }
}
