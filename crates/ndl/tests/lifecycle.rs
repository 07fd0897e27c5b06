use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use debugfs::{DebugNode, FsError};
use device::{
    BarWindow, NetDevice, NetDeviceError, NetdevEvent, NetdevNotifier, PCI_VENDOR_ID_INTEL,
    PciDevice, register_netdev, register_pci_device, unregister_netdev, unregister_pci_device,
};
use ndl::{BindOutcome, I210_RR2DCDELAY, NdlError};
use test_support::mock::arch::init_mock_arch_ops;

// 绑定生命周期共享 debugfs 下的 `ndl` 目录和全局注册表，
// 这里的测试必须串行执行。
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> std::sync::MutexGuard<'static, ()> {
    init_mock_arch_ops();
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct TestNic(&'static str);

impl NetDevice for TestNic {
    fn name(&self) -> &str {
        self.0
    }

    fn mac_address(&self) -> [u8; 6] {
        [0x02, 0, 0, 0, 0, 0x10]
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

/// 泄漏一段对齐的内存充当 BAR0 窗口，覆盖 RR2DCDELAY 偏移
fn leaked_bar0() -> BarWindow {
    let backing = Box::leak(vec![0u32; 0x1800].into_boxed_slice());
    BarWindow {
        base: backing.as_ptr() as usize,
        len: backing.len() * 4,
    }
}

/// 注册一块由 igb 承载、drvdata 回指 `nic` 的 Intel 网卡
fn plug_backing_pci(nic: &Arc<dyn NetDevice>) -> Arc<PciDevice> {
    let pdev = PciDevice::new(PCI_VENDOR_ID_INTEL, 0x1533, Some(leaked_bar0()));
    pdev.claim("igb", nic);
    register_pci_device(Arc::clone(&pdev));
    pdev
}

fn set_raw_delay(pdev: &Arc<PciDevice>, value: u32) {
    pdev.iomap(0).unwrap().write32(I210_RR2DCDELAY, value);
}

fn read_all(node: &Arc<DebugNode>) -> Result<Vec<u8>, FsError> {
    let mut out = Vec::new();
    let mut offset = 0;
    let mut buf = [0u8; 64];
    loop {
        let n = node.read_at(offset, &mut buf)?;
        if n == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&buf[..n]);
        offset += n;
    }
}

#[test]
fn test_init_empty_ifname_is_config_missing() {
    let _guard = serial();
    assert_eq!(ndl::init("").err(), Some(NdlError::ConfigMissing));
}

#[test]
fn test_eager_bind_when_device_present() {
    let _guard = serial();
    let nic: Arc<dyn NetDevice> = Arc::new(TestNic("eth10"));
    let pdev = plug_backing_pci(&nic);
    register_netdev(Arc::clone(&nic));
    set_raw_delay(&pdev, 100);

    let ndl = ndl::init("eth10").unwrap();
    assert!(ndl.is_bound());

    let file = debugfs::lookup("ndl/rtd").unwrap();
    assert_eq!(read_all(&file).unwrap(), b"1600");

    // 重复绑定是 no-op
    assert_eq!(ndl.bind(), Ok(BindOutcome::AlreadyBound));

    ndl::exit(&ndl);
    assert!(!ndl.is_bound());
    assert_eq!(debugfs::lookup("ndl").err(), Some(FsError::NotFound));

    unregister_netdev(&nic);
    unregister_pci_device(&pdev);
}

#[test]
fn test_eth2_hotplug_scenario() {
    let _guard = serial();

    // 加载时 eth2 还不存在：不致命，端点也不出现
    let ndl = ndl::init("eth2").unwrap();
    assert!(!ndl.is_bound());
    assert_eq!(debugfs::lookup("ndl").err(), Some(FsError::NotFound));

    // 设备插入，注册事件触发绑定
    let nic: Arc<dyn NetDevice> = Arc::new(TestNic("eth2"));
    let pdev = plug_backing_pci(&nic);
    set_raw_delay(&pdev, 100);
    register_netdev(Arc::clone(&nic));
    assert!(ndl.is_bound());
    let file = debugfs::lookup("ndl/rtd").unwrap();
    assert_eq!(read_all(&file).unwrap(), b"1600");

    // 设备拔出，端点消失
    unregister_netdev(&nic);
    assert!(!ndl.is_bound());
    assert_eq!(debugfs::lookup("ndl/rtd").err(), Some(FsError::NotFound));
    // 过期句柄读到 ResourceGone
    assert_eq!(read_all(&file).err(), Some(FsError::ResourceGone));

    // 再次插入，端点带着当前值重新出现
    set_raw_delay(&pdev, 7);
    register_netdev(Arc::clone(&nic));
    assert!(ndl.is_bound());
    let file = debugfs::lookup("ndl/rtd").unwrap();
    assert_eq!(read_all(&file).unwrap(), b"112");

    ndl::exit(&ndl);
    unregister_netdev(&nic);
    unregister_pci_device(&pdev);
}

#[test]
fn test_init_fails_without_backing_pci() {
    let _guard = serial();
    let nic: Arc<dyn NetDevice> = Arc::new(TestNic("eth11"));
    register_netdev(Arc::clone(&nic));

    assert_eq!(
        ndl::init("eth11").err(),
        Some(NdlError::BackingDeviceNotFound)
    );
    assert_eq!(debugfs::lookup("ndl").err(), Some(FsError::NotFound));

    unregister_netdev(&nic);
}

#[test]
fn test_init_fails_when_bar_missing() {
    let _guard = serial();
    let nic: Arc<dyn NetDevice> = Arc::new(TestNic("eth12"));
    let pdev = PciDevice::new(PCI_VENDOR_ID_INTEL, 0x1533, None);
    pdev.claim("igb", &nic);
    register_pci_device(Arc::clone(&pdev));
    register_netdev(Arc::clone(&nic));

    assert_eq!(ndl::init("eth12").err(), Some(NdlError::MapFailed));

    unregister_netdev(&nic);
    unregister_pci_device(&pdev);
}

#[test]
fn test_init_fails_when_bar_too_short() {
    let _guard = serial();
    let nic: Arc<dyn NetDevice> = Arc::new(TestNic("eth18"));
    // 窗口在 RR2DCDELAY 之前就结束了
    let backing = Box::leak(vec![0u32; 16].into_boxed_slice());
    let pdev = PciDevice::new(
        PCI_VENDOR_ID_INTEL,
        0x1533,
        Some(BarWindow {
            base: backing.as_ptr() as usize,
            len: backing.len() * 4,
        }),
    );
    pdev.claim("igb", &nic);
    register_pci_device(Arc::clone(&pdev));
    register_netdev(Arc::clone(&nic));

    assert_eq!(ndl::init("eth18").err(), Some(NdlError::MapFailed));
    assert_eq!(debugfs::lookup("ndl").err(), Some(FsError::NotFound));

    unregister_netdev(&nic);
    unregister_pci_device(&pdev);
}

#[test]
fn test_backing_match_requires_driver_and_drvdata() {
    let _guard = serial();
    let nic: Arc<dyn NetDevice> = Arc::new(TestNic("eth13"));
    let other: Arc<dyn NetDevice> = Arc::new(TestNic("eth13_other"));

    // Intel 网卡但驱动不是 igb
    let wrong_driver = PciDevice::new(PCI_VENDOR_ID_INTEL, 0x1533, Some(leaked_bar0()));
    wrong_driver.claim("e1000e", &nic);
    register_pci_device(Arc::clone(&wrong_driver));

    // igb 承载，但 drvdata 指向别的设备
    let wrong_dev = PciDevice::new(PCI_VENDOR_ID_INTEL, 0x1533, Some(leaked_bar0()));
    wrong_dev.claim("igb", &other);
    register_pci_device(Arc::clone(&wrong_dev));

    register_netdev(Arc::clone(&nic));
    assert_eq!(
        ndl::init("eth13").err(),
        Some(NdlError::BackingDeviceNotFound)
    );

    unregister_netdev(&nic);
    unregister_pci_device(&wrong_driver);
    unregister_pci_device(&wrong_dev);
}

#[test]
fn test_unbind_without_bind_is_noop() {
    let _guard = serial();
    let ndl = ndl::init("eth14").unwrap();
    assert!(!ndl.is_bound());

    ndl.unbind();
    ndl.unbind();
    assert!(!ndl.is_bound());

    ndl::exit(&ndl);
}

#[test]
fn test_bind_unbind_bind_round_trip() {
    let _guard = serial();
    let nic: Arc<dyn NetDevice> = Arc::new(TestNic("eth15"));
    let pdev = plug_backing_pci(&nic);
    set_raw_delay(&pdev, 3);
    register_netdev(Arc::clone(&nic));

    let ndl = ndl::init("eth15").unwrap();
    assert_eq!(read_all(&debugfs::lookup("ndl/rtd").unwrap()).unwrap(), b"48");

    ndl.unbind();
    assert!(!ndl.is_bound());
    assert_eq!(debugfs::lookup("ndl/rtd").err(), Some(FsError::NotFound));

    assert_eq!(ndl.bind(), Ok(BindOutcome::Bound));
    assert_eq!(read_all(&debugfs::lookup("ndl/rtd").unwrap()).unwrap(), b"48");

    ndl::exit(&ndl);
    unregister_netdev(&nic);
    unregister_pci_device(&pdev);
}

#[test]
fn test_unrelated_events_are_ignored() {
    let _guard = serial();
    let ndl = ndl::init("eth16").unwrap();
    let nic: Arc<dyn NetDevice> = Arc::new(TestNic("eth16"));
    let stranger: Arc<dyn NetDevice> = Arc::new(TestNic("eth99"));

    // 链路和改名事件不触发绑定
    ndl.netdev_event(NetdevEvent::Up, &nic);
    ndl.netdev_event(NetdevEvent::Down, &nic);
    ndl.netdev_event(NetdevEvent::ChangeName, &nic);
    assert!(!ndl.is_bound());

    // 别的设备的注册/注销事件也不触发
    ndl.netdev_event(NetdevEvent::Register, &stranger);
    assert!(!ndl.is_bound());
    ndl.netdev_event(NetdevEvent::Unregister, &stranger);
    assert!(!ndl.is_bound());

    ndl::exit(&ndl);
}

#[test]
fn test_read_racing_unbind() {
    let _guard = serial();
    let nic: Arc<dyn NetDevice> = Arc::new(TestNic("eth17"));
    let pdev = plug_backing_pci(&nic);
    set_raw_delay(&pdev, 100);
    register_netdev(Arc::clone(&nic));

    let ndl = ndl::init("eth17").unwrap();
    let file = debugfs::lookup("ndl/rtd").unwrap();

    let reader = thread::spawn(move || {
        let mut ok_reads = 0usize;
        loop {
            match read_all(&file) {
                Ok(data) => {
                    // 在途读取只能看到完整有效的值
                    assert_eq!(data, b"1600");
                    ok_reads += 1;
                }
                Err(err) => {
                    assert_eq!(err, FsError::ResourceGone);
                    return ok_reads;
                }
            }
        }
    });

    thread::sleep(Duration::from_millis(20));
    ndl::exit(&ndl);

    let ok_reads = reader.join().unwrap();
    assert!(ok_reads > 0);

    unregister_netdev(&nic);
    unregister_pci_device(&pdev);
}
