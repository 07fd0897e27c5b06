//! 驱动对象与绑定生命周期
//!
//! [`Ndl`] 持有唯一一份绑定状态，绑定与解绑由一把自旋锁串行化，
//! 不依赖通知链派发本身的串行性。读出端点的读路径不碰这把锁。

use alloc::{
    string::{String, ToString},
    sync::Arc,
};
use debugfs::DebugNode;
use device::{
    IoMem, NetDevice, NetdevEvent, NetdevNotifier, PCI_VENDOR_ID_INTEL, PciDevice,
    netdev_by_name, pci_devices_by_vendor, register_netdev_notifier,
    unregister_netdev_notifier,
};
use sync::SpinLock;

use crate::error::NdlError;
use crate::regs::I210_RR2DCDELAY;
use crate::rtd;
use crate::{DRIVER_NAME, NDL_VERSION};

/// 承载 I210 的以太网驱动名
const BACKING_DRIVER: &str = "igb";

/// 绑定期间持有的资源
///
/// 四者要么全在（已绑定），要么全空（未绑定）；
/// 绑定失败的中间状态在返回前回滚为全空。
#[derive(Default)]
struct Binding {
    ndev: Option<Arc<dyn NetDevice>>,
    pdev: Option<Arc<PciDevice>>,
    iomem: Option<IoMem>,
    dfs_dir: Option<Arc<DebugNode>>,
}

/// [`Ndl::bind`] 成功时的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// 本次调用完成了绑定
    Bound,
    /// 之前已经绑定，本次是 no-op
    AlreadyBound,
}

/// 驱动对象
pub struct Ndl {
    ifname: String,
    binding: SpinLock<Binding>,
}

impl Ndl {
    fn new(ifname: &str) -> Arc<Self> {
        Arc::new(Self {
            ifname: ifname.to_string(),
            binding: SpinLock::new(Binding::default()),
        })
    }

    /// 监视的接口名
    pub fn ifname(&self) -> &str {
        &self.ifname
    }

    /// 是否已绑定到目标设备
    pub fn is_bound(&self) -> bool {
        self.binding.lock().ndev.is_some()
    }

    /// 绑定目标设备并建立 `ndl/rtd` 读出端点
    ///
    /// 依次解析网络设备、承载它的 Intel PCI 网卡、BAR0 映射和
    /// debugfs 端点；任何一步失败都不留下部分状态。已绑定时
    /// 返回 [`BindOutcome::AlreadyBound`]，容忍重复的注册事件。
    pub fn bind(&self) -> Result<BindOutcome, NdlError> {
        let mut binding = self.binding.lock();
        if binding.ndev.is_some() {
            return Ok(BindOutcome::AlreadyBound);
        }

        let ndev = netdev_by_name(&self.ifname).ok_or(NdlError::DeviceNotFound)?;
        let pdev = find_pci_device(&ndev).ok_or(NdlError::BackingDeviceNotFound)?;
        let iomem = pdev.iomap(0).map_err(|_| NdlError::MapFailed)?;
        if iomem.len() < I210_RR2DCDELAY + 4 {
            // 窗口装不下寄存器，绑定失败而不是读取时 panic
            return Err(NdlError::MapFailed);
        }
        let dfs_dir = rtd::create_endpoint(iomem.clone())
            .map_err(|_| NdlError::EndpointCreationFailed)?;

        binding.ndev = Some(ndev);
        binding.pdev = Some(pdev);
        binding.iomem = Some(iomem);
        binding.dfs_dir = Some(dfs_dir);
        log::info!("{}: bound to {}", DRIVER_NAME, self.ifname);
        Ok(BindOutcome::Bound)
    }

    /// 解除绑定
    ///
    /// 先拆读出端点并等在途读者离开，之后撤 MMIO 映射、放设备
    /// 引用才是安全的。未绑定时以及对缺失的任意子集都是 no-op。
    pub fn unbind(&self) {
        let mut binding = self.binding.lock();
        if let Some(dir) = binding.dfs_dir.take() {
            debugfs::remove_recursive(&dir);
        }
        binding.iomem = None;
        binding.pdev = None;
        if binding.ndev.take().is_some() {
            log::info!("{}: unbound from {}", DRIVER_NAME, self.ifname);
        }
    }
}

impl NetdevNotifier for Ndl {
    fn netdev_event(&self, event: NetdevEvent, dev: &Arc<dyn NetDevice>) {
        match event {
            NetdevEvent::Register => {
                if dev.name() == self.ifname {
                    if let Err(err) = self.bind() {
                        log::error!(
                            "{}: failed to bind {}: {:?} (errno {})",
                            DRIVER_NAME,
                            self.ifname,
                            err,
                            err.to_errno()
                        );
                    }
                }
            }
            NetdevEvent::Unregister => {
                let is_bound_dev = match &self.binding.lock().ndev {
                    Some(ndev) => Arc::ptr_eq(ndev, dev),
                    None => false,
                };
                if is_bound_dev {
                    self.unbind();
                }
            }
            // 链路状态、改名等事件与绑定无关
            _ => {}
        }
    }
}

/// 在 PCI 注册表中找承载给定网络设备的网卡
///
/// 厂商为 Intel、驱动名为 `igb`、驱动私有数据回指 `ndev`；
/// 设备 ID 不限定，I210 的各个 SKU 都能匹配。
fn find_pci_device(ndev: &Arc<dyn NetDevice>) -> Option<Arc<PciDevice>> {
    pci_devices_by_vendor(PCI_VENDOR_ID_INTEL)
        .into_iter()
        .find(|pdev| pdev.driven_by(BACKING_DRIVER) && pdev.drvdata_is(ndev))
}

/// 加载驱动
///
/// `ifname` 为要监视的接口名，空名是致命的配置错误。目标设备
/// 已注册时立即绑定，绑定失败视为加载失败；未注册时记录日志
/// 继续，端点在设备注册时出现。最后订阅 netdevice 通知链。
pub fn init(ifname: &str) -> Result<Arc<Ndl>, NdlError> {
    if ifname.is_empty() {
        return Err(NdlError::ConfigMissing);
    }
    log::info!("{}: version {}", DRIVER_NAME, NDL_VERSION);

    let ndl = Ndl::new(ifname);
    if netdev_by_name(ifname).is_some() {
        ndl.bind()?;
    } else {
        log::info!(
            "{}: device '{}' not present, waiting for it to register",
            DRIVER_NAME,
            ifname
        );
    }

    let notifier: Arc<dyn NetdevNotifier> = ndl.clone();
    if register_netdev_notifier(notifier).is_err() {
        ndl.unbind();
        return Err(NdlError::SubscriptionFailed);
    }
    Ok(ndl)
}

/// 卸载驱动：先退订通知链，再解除绑定
pub fn exit(ndl: &Arc<Ndl>) {
    let notifier: Arc<dyn NetdevNotifier> = ndl.clone();
    if unregister_netdev_notifier(&notifier).is_err() {
        log::warn!("{}: notifier was not subscribed", DRIVER_NAME);
    }
    ndl.unbind();
}
