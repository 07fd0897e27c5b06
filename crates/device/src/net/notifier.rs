//! netdevice 通知链
//!
//! 设备注册/注销等生命周期事件的订阅机制。事件由注册表在
//! 插拔路径上同步派发；对同一设备的事件假定由调用方串行触发，
//! 通知链本身不做排队。

use alloc::{sync::Arc, vec::Vec};
use lazy_static::lazy_static;
use sync::RwLock;

use super::NetDevice;

/// netdevice 生命周期事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetdevEvent {
    /// 设备注册
    Register,
    /// 设备注销
    Unregister,
    /// 链路启用
    Up,
    /// 链路停用
    Down,
    /// 设备改名
    ChangeName,
}

/// 通知链订阅者
pub trait NetdevNotifier: Send + Sync {
    /// 处理一个 netdevice 事件
    ///
    /// 与事件无关的订阅者应直接忽略；返回值不反馈给派发方。
    fn netdev_event(&self, event: NetdevEvent, dev: &Arc<dyn NetDevice>);
}

/// 通知链操作错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierError {
    /// 订阅者已在链上
    AlreadyRegistered,
    /// 订阅者不在链上
    NotRegistered,
}

lazy_static! {
    // NOTE: 只在订阅/退订时有写操作，派发路径均为读操作
    static ref NETDEV_NOTIFIERS: RwLock<Vec<Arc<dyn NetdevNotifier>>> = RwLock::new(Vec::new());
}

/// 订阅 netdevice 事件
pub fn register_netdev_notifier(notifier: Arc<dyn NetdevNotifier>) -> Result<(), NotifierError> {
    let mut notifiers = NETDEV_NOTIFIERS.write();
    if notifiers.iter().any(|n| Arc::ptr_eq(n, &notifier)) {
        return Err(NotifierError::AlreadyRegistered);
    }
    notifiers.push(notifier);
    Ok(())
}

/// 退订 netdevice 事件
pub fn unregister_netdev_notifier(
    notifier: &Arc<dyn NetdevNotifier>,
) -> Result<(), NotifierError> {
    let mut notifiers = NETDEV_NOTIFIERS.write();
    let before = notifiers.len();
    notifiers.retain(|n| !Arc::ptr_eq(n, notifier));
    if notifiers.len() == before {
        return Err(NotifierError::NotRegistered);
    }
    Ok(())
}

/// 向所有订阅者派发事件
///
/// 先摘快照再调用，订阅者回调中可以访问注册表。
pub(crate) fn call_netdev_notifiers(event: NetdevEvent, dev: &Arc<dyn NetDevice>) {
    let snapshot: Vec<Arc<dyn NetdevNotifier>> = NETDEV_NOTIFIERS.read().clone();
    for notifier in snapshot {
        notifier.netdev_event(event, dev);
    }
}
