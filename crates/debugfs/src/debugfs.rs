//! 文件树的全局入口
//!
//! 仿照内核 debugfs 的接口形态：在全局根目录下建目录、建文件、
//! 递归删除、按路径查找。

use alloc::sync::Arc;
use lazy_static::lazy_static;

use crate::node::{ContentGenerator, DebugNode};
use crate::{FileMode, FsError};

lazy_static! {
    /// 伪文件系统根目录
    pub static ref DEBUGFS_ROOT: Arc<DebugNode> =
        DebugNode::new_dir("/", FileMode::from_bits_truncate(0o555));
}

fn valid_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(FsError::InvalidArgument);
    }
    Ok(())
}

/// 创建目录
///
/// `parent` 为 None 时挂在根目录下。
pub fn create_dir(
    name: &str,
    parent: Option<&Arc<DebugNode>>,
) -> Result<Arc<DebugNode>, FsError> {
    valid_name(name)?;
    let parent = parent.unwrap_or(&DEBUGFS_ROOT);
    let dir = DebugNode::new_dir(name, FileMode::from_bits_truncate(0o555));
    parent.add_child(name, &dir)?;
    Ok(dir)
}

/// 创建只读文件
///
/// 内容在每次读取时由 `generator` 生成。
pub fn create_file(
    name: &str,
    mode: FileMode,
    parent: Option<&Arc<DebugNode>>,
    generator: Arc<dyn ContentGenerator>,
) -> Result<Arc<DebugNode>, FsError> {
    valid_name(name)?;
    let parent = parent.unwrap_or(&DEBUGFS_ROOT);
    let file = DebugNode::new_file(name, mode, generator);
    parent.add_child(name, &file)?;
    Ok(file)
}

/// 递归删除节点及其整棵子树
///
/// 分两步：先把节点从父目录摘除，此后新的路径查找得到
/// [`FsError::NotFound`]；再自上而下关闭子树中每个节点的 pin 门
/// （父目录先关门，与它竞争的创建会被拒绝或一并收走），等待
/// 在途读者离开。返回时保证不再有读者访问该子树。
///
/// 对已删除的节点调用是 no-op。
pub fn remove_recursive(node: &Arc<DebugNode>) {
    node.detach();
    node.close_subtree();
}

/// 按绝对路径从根目录查找节点
///
/// 路径形如 `"ndl/rtd"`，不以 `/` 开头也可。
pub fn lookup(path: &str) -> Result<Arc<DebugNode>, FsError> {
    let mut node = Arc::clone(&DEBUGFS_ROOT);
    for component in path.split('/').filter(|c| !c.is_empty()) {
        node = node.lookup_child(component)?;
    }
    Ok(node)
}
