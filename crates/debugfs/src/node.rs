//! 文件树节点
//!
//! [`DebugNode`] 是树中的一个目录或文件。目录持有子节点表；
//! 文件持有一个 [`ContentGenerator`]，内容在每次读取时重新生成。

use core::sync::atomic::{AtomicUsize, Ordering};

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    sync::{Arc, Weak},
    vec::Vec,
};
use sync::{PinGate, SpinLock};

use crate::{FileMode, FsError};

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// 只读文件
    File,
    /// 目录
    Directory,
}

/// 动态内容生成器 trait
///
/// 文件内容每次读取时重新生成；生成器自身必须无锁或只依赖
/// 创建时捕获的数据，读路径不允许回头拿树上的锁。
pub trait ContentGenerator: Send + Sync {
    /// 生成文件内容
    fn generate(&self) -> Result<Vec<u8>, FsError>;
}

/// 节点内容
enum NodeContent {
    /// 目录（子节点表）
    Directory(SpinLock<BTreeMap<String, Arc<DebugNode>>>),
    /// 动态文件
    File(Arc<dyn ContentGenerator>),
}

/// 全局 inode 编号分配器
static NEXT_INODE_NO: AtomicUsize = AtomicUsize::new(1);

/// 文件树中的一个节点
pub struct DebugNode {
    name: String,
    inode_no: usize,
    mode: FileMode,
    parent: SpinLock<Weak<DebugNode>>,
    content: NodeContent,
    gate: PinGate,
}

impl DebugNode {
    pub(crate) fn new_dir(name: &str, mode: FileMode) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            inode_no: NEXT_INODE_NO.fetch_add(1, Ordering::Relaxed),
            mode: (mode & !FileMode::S_IFMT) | FileMode::S_IFDIR,
            parent: SpinLock::new(Weak::new()),
            content: NodeContent::Directory(SpinLock::new(BTreeMap::new())),
            gate: PinGate::new(),
        })
    }

    pub(crate) fn new_file(
        name: &str,
        mode: FileMode,
        generator: Arc<dyn ContentGenerator>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            inode_no: NEXT_INODE_NO.fetch_add(1, Ordering::Relaxed),
            mode: (mode & !FileMode::S_IFMT) | FileMode::S_IFREG,
            parent: SpinLock::new(Weak::new()),
            content: NodeContent::File(generator),
            gate: PinGate::new(),
        })
    }

    /// 节点名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// inode 编号
    pub fn inode_no(&self) -> usize {
        self.inode_no
    }

    /// 权限和类型位
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// 节点类型
    pub fn node_type(&self) -> NodeType {
        match self.content {
            NodeContent::Directory(_) => NodeType::Directory,
            NodeContent::File(_) => NodeType::File,
        }
    }

    /// 是否为目录
    pub fn is_dir(&self) -> bool {
        self.node_type() == NodeType::Directory
    }

    /// 从指定偏移量读取文件内容
    ///
    /// 先 pin 住节点，再调用生成器；节点已被拆除时返回
    /// [`FsError::ResourceGone`]。偏移量越过内容末尾返回 0 字节，
    /// 即标准的可寻址读语义。
    pub fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        let generator = match &self.content {
            NodeContent::File(generator) => generator,
            NodeContent::Directory(_) => return Err(FsError::IsDirectory),
        };

        let _pin = self.gate.pin().ok_or(FsError::ResourceGone)?;

        let data = generator.generate()?;
        if offset >= data.len() {
            return Ok(0);
        }
        let to_read = (data.len() - offset).min(buf.len());
        buf[..to_read].copy_from_slice(&data[offset..offset + to_read]);
        Ok(to_read)
    }

    /// 写入（伪文件系统整体只读）
    pub fn write_at(&self, _offset: usize, _buf: &[u8]) -> Result<usize, FsError> {
        Err(FsError::PermissionDenied)
    }

    /// 在目录中查找子节点
    pub fn lookup_child(&self, name: &str) -> Result<Arc<DebugNode>, FsError> {
        match &self.content {
            NodeContent::Directory(children) => {
                children.lock().get(name).cloned().ok_or(FsError::NotFound)
            }
            NodeContent::File(_) => Err(FsError::NotDirectory),
        }
    }

    /// 列出目录中的子节点名
    pub fn child_names(&self) -> Result<Vec<String>, FsError> {
        match &self.content {
            NodeContent::Directory(children) => Ok(children.lock().keys().cloned().collect()),
            NodeContent::File(_) => Err(FsError::NotDirectory),
        }
    }

    pub(crate) fn add_child(
        self: &Arc<Self>,
        name: &str,
        child: &Arc<DebugNode>,
    ) -> Result<(), FsError> {
        let children = match &self.content {
            NodeContent::Directory(children) => children,
            NodeContent::File(_) => return Err(FsError::NotDirectory),
        };

        let mut children = children.lock();
        // 关门检查必须持着子表锁做：close_subtree 先关门再清表，
        // 这里看到门开着就能保证本次插入会被后续的清表收走
        if self.gate.is_closed() {
            return Err(FsError::ResourceGone);
        }
        if children.contains_key(name) {
            return Err(FsError::AlreadyExists);
        }
        *child.parent.lock() = Arc::downgrade(self);
        children.insert(name.to_string(), Arc::clone(child));
        Ok(())
    }

    /// 把自己从父目录摘除；已摘除时为 no-op
    pub(crate) fn detach(self: &Arc<Self>) {
        let parent = core::mem::take(&mut *self.parent.lock());
        if let Some(parent) = parent.upgrade() {
            if let NodeContent::Directory(children) = &parent.content {
                let mut children = children.lock();
                if let Some(entry) = children.get(&self.name) {
                    if Arc::ptr_eq(entry, self) {
                        children.remove(&self.name);
                    }
                }
            }
        }
    }

    /// 关闭整棵子树的 pin 门，等在途读者离开
    ///
    /// 先关自己的门再清空子表：与 `add_child` 的持锁检查配合，
    /// 竞争窗口内插进来的子节点必然被清表收走并随之关闭，
    /// 不会留下门还开着的孤儿。目录节点不会被 pin，关门不等待；
    /// 文件节点的关门会等在途读者离开。
    pub(crate) fn close_subtree(self: &Arc<Self>) {
        self.gate.close();
        if let NodeContent::Directory(children) = &self.content {
            // 整表摘下来再关子节点，不持着子表锁等待读者
            let orphans: Vec<Arc<DebugNode>> =
                core::mem::take(&mut *children.lock()).into_values().collect();
            for child in &orphans {
                child.close_subtree();
            }
        }
    }
}
