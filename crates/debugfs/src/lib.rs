//! 诊断伪文件系统
//!
//! 一个内存中的 debugfs 风格文件树，驱动用它向外暴露只读的诊断
//! 入口。文件内容不落盘，每次读取时由 [`ContentGenerator`] 现场
//! 生成。
//!
//! # 与拆除的并发
//!
//! 文件节点内置一个 [`sync::PinGate`]：每次读取先 pin 住节点，
//! 读完释放；[`remove_recursive`] 先把子树从父目录摘除（之后的
//! 路径查找得到 [`FsError::NotFound`]），再逐节点关门，等在途
//! 读者离开。读者拿着过期句柄再读，得到 [`FsError::ResourceGone`]，
//! 不会访问到已拆除的后端资源。

#![no_std]
#![allow(clippy::module_inception)]

extern crate alloc;

mod debugfs;
mod error;
mod mode;
mod node;

pub use debugfs::{DEBUGFS_ROOT, create_dir, create_file, lookup, remove_recursive};
pub use error::FsError;
pub use mode::FileMode;
pub use node::{ContentGenerator, DebugNode, NodeType};
