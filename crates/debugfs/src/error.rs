//! 伪文件系统错误类型
//!
//! 与 POSIX errno 对应的错误码，可通过 [`FsError::to_errno()`]
//! 转换为系统调用错误码。

/// 伪文件系统错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// 文件不存在 (-ENOENT)
    NotFound,
    /// 文件已存在 (-EEXIST)
    AlreadyExists,
    /// 不是目录 (-ENOTDIR)
    NotDirectory,
    /// 是目录 (-EISDIR)
    IsDirectory,
    /// 权限被拒绝 (-EACCES)
    PermissionDenied,
    /// 无效参数 (-EINVAL)
    InvalidArgument,
    /// I/O 错误 (-EIO)
    IoError,
    /// 节点正在或已经被拆除 (-EIO)
    ///
    /// 读者与拆除竞争时从 pin 门得到的错误。
    ResourceGone,
}

impl FsError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        match self {
            FsError::NotFound => -2,
            FsError::IoError => -5,
            FsError::ResourceGone => -5,
            FsError::PermissionDenied => -13,
            FsError::AlreadyExists => -17,
            FsError::NotDirectory => -20,
            FsError::IsDirectory => -21,
            FsError::InvalidArgument => -22,
        }
    }
}
