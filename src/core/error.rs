//! 错误处理模块
//!
//! 定义了几何体摄取流程中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 为每种错误类型提供清晰的上下文信息
//! - 支持错误链（error source）
//! - 易于模式匹配和错误处理
//! - 解析逻辑只返回错误，不记录日志，由调用方决定如何报告

use std::fmt;
use std::path::PathBuf;

/// 统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, DistGeometryError>;

/// DistGeometry 的错误类型
///
/// 包含了模型加载过程中可能遇到的各种错误情况。
/// 所有错误对单次加载调用都是致命的，失败的加载不产生任何模型数据。
#[derive(Debug)]
pub enum DistGeometryError {
    /// 配置错误
    Config(ConfigError),

    /// 网格加载错误（OBJ 文本路径）
    MeshLoading(MeshLoadError),

    /// 场景导入错误（glTF 场景图路径）
    SceneImport(SceneImportError),

    /// IO 错误
    Io(std::io::Error),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 网格加载相关的错误
#[derive(Debug)]
pub enum MeshLoadError {
    /// 文件不存在或无法打开
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 行级解析失败（数值分量缺失或非法）
    ParseError { line: usize, message: String },

    /// 面顶点 token 无法分解为三个整数索引
    MalformedFaceToken { line: usize, token: String },

    /// 解码出的索引超出对应属性池的范围
    VertexIndexOutOfRange {
        line: usize,
        attribute: &'static str,
        index: i64,
        pool_len: usize,
    },

    /// 面的顶点数既不是 3 也不是 4
    UnsupportedFaceArity { line: usize, arity: usize },

    /// 网格数据验证失败
    ValidationError(String),
}

/// 场景图导入相关的错误
///
/// 每个变体对应导入序列中一个阶段的失败，携带 SDK 的原生诊断信息。
#[derive(Debug)]
pub enum SceneImportError {
    /// 无法获取 SDK 会话（读取源文件字节失败）
    SdkInitialization(String),

    /// 导入器初始化失败（文档解析失败）
    ImportInitialization(String),

    /// 场景内容导入失败（缓冲数据解析失败）
    SceneImport(String),

    /// 场景没有根节点
    MissingRootNode,
}

impl fmt::Display for DistGeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistGeometryError::Config(e) => write!(f, "Configuration error: {}", e),
            DistGeometryError::MeshLoading(e) => write!(f, "Mesh loading error: {}", e),
            DistGeometryError::SceneImport(e) => write!(f, "Scene import error: {}", e),
            DistGeometryError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::FileNotFound(path) => {
                write!(f, "Mesh file not found: {}", path.display())
            }
            MeshLoadError::UnsupportedFormat(msg) => {
                write!(f, "Unsupported mesh format: {}", msg)
            }
            MeshLoadError::ParseError { line, message } => {
                write!(f, "Failed to parse mesh at line {}: {}", line, message)
            }
            MeshLoadError::MalformedFaceToken { line, token } => {
                write!(f, "Malformed face token '{}' at line {}", token, line)
            }
            MeshLoadError::VertexIndexOutOfRange {
                line,
                attribute,
                index,
                pool_len,
            } => {
                write!(
                    f,
                    "Vertex {} index {} out of range at line {} (pool size {})",
                    attribute, index, line, pool_len
                )
            }
            MeshLoadError::UnsupportedFaceArity { line, arity } => {
                write!(f, "Unsupported face with {} vertices at line {}", arity, line)
            }
            MeshLoadError::ValidationError(msg) => {
                write!(f, "Mesh validation failed: {}", msg)
            }
        }
    }
}

impl fmt::Display for SceneImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneImportError::SdkInitialization(msg) => {
                write!(f, "SDK initialization failed: {}", msg)
            }
            SceneImportError::ImportInitialization(msg) => {
                write!(f, "Importer initialization failed: {}", msg)
            }
            SceneImportError::SceneImport(msg) => write!(f, "Scene import failed: {}", msg),
            SceneImportError::MissingRootNode => write!(f, "Scene has no root node"),
        }
    }
}

impl std::error::Error for DistGeometryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DistGeometryError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for MeshLoadError {}
impl std::error::Error for SceneImportError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for DistGeometryError {
    fn from(err: std::io::Error) -> Self {
        DistGeometryError::Io(err)
    }
}

impl From<ConfigError> for DistGeometryError {
    fn from(err: ConfigError) -> Self {
        DistGeometryError::Config(err)
    }
}

impl From<MeshLoadError> for DistGeometryError {
    fn from(err: MeshLoadError) -> Self {
        DistGeometryError::MeshLoading(err)
    }
}

impl From<SceneImportError> for DistGeometryError {
    fn from(err: SceneImportError) -> Self {
        DistGeometryError::SceneImport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mesh_load_error() {
        let err = MeshLoadError::MalformedFaceToken {
            line: 7,
            token: "1//3".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed face token '1//3' at line 7");
    }

    #[test]
    fn test_display_wrapped_error() {
        let err: DistGeometryError = SceneImportError::MissingRootNode.into();
        assert_eq!(err.to_string(), "Scene import error: Scene has no root node");
    }

    #[test]
    fn test_from_conversions() {
        let err: DistGeometryError = MeshLoadError::UnsupportedFormat("xyz".to_string()).into();
        assert!(matches!(err, DistGeometryError::MeshLoading(_)));

        let err: DistGeometryError = ConfigError::ParseError("bad toml".to_string()).into();
        assert!(matches!(err, DistGeometryError::Config(_)));
    }
}
