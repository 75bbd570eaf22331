//! 核心功能模块
//!
//! 本模块提供几何体摄取流程的基础设施，包括数学类型、日志系统、
//! 配置管理和错误处理。这些模块与具体的模型文件格式无关。
//!
//! # 模块组织
//!
//! - `math`：数学库，基于 nalgebra 的向量和矩阵类型
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `config`：配置管理，支持从 TOML 配置文件加载设置
//! - `error`：错误处理，定义统一的错误类型

pub mod math;
pub mod log;
pub mod config;
pub mod error;

// 重新导出常用类型，方便使用
pub use math::{Matrix3, Matrix4, Vector3, Vector4};
pub use error::{DistGeometryError, Result};
pub use config::Config;
