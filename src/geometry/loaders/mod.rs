//! 模型加载器模块
//!
//! 提供统一的模型加载接口和各种格式的具体实现。
//!
//! # 支持的格式
//!
//! - **OBJ**: Wavefront OBJ 文本格式（逐行解析）
//! - **glTF**: glTF 2.0 场景图格式（使用 gltf crate）
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use dist_geometry::geometry::loaders::{ModelLoader, ObjLoader};
//! use std::path::Path;
//!
//! let model = ObjLoader::load_from_file(Path::new("model.obj"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::model::{Model, ModelFormat};
use std::path::Path;

pub mod obj_loader;
pub mod gltf_loader;

// 重新导出加载器
pub use obj_loader::ObjLoader;
pub use gltf_loader::GltfLoader;

/// 模型加载器 trait
///
/// 定义统一的加载接口，所有格式的加载器都实现此 trait。
/// 这种设计允许轻松添加新的文件格式支持。
///
/// # 实现要求
///
/// - 加载器应该是无状态的（使用静态方法）
/// - 返回 CPU 侧的 `Model`，不涉及 GPU 资源
/// - 加载过程中获取的所有解析状态在返回前释放
/// - 失败时返回具体的错误类型，不产生部分模型
pub trait ModelLoader {
    /// 从文件路径加载模型
    ///
    /// # 返回
    ///
    /// - `Ok(Model)`: 加载成功，返回完整的模型数据
    /// - `Err(DistGeometryError)`: 加载失败（文件不存在、解析错误等）
    fn load_from_file(path: &Path) -> Result<Model>;

    /// 从内存数据加载模型
    ///
    /// # 参数
    ///
    /// - `data`: 文件内容的字节数组
    fn load_from_memory(data: &[u8]) -> Result<Model>;

    /// 获取支持的文件扩展名列表
    ///
    /// # 返回
    ///
    /// 支持的扩展名数组（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 按声明的格式加载模型
///
/// 模型资源的统一入口：根据 `format` 分发到对应的加载器。
/// 每次调用都从头解析文件并返回独立的 `Model`。
pub fn load_model(path: &Path, format: ModelFormat) -> Result<Model> {
    match format {
        ModelFormat::Obj => ObjLoader::load_from_file(path),
        ModelFormat::Gltf => GltfLoader::load_from_file(path),
    }
}

/// 根据文件扩展名选择合适的加载器
///
/// # 返回
///
/// - `Ok(Model)`: 成功加载
/// - `Err(DistGeometryError)`: 不支持的格式或加载失败
///
/// # 示例
///
/// ```rust,no_run
/// use dist_geometry::geometry::loaders::load_model_auto;
/// use std::path::Path;
///
/// let model = load_model_auto(Path::new("model.obj"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_model_auto(path: &Path) -> Result<Model> {
    let format = ModelFormat::from_extension(path).ok_or_else(|| {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(无扩展名)");
        MeshLoadError::UnsupportedFormat(format!("不支持的文件格式: .{}", extension))
    })?;

    load_model(path, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DistGeometryError;

    #[test]
    fn test_supported_extensions() {
        let obj_exts = ObjLoader::supported_extensions();
        assert!(obj_exts.contains(&"obj"));

        let gltf_exts = GltfLoader::supported_extensions();
        assert!(gltf_exts.contains(&"gltf"));
        assert!(gltf_exts.contains(&"glb"));
    }

    #[test]
    fn test_load_model_auto_unknown_extension() {
        let result = load_model_auto(Path::new("model.xyz"));
        assert!(matches!(
            result,
            Err(DistGeometryError::MeshLoading(
                MeshLoadError::UnsupportedFormat(_)
            ))
        ));
    }

    #[test]
    fn test_load_model_nonexistent_file() {
        let result = load_model(Path::new("does_not_exist.obj"), ModelFormat::Obj);
        assert!(matches!(
            result,
            Err(DistGeometryError::MeshLoading(MeshLoadError::FileNotFound(
                _
            )))
        ));
    }
}
