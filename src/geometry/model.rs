//! 模型资源模块
//!
//! 定义一次加载调用的完整产物：网格列表与纹理文件名集合。

use std::collections::BTreeSet;
use std::path::Path;

use super::mesh::MeshData;
use crate::core::error::Result;

/// 模型文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// Wavefront OBJ 文本格式（逐行指令）
    Obj,
    /// glTF 2.0 场景图格式（通过外部 SDK 导入）
    Gltf,
}

impl ModelFormat {
    /// 根据文件扩展名推断格式
    ///
    /// 扩展名不区分大小写；无法识别时返回 `None`。
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "obj" => Some(ModelFormat::Obj),
            "gltf" | "glb" => Some(ModelFormat::Gltf),
            _ => None,
        }
    }

    /// 获取格式名称
    pub fn name(&self) -> &'static str {
        match self {
            ModelFormat::Obj => "OBJ",
            ModelFormat::Gltf => "glTF",
        }
    }
}

/// 加载完成的模型
///
/// 由一次加载调用产生，加载后不可变，由调用方持有。
/// 失败的加载不产生 `Model`，因此交给渲染层的模型总是完整有效的。
///
/// `texture_file_names` 只收集文件名引用，
/// 纹理像素数据的读取和绑定由外部的纹理加载层完成。
#[derive(Debug, Clone)]
pub struct Model {
    /// 模型来源格式
    pub format: ModelFormat,

    /// 网格列表
    ///
    /// 顺序与文件内容或场景图深度优先遍历顺序一致。
    pub meshes: Vec<MeshData>,

    /// 引用到的纹理文件名集合
    pub texture_file_names: BTreeSet<String>,
}

impl Model {
    /// 创建一个空模型
    pub fn new(format: ModelFormat) -> Self {
        Self {
            format,
            meshes: Vec::new(),
            texture_file_names: BTreeSet::new(),
        }
    }

    /// 按指定格式从文件加载模型
    ///
    /// 每次调用都从头解析文件并返回独立的 `Model`，不做跨调用缓存。
    pub fn load<P: AsRef<Path>>(path: P, format: ModelFormat) -> Result<Self> {
        super::loaders::load_model(path.as_ref(), format)
    }

    /// 网格数量
    #[inline]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// 所有网格的顶点总数
    pub fn total_vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertex_count()).sum()
    }

    /// 所有网格的三角形总数
    pub fn total_triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangle_count()).sum()
    }
}
