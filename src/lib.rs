//! DistGeometry - 几何体摄取库
//!
//! 将磁盘上的 3D 模型描述解析为与渲染器无关的网格表示：
//! 去重后的顶点列表、三角形索引列表，以及引用到的纹理文件名集合。
//! 支持两条加载路径：逐行解析的 OBJ 文本格式，
//! 以及通过外部 SDK 导入的 glTF 场景图格式。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（数学、日志、配置、错误处理）
//! - `geometry`: 几何体模块（顶点、网格、模型、OBJ/glTF 加载器）
//!
//! # 架构概览
//!
//! ```text
//! 文件 (OBJ/glTF)
//!     ↓
//! Loader (ObjLoader/GltfLoader)
//!     ↓
//! Model (CPU侧数据：网格 + 纹理文件名)
//!     ↓
//! 渲染层（上传到GPU，外部）
//! ```
//!
//! # 使用示例
//!
//! ```no_run
//! use dist_geometry::geometry::loaders::load_model_auto;
//! use std::path::Path;
//!
//! let model = load_model_auto(Path::new("assets/scene.gltf"))?;
//! for mesh in &model.meshes {
//!     println!("网格 {:?}: {} 个顶点", mesh.name, mesh.vertex_count());
//! }
//! # Ok::<(), dist_geometry::core::error::DistGeometryError>(())
//! ```

pub mod core;
pub mod geometry;
