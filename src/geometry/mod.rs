//! 几何体加载和处理模块
//!
//! 提供3D模型加载功能，支持 OBJ 文本格式和 glTF 场景图格式。
//! 包含顶点定义、网格数据结构、模型容器以及各格式的加载器。
//!
//! # 模块结构
//!
//! - `vertex`: 顶点数据结构定义
//! - `mesh`: 网格数据结构
//! - `model`: 模型容器与格式枚举
//! - `loaders`: 各种格式的模型加载器
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use dist_geometry::geometry::loaders::{ModelLoader, ObjLoader};
//! use std::path::Path;
//!
//! // 加载OBJ模型
//! let model = ObjLoader::load_from_file(Path::new("model.obj"))?;
//!
//! println!("顶点数: {}", model.total_vertex_count());
//! println!("三角形数: {}", model.total_triangle_count());
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod vertex;
pub mod mesh;
pub mod model;
pub mod loaders;

// 重新导出常用类型
pub use vertex::Vertex;
pub use mesh::MeshData;
pub use model::{Model, ModelFormat};
