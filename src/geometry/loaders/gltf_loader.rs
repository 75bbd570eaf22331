//! glTF 场景图加载器
//!
//! 使用 `gltf` crate 导入 glTF 2.0 场景：解析文档、解析缓冲数据、
//! 深度优先遍历节点层次。每个带几何体的节点提取为一个网格，
//! 同时收集材质绑定的纹理文件名。
//!
//! # 导入序列
//!
//! 1. 读取源文件字节
//! 2. 解析文档（`Gltf::from_slice`）
//! 3. 解析缓冲数据（外部 `.bin`、data URI、GLB blob）
//! 4. 取默认场景（缺失时退回第一个场景）
//! 5. 递归遍历节点，提取几何体和纹理引用
//!
//! 每个阶段失败都携带 SDK 的原生诊断信息并中止整次加载；
//! 文档和缓冲数据都是函数局部值，任何退出路径上都会释放。
//!
//! # 坐标规范化
//!
//! glTF 使用右手坐标系（+Y 向上），单位为米。导入时统一转换到
//! 引擎的左手坐标系目标：位置和法线的 Z 分量取反，
//! 三角形环绕方向翻转。单位保持米制。
//! 节点的层次变换在提取时直接烘焙进顶点数据。
//!
//! # 强制三角化
//!
//! 三角形带和三角形扇在提取时重写为三角形列表，
//! 下游永远不会见到非三角形的面。点和线不携带表面几何体，跳过。

use std::collections::BTreeSet;
use std::path::Path;

use gltf::mesh::Mode;

use super::ModelLoader;
use crate::core::error::{MeshLoadError, Result, SceneImportError};
use crate::core::math::{self, Matrix4};
use crate::geometry::mesh::MeshData;
use crate::geometry::model::{Model, ModelFormat};
use crate::geometry::vertex::Vertex;

/// 目标单位缩放：glTF 规定场景单位为米，与引擎目标单位一致
const UNIT_SCALE: f32 = 1.0;

/// glTF 格式加载器
///
/// 实现 `ModelLoader` trait，提供 glTF 2.0 场景的加载功能。
///
/// # 特性
///
/// - 支持 `.gltf`（JSON + 外部缓冲）和 `.glb`（二进制）两种容器
/// - 递归遍历场景层次，网格列表顺序与遍历顺序一致
/// - 节点变换烘焙进顶点，坐标系统一转换
/// - 收集所有材质通道（基础色、金属粗糙度、法线、遮蔽、自发光）
///   的纹理文件名
///
/// # 使用示例
///
/// ```rust,no_run
/// use dist_geometry::geometry::loaders::{GltfLoader, ModelLoader};
/// use std::path::Path;
///
/// let model = GltfLoader::load_from_file(Path::new("scene.gltf"))?;
/// println!("加载了 {} 个网格", model.mesh_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct GltfLoader;

impl ModelLoader for GltfLoader {
    fn load_from_file(path: &Path) -> Result<Model> {
        // 检查文件是否存在
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let data = std::fs::read(path)
            .map_err(|e| SceneImportError::SdkInitialization(e.to_string()))?;

        // 外部缓冲 URI 相对于场景文件所在目录解析
        let model = import_model(&data, path.parent())?;

        tracing::info!(
            "成功加载 glTF 场景: {} 个网格, {} 个纹理引用",
            model.mesh_count(),
            model.texture_file_names.len()
        );

        Ok(model)
    }

    fn load_from_memory(data: &[u8]) -> Result<Model> {
        // 无基准目录，只能解析内嵌（data URI / GLB blob）缓冲
        import_model(data, None)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["gltf", "glb"]
    }
}

/// 按阶段执行导入：文档解析、缓冲解析、场景遍历
fn import_model(data: &[u8], base: Option<&Path>) -> Result<Model> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(data)
        .map_err(|e| SceneImportError::ImportInitialization(e.to_string()))?;

    let buffers = gltf::import_buffers(&document, base, blob)
        .map_err(|e| SceneImportError::SceneImport(e.to_string()))?;

    // 默认场景缺失时退回第一个场景
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(SceneImportError::MissingRootNode)?;

    let mut model = Model::new(ModelFormat::Gltf);
    for node in scene.nodes() {
        visit_node(&node, &Matrix4::identity(), &buffers, &mut model)?;
    }

    for mesh in &model.meshes {
        mesh.validate().map_err(MeshLoadError::ValidationError)?;
    }

    Ok(model)
}

/// 深度优先访问一个节点及其子节点
///
/// 节点变换沿层次累乘；带几何体的节点提取为一个网格，
/// 子节点按场景图顺序处理。
fn visit_node(
    node: &gltf::Node,
    parent_matrix: &Matrix4,
    buffers: &[gltf::buffer::Data],
    model: &mut Model,
) -> Result<()> {
    // gltf 以列主序返回节点局部变换矩阵
    let local = Matrix4::from_column_slice(&node.transform().matrix().concat());
    let matrix = parent_matrix * local;

    if let Some(mesh) = node.mesh() {
        let mesh_data = extract_mesh(node, &mesh, &matrix, buffers, &mut model.texture_file_names)?;
        if mesh_data.vertex_count() > 0 {
            model.meshes.push(mesh_data);
        } else {
            tracing::warn!("节点 {:?} 没有可用的三角形几何体，已跳过", node.name());
        }
    }

    for child in node.children() {
        visit_node(&child, &matrix, buffers, model)?;
    }

    Ok(())
}

/// 从一个几何体节点提取网格
///
/// 节点网格的所有 primitive 合并为一个网格，索引按顶点偏移重定位。
/// 提取同时收集每个 primitive 材质绑定的纹理文件名。
fn extract_mesh(
    node: &gltf::Node,
    mesh: &gltf::Mesh,
    matrix: &Matrix4,
    buffers: &[gltf::buffer::Data],
    texture_file_names: &mut BTreeSet<String>,
) -> Result<MeshData> {
    const DEFAULT_NORMAL: [f32; 3] = [0.0; 3];
    const DEFAULT_UV: [f32; 2] = [0.0; 2];

    let name = node.name().or_else(|| mesh.name()).unwrap_or("Unnamed");
    let mut mesh_data = MeshData::with_name(name);
    let normal_mat = math::normal_matrix(matrix);

    for primitive in mesh.primitives() {
        let reader =
            primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

        let positions: Vec<[f32; 3]> = match reader.read_positions() {
            Some(iter) => iter.collect(),
            None => {
                return Err(SceneImportError::SceneImport(format!(
                    "网格 {:?} 的 primitive 缺少 POSITION 属性",
                    name
                ))
                .into())
            }
        };
        let vertex_count = positions.len();

        let normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map_or_else(|| vec![DEFAULT_NORMAL; vertex_count], Iterator::collect);
        let texcoords: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map_or_else(|| vec![DEFAULT_UV; vertex_count], |tc| tc.into_f32().collect());

        // 索引缺失时按顶点顺序合成（非索引化 primitive）
        let raw_indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertex_count as u32).collect(),
        };

        // 强制三角化：strip/fan 重写为三角形列表
        let triangles = match primitive.mode() {
            Mode::Triangles => raw_indices,
            Mode::TriangleStrip => strip_to_triangle_list(&raw_indices),
            Mode::TriangleFan => fan_to_triangle_list(&raw_indices),
            mode => {
                tracing::warn!("网格 {:?} 含不支持的 primitive 模式 {:?}，已跳过", name, mode);
                continue;
            }
        };

        let base = mesh_data.vertices.len() as u32;
        for i in 0..vertex_count {
            // 属性流比位置流短时（数据不完整）补默认值
            let normal = normals.get(i).copied().unwrap_or(DEFAULT_NORMAL);
            let texcoord = texcoords.get(i).copied().unwrap_or(DEFAULT_UV);

            let position = to_target_position(math::transform_point(matrix, positions[i]));
            let normal = to_target_direction(math::transform_normal(&normal_mat, normal));
            mesh_data
                .vertices
                .push(Vertex::new(position, texcoord, normal));
        }

        // 左手坐标系下翻转三角形环绕方向
        for triangle in triangles.chunks_exact(3) {
            mesh_data.indices.push(base + triangle[0]);
            mesh_data.indices.push(base + triangle[2]);
            mesh_data.indices.push(base + triangle[1]);
        }

        collect_texture_names(&primitive.material(), texture_file_names);
    }

    Ok(mesh_data)
}

/// 把右手坐标系下的位置转换到引擎的左手坐标系目标
#[inline]
fn to_target_position(p: [f32; 3]) -> [f32; 3] {
    [p[0] * UNIT_SCALE, p[1] * UNIT_SCALE, -p[2] * UNIT_SCALE]
}

/// 把右手坐标系下的方向向量转换到引擎的左手坐标系目标
///
/// 方向向量不参与单位缩放。
#[inline]
fn to_target_direction(v: [f32; 3]) -> [f32; 3] {
    [v[0], v[1], -v[2]]
}

/// 把三角形带重写为三角形列表
///
/// 奇数位三角形交换前两个索引以保持一致的环绕方向。
fn strip_to_triangle_list(indices: &[u32]) -> Vec<u32> {
    if indices.len() < 3 {
        return Vec::new();
    }

    let mut list = Vec::with_capacity((indices.len() - 2) * 3);
    for i in 0..indices.len() - 2 {
        if i % 2 == 0 {
            list.extend_from_slice(&[indices[i], indices[i + 1], indices[i + 2]]);
        } else {
            list.extend_from_slice(&[indices[i + 1], indices[i], indices[i + 2]]);
        }
    }
    list
}

/// 把三角形扇重写为三角形列表，所有三角形共享第一个顶点
fn fan_to_triangle_list(indices: &[u32]) -> Vec<u32> {
    if indices.len() < 3 {
        return Vec::new();
    }

    let mut list = Vec::with_capacity((indices.len() - 2) * 3);
    for i in 1..indices.len() - 1 {
        list.extend_from_slice(&[indices[0], indices[i], indices[i + 1]]);
    }
    list
}

/// 收集一个材质绑定的所有纹理文件名
///
/// 只收集以外部 URI 引用的贴图；内嵌数据（data URI、GLB 缓冲视图）
/// 没有文件名，由外部纹理加载层另行处理。
fn collect_texture_names(material: &gltf::Material, names: &mut BTreeSet<String>) {
    let mut push = |texture: gltf::Texture| {
        if let gltf::image::Source::Uri { uri, .. } = texture.source().source() {
            if !uri.starts_with("data:") {
                names.insert(uri.to_string());
            }
        }
    };

    let pbr = material.pbr_metallic_roughness();
    if let Some(info) = pbr.base_color_texture() {
        push(info.texture());
    }
    if let Some(info) = pbr.metallic_roughness_texture() {
        push(info.texture());
    }
    if let Some(info) = material.normal_texture() {
        push(info.texture());
    }
    if let Some(info) = material.occlusion_texture() {
        push(info.texture());
    }
    if let Some(info) = material.emissive_texture() {
        push(info.texture());
    }
}
