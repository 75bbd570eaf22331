//! OBJ 文件加载器
//!
//! 逐行解析 Wavefront OBJ 文本格式的 3D 模型。
//! 支持顶点位置、纹理坐标、法线和三角形/四边形面；
//! 面顶点按 位置/UV/法线 索引三元组去重，
//! 每个唯一的属性组合只产生一个输出顶点。
//!
//! # 支持的指令
//!
//! - `v x y z`: 顶点位置
//! - `vt u v`: 纹理坐标
//! - `vn x y z`: 法线
//! - `f a/b/c a/b/c a/b/c [a/b/c]`: 三角形或四边形面，
//!   每个 token 是 1 基的 `位置/UV/法线` 索引三元组
//!
//! 其他指令（`o`、`g`、`s`、`usemtl`、注释等）一律忽略，
//! 以兼容携带未支持指令的文件。

use std::collections::HashMap;
use std::path::Path;

use super::ModelLoader;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::MeshData;
use crate::geometry::model::{Model, ModelFormat};
use crate::geometry::vertex::Vertex;

/// 面顶点键：一个 `位置/UV/法线` token 解码出的三个整数索引
///
/// 索引保持文件中的 1 基原始值。两个面顶点引用同一个输出顶点，
/// 当且仅当三个索引完全相同。
type FaceKey = (i64, i64, i64);

/// OBJ 格式加载器
///
/// 实现 `ModelLoader` trait，提供 OBJ 文件的加载功能。
///
/// # 特性
///
/// - 单遍逐行解析，无整文件回溯
/// - 面顶点按索引三元组去重（重复引用共享同一个输出顶点）
/// - 四边形面按扇形切分为两个三角形
/// - 顶点数不是 3 或 4 的面视为错误，中止整次加载
///
/// # 使用示例
///
/// ```rust,no_run
/// use dist_geometry::geometry::loaders::{ModelLoader, ObjLoader};
/// use std::path::Path;
///
/// let model = ObjLoader::load_from_file(Path::new("model.obj"))?;
/// println!("加载了 {} 个顶点", model.total_vertex_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ObjLoader;

impl ModelLoader for ObjLoader {
    fn load_from_file(path: &Path) -> Result<Model> {
        // 检查文件是否存在
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let source = std::fs::read_to_string(path)
            .map_err(|_| MeshLoadError::FileNotFound(path.to_path_buf()))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unnamed");

        let mesh = build_mesh(&source, Some(name))?;

        tracing::info!(
            "成功加载 OBJ 文件: {} 个顶点, {} 个三角形",
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        let mut model = Model::new(ModelFormat::Obj);
        model.meshes.push(mesh);
        Ok(model)
    }

    fn load_from_memory(data: &[u8]) -> Result<Model> {
        let source = std::str::from_utf8(data).map_err(|_| MeshLoadError::ParseError {
            line: 0,
            message: "OBJ 数据不是有效的 UTF-8 文本".to_string(),
        })?;

        let mesh = build_mesh(source, None)?;

        let mut model = Model::new(ModelFormat::Obj);
        model.meshes.push(mesh);
        Ok(model)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

/// 从 OBJ 文本构建一个网格
///
/// 解析状态（属性池、顶点缓存）的生命周期只覆盖这一次构建，
/// 返回前全部释放。任何行级错误都中止构建，不返回部分网格。
fn build_mesh(source: &str, name: Option<&str>) -> Result<MeshData> {
    let mut builder = MeshBuilder::new();

    for (index, line) in source.lines().enumerate() {
        builder.parse_line(line, index + 1)?;
    }

    let mesh = builder.finish(name);
    mesh.validate().map_err(MeshLoadError::ValidationError)?;
    Ok(mesh)
}

/// 单次网格构建的解析状态
///
/// 三个属性池按文件顺序填充，内部使用 0 基索引；
/// 文件中的面指令用 1 基索引引用它们，查池前先减一。
/// 顶点缓存将面顶点键映射到输出顶点槽位，构建结束后即丢弃。
struct MeshBuilder {
    positions: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    vertex_cache: HashMap<FaceKey, u32>,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn new() -> Self {
        Self {
            positions: Vec::new(),
            texcoords: Vec::new(),
            normals: Vec::new(),
            vertex_cache: HashMap::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// 解析一行指令
    ///
    /// 无前瞻：每行独立处理，行首 token 决定指令类型。
    fn parse_line(&mut self, line: &str, line_number: usize) -> std::result::Result<(), MeshLoadError> {
        let mut tokens = line.split_whitespace();

        let header = match tokens.next() {
            Some(header) => header,
            None => return Ok(()), // 空行
        };

        match header {
            "vt" => parse_vec2(&mut tokens, &mut self.texcoords, line_number),
            "vn" => parse_vec3(&mut tokens, &mut self.normals, line_number),
            "v" => parse_vec3(&mut tokens, &mut self.positions, line_number),
            "f" => self.parse_face(tokens, line_number),
            // 其他指令一律忽略
            _ => Ok(()),
        }
    }

    /// 解析一个面指令
    ///
    /// 把剩余 token 逐个经顶点缓存解析为输出索引，
    /// 再按面顶点数三角化进索引列表。
    fn parse_face<'a>(
        &mut self,
        tokens: impl Iterator<Item = &'a str>,
        line_number: usize,
    ) -> std::result::Result<(), MeshLoadError> {
        let mut face_indices = Vec::with_capacity(4);

        for token in tokens {
            face_indices.push(self.resolve_face_vertex(token, line_number)?);
        }

        triangulate_face(&face_indices, &mut self.indices, line_number)
    }

    /// 把一个面顶点 token 解析为输出顶点索引
    ///
    /// 首次出现的键：解码三个 1 基索引，减一后对各自的属性池做
    /// 范围检查，全部通过才构造顶点、登记缓存。
    /// 重复出现的键：直接返回已登记的索引，不再重复验证。
    /// 任一检查失败都中止整次构建，缓存不会登记未通过验证的顶点。
    fn resolve_face_vertex(
        &mut self,
        token: &str,
        line_number: usize,
    ) -> std::result::Result<u32, MeshLoadError> {
        let key = decode_face_token(token).ok_or_else(|| MeshLoadError::MalformedFaceToken {
            line: line_number,
            token: token.to_string(),
        })?;

        if let Some(&index) = self.vertex_cache.get(&key) {
            return Ok(index);
        }

        // 文件中的索引是 1 基的，先减一再查池
        let position = fetch(&self.positions, key.0 - 1).ok_or(
            MeshLoadError::VertexIndexOutOfRange {
                line: line_number,
                attribute: "position",
                index: key.0,
                pool_len: self.positions.len(),
            },
        )?;
        let texcoord = fetch(&self.texcoords, key.1 - 1).ok_or(
            MeshLoadError::VertexIndexOutOfRange {
                line: line_number,
                attribute: "texcoord",
                index: key.1,
                pool_len: self.texcoords.len(),
            },
        )?;
        let normal = fetch(&self.normals, key.2 - 1).ok_or(
            MeshLoadError::VertexIndexOutOfRange {
                line: line_number,
                attribute: "normal",
                index: key.2,
                pool_len: self.normals.len(),
            },
        )?;

        self.vertices.push(Vertex::new(position, texcoord, normal));
        let index = (self.vertices.len() - 1) as u32;
        self.vertex_cache.insert(key, index);
        Ok(index)
    }

    /// 结束构建，产出网格数据
    fn finish(self, name: Option<&str>) -> MeshData {
        let mut mesh = match name {
            Some(name) => MeshData::with_name(name),
            None => MeshData::new(),
        };
        mesh.vertices = self.vertices;
        mesh.indices = self.indices;
        mesh
    }
}

/// 从行剩余的 token 流中按固定顺序读取 2 个浮点分量，追加到目标池
///
/// 分量缺失或不是合法浮点数时返回行级解析错误，不会静默补零。
fn parse_vec2<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    pool: &mut Vec<[f32; 2]>,
    line_number: usize,
) -> std::result::Result<(), MeshLoadError> {
    let x = next_float(tokens, line_number)?;
    let y = next_float(tokens, line_number)?;
    pool.push([x, y]);
    Ok(())
}

/// 从行剩余的 token 流中按固定顺序读取 3 个浮点分量，追加到目标池
fn parse_vec3<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    pool: &mut Vec<[f32; 3]>,
    line_number: usize,
) -> std::result::Result<(), MeshLoadError> {
    let x = next_float(tokens, line_number)?;
    let y = next_float(tokens, line_number)?;
    let z = next_float(tokens, line_number)?;
    pool.push([x, y, z]);
    Ok(())
}

/// 读取下一个 token 并解析为 f32
fn next_float<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_number: usize,
) -> std::result::Result<f32, MeshLoadError> {
    let token = tokens.next().ok_or_else(|| MeshLoadError::ParseError {
        line: line_number,
        message: "数值分量不足".to_string(),
    })?;

    token.parse::<f32>().map_err(|_| MeshLoadError::ParseError {
        line: line_number,
        message: format!("无效的浮点数: {}", token),
    })
}

/// 把一个面顶点 token 解码为三个整数索引
///
/// token 必须恰好是三个以 `/` 分隔的整数（如 `3/7/3`）；
/// 分量缺失、为空或多于三个都视为格式错误。
fn decode_face_token(token: &str) -> Option<FaceKey> {
    let mut parts = token.split('/');

    let position = parts.next()?.parse().ok()?;
    let texcoord = parts.next()?.parse().ok()?;
    let normal = parts.next()?.parse().ok()?;

    if parts.next().is_some() {
        return None;
    }

    Some((position, texcoord, normal))
}

/// 按 0 基索引从属性池中取值，越界（含负数）返回 `None`
fn fetch<T: Copy>(pool: &[T], index: i64) -> Option<T> {
    if index < 0 {
        return None;
    }
    pool.get(index as usize).copied()
}

/// 把一个面的顶点索引序列三角化进索引列表
///
/// - 3 个顶点：原样输出一个三角形
/// - 4 个顶点：以第一个顶点为公共点扇形切分为 (0,1,2) 和 (0,2,3)
/// - 其他数量：返回错误，中止构建
fn triangulate_face(
    face: &[u32],
    indices: &mut Vec<u32>,
    line_number: usize,
) -> std::result::Result<(), MeshLoadError> {
    match face.len() {
        3 => {
            indices.extend_from_slice(&[face[0], face[1], face[2]]);
            Ok(())
        }
        4 => {
            indices.extend_from_slice(&[face[0], face[1], face[2]]);
            indices.extend_from_slice(&[face[0], face[2], face[3]]);
            Ok(())
        }
        arity => Err(MeshLoadError::UnsupportedFaceArity {
            line: line_number,
            arity,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DistGeometryError;

    /// 一个带 4 个位置、4 个 UV、4 个法线的四边形
    const QUAD_OBJ: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/2 3/3/3 4/4/4
";

    fn build(source: &str) -> MeshData {
        build_mesh(source, None).expect("构建应该成功")
    }

    fn build_err(source: &str) -> MeshLoadError {
        match build_mesh(source, None) {
            Err(DistGeometryError::MeshLoading(err)) => err,
            other => panic!("期望网格加载错误, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_triangle_passthrough() {
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/2 3/3/3
";
        let mesh = build(source);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_quad_fan_triangulation() {
        let mesh = build(QUAD_OBJ);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_vertex_attributes_resolved() {
        let mesh = build(QUAD_OBJ);

        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].texcoord, [1.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_vertex_reuse_across_faces() {
        // 两个面共享 token 1/1/1 和 3/1/1，只产生 4 个顶点
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1
f 1/1/1 3/1/1 4/1/1
";
        let mesh = build(source);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_dedup_counts_distinct_triples() {
        // 同一个位置在不同 UV 下是不同的顶点身份
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1
f 1/2/1 2/1/1 3/1/1
";
        let mesh = build(source);

        // 共 4 个不同的三元组: 1/1/1, 2/1/1, 3/1/1, 1/2/1
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
        // 重复 token 引用同一个输出索引
        assert_eq!(mesh.indices[1], mesh.indices[4]);
        assert_eq!(mesh.indices[2], mesh.indices[5]);
    }

    #[test]
    fn test_cube_scale() {
        // 立方体: 8 个唯一三元组, 12 个三角形面
        let mut source = String::new();
        for i in 0..8 {
            source.push_str(&format!(
                "v {}.0 {}.0 {}.0\n",
                i & 1,
                (i >> 1) & 1,
                (i >> 2) & 1
            ));
        }
        source.push_str("vt 0.0 0.0\nvn 0.0 0.0 1.0\n");
        for (a, b, c) in [
            (1, 2, 3),
            (1, 3, 4),
            (5, 6, 7),
            (5, 7, 8),
            (1, 2, 6),
            (1, 6, 5),
            (3, 4, 8),
            (3, 8, 7),
            (2, 3, 7),
            (2, 7, 6),
            (1, 4, 8),
            (1, 8, 5),
        ] {
            source.push_str(&format!("f {a}/1/1 {b}/1/1 {c}/1/1\n"));
        }

        let mesh = build(&source);

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.index_count() % 3, 0);
        // 所有索引都在顶点范围内
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_position_index_out_of_range() {
        // 只声明了 3 个位置, 面引用了位置 5
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 5/1/1
";
        let err = build_err(source);

        assert!(matches!(
            err,
            MeshLoadError::VertexIndexOutOfRange {
                attribute: "position",
                index: 5,
                pool_len: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_index_out_of_range() {
        // 1 基格式中索引 0 非法
        let source = "\
v 0.0 0.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 0/1/1 1/1/1 1/1/1
";
        let err = build_err(source);

        assert!(matches!(
            err,
            MeshLoadError::VertexIndexOutOfRange {
                attribute: "position",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_face_tokens() {
        for token in ["1/1", "1//1", "a/1/1", "1/1/1/1", "1"] {
            let source = format!(
                "v 0.0 0.0 0.0\nvt 0.0 0.0\nvn 0.0 0.0 1.0\nf {0} {0} {0}\n",
                token
            );
            let err = build_err(&source);

            assert!(
                matches!(err, MeshLoadError::MalformedFaceToken { .. }),
                "token {:?} 应判为格式错误, 实际: {:?}",
                token,
                err
            );
        }
    }

    #[test]
    fn test_unsupported_face_arity() {
        // 五边形面中止加载
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.5 1.5 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1 4/1/1 5/1/1
";
        let err = build_err(source);

        assert!(matches!(
            err,
            MeshLoadError::UnsupportedFaceArity { arity: 5, .. }
        ));
    }

    #[test]
    fn test_malformed_float_fails() {
        let err = build_err("v 0.0 abc 0.0\n");

        assert!(matches!(err, MeshLoadError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_missing_component_fails() {
        let err = build_err("vt 0.5\n");

        assert!(matches!(err, MeshLoadError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_unknown_directives_ignored() {
        let source = "\
# 注释行
o cube
g side
s off
usemtl wood
mtllib cube.mtl

v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1
";
        let mesh = build(source);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ObjLoader::load_from_file(Path::new("nonexistent.obj"));

        assert!(matches!(
            result,
            Err(DistGeometryError::MeshLoading(MeshLoadError::FileNotFound(
                _
            )))
        ));
    }

    #[test]
    fn test_load_from_memory() {
        let model = ObjLoader::load_from_memory(QUAD_OBJ.as_bytes()).unwrap();

        assert_eq!(model.format, ModelFormat::Obj);
        assert_eq!(model.mesh_count(), 1);
        assert_eq!(model.meshes[0].vertex_count(), 4);
        assert!(model.texture_file_names.is_empty());
    }

    #[test]
    fn test_load_from_memory_invalid_utf8() {
        let result = ObjLoader::load_from_memory(&[0xFF, 0xFE, 0x00]);

        assert!(matches!(
            result,
            Err(DistGeometryError::MeshLoading(MeshLoadError::ParseError {
                ..
            }))
        ));
    }

    #[test]
    fn test_load_from_file_names_mesh_after_stem() {
        let dir = std::env::temp_dir();
        let path = dir.join("dist_geometry_quad_test.obj");
        std::fs::write(&path, QUAD_OBJ).unwrap();

        let model = ObjLoader::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            model.meshes[0].name.as_deref(),
            Some("dist_geometry_quad_test")
        );
    }
}
