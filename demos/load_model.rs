//! 模型加载示例
//!
//! 演示如何使用 dist_geometry 加载 OBJ 或 glTF 模型，
//! 并打印网格与纹理引用信息。
//!
//! 运行方式：
//! ```
//! cargo run --example load_model -- assets/sphere.obj
//! ```

use anyhow::Context;
use dist_geometry::core::log;
use dist_geometry::geometry::loaders::load_model_auto;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    log::init_simple();

    let path_arg = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/cube.obj".to_string());
    let path = Path::new(&path_arg);

    println!("正在加载: {}", path.display());

    let model =
        load_model_auto(path).with_context(|| format!("加载模型失败: {}", path.display()))?;

    println!("\n✓ 加载成功！\n");
    println!("模型信息:");
    println!("  格式: {}", model.format.name());
    println!("  网格数: {}", model.mesh_count());
    println!("  顶点总数: {}", model.total_vertex_count());
    println!("  三角形总数: {}", model.total_triangle_count());

    for (i, mesh) in model.meshes.iter().enumerate() {
        println!(
            "  网格 {}: {} ({} 个顶点, {} 个三角形)",
            i,
            mesh.name.as_deref().unwrap_or("未命名"),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    }

    if !model.texture_file_names.is_empty() {
        println!("\n纹理引用:");
        for name in &model.texture_file_names {
            println!("  {}", name);
        }
    }

    Ok(())
}
