//! 数学类型模块
//!
//! 基于 `nalgebra` 提供统一的向量和矩阵类型别名，
//! 以及场景图导入时需要的坐标变换辅助函数。

pub use nalgebra::{Matrix3 as Mat3, Matrix4 as Mat4, Vector3 as Vec3, Vector4 as Vec4};

// 类型别名，使用更简洁的名称
pub type Vector3 = Vec3<f32>;
pub type Vector4 = Vec4<f32>;
pub type Matrix3 = Mat3<f32>;
pub type Matrix4 = Mat4<f32>;

/// 用 4x4 变换矩阵变换一个点（w = 1.0）
#[inline]
pub fn transform_point(matrix: &Matrix4, point: [f32; 3]) -> [f32; 3] {
    let v = matrix * Vector4::new(point[0], point[1], point[2], 1.0);
    [v.x, v.y, v.z]
}

/// 计算法线变换矩阵（线性部分的逆转置）
///
/// 非均匀缩放下直接用模型矩阵变换法线会破坏与表面的垂直关系，
/// 需要使用逆转置矩阵。矩阵不可逆时退化为线性部分本身。
pub fn normal_matrix(matrix: &Matrix4) -> Matrix3 {
    let linear = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    match linear.try_inverse() {
        Some(inverse) => inverse.transpose(),
        None => linear,
    }
}

/// 用法线矩阵变换并归一化一个法线向量
///
/// 零向量（缺失的法线数据）保持为零向量。
pub fn transform_normal(normal_mat: &Matrix3, normal: [f32; 3]) -> [f32; 3] {
    let v = normal_mat * Vector3::new(normal[0], normal[1], normal[2]);
    let v = v.try_normalize(1.0e-6).unwrap_or(v);
    [v.x, v.y, v.z]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_point_translation() {
        let m = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(transform_point(&m, [0.0, 0.0, 0.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_transform_point_scaling() {
        let m = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        assert_eq!(transform_point(&m, [1.0, 1.0, 1.0]), [2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_normal_matrix_identity() {
        assert_eq!(normal_matrix(&Matrix4::identity()), Matrix3::identity());
    }

    #[test]
    fn test_transform_normal_is_unit_length() {
        // x 方向缩放 2 倍时，斜面法线经逆转置修正后仍为单位向量
        let m = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        let nm = normal_matrix(&m);
        let n = transform_normal(&nm, [1.0, 1.0, 0.0]);
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 1.0e-5);
        // 缩放轴方向的分量被压缩
        assert!(n[0] < n[1]);
    }

    #[test]
    fn test_transform_normal_zero_stays_zero() {
        let nm = Matrix3::identity();
        assert_eq!(transform_normal(&nm, [0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }
}
