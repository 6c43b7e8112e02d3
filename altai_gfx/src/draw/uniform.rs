/// Uniform values and their driver-call mapping

use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::render::{Driver, UniformLocation};

/// A value for one shader uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl UniformValue {
    /// Upload to `location` of the program in use
    pub fn upload(&self, driver: &mut dyn Driver, location: UniformLocation) {
        match self {
            UniformValue::Scalar(v) => driver.uniform_1f(location, *v),
            UniformValue::Vec2(v) => driver.uniform_2f(location, v.to_array()),
            UniformValue::Vec3(v) => driver.uniform_3f(location, v.to_array()),
            UniformValue::Vec4(v) => driver.uniform_4f(location, v.to_array()),
            UniformValue::Mat4(m) => driver.uniform_matrix_4f(location, m.to_cols_array()),
        }
    }

    /// Number of f32 components
    pub fn component_count(&self) -> usize {
        match self {
            UniformValue::Scalar(_) => 1,
            UniformValue::Vec2(_) => 2,
            UniformValue::Vec3(_) => 3,
            UniformValue::Vec4(_) => 4,
            UniformValue::Mat4(_) => 16,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Scalar(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(m: Mat4) -> Self {
        UniformValue::Mat4(m)
    }
}

#[cfg(test)]
#[path = "uniform_tests.rs"]
mod tests;
