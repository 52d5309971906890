//! Minimal vector math for the simulation.
//!
//! `vec2`/`vec4` build glam vectors from component lists (colors are built this
//! way). The slice-based operations work on any dimension for callers holding
//! raw component arrays; they check operand dimensions at runtime and report a
//! [`MathError`] on mismatch. Entity code on glam types uses glam operators
//! plus `normalize_vec2` / `with_speed`. `normalize` never fails: a zero or
//! non-finite length is logged and the input is handed back unchanged.

use glam::{Vec2, Vec4};
use std::fmt;

/// Errors reported by the slice-based vector operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Operands of `op` had different lengths.
    DimensionMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::DimensionMismatch { op, left, right } => write!(
                f,
                "{}(): vectors are not the same dimension ({} vs {})",
                op, left, right
            ),
        }
    }
}

impl std::error::Error for MathError {}

fn check_dimensions(op: &'static str, u: &[f32], v: &[f32]) -> Result<(), MathError> {
    if u.len() != v.len() {
        return Err(MathError::DimensionMismatch {
            op,
            left: u.len(),
            right: v.len(),
        });
    }
    Ok(())
}

/// Build a 2-vector from up to two values; missing components are `0.0`.
pub fn vec2(values: &[f32]) -> Vec2 {
    let component = |i: usize| values.get(i).copied().unwrap_or(0.0);
    Vec2::new(component(0), component(1))
}

/// Build a 4-vector from up to four values.
///
/// Missing x/y/z components are `0.0`; a missing w is `1.0` (homogeneous
/// coordinate convention).
pub fn vec4(values: &[f32]) -> Vec4 {
    let component = |i: usize, fallback: f32| values.get(i).copied().unwrap_or(fallback);
    Vec4::new(
        component(0, 0.0),
        component(1, 0.0),
        component(2, 0.0),
        component(3, 1.0),
    )
}

/// Element-wise sum.
pub fn add(u: &[f32], v: &[f32]) -> Result<Vec<f32>, MathError> {
    check_dimensions("add", u, v)?;
    Ok(u.iter().zip(v).map(|(a, b)| a + b).collect())
}

/// Multiply every component by `s`.
pub fn scale(s: f32, u: &[f32]) -> Vec<f32> {
    u.iter().map(|x| s * x).collect()
}

/// Sum of element-wise products.
pub fn dot(u: &[f32], v: &[f32]) -> Result<f32, MathError> {
    check_dimensions("dot", u, v)?;
    Ok(u.iter().zip(v).map(|(a, b)| a * b).sum())
}

/// Euclidean norm.
pub fn length(u: &[f32]) -> f32 {
    u.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Normalize in place. Returns `false` (and leaves `u` untouched) when the
/// length is zero or not finite.
fn normalize_in_place(u: &mut [f32], exclude_last: bool) -> bool {
    let directional = if exclude_last && !u.is_empty() {
        u.len() - 1
    } else {
        u.len()
    };

    let len = length(&u[..directional]);
    if !len.is_finite() || len == 0.0 {
        log::warn!(
            "normalize: vector {:?} has zero or non-finite length, returning original",
            u
        );
        return false;
    }

    for x in &mut u[..directional] {
        *x /= len;
    }
    true
}

/// Return a unit-length copy of `u`.
///
/// With `exclude_last` the trailing component is carried over untouched and
/// only the leading components are normalized.
pub fn normalize(u: &[f32], exclude_last: bool) -> Vec<f32> {
    let mut result = u.to_vec();
    normalize_in_place(&mut result, exclude_last);
    result
}

/// [`normalize`] for glam 2-vectors.
pub fn normalize_vec2(v: Vec2) -> Vec2 {
    let mut components = v.to_array();
    normalize_in_place(&mut components, false);
    Vec2::from_array(components)
}

/// Rescale `v` to `speed` while keeping its direction.
///
/// This is the speed-conserving renormalization used after steering forces.
pub fn with_speed(v: Vec2, speed: f32) -> Vec2 {
    normalize_vec2(v) * speed
}

/// Types that can be serialized into a contiguous `f32` buffer.
pub trait Flatten {
    /// Append this value's components to `out`, component-major.
    fn flatten_into(&self, out: &mut Vec<f32>);
}

impl Flatten for f32 {
    fn flatten_into(&self, out: &mut Vec<f32>) {
        out.push(*self);
    }
}

impl Flatten for Vec2 {
    fn flatten_into(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.to_array());
    }
}

impl Flatten for Vec4 {
    fn flatten_into(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.to_array());
    }
}

impl<T: Flatten, const N: usize> Flatten for [T; N] {
    fn flatten_into(&self, out: &mut Vec<f32>) {
        for item in self {
            item.flatten_into(out);
        }
    }
}

impl<T: Flatten> Flatten for [T] {
    fn flatten_into(&self, out: &mut Vec<f32>) {
        for item in self {
            item.flatten_into(out);
        }
    }
}

impl<T: Flatten> Flatten for Vec<T> {
    fn flatten_into(&self, out: &mut Vec<f32>) {
        self.as_slice().flatten_into(out);
    }
}

/// Serialize a vector or a list of vectors into one `f32` buffer suitable for
/// a GPU upload (`bytemuck::cast_slice` on the result).
pub fn flatten<T: Flatten + ?Sized>(v: &T) -> Vec<f32> {
    let mut out = Vec::new();
    v.flatten_into(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_vec_constructors_pad() {
        assert_eq!(vec2(&[]), Vec2::ZERO);
        assert_eq!(vec2(&[3.0]), Vec2::new(3.0, 0.0));
        assert_eq!(vec2(&[1.0, 2.0, 9.0]), Vec2::new(1.0, 2.0));

        assert_eq!(vec4(&[]), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(vec4(&[0.2, 0.4]), Vec4::new(0.2, 0.4, 0.0, 1.0));
        assert_eq!(vec4(&[1.0, 2.0, 3.0, 4.0, 5.0]), Vec4::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_add_and_dot_reject_mismatched_dimensions() {
        assert_eq!(add(&[1.0, 2.0], &[3.0, 4.0]), Ok(vec![4.0, 6.0]));
        assert_eq!(
            add(&[1.0, 2.0], &[3.0]),
            Err(MathError::DimensionMismatch {
                op: "add",
                left: 2,
                right: 1
            })
        );

        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), Ok(32.0));
        assert!(dot(&[1.0], &[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_scale_and_length() {
        assert_eq!(scale(2.0, &[1.0, -3.0]), vec![2.0, -6.0]);
        assert!((length(&[3.0, 4.0]) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for v in [[3.0, 4.0], [-0.001, 0.5], [1e3, -2e3]] {
            let once = normalize(&v, false);
            let twice = normalize(&once, false);

            assert!((length(&once) - 1.0).abs() < EPS);
            assert!((length(&twice) - 1.0).abs() < EPS);
            assert!((once[0] - twice[0]).abs() < EPS);
            assert!((once[1] - twice[1]).abs() < EPS);
        }
    }

    #[test]
    fn test_normalize_exclude_last_keeps_trailing_component() {
        let n = normalize(&[3.0, 4.0, 7.0], true);
        assert!((n[0] - 0.6).abs() < EPS);
        assert!((n[1] - 0.8).abs() < EPS);
        assert_eq!(n[2], 7.0);
    }

    #[test]
    fn test_normalize_degenerate_returns_input() {
        assert_eq!(normalize(&[0.0, 0.0], false), vec![0.0, 0.0]);
        assert_eq!(normalize_vec2(Vec2::ZERO), Vec2::ZERO);

        let inf = normalize(&[f32::INFINITY, 1.0], false);
        assert_eq!(inf[0], f32::INFINITY);
        assert_eq!(inf[1], 1.0);
    }

    #[test]
    fn test_with_speed_rescales() {
        let v = with_speed(Vec2::new(0.3, -0.4), 2.0);
        assert!((v.length() - 2.0).abs() < EPS);
        assert!(v.x > 0.0 && v.y < 0.0);
    }

    #[test]
    fn test_flatten_nested_and_flat() {
        assert_eq!(flatten(&[[1.0f32, 2.0], [3.0, 4.0]]), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(flatten(&[1.0f32, 2.0, 3.0]), vec![1.0, 2.0, 3.0]);

        let positions = vec![Vec2::new(0.5, -0.5), Vec2::new(1.0, 0.0)];
        assert_eq!(flatten(&positions), vec![0.5, -0.5, 1.0, 0.0]);
        assert_eq!(
            flatten(&Vec4::new(0.1, 0.2, 0.3, 1.0)),
            vec![0.1, 0.2, 0.3, 1.0]
        );
    }
}
