//! Dense tensor type and the narrow numeric-array interface consumed by the
//! equality core.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TtkError};

fn tensor_error(code: &str, message: impl Into<String>) -> TtkError {
    TtkError::Tensor(ErrorInfo::new(code, message.into()))
}

/// Element type tag for [`Tensor`] storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DType {
    /// 32-bit IEEE float.
    F32,
    /// 64-bit IEEE float.
    F64,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 8-bit unsigned integer.
    U8,
}

impl DType {
    /// Returns whether elements of this type must be promoted before
    /// differencing to avoid overflow.
    pub fn is_narrow_int(&self) -> bool {
        matches!(self, DType::I8 | DType::I16 | DType::I32 | DType::U8)
    }
}

/// Typed flat storage backing a [`Tensor`], row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TensorData {
    /// 32-bit float elements.
    F32(Vec<f32>),
    /// 64-bit float elements.
    F64(Vec<f64>),
    /// 8-bit signed elements.
    I8(Vec<i8>),
    /// 16-bit signed elements.
    I16(Vec<i16>),
    /// 32-bit signed elements.
    I32(Vec<i32>),
    /// 64-bit signed elements.
    I64(Vec<i64>),
    /// 8-bit unsigned elements.
    U8(Vec<u8>),
}

impl TensorData {
    fn len(&self) -> usize {
        match self {
            TensorData::F32(v) => v.len(),
            TensorData::F64(v) => v.len(),
            TensorData::I8(v) => v.len(),
            TensorData::I16(v) => v.len(),
            TensorData::I32(v) => v.len(),
            TensorData::I64(v) => v.len(),
            TensorData::U8(v) => v.len(),
        }
    }

    fn dtype(&self) -> DType {
        match self {
            TensorData::F32(_) => DType::F32,
            TensorData::F64(_) => DType::F64,
            TensorData::I8(_) => DType::I8,
            TensorData::I16(_) => DType::I16,
            TensorData::I32(_) => DType::I32,
            TensorData::I64(_) => DType::I64,
            TensorData::U8(_) => DType::U8,
        }
    }
}

/// Narrow array interface consumed by the equality core.
///
/// All operations are non-mutating; `sub` and `abs` return fresh arrays.
pub trait NumericArray: Sized {
    /// Number of dimensions.
    fn ndim(&self) -> usize;
    /// Size of the given dimension.
    fn size(&self, dim: usize) -> Option<usize>;
    /// Full shape as an ordered slice of dimension sizes.
    fn shape(&self) -> &[usize];
    /// Total element count.
    fn numel(&self) -> usize;
    /// Element type tag.
    fn dtype(&self) -> DType;
    /// Elementwise subtraction; shapes must match exactly.
    fn sub(&self, other: &Self) -> Result<Self, TtkError>;
    /// Elementwise absolute value.
    fn abs(&self) -> Self;
    /// Maximum element as f64; 0.0 for empty arrays.
    fn max_all(&self) -> f64;
    /// Promotes narrow integer element types to a wider integer type.
    fn widen(&self) -> Self;
}

/// Dense row-major tensor with dtype-tagged storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    shape: Vec<usize>,
    data: TensorData,
}

impl Tensor {
    /// Creates a tensor from typed storage, validating the element count.
    pub fn new(data: TensorData, shape: Vec<usize>) -> Result<Self, TtkError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(tensor_error(
                "numel-mismatch",
                format!(
                    "storage holds {} elements but shape {:?} needs {}",
                    data.len(),
                    shape,
                    expected
                ),
            ));
        }
        Ok(Self { shape, data })
    }

    /// Creates an f64 tensor from a flat slice.
    pub fn from_f64(data: &[f64], shape: &[usize]) -> Result<Self, TtkError> {
        Self::new(TensorData::F64(data.to_vec()), shape.to_vec())
    }

    /// Creates an f32 tensor from a flat slice.
    pub fn from_f32(data: &[f32], shape: &[usize]) -> Result<Self, TtkError> {
        Self::new(TensorData::F32(data.to_vec()), shape.to_vec())
    }

    /// Creates an i8 tensor from a flat slice.
    pub fn from_i8(data: &[i8], shape: &[usize]) -> Result<Self, TtkError> {
        Self::new(TensorData::I8(data.to_vec()), shape.to_vec())
    }

    /// Creates an i32 tensor from a flat slice.
    pub fn from_i32(data: &[i32], shape: &[usize]) -> Result<Self, TtkError> {
        Self::new(TensorData::I32(data.to_vec()), shape.to_vec())
    }

    /// Creates a zero-filled f64 tensor.
    pub fn zeros(shape: &[usize]) -> Self {
        let numel = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            data: TensorData::F64(vec![0.0; numel]),
        }
    }

    /// Creates a deterministic uniform-random f64 tensor in `[0, 1)`.
    ///
    /// The master seed fully determines the contents, so fixtures built with
    /// the same seed reproduce across platforms.
    pub fn random(shape: &[usize], seed: u64) -> Self {
        let numel: usize = shape.iter().product();
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..numel).map(|_| rng.gen::<f64>()).collect();
        Self {
            shape: shape.to_vec(),
            data: TensorData::F64(data),
        }
    }

    /// Returns the typed storage.
    pub fn data(&self) -> &TensorData {
        &self.data
    }

    /// Copies the elements out as f64 values, in row-major order.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match &self.data {
            TensorData::F32(v) => v.iter().map(|x| f64::from(*x)).collect(),
            TensorData::F64(v) => v.clone(),
            TensorData::I8(v) => v.iter().map(|x| f64::from(*x)).collect(),
            TensorData::I16(v) => v.iter().map(|x| f64::from(*x)).collect(),
            TensorData::I32(v) => v.iter().map(|x| f64::from(*x)).collect(),
            TensorData::I64(v) => v.iter().map(|x| *x as f64).collect(),
            TensorData::U8(v) => v.iter().map(|x| f64::from(*x)).collect(),
        }
    }

    fn shape_mismatch(&self, other: &Self) -> TtkError {
        tensor_error(
            "shape-mismatch",
            format!(
                "elementwise op requires matching shapes: {:?} vs {:?}",
                self.shape, other.shape
            ),
        )
    }
}

impl NumericArray for Tensor {
    fn ndim(&self) -> usize {
        self.shape.len()
    }

    fn size(&self, dim: usize) -> Option<usize> {
        self.shape.get(dim).copied()
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn numel(&self) -> usize {
        self.data.len()
    }

    fn dtype(&self) -> DType {
        self.data.dtype()
    }

    fn sub(&self, other: &Self) -> Result<Self, TtkError> {
        if self.shape != other.shape {
            return Err(self.shape_mismatch(other));
        }
        // Differences are only ever consumed by abs/max reductions, so they
        // are carried in the widest type of each numeric family.
        let data = match (&self.data, &other.data) {
            (TensorData::I64(a), TensorData::I64(b)) => {
                TensorData::I64(a.iter().zip(b).map(|(x, y)| x - y).collect())
            }
            _ => {
                let a = self.to_f64_vec();
                let b = other.to_f64_vec();
                TensorData::F64(a.iter().zip(&b).map(|(x, y)| x - y).collect())
            }
        };
        Ok(Self {
            shape: self.shape.clone(),
            data,
        })
    }

    fn abs(&self) -> Self {
        let data = match &self.data {
            TensorData::F32(v) => TensorData::F32(v.iter().map(|x| x.abs()).collect()),
            TensorData::F64(v) => TensorData::F64(v.iter().map(|x| x.abs()).collect()),
            TensorData::I8(v) => TensorData::I32(v.iter().map(|x| i32::from(*x).abs()).collect()),
            TensorData::I16(v) => TensorData::I32(v.iter().map(|x| i32::from(*x).abs()).collect()),
            TensorData::I32(v) => TensorData::I64(v.iter().map(|x| i64::from(*x).abs()).collect()),
            TensorData::I64(v) => TensorData::I64(v.iter().map(|x| x.abs()).collect()),
            TensorData::U8(v) => TensorData::U8(v.clone()),
        };
        Self {
            shape: self.shape.clone(),
            data,
        }
    }

    fn max_all(&self) -> f64 {
        let elems = self.to_f64_vec();
        if elems.is_empty() {
            return 0.0;
        }
        elems.into_iter().fold(f64::NEG_INFINITY, f64::max)
    }

    fn widen(&self) -> Self {
        let data = match &self.data {
            TensorData::I8(v) => TensorData::I32(v.iter().map(|x| i32::from(*x)).collect()),
            TensorData::I16(v) => TensorData::I32(v.iter().map(|x| i32::from(*x)).collect()),
            TensorData::U8(v) => TensorData::I32(v.iter().map(|x| i32::from(*x)).collect()),
            TensorData::I32(v) => TensorData::I64(v.iter().map(|x| i64::from(*x)).collect()),
            other => other.clone(),
        };
        Self {
            shape: self.shape.clone(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_numel_mismatch() {
        let err = Tensor::new(TensorData::F64(vec![1.0, 2.0]), vec![3]).unwrap_err();
        assert_eq!(err.info().code, "numel-mismatch");
    }

    #[test]
    fn sub_abs_max_pipeline() {
        let a = Tensor::from_f64(&[1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let b = Tensor::from_f64(&[1.0, 2.5, 3.0, 2.0], &[2, 2]).unwrap();
        let max = a.sub(&b).unwrap().abs().max_all();
        assert!((max - 2.0).abs() < 1e-15);
    }

    #[test]
    fn narrow_int_widening_avoids_overflow() {
        let a = Tensor::from_i8(&[-128], &[1]).unwrap();
        let b = Tensor::from_i8(&[127], &[1]).unwrap();
        let diff = a.widen().sub(&b.widen()).unwrap().abs().max_all();
        assert_eq!(diff, 255.0);
    }

    #[test]
    fn random_is_deterministic_per_seed() {
        let a = Tensor::random(&[4, 4], 7);
        let b = Tensor::random(&[4, 4], 7);
        assert_eq!(a, b);
        assert_ne!(a, Tensor::random(&[4, 4], 8));
    }

    #[test]
    fn max_all_of_empty_is_zero() {
        let t = Tensor::zeros(&[0]);
        assert_eq!(t.max_all(), 0.0);
    }
}
