//! Scalar kinds a ragged buffer can hold.
//!
//! Buffers are parameterised over a closed set of element types: `f32`,
//! `i64` and `bool`. Storage, indexing, concatenation and formatting are
//! shared across all three through [`Element`]; arithmetic is only provided
//! for the numeric kinds through [`Numeric`], implemented separately per
//! concrete type.
//!
//! # Examples
//!
//! ```
//! use ragged_core::{DType, Element};
//!
//! assert_eq!(f32::DTYPE, DType::F32);
//! assert_eq!(i64::DTYPE.to_string(), "i64");
//! assert_eq!(bool::DTYPE.to_string(), "bool");
//! ```

use std::fmt;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for i64 {}
    impl Sealed for bool {}
}

/// Runtime tag for the scalar kind of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DType {
    /// 32-bit float
    F32,
    /// 64-bit signed integer
    I64,
    /// Boolean
    Bool,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F32 => "f32",
            DType::I64 => "i64",
            DType::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Element type storable in a [`RaggedBuffer`](crate::RaggedBuffer).
///
/// This trait is sealed; it is implemented for `f32`, `i64` and `bool` only.
pub trait Element:
    Copy + PartialEq + fmt::Debug + fmt::Display + Default + Send + Sync + 'static + sealed::Sealed
{
    /// Runtime tag of this scalar kind.
    const DTYPE: DType;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
}

impl Element for i64 {
    const DTYPE: DType = DType::I64;
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;
}

/// Element types supporting elementwise arithmetic.
pub trait Numeric: Element {
    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
}

impl Numeric for f32 {
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self - rhs
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }
}

// Integer arithmetic wraps on overflow, matching host int64 arrays.
impl Numeric for i64 {
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }
}
