//! Precision-generic scalar and vector types
//!
//! Every kernel is written once against [`Real`] and instantiated for `f32`
//! (paired with [`Vec3`]) and `f64` (paired with [`DVec3`]).

use bevy::math::{DVec3, Vec3};
use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Floating-point scalar a simulation can run in
pub trait Real:
    Copy
    + Send
    + Sync
    + Debug
    + Display
    + Default
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + 'static
{
    /// Three-component vector in the same precision
    type Vector: SimVector<Self>;

    const ZERO: Self;
    const ONE: Self;
    const HALF: Self;
    const TWO: Self;

    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
    fn sqrt(self) -> Self;
    fn ln(self) -> Self;
    fn abs(self) -> Self;

    fn from_usize(value: usize) -> Self {
        Self::from_f64(value as f64)
    }

    fn max(self, other: Self) -> Self {
        if self >= other { self } else { other }
    }
}

/// Vector operations the evaluators need
pub trait SimVector<S>:
    Copy
    + Send
    + Sync
    + Debug
    + Default
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<S, Output = Self>
    + Div<S, Output = Self>
    + AddAssign
    + SubAssign
{
    const ZERO: Self;

    fn new(x: S, y: S, z: S) -> Self;
    fn x(&self) -> S;
    fn y(&self) -> S;
    fn z(&self) -> S;
    fn dot(self, other: Self) -> S;
    fn cross(self, other: Self) -> Self;
    fn length(self) -> S;
    fn length_squared(self) -> S;
    fn normalize(self) -> Self;
    fn is_finite(self) -> bool;
}

/// The vector type paired with scalar `S`
pub type Vector<S> = <S as Real>::Vector;

macro_rules! impl_real {
    ($scalar:ty, $vector:ty, $sqrt:path, $ln:path) => {
        impl Real for $scalar {
            type Vector = $vector;

            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const HALF: Self = 0.5;
            const TWO: Self = 2.0;

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $scalar
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn sqrt(self) -> Self {
                $sqrt(self)
            }

            #[inline]
            fn ln(self) -> Self {
                $ln(self)
            }

            #[inline]
            fn abs(self) -> Self {
                <$scalar>::abs(self)
            }
        }

        impl SimVector<$scalar> for $vector {
            const ZERO: Self = <$vector>::ZERO;

            #[inline]
            fn new(x: $scalar, y: $scalar, z: $scalar) -> Self {
                <$vector>::new(x, y, z)
            }

            #[inline]
            fn x(&self) -> $scalar {
                self.x
            }

            #[inline]
            fn y(&self) -> $scalar {
                self.y
            }

            #[inline]
            fn z(&self) -> $scalar {
                self.z
            }

            #[inline]
            fn dot(self, other: Self) -> $scalar {
                <$vector>::dot(self, other)
            }

            #[inline]
            fn cross(self, other: Self) -> Self {
                <$vector>::cross(self, other)
            }

            #[inline]
            fn length(self) -> $scalar {
                <$vector>::length(self)
            }

            #[inline]
            fn length_squared(self) -> $scalar {
                <$vector>::length_squared(self)
            }

            #[inline]
            fn normalize(self) -> Self {
                <$vector>::normalize(self)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$vector>::is_finite(self)
            }
        }
    };
}

impl_real!(f32, Vec3, libm::sqrtf, libm::logf);
impl_real!(f64, DVec3, libm::sqrt, libm::log);
