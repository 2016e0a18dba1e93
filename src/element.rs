//! Type-category dispatch: the single source of truth for "is this
//! cell missing" and "what does a missing output cell look like",
//! specialized per element-type category at compile time.
//!
//! This replaces the donor's one-body-per-tag textual fusion (see
//! `types/agg.rs` in the original pipeline framework, which hand-wrote
//! `sum<T: Sum>`, `min<T: Ord + Copy>`, etc. per bound combination) with
//! a small trait so `is_na`/`na_repr` are written once, not once per
//! kernel. Kernels still pick their own arithmetic bounds per function,
//! matching that donor texture, rather than folding everything into one
//! kitchen-sink trait.

use num_complex::Complex;

/// Sentinel marking a missing datetime-like `i64` value (pandas' NaT).
/// Never confused with a legitimate extreme value because
/// `group_min`/`group_max` seed their running extrema at `-I64_MAX`/
/// `I64_MAX`, not `i64::MIN`.
pub const NAT_SENTINEL: i64 = i64::MIN;

pub type Complex32 = Complex<f32>;
pub type Complex64 = Complex<f64>;

/// Per-element-type missingness and NA-output representation.
///
/// `is_na` is the single predicate named in `spec.md` §4.1 (mask
/// overrides are applied by the caller of this trait, not here, since
/// the mask is a separate optional buffer independent of element type).
///
/// `na_repr` answers the `spec.md` §4.2 "NA representation on output"
/// table. It takes `is_datetimelike` because plain (non-datetime)
/// signed integers have no in-band NA representation either -- only
/// the `NAT_SENTINEL` convention used for datetime-like columns does
/// (see `SPEC_FULL.md` Open Question 2). Returning `None` here is what
/// drives a reducer's finalize pass to either write through a
/// `result_mask` or fail with `KernelError::EmptyGroupUnsignedError`.
pub trait Na: Copy {
    fn is_na(self, is_datetimelike: bool) -> bool;
    fn na_repr(is_datetimelike: bool) -> Option<Self>;
}

impl Na for i64 {
    fn is_na(self, is_datetimelike: bool) -> bool {
        is_datetimelike && self == NAT_SENTINEL
    }
    fn na_repr(is_datetimelike: bool) -> Option<Self> {
        if is_datetimelike { Some(NAT_SENTINEL) } else { None }
    }
}

impl Na for u64 {
    fn is_na(self, _is_datetimelike: bool) -> bool {
        false
    }
    fn na_repr(_is_datetimelike: bool) -> Option<Self> {
        None
    }
}

impl Na for f32 {
    fn is_na(self, _is_datetimelike: bool) -> bool {
        self != self
    }
    fn na_repr(_is_datetimelike: bool) -> Option<Self> {
        Some(f32::NAN)
    }
}

impl Na for f64 {
    fn is_na(self, _is_datetimelike: bool) -> bool {
        self != self
    }
    fn na_repr(_is_datetimelike: bool) -> Option<Self> {
        Some(f64::NAN)
    }
}

impl Na for Complex32 {
    fn is_na(self, _is_datetimelike: bool) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
    fn na_repr(_is_datetimelike: bool) -> Option<Self> {
        Some(Complex32::new(f32::NAN, f32::NAN))
    }
}

impl Na for Complex64 {
    fn is_na(self, _is_datetimelike: bool) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
    fn na_repr(_is_datetimelike: bool) -> Option<Self> {
        Some(Complex64::new(f64::NAN, f64::NAN))
    }
}

/// Resolve missingness honoring an optional external validity mask,
/// which always wins regardless of the in-band check (`spec.md` §4.1:
/// "if an external mask is in use: mask_bit").
#[inline]
pub fn is_na_masked<T: Na>(v: T, is_datetimelike: bool, mask_bit: Option<bool>) -> bool {
    match mask_bit {
        Some(bit) => bit,
        None => v.is_na(is_datetimelike),
    }
}

/// Extreme sentinels for `group_min`/`group_max`/`group_cummin`/
/// `group_cummax`, per `spec.md` §4.7. Only defined for types with a
/// total order; complex and object element types are handled by
/// dedicated, non-generic entry points instead of implementing this
/// trait.
pub trait OrdExtreme: Na + PartialOrd {
    /// Seed for a running *maximum*: smaller than any legitimate value.
    const FLOOR: Self;
    /// Seed for a running *minimum*: larger than any legitimate value.
    const CEILING: Self;
}

impl OrdExtreme for i64 {
    const FLOOR: Self = -i64::MAX;
    const CEILING: Self = i64::MAX;
}

impl OrdExtreme for u64 {
    const FLOOR: Self = 0;
    const CEILING: Self = u64::MAX;
}

impl OrdExtreme for f32 {
    const FLOOR: Self = f32::NEG_INFINITY;
    const CEILING: Self = f32::INFINITY;
}

impl OrdExtreme for f64 {
    const FLOOR: Self = f64::NEG_INFINITY;
    const CEILING: Self = f64::INFINITY;
}

/// Divide a running sum by an observation count to finalize a mean,
/// in the same element type `T` as the input (`spec.md` §4.5's
/// datetime-like example expects an *integer*-typed mean, truncated by
/// `/ n`, not a promotion to `f64`).
pub trait DivByCount: Copy {
    fn div_by_count(self, n: u64) -> Self;
}

impl DivByCount for i64 {
    fn div_by_count(self, n: u64) -> Self {
        self / n as i64
    }
}

impl DivByCount for u64 {
    fn div_by_count(self, n: u64) -> Self {
        self / n
    }
}

impl DivByCount for f32 {
    fn div_by_count(self, n: u64) -> Self {
        self / n as f32
    }
}

impl DivByCount for f64 {
    fn div_by_count(self, n: u64) -> Self {
        self / n as f64
    }
}

impl DivByCount for Complex32 {
    fn div_by_count(self, n: u64) -> Self {
        self / (n as f32)
    }
}

impl DivByCount for Complex64 {
    fn div_by_count(self, n: u64) -> Self {
        self / (n as f64)
    }
}

/// Lossless-enough conversion to `f64` for the reducers that always
/// compute in double precision regardless of input type (`group_var`,
/// `group_median`, `group_quantile`). Not implemented for complex or
/// object element types, which have no total order / no variance
/// defined in this kernel set.
pub trait ToF64: Copy {
    fn to_f64(self) -> f64;
}

impl ToF64 for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl ToF64 for u64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl ToF64 for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl ToF64 for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for super::Complex32 {}
    impl Sealed for super::Complex64 {}
}

/// Marker for the floating-point element categories. `spec.md`
/// §4.4/§4.13 restrict `group_prod`/`group_cumprod` to floating-point
/// types only -- a running product over `I64`/`U64` is not part of
/// this kernel set at all, unlike `group_sum`. Sealed so no caller can
/// implement it for an integer type and bypass the restriction; the
/// compiler rejects `group_prod::<i64>`/`group_cumprod::<u64>` outright
/// rather than this crate raising `UnsupportedElementType` at runtime.
pub trait FloatElement: sealed::Sealed {}

impl FloatElement for f32 {}
impl FloatElement for f64 {}
impl FloatElement for Complex32 {}
impl FloatElement for Complex64 {}
