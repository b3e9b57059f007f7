//! SIMD-aware dot-product kernels.
//!
//! All kernels compute `Σ a[k] * b[k]` over two equal-length slices. They differ
//! only in how the products are accumulated, so their results agree within a
//! small relative tolerance but are not bit-identical.
//!
//! The SSE kernels consume the slices in groups of [`VECTOR_WIDTH`] lanes and
//! finish any remaining elements with a scalar tail loop.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{KernelError, KernelResult};

/// Number of `f32` lanes handled per step by the SSE kernels.
pub const VECTOR_WIDTH: usize = 4;

/// The available dot-product implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KernelKind {
    /// Plain sequential accumulation.
    Scalar,
    /// Packed multiply/add with a horizontal-add reduction (SSE3).
    Sse,
    /// Per-group hardware dot product via `dpps` (SSE4.1).
    SseDp,
}

impl KernelKind {
    /// Every kernel, ordered from baseline to most specialized.
    pub const ALL: [KernelKind; 3] = [KernelKind::Scalar, KernelKind::Sse, KernelKind::SseDp];

    pub fn name(self) -> &'static str {
        match self {
            KernelKind::Scalar => "scalar",
            KernelKind::Sse => "sse",
            KernelKind::SseDp => "sse-dp",
        }
    }

    /// Returns whether the running CPU can execute this kernel.
    pub fn is_supported(self) -> bool {
        match self {
            KernelKind::Scalar => true,
            KernelKind::Sse => cpu_has_sse3(),
            KernelKind::SseDp => cpu_has_sse41(),
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelKind {
    type Err = KernelError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        KernelKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| KernelError::UnknownKernel {
                name: name.to_string(),
            })
    }
}

/// Configuration-facing kernel selector: either a fixed kernel or the best one
/// the CPU supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KernelChoice {
    #[default]
    Auto,
    Fixed(KernelKind),
}

impl KernelChoice {
    /// Resolves the choice into a kernel that is safe to run on this CPU.
    pub fn resolve(self) -> KernelResult<DotKernel> {
        match self {
            KernelChoice::Auto => Ok(DotKernel::detect()),
            KernelChoice::Fixed(kind) => DotKernel::new(kind),
        }
    }
}

impl fmt::Display for KernelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelChoice::Auto => f.write_str("auto"),
            KernelChoice::Fixed(kind) => kind.fmt(f),
        }
    }
}

impl FromStr for KernelChoice {
    type Err = KernelError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name.trim().eq_ignore_ascii_case("auto") {
            return Ok(KernelChoice::Auto);
        }
        name.parse().map(KernelChoice::Fixed)
    }
}

impl TryFrom<String> for KernelChoice {
    type Error = KernelError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<KernelChoice> for String {
    fn from(choice: KernelChoice) -> Self {
        choice.to_string()
    }
}

/// A dot-product kernel that is known to be runnable on the current CPU.
///
/// The only ways to obtain one go through a CPU feature check, which is what
/// makes dispatching into the `#[target_feature]` implementations sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotKernel {
    kind: KernelKind,
}

impl DotKernel {
    /// Creates a kernel of the requested kind if the CPU supports it.
    pub fn new(kind: KernelKind) -> KernelResult<Self> {
        if kind.is_supported() {
            Ok(Self { kind })
        } else {
            Err(KernelError::KernelUnavailable {
                kind: kind.name().to_string(),
            })
        }
    }

    /// The portable kernel, available everywhere.
    pub const fn scalar() -> Self {
        Self {
            kind: KernelKind::Scalar,
        }
    }

    /// Picks the most specialized kernel the CPU supports.
    pub fn detect() -> Self {
        KernelKind::ALL
            .into_iter()
            .rev()
            .find(|kind| kind.is_supported())
            .map_or_else(Self::scalar, |kind| Self { kind })
    }

    /// All kernels runnable on this CPU, baseline first.
    pub fn available() -> Vec<Self> {
        KernelKind::ALL
            .into_iter()
            .filter(|kind| kind.is_supported())
            .map(|kind| Self { kind })
            .collect()
    }

    pub fn kind(&self) -> KernelKind {
        self.kind
    }

    /// Computes the inner product of `a` and `b`.
    ///
    /// Both slices must have the same length. Release builds only read the
    /// common prefix when they do not.
    #[inline(always)]
    pub fn dot(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "dot product operands differ in length");
        let len = a.len().min(b.len());
        let (a, b) = (&a[..len], &b[..len]);

        match self.kind {
            KernelKind::Scalar => dot_scalar(a, b),
            // SAFETY: `DotKernel` values are only built after the feature check
            // for their kind succeeded.
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            KernelKind::Sse => unsafe { sse::dot_sse_impl(a, b) },
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            KernelKind::SseDp => unsafe { sse::dot_sse_dp_impl(a, b) },
            #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
            KernelKind::Sse | KernelKind::SseDp => dot_scalar(a, b),
        }
    }
}

impl Default for DotKernel {
    fn default() -> Self {
        Self::scalar()
    }
}

impl fmt::Display for DotKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Sequential accumulation, valid for any length.
#[inline(always)]
pub fn dot_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for (&x, &y) in a.iter().zip(b) {
        sum += x * y;
    }
    sum
}

fn cpu_has_sse3() -> bool {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        std::is_x86_feature_detected!("sse3")
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        false
    }
}

fn cpu_has_sse41() -> bool {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        std::is_x86_feature_detected!("sse4.1")
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        false
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod sse {
    #[cfg(target_arch = "x86")]
    use core::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use core::arch::x86_64::*;

    use super::VECTOR_WIDTH;

    /// `a` and `b` must have equal lengths.
    #[target_feature(enable = "sse,sse2,sse3")]
    pub(super) unsafe fn dot_sse_impl(a: &[f32], b: &[f32]) -> f32 {
        let len = a.len();
        let bulk = len - len % VECTOR_WIDTH;

        let mut acc = _mm_setzero_ps();
        let mut i = 0usize;
        while i < bulk {
            let va = unsafe { _mm_loadu_ps(a.as_ptr().add(i)) };
            let vb = unsafe { _mm_loadu_ps(b.as_ptr().add(i)) };
            acc = _mm_add_ps(acc, _mm_mul_ps(va, vb));
            i += VECTOR_WIDTH;
        }

        acc = _mm_hadd_ps(acc, acc);
        acc = _mm_hadd_ps(acc, acc);
        let mut sum = _mm_cvtss_f32(acc);

        for (&x, &y) in a[bulk..].iter().zip(&b[bulk..]) {
            sum += x * y;
        }

        sum
    }

    /// `a` and `b` must have equal lengths.
    #[target_feature(enable = "sse,sse2,sse3,ssse3,sse4.1")]
    pub(super) unsafe fn dot_sse_dp_impl(a: &[f32], b: &[f32]) -> f32 {
        let len = a.len();
        let bulk = len - len % VECTOR_WIDTH;

        let mut sum = 0.0f32;
        let mut i = 0usize;
        while i < bulk {
            let va = unsafe { _mm_loadu_ps(a.as_ptr().add(i)) };
            let vb = unsafe { _mm_loadu_ps(b.as_ptr().add(i)) };
            // Multiply all four lanes, store the sum in lane 0.
            let dp = _mm_dp_ps(va, vb, 0xF1);
            sum += _mm_cvtss_f32(dp);
            i += VECTOR_WIDTH;
        }

        for (&x, &y) in a[bulk..].iter().zip(&b[bulk..]) {
            sum += x * y;
        }

        sum
    }
}
