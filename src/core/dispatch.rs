//! Kernel dispatch - launch one closure per element of a domain
//!
//! This is the only place that knows whether the pipeline runs on the rayon
//! pool or serially. Every function returns only after all elements finished,
//! so a call boundary is the barrier between two phases.
//!
//! Kernels receive the element index and exclusive access to that element's
//! output slot. Anything else they touch must be read-only or atomic.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Run `kernel(i, &mut out[i])` for every element of `out`
#[inline]
pub fn dispatch_mut<T, F>(out: &mut [T], kernel: F)
where
    T: Send,
    F: Fn(usize, &mut T) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        out.par_iter_mut()
            .enumerate()
            .for_each(|(i, slot)| kernel(i, slot));
    }
    #[cfg(not(feature = "parallel"))]
    {
        out.iter_mut()
            .enumerate()
            .for_each(|(i, slot)| kernel(i, slot));
    }
}

/// Run `kernel(i, &mut a[i], &mut b[i])` over two equal-length slices
///
/// Panics if the lengths differ (a programming error, never a runtime input).
#[inline]
pub fn dispatch_zip_mut<A, B, F>(a: &mut [A], b: &mut [B], kernel: F)
where
    A: Send,
    B: Send,
    F: Fn(usize, &mut A, &mut B) + Sync + Send,
{
    assert_eq!(a.len(), b.len(), "dispatch_zip_mut: length mismatch");
    #[cfg(feature = "parallel")]
    {
        a.par_iter_mut()
            .zip(b.par_iter_mut())
            .enumerate()
            .for_each(|(i, (x, y))| kernel(i, x, y));
    }
    #[cfg(not(feature = "parallel"))]
    {
        a.iter_mut()
            .zip(b.iter_mut())
            .enumerate()
            .for_each(|(i, (x, y))| kernel(i, x, y));
    }
}

/// Map every index in `0..len` and fold the results
///
/// `reduce` must be associative; `identity` must be its neutral element.
#[inline]
pub fn dispatch_reduce<R, M, F>(len: usize, identity: R, map: M, reduce: F) -> R
where
    R: Send + Sync + Copy,
    M: Fn(usize) -> R + Sync + Send,
    F: Fn(R, R) -> R + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..len)
            .into_par_iter()
            .map(map)
            .reduce(|| identity, reduce)
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..len).map(map).fold(identity, reduce)
    }
}
