//! Row-partitioned fill of per-pixel output buffers.
//!
//! Every stage writes its output map through [`fill_rows`]: the buffer is
//! split into disjoint rows and each row is handed to exactly one call of the
//! kernel. With the `parallel` feature rows are distributed over the rayon
//! pool; otherwise they run in order on the calling thread.

#[cfg(feature = "parallel")]
pub(crate) fn fill_rows<T, F>(data: &mut [T], width: usize, kernel: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    use rayon::prelude::*;

    if width == 0 {
        return;
    }
    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| kernel(y, row));
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn fill_rows<T, F>(data: &mut [T], width: usize, kernel: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if width == 0 {
        return;
    }
    data.chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| kernel(y, row));
}
