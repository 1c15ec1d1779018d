use crate::error::ResizeError;
use crate::options::Algorithm;
use crate::plane::Plane;

const WEIGHT_BITS: u32 = 11;
const ONE: u32 = 1 << WEIGHT_BITS;
const ROUND: u32 = 1 << (2 * WEIGHT_BITS - 1);

/// Source sample pair and fixed-point weight of the second sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tap {
    i0: usize,
    i1: usize,
    w: u32,
}

/// Maps a destination index onto the source axis, clamped to valid samples.
fn source_coord(x: usize, src: usize, dst: usize) -> f64 {
    let pos = (x as f64 + 0.5) * src as f64 / dst as f64 - 0.5;
    pos.clamp(0.0, (src - 1) as f64)
}

/// Reserves room for one entry per destination sample without aborting.
fn per_sample<T>(dst: usize) -> Result<Vec<T>, ResizeError> {
    let mut out = Vec::new();
    out.try_reserve_exact(dst)
        .map_err(|_| ResizeError::Allocation(dst.saturating_mul(size_of::<T>())))?;
    Ok(out)
}

fn bilinear_taps(src: usize, dst: usize) -> Result<Vec<Tap>, ResizeError> {
    let mut taps = per_sample(dst)?;
    taps.extend((0..dst).map(|x| {
        let pos = source_coord(x, src, dst);
        let i0 = pos.floor() as usize;
        let i1 = (i0 + 1).min(src - 1);
        let w = ((pos - i0 as f64) * ONE as f64).round() as u32;
        Tap { i0, i1, w }
    }));
    Ok(taps)
}

fn nearest_indices(src: usize, dst: usize) -> Result<Vec<usize>, ResizeError> {
    let mut indices = per_sample(dst)?;
    indices.extend((0..dst).map(|x| {
        let pos = (x as f64 + 0.5) * src as f64 / dst as f64;
        (pos.floor() as usize).min(src - 1)
    }));
    Ok(indices)
}

/// Resamples `src` to `width` x `height`.
///
/// Equal dimensions return an exact copy, whatever the algorithm.
pub(crate) fn resample(
    src: &Plane,
    width: usize,
    height: usize,
    algorithm: Algorithm,
) -> Result<Plane, ResizeError> {
    if width == src.width && height == src.height {
        return src.try_clone();
    }
    tracing::trace!(
        from_w = src.width,
        from_h = src.height,
        to_w = width,
        to_h = height,
        ?algorithm,
        "resampling plane"
    );
    match algorithm {
        Algorithm::Nearest => nearest(src, width, height),
        Algorithm::Bilinear => bilinear(src, width, height),
    }
}

fn nearest(src: &Plane, width: usize, height: usize) -> Result<Plane, ResizeError> {
    let ch = src.channels;
    let mut dst = Plane::new(width, height, ch)?;
    let xs = nearest_indices(src.width, width)?;
    let ys = nearest_indices(src.height, height)?;

    for (y, &sy) in ys.iter().enumerate() {
        let src_row = src.row(sy);
        let dst_row = dst.row_mut(y);
        for (x, &sx) in xs.iter().enumerate() {
            dst_row[x * ch..(x + 1) * ch].copy_from_slice(&src_row[sx * ch..(sx + 1) * ch]);
        }
    }
    Ok(dst)
}

fn bilinear(src: &Plane, width: usize, height: usize) -> Result<Plane, ResizeError> {
    let ch = src.channels;
    let mut dst = Plane::new(width, height, ch)?;
    let xs = bilinear_taps(src.width, width)?;
    let ys = bilinear_taps(src.height, height)?;

    for (y, ty) in ys.iter().enumerate() {
        let top = src.row(ty.i0);
        let bottom = src.row(ty.i1);
        let dst_row = dst.row_mut(y);
        for (x, tx) in xs.iter().enumerate() {
            let (a, b) = (tx.i0 * ch, tx.i1 * ch);
            for c in 0..ch {
                let t = top[a + c] as u32 * (ONE - tx.w) + top[b + c] as u32 * tx.w;
                let m = bottom[a + c] as u32 * (ONE - tx.w) + bottom[b + c] as u32 * tx.w;
                let v = (t * (ONE - ty.w) + m * ty.w + ROUND) >> (2 * WEIGHT_BITS);
                dst_row[x * ch + c] = v.min(255) as u8;
            }
        }
    }
    Ok(dst)
}
