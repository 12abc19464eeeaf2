use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed nearest source pixel for every destination row and column.
pub struct ScaleLut {
    xs: Vec<usize>,
    ys: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    let axis = |dst: usize, src: usize| -> Vec<usize> {
        let s = src as f32 / dst as f32;
        (0..dst)
            .map(|i| ((i as f32 + 0.5) * s) as usize)
            .map(|i| i.min(src.saturating_sub(1)))
            .collect()
    };
    ScaleLut {
        xs: axis(dst_w, src_w),
        ys: axis(dst_h, src_h),
    }
}

/// Parallel nearest-neighbour stretch of `src` onto `dst`.
/// Rows are processed in parallel for cache friendly writes.
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    dst.par_chunks_mut(dw)
        .zip(lut.ys.par_iter())
        .for_each(|(dst_row, &sy)| {
            let src_row = &src[sy * sw..(sy + 1) * sw];
            for (d, &sx) in dst_row.iter_mut().zip(&lut.xs) {
                *d = src_row[sx];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_stays_in_source_bounds() {
        let lut = build_scale_lut(7, 5, 3, 2);
        assert_eq!(lut.dst_size(), (7, 5));
        assert!(lut.xs.iter().all(|&x| x < 3));
        assert!(lut.ys.iter().all(|&y| y < 2));
        assert_eq!(lut.xs.first(), Some(&0));
        assert_eq!(lut.xs.last(), Some(&2));
    }

    #[test]
    fn doubling_repeats_pixels() {
        let src = [1, 2, 3, 4];
        let lut = build_scale_lut(4, 4, 2, 2);
        let mut dst = [0u32; 16];
        blit_nearest_stretch(&mut dst, 4, &src, 2, &lut);
        assert_eq!(dst, [1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]);
    }
}
