// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
pub mod common;
pub mod x86;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod avx2;
#[cfg(target_arch = "aarch64")]
pub mod neon;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse2;

/// Row level de-interleaving of a packed yuyv line.
///
/// Every instruction set provides its own implementation; none of them share code,
/// and they must all produce the same bytes.
pub trait RowUnpackStrategy {
    /// Number of source bytes consumed by one loop iteration.
    /// Source rows must be a multiple of it.
    const BLOCK_SIZE: usize;

    /// Splits a row holding both luma and chroma.
    ///
    /// Writes `src.len() / 2` luma bytes, `src.len() / 4` u bytes and
    /// `src.len() / 4` v bytes.
    ///
    /// # Safety
    /// * The running cpu supports the strategy instruction set
    /// * `src.len()` is a multiple of `BLOCK_SIZE`
    /// * `y`, `u` and `v` are exactly as long as described above
    unsafe fn unpack_even(src: &[u8], y: &mut [u8], u: &mut [u8], v: &mut [u8]);

    /// Extracts luma only, chroma samples of the row are dropped.
    ///
    /// # Safety
    /// Same as [`RowUnpackStrategy::unpack_even`], with `y.len() == src.len() / 2`.
    unsafe fn unpack_odd(src: &[u8], y: &mut [u8]);
}

/// Converts a whole frame, one row pair at a time.
///
/// Each pair produces two luma lines and one line for each chroma plane.
/// Chroma is taken from the first line of the pair.
///
/// # Safety
/// * The running cpu supports the strategy instruction set
/// * `src_stride` is a multiple of `S::BLOCK_SIZE` and `height` is even
/// * `src` holds `src_stride * height` bytes, `y` holds `src_stride / 2 * height` bytes,
///   `u` and `v` hold `src_stride / 4 * height / 2` bytes each
#[inline(always)]
pub unsafe fn yuyv_to_i420<S: RowUnpackStrategy>(
    src_stride: usize,
    height: usize,
    src: &[u8],
    y: &mut [u8],
    u: &mut [u8],
    v: &mut [u8],
) {
    let y_stride = src_stride / 2;
    let uv_stride = src_stride / 4;

    debug_assert!(common::is_block_multiple(src_stride, S::BLOCK_SIZE));
    debug_assert_eq!(height % 2, 0);
    debug_assert_eq!(src.len(), src_stride * height);
    debug_assert_eq!(y.len(), y_stride * height);
    debug_assert_eq!(u.len(), uv_stride * (height / 2));
    debug_assert_eq!(v.len(), uv_stride * (height / 2));

    let src_pairs = src.chunks_exact(2 * src_stride);
    let y_pairs = y.chunks_exact_mut(2 * y_stride);
    let uv_lines = u
        .chunks_exact_mut(uv_stride)
        .zip(v.chunks_exact_mut(uv_stride));

    for ((src_pair, y_pair), (u_line, v_line)) in src_pairs.zip(y_pairs).zip(uv_lines) {
        let (src_even, src_odd) = src_pair.split_at(src_stride);
        let (y_even, y_odd) = y_pair.split_at_mut(y_stride);

        S::unpack_even(src_even, y_even, u_line, v_line);
        S::unpack_odd(src_odd, y_odd);
    }
}

/// Defines the dispatchable converter of an instruction set module,
/// given the strategy implemented by that module.
#[macro_export]
#[doc(hidden)]
macro_rules! yuyv_to_i420_converter {
    ($strategy:ty) => {
        pub const BLOCK_SIZE: usize = <$strategy as $crate::convert_image::RowUnpackStrategy>::BLOCK_SIZE;

        pub fn yuyv_i420(
            width: usize,
            height: usize,
            src_buffer: &[u8],
            y_plane: &mut [u8],
            u_plane: &mut [u8],
            v_plane: &mut [u8],
        ) {
            // Checked: geometry and buffer sizes are validated by the caller, and the
            // converter is only dispatched when the running cpu supports it
            unsafe {
                $crate::convert_image::yuyv_to_i420::<$strategy>(
                    2 * width,
                    height,
                    src_buffer,
                    y_plane,
                    u_plane,
                    v_plane,
                );
            }
        }
    };
}
