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
use crate::convert_image::common::is_block_multiple;
use crate::convert_image::RowUnpackStrategy;
use crate::yuyv_to_i420_converter;

#[cfg(target_arch = "x86")]
use core::arch::x86::{
    __m128i, _mm256_castsi256_si128, _mm256_extracti128_si256, _mm256_loadu_si256,
    _mm256_permute4x64_epi64, _mm256_setr_epi8, _mm256_shuffle_epi8, _mm_shuffle_epi32,
    _mm_storel_epi64, _mm_storeu_si128, _mm_unpackhi_epi64,
};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{
    __m128i, _mm256_castsi256_si128, _mm256_extracti128_si256, _mm256_loadu_si256,
    _mm256_permute4x64_epi64, _mm256_setr_epi8, _mm256_shuffle_epi8, _mm_shuffle_epi32,
    _mm_storel_epi64, _mm_storeu_si128, _mm_unpackhi_epi64,
};

const LANE_COUNT: usize = 32;
const YUYV_TO_I420_WAVES: usize = LANE_COUNT;

#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_wrap)]
const fn shuffle(z: u32, y: u32, x: u32, w: u32) -> i32 {
    // Checked: we want to reinterpret the bits
    ((z << 6) | (y << 4) | (x << 2) | w) as i32
}

/// Split 16 yuyv pixels into luma and chroma (32-wide)
///
/// Each 128-bit lane is first rearranged as:
/// lane: v3v2v1v0 u3u2u1u0 y7y6y5y4 y3y2y1y0
///
/// Then lanes are merged:
/// y:    y15..y8 y7..y0
/// uv:   v7v6v5v4 u7u6u5u4 v3v2v1v0 u3u2u1u0
#[inline(always)]
unsafe fn split_yuyv_32x(image: *const u8) -> (__m128i, __m128i) {
    let x = _mm256_loadu_si256(image.cast());
    let x = _mm256_shuffle_epi8(
        x,
        _mm256_setr_epi8(
            0, 2, 4, 6, 8, 10, 12, 14, 1, 5, 9, 13, 3, 7, 11, 15, 0, 2, 4, 6, 8, 10, 12, 14, 1,
            5, 9, 13, 3, 7, 11, 15,
        ),
    );
    let x = _mm256_permute4x64_epi64(x, shuffle(3, 1, 2, 0));

    (_mm256_castsi256_si128(x), _mm256_extracti128_si256(x, 1))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn unpack_even_avx2(src: &[u8], y: &mut [u8], u: &mut [u8], v: &mut [u8]) {
    let src_group = src.as_ptr();
    let y_group = y.as_mut_ptr();
    let u_group = u.as_mut_ptr();
    let v_group = v.as_mut_ptr();

    for i in 0..(src.len() / YUYV_TO_I420_WAVES) {
        let (luma, chroma) = split_yuyv_32x(src_group.add(i * YUYV_TO_I420_WAVES));
        _mm_storeu_si128(y_group.add(i * LANE_COUNT / 2).cast(), luma);

        // v7v6v5v4 v3v2v1v0 u7u6u5u4 u3u2u1u0
        let chroma = _mm_shuffle_epi32(chroma, shuffle(3, 1, 2, 0));
        _mm_storel_epi64(u_group.add(i * LANE_COUNT / 4).cast(), chroma);
        _mm_storel_epi64(
            v_group.add(i * LANE_COUNT / 4).cast(),
            _mm_unpackhi_epi64(chroma, chroma),
        );
    }
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn unpack_odd_avx2(src: &[u8], y: &mut [u8]) {
    let src_group = src.as_ptr();
    let y_group = y.as_mut_ptr();

    for i in 0..(src.len() / YUYV_TO_I420_WAVES) {
        let (luma, _) = split_yuyv_32x(src_group.add(i * YUYV_TO_I420_WAVES));
        _mm_storeu_si128(y_group.add(i * LANE_COUNT / 2).cast(), luma);
    }
}

/// 32 bytes (16 pixels) per iteration, using 256-bit registers.
pub struct Avx2;

impl RowUnpackStrategy for Avx2 {
    const BLOCK_SIZE: usize = YUYV_TO_I420_WAVES;

    unsafe fn unpack_even(src: &[u8], y: &mut [u8], u: &mut [u8], v: &mut [u8]) {
        debug_assert!(is_block_multiple(src.len(), Self::BLOCK_SIZE));
        debug_assert_eq!(y.len(), src.len() / 2);
        debug_assert_eq!(u.len(), src.len() / 4);
        debug_assert_eq!(v.len(), src.len() / 4);

        unpack_even_avx2(src, y, u, v);
    }

    unsafe fn unpack_odd(src: &[u8], y: &mut [u8]) {
        debug_assert!(is_block_multiple(src.len(), Self::BLOCK_SIZE));
        debug_assert_eq!(y.len(), src.len() / 2);

        unpack_odd_avx2(src, y);
    }
}

yuyv_to_i420_converter!(Avx2);
