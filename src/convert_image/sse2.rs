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
    __m128i, _mm_and_si128, _mm_loadu_si128, _mm_packus_epi16, _mm_set1_epi16,
    _mm_setzero_si128, _mm_srli_epi16, _mm_storel_epi64, _mm_storeu_si128,
};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{
    __m128i, _mm_and_si128, _mm_loadu_si128, _mm_packus_epi16, _mm_set1_epi16,
    _mm_setzero_si128, _mm_srli_epi16, _mm_storel_epi64, _mm_storeu_si128,
};

const LANE_COUNT: usize = 16;
const YUYV_TO_I420_WAVES: usize = 2 * LANE_COUNT;

/// Deinterleave even and odd bytes of two registers (16-wide)
///
/// lo:   b15b14b13b12 b11b10b9b8 b7b6b5b4 b3b2b1b0
/// hi:   b31b30b29b28 ...                 b19b18b17b16
/// even: b30b28..b16 b14b12..b2b0
/// odd:  b31b29..b17 b15b13..b3b1
#[inline(always)]
unsafe fn deinterleave_ui8x2_16x(lo: __m128i, hi: __m128i) -> (__m128i, __m128i) {
    let mask = _mm_set1_epi16(0xFF);
    let even = _mm_packus_epi16(_mm_and_si128(lo, mask), _mm_and_si128(hi, mask));
    let odd = _mm_packus_epi16(_mm_srli_epi16(lo, 8), _mm_srli_epi16(hi, 8));

    (even, odd)
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn unpack_even_sse2(src: &[u8], y: &mut [u8], u: &mut [u8], v: &mut [u8]) {
    let src_group = src.as_ptr();
    let y_group = y.as_mut_ptr();
    let u_group = u.as_mut_ptr();
    let v_group = v.as_mut_ptr();

    for i in 0..(src.len() / YUYV_TO_I420_WAVES) {
        let yuyv = src_group.add(i * YUYV_TO_I420_WAVES);
        let (luma, chroma) = deinterleave_ui8x2_16x(
            _mm_loadu_si128(yuyv.cast()),
            _mm_loadu_si128(yuyv.add(LANE_COUNT).cast()),
        );
        _mm_storeu_si128(y_group.add(i * LANE_COUNT).cast(), luma);

        let (cb, cr) = deinterleave_ui8x2_16x(chroma, _mm_setzero_si128());
        _mm_storel_epi64(u_group.add(i * LANE_COUNT / 2).cast(), cb);
        _mm_storel_epi64(v_group.add(i * LANE_COUNT / 2).cast(), cr);
    }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn unpack_odd_sse2(src: &[u8], y: &mut [u8]) {
    let src_group = src.as_ptr();
    let y_group = y.as_mut_ptr();

    for i in 0..(src.len() / YUYV_TO_I420_WAVES) {
        let yuyv = src_group.add(i * YUYV_TO_I420_WAVES);
        let (luma, _) = deinterleave_ui8x2_16x(
            _mm_loadu_si128(yuyv.cast()),
            _mm_loadu_si128(yuyv.add(LANE_COUNT).cast()),
        );
        _mm_storeu_si128(y_group.add(i * LANE_COUNT).cast(), luma);
    }
}

/// 32 bytes (16 pixels) per iteration, using 128-bit registers.
pub struct Sse2;

impl RowUnpackStrategy for Sse2 {
    const BLOCK_SIZE: usize = YUYV_TO_I420_WAVES;

    unsafe fn unpack_even(src: &[u8], y: &mut [u8], u: &mut [u8], v: &mut [u8]) {
        debug_assert!(is_block_multiple(src.len(), Self::BLOCK_SIZE));
        debug_assert_eq!(y.len(), src.len() / 2);
        debug_assert_eq!(u.len(), src.len() / 4);
        debug_assert_eq!(v.len(), src.len() / 4);

        unpack_even_sse2(src, y, u, v);
    }

    unsafe fn unpack_odd(src: &[u8], y: &mut [u8]) {
        debug_assert!(is_block_multiple(src.len(), Self::BLOCK_SIZE));
        debug_assert_eq!(y.len(), src.len() / 2);

        unpack_odd_sse2(src, y);
    }
}

yuyv_to_i420_converter!(Sse2);
