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

use core::arch::aarch64::{vget_low_u8, vld2q_u8, vst1_u8, vst1q_u8, vuzp1q_u8, vuzp2q_u8};

const LANE_COUNT: usize = 16;
const YUYV_TO_I420_WAVES: usize = 2 * LANE_COUNT;

#[inline]
#[target_feature(enable = "neon")]
unsafe fn unpack_even_neon(src: &[u8], y: &mut [u8], u: &mut [u8], v: &mut [u8]) {
    let src_group = src.as_ptr();
    let y_group = y.as_mut_ptr();
    let u_group = u.as_mut_ptr();
    let v_group = v.as_mut_ptr();

    for i in 0..(src.len() / YUYV_TO_I420_WAVES) {
        // Luma in the first register, interleaved chroma in the second one
        let yuyv = vld2q_u8(src_group.add(i * YUYV_TO_I420_WAVES));
        vst1q_u8(y_group.add(i * LANE_COUNT), yuyv.0);

        let uv = yuyv.1;
        vst1_u8(u_group.add(i * LANE_COUNT / 2), vget_low_u8(vuzp1q_u8(uv, uv)));
        vst1_u8(v_group.add(i * LANE_COUNT / 2), vget_low_u8(vuzp2q_u8(uv, uv)));
    }
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn unpack_odd_neon(src: &[u8], y: &mut [u8]) {
    let src_group = src.as_ptr();
    let y_group = y.as_mut_ptr();

    for i in 0..(src.len() / YUYV_TO_I420_WAVES) {
        vst1q_u8(
            y_group.add(i * LANE_COUNT),
            vld2q_u8(src_group.add(i * YUYV_TO_I420_WAVES)).0,
        );
    }
}

/// 32 bytes (16 pixels) per iteration, using structure loads.
pub struct Neon;

impl RowUnpackStrategy for Neon {
    const BLOCK_SIZE: usize = YUYV_TO_I420_WAVES;

    unsafe fn unpack_even(src: &[u8], y: &mut [u8], u: &mut [u8], v: &mut [u8]) {
        debug_assert!(is_block_multiple(src.len(), Self::BLOCK_SIZE));
        debug_assert_eq!(y.len(), src.len() / 2);
        debug_assert_eq!(u.len(), src.len() / 4);
        debug_assert_eq!(v.len(), src.len() / 4);

        unpack_even_neon(src, y, u, v);
    }

    unsafe fn unpack_odd(src: &[u8], y: &mut [u8]) {
        debug_assert!(is_block_multiple(src.len(), Self::BLOCK_SIZE));
        debug_assert_eq!(y.len(), src.len() / 2);

        unpack_odd_neon(src, y);
    }
}

yuyv_to_i420_converter!(Neon);
