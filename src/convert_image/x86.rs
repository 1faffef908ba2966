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
use crate::convert_image::common::YUYV_DEPTH;
use crate::convert_image::RowUnpackStrategy;
use crate::{static_assert, yuyv_to_i420_converter};

/// One y0 u y1 v group
const GROUP_SIZE: usize = 4;
static_assert!(GROUP_SIZE == 2 * YUYV_DEPTH);

/// Byte-wise reference implementation, valid for any even width.
pub struct Portable;

impl RowUnpackStrategy for Portable {
    const BLOCK_SIZE: usize = GROUP_SIZE;

    unsafe fn unpack_even(src: &[u8], y: &mut [u8], u: &mut [u8], v: &mut [u8]) {
        debug_assert_eq!(src.len() % GROUP_SIZE, 0);
        debug_assert_eq!(y.len(), src.len() / 2);
        debug_assert_eq!(u.len(), src.len() / GROUP_SIZE);
        debug_assert_eq!(v.len(), src.len() / GROUP_SIZE);

        let groups = src.chunks_exact(GROUP_SIZE).zip(y.chunks_exact_mut(2));
        for ((group, luma), (cb, cr)) in groups.zip(u.iter_mut().zip(v.iter_mut())) {
            luma[0] = group[0];
            *cb = group[1];
            luma[1] = group[2];
            *cr = group[3];
        }
    }

    unsafe fn unpack_odd(src: &[u8], y: &mut [u8]) {
        debug_assert_eq!(src.len() % GROUP_SIZE, 0);
        debug_assert_eq!(y.len(), src.len() / 2);

        for (group, luma) in src.chunks_exact(GROUP_SIZE).zip(y.chunks_exact_mut(2)) {
            luma[0] = group[0];
            luma[1] = group[2];
        }
    }
}

yuyv_to_i420_converter!(Portable);
