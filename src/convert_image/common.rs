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
use crate::pixel_format::STRIDE_AUTO;
use crate::ErrorKind;

/// Bytes per pixel of the packed source
pub const YUYV_DEPTH: usize = 2;

/// Frame layout derived from the image dimensions
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub width: usize,
    pub height: usize,
    pub src_stride: usize,
    pub src_size: usize,
    pub y_size: usize,
    pub uv_size: usize,
}

impl Geometry {
    /// Bytes needed by a single plane i420 image
    pub fn i420_size(&self) -> usize {
        self.y_size + 2 * self.uv_size
    }
}

pub fn compute_stride(stride: usize, default_stride: usize) -> usize {
    if stride == STRIDE_AUTO {
        default_stride
    } else {
        stride
    }
}

pub fn is_block_multiple(x: usize, block_size: usize) -> bool {
    (x % block_size) == 0
}

/// Validates the frame dimensions and computes the plane sizes.
///
/// Width and height must be non-zero and even, and the source stride, once resolved,
/// must be exactly two bytes per pixel.
pub fn compute_geometry(width: u32, height: u32, src_stride: usize) -> Result<Geometry, ErrorKind> {
    if width == 0 || height == 0 || (width & 1) == 1 || (height & 1) == 1 {
        return Err(ErrorKind::InvalidGeometry);
    }

    let w = width as usize;
    let h = height as usize;
    let packed_stride = w.checked_mul(YUYV_DEPTH).ok_or(ErrorKind::NotEnoughData)?;
    let src_stride = compute_stride(src_stride, packed_stride);
    if src_stride != packed_stride {
        return Err(ErrorKind::InvalidGeometry);
    }

    // Sizes that cannot be represented cannot be backed by any buffer either
    let src_size = src_stride.checked_mul(h).ok_or(ErrorKind::NotEnoughData)?;
    let y_size = w.checked_mul(h).ok_or(ErrorKind::NotEnoughData)?;
    let uv_size = (w / 2) * (h / 2);

    Ok(Geometry {
        width: w,
        height: h,
        src_stride,
        src_size,
        y_size,
        uv_size,
    })
}
