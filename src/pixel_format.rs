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
use crate::convert_image::common::Geometry;
use core::convert::TryFrom;
use core::fmt;

pub const MAX_NUMBER_OF_PLANES: usize = 3;

/// An enumeration of supported pixel formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum PixelFormat {
    /// Packed YUV 4:2:2, also known as YUY2.
    /// Each pair of pixels is stored as Y0, U, Y1, V.
    ///
    /// 16 bits per pixel
    Yuyv,
    /// YUV with one luma plane Y then U chroma plane and last the V chroma plane.
    /// The two chroma planes are sub-sampled in both the horizontal and vertical dimensions by a factor of 2.
    ///
    /// 12 bits per pixel
    I420,
}

impl fmt::Display for PixelFormat {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PixelFormat::Yuyv => write!(f, "yuyv"),
            PixelFormat::I420 => write!(f, "i420"),
        }
    }
}

impl TryFrom<i32> for PixelFormat {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PixelFormat::Yuyv),
            1 => Ok(PixelFormat::I420),
            _ => Err(()),
        }
    }
}

/// If the source stride is assigned to this constant, the source will be assumed to contain packed data
pub const STRIDE_AUTO: usize = 0;

/// Yuyv is single plane. I420 is either three planes (y, u, v) or
/// a single plane holding y, then u, then v.
pub fn are_planes_compatible(pixel_format: PixelFormat, num_planes: u32) -> bool {
    match pixel_format {
        PixelFormat::Yuyv => num_planes == 1,
        PixelFormat::I420 => num_planes == 1 || num_planes == 3,
    }
}

/// Fills `buffers_size` with the tightly packed size of each plane.
///
/// Geometry must have been validated already.
pub fn get_buffers_size(
    pixel_format: PixelFormat,
    num_planes: u32,
    geometry: &Geometry,
    buffers_size: &mut [usize],
) -> bool {
    let num_planes = num_planes as usize;
    if buffers_size.len() < num_planes {
        return false;
    }

    match (pixel_format, num_planes) {
        (PixelFormat::Yuyv, _) => buffers_size[0] = geometry.src_size,
        (PixelFormat::I420, 1) => buffers_size[0] = geometry.i420_size(),
        (PixelFormat::I420, _) => {
            buffers_size[0] = geometry.y_size;
            buffers_size[1] = geometry.uv_size;
            buffers_size[2] = geometry.uv_size;
        }
    }

    true
}
