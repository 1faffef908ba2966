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
#![warn(missing_docs)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(
    clippy::missing_safety_doc, // Until we add them...
    clippy::similar_names, // This requires effort to ensure
    // Yield false positives
    clippy::must_use_candidate,
)]

//! yuyv planar is a library to convert packed yuyv frames into planar i420 ones,
//! the usual input of video encoders.
//!
//! | Source pixel format  | Destination pixel formats  |
//! | -------------------- | -------------------------- |
//! | YUYV (YUY2)          | I420                       |
//!
//! Chroma is subsampled vertically by dropping the samples of odd rows: the chroma of
//! each 2x2 block is the one of its top row. No filtering nor color model conversion
//! is applied, bytes are copied as they are.
//!
//! The conversion is accelerated with SSE2, AVX2 or NEON when the running cpu supports
//! them. Every path produces the same output as the portable one.
//!
//! # Examples
//!
//! Convert a yuyv frame to i420, with separate planes:
//! ```
//! use yuyv_planar as yp;
//! use yp::{convert_image, STRIDE_AUTO};
//! use std::error;
//!
//! fn convert() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: usize = 640;
//!     const HEIGHT: usize = 480;
//!
//!     let src_data = vec![0u8; 2 * WIDTH * HEIGHT];
//!     let mut y_data = vec![0u8; WIDTH * HEIGHT];
//!     let mut u_data = vec![0u8; WIDTH * HEIGHT / 4];
//!     let mut v_data = vec![0u8; WIDTH * HEIGHT / 4];
//!
//!     convert_image(
//!         WIDTH as u32,
//!         HEIGHT as u32,
//!         STRIDE_AUTO,
//!         &src_data,
//!         &mut [&mut y_data[..], &mut u_data[..], &mut v_data[..]],
//!     )?;
//!
//!     Ok(())
//! }
//! # convert().unwrap();
//! ```
//!
//! Compute how many bytes are needed to store a single plane i420 image:
//! ```
//! use yuyv_planar as yp;
//! use yp::{get_buffers_size, ImageFormat, PixelFormat};
//! use std::error;
//!
//! fn compute_size() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: u32 = 640;
//!     const HEIGHT: u32 = 480;
//!
//!     let format = ImageFormat {
//!         pixel_format: PixelFormat::I420,
//!         num_planes: 1,
//!     };
//!
//!     let sizes: &mut [usize] = &mut [0usize; 1];
//!     get_buffers_size(WIDTH, HEIGHT, &format, sizes)?;
//!     assert_eq!(sizes[0], 640 * 480 * 3 / 2);
//!
//!     Ok(())
//! }
//! # compute_size().unwrap();
//! ```
//!
//! Pin the instruction set instead of relying on cpu detection:
//! ```
//! use yuyv_planar as yp;
//! use yp::{Converter, InstructionSet, STRIDE_AUTO};
//! use std::error;
//!
//! fn convert() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: usize = 64;
//!     const HEIGHT: usize = 2;
//!
//!     let src_data = vec![0u8; 2 * WIDTH * HEIGHT];
//!     let mut dst_data = vec![0u8; 3 * WIDTH * HEIGHT / 2];
//!
//!     let converter = Converter::with_instruction_set(InstructionSet::X86)?;
//!     converter.convert(
//!         WIDTH as u32,
//!         HEIGHT as u32,
//!         STRIDE_AUTO,
//!         &src_data,
//!         &mut [&mut dst_data[..]],
//!     )?;
//!
//!     Ok(())
//! }
//! # convert().unwrap();
//! ```
mod convert_image;
mod cpu_info;
mod dispatcher;
mod pixel_format;
mod static_assert;

use convert_image::common::{compute_geometry, Geometry};
use cpu_info::CpuManufacturer;
use std::error;
use std::fmt;
use std::sync::OnceLock;

pub use cpu_info::InstructionSet;
pub use pixel_format::{PixelFormat, STRIDE_AUTO};

/// An enumeration of errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub enum ErrorKind {
    /// One or more parameters have invalid values for the called function
    InvalidValue,
    /// The combination of parameters is unsupported for the called function
    InvalidOperation,
    /// Not enough data was provided to the called function. Typically, provided
    /// arrays are not correctly sized
    NotEnoughData,
    /// The image dimensions or stride violate the [`size constraints`]
    ///
    /// [`size constraints`]: ./fn.convert_image.html#errors
    InvalidGeometry,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::InvalidValue => write!(
                f,
                "One or more parameters have not legal values for the command"
            ),
            ErrorKind::InvalidOperation => write!(
                f,
                "The combination of parameters is not legal for the command"
            ),
            ErrorKind::NotEnoughData => write!(f, "Not enough data provided"),
            ErrorKind::InvalidGeometry => {
                write!(f, "Image dimensions or stride are not legal for the command")
            }
        }
    }
}

#[cfg(not(tarpaulin_include))]
impl error::Error for ErrorKind {
    fn cause(&self) -> Option<&dyn error::Error> {
        None
    }
}

/// Describes how the image data is laid out in memory.
///
/// # Note
/// Not all combinations of pixel format and number of planes describe a valid image format:
///
/// pixel format        | subsampling | w   | h   | #planes | #1     | #2     | #3
/// --------------------|:-----------:|:---:|:---:|:-------:|:------:|:------:|:-------:
/// `PixelFormat::Yuyv` | 4:2:2       |  2  |  2  | 1       | yuyv:2 |        |
/// `PixelFormat::I420` | 4:2:0       |  2  |  2  | 1, 3    | y:1    | u:1/4  | v:1/4
///
/// The values reported in columns `w` and `h` indicate that the described image should have
/// width and height that are non-zero multiples of the specified values.
///
/// When an i420 image has a single plane, the plane holds y, then u, then v.
#[derive(Copy, Clone, Debug)]
#[repr(C)]
pub struct ImageFormat {
    /// Pixel format
    pub pixel_format: PixelFormat,
    /// Number of planes
    pub num_planes: u32,
}

struct Context {
    manufacturer: CpuManufacturer,
    set: InstructionSet,
}

impl Context {
    pub fn global() -> &'static Context {
        static INSTANCE: OnceLock<Context> = OnceLock::new();
        INSTANCE.get_or_init(Context::new)
    }

    pub fn new() -> Self {
        let (manufacturer, set) = cpu_info::get();
        log::debug!(
            "cpu manufacturer {:?}, selected instruction set {}",
            manufacturer,
            set
        );

        Context { manufacturer, set }
    }
}

/// Returns a description of the algorithms that are best for the running cpu and
/// available instruction sets
///
/// # Examples
/// ```
/// use yuyv_planar as yp;
/// println!("{}", yp::describe_acceleration());
/// // => {cpu-manufacturer:Intel,instruction-set:Avx2}
/// ```
pub fn describe_acceleration() -> String {
    let state = Context::global();

    format!(
        "{{cpu-manufacturer:{:?},instruction-set:{:?}}}",
        state.manufacturer, state.set
    )
}

/// Returns the instruction sets the running cpu can execute, slowest first.
///
/// The first one is always [`InstructionSet::X86`], the portable path.
pub fn supported_instruction_sets() -> Vec<InstructionSet> {
    dispatcher::supported(Context::global().set).collect()
}

/// Compute number of bytes required to store an image given its format and dimensions
///
/// Images are assumed to be tightly packed: yuyv rows are `2 * width` bytes long,
/// luma rows `width` bytes long and chroma rows `width / 2` bytes long.
///
/// # Arguments
/// * `width` - Width of the image in pixels
/// * `height` - Height of the image in pixels
/// * `format` - Image format
/// * `buffers_size` - An array describing the minimum number of bytes required in each
///                    image planes
///
/// # Errors
///
/// * [`InvalidGeometry`] if `width` or `height` violate the [`size constraints`]
///
/// * [`InvalidValue`] if the image format has a number of planes which is not compatible
///   with its pixel format
///
/// * [`NotEnoughData`] if the buffers size array length is less than the
///   image format number of planes, or the sizes can not be represented
///
/// [`InvalidValue`]: ./enum.ErrorKind.html#variant.InvalidValue
/// [`InvalidGeometry`]: ./enum.ErrorKind.html#variant.InvalidGeometry
/// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
/// [`size constraints`]: ./struct.ImageFormat.html#note
pub fn get_buffers_size(
    width: u32,
    height: u32,
    format: &ImageFormat,
    buffers_size: &mut [usize],
) -> Result<(), ErrorKind> {
    if !pixel_format::are_planes_compatible(format.pixel_format, format.num_planes) {
        return Err(ErrorKind::InvalidValue);
    }

    let geometry = compute_geometry(width, height, STRIDE_AUTO)?;
    if pixel_format::get_buffers_size(
        format.pixel_format,
        format.num_planes,
        &geometry,
        buffers_size,
    ) {
        Ok(())
    } else {
        Err(ErrorKind::NotEnoughData)
    }
}

/// Splits the destination buffers into exactly sized y, u and v planes
fn split_planes<'a>(
    geometry: &Geometry,
    dst_buffers: &'a mut [&mut [u8]],
) -> Result<(&'a mut [u8], &'a mut [u8], &'a mut [u8]), ErrorKind> {
    let (y_size, uv_size) = (geometry.y_size, geometry.uv_size);

    match dst_buffers {
        [y_plane, u_plane, v_plane] => {
            if y_plane.len() < y_size || u_plane.len() < uv_size || v_plane.len() < uv_size {
                return Err(ErrorKind::NotEnoughData);
            }

            Ok((
                &mut y_plane[..y_size],
                &mut u_plane[..uv_size],
                &mut v_plane[..uv_size],
            ))
        }
        [i420_plane] => {
            if i420_plane.len() < geometry.i420_size() {
                return Err(ErrorKind::NotEnoughData);
            }

            let (y_plane, uv_plane) = i420_plane.split_at_mut(y_size);
            let (u_plane, v_plane) = uv_plane.split_at_mut(uv_size);
            Ok((y_plane, u_plane, &mut v_plane[..uv_size]))
        }
        _ => Err(ErrorKind::InvalidValue),
    }
}

/// Converts packed yuyv images to planar i420 ones, using a given instruction set.
///
/// A converter is cheap to copy and can be shared across threads. It holds no state
/// besides the selected instruction set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Converter {
    set: InstructionSet,
    pinned: bool,
}

impl Default for Converter {
    fn default() -> Self {
        Converter::new()
    }
}

impl Converter {
    /// Creates a converter using the best instruction set of the running cpu.
    ///
    /// Frames whose width is not a multiple of the instruction set block
    /// are converted with the portable path.
    pub fn new() -> Self {
        Converter {
            set: Context::global().set,
            pinned: false,
        }
    }

    /// Creates a converter that always uses the given instruction set.
    ///
    /// Vectorized instruction sets process 16 pixels at a time: converting a frame whose
    /// width is not a multiple of 16 fails with [`InvalidGeometry`].
    ///
    /// # Errors
    ///
    /// * [`InvalidOperation`] if the running cpu does not support `set`
    ///
    /// [`InvalidGeometry`]: ./enum.ErrorKind.html#variant.InvalidGeometry
    /// [`InvalidOperation`]: ./enum.ErrorKind.html#variant.InvalidOperation
    pub fn with_instruction_set(set: InstructionSet) -> Result<Self, ErrorKind> {
        if dispatcher::is_supported(set, Context::global().set) {
            Ok(Converter { set, pinned: true })
        } else {
            Err(ErrorKind::InvalidOperation)
        }
    }

    /// The instruction set this converter prefers
    pub fn instruction_set(&self) -> InstructionSet {
        self.set
    }

    /// Converts a packed yuyv image to a planar i420 image.
    ///
    /// See [`convert_image`] for a description of the arguments and of the errors.
    ///
    /// [`convert_image`]: ./fn.convert_image.html
    pub fn convert(
        &self,
        width: u32,
        height: u32,
        src_stride: usize,
        src_buffer: &[u8],
        dst_buffers: &mut [&mut [u8]],
    ) -> Result<(), ErrorKind> {
        if dst_buffers.len() != 1 && dst_buffers.len() != pixel_format::MAX_NUMBER_OF_PLANES {
            return Err(ErrorKind::InvalidValue);
        }

        let geometry = compute_geometry(width, height, src_stride)?;
        let dispatch = dispatcher::select(self.set, self.pinned, geometry.src_stride)
            .ok_or(ErrorKind::InvalidGeometry)?;

        if src_buffer.len() < geometry.src_size {
            return Err(ErrorKind::NotEnoughData);
        }

        let (y_plane, u_plane, v_plane) = split_planes(&geometry, dst_buffers)?;
        (dispatch.converter)(
            geometry.width,
            geometry.height,
            &src_buffer[..geometry.src_size],
            y_plane,
            u_plane,
            v_plane,
        );

        Ok(())
    }
}

/// Converts a packed yuyv image to a planar i420 image.
///
/// Luma is copied as is. Chroma of each 2x2 block of pixels is taken from the top row
/// of the block, chroma of the bottom row is dropped.
///
/// The best instruction set for the running cpu is used.
///
/// # Arguments
/// * `width` - Width of the image to convert in pixels
/// * `height` - Height of the image to convert in pixels
/// * `src_stride` - Distance in bytes between starts of consecutive lines in the
///                  source image. Use [`STRIDE_AUTO`] for packed data
/// * `src_buffer` - Source image buffer
/// * `dst_buffers` - Either three buffers for the y, u and v planes, or a single buffer
///                   holding the three planes one after the other
///
/// Buffers can be larger than needed: bytes past the end of the image are not touched.
///
/// # Errors
///
/// No buffer is written when an error is returned.
///
/// * [`InvalidGeometry`] if `width` or `height` are zero or odd
///
/// * [`InvalidGeometry`] if `src_stride` is neither [`STRIDE_AUTO`] nor `2 * width`
///
/// * [`InvalidValue`] if `dst_buffers` does not hold one or three buffers
///
/// * [`NotEnoughData`] if one or more source/destination buffers does not provide enough data.
///
///   You can compute the buffers' size using [`get_buffers_size`]
///
/// [`InvalidValue`]: ./enum.ErrorKind.html#variant.InvalidValue
/// [`InvalidGeometry`]: ./enum.ErrorKind.html#variant.InvalidGeometry
/// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
/// [`STRIDE_AUTO`]: ./constant.STRIDE_AUTO.html
/// [`get_buffers_size`]: ./fn.get_buffers_size.html
pub fn convert_image(
    width: u32,
    height: u32,
    src_stride: usize,
    src_buffer: &[u8],
    dst_buffers: &mut [&mut [u8]],
) -> Result<(), ErrorKind> {
    Converter::new().convert(width, height, src_stride, src_buffer, dst_buffers)
}

#[doc(hidden)]
#[cfg(not(tarpaulin_include))]
#[cfg(feature = "c_api")]
pub mod c_api {
    #![allow(clippy::wildcard_imports)]
    use super::*; // We are importing everything
    use std::convert::TryFrom;
    use std::ffi::CString;
    use std::os::raw::c_char;
    use std::ptr;
    use std::slice;

    #[repr(C)]
    pub enum Result {
        Ok,
        Err,
    }

    unsafe fn set_error(error: *mut ErrorKind, value: ErrorKind) -> self::Result {
        if !error.is_null() {
            *error = value;
        }

        self::Result::Err
    }

    /// C enums are untrusted in the sense you can cast any value to an enum type
    unsafe fn read_format(format: *const ImageFormat) -> Option<ImageFormat> {
        let pixel_format = ptr::addr_of!((*format).pixel_format).cast::<i32>().read();
        let num_planes = ptr::addr_of!((*format).num_planes).read();

        PixelFormat::try_from(pixel_format)
            .ok()
            .map(|pixel_format| ImageFormat {
                pixel_format,
                num_planes,
            })
    }

    #[no_mangle]
    pub extern "C" fn yp_describe_acceleration() -> *mut c_char {
        let acc = describe_acceleration();
        if let Ok(s) = CString::new(acc) {
            s.into_raw()
        } else {
            let p: *const c_char = ptr::null();
            p as *mut c_char
        }
    }

    #[no_mangle]
    pub unsafe extern "C" fn yp_unref_string(string: *mut c_char) {
        if !string.is_null() {
            let _unused = CString::from_raw(string);
        }
    }

    #[no_mangle]
    pub unsafe extern "C" fn yp_get_buffers_size(
        width: u32,
        height: u32,
        format: *const ImageFormat,
        buffers_size: *mut usize,
        error: *mut ErrorKind,
    ) -> self::Result {
        // Protect from C null pointers
        if format.is_null() || buffers_size.is_null() {
            return set_error(error, ErrorKind::InvalidValue);
        }

        let format = match read_format(format) {
            Some(format) => format,
            None => return set_error(error, ErrorKind::InvalidValue),
        };

        if !pixel_format::are_planes_compatible(format.pixel_format, format.num_planes) {
            return set_error(error, ErrorKind::InvalidValue);
        }

        let buffers_size = slice::from_raw_parts_mut(buffers_size, format.num_planes as usize);
        match get_buffers_size(width, height, &format, buffers_size) {
            Ok(_) => self::Result::Ok,
            Err(error_kind) => set_error(error, error_kind),
        }
    }

    #[no_mangle]
    pub unsafe extern "C" fn yp_convert_image(
        width: u32,
        height: u32,
        src_stride: usize,
        src_buffer: *const u8,
        dst_buffers: *const *mut u8,
        num_dst_planes: u32,
        error: *mut ErrorKind,
    ) -> self::Result {
        // Protect from C null pointers
        if src_buffer.is_null() || dst_buffers.is_null() {
            return set_error(error, ErrorKind::InvalidValue);
        }

        if !pixel_format::are_planes_compatible(PixelFormat::I420, num_dst_planes) {
            return set_error(error, ErrorKind::InvalidValue);
        }

        // Buffers are assumed to be as large as the geometry requires.
        // If the assumption will not hold undefined behaviour occurs (like in C)
        let geometry = match compute_geometry(width, height, src_stride) {
            Ok(geometry) => geometry,
            Err(error_kind) => return set_error(error, error_kind),
        };

        let plane_sizes = if num_dst_planes == 1 {
            [geometry.i420_size(), 0, 0]
        } else {
            [geometry.y_size, geometry.uv_size, geometry.uv_size]
        };

        let num_planes = num_dst_planes as usize;
        let mut planes: Vec<&mut [u8]> = Vec::with_capacity(num_planes);
        for (plane_index, &size) in plane_sizes.iter().take(num_planes).enumerate() {
            let ptr = *dst_buffers.add(plane_index);
            if ptr.is_null() {
                return set_error(error, ErrorKind::InvalidValue);
            }

            planes.push(slice::from_raw_parts_mut(ptr, size));
        }

        let src_buffer = slice::from_raw_parts(src_buffer, geometry.src_size);
        match convert_image(width, height, src_stride, src_buffer, &mut planes[..]) {
            Ok(_) => self::Result::Ok,
            Err(error_kind) => set_error(error, error_kind),
        }
    }
}
