#![warn(unused)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(clippy::too_many_lines)] // This requires effort to handle


#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test as test;

use itertools::iproduct;
use yp::{
    describe_acceleration, get_buffers_size, supported_instruction_sets, Converter, ErrorKind,
    ImageFormat, InstructionSet, PixelFormat,
};
use yuyv_planar as yp;

const MAX_NUMBER_OF_PLANES: u32 = 3;

const PIXEL_FORMATS: &[PixelFormat; 2] = &[PixelFormat::Yuyv, PixelFormat::I420];

fn check_err(result: Result<(), ErrorKind>, err: ErrorKind) {
    assert_eq!(result, Err(err));
}

#[test]
fn bootstrap() {
    let description = describe_acceleration();

    assert!(description.starts_with("{cpu-manufacturer:"));
    assert!(description.contains(",instruction-set:"));
    assert!(description.ends_with('}'));
}

#[test]
fn buffers_size() {
    const WIDTH: u32 = 640;
    const HEIGHT: u32 = 480;
    const AREA: usize = (WIDTH as usize) * (HEIGHT as usize);

    for (&pixel_format, num_planes) in iproduct!(PIXEL_FORMATS, 0..=MAX_NUMBER_OF_PLANES + 1) {
        let format = ImageFormat {
            pixel_format,
            num_planes,
        };

        let mut buffers_size = [0_usize; MAX_NUMBER_OF_PLANES as usize + 1];
        let result = get_buffers_size(WIDTH, HEIGHT, &format, &mut buffers_size);

        match (pixel_format, num_planes) {
            (PixelFormat::Yuyv, 1) => {
                assert!(result.is_ok());
                assert_eq!(buffers_size[0], 2 * AREA);
            }
            (PixelFormat::I420, 1) => {
                assert!(result.is_ok());
                assert_eq!(buffers_size[0], 3 * AREA / 2);
            }
            (PixelFormat::I420, 3) => {
                assert!(result.is_ok());
                assert_eq!(buffers_size[..3], [AREA, AREA / 4, AREA / 4]);
            }
            _ => check_err(result, ErrorKind::InvalidValue),
        }

        // Buffers size array is too short
        if result.is_ok() && num_planes > 0 {
            let mut buffers_size = vec![0_usize; num_planes as usize - 1];
            check_err(
                get_buffers_size(WIDTH, HEIGHT, &format, &mut buffers_size),
                ErrorKind::NotEnoughData,
            );
        }
    }
}

#[test]
fn buffers_size_geometry() {
    let format = ImageFormat {
        pixel_format: PixelFormat::I420,
        num_planes: 3,
    };

    let mut buffers_size = [0_usize; MAX_NUMBER_OF_PLANES as usize];
    for (width, height) in iproduct!(0..8_u32, 0..8_u32) {
        let result = get_buffers_size(width, height, &format, &mut buffers_size);

        if width > 0 && height > 0 && width % 2 == 0 && height % 2 == 0 {
            let area = (width * height) as usize;
            assert!(result.is_ok());
            assert_eq!(buffers_size, [area, area / 4, area / 4]);
        } else {
            check_err(result, ErrorKind::InvalidGeometry);
        }
    }
}

#[test]
fn buffers_size_overflow() {
    let format = ImageFormat {
        pixel_format: PixelFormat::Yuyv,
        num_planes: 1,
    };

    let mut buffers_size = [0_usize; 1];
    check_err(
        get_buffers_size(u32::MAX - 1, u32::MAX - 1, &format, &mut buffers_size),
        ErrorKind::NotEnoughData,
    );
}

#[test]
fn instruction_sets() {
    let sets = supported_instruction_sets();

    assert_eq!(sets.first(), Some(&InstructionSet::X86));
    assert!(sets.windows(2).all(|pair| pair[0] < pair[1]));

    let converter = Converter::new();
    assert_eq!(sets.last(), Some(&converter.instruction_set()));
    assert_eq!(converter, Converter::default());

    for &set in &sets {
        let pinned = Converter::with_instruction_set(set);
        assert!(pinned.is_ok());
        assert_eq!(pinned.map(|converter| converter.instruction_set()), Ok(set));
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[test]
fn unsupported_instruction_set() {
    let sets = supported_instruction_sets();

    for &set in &[InstructionSet::Sse2, InstructionSet::Avx2] {
        if !sets.contains(&set) {
            assert_eq!(
                Converter::with_instruction_set(set),
                Err(ErrorKind::InvalidOperation)
            );
        }
    }
}

#[test]
fn display() {
    assert_eq!(PixelFormat::Yuyv.to_string(), "yuyv");
    assert_eq!(PixelFormat::I420.to_string(), "i420");
    assert_eq!(InstructionSet::X86.to_string(), "x86");

    for err in &[
        ErrorKind::InvalidValue,
        ErrorKind::InvalidOperation,
        ErrorKind::NotEnoughData,
        ErrorKind::InvalidGeometry,
    ] {
        assert!(!err.to_string().is_empty());
    }
}
