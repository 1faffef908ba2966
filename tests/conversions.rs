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
#![allow(clippy::cast_possible_truncation)]


#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test as test;

mod common;

use common::{
    convert_with, random_yuyv, reference_i420, solid_yuyv, I420Image, U_SOLID, V_SOLID, Y_SOLID,
};
use itertools::iproduct;
use yp::{
    convert_image, get_buffers_size, supported_instruction_sets, Converter, ImageFormat,
    InstructionSet, PixelFormat, STRIDE_AUTO,
};
use yuyv_planar as yp;

// Vectorized paths consume 16 pixels per iteration
const ALIGNED_WIDTH: usize = 16;
const GUARD: u8 = 255;
const GUARD_SIZE: usize = 64;

fn pinned(set: InstructionSet) -> Converter {
    match Converter::with_instruction_set(set) {
        Ok(converter) => converter,
        Err(err) => panic!("{} is not supported: {}", set, err),
    }
}

#[test]
fn minimal_frame() {
    let src = [
        100_u8, 128, 101, 64, 102, 128, 103, 64, 110, 0, 111, 0, 112, 0, 113, 0,
    ];
    let mut y = [0_u8; 8];
    let mut u = [0_u8; 2];
    let mut v = [0_u8; 2];

    assert!(convert_image(
        4,
        2,
        8,
        &src,
        &mut [&mut y[..], &mut u[..], &mut v[..]]
    )
    .is_ok());
    assert_eq!(y, [100, 101, 102, 103, 110, 111, 112, 113]);
    assert_eq!(u, [128, 128]);
    assert_eq!(v, [64, 64]);
}

#[test]
fn explicit_stride() {
    let src = [10_u8, 20, 11, 30, 12, 21, 13, 31];
    let mut image = I420Image::new(2, 2);

    assert!(convert_image(
        2,
        2,
        4,
        &src,
        &mut [&mut image.y[..], &mut image.u[..], &mut image.v[..]]
    )
    .is_ok());
    assert_eq!(image.y, [10, 11, 12, 13]);
    assert_eq!(image.u, [20]);
    assert_eq!(image.v, [30]);
}

#[test]
fn solid_color() {
    const WIDTH: usize = 64;
    const HEIGHT: usize = 32;

    let src = solid_yuyv(WIDTH, HEIGHT);
    for set in supported_instruction_sets() {
        let image = convert_with(&pinned(set), WIDTH, HEIGHT, &src);
        assert!(image.is_ok());

        if let Ok(image) = image {
            assert!(image.y.iter().all(|&x| x == Y_SOLID));
            assert!(image.u.iter().all(|&x| x == U_SOLID));
            assert!(image.v.iter().all(|&x| x == V_SOLID));
        }
    }
}

#[test]
fn chroma_from_even_rows() {
    const WIDTH: usize = 32;
    const HEIGHT: usize = 8;

    // Even rows carry chroma equal to the row index, odd rows carry 200 + row index
    let mut src = vec![0_u8; 2 * WIDTH * HEIGHT];
    for (row_index, row) in src.chunks_exact_mut(2 * WIDTH).enumerate() {
        let chroma = if row_index % 2 == 0 {
            row_index as u8
        } else {
            200 + row_index as u8
        };

        for group in row.chunks_exact_mut(4) {
            group.copy_from_slice(&[1, chroma, 2, chroma + 1]);
        }
    }

    for set in supported_instruction_sets() {
        let image = convert_with(&pinned(set), WIDTH, HEIGHT, &src);
        assert!(image.is_ok());

        if let Ok(image) = image {
            for (chroma_row, (u_row, v_row)) in image
                .u
                .chunks_exact(WIDTH / 2)
                .zip(image.v.chunks_exact(WIDTH / 2))
                .enumerate()
            {
                let expected = (2 * chroma_row) as u8;
                assert!(u_row.iter().all(|&x| x == expected));
                assert!(v_row.iter().all(|&x| x == expected + 1));
            }

            assert!(image.y.chunks_exact(2).all(|pair| pair == [1, 2]));
        }
    }
}

#[test]
fn ramp_720p() {
    const WIDTH: usize = 1280;
    const HEIGHT: usize = 720;

    let mut src = vec![0_u8; 2 * WIDTH * HEIGHT];
    for (i, x) in src.iter_mut().enumerate() {
        *x = i as u8;
    }

    for set in supported_instruction_sets() {
        let image = convert_with(&pinned(set), WIDTH, HEIGHT, &src);
        assert!(image.is_ok());

        if let Ok(image) = image {
            for (i, &y) in image.y.iter().enumerate() {
                assert_eq!(y, (2 * i) as u8);
            }

            for (row, col) in iproduct!(0..HEIGHT / 2, 0..WIDTH / 2) {
                let offset = 4 * WIDTH * row + 4 * col;
                assert_eq!(image.u[row * (WIDTH / 2) + col], (offset + 1) as u8);
                assert_eq!(image.v[row * (WIDTH / 2) + col], (offset + 3) as u8);
            }
        }
    }
}

#[test]
fn coverage() {
    // Source samples never equal the guard value: a guard left in the image means
    // a byte was skipped, a guard overwritten past the image means an overrun
    for (width, height) in iproduct!((2..=70).step_by(2), (2..=10).step_by(2)) {
        let src = random_yuyv(width, height);
        let expected = reference_i420(width, height, &src);

        let y_size = width * height;
        let uv_size = y_size / 4;
        let mut y = vec![GUARD; y_size + GUARD_SIZE];
        let mut u = vec![GUARD; uv_size + GUARD_SIZE];
        let mut v = vec![GUARD; uv_size + GUARD_SIZE];

        assert!(convert_image(
            width as u32,
            height as u32,
            STRIDE_AUTO,
            &src,
            &mut [&mut y[..], &mut u[..], &mut v[..]],
        )
        .is_ok());

        assert_eq!(y[..y_size], expected.y[..]);
        assert_eq!(u[..uv_size], expected.u[..]);
        assert_eq!(v[..uv_size], expected.v[..]);
        assert!(y[y_size..].iter().all(|&x| x == GUARD));
        assert!(u[uv_size..].iter().all(|&x| x == GUARD));
        assert!(v[uv_size..].iter().all(|&x| x == GUARD));
    }
}

#[test]
fn single_plane() {
    const WIDTH: u32 = 48;
    const HEIGHT: u32 = 6;

    let format = ImageFormat {
        pixel_format: PixelFormat::I420,
        num_planes: 1,
    };

    let mut buffers_size = [0_usize; 1];
    assert!(get_buffers_size(WIDTH, HEIGHT, &format, &mut buffers_size).is_ok());

    let src = random_yuyv(WIDTH as usize, HEIGHT as usize);
    let mut single = vec![GUARD; buffers_size[0] + GUARD_SIZE];
    assert!(convert_image(WIDTH, HEIGHT, STRIDE_AUTO, &src, &mut [&mut single[..]]).is_ok());

    let expected = reference_i420(WIDTH as usize, HEIGHT as usize, &src);
    assert_eq!(single[..buffers_size[0]], expected.concat()[..]);
    assert!(single[buffers_size[0]..].iter().all(|&x| x == GUARD));
}

#[test]
fn strategy_equivalence() {
    let reference = pinned(InstructionSet::X86);
    let sets = supported_instruction_sets();

    for (width, height) in iproduct!(
        (ALIGNED_WIDTH..=10 * ALIGNED_WIDTH).step_by(ALIGNED_WIDTH),
        (2..=8).step_by(2)
    ) {
        let src = random_yuyv(width, height);
        let portable = convert_with(&reference, width, height, &src);
        assert!(portable.is_ok());

        if let Ok(portable) = portable {
            let expected = reference_i420(width, height, &src);
            assert_eq!(portable.concat(), expected.concat());

            for &set in &sets[1..] {
                let image = convert_with(&pinned(set), width, height, &src);
                assert_eq!(image.map(|image| image.concat()), Ok(portable.concat()));
            }
        }
    }
}

#[test]
fn unaligned_width_fallback() {
    let converter = Converter::new();

    for (width, height) in iproduct!((2..ALIGNED_WIDTH * 3).step_by(2), (2..=4).step_by(2)) {
        if width % ALIGNED_WIDTH == 0 {
            continue;
        }

        let src = random_yuyv(width, height);
        let image = convert_with(&converter, width, height, &src);
        let expected = reference_i420(width, height, &src);
        assert_eq!(image.map(|image| image.concat()), Ok(expected.concat()));
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn concurrent_conversions() {
    const WIDTH: usize = 256;
    const HEIGHT: usize = 64;

    let src = random_yuyv(WIDTH, HEIGHT);
    let expected = reference_i420(WIDTH, HEIGHT, &src).concat();
    let converter = Converter::new();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let image = convert_with(&converter, WIDTH, HEIGHT, &src);
                assert_eq!(image.map(|image| image.concat()), Ok(expected.clone()));
            });
        }
    });
}
