#![allow(dead_code)]

use yuyv_planar::{Converter, ErrorKind, STRIDE_AUTO};

use rand::Rng;

pub const Y_SOLID: u8 = 100;
pub const U_SOLID: u8 = 128;
pub const V_SOLID: u8 = 64;

pub struct I420Image {
    pub y: Vec<u8>,
    pub u: Vec<u8>,
    pub v: Vec<u8>,
}

impl I420Image {
    pub fn new(width: usize, height: usize) -> Self {
        I420Image {
            y: vec![0_u8; width * height],
            u: vec![0_u8; (width / 2) * (height / 2)],
            v: vec![0_u8; (width / 2) * (height / 2)],
        }
    }

    pub fn concat(&self) -> Vec<u8> {
        [&self.y[..], &self.u[..], &self.v[..]].concat()
    }
}

/// Straightforward conversion, addressing every sample by its coordinates
pub fn reference_i420(width: usize, height: usize, src: &[u8]) -> I420Image {
    let stride = 2 * width;
    let mut image = I420Image::new(width, height);

    for row in 0..height {
        for col in 0..width {
            image.y[row * width + col] = src[row * stride + 2 * col];
        }
    }

    for row in 0..(height / 2) {
        for col in 0..(width / 2) {
            let group = 2 * row * stride + 4 * col;
            image.u[row * (width / 2) + col] = src[group + 1];
            image.v[row * (width / 2) + col] = src[group + 3];
        }
    }

    image
}

pub fn solid_yuyv(width: usize, height: usize) -> Vec<u8> {
    [Y_SOLID, U_SOLID, Y_SOLID, V_SOLID]
        .iter()
        .copied()
        .cycle()
        .take(2 * width * height)
        .collect()
}

/// Random samples in the range [0, 254]
pub fn random_yuyv(width: usize, height: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();

    (0..(2 * width * height))
        .map(|_| rng.gen_range(0..255_u8))
        .collect()
}

pub fn convert_with(
    converter: &Converter,
    width: usize,
    height: usize,
    src: &[u8],
) -> Result<I420Image, ErrorKind> {
    let mut image = I420Image::new(width, height);

    converter.convert(
        width as u32,
        height as u32,
        STRIDE_AUTO,
        src,
        &mut [&mut image.y[..], &mut image.u[..], &mut image.v[..]],
    )?;

    Ok(image)
}
