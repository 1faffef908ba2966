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
use crate::convert_image;
use crate::cpu_info::InstructionSet;
use paste::paste;

/// Converts a validated frame: width, height, yuyv source, y, u and v planes
pub type ConvertDispatcher = fn(usize, usize, &[u8], &mut [u8], &mut [u8], &mut [u8]);

#[derive(Copy, Clone)]
pub struct Dispatch {
    pub block_size: usize,
    pub converter: ConvertDispatcher,
}

macro_rules! dispatch {
    ($set:ident) => {
        paste! {
            Dispatch {
                block_size: convert_image::[<$set:lower>]::BLOCK_SIZE,
                converter: convert_image::[<$set:lower>]::yuyv_i420,
            }
        }
    };
}

pub fn get(set: InstructionSet) -> Dispatch {
    match set {
        InstructionSet::X86 => dispatch!(X86),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        InstructionSet::Sse2 => dispatch!(Sse2),
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        InstructionSet::Avx2 => dispatch!(Avx2),
        #[cfg(target_arch = "aarch64")]
        InstructionSet::Neon => dispatch!(Neon),
    }
}

/// Every cpu able to run an instruction set can run the slower ones too
pub fn is_supported(set: InstructionSet, best: InstructionSet) -> bool {
    set <= best
}

pub fn supported(best: InstructionSet) -> impl Iterator<Item = InstructionSet> {
    InstructionSet::ALL
        .iter()
        .copied()
        .filter(move |&set| is_supported(set, best))
}

/// Selects the converter for a source stride.
///
/// A pinned instruction set must accept the stride as is. Otherwise, when the stride
/// is not a multiple of the vector block, the whole frame goes through the portable
/// path, which accepts any even width.
pub fn select(set: InstructionSet, pinned: bool, src_stride: usize) -> Option<Dispatch> {
    let dispatch = get(set);
    if convert_image::common::is_block_multiple(src_stride, dispatch.block_size) {
        Some(dispatch)
    } else if pinned {
        None
    } else {
        log::trace!(
            "stride {} is not a multiple of {} bytes, falling back from {} to {}",
            src_stride,
            dispatch.block_size,
            set,
            InstructionSet::X86
        );
        Some(get(InstructionSet::X86))
    }
}
