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
use core::fmt;

#[cfg(target_arch = "x86")]
use core::arch::x86::{__cpuid, _xgetbv};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{__cpuid, _xgetbv};

/// Cpu vendor, as reported by cpuid leaf 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CpuManufacturer {
    Unknown,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Intel,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Amd,
}

/// An enumeration of the row unpacking strategies.
///
/// Variants are declared from the slowest to the fastest one, so the derived ordering
/// can be used to rank them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
pub enum InstructionSet {
    /// Portable byte-wise path. Available on every target.
    X86,
    /// 128-bit SSE2 path.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Sse2,
    /// 256-bit AVX2 path.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Avx2,
    /// 128-bit Advanced SIMD path.
    #[cfg(target_arch = "aarch64")]
    Neon,
}

impl InstructionSet {
    /// All the instruction sets known for the compilation target, slowest first.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub(crate) const ALL: &'static [InstructionSet] = &[
        InstructionSet::X86,
        InstructionSet::Sse2,
        InstructionSet::Avx2,
    ];
    #[cfg(target_arch = "aarch64")]
    pub(crate) const ALL: &'static [InstructionSet] = &[InstructionSet::X86, InstructionSet::Neon];
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    pub(crate) const ALL: &'static [InstructionSet] = &[InstructionSet::X86];
}

#[cfg(not(tarpaulin_include))]
impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InstructionSet::X86 => write!(f, "x86"),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            InstructionSet::Sse2 => write!(f, "sse2"),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            InstructionSet::Avx2 => write!(f, "avx2"),
            #[cfg(target_arch = "aarch64")]
            InstructionSet::Neon => write!(f, "neon"),
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const fn four_cc(a: u8, b: u8, c: u8, d: u8) -> u32 {
    ((d as u32) << 24) | ((c as u32) << 16) | ((b as u32) << 8) | (a as u32)
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn cpuid(functionnumber: u32, output: &mut [u32; 4]) {
    unsafe {
        let result = __cpuid(functionnumber);
        output[0] = result.eax;
        output[1] = result.ebx;
        output[2] = result.ecx;
        output[3] = result.edx;
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn compare_cpu_manufacturer(features: &[u32; 4], name: &[u8; 12]) -> u32 {
    features[1].wrapping_sub(four_cc(name[0], name[1], name[2], name[3]))
        | features[3].wrapping_sub(four_cc(name[4], name[5], name[6], name[7]))
        | features[2].wrapping_sub(four_cc(name[8], name[9], name[10], name[11]))
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub fn get() -> (CpuManufacturer, InstructionSet) {
    let mut manufacturer = CpuManufacturer::Unknown;
    let mut set = InstructionSet::X86;

    let features = &mut [0; 4];
    cpuid(0, features);

    if features[0] != 0 {
        if compare_cpu_manufacturer(features, b"GenuineIntel") == 0 {
            manufacturer = CpuManufacturer::Intel;
        } else if (compare_cpu_manufacturer(features, b"AuthenticAMD") == 0)
            | (compare_cpu_manufacturer(features, b"AMDisbetter!") == 0)
        {
            manufacturer = CpuManufacturer::Amd;
        }

        // This ensures we always use hardware intrinsics and we do not use software emulation
        let max_leaf = features[0];
        cpuid(1, features);
        if (features[3] & (1 << 26)) != 0 {
            set = InstructionSet::Sse2;

            // AVX registers are usable if all the following conditions hold:
            // - OS uses XSAVE/XRSTOR
            // - AVX supported by CPU
            // - AVX registers are restored at context switch
            // See https://software.intel.com/en-us/blogs/2011/04/14/is-avx-enabled/
            let xcr_feature_mask =
                if (features[2] & (1 << 27)) != 0 && (features[2] & (1 << 28)) != 0 {
                    unsafe { _xgetbv(0) }
                } else {
                    0
                };

            if (xcr_feature_mask & 0x6) == 0x6 && max_leaf >= 7 {
                cpuid(7, features);
                if (features[1] & (1 << 5)) != 0 {
                    set = InstructionSet::Avx2;
                }
            }
        }
    }

    (manufacturer, set)
}

#[cfg(target_arch = "aarch64")]
pub fn get() -> (CpuManufacturer, InstructionSet) {
    (CpuManufacturer::Unknown, InstructionSet::Neon)
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
pub fn get() -> (CpuManufacturer, InstructionSet) {
    (CpuManufacturer::Unknown, InstructionSet::X86)
}
