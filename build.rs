//! Generates the Sobol direction vectors used by `genpoints::sobol`.
//!
//! The vectors are written to `$OUT_DIR/vectors.inc` as `MAX_DIMENSION`
//! and `VECTORS`, one `[u32; 32]` table per dimension.

use std::{env, fs::File, io::Write, path::Path};

/// The Joe-Kuo direction numbers for the first dimensions, in the format of
/// the `new-joe-kuo-6.21201` file.  Dimension 0 is implicit.
const DIRECTION_NUMBERS_TEXT: &str = include_str!("direction_numbers/new-joe-kuo-6.8.txt");

type SobolInt = u32;
const SOBOL_BITS: usize = std::mem::size_of::<SobolInt>() * 8;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=direction_numbers/new-joe-kuo-6.8.txt");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is not set");
    let dest_path = Path::new(&out_dir).join("vectors.inc");
    let mut f = File::create(&dest_path).expect("unable to create vectors.inc");

    let vectors = generate_direction_vectors();

    let mut text = String::new();
    text.push_str(&format!(
        "pub const MAX_DIMENSION: u32 = {};\n",
        vectors.len()
    ));
    text.push_str(&format!(
        "const VECTORS: &[[u{0}; {0}]] = &[\n",
        SOBOL_BITS
    ));
    for v in vectors.iter() {
        text.push_str("  [\n");
        for n in v.iter() {
            text.push_str(&format!("    0x{:08x},\n", *n));
        }
        text.push_str("  ],\n");
    }
    text.push_str("];\n");

    f.write_all(text.as_bytes())
        .expect("unable to write vectors.inc");
}

//======================================================================

// Direction vector construction follows:
//
//     * S. Joe and F. Y. Kuo, Remark on Algorithm 659: Implementing Sobol's
//       quasirandom sequence generator, ACM Trans. Math. Softw. 29,
//       49-57 (2003)
//
//     * S. Joe and F. Y. Kuo, Constructing Sobol sequences with better
//       two-dimensional projections, SIAM J. Sci. Comput. 30, 2635-2654 (2008)
//
// Direction numbers: Copyright (c) 2008, Frances Y. Kuo and Stephen Joe.
// All rights reserved.  Redistributed under the terms of their BSD-style
// license, see http://web.maths.unsw.edu.au/~fkuo/sobol/

fn generate_direction_vectors() -> Vec<[SobolInt; SOBOL_BITS]> {
    let mut vectors = Vec::new();

    // The first dimension is the van der Corput sequence.
    let mut dim_0 = [0 as SobolInt; SOBOL_BITS];
    for (i, v) in dim_0.iter_mut().enumerate() {
        *v = 1 << (SOBOL_BITS - 1 - i);
    }
    vectors.push(dim_0);

    for line in DIRECTION_NUMBERS_TEXT.lines() {
        let (a, m) = match parse_direction_numbers(line) {
            Ok(numbers) => numbers,
            // Header and comment lines.
            Err(_) => continue,
        };
        let s = m.len();

        let mut v = [0 as SobolInt; SOBOL_BITS];
        for i in 0..s.min(SOBOL_BITS) {
            v[i] = m[i] << (SOBOL_BITS - 1 - i);
        }
        for i in s..SOBOL_BITS {
            v[i] = v[i - s] ^ (v[i - s] >> s);
            for k in 1..s {
                if (a >> (s - 1 - k)) & 1 == 1 {
                    v[i] ^= v[i - k];
                }
            }
        }

        vectors.push(v);
    }

    vectors
}

/// Parses one line of the direction numbers file into its `a` and `m`
/// parts.
fn parse_direction_numbers(text: &str) -> Result<(u32, Vec<u32>), Box<dyn std::error::Error>> {
    let numbers: Vec<&str> = text.split_whitespace().collect();
    if numbers.len() < 4 || text.starts_with('#') {
        return Err("not a direction number line".into());
    }

    // `d` and `s` are implied by the line order and the length of `m`.
    let _d = numbers[0].parse::<u32>()?;
    let s = numbers[1].parse::<usize>()?;
    let a = numbers[2].parse::<u32>()?;

    let m = numbers[3..]
        .iter()
        .map(|n| n.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()?;
    if m.len() != s {
        return Err(format!("expected {} direction numbers, found {}", s, m.len()).into());
    }

    Ok((a, m))
}
