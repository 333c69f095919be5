//! Error-correcting-code seeding for candidate generation.
//!
//! Purely random candidate pools can contain near-identical barcodes, which
//! drags down the distance floor the genetic search starts from. As an
//! alternative, candidates can be drawn from a shortened Hamming code over
//! GF(4): every pair of codewords then differs in at least 3 positions. The
//! trade-off is yield — a length-m code with r parity symbols only has
//! 4^(m-r) codewords.
//!
//! Nucleotides map to field elements as A=0, C=1, G=2, T=3. The code is laid
//! over the free positions of the pattern; fixed positions are identical
//! across all candidates and do not affect pairwise distances.

use rand::Rng;
use rand::RngCore;

use crate::error::{DesignError, Result};
use crate::pattern::{BarcodePattern, NUCLEOTIDES};

/// GF(4) multiplication table (addition is bitwise XOR).
const GF4_MUL: [[u8; 4]; 4] = [
    [0, 0, 0, 0],
    [0, 1, 2, 3],
    [0, 2, 3, 1],
    [0, 3, 1, 2],
];

/// Draws random codewords of a shortened quaternary Hamming code, mapped
/// onto a barcode pattern.
#[derive(Debug, Clone)]
pub struct CodewordSampler {
    pattern: BarcodePattern,
    /// Parity matrix: one row per parity symbol, one column per information
    /// symbol.
    parity: Vec<Vec<u8>>,
    num_info: usize,
}

impl CodewordSampler {
    /// Builds a sampler for the given pattern.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::Configuration` if the pattern has fewer than 3
    /// free positions; a minimum distance of 3 is impossible below that.
    pub fn new(pattern: BarcodePattern) -> Result<Self> {
        let m = pattern.num_free();
        if m < 3 {
            return Err(DesignError::Configuration(format!(
                "code seeding requires at least 3 free pattern positions (got {m})"
            )));
        }

        // Smallest r such that the full [n, n-r] Hamming code over GF(4),
        // n = (4^r - 1) / 3, is long enough to shorten down to m symbols.
        let mut r = 2;
        while (4usize.pow(r as u32) - 1) / 3 < m {
            r += 1;
        }
        let num_info = m - r;

        // Columns of the parity-check matrix are projective representatives
        // (first nonzero coordinate equal to 1). The r unit vectors form the
        // identity part; columns with two or more nonzero coordinates feed
        // the parity equations of the systematic form H = [P | I].
        let mut parity = vec![Vec::with_capacity(num_info); r];
        let mut taken = 0;
        'columns: for raw in 1..4usize.pow(r as u32) {
            if taken == num_info {
                break;
            }
            let mut col = Vec::with_capacity(r);
            let mut v = raw;
            for _ in 0..r {
                col.push((v % 4) as u8);
                v /= 4;
            }
            let first_nonzero = col.iter().find(|&&c| c != 0);
            if first_nonzero != Some(&1) {
                continue 'columns;
            }
            if col.iter().filter(|&&c| c != 0).count() < 2 {
                continue 'columns;
            }
            for (row, &c) in parity.iter_mut().zip(col.iter()) {
                row.push(c);
            }
            taken += 1;
        }
        debug_assert_eq!(taken, num_info);

        Ok(Self {
            pattern,
            parity,
            num_info,
        })
    }

    /// The number of distinct codewords this sampler can emit.
    pub fn codeword_count(&self) -> usize {
        4usize.pow(self.num_info as u32)
    }

    /// Samples a uniformly random codeword and maps it onto the pattern.
    pub fn sample(&self, rng: &mut dyn RngCore) -> String {
        let info: Vec<u8> = (0..self.num_info).map(|_| rng.gen_range(0..4u8)).collect();
        let mut symbols = Vec::with_capacity(self.pattern.num_free());
        symbols.extend(info.iter().map(|&u| NUCLEOTIDES[u as usize]));
        for row in &self.parity {
            let mut p = 0u8;
            for (&coeff, &u) in row.iter().zip(info.iter()) {
                p ^= GF4_MUL[coeff as usize][u as usize];
            }
            symbols.push(NUCLEOTIDES[p as usize]);
        }
        self.pattern.fill_with(&symbols)
    }
}
