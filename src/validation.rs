//! Cross-module validation tests.
//!
//! These tests verify:
//! 1. **Round-trip correctness** across word widths and data shapes
//! 2. **Prefix-freeness** of code tables over randomized histograms
//! 3. **Bit stream** write/read symmetry up to 10,000 bits
//! 4. **Edge cases** - empty input, single symbol, sub-word inputs
//! 5. **Corruption detection** - truncated archives never decode silently
#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::bitstream::{BitReader, BitString};
    use crate::frequency::WordHistogram;
    use crate::tree::CodeTable;
    use crate::{compress, decompress};

    // ---------------------------------------------------------------
    // Helper: generate diverse test vectors
    // ---------------------------------------------------------------

    /// Highly compressible: single byte repeated.
    fn data_all_zeros(n: usize) -> Vec<u8> {
        vec![0u8; n]
    }

    /// Incompressible: every byte value once.
    fn data_uniform() -> Vec<u8> {
        (0..=255u8).collect()
    }

    /// Skewed distribution: 90% one byte, 10% another.
    fn data_skewed(n: usize) -> Vec<u8> {
        (0..n).map(|i| u8::from(i % 10 == 0)).collect()
    }

    /// Repetitive text with structure.
    fn data_repeating_text() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. ".repeat(40)
    }

    /// Seeded pseudo-random bytes.
    fn data_random(n: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.gen()).collect()
    }

    fn word_of(value: u32, width: usize) -> BitString {
        (0..width).map(|i| value >> i & 1 == 1).collect()
    }

    fn is_prefix(a: &BitString, b: &BitString) -> bool {
        a.len() <= b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
    }

    // ---------------------------------------------------------------
    // 1. Round trips
    // ---------------------------------------------------------------

    macro_rules! round_trip_test {
        ($name:ident, $data:expr) => {
            #[test]
            fn $name() {
                let input = $data;
                for wordbits in [1usize, 3, 4, 7, 8, 9, 12, 16, 32] {
                    let compressed = compress(&input, wordbits).unwrap();
                    let decompressed = decompress(&compressed).unwrap();
                    assert_eq!(
                        decompressed, input,
                        "round trip failed for wordbits={wordbits}"
                    );
                }
            }
        };
    }

    round_trip_test!(round_trip_all_zeros, data_all_zeros(777));
    round_trip_test!(round_trip_uniform, data_uniform());
    round_trip_test!(round_trip_skewed, data_skewed(1000));
    round_trip_test!(round_trip_text, data_repeating_text());
    round_trip_test!(round_trip_random, data_random(2048, 0xC0FFEE));
    round_trip_test!(round_trip_tiny, vec![0x42u8]);

    #[test]
    fn round_trip_random_lengths() {
        let mut rng = StdRng::seed_from_u64(31337);
        for _ in 0..50 {
            let len = rng.gen_range(1..512);
            let wordbits = rng.gen_range(1..=32);
            let input = data_random(len, rng.gen());
            let compressed = compress(&input, wordbits).unwrap();
            assert_eq!(
                decompress(&compressed).unwrap(),
                input,
                "len={len} wordbits={wordbits}"
            );
        }
    }

    #[test]
    fn skewed_data_actually_compresses() {
        let input = data_skewed(4096);
        let compressed = compress(&input, 8).unwrap();
        assert!(
            compressed.len() < input.len(),
            "compressed {} bytes, input {} bytes",
            compressed.len(),
            input.len()
        );
    }

    // ---------------------------------------------------------------
    // 2. Prefix-freeness over randomized histograms
    // ---------------------------------------------------------------

    #[test]
    fn random_histograms_yield_prefix_free_tables() {
        let mut rng = StdRng::seed_from_u64(4242);
        for distinct in [1usize, 2, 3, 5, 17, 64, 250, 1000] {
            let mut histogram = WordHistogram::new();
            let mut seen = std::collections::HashSet::new();
            while seen.len() < distinct {
                let value: u32 = rng.gen_range(0..1 << 16);
                if seen.insert(value) {
                    let count = rng.gen_range(1..50u64);
                    for _ in 0..count {
                        histogram.record(word_of(value, 16));
                    }
                }
            }

            let table = CodeTable::from_histogram(&histogram).unwrap();
            assert_eq!(table.len(), distinct);

            let codes: Vec<&BitString> = table.iter().map(|(_, c)| c).collect();
            for i in 0..codes.len() {
                for j in 0..codes.len() {
                    if i != j {
                        assert!(
                            !is_prefix(codes[i], codes[j]),
                            "{distinct} symbols: code {} is a prefix of {}",
                            codes[i],
                            codes[j]
                        );
                    }
                }
            }
        }
    }

    // ---------------------------------------------------------------
    // 3. Bit stream symmetry
    // ---------------------------------------------------------------

    #[test]
    fn bitstream_round_trip_up_to_ten_thousand_bits() {
        let mut rng = StdRng::seed_from_u64(99);
        for n in [0usize, 1, 7, 8, 9, 100, 1023, 4096, 10_000] {
            let original: BitString = (0..n).map(|_| rng.gen()).collect();
            let back = BitReader::new(original.as_bytes()).read(n);
            assert_eq!(back, original, "bitstream round trip failed for n={n}");
        }
    }

    // ---------------------------------------------------------------
    // 4. Edge cases
    // ---------------------------------------------------------------

    #[test]
    fn empty_input_is_a_no_op() {
        assert!(compress(&[], 8).unwrap().is_empty());
        assert!(decompress(&[]).unwrap().is_empty());
    }

    #[test]
    fn single_symbol_document() {
        let input = vec![0xEEu8; 200];
        let compressed = compress(&input, 8).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn input_smaller_than_word_width() {
        for len in 1..4usize {
            let input = data_random(len, len as u64);
            let compressed = compress(&input, 32).unwrap();
            assert_eq!(decompress(&compressed).unwrap(), input);
        }
    }

    // ---------------------------------------------------------------
    // 5. Corruption detection
    // ---------------------------------------------------------------

    #[test]
    fn every_truncation_is_rejected() {
        let compressed = compress(&data_repeating_text(), 8).unwrap();
        for cut in 1..compressed.len().min(600) {
            let truncated = &compressed[..compressed.len() - cut];
            assert!(
                decompress(truncated).is_err(),
                "truncating {cut} bytes decoded silently"
            );
        }
    }
}
