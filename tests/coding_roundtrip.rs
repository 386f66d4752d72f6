use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tofcode_rs::coding::{fourier, gray, hamiltonian, CodeSet, GrayVariant, SchemeKind};
use tofcode_rs::decoding::{decode, Correlation, Decoder};
use tofcode_rs::units::{bin_to_depth, timestamp_to_histogram, SPEED_OF_LIGHT};
use tofcode_rs::{CodingMatrix, TemporalCode};

#[test]
fn gray_index_survives_both_level_conventions() {
    let code = gray::encode(200, 8, GrayVariant::ZeroMean).unwrap();
    let matrix = gray::build_zero_mean_matrix(8).unwrap();
    assert_eq!(decode(&code, &matrix, Correlation::Raw).unwrap(), 200);

    let code = gray::encode(200, 8, GrayVariant::Binary).unwrap();
    let matrix = gray::build_matrix(8).unwrap();
    assert_eq!(decode(&code, &matrix, Correlation::ZeroMean).unwrap(), 200);
}

#[test]
fn fourier_index_survives_decode() {
    let matrix = fourier::build_matrix(256, 4, false).unwrap();
    let code = fourier::encode(37, 256, 4, false).unwrap();
    assert_eq!(code.as_slice(), matrix.row(37));
    assert_eq!(decode(&code, &matrix, Correlation::ZeroMean).unwrap(), 37);
}

#[test]
fn noisy_gray_measurement_decodes_exactly() {
    // each +-1 level survives noise below 1 in magnitude
    let matrix = gray::build_zero_mean_matrix(8).unwrap();
    let decoder = Decoder::new(&matrix, Correlation::Raw).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let index = rng.random_range(0..256);
        let mut measured = gray::encode(index, 8, GrayVariant::ZeroMean).unwrap();
        for value in measured.iter_mut() {
            *value += rng.random_range(-0.4..0.4);
        }
        assert_eq!(decoder.decode(&measured).unwrap(), index);
    }
}

#[test]
fn noisy_fourier_measurement_decodes_nearby() {
    let matrix = fourier::build_matrix(256, 4, false).unwrap();
    let decoder = Decoder::new(&matrix, Correlation::ZeroMean).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let index = rng.random_range(0..256);
        let mut measured = fourier::encode(index, 256, 4, false).unwrap();
        for value in measured.iter_mut() {
            *value += rng.random_range(-0.02..0.02);
        }
        let decoded = decoder.decode(&measured).unwrap();
        let error = (index + 256 - decoded) % 256;
        assert!(error.min(256 - error) <= 2, "{} decoded as {}", index, decoded);
    }
}

#[test]
fn hamiltonian_modulation_has_unit_mean() {
    for k in 3..=5 {
        let (modfs, demodfs) = hamiltonian::build_hamiltonian(k, 120).unwrap();
        for c in 0..k {
            let total: f64 = modfs.column(c).iter().sum();
            assert!((total - 120.0).abs() < 1e-9, "k={} column {}: {}", k, c, total);
        }
        assert!(demodfs.as_slice().iter().all(|&d| d == 0.0 || d == 1.0));
    }
}

#[test]
fn hamiltonian_delays_decode_from_correlation_functions() {
    for k in 3..=5 {
        let set = CodeSet::hamiltonian(k, 120).unwrap();
        let decoder = Decoder::new(set.corrfs(), Correlation::ZeroMean).unwrap();
        for delay in 0..120 {
            let measured = set.encode(delay).unwrap();
            assert_eq!(decoder.decode(&measured).unwrap(), delay, "{}", set.name());
        }
    }
}

#[test]
fn repeated_correlation_rows_decode_to_an_equal_code() {
    // at N=128 some delays share a correlation row; decoding must land on a
    // delay with the same measurement
    let kinds = [
        SchemeKind::Hamiltonian { k: 3, n_samples: 128, complementary: false },
        SchemeKind::Hamiltonian { k: 4, n_samples: 128, complementary: false },
        SchemeKind::Hamiltonian { k: 5, n_samples: 128, complementary: false },
        SchemeKind::ItofGray { width: 4, complementary: false },
        SchemeKind::ItofGray { width: 7, complementary: true },
    ];
    for kind in kinds {
        let code = kind.create().unwrap();
        let decoder = Decoder::new(&code.coding_matrix().unwrap(), code.correlation()).unwrap();
        for delay in 0..code.domain_len() {
            let measured = code.encode(delay).unwrap();
            let decoded = decoder.decode(&measured).unwrap();
            let matched = code.encode(decoded).unwrap();
            for (a, b) in measured.iter().zip(&matched) {
                assert!((a - b).abs() < 1e-9, "{}: delay {} -> {}", code.name(), delay, decoded);
            }
        }
    }
}

#[test]
fn itof_gray_delays_decode_exactly() {
    let code = SchemeKind::ItofGray { width: 6, complementary: false }.create().unwrap();
    let decoder = Decoder::new(&code.coding_matrix().unwrap(), code.correlation()).unwrap();
    for delay in 0..64 {
        assert_eq!(decoder.decode(&code.encode(delay).unwrap()).unwrap(), delay);
    }
}

#[test]
fn complementary_set_doubles_every_code() {
    let set = CodeSet::hamiltonian(4, 96).unwrap();
    let comp = set.complementary().unwrap();
    assert_eq!(comp.name(), "k-4-8_n-96_hamilt-complementary");

    let (modfs, demodfs) = (comp.modfs(), comp.demodfs());
    for r in 0..96 {
        for c in 0..4 {
            assert_eq!(modfs[(r, c)], modfs[(r, c + 4)]);
            assert_eq!(demodfs[(r, c)] + demodfs[(r, c + 4)], 1.0);
        }
    }
    for r in 0..96 {
        for c in 0..4 {
            assert!((comp.corrfs()[(r, c)] - set.corrfs()[(r, c)]).abs() < 1e-9);
        }
    }
}

#[test]
fn batch_decode_matches_single_decode() {
    let code = SchemeKind::Fourier {
        domain_len: 100,
        n_freqs: 3,
        include_zeroth: false,
    }
    .create()
    .unwrap();
    let decoder = Decoder::new(&code.coding_matrix().unwrap(), code.correlation()).unwrap();

    let indices = [0, 13, 50, 99];
    let columns: Vec<Vec<f64>> = indices.iter().map(|&i| code.encode(i).unwrap()).collect();
    let measurements = CodingMatrix::from_columns(&columns).unwrap();

    let decoded = decoder.decode_batch(&measurements).unwrap();
    assert_eq!(decoded, indices);
    for (column, index) in columns.iter().zip(decoded) {
        assert_eq!(decoder.decode(column).unwrap(), index);
    }
}

#[test]
fn histogram_timestamp_to_depth() {
    // a one-hot histogram projected through the coding matrix is the code of
    // its timestamp
    let matrix = fourier::build_matrix(64, 3, false).unwrap();
    let hist = timestamp_to_histogram(21, 64).unwrap();
    let projected: Vec<f64> = (0..matrix.cols())
        .map(|c| {
            matrix
                .column(c)
                .iter()
                .zip(&hist)
                .map(|(m, h)| m * h)
                .sum::<f64>()
        })
        .collect();

    let index = decode(&projected, &matrix, Correlation::ZeroMean).unwrap();
    assert_eq!(index, 21);

    let depth = bin_to_depth(index, 64, 64e-9, SPEED_OF_LIGHT).unwrap();
    assert!((depth - 3.225).abs() < 1e-9);
}

#[test]
fn scheme_config_from_json_drives_round_trip() {
    let kind: SchemeKind = serde_json::from_str(
        r#"{"scheme": "hamiltonian", "k": 3, "n_samples": 120, "complementary": false}"#,
    )
    .unwrap();
    let code = kind.create().unwrap();
    assert_eq!(code.name(), "k-3_n-120_hamilt");

    let decoder = Decoder::new(&code.coding_matrix().unwrap(), code.correlation()).unwrap();
    for index in [0, 7, 64, 119] {
        assert_eq!(decoder.decode(&code.encode(index).unwrap()).unwrap(), index);
    }

    let json = serde_json::to_string(&code.coding_matrix().unwrap()).unwrap();
    let back: CodingMatrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back.shape(), (120, 3));
}
