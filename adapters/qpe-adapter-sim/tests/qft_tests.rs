//! Simulated behavior of the Fourier transforms built by `qpe-ir`.

use num_complex::Complex64;
use qpe_adapter_sim::{SimulatorBackend, StateSimulator};
use qpe_ir::{Circuit, QubitId};
use std::f64::consts::PI;

/// Global amplitude index of big-endian value `k` over `wires`.
fn global_index(k: usize, wires: &[QubitId]) -> usize {
    let m = wires.len();
    wires
        .iter()
        .enumerate()
        .fold(0, |acc, (j, q)| acc | (((k >> (m - 1 - j)) & 1) << q.index()))
}

fn prepare_basis(circuit: &mut Circuit, x: usize, wires: &[QubitId]) {
    let m = wires.len();
    for (j, &q) in wires.iter().enumerate() {
        if (x >> (m - 1 - j)) & 1 == 1 {
            circuit.x(q).unwrap();
        }
    }
}

#[test]
fn test_qft_on_basis_states() {
    let wires = [QubitId(2), QubitId(0), QubitId(1)];
    let n = 1 << wires.len();
    let norm = 1.0 / (n as f64).sqrt();
    for x in 0..n {
        let mut circuit = Circuit::with_size("qft", 3);
        prepare_basis(&mut circuit, x, &wires);
        circuit.append_qft(&wires).unwrap();

        let sv = SimulatorBackend::new().run(&circuit).unwrap();
        for k in 0..n {
            let expected = Complex64::from_polar(norm, 2.0 * PI * (x * k) as f64 / n as f64);
            let got = sv.amplitudes()[global_index(k, &wires)];
            assert!((got - expected).norm() < 1e-10, "x={x} k={k}: {got} vs {expected}");
        }
    }
}

#[test]
fn test_inverse_qft_undoes_qft() {
    let wires: Vec<QubitId> = (0..4).map(QubitId).collect();
    for x in [0, 3, 9, 15] {
        let mut circuit = Circuit::with_size("roundtrip", 4);
        prepare_basis(&mut circuit, x, &wires);
        circuit.append_qft(&wires).unwrap();
        circuit.append_inverse_qft(&wires).unwrap();

        let probs = SimulatorBackend::new()
            .probabilities(&circuit, &wires)
            .unwrap();
        assert!((probs[x] - 1.0).abs() < 1e-10, "x={x}: {probs:?}");
    }
}

#[test]
fn test_inverse_qft_reads_out_fourier_basis() {
    // Prepare (1/√N) Σ_k e^(2πi·yk/N)|k⟩ with H then phases, then check the
    // inverse QFT lands on |y⟩.
    let wires: Vec<QubitId> = (0..3).map(QubitId).collect();
    let m = wires.len();
    for y in 0..8usize {
        let mut circuit = Circuit::with_size("fourier", 3);
        for (j, &q) in wires.iter().enumerate() {
            circuit.h(q).unwrap();
            let weight = 1usize << (m - 1 - j);
            circuit
                .p(2.0 * PI * (y * weight) as f64 / 8.0, q)
                .unwrap();
        }
        circuit.append_inverse_qft(&wires).unwrap();

        let probs = SimulatorBackend::new()
            .probabilities(&circuit, &wires)
            .unwrap();
        assert!((probs[y] - 1.0).abs() < 1e-10, "y={y}: {probs:?}");
    }
}
