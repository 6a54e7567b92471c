use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qbatch_core::{InitPolicy, Parameters};
use qbatch_gates::GateFamily;
use qbatch_sim::{
    Circuit, EntanglingLayer, ExecutionConfig, Executor, FeatureMap, GateOperator, Operation,
    VariationalLayer,
};
use qbatch_state::{random_state, zero_state};

fn create_layered_circuit(num_qubits: usize, depth: usize) -> Circuit {
    let mut circuit = Circuit::new(num_qubits).unwrap();
    circuit
        .push(FeatureMap::new(GateFamily::RX, num_qubits).unwrap())
        .unwrap();
    for d in 0..depth {
        let policy = InitPolicy::seeded(d as u64);
        circuit
            .push(VariationalLayer::with_init(GateFamily::U, num_qubits, policy).unwrap())
            .unwrap();
        circuit.push(EntanglingLayer::new(num_qubits).unwrap()).unwrap();
    }
    circuit
}

fn bench_gate_application(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_application");

    for num_qubits in [8, 12, 16].iter() {
        let state = random_state(*num_qubits, 4, Some(1)).unwrap();
        let h = GateOperator::h(num_qubits / 2, *num_qubits).unwrap();
        let cnot = GateOperator::cnot(0, num_qubits - 1, *num_qubits).unwrap();
        let ry = GateOperator::ry(1, *num_qubits).unwrap();
        let thetas = Parameters::batch(vec![0.1, 0.2, 0.3, 0.4]).unwrap();

        group.bench_with_input(BenchmarkId::new("hadamard", num_qubits), &state, |b, s| {
            b.iter(|| h.apply(black_box(s), None).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("cnot", num_qubits), &state, |b, s| {
            b.iter(|| cnot.apply(black_box(s), None).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("ry_batched", num_qubits), &state, |b, s| {
            b.iter(|| ry.apply(black_box(s), Some(&thetas)).unwrap())
        });
    }

    group.finish();
}

fn bench_batch_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_scaling");
    let num_qubits = 10;
    let circuit = create_layered_circuit(num_qubits, 3);

    for batch in [1, 8, 64].iter() {
        let state = zero_state(num_qubits, *batch).unwrap();
        let data = Parameters::batch((0..*batch).map(|b| b as f64 * 0.05).collect()).unwrap();
        for (label, config) in [
            ("sequential", ExecutionConfig::default().with_parallel_batch_threshold(usize::MAX)),
            ("parallel", ExecutionConfig::fast()),
        ] {
            group.bench_with_input(BenchmarkId::new(label, batch), &state, |b, s| {
                b.iter(|| circuit.apply_with(black_box(s), Some(&data), &config).unwrap())
            });
        }
    }

    group.finish();
}

fn bench_parameter_sweep(c: &mut Criterion) {
    let num_qubits = 8;
    let circuit = create_layered_circuit(num_qubits, 2);
    let state = zero_state(num_qubits, 1).unwrap();
    let sets: Vec<Parameters> = (0..32).map(|i| Parameters::scalar(i as f64 * 0.1)).collect();
    let executor = Executor::default();

    c.bench_function("run_batch_32_sets", |b| {
        b.iter(|| executor.run_batch(&circuit, black_box(&state), &sets))
    });
}

criterion_group!(
    benches,
    bench_gate_application,
    bench_batch_scaling,
    bench_parameter_sweep
);
criterion_main!(benches);
