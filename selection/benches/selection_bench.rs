use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use realm_selection::{layer_score, CrowdedRealmFinder, RealmSelector};
use realm_types::{
    Candidate, CandidateBase, Layer, LayerCandidate, ParcelPosition, PingStatus,
};

fn make_candidates(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| {
            let users = (i % 60) as u32;
            Candidate::LayerBased(LayerCandidate {
                base: CandidateBase {
                    catalyst_name: format!("catalyst{}", i / 8),
                    domain: format!("https://catalyst{}.example.org", i / 8),
                    connection_status: PingStatus::Ok,
                    elapsed_ms: 50 + (i as u64 * 37) % 2500,
                    lighthouse_version: "1.0.0".into(),
                    catalyst_version: "3.0.0".into(),
                },
                layer: Layer {
                    name: format!("layer{}", i % 8),
                    users_count: users,
                    max_users: 50,
                    users_parcels: Some(
                        (0..users as i32)
                            .map(|u| ParcelPosition::new(u % 9 - 4, u / 9 - 3))
                            .collect(),
                    ),
                },
                score: layer_score(users, 50),
            })
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("realm_select");
    let selector = RealmSelector::new();

    for count in [8, 64, 512] {
        let candidates = make_candidates(count);
        group.bench_with_input(BenchmarkId::new("select", count), &count, |b, _| {
            b.iter(|| black_box(selector.select(black_box(&candidates))))
        });
    }

    group.finish();
}

fn bench_crowded(c: &mut Criterion) {
    let mut group = c.benchmark_group("crowded_realm");
    let finder = CrowdedRealmFinder::default();

    for count in [8, 64, 512] {
        let candidates = make_candidates(count);
        let current = candidates[0].to_realm();
        group.bench_with_input(BenchmarkId::new("find", count), &count, |b, _| {
            b.iter(|| {
                black_box(finder.find(
                    black_box(&current),
                    ParcelPosition::new(0, 0),
                    black_box(&candidates),
                ))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select, bench_crowded);
criterion_main!(benches);
