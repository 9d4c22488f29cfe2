use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geoipmap::{
    project, AddressList, GeoRecord, GeoStore, Ipv4Network, MapGeometry, Matcher, Strategy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::net::Ipv4Addr;

fn generate_store(rng: &mut StdRng, count: usize) -> GeoStore {
    let records = (0..count)
        .map(|_| {
            let prefix_len = rng.random_range(8..=24);
            let network = Ipv4Network::new(Ipv4Addr::from(rng.random::<u32>()), prefix_len)
                .expect("prefix length in range");
            GeoRecord::new(
                network,
                rng.random_range(-80.0..80.0),
                rng.random_range(-180.0..180.0),
            )
        })
        .collect();
    GeoStore::from_records(records)
}

fn generate_addresses(rng: &mut StdRng, count: usize) -> AddressList {
    (0..count)
        .map(|i| {
            // Every 20th entry is garbage the matcher has to skip
            if i % 20 == 0 {
                format!("host-{}", i)
            } else {
                Ipv4Addr::from(rng.random::<u32>()).to_string()
            }
        })
        .collect()
}

fn bench_strategies(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x6e0_1f);
    let geometry = MapGeometry::new(2058, 1746).unwrap();

    let mut group = c.benchmark_group("strategies");
    group.sample_size(20);

    for (records, addresses) in [(1_000, 200), (10_000, 500)] {
        let store = generate_store(&mut rng, records);
        let list = generate_addresses(&mut rng, addresses);
        let label = format!("{}x{}", records, addresses);

        group.throughput(Throughput::Elements((records * addresses) as u64));

        for strategy in [
            Strategy::Sequential,
            Strategy::Partitioned { splits: 4 },
            Strategy::Partitioned { splits: 10 },
            Strategy::Pool { workers: 4 },
        ] {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), &label),
                &strategy,
                |b, &strategy| {
                    let matcher = Matcher::new(&store, &list, geometry).strategy(strategy);
                    b.iter(|| black_box(matcher.run().unwrap()));
                },
            );
        }
    }

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let geometry = MapGeometry::new(2058, 1746).unwrap();

    c.bench_function("project", |b| {
        b.iter(|| black_box(project(black_box(40.4168), black_box(-3.7038), &geometry)));
    });
}

fn bench_load(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let csv: String = (0..10_000)
        .map(|_| {
            format!(
                "{}/{},{:.4},{:.4}\n",
                Ipv4Addr::from(rng.random::<u32>() & 0xffff_ff00),
                24,
                rng.random_range(-80.0..80.0),
                rng.random_range(-180.0..180.0)
            )
        })
        .collect();

    let mut group = c.benchmark_group("load");
    group.throughput(Throughput::Bytes(csv.len() as u64));
    group.bench_function("geostore_10k", |b| {
        b.iter(|| black_box(GeoStore::from_reader(csv.as_bytes()).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_strategies, bench_projection, bench_load);
criterion_main!(benches);
