//! End-to-end matcher tests against files on disk
//!
//! Every strategy must produce the set a brute-force scan of the cross
//! product produces, whatever the split/worker count.

use flate2::write::GzEncoder;
use flate2::Compression;
use geoipmap::{
    project, AddressList, CoordinateSet, GeoIpMapError, GeoRecord, GeoStore, Ipv4Network,
    MapGeometry, Matcher,
};
use geoipmap::Strategy as Method;
use proptest::prelude::*;
use std::fs;
use std::io::Write;
use std::net::Ipv4Addr;
use tempfile::TempDir;

const GEODB: &str = "\
1.0.0.0/24,-33.4940,143.2104
1.0.1.0/24,26.0614,119.3061
8.8.8.0/24,37.7510,-97.8220
10.0.0.0/8,40.4168,-3.7038
10.1.0.0/16,51.5074,-0.1278
0.0.0.0/0,0.0,0.0
";

fn world() -> MapGeometry {
    MapGeometry::builder(2058, 1746)
        .south_deg(-82.0)
        .build()
        .unwrap()
}

/// Reference result: test every pair, no partitioning
fn brute_force(store: &GeoStore, addresses: &AddressList, geometry: &MapGeometry) -> CoordinateSet {
    let mut expected = CoordinateSet::new();
    for record in store.records() {
        for entry in addresses.entries() {
            if let Ok(addr) = entry.trim().parse::<Ipv4Addr>() {
                if record.network.contains(addr) {
                    expected.insert(project(record.lat, record.lon, geometry));
                }
            }
        }
    }
    expected
}

fn all_strategies() -> Vec<Method> {
    let mut strategies = vec![Method::Sequential];
    for n in [0, 1, 2, 3, 5, 16] {
        strategies.push(Method::Partitioned { splits: n });
        strategies.push(Method::Pool { workers: n });
    }
    strategies
}

#[test]
fn test_strategies_match_brute_force() {
    let store = GeoStore::from_reader(GEODB.as_bytes()).unwrap();
    let addresses: AddressList = ["10.1.2.3", "8.8.8.8", "1.0.0.200", "bogus", "", "203.0.113.9"]
        .into_iter()
        .collect();
    let geometry = world();
    let expected = brute_force(&store, &addresses, &geometry);

    // 0.0.0.0/0 catches everything valid, so (0,0) is always present
    assert!(expected.contains(&project(0.0, 0.0, &geometry)));
    assert_eq!(expected.len(), 5);

    for strategy in all_strategies() {
        let report = Matcher::new(&store, &addresses, geometry)
            .strategy(strategy)
            .run_with_stats()
            .unwrap();
        assert_eq!(report.coordinates, expected, "strategy {}", strategy);
        assert_eq!(report.stats.invalid_addresses, 2);
        assert_eq!(report.stats.pairs_tested, store.len() * 4);
    }
}

#[test]
fn test_load_plain_and_gzip_files() {
    let temp = TempDir::new().unwrap();

    let plain_db = temp.path().join("geoip_ipv4.csv");
    fs::write(&plain_db, GEODB).unwrap();

    let gz_db = temp.path().join("geoip_ipv4.csv.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(GEODB.as_bytes()).unwrap();
    fs::write(&gz_db, encoder.finish().unwrap()).unwrap();

    let iplist = temp.path().join("ips.lst");
    fs::write(&iplist, "10.1.2.3\n  8.8.8.8  \nnope\n").unwrap();

    let plain = GeoStore::load(&plain_db).unwrap();
    let gz = GeoStore::load(&gz_db).unwrap();
    assert_eq!(plain, gz);
    assert_eq!(plain.len(), 6);

    let addresses = AddressList::load(&iplist).unwrap();
    assert_eq!(addresses.entries(), ["10.1.2.3", "8.8.8.8", "nope"]);

    let coordinates = Matcher::new(&gz, &addresses, world())
        .strategy(Method::pool(3))
        .run()
        .unwrap();
    // 10.0.0.0/8, 10.1.0.0/16, 8.8.8.0/24 and the catch-all
    assert_eq!(coordinates.len(), 4);
}

#[test]
fn test_undecodable_address_line_is_skipped() {
    let temp = TempDir::new().unwrap();
    let iplist = temp.path().join("ips.lst");
    fs::write(&iplist, b"8.8.8.8\n\xff\xfe\xfd\n10.1.2.3\n").unwrap();

    let store = GeoStore::from_reader(GEODB.as_bytes()).unwrap();
    let addresses = AddressList::load(&iplist).unwrap();
    assert_eq!(addresses.len(), 3);

    let report = Matcher::new(&store, &addresses, world())
        .strategy(Method::Partitioned { splits: 2 })
        .run_with_stats()
        .unwrap();
    assert_eq!(report.stats.invalid_addresses, 1);
    // 8.8.8.0/24, 10.0.0.0/8, 10.1.0.0/16 and the catch-all
    assert_eq!(report.coordinates.len(), 4);
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let err = GeoStore::load(temp.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, GeoIpMapError::Io(_)));
}

#[test]
fn test_bad_row_reports_line() {
    let db = "1.0.0.0/24,1.0,2.0\n1.0.1.0/24,north,2.0\n";
    match GeoStore::from_reader(db.as_bytes()) {
        Err(GeoIpMapError::Parse { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_run_is_repeatable() {
    let store = GeoStore::from_reader(GEODB.as_bytes()).unwrap();
    let addresses: AddressList = ["1.0.1.9", "10.200.0.1"].into_iter().collect();
    let matcher = Matcher::new(&store, &addresses, world()).strategy(Method::Partitioned { splits: 4 });

    let first = matcher.run().unwrap();
    let second = matcher.run().unwrap();
    assert_eq!(first, second);
}

fn arb_record() -> impl Strategy<Value = GeoRecord> {
    (any::<u32>(), 0u8..=32, -80.0f64..80.0, -180.0f64..180.0).prop_map(|(bits, len, lat, lon)| {
        let network = Ipv4Network::new(Ipv4Addr::from(bits), len).unwrap();
        GeoRecord::new(network, lat, lon)
    })
}

fn arb_entry() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => any::<u32>().prop_map(|bits| Ipv4Addr::from(bits).to_string()),
        // Clustered so short prefixes actually get hit
        4 => (0u32..4, any::<u16>()).prop_map(|(hi, lo)| Ipv4Addr::from((hi << 24) | u32::from(lo)).to_string()),
        1 => "[a-z .:]{0,12}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_strategy_equals_sequential(
        records in prop::collection::vec(arb_record(), 0..40),
        entries in prop::collection::vec(arb_entry(), 0..40),
        splits in -2i64..12,
        workers in -2i64..12,
    ) {
        let store = GeoStore::from_records(records);
        let addresses: AddressList = entries.iter().collect();
        let geometry = world();

        let expected = brute_force(&store, &addresses, &geometry);
        let sequential = Matcher::new(&store, &addresses, geometry).run().unwrap();
        prop_assert_eq!(&sequential, &expected);

        let partitioned = Matcher::new(&store, &addresses, geometry)
            .strategy(Method::partitioned(splits))
            .run()
            .unwrap();
        prop_assert_eq!(&partitioned, &expected);

        let pooled = Matcher::new(&store, &addresses, geometry)
            .strategy(Method::pool(workers))
            .run()
            .unwrap();
        prop_assert_eq!(&pooled, &expected);
    }

    #[test]
    fn prop_invalid_entry_changes_nothing(
        records in prop::collection::vec(arb_record(), 0..20),
        entries in prop::collection::vec(arb_entry(), 0..20),
        garbage in "[a-z:/ ]{0,10}|999\\.1\\.1\\.1|10\\.0\\.0|::1",
        at in any::<prop::sample::Index>(),
        workers in 0usize..6,
    ) {
        let store = GeoStore::from_records(records);
        let geometry = world();
        let clean: AddressList = entries.iter().collect();

        let mut dirty_entries = entries.clone();
        dirty_entries.insert(at.index(entries.len() + 1), garbage);
        let dirty: AddressList = dirty_entries.iter().collect();

        let before = Matcher::new(&store, &clean, geometry)
            .strategy(Method::Pool { workers })
            .run()
            .unwrap();
        let after = Matcher::new(&store, &dirty, geometry)
            .strategy(Method::Pool { workers })
            .run()
            .unwrap();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_partitions_cover_exactly(len in 0usize..500, parts in 0usize..40) {
        let ranges = geoipmap::matcher::partition_ranges(len, parts);
        prop_assert_eq!(ranges.len(), parts.max(1));
        let mut next = 0;
        for range in &ranges {
            prop_assert_eq!(range.start, next);
            prop_assert!(range.end >= range.start);
            next = range.end;
        }
        prop_assert_eq!(next, len);
    }
}
