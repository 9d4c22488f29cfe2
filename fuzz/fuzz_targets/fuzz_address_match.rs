#![no_main]
use geoipmap::{AddressList, GeoStore, Ipv4Network, MapGeometry, Matcher, Strategy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Exercise prefix parsing on the raw input
    let _ = s.parse::<Ipv4Network>();

    let Ok(store) = GeoStore::from_reader(
        "1.2.3.4/32,10.0,10.0\n10.0.0.0/8,20.0,20.0\n0.0.0.0/0,0.0,0.0\n".as_bytes(),
    ) else {
        return;
    };
    let Ok(geometry) = MapGeometry::new(800, 600) else {
        return;
    };

    // Each fuzzed line is an address entry
    let addresses: AddressList = s.lines().collect();
    let sequential = Matcher::new(&store, &addresses, geometry).run();
    let pooled = Matcher::new(&store, &addresses, geometry)
        .strategy(Strategy::Pool { workers: 3 })
        .run();
    if let (Ok(a), Ok(b)) = (sequential, pooled) {
        assert_eq!(a, b);
    }
});
