#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Garbage rows must come back as errors, never a panic
    let _ = geoipmap::GeoStore::from_reader(data);
});
