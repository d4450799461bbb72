#![no_main]
use libfuzzer_sys::fuzz_target;

use segy::ibm::{ibm_to_ieee, ieee_to_ibm};

fuzz_target!(|data: &[u8]| {
    for chunk in data.chunks_exact(4) {
        let bits = u32::from_be_bytes(chunk.try_into().unwrap());

        // Both directions are total over all 2^32 patterns.
        let ieee = ibm_to_ieee(bits);
        let _ = ieee_to_ibm(ieee);

        // A finite float survives a full round trip through IBM space.
        let x = f32::from_bits(bits);
        if x.is_finite() {
            let back = f32::from_bits(ibm_to_ieee(ieee_to_ibm(bits)));
            assert!(back.is_finite() || x.abs() > 1e38);
        }
    }
});
