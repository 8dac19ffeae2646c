#![no_main]

use libfuzzer_sys::fuzz_target;
use rhizome_verse_serde::decode;

fuzz_target!(|data: &str| {
    // decode should never panic, and whatever it accepts must re-encode losslessly
    if let Ok(decoded) = decode(data) {
        let serial = rhizome_verse_serde::SerialUniverse::from_parts(
            decoded.name.clone(),
            &decoded.grid,
            &decoded.rules,
            decoded.generation,
        );
        let again =
            decode(&rhizome_verse_serde::encode(&serial)).expect("re-encoded universe decodes");
        assert_eq!(again.grid, decoded.grid);
    }
});
