#![no_main]

use libfuzzer_sys::fuzz_target;
use rhizome_verse_automata::RuleSet;

fuzz_target!(|data: &str| {
    // parsing should never panic, and Display output must parse back
    if let Ok(rules) = data.parse::<RuleSet>() {
        assert_eq!(rules.to_string().parse::<RuleSet>(), Ok(rules));
    }
});
