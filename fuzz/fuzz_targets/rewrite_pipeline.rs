#![no_main]

use libfuzzer_sys::fuzz_target;
use script_deobfuscator::config::PipelineConfig;
use script_deobfuscator::pipeline::{Mode, Pipeline};
use script_deobfuscator::property_access::KeyPolicy;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    if input.len() > 100_000 {
        return;
    }

    let config = PipelineConfig {
        decode_escapes: true,
        fold_booleans: true,
        key_policy: KeyPolicy::IdentifierOnly,
        ..PipelineConfig::default()
    };
    let Ok(pipeline) = Pipeline::new(&config) else {
        return;
    };

    let hex_only = pipeline.run(&input, Mode::HexOnly);
    // a decimal run is at most ~1.21x the hex digits it replaces
    assert!(hex_only.text.len() <= input.len() * 2);

    let full = pipeline.run(&input, Mode::Full);
    let resumed = pipeline.run(&hex_only.text, Mode::Resume);
    assert_eq!(full.text, resumed.text);
});
