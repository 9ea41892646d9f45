#![no_main]

use imgtopdf::cli::parse_args;
use imgtopdf::input::split_output;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = std::str::from_utf8(data).unwrap_or("");
    let args: Vec<&str> = s.split_whitespace().collect();

    // `--version` exits the process.
    let asks_version = args
        .iter()
        .any(|a| *a == "--version" || (a.starts_with('-') && !a.starts_with("--") && a.contains('V')));
    if asks_version {
        return;
    }

    let argv = std::iter::once("imgtopdf").chain(args.iter().copied());
    let Ok(parsed) = parse_args(argv) else {
        return;
    };
    assert!(parsed.ignored.iter().all(|flag| flag.starts_with('-')));

    let positional = &parsed.cli.args;
    let (patterns, output) = split_output(positional);
    match output {
        Some(target) => {
            assert_eq!(patterns.len() + 1, positional.len());
            assert_eq!(target.path.to_str(), positional.last().map(String::as_str));
        }
        None => assert_eq!(patterns.len(), positional.len()),
    }
});
