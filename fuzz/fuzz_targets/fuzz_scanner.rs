#![no_main]

use arbitrary::Arbitrary;
use bootcore::{BuilderOptions, ByteString, LineEnding, LineScanner, ScannerOptions, TextBuilder};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    bytes: Vec<u8>,
    max_line_length: Option<u8>,
}

fuzz_target!(|input: Input| {
    let options = ScannerOptions {
        max_line_length: input.max_line_length.map(usize::from),
    };
    let mut scanner = LineScanner::with_options(input.bytes.as_slice(), options);
    let mut rejoined = TextBuilder::with_options(BuilderOptions {
        capacity: 0,
        growable: true,
    });

    loop {
        let line = match scanner.scan_line() {
            Ok(line) => line,
            // Overlong lines are the only failure an in-memory source can produce.
            Err(_) => {
                assert!(input.max_line_length.is_some(), "unlimited scanner failed");
                return;
            }
        };
        if let Some(limit) = input.max_line_length {
            assert!(line.text.len() <= usize::from(limit));
        }
        rejoined.append(&line.text).unwrap();
        match line.ending {
            LineEnding::Newline => {
                rejoined.append_byte(b'\n').unwrap();
            }
            LineEnding::EndOfInput => break,
        }
    }

    let rejoined: ByteString = rejoined.to_byte_string();
    assert_eq!(rejoined.bytes(), input.bytes.as_slice());
    assert!(scanner.scan_line().unwrap().is_exhausted());
});
