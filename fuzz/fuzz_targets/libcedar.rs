#![no_main]

use libcedar::format::{format_lebanese_date, parse_amount, to_arabic_numerals};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(doc) = libcedar::parse(input) {
            for checklist in &doc.checklists {
                assert!(checklist.completion_percentage() <= 100);
                let _ = checklist.dashboard();
            }
        }

        let _ = format_lebanese_date(input);
        let _ = format_amount(input);
        assert!(!to_arabic_numerals(input).chars().any(|c| c.is_ascii_digit()));
    }
});

fn format_amount(input: &str) -> String {
    libcedar::format::format_lbp(parse_amount(input), 2)
}
