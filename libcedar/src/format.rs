use crate::settings::{Lang, Settings, DEFAULT_LBP_SYMBOL, MAX_CURRENCY_PRECISION};
use chrono::{NaiveDate, NaiveDateTime};

const ARABIC_ZERO: u32 = 0x0660;

/// Formats `value` as Lebanese Pounds with the default symbol, e.g.
/// `1,500,000 ل.ل`. Absent or non-finite values give an empty string.
pub fn format_lbp(value: Option<f64>, precision: usize) -> String {
    format_lbp_with_symbol(value, precision, DEFAULT_LBP_SYMBOL)
}

/// Precision is capped at [`MAX_CURRENCY_PRECISION`] decimals.
pub fn format_lbp_with_symbol(value: Option<f64>, precision: usize, symbol: &str) -> String {
    let precision = precision.min(MAX_CURRENCY_PRECISION);
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{} {}", group_thousands(v, precision), symbol),
        None => String::new(),
    }
}

fn group_thousands(value: f64, precision: usize) -> String {
    let fixed = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    // "-0" is not a thing
    if value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        grouped.push('-');
    }
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    grouped
}

fn parse_iso_date(iso: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(iso, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// `2024-01-31` becomes `31/01/2024`. Input that is not an ISO date comes
/// back untouched.
pub fn format_lebanese_date(iso: &str) -> String {
    let iso = iso.trim();
    if iso.is_empty() {
        return String::new();
    }

    match parse_iso_date(iso) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => iso.to_string(),
    }
}

pub fn format_arabic_date(iso: &str, lang: Lang) -> String {
    let formatted = format_lebanese_date(iso);
    match lang {
        Lang::Ar => to_arabic_numerals(&formatted),
        Lang::En => formatted,
    }
}

/// Replaces ASCII digits with Arabic-Indic ones (U+0660..U+0669).
pub fn to_arabic_numerals(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(ARABIC_ZERO + d).unwrap_or(c),
            _ => c,
        })
        .collect()
}

pub fn from_arabic_numerals(text: &str) -> String {
    text.chars()
        .map(|c| match (c as u32).checked_sub(ARABIC_ZERO) {
            Some(d) if d < 10 => char::from_digit(d, 10).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Joins both labels, current language first.
pub fn format_bilingual_text(english: &str, arabic: Option<&str>, lang: Lang) -> String {
    let arabic = arabic.unwrap_or_default();
    if english.is_empty() {
        return arabic.to_string();
    }
    if arabic.is_empty() {
        return english.to_string();
    }

    match lang {
        Lang::Ar => format!("{} / {}", arabic, english),
        Lang::En => format!("{} / {}", english, arabic),
    }
}

/// Reads an amount back from display text such as `1,234.50`,
/// `1,500,000 ل.ل` or `ل.ل ١٬٢٠٠`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = from_arabic_numerals(text);
    text.split_whitespace()
        .map(|token| token.replace([',', '\u{066C}'], ""))
        .filter_map(|token| token.parse::<f64>().ok())
        .find(|v| v.is_finite())
}

impl Settings {
    pub fn format_lbp(&self, value: Option<f64>) -> String {
        format_lbp_with_symbol(value, self.currency_precision, &self.lbp_symbol)
    }

    pub fn format_date(&self, iso: &str) -> String {
        format_arabic_date(iso, self.lang)
    }

    pub fn localize_digits(&self, text: &str) -> String {
        match self.lang {
            Lang::Ar => to_arabic_numerals(text),
            Lang::En => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::format::{
        format_arabic_date, format_bilingual_text, format_lbp, format_lbp_with_symbol,
        format_lebanese_date, from_arabic_numerals, parse_amount, to_arabic_numerals,
    };
    use crate::settings::{Lang, Settings};
    use anyhow::Result;

    #[test]
    fn lbp_grouping() {
        assert_eq!(format_lbp(Some(1_500_000f64), 0), "1,500,000 ل.ل");
        assert_eq!(format_lbp(Some(999f64), 0), "999 ل.ل");
        assert_eq!(format_lbp(Some(1000f64), 2), "1,000.00 ل.ل");
        assert_eq!(format_lbp(Some(1234567.891), 2), "1,234,567.89 ل.ل");
        assert_eq!(format_lbp(Some(-89_500.4), 0), "-89,500 ل.ل");
        assert_eq!(format_lbp(Some(-0.2), 0), "0 ل.ل");
        assert_eq!(format_lbp_with_symbol(Some(15f64), 1, "LL"), "15.0 LL");
    }

    #[test]
    fn lbp_precision_is_capped() {
        assert_eq!(format_lbp(Some(1f64), 70000), "1.00000000000000000000 ل.ل");
        assert_eq!(format_lbp(Some(1f64), 70000), format_lbp(Some(1f64), 20));
    }

    #[test]
    fn lbp_degrades_to_empty() {
        assert_eq!(format_lbp(None, 0), "");
        assert_eq!(format_lbp(Some(f64::NAN), 2), "");
        assert_eq!(format_lbp(Some(f64::INFINITY), 2), "");
    }

    #[test]
    fn lebanese_date() {
        assert_eq!(format_lebanese_date("2024-01-31"), "31/01/2024");
        assert_eq!(format_lebanese_date("2023-07-04 13:45:00"), "04/07/2023");
        assert_eq!(format_lebanese_date("2023-07-04T13:45:00"), "04/07/2023");
        assert_eq!(format_lebanese_date(""), "");
        assert_eq!(format_lebanese_date("yesterday"), "yesterday");
        assert_eq!(format_lebanese_date("2023-02-30"), "2023-02-30");
    }

    #[test]
    fn arabic_numerals() {
        assert_eq!(to_arabic_numerals("Invoice 2024-15"), "Invoice ٢٠٢٤-١٥");
        assert_eq!(to_arabic_numerals(""), "");
        assert_eq!(to_arabic_numerals("x²"), "x²");
        assert_eq!(from_arabic_numerals("٠١٢٣٤٥٦٧٨٩"), "0123456789");
        assert_eq!(format_arabic_date("2024-01-31", Lang::Ar), "٣١/٠١/٢٠٢٤");
        assert_eq!(format_arabic_date("2024-01-31", Lang::En), "31/01/2024");
    }

    #[test]
    fn bilingual_text() {
        assert_eq!(
            format_bilingual_text("Balance", Some("الرصيد"), Lang::En),
            "Balance / الرصيد"
        );
        assert_eq!(
            format_bilingual_text("Balance", Some("الرصيد"), Lang::Ar),
            "الرصيد / Balance"
        );
        assert_eq!(format_bilingual_text("", Some("الرصيد"), Lang::En), "الرصيد");
        assert_eq!(format_bilingual_text("Balance", None, Lang::Ar), "Balance");
        assert_eq!(format_bilingual_text("", None, Lang::Ar), "");
    }

    #[test]
    fn amounts_from_display_text() {
        assert_eq!(parse_amount("1,234.50"), Some(1234.5));
        assert_eq!(parse_amount("1,500,000 ل.ل"), Some(1_500_000f64));
        assert_eq!(parse_amount("ل.ل ١٢٠٠"), Some(1200f64));
        assert_eq!(parse_amount("-75"), Some(-75f64));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn settings_drive_formatting() -> Result<()> {
        let mut settings = Settings::new();
        settings.set_option("lbp_symbol", "LBP")?;
        settings.set_option("currency_precision", "2")?;
        settings.set_option("lang", "ar")?;

        assert_eq!(settings.format_lbp(Some(2500f64)), "2,500.00 LBP");
        assert_eq!(settings.format_date("2024-12-01"), "٠١/١٢/٢٠٢٤");
        assert_eq!(settings.localize_digits("75%"), "٧٥%");
        Ok(())
    }
}
