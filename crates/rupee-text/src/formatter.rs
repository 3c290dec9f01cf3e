//! Rupee amount, number-in-words and date formatting

use crate::{Result, TextError};
use chrono::NaiveDate;

/// English names for 0-19
const ONES: [&str; 20] = [
    "Zero",
    "One",
    "Two",
    "Three",
    "Four",
    "Five",
    "Six",
    "Seven",
    "Eight",
    "Nine",
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

/// English names for the tens (index = tens digit)
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Scale words for each group of three digits
const SCALES: [&str; 7] = [
    "",
    "Thousand",
    "Million",
    "Billion",
    "Trillion",
    "Quadrillion",
    "Quintillion",
];

/// Write an integer in English words, title case
///
/// # Examples
/// ```
/// use rupee_text::format_number_words;
/// assert_eq!(format_number_words(0), "Zero");
/// assert_eq!(format_number_words(21), "Twenty One");
/// assert_eq!(format_number_words(2210), "Two Thousand Two Hundred Ten");
/// ```
pub fn format_number_words(n: i64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut remaining = n.unsigned_abs();
    let mut groups = Vec::new();
    let mut scale = 0;

    while remaining > 0 {
        let group = (remaining % 1000) as usize;
        if group > 0 {
            let words = three_digit_words(group);
            if SCALES[scale].is_empty() {
                groups.push(words);
            } else {
                groups.push(format!("{words} {}", SCALES[scale]));
            }
        }
        remaining /= 1000;
        scale += 1;
    }

    groups.reverse();
    let words = groups.join(" ");

    if n < 0 {
        format!("Minus {words}")
    } else {
        words
    }
}

/// Words for 1..=999
fn three_digit_words(n: usize) -> String {
    let hundreds = n / 100;
    let rest = n % 100;

    let mut parts = Vec::new();
    if hundreds > 0 {
        parts.push(format!("{} Hundred", ONES[hundreds]));
    }
    if rest > 0 {
        if rest < 20 {
            parts.push(ONES[rest].to_string());
        } else if rest % 10 == 0 {
            parts.push(TENS[rest / 10].to_string());
        } else {
            parts.push(format!("{} {}", TENS[rest / 10], ONES[rest % 10]));
        }
    }

    parts.join(" ")
}

/// Split an amount into whole rupees and cents (rounded to the nearest cent)
///
/// The sign is carried on the rupee part; cents are always non-negative.
pub fn split_rupees_cents(amount: f64) -> (i64, i64) {
    let total_cents = (amount.abs() * 100.0).round() as i64;
    let rupees = total_cents / 100;
    let cents = total_cents % 100;

    if amount < 0.0 && total_cents > 0 {
        (-rupees, cents)
    } else {
        (rupees, cents)
    }
}

/// Write a rupee amount in words
///
/// # Examples
/// ```
/// use rupee_text::format_rupees_words;
/// assert_eq!(format_rupees_words(0.0), "Nil");
/// assert_eq!(format_rupees_words(2210.0), "Two Thousand Two Hundred Ten Rupees Only");
/// assert_eq!(format_rupees_words(10.5), "Ten Rupees and Fifty Cents Only");
/// ```
pub fn format_rupees_words(amount: f64) -> String {
    if !amount.is_finite() {
        return "-".to_string();
    }

    let (rupees, cents) = split_rupees_cents(amount);
    let negative = amount < 0.0 && (rupees != 0 || cents != 0);
    let rupees_abs = rupees.abs();

    let words = match (rupees_abs, cents) {
        (0, 0) => return "Nil".to_string(),
        (r, 0) => format!("{} Rupees Only", format_number_words(r)),
        (0, c) => format!("{} Cents Only", format_number_words(c)),
        (r, c) => format!(
            "{} Rupees and {} Cents Only",
            format_number_words(r),
            format_number_words(c)
        ),
    };

    if negative {
        format!("Minus {words}")
    } else {
        words
    }
}

/// Format a rupee amount with separators (e.g., "Rs. 2,210.00")
pub fn format_rupees(amount: f64) -> String {
    format!("Rs. {}", render_float("#,###.##", amount))
}

/// Format a date in long form (e.g., "19 October 2026")
///
/// # Arguments
/// * `year` - Gregorian year
/// * `month` - Month (1-12)
/// * `day` - Day of month
pub fn format_date_long(year: i32, month: u32, day: u32) -> Result<String> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TextError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))?;
    Ok(date.format("%-d %B %Y").to_string())
}

/// Parse an ISO date (`YYYY-MM-DD`) and format it in long form
pub fn format_iso_date_long(iso: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d")
        .map_err(|_| TextError::InvalidDate(iso.to_string()))?;
    Ok(date.format("%-d %B %Y").to_string())
}

/// Render a float with formatting pattern
///
/// Supports patterns like "#,###.##" for thousand separators and decimal places.
///
/// # Arguments
/// * `format` - Format pattern
/// * `n` - Number to format
pub fn render_float(format: &str, n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let (precision, thousand_sep, decimal_sep) = parse_format(format);

    let abs_n = n.abs();
    let multiplier = 10_f64.powi(precision as i32);
    let scaled = (abs_n * multiplier).round() as i64;
    let factor = 10_i64.pow(precision as u32);

    let int_part = scaled / factor;
    let frac_part = scaled % factor;

    let int_str = format_with_thousands(int_part, thousand_sep);

    let frac_str = if precision > 0 {
        format!("{:0>width$}", frac_part, width = precision as usize)
    } else {
        String::new()
    };

    let sign = if n < 0.0 && scaled > 0 { "-" } else { "" };

    if precision > 0 {
        format!("{sign}{int_str}{decimal_sep}{frac_str}")
    } else {
        format!("{sign}{int_str}")
    }
}

/// Parse format pattern to extract precision and separators
fn parse_format(format: &str) -> (u8, &str, &str) {
    if format.is_empty() {
        return (2, ",", ".");
    }

    let decimal_pos = format.rfind('.');

    let precision = match decimal_pos {
        Some(pos) => format[pos + 1..]
            .chars()
            .filter(|c| *c == '#' || *c == '0')
            .count() as u8,
        None => 0,
    };

    let thousand_sep = if format.contains(',') { "," } else { "" };
    let decimal_sep = if precision > 0 { "." } else { "" };

    (precision, thousand_sep, decimal_sep)
}

/// Format integer with thousand separators
fn format_with_thousands(n: i64, sep: &str) -> String {
    if sep.is_empty() {
        return n.to_string();
    }

    let s = n.to_string();
    let mut result = String::new();

    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert_str(0, sep);
        }
        result.insert(0, c);
    }

    result
}
