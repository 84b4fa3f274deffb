//! Small display helpers shared by list views and exports.

/// `"First Last"`, or just the first name when the last name is absent or blank.
pub fn full_name(first: &str, last: Option<&str>) -> String {
    match last.map(str::trim).filter(|l| !l.is_empty()) {
        Some(last) => format!("{} {}", first, last),
        None => first.to_string(),
    }
}

/// Keeps the first occurrence of each value, preserving order.
pub fn dedupe<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// `"IN_PROGRESS"` -> `"In Progress"`.
pub fn to_title_case(phrase: &str) -> String {
    phrase
        .to_lowercase()
        .replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Left-pads with zeros up to `size` characters.
pub fn pad(value: impl std::fmt::Display, size: usize) -> String {
    format!("{:0>width$}", value.to_string(), width = size)
}

pub fn truncate_string(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

pub fn round_number(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Thousands separators with at most two decimals, trailing zeros dropped.
pub fn number_with_commas(value: f64) -> String {
    let rounded = round_number(value);
    let negative = rounded < 0.0;
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}
