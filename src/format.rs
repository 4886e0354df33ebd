//! Display formatting helpers for CLI output

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Punctuate a phone number by digit count: 7 → `XXX-XXXX`,
/// 10 → `(XXX) XXX-XXXX`, 11 → `+X (XXX) XXX-XXXX`. Anything else is
/// returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        7 => format!("{}-{}", &digits[..3], &digits[3..]),
        10 => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        11 => format!(
            "+{} ({}) {}-{}",
            &digits[..1],
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        ),
        _ => phone.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Capitalized `nombre apellido`, skipping whichever part is missing.
pub fn full_name(nombre: &str, apellido: Option<&str>) -> String {
    let first = capitalize(nombre.trim());
    let last = capitalize(apellido.unwrap_or_default().trim());
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first} {last}"),
        (false, true) => first,
        (true, false) => last,
        (true, true) => String::new(),
    }
}

/// Uppercase initials, `?` when both parts are empty.
pub fn initials(nombre: &str, apellido: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(c) = nombre.chars().next() {
        out.extend(c.to_uppercase());
    }
    if let Some(c) = apellido.unwrap_or_default().chars().next() {
        out.extend(c.to_uppercase());
    }
    if out.is_empty() {
        out.push('?');
    }
    out
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format("%d/%m/%Y %H:%M").to_string()
}

/// Spanish "hace N ..." ladder relative to now.
pub fn relative_date(date_time: NaiveDateTime) -> String {
    relative_date_at(date_time, Local::now().naive_local())
}

fn relative_date_at(date_time: NaiveDateTime, now: NaiveDateTime) -> String {
    let delta = now.signed_duration_since(date_time);
    let minutes = delta.num_minutes();
    let hours = delta.num_hours();
    let days = delta.num_days();

    let plural = |n: i64, singular: &str, plural: &str| {
        if n == 1 {
            format!("Hace 1 {singular}")
        } else {
            format!("Hace {n} {plural}")
        }
    };

    if minutes < 1 {
        "Hace un momento".to_string()
    } else if minutes < 60 {
        plural(minutes, "minuto", "minutos")
    } else if hours < 24 {
        plural(hours, "hora", "horas")
    } else if days < 7 {
        plural(days, "día", "días")
    } else if days < 30 {
        plural(days / 7, "semana", "semanas")
    } else if days < 365 {
        plural(days / 30, "mes", "meses")
    } else {
        plural(days / 365, "año", "años")
    }
}

/// Truncate to at most `max` characters, with a `...` suffix when there is
/// room for one.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let kept: String = text.chars().take(max - 3).collect();
    format!("{kept}...")
}
