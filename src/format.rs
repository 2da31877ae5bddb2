//! Display formatting shared by pages and CLI output.

use chrono::{Datelike, NaiveDateTime};

const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Long Brazilian date: `01 de fevereiro de 2024`. Empty when there is no date.
pub fn format_date_br(date: Option<NaiveDateTime>) -> String {
    match date {
        Some(d) => format!(
            "{:02} de {} de {}",
            d.day(),
            MONTHS_PT[d.month0() as usize],
            d.year()
        ),
        None => String::new(),
    }
}

/// ISO date for `<time datetime>` attributes.
pub fn format_date_iso(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
