// ---------------------------------------------------------------------------
// Display formatting for amounts, percentages and multiples
// ---------------------------------------------------------------------------

/// `$1,234.56`; negative amounts as `-$1,234.56`.
pub fn currency(v: f64) -> String {
    currency_with(v, 2)
}

/// `$1,235` for chart labels.
pub fn currency_whole(v: f64) -> String {
    currency_with(v, 0)
}

fn currency_with(v: f64, decimals: usize) -> String {
    let text = format!("{:.decimals$}", v.abs());
    let (int, frac) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if v < 0.0 && text.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

/// Missing averages show as a dash.
pub fn optional_currency(v: Option<f64>) -> String {
    v.map_or_else(|| "—".to_string(), currency)
}

pub fn percent(v: f64) -> String {
    format!("{v:.1}%")
}

pub fn multiple(v: f64) -> String {
    format!("{v:.2}x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(999.999), "$1,000.00");
        assert_eq!(currency(1234567.891), "$1,234,567.89");
        assert_eq!(currency(-4200.5), "-$4,200.50");
        assert_eq!(currency_whole(123456.6), "$123,457");
    }

    #[test]
    fn ratios() {
        assert_eq!(percent(50.0), "50.0%");
        assert_eq!(multiple(150.0 / 210.0), "0.71x");
        assert_eq!(optional_currency(None), "—");
    }
}
