/// Formats an amount as Indonesian rupiah with dot thousand separators,
/// no decimal places: `format_idr(1234567.0)` → `"Rp 1.234.567"`.
pub fn format_idr(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = amount.abs().round() as u64;
    let grouped = group_triads(rounded);
    if negative {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

fn group_triads(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_triads() {
        assert_eq!(group_triads(0), "0");
        assert_eq!(group_triads(42), "42");
        assert_eq!(group_triads(999), "999");
        assert_eq!(group_triads(1000), "1.000");
        assert_eq!(group_triads(1234567), "1.234.567");
    }

    #[test]
    fn test_format_idr() {
        assert_eq!(format_idr(0.0), "Rp 0");
        assert_eq!(format_idr(1234567.0), "Rp 1.234.567");
        assert_eq!(format_idr(1500.4), "Rp 1.500");
        assert_eq!(format_idr(1500.5), "Rp 1.501");
        assert_eq!(format_idr(-2500.0), "-Rp 2.500");
    }
}
