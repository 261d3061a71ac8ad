/// Writes `amount` with comma thousands separators, e.g. `1234567` as `1,234,567`.
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn price_label(currency: &str, amount: u64) -> String {
    format!("{}{}", currency, group_thousands(amount))
}
