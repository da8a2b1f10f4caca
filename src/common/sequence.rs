// src/common/sequence.rs

// Números "humanos" dos documentos. Servem para exibição e digitação no caixa;
// a identidade real de cada registro é sempre o UUID.

use chrono::{DateTime, Utc};
use rand::Rng;

/// `INV-<epoch millis>-<0..999>`. Colisões são improváveis, não impossíveis.
pub fn invoice_number(now: DateTime<Utc>) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("INV-{}-{}", now.timestamp_millis(), suffix)
}

/// `Z-<epoch millis>`
pub fn zbill_number(now: DateTime<Utc>) -> String {
    format!("Z-{}", now.timestamp_millis())
}

/// `PO-00001`, derivado da contagem de pedidos já existentes.
pub fn purchase_number(existing: i64) -> String {
    format!("PO-{:05}", existing + 1)
}

/// `QT-00001`, derivado da contagem de orçamentos já existentes.
pub fn quotation_number(existing: i64) -> String {
    format!("QT-{:05}", existing + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_invoice_number_format() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let number = invoice_number(now);

        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "INV");
        assert_eq!(parts[1], "1700000000123");
        let suffix: u16 = parts[2].parse().unwrap();
        assert!(suffix < 1000);
    }

    #[test]
    fn test_zbill_number_format() {
        let now = Utc.timestamp_millis_opt(42).unwrap();
        assert_eq!(zbill_number(now), "Z-42");
    }

    #[test]
    fn test_counted_numbers_are_zero_padded() {
        assert_eq!(purchase_number(0), "PO-00001");
        assert_eq!(purchase_number(41), "PO-00042");
        assert_eq!(quotation_number(99_999), "QT-100000");
    }
}
