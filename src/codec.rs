// Collection codec - how a whole aggregate collection becomes store bytes
//
// JSON via serde_json. Unknown fields are skipped and missing fields fall
// back to their defaults, so older and newer records read each other.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::LedgerResult;

pub fn encode<T: Serialize>(records: &[T]) -> LedgerResult<Vec<u8>> {
    Ok(serde_json::to_vec(records)?)
}

/// Decode a stored collection. An absent or empty value is an empty collection.
pub fn decode<T: DeserializeOwned>(data: Option<&[u8]>) -> LedgerResult<Vec<T>> {
    match data {
        Some(bytes) if !bytes.is_empty() => Ok(serde_json::from_slice(bytes)?),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Account, Chart};

    #[test]
    fn test_absent_and_empty_decode_to_empty() {
        let none: Vec<Chart> = decode(None).unwrap();
        let empty: Vec<Chart> = decode(Some(&[])).unwrap();

        assert!(none.is_empty());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_accounts_keep_order_and_fields() {
        let mut first = Account::new("2", "Liabilities", ["balanceSheet", "increaseOnCredit"]);
        first.id = "b".to_string();
        first.created = Some(chrono::Utc::now());
        let second = Account::new("1", "Assets", ["balanceSheet", "increaseOnDebit"]).with_parent("b");

        let bytes = encode(&[first.clone(), second.clone()]).unwrap();
        let decoded: Vec<Account> = decode(Some(&bytes)).unwrap();

        assert_eq!(decoded, vec![first, second]);
    }

    #[test]
    fn test_records_from_a_newer_writer() {
        let bytes = br#"[{"id":"a","number":"1","name":"Assets","tags":["detail"],"ledgerCode":7}]"#;
        let decoded: Vec<Account> = decode(Some(bytes)).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].number, "1");
        assert!(decoded[0].parent.is_none());
        assert!(decoded[0].is_detail());
    }

    #[test]
    fn test_garbage_is_a_codec_error() {
        let result: LedgerResult<Vec<Chart>> = decode(Some(b"not json"));
        assert!(matches!(result, Err(crate::error::LedgerError::Codec(_))));
    }
}
