/// Settlement transaction ids are "TR" followed by a zero-padded sequence
/// number: TR001, TR002, ... TR999, TR1000. The numeric field widens past
/// three digits instead of wrapping, and callers must order existing ids by
/// (length, value) so widened ids still sort after the shorter ones.
const PREFIX: &str = "TR";
const MIN_WIDTH: usize = 3;

#[derive(Debug, PartialEq)]
pub struct InvalidTransactionId(pub String);

impl std::fmt::Display for InvalidTransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Malformed transaction id: {}", self.0)
    }
}

impl std::error::Error for InvalidTransactionId {}

pub fn parse_sequence(id: &str) -> Result<u64, InvalidTransactionId> {
    id.strip_prefix(PREFIX)
        .filter(|rest| !rest.is_empty())
        .and_then(|rest| rest.parse::<u64>().ok())
        .ok_or_else(|| InvalidTransactionId(id.to_string()))
}

pub fn format_sequence(sequence: u64) -> String {
    format!("{}{:0width$}", PREFIX, sequence, width = MIN_WIDTH)
}

/// Next id after the numerically-last existing one; TR001 when none exist.
pub fn next_transaction_id(last_id: Option<&str>) -> Result<String, InvalidTransactionId> {
    let next = match last_id {
        Some(id) => parse_sequence(id)? + 1,
        None => 1,
    };
    Ok(format_sequence(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_id() {
        assert_eq!(next_transaction_id(None), Ok("TR001".to_string()));
    }

    #[test]
    fn test_increment() {
        assert_eq!(next_transaction_id(Some("TR001")), Ok("TR002".to_string()));
        assert_eq!(next_transaction_id(Some("TR009")), Ok("TR010".to_string()));
        assert_eq!(next_transaction_id(Some("TR099")), Ok("TR100".to_string()));
    }

    #[test]
    fn test_widens_past_three_digits() {
        assert_eq!(next_transaction_id(Some("TR999")), Ok("TR1000".to_string()));
        assert_eq!(next_transaction_id(Some("TR1000")), Ok("TR1001".to_string()));
    }

    #[test]
    fn test_sequence_is_strictly_increasing() {
        let mut last: Option<String> = None;
        let mut previous_seq = 0;
        for _ in 0..12 {
            let id = next_transaction_id(last.as_deref()).unwrap();
            let seq = parse_sequence(&id).unwrap();
            assert!(seq > previous_seq);
            previous_seq = seq;
            last = Some(id);
        }
        assert_eq!(last.unwrap(), "TR012");
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!(next_transaction_id(Some("001")).is_err());
        assert!(next_transaction_id(Some("TR")).is_err());
        assert!(next_transaction_id(Some("TRxyz")).is_err());
    }
}
