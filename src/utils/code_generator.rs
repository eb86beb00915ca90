use rand::Rng;

/// Reference codes look like "SL" followed by a short numeric block, e.g.
/// SL483. Uniqueness is enforced by the database; callers retry on conflict.
pub fn generate_reference_code() -> String {
    let mut rng = rand::rng();
    format!("SL{:03}", rng.random_range(1..1000))
}

pub fn generate_receipt_filename(original: &str) -> String {
    let extension = original.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("bin");
    format!("receipt-{}.{}", uuid::Uuid::new_v4(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_code_shape() {
        let code = generate_reference_code();
        assert!(code.starts_with("SL"));
        assert!(code.len() >= 5);
        assert!(code[2..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_receipt_filename_keeps_extension() {
        let name = generate_receipt_filename("slip.png");
        assert!(name.starts_with("receipt-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_receipt_filename_without_extension() {
        let name = generate_receipt_filename("slip");
        assert!(name.ends_with(".bin"));
    }
}
