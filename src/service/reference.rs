use rand::{distr::Alphanumeric, Rng};

/// Job references look like VAL-8F3K29QD and are unique per job.
pub fn generate_job_reference() -> String {
    let code = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();

    format!("VAL-{}", code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_expected_shape() {
        let reference = generate_job_reference();
        assert!(reference.starts_with("VAL-"));
        assert_eq!(reference.len(), 12);
        assert!(reference[4..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn references_are_not_constant() {
        let a = generate_job_reference();
        let b = generate_job_reference();
        let c = generate_job_reference();
        assert!(a != b || b != c);
    }
}
