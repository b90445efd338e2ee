//! Brazilian taxpayer identifiers.
//!
//! Records are keyed by the digit-only form of a CPF (individuals, 11 digits) or
//! a CNPJ (companies, 14 digits). Punctuation is only ever added for display.

pub const CPF_LEN: usize = 11;
pub const CNPJ_LEN: usize = 14;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

pub fn strip_non_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `XXX.XXX.XXX-XX` for an 11 digit input, otherwise the bare digits.
pub fn format_cpf(value: &str) -> String {
    let d = strip_non_digits(value);
    if d.len() != CPF_LEN {
        return d;
    }
    format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
}

/// `XX.XXX.XXX/XXXX-XX` for a 14 digit input, otherwise the bare digits.
pub fn format_cnpj(value: &str) -> String {
    let d = strip_non_digits(value);
    if d.len() != CNPJ_LEN {
        return d;
    }
    format!(
        "{}.{}.{}/{}-{}",
        &d[0..2],
        &d[2..5],
        &d[5..8],
        &d[8..12],
        &d[12..14]
    )
}

/// Length-only check.
pub fn validate_cpf(value: &str) -> bool {
    strip_non_digits(value).len() == CPF_LEN
}

/// Length-only check.
pub fn validate_cnpj(value: &str) -> bool {
    strip_non_digits(value).len() == CNPJ_LEN
}

pub fn cpf_check_digits_valid(value: &str) -> bool {
    let digits = to_digits(value);
    if digits.len() != CPF_LEN || all_same(&digits) {
        return false;
    }

    let first = cpf_digit(&digits[..9], 10);
    let second = cpf_digit(&digits[..10], 11);
    digits[9] == first && digits[10] == second
}

pub fn cnpj_check_digits_valid(value: &str) -> bool {
    let digits = to_digits(value);
    if digits.len() != CNPJ_LEN || all_same(&digits) {
        return false;
    }

    let first = mod11_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS);
    let second = mod11_digit(&digits[..13], &CNPJ_SECOND_WEIGHTS);
    digits[12] == first && digits[13] == second
}

fn cpf_digit(digits: &[u32], start_weight: u32) -> u32 {
    let weights: Vec<u32> = (2..=start_weight).rev().collect();
    mod11_digit(digits, &weights)
}

fn mod11_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let rest = sum % 11;
    if rest < 2 {
        0
    } else {
        11 - rest
    }
}

fn to_digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentPolicy {
    pub strict: bool,
}

impl DocumentPolicy {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn accepts_cpf(&self, value: &str) -> bool {
        if self.strict {
            cpf_check_digits_valid(value)
        } else {
            validate_cpf(value)
        }
    }

    pub fn accepts_cnpj(&self, value: &str) -> bool {
        if self.strict {
            cnpj_check_digits_valid(value)
        } else {
            validate_cnpj(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_are_idempotent() {
        let inputs = [
            "",
            "abc",
            "123",
            "12345678901",
            "123.456.789-01",
            "123456789012",
            "11222333000181",
            "11.222.333/0001-81",
            "1 1 2 2 2 3 3 3 0 0 0 1 8 1 9",
        ];
        for x in inputs {
            let cpf = format_cpf(x);
            assert_eq!(format_cpf(&strip_non_digits(&cpf)), cpf, "cpf {x:?}");
            let cnpj = format_cnpj(x);
            assert_eq!(format_cnpj(&strip_non_digits(&cnpj)), cnpj, "cnpj {x:?}");
        }
    }

    #[test]
    fn formats_known_values() {
        assert_eq!(format_cpf("12345678901"), "123.456.789-01");
        assert_eq!(format_cnpj("11222333000181"), "11.222.333/0001-81");
        assert_eq!(format_cpf("1234"), "1234");
    }

    #[test]
    fn cpf_validation_is_length_only() {
        assert!(validate_cpf("123.456.789-01"));
        assert!(validate_cpf("00000000000"));
        assert!(!validate_cpf("1234567890"));
        assert!(!validate_cpf("123456789012"));
        assert!(!validate_cpf(""));
    }

    #[test]
    fn cnpj_validation_is_length_only() {
        assert!(validate_cnpj("11.222.333/0001-81"));
        assert!(!validate_cnpj("1122233300018"));
    }

    #[test]
    fn cpf_check_digits() {
        assert!(cpf_check_digits_valid("529.982.247-25"));
        assert!(!cpf_check_digits_valid("529.982.247-26"));
        assert!(!cpf_check_digits_valid("123.456.789-01"));
        assert!(!cpf_check_digits_valid("111.111.111-11"));
    }

    #[test]
    fn cnpj_check_digits() {
        assert!(cnpj_check_digits_valid("11.222.333/0001-81"));
        assert!(!cnpj_check_digits_valid("11.222.333/0001-80"));
        assert!(!cnpj_check_digits_valid("00.000.000/0000-00"));
    }

    #[test]
    fn policy_switches_between_checks() {
        let lenient = DocumentPolicy::default();
        let strict = DocumentPolicy::new(true);
        assert!(lenient.accepts_cpf("12345678901"));
        assert!(!strict.accepts_cpf("12345678901"));
        assert!(strict.accepts_cpf("52998224725"));
        assert!(strict.accepts_cnpj("11222333000181"));
    }
}
