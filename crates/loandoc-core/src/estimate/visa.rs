/// Canonicalizes a free-form visa designation (`"E-9"`, `"e 9"`, `"E9"` → `"E9"`).
///
/// Whitespace and hyphens are dropped and the rest upper-cased. Anything that does not then
/// look like a visa code (a letter followed by letters/digits, with at least one digit)
/// becomes the empty string, which no lender accepts.
pub fn normalize_visa_type(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect();

    if is_visa_code(&cleaned) {
        cleaned
    } else {
        String::new()
    }
}

fn is_visa_code(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }

    candidate.chars().all(|c| c.is_ascii_alphanumeric())
        && candidate.chars().any(|c| c.is_ascii_digit())
}

/// True when `visa_code` (already normalized) appears in a configured code list.
pub(crate) fn accepts_visa<'a, I>(codes: I, visa_code: &str) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    if visa_code.is_empty() {
        return false;
    }

    codes
        .into_iter()
        .any(|code| normalize_visa_type(code) == visa_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators_and_uppercases() {
        for raw in ["E-9", "e9 ", "E9", " e - 9", "e\t9"] {
            assert_eq!(normalize_visa_type(raw), "E9", "input {raw:?}");
        }
        assert_eq!(normalize_visa_type("f-2-7"), "F27");
        assert_eq!(normalize_visa_type("H-2"), "H2");
    }

    #[test]
    fn unrecognizable_input_becomes_empty() {
        for raw in ["", "   ", "-", "???", "9E", "E", "visa", "E-９"] {
            assert_eq!(normalize_visa_type(raw), "", "input {raw:?}");
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["E-9", "e 7", "F-2-7", "", "x", "??", "d-10", "Ｅ9", "e-9-"] {
            let once = normalize_visa_type(raw);
            assert_eq!(normalize_visa_type(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn empty_code_is_never_accepted() {
        let codes = vec![String::new(), "E-9".to_string()];
        assert!(!accepts_visa(&codes, ""));
        assert!(accepts_visa(&codes, "E9"));
        assert!(!accepts_visa(&codes, "E7"));
    }
}
