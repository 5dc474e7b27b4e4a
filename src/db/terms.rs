//! Storage format for search-term lists.
//!
//! Terms are joined with `,`. A literal `,` or `\` inside a term is written
//! as `\,` or `\\`, so ordinary terms produce the plain comma-joined form.

const SEPARATOR: char = ',';
const ESCAPE: char = '\\';

pub fn encode(terms: &[String]) -> String {
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        for c in term.chars() {
            if c == SEPARATOR || c == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(c);
        }
    }
    out
}

/// The empty string decodes to an empty list, never `[""]`.
pub fn decode(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }

    let mut terms = Vec::new();
    let mut current = String::new();
    let mut chars = stored.chars();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE => {
                // A trailing lone backslash is kept as-is
                current.push(chars.next().unwrap_or(ESCAPE));
            }
            SEPARATOR => terms.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    terms.push(current);
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_terms_use_comma_joined_form() {
        let terms = strings(&["a", "b", "c"]);
        assert_eq!(encode(&terms), "a,b,c");
        assert_eq!(decode("a,b,c"), terms);
    }

    #[test]
    fn test_empty_list_is_empty_string() {
        assert_eq!(encode(&[]), "");
        assert!(decode("").is_empty());
    }

    #[test]
    fn test_terms_with_separator_survive() {
        let terms = strings(&["Toronto, ON", r"back\slash", "plain"]);
        let stored = encode(&terms);

        assert_eq!(stored, r"Toronto\, ON,back\\slash,plain");
        assert_eq!(decode(&stored), terms);
    }

    #[test]
    fn test_legacy_values_decode() {
        assert_eq!(decode("nba,mlb,nfl,nhl"), strings(&["nba", "mlb", "nfl", "nhl"]));
        assert_eq!(decode("solo"), strings(&["solo"]));
    }

    #[test]
    fn test_many_terms() {
        let terms: Vec<String> = (0..500).map(|i| format!("term{i}")).collect();
        assert_eq!(decode(&encode(&terms)), terms);
    }
}
