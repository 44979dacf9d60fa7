//! Character-class predicates for the three scripts the pipeline handles.
//!
//! Source words are Armenian (U+0530..U+058F). Targets are Russian (Cyrillic,
//! U+0400..U+04FF) and English (ASCII Latin).

pub fn is_armenian(c: char) -> bool {
    ('\u{0530}'..='\u{058F}').contains(&c)
}

pub fn is_armenian_lowercase(c: char) -> bool {
    is_armenian(c) && c.is_lowercase()
}

pub fn is_cyrillic_letter(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c) && c.is_alphabetic()
}

pub fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Letter of either target alphabet.
pub fn is_target_letter(c: char) -> bool {
    is_cyrillic_letter(c) || is_latin_letter(c)
}

pub fn contains_armenian(text: &str) -> bool {
    text.chars().any(is_armenian)
}

pub fn contains_armenian_lowercase(text: &str) -> bool {
    text.chars().any(is_armenian_lowercase)
}

pub fn contains_latin_letter(text: &str) -> bool {
    text.chars().any(is_latin_letter)
}

pub fn contains_target_letter(text: &str) -> bool {
    text.chars().any(is_target_letter)
}

/// True if any character is lowercase, in any script.
pub fn has_lowercase(text: &str) -> bool {
    text.chars().any(char::is_lowercase)
}

/// Short all-caps tokens (`ԱՄՆ`, `ՀՀ`) that the dictionaries list as headwords.
pub fn is_abbreviation(word: &str) -> bool {
    !word.is_empty()
        && word.chars().count() <= 3
        && word.chars().all(|c| c.is_alphabetic() && c.is_uppercase())
}

/// Case-insensitive lookup key.
pub fn fold_case(word: &str) -> String {
    word.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_scripts() {
        assert!(contains_armenian("տուն"));
        assert!(!contains_armenian("дом"));
        assert!(contains_armenian_lowercase("Տուն"));
        assert!(!contains_armenian_lowercase("ՏՈՒՆ"));
        assert!(contains_target_letter("дом"));
        assert!(contains_target_letter("house"));
        assert!(!contains_target_letter("տուն 12"));
    }

    #[test]
    fn detects_abbreviations() {
        assert!(is_abbreviation("ՀՀ"));
        assert!(is_abbreviation("ԱՄՆ"));
        assert!(!is_abbreviation("ՀԱՅԱՍՏԱՆ"));
        assert!(!is_abbreviation("Հհ"));
        assert!(!is_abbreviation("Հ1"));
        assert!(!is_abbreviation(""));
    }

    #[test]
    fn folds_armenian_case() {
        assert_eq!(fold_case("Տուն"), "տուն");
        assert!(has_lowercase("Տուն"));
        assert!(!has_lowercase("ՏՈՒՆ"));
    }
}
