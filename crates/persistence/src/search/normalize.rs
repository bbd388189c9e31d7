//! Input sanitation and case folding.
//!
//! One character table, [`fold_char`], defines how text is compared. It is
//! applied to search terms in Rust, to stored values by the memory matcher,
//! and to stored values in SQL through [`sql_normalized`], which renders the
//! same table as a `TRANSLATE(...)` call. No side depends on the database
//! locale or on Unicode case mapping rules.
//!
//! The table maps tab, newline, carriage return and no-break space to a plain
//! space, drops invisible and control characters, and upper-cases ASCII and
//! Latin-1 letters (`ñ` to `Ñ`, `ú` to `Ú`, `ÿ` to `Ÿ`). Every other character
//! is left as is, so `ß` stays `ß`.

/// Characters stripped from text besides control characters.
const INVISIBLE: &[char] = &[
    '\u{00AD}', // soft hyphen
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // byte order mark
];

/// Ranges holding every character [`fold_char`] changes.
const FOLDED_RANGES: &[(char, char)] = &[
    ('\u{0001}', '\u{001F}'),
    ('a', 'z'),
    ('\u{007F}', '\u{00FF}'),
    ('\u{200B}', '\u{200D}'),
    ('\u{2060}', '\u{2060}'),
    ('\u{FEFF}', '\u{FEFF}'),
];

fn is_dropped(c: char) -> bool {
    c.is_control() || INVISIBLE.contains(&c)
}

fn is_separator(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{00A0}')
}

fn fold_letter(c: char) -> char {
    match c {
        'a'..='z' => c.to_ascii_uppercase(),
        // Latin-1 lower-case letters sit 0x20 above their capitals; 0xF7 is '÷'.
        'à'..='þ' if c != '÷' => char::from_u32(c as u32 - 0x20).unwrap_or(c),
        'ÿ' => 'Ÿ',
        c => c,
    }
}

/// The comparison table: `None` drops the character.
pub fn fold_char(c: char) -> Option<char> {
    if is_separator(c) {
        Some(' ')
    } else if is_dropped(c) {
        None
    } else {
        Some(fold_letter(c))
    }
}

/// Removes invisible and control characters. Tabs, newlines and no-break
/// spaces become plain spaces so they still separate tokens.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            c if is_separator(c) => Some(' '),
            c if is_dropped(c) => None,
            c => Some(c),
        })
        .collect()
}

/// Case folding shared by both sides of a substring comparison.
pub fn fold_case(input: &str) -> String {
    input.chars().map(fold_letter).collect()
}

/// Applies the full table: sanitation and case folding in one pass.
pub fn normalize(input: &str) -> String {
    input.chars().filter_map(fold_char).collect()
}

/// Wraps a text-valued SQL expression in the `TRANSLATE` equivalent of
/// [`normalize`].
pub fn sql_normalized(expr: &str) -> String {
    let mut from = String::new();
    let mut to = String::new();
    let mut dropped = String::new();

    for &(start, end) in FOLDED_RANGES {
        for c in start..=end {
            match fold_char(c) {
                Some(folded) if folded == c => {}
                Some(folded) => {
                    push_unicode_escape(&mut from, c);
                    push_unicode_escape(&mut to, folded);
                }
                None => push_unicode_escape(&mut dropped, c),
            }
        }
    }
    // Trailing characters of the second argument with no counterpart in the
    // third are deleted.
    from.push_str(&dropped);

    format!("TRANSLATE({}, U&'{}', U&'{}')", expr, from, to)
}

fn push_unicode_escape(out: &mut String, c: char) {
    out.push_str(&format!("\\{:04X}", c as u32));
}

/// Splits an already sanitized term into folded, non-empty tokens.
pub fn tokenize(input: &str) -> Vec<String> {
    input.split_whitespace().map(fold_case).collect()
}

/// Escapes LIKE metacharacters so the token matches literally.
pub fn escape_like(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len() + 2);
    for c in token.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Wraps a token as a `%token%` LIKE pattern.
pub fn like_pattern(token: &str) -> String {
    format!("%{}%", escape_like(token))
}

/// Returns true if `input` is non-empty and made of ASCII digits only.
pub fn is_all_digits(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

/// Lower-cases and strips Spanish diacritics.
pub fn fold_accents(input: &str) -> String {
    input
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_invisible_characters() {
        assert_eq!(sanitize("JUAN\u{00A0}PEREZ"), "JUAN PEREZ");
        assert_eq!(sanitize("\u{FEFF}ana\u{200B}"), "ana");
        assert_eq!(sanitize("a\tb\nc"), "a b c");
        assert_eq!(sanitize("x\u{0007}y"), "xy");
    }

    #[test]
    fn test_fold_case_uses_the_latin_table() {
        assert_eq!(fold_case("ñandú"), "ÑANDÚ");
        assert_eq!(fold_case("Pérez"), "PÉREZ");
        assert_eq!(fold_case("ÿ"), "Ÿ");
        assert_eq!(fold_case("straße"), "STRAßE");
        assert_eq!(fold_case("5÷2"), "5÷2");
    }

    #[test]
    fn test_normalize_sanitizes_and_folds() {
        assert_eq!(normalize("\u{FEFF}Ñan\u{200B}dú\tpérez"), "ÑANDÚ PÉREZ");
        assert_eq!(normalize("x\u{0085}y"), "XY");
    }

    #[test]
    fn test_folded_ranges_cover_the_table() {
        for code in 1..=0xFFFF_u32 {
            let Some(c) = char::from_u32(code) else {
                continue;
            };
            if fold_char(c) != Some(c) {
                assert!(
                    FOLDED_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&c)),
                    "U+{:04X} is folded but outside FOLDED_RANGES",
                    code
                );
            }
        }
    }

    #[test]
    fn test_sql_normalized_translation() {
        let sql = sql_normalized("\"nombre\"");
        assert!(sql.starts_with("TRANSLATE(\"nombre\", U&'\\0009"));
        // a -> A and ñ -> Ñ, at the same position in both lists.
        let (from, to) = translation_lists(&sql);
        for (lower, upper) in [('a', 'A'), ('ñ', 'Ñ'), ('ÿ', 'Ÿ'), ('\u{00A0}', ' ')] {
            let at = from.iter().position(|&c| c == lower).unwrap();
            assert_eq!(to[at], upper);
        }
        // Dropped characters come after every mapped one.
        let zwsp = from.iter().position(|&c| c == '\u{200B}').unwrap();
        assert!(zwsp >= to.len());
        assert!(!from.contains(&'ß'));
    }

    fn translation_lists(sql: &str) -> (Vec<char>, Vec<char>) {
        let decode = |list: &str| -> Vec<char> {
            list.split('\\')
                .filter(|s| !s.is_empty())
                .map(|hex| char::from_u32(u32::from_str_radix(hex, 16).unwrap()).unwrap())
                .collect()
        };
        let parts: Vec<&str> = sql.split("U&'").collect();
        let from = parts[1].split('\'').next().unwrap();
        let to = parts[2].split('\'').next().unwrap();
        (decode(from), decode(to))
    }

    #[test]
    fn test_tokenize_folds_and_drops_empty() {
        assert_eq!(tokenize("  juan   pérez "), vec!["JUAN", "PÉREZ"]);
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("ANA"), "%ANA%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("A_B"), "%A\\_B%");
        assert_eq!(like_pattern("C:\\"), "%C:\\\\%");
    }

    #[test]
    fn test_is_all_digits() {
        assert!(is_all_digits("0001234"));
        assert!(is_all_digits("123456789012345678901234567890"));
        assert!(!is_all_digits(""));
        assert!(!is_all_digits("12 34"));
        assert!(!is_all_digits("١٢٣"));
    }

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("Martínez ÁLVAREZ"), "martinez alvarez");
        assert_eq!(fold_accents("Peña"), "peña");
    }
}
