//! Title → URL slug normalization.
//!
//! Review links are built from this function on both sides of the wire, so the
//! output for a given title must never change.

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block removed after NFD decomposition.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Turn a title into a lowercase ASCII slug.
///
/// Diacritics are stripped, anything outside `[a-z0-9]`, whitespace and `-`
/// is dropped, whitespace runs become one hyphen, hyphen runs collapse and
/// edge hyphens are trimmed.
///
/// ```
/// use affiliate_shared::slugify;
///
/// assert_eq!(slugify("Monitor Ultrawide 34\" Samsung"), "monitor-ultrawide-34-samsung");
/// assert_eq!(slugify("Cadeira Ergonômica"), "cadeira-ergonomica");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.to_lowercase().nfd() {
        if COMBINING_MARKS.contains(&ch) {
            continue;
        }
        if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
            continue;
        }
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit()) {
            continue;
        }
        if pending_hyphen && !slug.is_empty() {
            slug.push('-');
        }
        pending_hyphen = false;
        slug.push(ch);
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn strips_quotes_and_joins_words() {
        assert_eq!(slugify("Monitor Ultrawide 34\" Samsung"), "monitor-ultrawide-34-samsung");
    }

    #[test]
    fn removes_portuguese_diacritics() {
        assert_eq!(slugify("Luminária LED Inteligente"), "luminaria-led-inteligente");
        assert_eq!(slugify("Ação São João"), "acao-sao-joao");
    }

    #[test]
    fn collapses_whitespace_and_hyphen_runs() {
        assert_eq!(slugify("  Mesa   Standing -- Desk\tElétrica  "), "mesa-standing-desk-eletrica");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn trims_edge_hyphens() {
        assert_eq!(slugify("--Review: Webcam!--"), "review-webcam");
        assert_eq!(slugify("!!! Teclado"), "teclado");
    }

    #[test]
    fn empty_and_symbol_only_titles_yield_empty_slug() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("?!  --  "), "");
    }

    #[test]
    fn drops_non_latin_characters() {
        assert_eq!(slugify("Review 键盘 K2"), "review-k2");
    }

    #[test]
    fn is_deterministic_and_stable_on_its_output() {
        let title = "Review Completo: Monitor Ultrawide Samsung - Vale a Pena?";
        let first = slugify(title);
        assert_eq!(first, slugify(title));
        assert_eq!(first, "review-completo-monitor-ultrawide-samsung-vale-a-pena");
        assert_eq!(slugify(&first), first);
    }
}
