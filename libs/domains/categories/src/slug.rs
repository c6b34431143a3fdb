//! Slug derivation for category names

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Runs of anything that is not a lowercase ASCII letter or digit
static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Slug used when a name has no transliterable letters or digits
pub const FALLBACK_SLUG: &str = "category";

/// Combining marks left behind by canonical decomposition
fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036f}')
}

/// Letters whose ASCII base does not come out of decomposition
fn fold_letter(c: char) -> char {
    match c {
        'đ' => 'd',
        'ø' => 'o',
        other => other,
    }
}

/// Derive the base slug for a category name.
///
/// Lowercases, decomposes to NFD and drops combining marks, turns every run
/// of other characters into a single `-` and trims hyphens from both ends.
/// Returns [`FALLBACK_SLUG`] when nothing is left.
///
/// ```
/// use domain_categories::slug::slugify;
///
/// assert_eq!(slugify("Giày Thể Thao"), "giay-the-thao");
/// assert_eq!(slugify("Đồ điện tử"), "do-dien-tu");
/// assert_eq!(slugify("!!!"), "category");
/// ```
pub fn slugify(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(fold_letter)
        .collect();
    let slug = NON_ALPHANUMERIC.replace_all(&folded, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// The `n`th candidate for a base slug: `base`, `base-1`, `base-2`, ...
pub fn candidate(base: &str, n: u32) -> String {
    if n == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_ascii() {
        assert_eq!(slugify("Shoes"), "shoes");
        assert_eq!(slugify("  Men's   Shoes  "), "men-s-shoes");
        assert_eq!(slugify("T-Shirts & Tops"), "t-shirts-tops");
    }

    #[test]
    fn test_slugify_vietnamese() {
        assert_eq!(slugify("Áo khoác"), "ao-khoac");
        assert_eq!(slugify("Quần ĐÙI nữ"), "quan-dui-nu");
        assert_eq!(slugify("Phụ kiện thời trang"), "phu-kien-thoi-trang");
        // Decomposed input from some clients
        assert_eq!(slugify("A\u{301}o kho\u{301}a\u{306}c"), "ao-khoac");
        assert_eq!(slugify("Ñandú Çà"), "nandu-ca");
    }

    #[test]
    fn test_slugify_collapses_and_trims() {
        assert_eq!(slugify("--a---b--"), "a-b");
        assert_eq!(slugify("2024 // Sale"), "2024-sale");
    }

    #[test]
    fn test_slugify_fallback() {
        assert_eq!(slugify("???"), FALLBACK_SLUG);
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slugify("日本"), FALLBACK_SLUG);
    }

    #[test]
    fn test_candidate_sequence() {
        assert_eq!(candidate("shoes", 0), "shoes");
        assert_eq!(candidate("shoes", 1), "shoes-1");
        assert_eq!(candidate("shoes", 12), "shoes-12");
    }
}
