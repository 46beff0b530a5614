//! Display-width helpers for table cells and status text.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal columns `s` occupies.
pub fn width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max` columns, ending in `…` when anything was cut.
pub fn truncate(s: &str, max: usize) -> String {
    if width(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let budget = max - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Pad or cut `s` to exactly `cols` columns, aligned left.
pub fn fit(s: &str, cols: usize) -> String {
    let cut = truncate(s, cols);
    let pad = cols.saturating_sub(width(&cut));
    format!("{cut}{}", " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_untouched() {
        assert_eq!(truncate("lamp", 10), "lamp");
    }

    #[test]
    fn long_text_gets_ellipsis() {
        assert_eq!(truncate("Essence Mascara", 8), "Essence…");
        assert_eq!(width(&truncate("Essence Mascara", 8)), 8);
    }

    #[test]
    fn wide_characters_count_double() {
        let cut = truncate("日本語テキスト", 5);
        assert!(width(&cut) <= 5);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn zero_width_budget() {
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn fit_pads() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(width(&fit("abcdef", 4)), 4);
    }
}
