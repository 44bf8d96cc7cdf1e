/// Derives a URL/id-safe token from free text: trim, lowercase, spaces to
/// hyphens, commas and asterisks removed, colons/ampersands/parens replaced
/// with hyphens. Applying it to its own output is a no-op.
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            ',' | '*' => None,
            ':' | '&' | '(' | ')' => Some('-'),
            other => Some(other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn replaces_punctuation_and_lowercases() {
        assert_eq!(
            slugify("Saturday Morning (10:00-10:45)"),
            "saturday-morning--10-00-10-45-"
        );
    }

    #[test]
    fn removes_commas_and_asterisks() {
        assert_eq!(slugify("Art, Code & Craft *"), "art-code---craft-");
    }

    #[test]
    fn trims_before_slugging() {
        assert_eq!(slugify("  Monday 9am  "), "monday-9am");
    }

    #[test]
    fn is_stable_on_its_own_output() {
        let once = slugify("Saturday Morning (10:00-10:45)");
        assert_eq!(slugify(&once), once);
    }
}
