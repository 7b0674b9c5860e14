/// Treat blank strings the same as a missing value.
///
/// Query parameters and stored records arrive as `Some("")` surprisingly
/// often; every lookup in the session path goes through this.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("abc")), Some("abc"));
        assert_eq!(non_blank(Some("  abc ")), Some("abc"));
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
