pub const DEFAULT_AVATAR_SIZE: u32 = 100;

/// Gravatar image URL for an email address.
pub fn gravatar_url(email: &str, size: u32) -> String {
    let normalized = email.trim().to_lowercase();
    let hash = md5::compute(normalized.as_bytes());
    format!("https://www.gravatar.com/avatar/{:x}?s={}", hash, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_the_normalized_email() {
        assert_eq!(
            gravatar_url(" MyEmailAddress@example.com ", DEFAULT_AVATAR_SIZE),
            "https://www.gravatar.com/avatar/0bc83cb571cd1c50ba6f3e8a78ef1346?s=100"
        );
    }

    #[test]
    fn size_is_embedded() {
        assert!(gravatar_url("a@b.c", 40).ends_with("?s=40"));
    }
}
