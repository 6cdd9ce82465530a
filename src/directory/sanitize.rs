/// Characters stripped from usernames before they are used as directory keys.
pub const STRIPPED_CHARS: [char; 8] = ['!', '@', '#', '$', '%', '^', '&', '*'];

/// Remove every occurrence of [`STRIPPED_CHARS`] from a raw username.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect()
}
