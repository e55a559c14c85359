//! URL-safe slug derivation.

/// Derive a URL-safe slug from free text.
///
/// Lowercases and trims the input, drops everything except ASCII letters,
/// digits, whitespace and hyphens, then joins whitespace runs with a single
/// hyphen and collapses repeated hyphens. Applying it twice yields the same
/// result as applying it once.
pub fn to_slug(input: &str) -> String {
    let lowered = input.to_lowercase();
    let kept: String = lowered
        .trim()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut pending_space = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            push_hyphen(&mut slug);
            pending_space = false;
        }
        if c == '-' {
            push_hyphen(&mut slug);
        } else {
            slug.push(c);
        }
    }
    if pending_space {
        push_hyphen(&mut slug);
    }
    slug
}

fn push_hyphen(slug: &mut String) {
    if !slug.ends_with('-') {
        slug.push('-');
    }
}
