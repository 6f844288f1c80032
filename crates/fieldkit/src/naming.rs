// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Accessor names and display labels derived from field identifiers.

/// Upper-case the first character.
pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `("get", "pixel")` -> `"getPixel"`.
pub(crate) fn prefixed(prefix: &str, name: &str) -> String {
    format!("{prefix}{}", capitalize(name))
}

/// `"isFilled"` -> `"Is filled"`.
pub(crate) fn label_for(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_uppercase() {
            spaced.push(' ');
        }
        spaced.extend(ch.to_lowercase());
    }
    capitalize(spaced.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor_names() {
        assert_eq!(prefixed("get", "pixel"), "getPixel");
        assert_eq!(prefixed("change", "isFilled"), "changeIsFilled");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_labels() {
        assert_eq!(label_for("width"), "Width");
        assert_eq!(label_for("isFilled"), "Is filled");
        assert_eq!(label_for("waveType"), "Wave type");
        assert_eq!(label_for("X"), "X");
    }
}
