//! String case conversion.
//!
//! Converts identifiers between the usual naming styles: `PascalCase`,
//! `camelCase`, `snake_case`, `SCREAMING_SNAKE_CASE`, `kebab-case` and
//! `SCREAMING-KEBAB-CASE`. Input may be in any of these styles, or
//! space-separated words, or a mix.
//!
//! Word boundaries are detected at delimiters (space, `_`, `-`), at
//! lower-to-upper case transitions, inside uppercase runs followed by a
//! capitalized word (`HTTPServer` → `HTTP`, `Server`), and around digit
//! runs preceded by a letter (`string2` → `string`, `2`).

/// Converts to `PascalCase`.
///
/// # Examples
///
/// ```
/// use nautilus::strings::to_pascal;
///
/// assert_eq!(to_pascal("example_string"), "ExampleString");
/// assert_eq!(to_pascal("exampleString"), "ExampleString");
/// ```
pub fn to_pascal(input: &str) -> String {
    cased(input, true)
}

/// Converts to `camelCase`.
///
/// # Examples
///
/// ```
/// use nautilus::strings::to_camel;
///
/// assert_eq!(to_camel("example_string"), "exampleString");
/// assert_eq!(to_camel("ExampleString"), "exampleString");
/// ```
pub fn to_camel(input: &str) -> String {
    cased(input, false)
}

/// Converts to `snake_case`.
pub fn to_snake(input: &str) -> String {
    delimited(input, '_', false)
}

/// Converts to `SCREAMING_SNAKE_CASE`.
pub fn to_screaming_snake(input: &str) -> String {
    delimited(input, '_', true)
}

/// Converts to `kebab-case`.
pub fn to_kebab(input: &str) -> String {
    delimited(input, '-', false)
}

/// Converts to `SCREAMING-KEBAB-CASE`.
pub fn to_screaming_kebab(input: &str) -> String {
    delimited(input, '-', true)
}

/// Splits the trimmed input into words at style boundaries.
fn words(input: &str) -> Vec<&str> {
    let input = input.trim();
    let chars: Vec<(usize, char)> = input.char_indices().collect();

    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    // Whether the current digit run was preceded by a letter in the same
    // token; a leading digit run stays glued to the letters after it.
    let mut digits_after_letter = false;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        if matches!(c, ' ' | '_' | '-') {
            if let Some(s) = start.take() {
                out.push(&input[s..pos]);
            }
            continue;
        }

        let Some(s) = start else {
            start = Some(pos);
            digits_after_letter = false;
            continue;
        };

        // Invariant: `start` is set, so the previous char belongs to the
        // current word.
        let prev = chars[i - 1].1;
        let next_is_lower = chars
            .get(i + 1)
            .is_some_and(|&(_, n)| n.is_ascii_lowercase());

        let mut boundary = false;
        if prev.is_ascii_lowercase() && c.is_ascii_uppercase() {
            boundary = true;
        } else if prev.is_ascii_alphabetic() && c.is_ascii_digit() {
            boundary = true;
            digits_after_letter = true;
        } else if prev.is_ascii_digit() && c.is_ascii_alphabetic() && digits_after_letter {
            boundary = true;
        } else if prev.is_ascii_uppercase() && c.is_ascii_uppercase() && next_is_lower {
            boundary = true;
        }

        if boundary {
            out.push(&input[s..pos]);
            start = Some(pos);
            if !c.is_ascii_digit() {
                digits_after_letter = false;
            }
        }
    }

    if let Some(s) = start {
        out.push(&input[s..]);
    }
    out
}

fn delimited(input: &str, delimiter: char, screaming: bool) -> String {
    let mut out = String::new();
    for (i, word) in words(input).iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        for c in word.chars() {
            out.push(if screaming {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            });
        }
    }
    out
}

fn cased(input: &str, upper_first: bool) -> String {
    let mut out = String::new();
    for (i, word) in words(input).iter().enumerate() {
        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        if i == 0 && !upper_first {
            out.push(first.to_ascii_lowercase());
        } else {
            out.push(first.to_ascii_uppercase());
        }
        for c in chars {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every input here names the same two words, with and without a
    // trailing counter; each conversion must collapse them identically.
    const PLAIN: &[&str] = &[
        "ExampleString",
        "exampleString",
        "example_string",
        "Example_String",
        "EXAMPLE_STRING",
        "example string",
        "Example string",
        "Example String",
        "EXAMPLE STRING",
    ];

    const NUMBERED: &[&str] = &[
        "ExampleString2",
        "exampleString2",
        "example_string2",
        "example_string_2",
        "Example_String2",
        "Example_String_2",
        "EXAMPLE_STRING2",
        "EXAMPLE_STRING_2",
        "example string 2",
        "example string2",
        "Example string 2",
        "Example string2",
        "Example String 2",
        "Example String2",
        "EXAMPLE STRING 2",
        "EXAMPLE STRING2",
    ];

    #[test]
    fn pascal() {
        for s in PLAIN {
            assert_eq!(to_pascal(s), "ExampleString", "input: {s}");
        }
        for s in NUMBERED {
            assert_eq!(to_pascal(s), "ExampleString2", "input: {s}");
        }
    }

    #[test]
    fn camel() {
        for s in PLAIN {
            assert_eq!(to_camel(s), "exampleString", "input: {s}");
        }
        for s in NUMBERED {
            assert_eq!(to_camel(s), "exampleString2", "input: {s}");
        }
    }

    #[test]
    fn snake() {
        for s in PLAIN {
            assert_eq!(to_snake(s), "example_string", "input: {s}");
        }
        for s in NUMBERED {
            assert_eq!(to_snake(s), "example_string_2", "input: {s}");
        }
    }

    #[test]
    fn screaming_snake() {
        for s in PLAIN {
            assert_eq!(to_screaming_snake(s), "EXAMPLE_STRING", "input: {s}");
        }
        for s in NUMBERED {
            assert_eq!(to_screaming_snake(s), "EXAMPLE_STRING_2", "input: {s}");
        }
    }

    #[test]
    fn kebab() {
        for s in PLAIN {
            assert_eq!(to_kebab(s), "example-string", "input: {s}");
        }
        for s in NUMBERED {
            assert_eq!(to_kebab(s), "example-string-2", "input: {s}");
        }
    }

    #[test]
    fn screaming_kebab() {
        for s in PLAIN {
            assert_eq!(to_screaming_kebab(s), "EXAMPLE-STRING", "input: {s}");
        }
        for s in NUMBERED {
            assert_eq!(to_screaming_kebab(s), "EXAMPLE-STRING-2", "input: {s}");
        }
    }

    #[test]
    fn uppercase_run_before_capitalized_word() {
        assert_eq!(to_snake("HTTPServer"), "http_server");
        assert_eq!(to_pascal("HTTPServer"), "HttpServer");
        assert_eq!(to_camel("HTTPServer"), "httpServer");
    }

    #[test]
    fn leading_digits_stay_glued() {
        assert_eq!(to_snake("2fast"), "2fast");
        assert_eq!(to_snake("fast2furious"), "fast_2_furious");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(to_snake("  example string  "), "example_string");
    }

    #[test]
    fn empty_input() {
        assert_eq!(to_snake(""), "");
        assert_eq!(to_pascal(""), "");
    }
}
