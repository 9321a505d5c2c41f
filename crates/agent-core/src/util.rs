/// Pull the first JSON object out of a model answer. Handles bare objects,
/// fenced ```json blocks and objects embedded in prose.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let body = match trimmed.find("```") {
        Some(start) => {
            let after = &trimmed[start + 3..];
            let after = after.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_');
            after.find("```").map(|end| &after[..end]).unwrap_or(after)
        }
        None => trimmed,
    };

    let start = body.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in body[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// First eight characters of a secret, for log lines.
pub fn secret_prefix(secret: &str) -> String {
    let prefix: String = secret.chars().take(8).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_fenced_block() {
        let input = "Result:\n```json\n{\"is_appropriate\": true}\n```";
        assert_eq!(extract_json_object(input), Some("{\"is_appropriate\": true}"));
    }

    #[test]
    fn braces_inside_strings_do_not_close() {
        let input = "sure { \"reasoning\": \"uses } braces\", \"ok\": 1 } trailing";
        assert_eq!(
            extract_json_object(input),
            Some("{ \"reasoning\": \"uses } braces\", \"ok\": 1 }")
        );
    }

    #[test]
    fn returns_none_when_missing() {
        assert!(extract_json_object("no braces here").is_none());
    }

    #[test]
    fn prefix_hides_the_rest() {
        assert_eq!(secret_prefix("sk-abcdefghijkl"), "sk-abcde...");
    }
}
