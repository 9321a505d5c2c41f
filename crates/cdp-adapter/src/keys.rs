//! Key naming.
//!
//! Two layers: the alias table that turns the upper-case key names emitted by
//! the computer-use model (`CTRL`, `ESC`, `PAGEDOWN`) into DOM key names, and
//! the key definitions needed to synthesise `Input.dispatchKeyEvent` payloads
//! for those DOM names.

use crate::error::{AdapterError, AdapterErrorKind};

const CUA_KEY_ALIASES: &[(&str, &str)] = &[
    ("CTRL", "Control"),
    ("CMD", "Meta"),
    ("COMMAND", "Meta"),
    ("ALT", "Alt"),
    ("SHIFT", "Shift"),
    ("ESC", "Escape"),
    ("ESCAPE", "Escape"),
    ("ENTER", "Enter"),
    ("RETURN", "Enter"),
    ("SPACE", " "),
    ("SPACEBAR", " "),
    ("TAB", "Tab"),
    ("BACKSPACE", "Backspace"),
    ("DELETE", "Delete"),
    ("DEL", "Delete"),
    ("UP", "ArrowUp"),
    ("DOWN", "ArrowDown"),
    ("LEFT", "ArrowLeft"),
    ("RIGHT", "ArrowRight"),
    ("PAGEUP", "PageUp"),
    ("PAGEDOWN", "PageDown"),
    ("HOME", "Home"),
    ("END", "End"),
    ("INSERT", "Insert"),
    ("INS", "Insert"),
];

/// Translate a model-supplied key name. Lookup is case-insensitive; names
/// without an alias are returned unchanged.
pub fn translate_cua_key(raw: &str) -> String {
    let upper = raw.to_uppercase();
    CUA_KEY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, mapped)| (*mapped).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// CDP modifier bit masks.
pub mod modifier {
    pub const ALT: i64 = 1;
    pub const CONTROL: i64 = 2;
    pub const META: i64 = 4;
    pub const SHIFT: i64 = 8;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyDefinition {
    pub key: String,
    pub code: String,
    pub key_code: i64,
    pub text: Option<String>,
}

impl KeyDefinition {
    fn named(key: &str, code: &str, key_code: i64, text: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            code: code.to_string(),
            key_code,
            text: text.map(str::to_string),
        }
    }

    /// Modifier bit for modifier keys, 0 otherwise.
    pub fn modifier_bit(&self) -> i64 {
        match self.key.as_str() {
            "Alt" => modifier::ALT,
            "Control" => modifier::CONTROL,
            "Meta" => modifier::META,
            "Shift" => modifier::SHIFT,
            _ => 0,
        }
    }
}

/// Resolve a single DOM key name (`"Enter"`, `"a"`, `"F5"`).
pub fn key_definition(name: &str) -> Option<KeyDefinition> {
    let named = match name {
        "Enter" => Some(KeyDefinition::named("Enter", "Enter", 13, Some("\r"))),
        "Tab" => Some(KeyDefinition::named("Tab", "Tab", 9, None)),
        "Backspace" => Some(KeyDefinition::named("Backspace", "Backspace", 8, None)),
        "Delete" => Some(KeyDefinition::named("Delete", "Delete", 46, None)),
        "Escape" => Some(KeyDefinition::named("Escape", "Escape", 27, None)),
        "ArrowUp" => Some(KeyDefinition::named("ArrowUp", "ArrowUp", 38, None)),
        "ArrowDown" => Some(KeyDefinition::named("ArrowDown", "ArrowDown", 40, None)),
        "ArrowLeft" => Some(KeyDefinition::named("ArrowLeft", "ArrowLeft", 37, None)),
        "ArrowRight" => Some(KeyDefinition::named("ArrowRight", "ArrowRight", 39, None)),
        "PageUp" => Some(KeyDefinition::named("PageUp", "PageUp", 33, None)),
        "PageDown" => Some(KeyDefinition::named("PageDown", "PageDown", 34, None)),
        "Home" => Some(KeyDefinition::named("Home", "Home", 36, None)),
        "End" => Some(KeyDefinition::named("End", "End", 35, None)),
        "Insert" => Some(KeyDefinition::named("Insert", "Insert", 45, None)),
        " " | "Space" => Some(KeyDefinition::named(" ", "Space", 32, Some(" "))),
        "Control" => Some(KeyDefinition::named("Control", "ControlLeft", 17, None)),
        "Shift" => Some(KeyDefinition::named("Shift", "ShiftLeft", 16, None)),
        "Alt" => Some(KeyDefinition::named("Alt", "AltLeft", 18, None)),
        "Meta" => Some(KeyDefinition::named("Meta", "MetaLeft", 91, None)),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    if let Some(number) = name.strip_prefix('F').and_then(|n| n.parse::<i64>().ok()) {
        if (1..=12).contains(&number) {
            return Some(KeyDefinition::named(name, name, 111 + number, None));
        }
    }

    let mut chars = name.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(character_definition(ch))
}

fn character_definition(ch: char) -> KeyDefinition {
    let text = ch.to_string();
    if ch.is_ascii_alphabetic() {
        let upper = ch.to_ascii_uppercase();
        return KeyDefinition {
            key: text.clone(),
            code: format!("Key{upper}"),
            key_code: upper as i64,
            text: Some(text),
        };
    }
    if ch.is_ascii_digit() {
        return KeyDefinition {
            key: text.clone(),
            code: format!("Digit{ch}"),
            key_code: ch as i64,
            text: Some(text),
        };
    }
    KeyDefinition {
        key: text.clone(),
        code: String::new(),
        key_code: 0,
        text: Some(text),
    }
}

/// A key plus the modifiers held while it is pressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chord {
    pub modifiers: Vec<KeyDefinition>,
    pub key: KeyDefinition,
}

impl Chord {
    pub fn modifier_mask(&self) -> i64 {
        self.modifiers
            .iter()
            .fold(0, |mask, def| mask | def.modifier_bit())
    }

    /// Text produced by the key press. Chords holding anything but Shift
    /// produce no text.
    pub fn text(&self) -> Option<String> {
        let mask = self.modifier_mask();
        if mask & !modifier::SHIFT != 0 {
            return None;
        }
        let text = self.key.text.clone()?;
        if mask & modifier::SHIFT != 0 {
            Some(text.to_uppercase())
        } else {
            Some(text)
        }
    }
}

/// Parse `"Enter"`, `"Control+a"`, `"Shift++"` into a [`Chord`].
pub fn parse_chord(input: &str) -> Result<Chord, AdapterError> {
    let unknown = |name: &str| {
        AdapterError::new(AdapterErrorKind::UnknownKey).with_hint(format!("unknown key: \"{name}\""))
    };

    if input.is_empty() {
        return Err(unknown(input));
    }

    let (modifier_part, key_name) = if input == "+" {
        ("", "+")
    } else if let Some(prefix) = input.strip_suffix("++") {
        (prefix, "+")
    } else {
        match input.rsplit_once('+') {
            Some((prefix, key)) => (prefix, key),
            None => ("", input),
        }
    };

    let mut modifiers = Vec::new();
    if !modifier_part.is_empty() {
        for name in modifier_part.split('+') {
            let def = key_definition(name).ok_or_else(|| unknown(name))?;
            if def.modifier_bit() == 0 {
                return Err(unknown(name));
            }
            modifiers.push(def);
        }
    }

    let key = key_definition(key_name).ok_or_else(|| unknown(key_name))?;
    Ok(Chord { modifiers, key })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_documented_aliases() {
        let expected = [
            ("CTRL", "Control"),
            ("ctrl", "Control"),
            ("CMD", "Meta"),
            ("COMMAND", "Meta"),
            ("ESC", "Escape"),
            ("Return", "Enter"),
            ("SPACE", " "),
            ("DEL", "Delete"),
            ("UP", "ArrowUp"),
            ("down", "ArrowDown"),
            ("LEFT", "ArrowLeft"),
            ("RIGHT", "ArrowRight"),
            ("PAGEUP", "PageUp"),
            ("PAGEDOWN", "PageDown"),
            ("INS", "Insert"),
        ];
        for (raw, mapped) in expected {
            assert_eq!(translate_cua_key(raw), mapped, "alias for {raw}");
        }
    }

    #[test]
    fn unmapped_keys_pass_through() {
        assert_eq!(translate_cua_key("a"), "a");
        assert_eq!(translate_cua_key("ctrl+a"), "ctrl+a");
        assert_eq!(translate_cua_key("F5"), "F5");
    }

    #[test]
    fn parses_control_chord_without_text() {
        let chord = parse_chord("Control+a").expect("chord");
        assert_eq!(chord.modifier_mask(), modifier::CONTROL);
        assert_eq!(chord.key.code, "KeyA");
        assert_eq!(chord.text(), None);
    }

    #[test]
    fn shift_uppercases_text() {
        let chord = parse_chord("Shift+b").expect("chord");
        assert_eq!(chord.text().as_deref(), Some("B"));
    }

    #[test]
    fn plus_key_is_supported() {
        let chord = parse_chord("Shift++").expect("chord");
        assert_eq!(chord.key.key, "+");
        assert_eq!(chord.modifiers.len(), 1);
    }

    #[test]
    fn lowercase_modifier_names_are_rejected() {
        let err = parse_chord("ctrl+a").unwrap_err();
        assert_eq!(err.kind, AdapterErrorKind::UnknownKey);
    }

    #[test]
    fn function_keys_resolve() {
        let def = key_definition("F5").expect("F5");
        assert_eq!(def.key_code, 116);
    }
}
