//! Key names used in the config file, matching winit's `KeyCode` debug names.

use winit::keyboard::KeyCode;

/// A configured key name that does not match any supported [`KeyCode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key: {0}")]
pub struct UnknownKey(pub String);

/// Parse a key name such as `"Space"`, `"KeyP"` or `"F5"`.
///
/// Single letters and digits are accepted as shorthand (`"p"`, `"3"`).
pub fn parse_key_code(name: &str) -> Result<KeyCode, UnknownKey> {
    let name = name.trim();
    let unknown = || UnknownKey(name.to_string());

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return single_char(c).ok_or_else(unknown);
    }

    if let Some(rest) = name.strip_prefix("Key") {
        let mut chars = rest.chars();
        if let (Some(c @ 'A'..='Z'), None) = (chars.next(), chars.next()) {
            return single_char(c).ok_or_else(unknown);
        }
    }
    if let Some(rest) = name.strip_prefix("Digit") {
        let mut chars = rest.chars();
        if let (Some(c @ '0'..='9'), None) = (chars.next(), chars.next()) {
            return single_char(c).ok_or_else(unknown);
        }
    }

    Ok(match name {
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        "Pause" => KeyCode::Pause,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        "F3" => KeyCode::F3,
        "F4" => KeyCode::F4,
        "F5" => KeyCode::F5,
        "F6" => KeyCode::F6,
        "F7" => KeyCode::F7,
        "F8" => KeyCode::F8,
        "F9" => KeyCode::F9,
        "F10" => KeyCode::F10,
        "F11" => KeyCode::F11,
        "F12" => KeyCode::F12,
        _ => return Err(unknown()),
    })
}

fn single_char(c: char) -> Option<KeyCode> {
    Some(match c.to_ascii_uppercase() {
        'A' => KeyCode::KeyA,
        'B' => KeyCode::KeyB,
        'C' => KeyCode::KeyC,
        'D' => KeyCode::KeyD,
        'E' => KeyCode::KeyE,
        'F' => KeyCode::KeyF,
        'G' => KeyCode::KeyG,
        'H' => KeyCode::KeyH,
        'I' => KeyCode::KeyI,
        'J' => KeyCode::KeyJ,
        'K' => KeyCode::KeyK,
        'L' => KeyCode::KeyL,
        'M' => KeyCode::KeyM,
        'N' => KeyCode::KeyN,
        'O' => KeyCode::KeyO,
        'P' => KeyCode::KeyP,
        'Q' => KeyCode::KeyQ,
        'R' => KeyCode::KeyR,
        'S' => KeyCode::KeyS,
        'T' => KeyCode::KeyT,
        'U' => KeyCode::KeyU,
        'V' => KeyCode::KeyV,
        'W' => KeyCode::KeyW,
        'X' => KeyCode::KeyX,
        'Y' => KeyCode::KeyY,
        'Z' => KeyCode::KeyZ,
        '0' => KeyCode::Digit0,
        '1' => KeyCode::Digit1,
        '2' => KeyCode::Digit2,
        '3' => KeyCode::Digit3,
        '4' => KeyCode::Digit4,
        '5' => KeyCode::Digit5,
        '6' => KeyCode::Digit6,
        '7' => KeyCode::Digit7,
        '8' => KeyCode::Digit8,
        '9' => KeyCode::Digit9,
        ' ' => KeyCode::Space,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys() {
        assert_eq!(parse_key_code("Space"), Ok(KeyCode::Space));
        assert_eq!(parse_key_code("F5"), Ok(KeyCode::F5));
        assert_eq!(parse_key_code(" Escape "), Ok(KeyCode::Escape));
    }

    #[test]
    fn test_debug_style_names() {
        assert_eq!(parse_key_code("KeyP"), Ok(KeyCode::KeyP));
        assert_eq!(parse_key_code("Digit7"), Ok(KeyCode::Digit7));
    }

    #[test]
    fn test_shorthand() {
        assert_eq!(parse_key_code("p"), Ok(KeyCode::KeyP));
        assert_eq!(parse_key_code("0"), Ok(KeyCode::Digit0));
    }

    #[test]
    fn test_matches_debug_output() {
        for code in [KeyCode::Space, KeyCode::KeyQ, KeyCode::Digit4, KeyCode::F12] {
            assert_eq!(parse_key_code(&format!("{code:?}")), Ok(code));
        }
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(parse_key_code("Hyper"), Err(UnknownKey("Hyper".to_string())));
        assert!(parse_key_code("Keyp").is_err());
        assert!(parse_key_code("Digit10").is_err());
        assert!(parse_key_code("").is_err());
        assert!(parse_key_code("?").is_err());
    }
}
