//! The trivia API ships prompts and answers with HTML entities in them. The
//! model keeps that text verbatim; these helpers interpret it for terminal
//! display.

pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find(';') {
            // Entities are short; a distant ';' means this '&' is literal.
            Some(end) if end <= 10 => match decode_one(&tail[1..end]) {
                Some(decoded) => {
                    out.push(decoded);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_one(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    let ch = match entity {
        "quot" => '"',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "eacute" => '\u{e9}',
        "aacute" => '\u{e1}',
        "uuml" => '\u{fc}',
        "ouml" => '\u{f6}',
        "auml" => '\u{e4}',
        "deg" => '\u{b0}',
        _ => return None,
    };
    Some(ch)
}

/// The API prefixes subcategories ("Entertainment: Film"); the screens show
/// just the subcategory.
pub fn short_category(category: &str) -> &str {
    category
        .strip_prefix("Entertainment: ")
        .or_else(|| category.strip_prefix("Science: "))
        .unwrap_or(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_common_named_entities() {
        assert_eq!(
            decode_entities("Who directed &quot;Jaws&quot;?"),
            "Who directed \"Jaws\"?"
        );
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
    }

    #[test]
    fn test_decodes_numeric_entities() {
        assert_eq!(decode_entities("it&#039;s"), "it's");
        assert_eq!(decode_entities("caf&#xe9;"), "caf\u{e9}");
    }

    #[test]
    fn test_unknown_entity_is_left_alone() {
        assert_eq!(decode_entities("&bogus; stays"), "&bogus; stays");
    }

    #[test]
    fn test_bare_ampersand_is_left_alone() {
        assert_eq!(decode_entities("AT&T"), "AT&T");
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(decode_entities("2+2=?"), "2+2=?");
    }

    #[test]
    fn test_short_category_strips_known_prefixes() {
        assert_eq!(short_category("Entertainment: Film"), "Film");
        assert_eq!(short_category("Science: Computers"), "Computers");
        assert_eq!(short_category("Geography"), "Geography");
    }
}
