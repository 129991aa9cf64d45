/// The classification of one source line, after comment-stripping and
/// label peeling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank after comment-stripping; nothing to do.
    Empty,
    /// `.directive rest`.
    Directive { name: &'a str, args: &'a str },
    /// `MNEMONIC operand, operand, ...` (mnemonic already upper-cased).
    Instruction { mnemonic: String, operands: &'a str },
}

/// A label peeled off the front of a line, if any, plus whatever remained.
pub struct LabeledLine<'a> {
    pub label: Option<&'a str>,
    pub rest: &'a str,
}

/// Strips a trailing `; comment` and surrounding whitespace.
pub fn strip_comment(raw: &str) -> &str {
    match raw.find(';') {
        Some(idx) => raw[..idx].trim(),
        None => raw.trim(),
    }
}

/// Peels a leading `name:` label off a line, per the `[A-Za-z_.][A-Za-z0-9_.]*:` rule.
pub fn peel_label(line: &str) -> LabeledLine {
    let bytes = line.as_bytes();
    let first_ok = bytes
        .first()
        .map_or(false, |&b| (b as char).is_ascii_alphabetic() || b == b'_' || b == b'.');

    if !first_ok {
        return LabeledLine { label: None, rest: line };
    }

    let mut end = 1;
    while end < line.len() {
        let c = line[end..].chars().next().unwrap();
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            end += c.len_utf8();
        } else {
            break;
        }
    }

    if line[end..].starts_with(':') {
        LabeledLine {
            label: Some(&line[..end]),
            rest: line[end + 1..].trim(),
        }
    } else {
        LabeledLine { label: None, rest: line }
    }
}

/// Classifies an already label-stripped line as a directive or instruction.
/// Returns `Line::Empty` if there's nothing left.
pub fn classify_rest(rest: &str) -> Line {
    let rest = rest.trim();
    if rest.is_empty() {
        return Line::Empty;
    }

    if let Some(directive) = rest.strip_prefix('.') {
        let mut parts = directive.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("");
        let args = parts.next().unwrap_or("").trim();
        return Line::Directive { name, args };
    }

    let mut parts = rest.splitn(2, char::is_whitespace);
    let mnemonic = parts.next().unwrap_or("").to_uppercase();
    let operands = parts.next().unwrap_or("").trim();
    Line::Instruction { mnemonic, operands }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_comments() {
        assert_eq!(strip_comment("LOAD R0, #1 ; load one"), "LOAD R0, #1");
        assert_eq!(strip_comment("  ; only a comment"), "");
        assert_eq!(strip_comment("HALT"), "HALT");
    }

    #[test]
    fn peels_a_label_and_reclassifies_the_remainder() {
        let labeled = peel_label("loop: INC R1");
        assert_eq!(labeled.label, Some("loop"));
        assert_eq!(classify_rest(labeled.rest), Line::Instruction { mnemonic: "INC".to_string(), operands: "R1" });
    }

    #[test]
    fn label_with_no_remainder_is_empty() {
        let labeled = peel_label("done:");
        assert_eq!(labeled.label, Some("done"));
        assert_eq!(classify_rest(labeled.rest), Line::Empty);
    }

    #[test]
    fn directive_line() {
        let labeled = peel_label(".byte 1, 2, 3");
        assert_eq!(labeled.label, None);
        assert_eq!(classify_rest(labeled.rest), Line::Directive { name: "byte", args: "1, 2, 3" });
    }

    #[test]
    fn mnemonic_is_upper_cased() {
        assert_eq!(classify_rest("load r0, #1"), Line::Instruction { mnemonic: "LOAD".to_string(), operands: "r0, #1" });
    }

    #[test]
    fn a_colon_inside_brackets_does_not_look_like_a_label() {
        let labeled = peel_label("LOAD R0, #1");
        assert_eq!(labeled.label, None);
    }
}
