//! Line-by-line rewrite of C4-PlantUML sources.

use c4gate_library::{Library, split_lines};

use crate::directive::{SourceLine, classify, parse_line};
use crate::safe_mode::{Decision, SafeMode, allow};

/// Rewrite `input` for rendering.
///
/// Every line is handled on its own, in order:
/// - library includes are replaced by the matching bundle text
/// - other includes are dropped or kept depending on `mode`
/// - all other lines are kept as received
///
/// Each emitted line (or bundle) is followed by `\n`. Lines are split the way
/// a line reader does: on `\n`, `\r\n` or a lone `\r`, with no empty line
/// after a trailing terminator.
#[must_use]
pub fn sanitize(input: &str, library: &Library, mode: SafeMode) -> String {
    let mut output = String::with_capacity(input.len());

    for line in split_lines(input) {
        match allow(mode, classify(line)) {
            Decision::Inject(name) => {
                output.push_str(library.bundle(name));
                output.push('\n');
            }
            Decision::Passthrough => {
                output.push_str(line);
                output.push('\n');
            }
            Decision::Drop => {
                if let SourceLine::Include { path } = parse_line(line) {
                    tracing::debug!(path, %mode, "Dropped include directive");
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use c4gate_library::{LibraryName, from_fn};
    use pretty_assertions::assert_eq;

    use super::*;

    fn library() -> Library {
        Library::load(&from_fn(|name| match name {
            "c4.puml" => Some("' core".to_owned()),
            "c4_context.puml" => Some("\n' context".to_owned()),
            "c4_container.puml" => Some("\n' container".to_owned()),
            "c4_component.puml" => Some("\n' component".to_owned()),
            _ => None,
        }))
        .unwrap()
    }

    #[test]
    fn test_end_to_end_secure() {
        let input = "@startuml\n!include c4.puml\nPerson(customer, \"Customer\")\n@enduml";
        let output = sanitize(input, &library(), SafeMode::Secure);

        assert_eq!(
            output,
            "@startuml\n' core\nPerson(customer, \"Customer\")\n@enduml\n"
        );
    }

    #[test]
    fn test_known_include_expands_in_every_mode() {
        let library = library();
        for mode in [SafeMode::Unsafe, SafeMode::Safe, SafeMode::Secure] {
            let output = sanitize("!include C4_Container.puml", &library, mode);
            assert_eq!(output, format!("{}\n", library.bundle(LibraryName::Container)));
        }
    }

    #[test]
    fn test_each_tier_expands_to_its_bundle() {
        let library = library();
        assert_eq!(
            sanitize("!include c4_context.puml", &library, SafeMode::Secure),
            "' core\n' context\n"
        );
        assert_eq!(
            sanitize("!include_once c4_component.puml", &library, SafeMode::Secure),
            "' core\n' context\n' container\n' component\n"
        );
    }

    #[test]
    fn test_secure_drops_foreign_include() {
        let output = sanitize("!include /etc/passwd", &library(), SafeMode::Secure);
        assert_eq!(output, "");
    }

    #[test]
    fn test_secure_drop_leaves_neighbors_intact() {
        let input = "@startuml\n  !include /etc/passwd\nA -> B\n@enduml\n";
        let output = sanitize(input, &library(), SafeMode::Secure);
        assert_eq!(output, "@startuml\nA -> B\n@enduml\n");
    }

    #[test]
    fn test_safe_behaves_like_secure() {
        let output = sanitize("!includeurl http://evil/x.puml", &library(), SafeMode::Safe);
        assert_eq!(output, "");
    }

    #[test]
    fn test_unsafe_passes_foreign_include_verbatim() {
        let line = "  \t!include /etc/passwd  ";
        let output = sanitize(line, &library(), SafeMode::Unsafe);
        assert_eq!(output, format!("{line}\n"));
    }

    #[test]
    fn test_plain_lines_preserved() {
        let input = "@startuml\n  indented \t\n\n' comment\n!define X 1\n@enduml";
        let output = sanitize(input, &library(), SafeMode::Secure);
        assert_eq!(output, format!("{input}\n"));
    }

    #[test]
    fn test_trailing_newline_not_doubled() {
        let output = sanitize("A -> B\n", &library(), SafeMode::Secure);
        assert_eq!(output, "A -> B\n");
    }

    #[test]
    fn test_crlf_input_normalized() {
        let output = sanitize("@startuml\r\n!include c4.puml\r\n@enduml\r\n", &library(), SafeMode::Secure);
        assert_eq!(output, "@startuml\n' core\n@enduml\n");
    }

    #[test]
    fn test_secure_drops_foreign_include_with_cr_line_endings() {
        let input = "@startuml\r!include /etc/passwd\rA -> B\r@enduml";
        let output = sanitize(input, &library(), SafeMode::Secure);

        assert!(!output.contains("/etc/passwd"));
        assert_eq!(output, "@startuml\nA -> B\n@enduml\n");
    }

    #[test]
    fn test_cr_line_endings_inject_library() {
        let output = sanitize("!include c4.puml\rA -> B", &library(), SafeMode::Secure);
        assert_eq!(output, "' core\nA -> B\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize("", &library(), SafeMode::Secure), "");
    }

    #[test]
    fn test_priority_ambiguity_resolves_to_core() {
        let output = sanitize(
            "!include c4_context.puml/../c4.puml",
            &library(),
            SafeMode::Secure,
        );
        assert_eq!(output, "' core\n");
    }

    #[test]
    fn test_deterministic() {
        let library = library();
        let input = "!include c4_container.puml\n!include x.puml\nA -> B";
        assert_eq!(
            sanitize(input, &library, SafeMode::Unsafe),
            sanitize(input, &library, SafeMode::Unsafe)
        );
    }
}
