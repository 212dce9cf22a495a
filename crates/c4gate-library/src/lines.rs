//! Line splitting shared by resource loading and sanitizing.

/// Iterator over the lines of a text, without their terminators.
///
/// Created by [`split_lines`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
}

/// Split `text` into lines the way a buffered line reader does.
///
/// A line ends at `\r\n`, `\n` or a lone `\r`. A terminator at the very end
/// does not start an extra empty line.
///
/// ```
/// use c4gate_library::split_lines;
///
/// let lines: Vec<_> = split_lines("a\rb\r\nc\n").collect();
/// assert_eq!(lines, ["a", "b", "c"]);
/// ```
pub fn split_lines(text: &str) -> Lines<'_> {
    Lines { rest: text }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let Some(end) = self.rest.find(['\r', '\n']) else {
            let line = self.rest;
            self.rest = "";
            return Some(line);
        };

        let line = &self.rest[..end];
        let skip = if self.rest[end..].starts_with("\r\n") {
            2
        } else {
            1
        };
        self.rest = &self.rest[end + skip..];
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn collect(text: &str) -> Vec<&str> {
        split_lines(text).collect()
    }

    #[test]
    fn test_split_lf() {
        assert_eq!(collect("a\nb\nc"), ["a", "b", "c"]);
    }

    #[test]
    fn test_split_crlf() {
        assert_eq!(collect("a\r\nb\r\n"), ["a", "b"]);
    }

    #[test]
    fn test_split_lone_cr() {
        assert_eq!(
            collect("@startuml\r!include /etc/passwd\rA -> B\r@enduml"),
            ["@startuml", "!include /etc/passwd", "A -> B", "@enduml"]
        );
    }

    #[test]
    fn test_split_mixed_terminators() {
        assert_eq!(collect("a\rb\nc\r\nd"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_cr_cr_lf_is_empty_line() {
        assert_eq!(collect("a\r\r\nb"), ["a", "", "b"]);
    }

    #[test]
    fn test_blank_lines_kept() {
        assert_eq!(collect("\na\n\n"), ["", "a", ""]);
        assert_eq!(collect("\r\r"), ["", ""]);
    }

    #[test]
    fn test_trailing_terminator_adds_no_line() {
        assert_eq!(collect("a\r"), ["a"]);
        assert_eq!(collect("a\n"), ["a"]);
    }

    #[test]
    fn test_empty() {
        assert!(collect("").is_empty());
    }
}
