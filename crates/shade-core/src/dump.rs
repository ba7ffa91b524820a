//! Line-numbered rendering of shader source for diagnostics.

/// Minimum width of the right-aligned line number column.
pub const LINE_NUMBER_WIDTH: usize = 3;

/// Render `text` with 1-based line numbers.
///
/// Each line becomes `"{number:>3} {line}"` and the lines are joined with
/// `'\n'`. Lines are split on `'\n'` only, so a trailing newline produces a
/// final numbered empty line. Empty input yields an empty string.
///
/// ```
/// use shade_core::dump_source;
///
/// assert_eq!(dump_source("a\nb"), "  1 a\n  2 b");
/// ```
pub fn dump_source(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    text.split('\n')
        .enumerate()
        .map(|(i, line)| format!("{:>width$} {}", i + 1, line, width = LINE_NUMBER_WIDTH))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dump_empty() {
        assert_eq!(dump_source(""), "");
    }

    #[test]
    fn test_dump_two_lines() {
        assert_eq!(dump_source("a\nb"), "  1 a\n  2 b");
    }

    #[test]
    fn test_dump_single_line() {
        assert_eq!(
            dump_source("void main(){gl_FragColor=undefinedVar;}"),
            "  1 void main(){gl_FragColor=undefinedVar;}"
        );
    }

    #[test]
    fn test_dump_trailing_newline() {
        assert_eq!(dump_source("x\n"), "  1 x\n  2 ");
    }

    #[test]
    fn test_dump_keeps_indentation_and_blank_lines() {
        let src = "void main() {\n\n    gl_Position = vec4(0.0);\n}";
        let dump = dump_source(src);
        let lines: Vec<&str> = dump.split('\n').collect();

        assert_eq!(lines[1], "  2 ");
        assert_eq!(lines[2], "  3     gl_Position = vec4(0.0);");
    }

    #[test]
    fn test_dump_wide_line_numbers() {
        let src = vec!["x"; 1000].join("\n");
        let dump = dump_source(&src);
        let last = dump.split('\n').last().unwrap();

        assert_eq!(last, "1000 x");
    }

    proptest! {
        #[test]
        fn test_dump_line_count_matches(lines in prop::collection::vec("[^\n]{0,20}", 1..40)) {
            let text = lines.join("\n");
            let dump = dump_source(&text);

            if text.is_empty() {
                prop_assert_eq!(dump, "");
            } else {
                let dumped: Vec<&str> = dump.split('\n').collect();
                prop_assert_eq!(dumped.len(), lines.len());
                for (i, (out, original)) in dumped.iter().zip(&lines).enumerate() {
                    let expected = format!("{:>3} {}", i + 1, original);
                    prop_assert_eq!(*out, expected.as_str());
                }
            }
        }
    }
}
