//! Prompt template
//!
//! The rendered document is:
//!
//! ```text
//! <PREAMBLE>
//! ----
//! <path>
//! <content>
//! ----
//! ...
//! --END--
//! <instruction>
//! ```
//!
//! Downstream consumers parse this framing literally, so every byte here is
//! part of the output contract.

/// Fixed description of the framing that opens every prompt
pub const PREAMBLE: &str = "The following text is a Git repository with code. The structure of the text is sections that begin with ----, followed by a single line containing the file path and file name, followed by a variable amount of lines containing the file contents. The text representing the repository ends when the symbols --END-- are encountered. Any further text beyond --END-- is meant to be interpreted as instructions using the aforementioned code as context.";

/// Opens each file section
pub const SECTION_MARKER: &str = "----";

/// Closes the repository part of the prompt
pub const END_MARKER: &str = "--END--";

/// The template with both the file and instruction slots left empty.
///
/// This is the scaffolding every prompt pays for regardless of content.
pub fn skeleton() -> String {
    render(std::iter::empty(), "")
}

/// Render file sections and the instruction into the final prompt.
///
/// Sections are `----\n<path>\n<content>` joined by a single newline. Both
/// slots are filled by concatenation, so user text is never interpreted.
pub fn render<'a, I>(files: I, instruction: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::with_capacity(PREAMBLE.len() + instruction.len() + 64);
    out.push_str(PREAMBLE);
    out.push('\n');

    for (i, (path, content)) in files.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(SECTION_MARKER);
        out.push('\n');
        out.push_str(path);
        out.push('\n');
        out.push_str(content);
    }

    out.push('\n');
    out.push_str(END_MARKER);
    out.push('\n');
    out.push_str(instruction);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_has_empty_slots() {
        assert_eq!(skeleton(), format!("{PREAMBLE}\n\n--END--\n"));
    }

    #[test]
    fn sections_are_newline_joined() {
        let out = render([("a.rs", "fn a() {}"), ("b.rs", "fn b() {}\n")], "go");
        assert_eq!(
            out,
            format!("{PREAMBLE}\n----\na.rs\nfn a() {{}}\n----\nb.rs\nfn b() {{}}\n\n--END--\ngo")
        );
    }

    #[test]
    fn placeholder_like_text_is_literal() {
        let out = render([("x", "$GIT_REPO_FILES$ $&")], "$INSTRUCTION$");
        assert!(out.contains("\nx\n$GIT_REPO_FILES$ $&\n--END--\n$INSTRUCTION$"));
    }
}
