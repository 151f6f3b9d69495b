mod common;

use std::sync::Arc;

use repo_prompt_mcp::prompt::template::PREAMBLE;
use repo_prompt_mcp::prompt::PromptAssembler;
use repo_prompt_mcp::tokens::HeuristicCounter;

const EXPECTED_PREAMBLE: &str = "The following text is a Git repository with code. The structure of the text is sections that begin with ----, followed by a single line containing the file path and file name, followed by a variable amount of lines containing the file contents. The text representing the repository ends when the symbols --END-- are encountered. Any further text beyond --END-- is meant to be interpreted as instructions using the aforementioned code as context.";

fn assembler() -> PromptAssembler {
    PromptAssembler::new(Arc::new(HeuristicCounter))
}

#[test]
fn test_preamble_is_verbatim() {
    assert_eq!(PREAMBLE, EXPECTED_PREAMBLE);
}

#[test]
fn test_single_file_prompt_is_exact() {
    let asm = assembler();
    asm.initialize(common::files(&[("a.txt", "hello")]));
    asm.set_instruction("do X");

    let expected = format!("{EXPECTED_PREAMBLE}\n----\na.txt\nhello\n--END--\ndo X");
    assert_eq!(asm.render_prompt(), expected);
}

#[test]
fn test_multiple_files_keep_order() {
    let asm = assembler();
    asm.initialize(common::files(&[
        ("src/main.rs", "fn main() {}\n"),
        ("README.md", "# Title\nline two"),
    ]));
    asm.set_instruction("Explain");

    let expected = format!(
        "{EXPECTED_PREAMBLE}\n----\nsrc/main.rs\nfn main() {{}}\n\n----\nREADME.md\n# Title\nline two\n--END--\nExplain"
    );
    assert_eq!(asm.render_prompt(), expected);
}

#[test]
fn test_empty_working_set_renders_skeleton() {
    let asm = assembler();
    asm.initialize(Vec::new());
    asm.set_instruction("");

    let prompt = asm.render_prompt();
    assert_eq!(prompt, format!("{EXPECTED_PREAMBLE}\n\n--END--\n"));
    assert!(prompt.ends_with("--END--\n"));
}

#[test]
fn test_render_is_idempotent() {
    let asm = assembler();
    asm.initialize(common::files(&[("a.rs", "let x = 1;"), ("b.rs", "ünïcødé ✓")]));

    let first = asm.render_prompt();
    let second = asm.render_prompt();
    assert_eq!(first, second);
}

#[test]
fn test_render_reflects_edits_immediately() {
    let asm = assembler();
    asm.initialize(common::files(&[("a.txt", "old")]));
    asm.edit_content(0, "new").unwrap();

    assert!(asm.render_prompt().contains("\na.txt\nnew\n--END--\n"));
}

#[test]
fn test_deleted_files_are_not_rendered() {
    let asm = assembler();
    asm.initialize(common::files(&[("a.txt", "A"), ("b.txt", "B")]));
    asm.delete_file(0).unwrap();

    let prompt = asm.render_prompt();
    assert!(!prompt.contains("a.txt"));
    assert!(prompt.contains("----\nb.txt\nB\n--END--"));
}

#[test]
fn test_expanded_flag_does_not_change_prompt() {
    let asm = assembler();
    asm.initialize(common::files(&[("a.txt", "A")]));
    let before = asm.render_prompt();
    asm.toggle_expand(0).unwrap();
    assert_eq!(asm.render_prompt(), before);
}

#[test]
fn test_default_instruction_is_used() {
    let asm = assembler();
    asm.initialize(Vec::new());
    assert!(asm
        .render_prompt()
        .ends_with("--END--\nWrite me a ...\nOutput the filename and code block, which contain the content of files."));
}
