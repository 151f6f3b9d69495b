use std::path::Path;

/// Editor languages used as a syntax-highlighting hint for a file.
///
/// The hint has no effect on token accounting or on the rendered prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Html,
    Css,
    Json,
    Markdown,
    Yaml,
    Toml,
    Swift,
    CSharp,
    Java,
    Go,
    Kotlin,
    Shell,
    PlainText,
}

impl Language {
    /// Identifier understood by code editors (Monaco naming)
    pub fn editor_id(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Html => "html",
            Language::Css => "css",
            Language::Json => "json",
            Language::Markdown => "markdown",
            Language::Yaml => "yaml",
            Language::Toml => "ini",
            Language::Swift => "swift",
            Language::CSharp => "csharp",
            Language::Java => "java",
            Language::Go => "go",
            Language::Kotlin => "kotlin",
            Language::Shell => "shell",
            Language::PlainText => "plaintext",
        }
    }
}

/// Detect the editor language from a file name or path.
///
/// Matching is case-insensitive; unknown or missing extensions map to
/// [`Language::PlainText`].
///
/// # Examples
/// ```
/// use repo_prompt_mcp::language::{detect_language, Language};
///
/// assert_eq!(detect_language("src/main.rs"), Language::Rust);
/// assert_eq!(detect_language("Test.PY"), Language::Python);
/// assert_eq!(detect_language("LICENSE"), Language::PlainText);
/// ```
pub fn detect_language(path: impl AsRef<Path>) -> Language {
    let path = path.as_ref();

    if path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.eq_ignore_ascii_case("Dockerfile") || n.eq_ignore_ascii_case("Makefile"))
    {
        return Language::Shell;
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("rs") => Language::Rust,
        Some("py") => Language::Python,
        Some("js") | Some("mjs") | Some("cjs") | Some("jsx") => Language::JavaScript,
        Some("ts") | Some("tsx") => Language::TypeScript,
        Some("html") | Some("htm") => Language::Html,
        Some("css") | Some("scss") => Language::Css,
        Some("json") => Language::Json,
        Some("md") | Some("markdown") => Language::Markdown,
        Some("yml") | Some("yaml") => Language::Yaml,
        Some("toml") => Language::Toml,
        Some("swift") => Language::Swift,
        Some("cs") => Language::CSharp,
        Some("java") => Language::Java,
        Some("go") => Language::Go,
        Some("kt") | Some("kts") => Language::Kotlin,
        Some("sh") | Some("bash") | Some("zsh") => Language::Shell,
        _ => Language::PlainText,
    }
}
