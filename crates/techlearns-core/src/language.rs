//! Supported notebook languages and their starter templates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A language the execution service accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Java,
    Cpp,
    C,
    /// Markup, rendered locally instead of executed.
    Html,
}

/// One entry of the language picker.
#[derive(Debug, Clone, Copy)]
pub struct LanguageOption {
    pub language: Language,
    pub label: &'static str,
    pub template: &'static str,
}

/// Registry of every supported language, in picker order.
pub const LANGUAGES: &[LanguageOption] = &[
    LanguageOption {
        language: Language::JavaScript,
        label: "JavaScript",
        template: "// JavaScript\nconsole.log(\"Hello, World!\");\n",
    },
    LanguageOption {
        language: Language::Python,
        label: "Python",
        template: "# Python\nprint(\"Hello, World!\")\n",
    },
    LanguageOption {
        language: Language::Java,
        label: "Java",
        template: "public class Main {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, World!\");\n    }\n}\n",
    },
    LanguageOption {
        language: Language::Cpp,
        label: "C++",
        template: "#include <iostream>\n\nint main() {\n    std::cout << \"Hello, World!\" << std::endl;\n    return 0;\n}\n",
    },
    LanguageOption {
        language: Language::C,
        label: "C",
        template: "#include <stdio.h>\n\nint main() {\n    printf(\"Hello, World!\\n\");\n    return 0;\n}\n",
    },
    LanguageOption {
        language: Language::Html,
        label: "HTML",
        template: "<!DOCTYPE html>\n<html>\n<head>\n  <title>My Page</title>\n</head>\n<body>\n  <h1>Hello, World!</h1>\n</body>\n</html>\n",
    },
];

impl Language {
    /// Wire name sent to the service.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Html => "html",
        }
    }

    /// Registry entry for this language.
    pub fn option(self) -> &'static LanguageOption {
        LANGUAGES
            .iter()
            .find(|opt| opt.language == self)
            .unwrap_or(&LANGUAGES[0])
    }

    /// Starter template shown when the language is picked on a fresh editor.
    pub fn template(self) -> &'static str {
        self.option().template
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        self.option().label
    }

    /// Whether the source is markup to preview rather than code to execute.
    pub fn is_markup(self) -> bool {
        matches!(self, Self::Html)
    }

    /// File extension used for local notebook sources.
    pub fn extension(self) -> &'static str {
        match self {
            Self::JavaScript => "js",
            Self::Python => "py",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Html => "html",
        }
    }

    /// Resolve a language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" => Some(Self::JavaScript),
            "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            "cpp" | "cc" | "cxx" => Some(Self::Cpp),
            "c" => Some(Self::C),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        LANGUAGES
            .iter()
            .map(|opt| opt.language)
            .find(|lang| lang.as_str() == needle || lang.label().eq_ignore_ascii_case(&needle))
            .ok_or_else(|| Error::UnsupportedLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_language() {
        for lang in [
            Language::JavaScript,
            Language::Python,
            Language::Java,
            Language::Cpp,
            Language::C,
            Language::Html,
        ] {
            assert_eq!(lang.option().language, lang);
            assert!(!lang.template().is_empty());
        }
        assert_eq!(LANGUAGES.len(), 6);
    }

    #[test]
    fn test_parse_wire_name_and_label() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("C++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!(" HTML ".parse::<Language>().unwrap(), Language::Html);
        assert!(matches!(
            "cobol".parse::<Language>(),
            Err(Error::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Language::JavaScript).unwrap();
        assert_eq!(json, "\"javascript\"");
        let lang: Language = serde_json::from_str("\"cpp\"").unwrap();
        assert_eq!(lang, Language::Cpp);
    }

    #[test]
    fn test_extension_lookup() {
        assert_eq!(Language::from_extension("PY"), Some(Language::Python));
        assert_eq!(Language::from_extension("htm"), Some(Language::Html));
        assert_eq!(Language::from_extension("rs"), None);
        assert_eq!(Language::Cpp.extension(), "cpp");
    }

    #[test]
    fn test_only_html_is_markup() {
        assert!(Language::Html.is_markup());
        assert!(!Language::Python.is_markup());
    }
}
