use std::collections::HashMap;
use std::path::Path;
use once_cell::sync::Lazy;

/// Extensions recognised out of the box, with the label printed for each.
const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    (".cpp", "This is a c++ file!"),
    (".hpp", "This is a c++ file!"),
    (".c", "This is a c file!"),
    (".h", "This is a c file!"),
    (".py", "This is a python file!"),
    (".java", "This is a java file!"),
    (".m", "This is a matlab file!"),
];

static BUILTIN: Lazy<ExtensionTable> = Lazy::new(|| ExtensionTable::from_pairs(BUILTIN_ENTRIES));

/// Immutable lookup from a lowercase extension (leading dot included) to a label.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    labels: HashMap<String, &'static str>,
}

impl ExtensionTable {
    /// The process-wide table of recognised source extensions.
    pub fn builtin() -> &'static ExtensionTable {
        &BUILTIN
    }

    pub fn from_pairs(pairs: &[(&str, &'static str)]) -> Self {
        let labels = pairs
            .iter()
            .map(|(ext, label)| (ext.to_lowercase(), *label))
            .collect();
        Self { labels }
    }

    /// Look up an extension such as `.PY` or `.cpp`. Case is ignored.
    pub fn label(&self, extension: &str) -> Option<&'static str> {
        self.labels.get(&extension.to_lowercase()).copied()
    }

    /// Label for the file at `path`, judged on its name alone.
    pub fn label_for(&self, path: &Path) -> Option<&'static str> {
        let extension = dotted_extension(path)?;
        self.label(&extension)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Known extensions in lexical order.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.labels.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }
}

/// Everything from the last `.` of the file name onwards, e.g. `.tar.gz` -> `.gz`.
///
/// Dotfiles such as `.py` have no extension, matching the usual split rules.
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_labels() {
        let table = ExtensionTable::builtin();

        let cases = vec![
            (".cpp", "This is a c++ file!"),
            (".hpp", "This is a c++ file!"),
            (".c", "This is a c file!"),
            (".h", "This is a c file!"),
            (".py", "This is a python file!"),
            (".java", "This is a java file!"),
            (".m", "This is a matlab file!"),
        ];

        assert_eq!(table.len(), cases.len());
        for (ext, label) in cases {
            assert_eq!(table.label(ext), Some(label), "extension {}", ext);
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        let table = ExtensionTable::builtin();
        assert_eq!(table.label(".PY"), Some("This is a python file!"));
        assert_eq!(table.label_for(Path::new("Main.Java")), Some("This is a java file!"));
    }

    #[test]
    fn test_unknown_and_missing_extensions() {
        let table = ExtensionTable::builtin();

        for name in ["notes.txt", "Makefile", ".py", "trailing.", "archive.py.bak"] {
            assert_eq!(table.label_for(Path::new(name)), None, "{} should not match", name);
        }
    }

    #[test]
    fn test_last_dot_wins() {
        assert_eq!(dotted_extension(Path::new("dir.d/lib.tar.c")), Some(".c".to_string()));
        assert_eq!(dotted_extension(Path::new("README")), None);
    }

    #[test]
    fn test_custom_table_keys_are_lowercased() {
        let table = ExtensionTable::from_pairs(&[(".RS", "rust")]);
        assert_eq!(table.label(".rs"), Some("rust"));
        assert_eq!(table.extensions(), vec![".rs"]);
    }
}
