/// Which discovered extensions the host loads at startup
pub struct ExtensionConfig {
    pub load_all_extensions: bool,
    pub enabled_extensions: Vec<String>,
}

impl ExtensionConfig {
    /// Load every extension discovered at link time
    pub fn all() -> Self {
        ExtensionConfig {
            load_all_extensions: true,
            enabled_extensions: Vec::new(),
        }
    }

    /// Load only the named extensions
    pub fn only(names: &[&str]) -> Self {
        ExtensionConfig {
            load_all_extensions: false,
            enabled_extensions: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Filter consumed by the extension loader: None means load everything
    pub fn enabled_filter(&self) -> Option<&[String]> {
        if self.load_all_extensions {
            None
        } else {
            Some(&self.enabled_extensions)
        }
    }
}
