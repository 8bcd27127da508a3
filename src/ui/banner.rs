// Thu Oct 15 2026 - Alex

use colored::*;

pub struct Banner {
    title: String,
    subtitle: Option<String>,
    version: Option<String>,
    width: usize,
}

impl Banner {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: None,
            version: None,
            width: 50,
        }
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        let rule = "=".repeat(self.width);

        lines.push(rule.cyan().to_string());
        let heading = match &self.version {
            Some(v) => format!("{} v{}", self.title, v),
            None => self.title.clone(),
        };
        lines.push(heading.cyan().bold().to_string());
        if let Some(subtitle) = &self.subtitle {
            lines.push(subtitle.dimmed().to_string());
        }
        lines.push(rule.cyan().to_string());

        lines.join("\n")
    }

    pub fn print(&self) {
        println!("{}", self.render());
    }
}

impl Default for Banner {
    fn default() -> Self {
        Self::new("Image Dumper")
            .with_subtitle("loaded image locator, dumper and offset resolver")
            .with_version(env!("CARGO_PKG_VERSION"))
    }
}
