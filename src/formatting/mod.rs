use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto, // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    /// Environment defaults, overridden by an explicit mode from the command line.
    pub fn from_env(explicit: Option<ColorMode>) -> Self {
        let mut config = Self::default();

        // Check NO_COLOR environment variable (per no-color.org standard)
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        if let Some(mode) = explicit {
            config.color = mode;
        }
        config
    }

    /// Make every `colored` string honor this configuration.
    pub fn apply(&self) {
        colored::control::set_override(self.color.should_use_color());
    }
}

fn detect_color_support() -> bool {
    if env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
        return false;
    }
    std::io::stdout().is_terminal()
}

const PANEL_MAX_WIDTH: usize = 96;

/// Render `body` inside a titled box, wrapping long lines at word boundaries.
pub fn render_panel(title: &str, body: &str) -> String {
    let lines: Vec<String> = body
        .lines()
        .flat_map(|line| wrap_line(line, PANEL_MAX_WIDTH))
        .collect();
    let inner = lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count() + 2))
        .max()
        .unwrap_or(0);

    let title_fill = inner.saturating_sub(title.chars().count() + 2);
    let mut out = String::new();
    out.push_str(&format!(
        "{}{}{}\n",
        "╭─ ".blue().bold(),
        title.bold(),
        format!(" {}─╮", "─".repeat(title_fill)).blue().bold()
    ));
    for line in &lines {
        let pad = inner - line.chars().count();
        out.push_str(&format!(
            "{} {}{} {}\n",
            "│".blue().bold(),
            line,
            " ".repeat(pad),
            "│".blue().bold()
        ));
    }
    out.push_str(&format!("{}", format!("╰{}╯", "─".repeat(inner + 2)).blue().bold()));
    out
}

fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if needed > width && !current.is_empty() {
            wrapped.push(std::mem::take(&mut current));
        }
        if word.chars().count() > width {
            // Hard-split words longer than the panel
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(width) {
                if !current.is_empty() {
                    wrapped.push(std::mem::take(&mut current));
                }
                current = chunk.iter().collect();
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    wrapped.push(current);
    wrapped
}
