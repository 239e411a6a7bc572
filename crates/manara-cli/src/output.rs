//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;
use serde::Serialize;

use manara_core::{SiteContent, SiteSettings};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print any value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print the content document
    pub fn print_content(&self, content: &SiteContent) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                for line in content_summary(content) {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => self.print_json(content)?,
            OutputFormat::Quiet => println!("{}", content.hero.title),
        }
        Ok(())
    }

    /// Print the settings document
    pub fn print_settings(&self, settings: &SiteSettings) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                for line in settings_summary(settings) {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => self.print_json(settings)?,
            OutputFormat::Quiet => println!("{}", settings.layout.direction),
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

fn content_summary(content: &SiteContent) -> Vec<String> {
    let mut lines = vec![
        format!("Site:     {}", content.site.title),
        format!("Hero:     {}", content.hero.title),
        format!("          {}", truncate(&content.hero.subtitle, 60)),
        format!("About:    {}", content.about.title),
        format!(
            "          {} achievement(s), {} stat(s)",
            content.about.achievements.len(),
            content.about.stats.len()
        ),
        String::new(),
        format!("── Services ({}) ──", content.services.len()),
    ];
    for service in &content.services {
        lines.push(format!(
            "{} {} [{}] ({} feature(s))",
            service.icon,
            service.title,
            service.id,
            service.features.len()
        ));
    }

    lines.push(String::new());
    lines.push(format!("── Wisdom quotes ({}) ──", content.wisdom_quotes.len()));
    for quote in &content.wisdom_quotes {
        lines.push(format!("[{}] {}", quote.id, quote.source));
    }

    lines.push(String::new());
    lines.push("── Contact ──".to_string());
    lines.push(format!("Phone:    {}", content.contact.phone));
    lines.push(format!("Email:    {}", content.contact.email));
    lines.push(format!("Address:  {}", content.contact.address));

    let nav: Vec<&str> = content.navigation.iter().map(|n| n.name.as_str()).collect();
    lines.push(String::new());
    lines.push(format!("Navigation: {}", nav.join(" | ")));
    lines
}

fn settings_summary(settings: &SiteSettings) -> Vec<String> {
    let features = &settings.features;
    let on_off = |flag: bool| if flag { "on" } else { "off" };

    vec![
        "Theme:".to_string(),
        format!(
            "  Colors:  primary {}, secondary {}, accent {}",
            settings.theme.colors.primary,
            settings.theme.colors.secondary,
            settings.theme.colors.accent
        ),
        format!(
            "  Fonts:   {} / {} / {}",
            settings.theme.fonts.arabic, settings.theme.fonts.decorative, settings.theme.fonts.body
        ),
        "Layout:".to_string(),
        format!("  Direction:  {}", settings.layout.direction),
        format!(
            "  Animations: {} ({})",
            on_off(settings.layout.enable_animations),
            settings.layout.animation_speed
        ),
        "SEO:".to_string(),
        format!("  Title:    {}", settings.seo.meta_title),
        format!("  Keywords: {}", settings.seo.keywords.join(", ")),
        "Features:".to_string(),
        format!(
            "  admin mode {}, live edit {}, dark mode {}, analytics {}",
            on_off(features.admin_mode),
            on_off(features.live_edit),
            on_off(features.dark_mode),
            on_off(features.analytics)
        ),
    ]
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
