//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::process::Command;

/// Outcome of one diagnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Pass,
    Warn,
    Fail,
}

impl Status {
    fn icon(self) -> console::StyledObject<&'static str> {
        match self {
            Status::Pass => style("✓").green(),
            Status::Warn => style("!").yellow(),
            Status::Fail => style("✗").red(),
        }
    }
}

/// A named diagnostic with an optional remedy.
#[derive(Debug)]
struct Check {
    name: String,
    status: Status,
    message: String,
    fix: Option<String>,
}

impl Check {
    fn new(name: &str, status: Status, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            fix: None,
        }
    }

    fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    fn print(&self) {
        println!("  {} {} - {}", self.status.icon(), style(&self.name).bold(), self.message);
        if let Some(fix) = &self.fix {
            println!("    {} {}", style("→").dim(), style(fix).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Chapterize Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    let ytdlp = check_tool(&settings.youtube.ytdlp_path);
    ytdlp.print();
    checks.push(ytdlp);
    println!();

    println!("{}", style("API Configuration").bold());
    dotenvy::dotenv().ok();
    let key = check_api_key(
        &settings.model.api_key_env,
        std::env::var(&settings.model.api_key_env).ok().as_deref(),
    );
    key.print();
    checks.push(key);
    Output::kv("Model", &settings.model.name);
    println!();

    println!("{}", style("Configuration").bold());
    let config = check_config_file();
    config.print();
    checks.push(config);
    println!();

    let count = |status: Status| checks.iter().filter(|c| c.status == status).count();
    let errors = count(Status::Fail);
    let warnings = count(Status::Warn);

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Chapterize.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Chapterize is ready to use.");
    }

    Ok(())
}

/// Check that yt-dlp runs.
fn check_tool(path: &str) -> Check {
    match Command::new(path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let version = stdout.lines().next().unwrap_or("installed").trim();
            Check::new("yt-dlp", Status::Pass, version)
        }
        Ok(_) => Check::new("yt-dlp", Status::Fail, "installed but not working").fix(install_hint_ytdlp()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Check::new("yt-dlp", Status::Fail, format!("{} not found", path)).fix(install_hint_ytdlp())
        }
        Err(e) => Check::new("yt-dlp", Status::Fail, format!("error: {}", e)).fix(install_hint_ytdlp()),
    }
}

/// Check that the model API key is configured.
fn check_api_key(name: &str, value: Option<&str>) -> Check {
    let fix = format!("Set with: export {}='...' (or add it to .env)", name);
    match value.map(str::trim) {
        Some(key) if key.chars().count() > 8 => {
            Check::new(name, Status::Pass, format!("configured ({})", mask_key(key)))
        }
        Some("") => Check::new(name, Status::Fail, "empty").fix(fix),
        Some(_) => Check::new(name, Status::Warn, "set but looks too short").fix(fix),
        None => Check::new(name, Status::Fail, "not set").fix(fix),
    }
}

/// First and last four characters of a secret.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let head: String = chars.iter().take(4).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Check if config file exists.
fn check_config_file() -> Check {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Check::new("Config file", Status::Pass, config_path.display().to_string())
    } else {
        Check::new("Config file", Status::Warn, "using defaults").fix("Create with: chapterize config init")
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}
