// Startup module - displays banner and module loading status
//
// Printed to stderr: stdout carries the JSON event stream and must stay
// machine-readable.

use crate::config::{Config, Features, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Module loading result for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: &'static str,
}

/// Print the startup banner and module loading status
pub fn print_startup(config: &Config, source: &str) {
    use colors::*;

    eprintln!();
    eprintln!("  {BOLD}{CYAN}ZaraSprite{RESET} {DIM}v{VERSION}{RESET}");
    eprintln!("  {DIM}Private-message listener for game chat{RESET}");
    eprintln!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            eprintln!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            eprintln!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    eprintln!();

    eprintln!("  {DIM}Loading modules...{RESET}");
    for module in &module_status(config) {
        print_module_status(module);
    }
    eprintln!();

    eprintln!(
        "  {MAGENTA}▸{RESET} Listening as {BOLD}{}{RESET} on {}",
        config.bot_name, source
    );
    eprintln!();
}

/// Status of all modules based on config
pub fn module_status(config: &Config) -> Vec<ModuleStatus> {
    let Features {
        storage,
        echo,
        record_ignored,
    } = &config.features;

    let mut modules = vec![
        ModuleStatus {
            name: "parser",
            enabled: true, // Core, always on
            description: "PM extraction",
        },
        ModuleStatus {
            name: "triggers",
            enabled: config.triggers.enabled && !config.triggers.patterns.is_empty(),
            description: "Mention rules",
        },
        ModuleStatus {
            name: "storage",
            enabled: *storage,
            description: "JSONL logging",
        },
        ModuleStatus {
            name: "echo",
            enabled: *echo,
            description: "Events to stdout",
        },
        ModuleStatus {
            name: "relay",
            enabled: config.relay.enabled,
            description: "Command relay",
        },
    ];

    // Opt-in extras: only show when enabled
    if *record_ignored {
        modules.push(ModuleStatus {
            name: "ignored",
            enabled: true,
            description: "Record non-PM lines",
        });
    }

    modules
}

/// Print a single module's status
fn print_module_status(module: &ModuleStatus) {
    use colors::*;

    let (icon, style) = if module.enabled {
        (format!("{GREEN}✓{RESET}"), "")
    } else {
        (format!("{DIM}○{RESET}"), DIM)
    };

    eprintln!(
        "    {icon} {style}{:<12}{RESET} {DIM}{}{RESET}",
        module.name, module.description
    );
}

/// Write the module summary to the log (ends up in the JSON log file when enabled)
pub fn log_startup(config: &Config, session_id: &str) {
    tracing::info!("ZaraSprite v{} starting, session {}", VERSION, session_id);

    for module in &module_status(config) {
        let icon = if module.enabled { "✓" } else { "○" };
        tracing::info!("  {} {} - {}", icon, module.name, module.description);
    }

    if config.relay.enabled && config.relay.allowed_senders.is_empty() {
        tracing::warn!("Relay enabled but no allowed_senders configured; every command will be refused");
    }

    tracing::info!("Ready. Waiting for chat...");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(modules: &[ModuleStatus]) -> Vec<&'static str> {
        modules.iter().map(|m| m.name).collect()
    }

    #[test]
    fn test_default_modules() {
        let modules = module_status(&Config::default());
        assert_eq!(
            names(&modules),
            vec!["parser", "triggers", "storage", "echo", "relay"]
        );
        assert!(!modules.iter().find(|m| m.name == "relay").unwrap().enabled);
    }

    #[test]
    fn test_opt_in_modules_are_listed_when_enabled() {
        let mut config = Config::default();
        config.features.record_ignored = true;
        config.triggers.patterns.clear();

        let modules = module_status(&config);
        assert_eq!(modules.last().unwrap().name, "ignored");
        assert!(!modules.iter().find(|m| m.name == "triggers").unwrap().enabled);
    }
}
