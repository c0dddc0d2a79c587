use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "fieldfx", version, about = "Procedural visual effects rendered in the terminal")]
pub struct Config {
    /// Effect id to start with (see --list-effects).
    #[arg(long)]
    pub effect: Option<String>,

    #[arg(long, value_enum, default_value_t = BackendKind::Threaded)]
    pub backend: BackendKind,

    /// Render threads for the threaded backend. Defaults to available cores.
    #[arg(long)]
    pub workers: Option<usize>,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Parameter override as name=value. Repeatable; applied after the
    /// effect is selected.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub overrides: Vec<(String, f64)>,

    #[arg(long, default_value_t = false)]
    pub list_effects: bool,

    /// Print the engine snapshot as JSON and exit.
    #[arg(long, default_value_t = false)]
    pub print_snapshot: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub hud: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

impl Config {
    pub fn workers(&self) -> usize {
        self.workers
            .unwrap_or_else(crate::capability::default_workers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    #[value(alias = "sync")]
    Cpu,
    #[value(alias = "threads", alias = "parallel")]
    Threaded,
}

impl BackendKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Threaded => "threaded",
        }
    }
}

/// Parses `name=value` with a finite numeric value.
pub fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let Some((name, value)) = s.split_once('=') else {
        return Err(format!("expected name=value, got `{s}`"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err("parameter name is empty".to_string());
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", value.trim()))?;
    if !value.is_finite() {
        return Err(format!("`{name}` must be finite"));
    }
    Ok((name.to_string(), value))
}
