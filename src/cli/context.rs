use std::{env, io, path::PathBuf, sync::Arc};

use thiserror::Error;
use tracing::debug;

use crate::cli::commands::{all_definitions, CommandRegistry};
use crate::config::{Config, ConfigError, ConfigManager};
use crate::core::time::{Clock, SystemClock};
use crate::core::utils::PathResolver;
use crate::errors::ExpenseError;
use crate::storage::{ExpenseRepository, JsonExpenseStore, Session, UserId};

/// Selects the per-user store when set.
pub const USER_ENV: &str = "EXPENSE_CORE_USER";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command `{0}`. Use `help` to list commands.")]
    UnknownCommand(String),
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type CommandResult = Result<(), CommandError>;

/// Everything a command handler needs: preferences, the session store and a clock.
pub struct CliContext {
    pub base_dir: PathBuf,
    pub registry: CommandRegistry,
    pub config: Config,
    pub session: Session,
    pub local: Arc<dyn ExpenseRepository>,
    pub clock: Box<dyn Clock>,
}

impl CliContext {
    /// Resolves the data directory and signed-in user from the environment.
    pub fn from_env() -> Result<Self, CommandError> {
        let identity = env::var(USER_ENV)
            .ok()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(UserId::new);
        Self::open(PathResolver::base_dir(), identity, Box::new(SystemClock))
    }

    pub fn open(
        base_dir: PathBuf,
        identity: Option<UserId>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CommandError> {
        let config = ConfigManager::with_base_dir(base_dir.clone())?.load()?;
        let local: Arc<dyn ExpenseRepository> =
            Arc::new(JsonExpenseStore::local(Some(base_dir.clone()))?);
        let user_base = base_dir.clone();
        let session = Session::open(identity, Arc::clone(&local), move |user| {
            let store = JsonExpenseStore::for_user(Some(user_base), user.as_str())?;
            Ok(Arc::new(store) as Arc<dyn ExpenseRepository>)
        })?;
        debug!(base = %base_dir.display(), signed_in = session.is_signed_in(), "cli context ready");
        Ok(Self {
            base_dir,
            registry: CommandRegistry::new(all_definitions()),
            config,
            session,
            local,
            clock,
        })
    }

    pub fn repository(&self) -> &dyn ExpenseRepository {
        self.session.repository()
    }

    /// Validates and persists `config`, then makes it the active one.
    pub fn save_config(&mut self, config: Config) -> Result<(), CommandError> {
        ConfigManager::with_base_dir(self.base_dir.clone())?.save(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn money(&self, amount: f64) -> String {
        crate::core::format::format_currency(amount, &self.config.currency_prefix)
    }
}

/// Splits `--flag value` pairs from positional arguments.
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    flags: Vec<(&'a str, &'a str)>,
}

impl<'a> ParsedArgs<'a> {
    pub fn parse(args: &[&'a str], known: &[&str]) -> Result<Self, CommandError> {
        let mut positional = Vec::new();
        let mut flags = Vec::new();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            if let Some(name) = arg.strip_prefix("--") {
                if !known.contains(&name) {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown option `--{name}`"
                    )));
                }
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("option `--{name}` needs a value"))
                })?;
                flags.push((name, value));
            } else {
                positional.push(arg);
            }
        }
        Ok(Self { positional, flags })
    }

    pub fn flag(&self, name: &str) -> Option<&'a str> {
        self.flags
            .iter()
            .rev()
            .find(|(flag, _)| *flag == name)
            .map(|(_, value)| *value)
    }
}
