use thiserror::Error;

/// Rejected form input. Recovered locally by showing the message next to the form.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub(crate) enum ValidationError {
    #[error("Please enter a valid amount and date. '{0}' is not a positive amount.")]
    InvalidAmount(String),

    #[error("Please enter a valid amount and date. '{0}' is not a YYYY-MM-DD date.")]
    InvalidDate(String),

    #[error("Transaction type must be 'income' or 'expense'.")]
    UnknownType,
}

/// Persisted data that can't be used. Never shown to the user: the collection starts out empty instead.
#[derive(Debug, Error)]
pub(crate) enum StorageReadError {
    #[error("nothing stored under key '{0}'")]
    Missing(String),

    #[error("stored transactions are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failure to write the transaction collection to storage.
#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("unable to write storage key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to serialize transactions: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Terminal input that does not parse into a command.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognised command '{input}'. Type 'help' for the list of commands.")]
pub(crate) struct CommandError {
    pub(crate) input: String,
}

impl CommandError {
    pub(crate) fn new(input: &str) -> CommandError {
        CommandError { input: input.trim().to_string() }
    }
}
