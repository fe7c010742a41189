use crate::domain::agreement::AgreementId;
use crate::error::{PayLaterError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Eligible,
    Create,
    Retry,
    SimulateFailure,
}

/// One raw row of a command script. Which columns are required depends on `command`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub command: CommandKind,
    pub user: Option<String>,
    pub cart: Option<String>,
    pub agreement: Option<String>,
    /// Zero-based position in the schedule.
    pub installment: Option<usize>,
    pub enabled: Option<bool>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    Eligible { user: String, cart: String },
    Create { user: String, cart: String },
    Retry { agreement: AgreementId, installment: usize },
    SimulateFailure { enabled: bool },
}

fn required<T>(value: Option<T>, column: &str, kind: CommandKind) -> Result<T> {
    value.ok_or_else(|| {
        PayLaterError::CommandError(format!("{kind:?} command requires the '{column}' column"))
    })
}

impl TryFrom<CommandRecord> for Command {
    type Error = PayLaterError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        let kind = record.command;
        match kind {
            CommandKind::Eligible => Ok(Command::Eligible {
                user: required(record.user, "user", kind)?,
                cart: required(record.cart, "cart", kind)?,
            }),
            CommandKind::Create => Ok(Command::Create {
                user: required(record.user, "user", kind)?,
                cart: required(record.cart, "cart", kind)?,
            }),
            CommandKind::Retry => Ok(Command::Retry {
                agreement: AgreementId::new(required(record.agreement, "agreement", kind)?),
                installment: required(record.installment, "installment", kind)?,
            }),
            CommandKind::SimulateFailure => Ok(Command::SimulateFailure {
                enabled: required(record.enabled, "enabled", kind)?,
            }),
        }
    }
}

/// Reads a command script such as:
///
/// ```text
/// command, user, cart, agreement, installment, enabled
/// create, U001, C001, , ,
/// retry, , , PL-000001-U001, 1,
/// simulate_failure, , , , , true
/// ```
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader.into_deserialize().map(|result| {
            let record: CommandRecord = result.map_err(PayLaterError::from)?;
            Command::try_from(record)
        })
    }
}
