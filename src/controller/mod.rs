use std::path::Path;
use anyhow::anyhow;
use log::{debug, info};
use crate::categorizer::Categorizer;
use crate::config::Config;
use crate::form::{Confirm, FormController, FormFields, Mode, SubmitOutcome};
use crate::parser::{self, AddCommand, Command};
use crate::repository::TransactionRepository;
use crate::store::KeyValueStorage;
use crate::util::{format_currency, format_date, today, MonthKey};
use crate::view::{self, MonthView};

mod export;

const HELP: &str = "\
Commands:
  add <income|expense> <amount> [on YYYY-MM-DD] [category 'text'] [desc 'text']
  set <type|amount|desc|category|date> <value>   edit one form field
  submit                                         save the form
  cancel                                         leave edit mode
  form                                           show the form
  edit <id>                                      load a transaction into the form
  delete <id>                                    delete a transaction
  clear                                          delete all transactions
  month <YYYY-MM>                                select the month to show
  show                                           show the selected month
  export <file>                                  write all transactions to CSV
  help
  quit";

/// What the main loop should do after a command.
#[derive(Debug, PartialEq)]
pub(crate) enum Response {
    Output(String),
    Quit,
}

/// The running program: the transaction collection, the form and the selected month.
pub(crate) struct App<S: KeyValueStorage> {
    repo: TransactionRepository<S>,
    form: FormController,
    month: MonthKey,
    currency: String,
    categorizer: Categorizer,
}

impl<S: KeyValueStorage> App<S> {
    pub(crate) fn new(repo: TransactionRepository<S>, config: &Config) -> App<S> {
        App {
            repo,
            form: FormController::new(),
            month: MonthKey::current(),
            currency: config.currency.clone(),
            categorizer: Categorizer::new(config),
        }
    }

    /// The selected month, rendered.
    pub(crate) fn screen(&self) -> String {
        let view = MonthView::build(&self.repo, self.month, &self.currency);
        view::render(&view, &self.currency)
    }

    pub(crate) fn parse_and_run_command(&mut self, line: &str, confirm: &mut dyn Confirm) -> anyhow::Result<Response> {
        let command = parser::parse(line)?;
        self.run_command(command, confirm)
    }

    fn run_command(&mut self, command: Command, confirm: &mut dyn Confirm) -> anyhow::Result<Response> {
        let output = match command {
            Command::Add(add) => {
                if let Mode::Edit(id) = self.form.mode() {
                    info!("Leaving edit of {id} for a new transaction");
                    self.form.cancel_edit();
                }
                self.form.fill(fields_of(add));
                self.submit()?
            }
            Command::Set(field, value) => {
                self.form.set_field(field, &value)?;
                view::render_form(&self.form)
            }
            Command::Submit => self.submit()?,
            Command::Cancel => {
                self.form.cancel_edit();
                view::render_form(&self.form)
            }
            Command::Form => view::render_form(&self.form),
            Command::Edit(prefix) => {
                let id = self.resolve(&prefix)?;
                self.form.start_edit(&id, &self.repo);
                view::render_form(&self.form)
            }
            Command::Delete(prefix) => {
                let id = self.resolve(&prefix)?;
                if self.form.delete_request(&id, &mut self.repo, confirm)? {
                    format!("Transaction deleted.\n\n{}", self.screen())
                } else {
                    "Nothing deleted.".to_string()
                }
            }
            Command::Clear => match self.form.clear_all_request(&mut self.repo, confirm)? {
                Some(removed) => format!("{removed} transactions deleted.\n\n{}", self.screen()),
                None => "Nothing deleted.".to_string(),
            },
            Command::Month(month) => {
                self.month = month;
                self.screen()
            }
            Command::Show => self.screen(),
            Command::Export(file_path) => {
                let count = export::execute_export(self.repo.all(), Path::new(&file_path))?;
                format!("{count} transactions exported to {file_path}")
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Response::Quit),
        };

        Ok(Response::Output(output))
    }

    fn submit(&mut self) -> anyhow::Result<String> {
        let output = match self.form.submit(&mut self.repo, &self.categorizer)? {
            SubmitOutcome::Added(t) => {
                let amount = format_currency(t.amount, &self.currency);
                format!("Added {} of {amount} on {}.\n\n{}", t.kind, format_date(t.date), self.screen())
            }
            SubmitOutcome::Updated(id) => format!("Transaction {id} updated.\n\n{}", self.screen()),
            SubmitOutcome::Rejected(e) => {
                debug!("Form rejected: {e}");
                view::render_form(&self.form)
            }
            SubmitOutcome::Missing(id) => {
                info!("Transaction {id} no longer exists, edit dropped");
                view::render_form(&self.form)
            }
        };
        Ok(output)
    }

    /// Full id for an id or unique id prefix.
    fn resolve(&self, prefix: &str) -> anyhow::Result<String> {
        self.repo.resolve(prefix)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("No single transaction matches id '{prefix}'."))
    }
}

/// Form input for a one-line `add`. The date defaults to today.
fn fields_of(add: AddCommand) -> FormFields {
    FormFields {
        kind: add.kind,
        amount: add.amount,
        description: add.description.unwrap_or_default(),
        category: add.category.unwrap_or_default(),
        date: add.date.unwrap_or_else(|| format_date(today())),
    }
}
