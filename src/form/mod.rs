use log::info;
use crate::categorizer::Categorizer;
use crate::common::{StorageError, ValidationError};
use crate::repository::TransactionRepository;
use crate::store::KeyValueStorage;
use crate::transaction::{Draft, Transaction, TransactionType};
use crate::util::{format_date, parse_date, today};

/// Asks the user to confirm a destructive action.
pub(crate) trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Type,
    Amount,
    Description,
    Category,
    Date,
}

/// Form input exactly as entered. Nothing here is validated until the form is submitted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FormFields {
    pub(crate) kind: TransactionType,
    pub(crate) amount: String,
    pub(crate) description: String,
    pub(crate) category: String,
    pub(crate) date: String,
}

impl Default for FormFields {
    fn default() -> Self {
        FormFields {
            kind: TransactionType::Expense,
            amount: String::new(),
            description: String::new(),
            category: String::new(),
            date: format_date(today()),
        }
    }
}

impl From<&Transaction> for FormFields {
    fn from(t: &Transaction) -> Self {
        FormFields {
            kind: t.kind,
            amount: t.amount.to_string(),
            description: t.description.clone(),
            category: t.category.clone(),
            date: format_date(t.date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mode {
    Create,
    /// Editing the transaction with this id
    Edit(String),
}

#[derive(Debug, PartialEq)]
pub(crate) enum SubmitOutcome {
    Added(Transaction),
    Updated(String),
    /// Input failed validation. The repository was not touched.
    Rejected(ValidationError),
    /// The transaction being edited no longer exists.
    Missing(String),
}

/// Turn raw form input into a draft.
pub(crate) fn validate(fields: &FormFields) -> Result<Draft, ValidationError> {
    let amount = fields.amount.trim().parse::<f64>()
        .map_err(|_| ValidationError::InvalidAmount(fields.amount.trim().to_string()))?;
    let date = parse_date(&fields.date)
        .ok_or_else(|| ValidationError::InvalidDate(fields.date.trim().to_string()))?;
    Draft::new(fields.kind, amount, &fields.description, &fields.category, date)
}

/// The add/edit transaction form.
pub(crate) struct FormController {
    mode: Mode,
    fields: FormFields,
    /// Message shown under the form after a rejected submission
    error: Option<String>,
}

impl FormController {
    pub(crate) fn new() -> FormController {
        FormController { mode: Mode::Create, fields: FormFields::default(), error: None }
    }

    pub(crate) fn mode(&self) -> &Mode {
        &self.mode
    }

    pub(crate) fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn title(&self) -> &'static str {
        match self.mode {
            Mode::Create => "Add Transaction",
            Mode::Edit(_) => "Edit Transaction",
        }
    }

    pub(crate) fn submit_label(&self) -> &'static str {
        match self.mode {
            Mode::Create => "Add",
            Mode::Edit(_) => "Update",
        }
    }

    pub(crate) fn set_field(&mut self, field: Field, value: &str) -> Result<(), ValidationError> {
        match field {
            Field::Type => self.fields.kind = value.parse()?,
            Field::Amount => self.fields.amount = value.to_string(),
            Field::Description => self.fields.description = value.to_string(),
            Field::Category => self.fields.category = value.to_string(),
            Field::Date => self.fields.date = value.to_string(),
        }
        Ok(())
    }

    /// Replace all fields at once, e.g. from a one-line `add` command.
    pub(crate) fn fill(&mut self, fields: FormFields) {
        self.fields = fields;
    }

    /// Validate and save the form. Creates a transaction in create mode, replaces the edited one
    /// in edit mode. A validation failure leaves everything but the error message alone.
    pub(crate) fn submit<S: KeyValueStorage>(&mut self, repo: &mut TransactionRepository<S>, categorizer: &Categorizer) -> Result<SubmitOutcome, StorageError> {
        self.error = None;

        let mut draft = match validate(&self.fields) {
            Ok(draft) => draft,
            Err(e) => {
                self.error = Some(e.to_string());
                return Ok(SubmitOutcome::Rejected(e));
            }
        };

        if draft.category().is_empty() {
            if let Some(category) = categorizer.categorize(draft.description()) {
                info!("Categorised '{}' as '{}'", draft.description(), category);
                draft = draft.with_category(category);
            }
        }

        let outcome = match &self.mode {
            Mode::Create => SubmitOutcome::Added(repo.add(draft)?),
            Mode::Edit(id) => {
                if repo.update(id, draft)? {
                    SubmitOutcome::Updated(id.clone())
                } else {
                    self.error = Some("This transaction no longer exists.".to_string());
                    SubmitOutcome::Missing(id.clone())
                }
            }
        };

        self.reset();
        Ok(outcome)
    }

    /// Load transaction `id` into the form for editing. Returns `false` if there is no such transaction.
    pub(crate) fn start_edit<S: KeyValueStorage>(&mut self, id: &str, repo: &TransactionRepository<S>) -> bool {
        match repo.get(id) {
            Some(t) => {
                self.fields = FormFields::from(t);
                self.mode = Mode::Edit(t.id.clone());
                self.error = None;
                true
            }
            None => false,
        }
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.error = None;
        self.reset();
    }

    /// Delete transaction `id` once the user confirms. Returns whether anything was deleted.
    pub(crate) fn delete_request<S: KeyValueStorage>(&mut self, id: &str, repo: &mut TransactionRepository<S>, confirm: &mut dyn Confirm) -> Result<bool, StorageError> {
        if !confirm.confirm("Delete this transaction?") {
            return Ok(false);
        }

        let deleted = repo.delete(id)?;
        if deleted && self.mode == Mode::Edit(id.to_string()) {
            self.cancel_edit();
        }
        Ok(deleted)
    }

    /// Delete every transaction once the user confirms. Returns how many were deleted, `None` if
    /// the user declined.
    pub(crate) fn clear_all_request<S: KeyValueStorage>(&mut self, repo: &mut TransactionRepository<S>, confirm: &mut dyn Confirm) -> Result<Option<usize>, StorageError> {
        if !confirm.confirm("This will delete all saved transactions. Continue?") {
            return Ok(None);
        }

        let removed = repo.clear()?;
        if self.mode != Mode::Create {
            self.cancel_edit();
        }
        Ok(Some(removed))
    }

    fn reset(&mut self) {
        self.mode = Mode::Create;
        self.fields = FormFields::default();
    }
}
