use std::{io::Write, process::ExitCode};

use anyhow::{Context, Result};
use clap::Args;
use folio_core::{ContactForm, FormError, HttpMessageSender, MessageSender, Notification};
use shared::{
    domain::{ContactFields, FieldName},
    validation::validate_all,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

use crate::settings::FolioSettings;

const EXIT_SUBMISSION_FAILED: u8 = 1;
const EXIT_INVALID: u8 = 2;

#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub message: Option<String>,
}

impl FieldArgs {
    fn get(&self, field: FieldName) -> Option<&str> {
        match field {
            FieldName::Name => self.name.as_deref(),
            FieldName::Email => self.email.as_deref(),
            FieldName::Subject => self.subject.as_deref(),
            FieldName::Message => self.message.as_deref(),
        }
    }

    /// Missing flags become empty values.
    pub fn to_fields(&self) -> ContactFields {
        let mut fields = ContactFields::default();
        for field in FieldName::ALL {
            fields.set(field, self.get(field).unwrap_or_default());
        }
        fields
    }
}

#[derive(Args, Debug)]
pub struct ContactArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
    /// Overrides `contact.endpoint` from the settings.
    #[arg(long)]
    pub endpoint: Option<String>,
}

pub async fn run(settings: &FolioSettings, args: ContactArgs) -> Result<ExitCode> {
    let endpoint = args
        .endpoint
        .as_deref()
        .unwrap_or(&settings.contact.endpoint);
    let sender = HttpMessageSender::new(endpoint, settings.contact.timeout())
        .with_context(|| format!("invalid contact endpoint '{endpoint}'"))?;

    let mut form = ContactForm::new();
    let mut input = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    if !fill_form(&mut form, &args.fields, &mut input, &mut stdout).await? {
        writeln!(stdout, "\ninput closed, nothing sent")?;
        return Ok(ExitCode::from(EXIT_INVALID));
    }

    let code = submit_form(&mut form, &sender, &mut stdout).await?;
    Ok(ExitCode::from(code))
}

/// Fills every field, taking flag values as given and prompting for the
/// rest. A prompted field is asked again while its error is displayed.
/// Returns `false` if the input ends before the form is complete.
pub async fn fill_form<R, W>(
    form: &mut ContactForm,
    flags: &FieldArgs,
    input: &mut Lines<R>,
    out: &mut W,
) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    for field in FieldName::ALL {
        if let Some(value) = flags.get(field) {
            form.on_field_change(field, value);
            form.on_field_blur(field);
            continue;
        }

        loop {
            write!(out, "{}: ", field.label())?;
            out.flush()?;
            let Some(line) = input.next_line().await? else {
                return Ok(false);
            };
            form.on_field_change(field, line);
            form.on_field_blur(field);

            if field == FieldName::Message {
                let (used, limit) = form.message_length();
                writeln!(out, "  ({used}/{limit})")?;
            }
            match form.displayed_error(field) {
                Some(error) => writeln!(out, "  {error}")?,
                None => break,
            }
        }
    }
    Ok(true)
}

/// Submits the form and prints the resulting toast. Returns the exit code.
pub async fn submit_form<S, W>(form: &mut ContactForm, sender: &S, out: &mut W) -> Result<u8>
where
    S: MessageSender + ?Sized,
    W: Write,
{
    let result = form.submit(sender).await;
    if let Err(FormError::Validation(_)) = &result {
        for (field, error) in form.displayed_errors() {
            writeln!(out, "{}: {error}", field.as_str())?;
        }
    }
    if let Some(toast) = Notification::for_result(&result) {
        writeln!(out, "{}", toast.text)?;
    }

    Ok(match result {
        Ok(receipt) => {
            writeln!(out, "message id {}", receipt.message_id)?;
            0
        }
        Err(FormError::Validation(_)) => EXIT_INVALID,
        Err(error) => {
            warn!(%error, "contact: message not delivered");
            EXIT_SUBMISSION_FAILED
        }
    })
}

/// Prints every field's error as JSON. Exits non-zero when any field fails.
pub fn validate(args: &FieldArgs) -> Result<ExitCode> {
    let errors = validate_all(&args.to_fields());
    println!("{}", serde_json::to_string_pretty(&errors)?);

    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    })
}

#[cfg(test)]
#[path = "tests/contact_tests.rs"]
mod tests;
