//! The report feature: summarising a user's transactions over a date range,
//! encoding the summary as spreadsheet attachments and emailing them to a
//! recipient.

pub mod core;
mod endpoint;
mod mailer;
mod sheet;

pub use endpoint::send_report_endpoint;
pub use mailer::{Mailer, ReportAttachment, ReportEmail, SmtpMailer};
