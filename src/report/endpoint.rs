//! Defines the endpoint for emailing a spreadsheet report.

use std::str::FromStr;

use axum::{Json, extract::State, response::IntoResponse};
use email_address::EmailAddress;
use serde::Deserialize;
use serde_json::json;
use time::Date;

use crate::{
    AppState, Error,
    auth::Claims,
    report::{
        core::generate_report,
        mailer::{ReportAttachment, ReportEmail},
        sheet::encode_sheet,
    },
};

/// The request body for emailing a report.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    /// The address to send the report to.
    pub email: String,
    /// The first day of the reporting period.
    pub start_date: Date,
    /// The last day of the reporting period, inclusive.
    pub end_date: Date,
}

/// A route handler that builds a report over the requested date range and
/// emails it to the requested address as one CSV sheet per account.
///
/// # Errors
///
/// Returns [Error::InvalidEmail] or [Error::InvalidDateRange] for a bad
/// request, [Error::NotFound] if the user has no accounts, or
/// [Error::Delivery] if the report was built but could not be emailed.
pub async fn send_report_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<ReportRequest>,
) -> Result<impl IntoResponse, Error> {
    if EmailAddress::from_str(&request.email).is_err() {
        return Err(Error::InvalidEmail(request.email));
    }

    // Hold the database lock only while generating, not while sending.
    let reports = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        generate_report(
            claims.user_id(),
            request.start_date,
            request.end_date,
            &connection,
        )?
    };

    let attachments = reports
        .iter()
        .map(|report| {
            Ok(ReportAttachment {
                filename: format!("{}.csv", report.account_name),
                content: encode_sheet(report)?,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    state.mailer.send(ReportEmail {
        to: request.email,
        subject: format!(
            "Your transaction report for {} to {}",
            request.start_date, request.end_date
        ),
        html_body: format!(
            "<p>Attached is one sheet per account covering {} to {}.</p>",
            request.start_date, request.end_date
        ),
        attachments,
    })?;

    Ok(Json(json!({ "message": "report sent" })))
}
