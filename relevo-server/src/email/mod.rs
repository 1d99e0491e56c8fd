//! Notification emails via SES
//!
//! All sends are best-effort: callers log failures and never abort
//! the write that triggered the notification.

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Welcome email after an employee account is created.
pub async fn send_welcome(
    ses: &SesClient,
    from: &str,
    to: &str,
    first_name: &str,
    company_name: &str,
) -> Result<(), BoxError> {
    let subject = Content::builder()
        .data(format!("Bienvenido a {company_name} / Welcome to {company_name}"))
        .build()?;

    let body_text = format!(
        "Hola {first_name},\n\
         Tu cuenta de empleado en {company_name} ya está activa.\n\
         Puedes iniciar sesión con tu correo electrónico.\n\n\
         Hi {first_name},\n\
         Your employee account at {company_name} is now active.\n\
         You can log in with your email address."
    );

    send(ses, from, to, subject, body_text).await?;
    tracing::info!(to = to, "Welcome email sent");
    Ok(())
}

/// Notification that a payroll document was uploaded.
pub async fn send_payroll_uploaded(
    ses: &SesClient,
    from: &str,
    to: &str,
    period_year: i32,
    period_month: i32,
) -> Result<(), BoxError> {
    let period = format!("{period_year:04}-{period_month:02}");
    let subject = Content::builder()
        .data(format!("Nómina disponible {period} / Payslip available {period}"))
        .build()?;

    let body_text = format!(
        "Tu nómina del periodo {period} ya está disponible en el portal.\n\n\
         Your payslip for period {period} is now available in the portal."
    );

    send(ses, from, to, subject, body_text).await?;
    tracing::info!(to = to, period = %period, "Payroll notification sent");
    Ok(())
}

async fn send(
    ses: &SesClient,
    from: &str,
    to: &str,
    subject: Content,
    body_text: String,
) -> Result<(), BoxError> {
    let body = Body::builder()
        .text(Content::builder().data(body_text).build()?)
        .build();

    let message = Message::builder().subject(subject).body(body).build();

    ses.send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await?;

    Ok(())
}
