// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Cotiza.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result};
use askama::Template;
use cotiza_types::QuoteRecord;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::EmailSettings;
use crate::document::{QuoteDocument, sales_summary};

#[derive(Debug)]
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    sales_recipients: Vec<String>,
    send_customer_copy: bool,
}

impl EmailNotifier {
    pub fn new(config: &EmailSettings) -> Result<Self> {
        let from: Mailbox = config
            .from_address
            .parse()
            .with_context(|| format!("Invalid from_address: {}", config.from_address))?;

        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .with_context(|| format!("Failed to create SMTP relay: {}", config.smtp_host))?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            transport,
            from,
            sales_recipients: config.sales_recipients.clone(),
            send_customer_copy: config.send_customer_copy,
        })
    }

    #[must_use]
    pub fn sales_recipients(&self) -> Vec<String> {
        self.sales_recipients.clone()
    }

    /// HTML quote to the customer. Returns the address it was sent to, if any.
    pub async fn send_quote_to_customer(&self, record: &QuoteRecord) -> Result<Option<String>> {
        if !self.send_customer_copy {
            return Ok(None);
        }
        let Some(address) = record.request.customer.email.clone() else {
            return Ok(None);
        };
        let to: Mailbox = address
            .parse()
            .with_context(|| format!("Invalid customer address: {address}"))?;

        let html = QuoteDocument::from_record(record)
            .render()
            .context("Failed to render quote document")?;
        let text = format!(
            "Gracias por su consulta. Adjuntamos la cotización {} de su sistema solar.",
            record.quote_id
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(format!("Su cotización solar {}", record.quote_id))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .context("Failed to build email message")?;

        self.transport
            .send(message)
            .await
            .with_context(|| format!("Failed to send quote to {address}"))?;
        info!(quote_id = %record.quote_id, recipient = %address, "Quote sent to customer");
        Ok(Some(address))
    }

    /// Plain-text summary to every sales recipient. Returns the addresses that accepted it.
    pub async fn send_quote_to_sales(&self, record: &QuoteRecord) -> Result<Vec<String>> {
        let subject = format!(
            "Nueva cotización: {} ({} kW)",
            record.request.customer.name,
            crate::document::format_decimal(record.design.system_power_kw, 2)
        );
        self.send_to_all(&subject, &sales_summary(record)).await
    }

    async fn send_to_all(&self, subject: &str, body: &str) -> Result<Vec<String>> {
        let mut delivered = Vec::with_capacity(self.sales_recipients.len());
        for recipient in &self.sales_recipients {
            let to: Mailbox = match recipient.parse() {
                Ok(m) => m,
                Err(e) => {
                    error!(recipient = %recipient, error = %e, "Invalid recipient address, skipping");
                    continue;
                }
            };

            let message = Message::builder()
                .from(self.from.clone())
                .to(to)
                .subject(subject)
                .header(ContentType::TEXT_PLAIN)
                .body(body.to_owned())
                .context("Failed to build email message")?;

            match self.transport.send(message).await {
                Ok(_) => {
                    info!(recipient = %recipient, subject = %subject, "Email sent");
                    delivered.push(recipient.clone());
                }
                Err(e) => error!(recipient = %recipient, error = %e, "Failed to send email"),
            }
        }

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cotiza_core::{InMemoryCatalog, SolarCalculator};
    use cotiza_types::{InstallationType, QuoteRequest, TariffType};

    fn settings(send_customer_copy: bool) -> EmailSettings {
        EmailSettings {
            smtp_host: "localhost".to_owned(),
            smtp_port: 2525,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "Cotizaciones <cotizaciones@example.com>".to_owned(),
            use_tls: false,
            sales_recipients: vec!["ventas@example.com".to_owned()],
            send_customer_copy,
        }
    }

    fn record(email: Option<&str>) -> QuoteRecord {
        let mut request = QuoteRequest::new(
            "buenos-aires",
            300.0,
            TariffType::Residential,
            40.0,
            InstallationType::ResidentialRoof,
        );
        request.customer.name = "Ana".to_owned();
        request.customer.email = email.map(str::to_owned);
        let design = SolarCalculator::default()
            .size_system(&request, &InMemoryCatalog::with_defaults())
            .unwrap();
        QuoteRecord::new(request, design, Utc::now(), 30)
    }

    #[test]
    fn test_invalid_from_address_is_rejected() {
        let mut config = settings(true);
        config.from_address = "not an address".to_owned();
        assert!(EmailNotifier::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_customer_copy_skipped_without_address_or_when_disabled() {
        let notifier = EmailNotifier::new(&settings(true)).unwrap();
        assert_eq!(notifier.send_quote_to_customer(&record(None)).await.unwrap(), None);

        let notifier = EmailNotifier::new(&settings(false)).unwrap();
        let sent = notifier
            .send_quote_to_customer(&record(Some("ana@example.com")))
            .await
            .unwrap();
        assert_eq!(sent, None);
        assert_eq!(notifier.sales_recipients(), vec!["ventas@example.com"]);
    }

    #[tokio::test]
    async fn test_invalid_customer_address_is_an_error() {
        let notifier = EmailNotifier::new(&settings(true)).unwrap();
        let err = notifier
            .send_quote_to_customer(&record(Some("ana-at-example")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid customer address"));
    }
}
