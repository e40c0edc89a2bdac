// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// UPI payment request — a structured value serialized through one explicit
// formatting function, so link-format changes live in exactly one place.
//
// Deep-link shape: upi://pay?pa=<handle>&pn=<name>&am=<amount>&cu=<code>
// The payer's device scans the QR, parses this link, and settles the
// payment out of band; the kiosk never touches the network for payment.

use serde::{Deserialize, Serialize};

use druckkiosk_core::config::PayeeConfig;
use druckkiosk_core::error::{DruckkioskError, Result};
use druckkiosk_core::types::Money;

use crate::pricing::PricingQuote;

/// A payment request, constructed immediately before QR encoding and never
/// stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Virtual payment address of the recipient.
    pub payee_handle: String,
    /// Display name shown in the payer's UPI app.
    pub payee_name: String,
    pub amount: Money,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl PaymentRequest {
    pub fn new(
        payee_handle: impl Into<String>,
        payee_name: impl Into<String>,
        amount: Money,
        currency: impl Into<String>,
    ) -> Result<Self> {
        let payee_handle = payee_handle.into();
        let payee_name = payee_name.into();
        let currency = currency.into();

        if payee_handle.trim().is_empty() {
            return Err(DruckkioskError::InvalidPaymentRequest(
                "payee handle is empty".into(),
            ));
        }
        if amount.is_negative() {
            return Err(DruckkioskError::InvalidPaymentRequest(format!(
                "amount {} is negative",
                amount
            )));
        }
        if currency.trim().is_empty() {
            return Err(DruckkioskError::InvalidPaymentRequest(
                "currency code is empty".into(),
            ));
        }

        Ok(Self {
            payee_handle,
            payee_name,
            amount,
            currency,
        })
    }

    /// Build the request for a computed quote.
    ///
    /// The amount is always the quote's `total` (copies included), so the
    /// QR encodes exactly the price the customer was shown.
    pub fn for_quote(payee: &PayeeConfig, quote: &PricingQuote) -> Result<Self> {
        Self::new(
            payee.handle.clone(),
            payee.display_name.clone(),
            quote.total,
            payee.currency.clone(),
        )
    }

    /// Serialize as a UPI deep link.
    ///
    /// Query values are form-urlencoded; the amount uses the two-decimal
    /// `Money` rendering, matching what the kiosk screen displays.
    pub fn to_uri(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("pa", &self.payee_handle)
            .append_pair("pn", &self.payee_name)
            .append_pair("am", &self.amount.to_string())
            .append_pair("cu", &self.currency)
            .finish();
        format!("upi://pay?{query}")
    }
}
