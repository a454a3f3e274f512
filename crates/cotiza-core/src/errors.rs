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

//! Error types for the quote calculators

use cotiza_types::HardwareCategory;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no active {} available in the materials catalog", .0.to_config_value())]
    CatalogExhausted(HardwareCategory),

    #[error("economics undefined: {reason}")]
    EconomicsUndefined { reason: String },
}

impl QuoteError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub(crate) fn undefined(reason: impl Into<String>) -> Self {
        Self::EconomicsUndefined {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
