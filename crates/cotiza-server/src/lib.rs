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

//! Quote backend: HTTP API, persistence, notifications and background sync

pub mod api;
pub mod config;
pub mod db;
pub mod document;
pub mod nocodb;
pub mod notifications;
pub mod rates;
pub mod sync;
pub mod updater;
