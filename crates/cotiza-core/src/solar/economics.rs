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

use cotiza_types::Economics;

use super::params::EconomicParams;
use crate::errors::{QuoteError, Result};

/// Savings, payback and ROI for an investment.
///
/// Payback and ROI are only defined for positive savings and investment; anything else is
/// reported as `EconomicsUndefined` rather than an infinite or NaN figure.
pub fn economics(
    monthly_consumption_kwh: f64,
    tariff_rate: f64,
    total_investment: f64,
    params: &EconomicParams,
) -> Result<Economics> {
    let monthly_savings = monthly_consumption_kwh * tariff_rate * params.self_consumption_ratio;
    let annual_savings = monthly_savings * 12.0;

    if !annual_savings.is_finite() || annual_savings <= 0.0 {
        return Err(QuoteError::undefined(format!(
            "annual savings are {annual_savings} ARS (tariff rate {tariff_rate} ARS/kWh)"
        )));
    }
    if !total_investment.is_finite() || total_investment <= 0.0 {
        return Err(QuoteError::undefined(format!(
            "total investment is {total_investment} ARS"
        )));
    }

    Ok(Economics {
        tariff_rate,
        self_consumption_ratio: params.self_consumption_ratio,
        monthly_savings,
        annual_savings,
        payback_years: total_investment / annual_savings,
        roi_percentage: annual_savings / total_investment * 100.0,
        annual_maintenance: total_investment * params.maintenance_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payback_and_roi() {
        let result = economics(300.0, 45.0, 2_760_000.0, &EconomicParams::default()).unwrap();
        assert!((result.monthly_savings - 13_500.0).abs() < 1e-9);
        assert!((result.annual_savings - 162_000.0).abs() < 1e-9);
        assert!((result.payback_years - 2_760_000.0 / 162_000.0).abs() < 1e-12);
        assert!((result.roi_percentage - 162_000.0 / 2_760_000.0 * 100.0).abs() < 1e-12);
        assert!((result.annual_maintenance - 27_600.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_tariff_is_undefined() {
        let err = economics(300.0, 0.0, 1_000_000.0, &EconomicParams::default()).unwrap_err();
        assert!(matches!(err, QuoteError::EconomicsUndefined { .. }));
    }

    #[test]
    fn test_zero_investment_is_undefined() {
        let err = economics(300.0, 45.0, 0.0, &EconomicParams::default()).unwrap_err();
        assert!(matches!(err, QuoteError::EconomicsUndefined { .. }));
    }

    #[test]
    fn test_self_consumption_ratio_scales_savings() {
        let params = EconomicParams {
            self_consumption_ratio: 0.7,
            ..EconomicParams::default()
        };
        let result = economics(100.0, 40.0, 1_000_000.0, &params).unwrap();
        assert!((result.monthly_savings - 2_800.0).abs() < 1e-9);
        assert!((result.self_consumption_ratio - 0.7).abs() < f64::EPSILON);
    }
}
