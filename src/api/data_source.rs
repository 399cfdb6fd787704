use std::future::Future;

use crate::core::PriceHistory;
use crate::error::DashboardResult;

use super::SpotQuote;

/// Pricing-service capability consumed by the refresh pipeline.
///
/// Both operations are read-only and may run concurrently. Futures are not
/// required to be `Send`: the refresh service drives them on a single thread.
pub trait PriceDataSource {
    /// Fetches the history of `asset` priced in `currency` over the period
    /// named by `duration_key`, sorted ascending by time.
    fn fetch_price_history(
        &self,
        asset: &str,
        currency: &str,
        duration_key: &str,
    ) -> impl Future<Output = DashboardResult<PriceHistory>>;

    /// Fetches spot quotes in `currency`, restricted to supported assets and
    /// kept in service order.
    fn fetch_spot_prices(
        &self,
        currency: &str,
    ) -> impl Future<Output = DashboardResult<Vec<SpotQuote>>>;
}

impl<S: PriceDataSource + ?Sized> PriceDataSource for &S {
    fn fetch_price_history(
        &self,
        asset: &str,
        currency: &str,
        duration_key: &str,
    ) -> impl Future<Output = DashboardResult<PriceHistory>> {
        (**self).fetch_price_history(asset, currency, duration_key)
    }

    fn fetch_spot_prices(
        &self,
        currency: &str,
    ) -> impl Future<Output = DashboardResult<Vec<SpotQuote>>> {
        (**self).fetch_spot_prices(currency)
    }
}
