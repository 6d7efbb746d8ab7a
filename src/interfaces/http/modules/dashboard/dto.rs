//! Dashboard query parameters

use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SalesQuery {
    /// `week`, `month` (default), `quarter` or `year`
    pub period: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimelineQuery {
    /// Window length in days, default 30
    #[param(maximum = 3650)]
    pub days: Option<u32>,
}
