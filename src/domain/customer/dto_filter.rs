use super::{Customer, CustomerStatus, CustomerType, InstallationType};

/// Listing filters. `city`/`state` match case-insensitively;
/// `search` is a case-insensitive substring of name or email.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub status: Option<CustomerStatus>,
    pub installation_type: Option<InstallationType>,
    pub customer_type: Option<CustomerType>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub search: Option<String>,
}

impl CustomerFilter {
    /// In-process evaluation of the filter, used by the in-memory store.
    pub fn matches(&self, customer: &Customer) -> bool {
        if self.status.is_some_and(|s| s != customer.status) {
            return false;
        }
        if self
            .installation_type
            .is_some_and(|t| t != customer.installation_type)
        {
            return false;
        }
        if self.customer_type.is_some_and(|t| t != customer.customer_type) {
            return false;
        }
        if let Some(city) = &self.city {
            if customer.city.to_lowercase() != city.to_lowercase() {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if customer.state.to_lowercase() != state.to_lowercase() {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !customer.name.to_lowercase().contains(&needle)
                && !customer.email.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}
