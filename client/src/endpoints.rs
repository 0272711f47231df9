//! Fixed endpoint catalog of the remote inventory backend
//!
//! The client is not a general-purpose HTTP library: it talks to exactly
//! these paths. Relative endpoints are joined onto the configured base URL.

// Authentication
pub const LOGIN: &str = "/api/users/login/";
pub const LOGOUT: &str = "/api/auth/logout/";
pub const REFRESH_TOKEN: &str = "/api/token/refresh/";

// Users
pub const USERS: &str = "/api/utilisateurs/";
pub const USER_PROFILE: &str = "/api/users/profile/";

// Stock
pub const STOCKS: &str = "/api/lots/";
pub const STOCK_STATS: &str = "/api/lots/stats/";
pub const STOCK_MOVEMENTS: &str = "/api/mouvements/";
pub const STOCK_ALERTS: &str = "/api/alertes/";

// Products
pub const PRODUCTS: &str = "/api/produits/";
pub const PRODUCT_CATEGORIES: &str = "/api/products/categories/";

// Deliveries
pub const DELIVERIES: &str = "/api/livraisons/";
pub const DELIVERY_TRACKING: &str = "/api/livraisons/tracking/";

// Sales
pub const SALES: &str = "/api/ventes/";
pub const SALES_STATS: &str = "/api/ventes/stats/";
pub const SALES_CREATE_WITH_LINES: &str = "/api/ventes/creer_avec_lignes/";

// Procurement
pub const PROCUREMENTS: &str = "/api/approvisionnements/";
pub const PROCUREMENT_STATS: &str = "/api/approvisionnements/stats/";

// Notifications
pub const NOTIFICATIONS: &str = "/api/notifications/";

// Forecasts
pub const FORECASTS: &str = "/api/previsions/";

// Reports
pub const REPORTS: &str = "/api/reports/";

/// Auth endpoints never receive an automatic bearer token and are never
/// diverted to demo mode.
pub fn is_auth_endpoint(endpoint: &str) -> bool {
    endpoint.contains("/users/login/") || endpoint.contains("/token/refresh/")
}

/// Append form-encoded query parameters to an endpoint.
pub fn with_query(endpoint: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("{}?{}", endpoint, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_auth_endpoints() {
        assert!(is_auth_endpoint(LOGIN));
        assert!(is_auth_endpoint(REFRESH_TOKEN));
        assert!(!is_auth_endpoint(LOGOUT));
        assert!(!is_auth_endpoint(STOCKS));
    }

    #[test]
    fn builds_query_strings() {
        assert_eq!(with_query(STOCKS, &[]), STOCKS);
        assert_eq!(
            with_query(STOCKS, &[("entrepot", "2".into()), ("page", "1".into())]),
            "/api/lots/?entrepot=2&page=1"
        );
    }

    #[test]
    fn query_values_are_form_encoded() {
        assert_eq!(
            with_query(
                SALES,
                &[
                    ("client", "Restaurant & Bar".into()),
                    ("date", "2026-08-30 10:00".into()),
                ],
            ),
            "/api/ventes/?client=Restaurant+%26+Bar&date=2026-08-30+10%3A00"
        );
    }
}
