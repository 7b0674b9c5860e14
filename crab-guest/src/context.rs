//! Customer context resolution and customer link building
//!
//! Both operations resolve the table and token the same way: the value
//! carried by the URL wins, otherwise the last value remembered in session
//! storage. Fields fall back independently.

use crate::store::SessionStore;
use shared::models::{CustomerContext, ResolveError, RouteParams, SessionParams};
use shared::util::non_blank;

/// Where remembered table and token values come from
pub trait FallbackSource {
    fn stored_table(&self) -> Option<String>;

    fn stored_token(&self) -> Option<String>;
}

impl FallbackSource for SessionStore {
    fn stored_table(&self) -> Option<String> {
        self.customer_table()
    }

    fn stored_token(&self) -> Option<String> {
        self.customer_token()
    }
}

/// URL value if present, else the stored value
fn resolve_field(from_url: Option<&str>, stored: impl FnOnce() -> Option<String>) -> Option<String> {
    match from_url {
        Some(value) => Some(value.to_string()),
        None => stored().and_then(|value| non_blank(Some(value.as_str())).map(str::to_string)),
    }
}

fn resolve_pair(
    params: &SessionParams,
    fallback: &impl FallbackSource,
) -> (Option<String>, Option<String>) {
    let table = resolve_field(params.table(), || fallback.stored_table());
    let token = resolve_field(params.token(), || fallback.stored_token());
    (table, token)
}

/// Build the customer context for a view
///
/// Existence of both values is checked before the table format, so a
/// missing token is reported as `missing_params` even when the table is
/// also malformed.
pub fn resolve_customer_context(
    route: &RouteParams,
    fallback: &impl FallbackSource,
) -> Result<CustomerContext, ResolveError> {
    let (table, token) = resolve_pair(&route.session, fallback);
    let result = CustomerContext::new(route.tenant_slug.as_str(), table.as_deref(), token.as_deref());

    if let Err(e) = &result {
        tracing::debug!(
            tenant = %route.tenant_slug,
            reason = e.code(),
            "Customer context not resolved"
        );
    }
    result
}

/// Customer page a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination<'a> {
    Menu,
    Cart,
    /// Menu item detail, by item id
    Item(&'a str),
}

impl Destination<'_> {
    fn path(&self, tenant_slug: &str) -> String {
        match self {
            Destination::Menu => format!("/{tenant_slug}/menu"),
            Destination::Cart => format!("/{tenant_slug}/cart"),
            Destination::Item(id) => format!("/{tenant_slug}/menu/{}", urlencoding::encode(id)),
        }
    }
}

/// Internal link that carries the active session identifiers
///
/// When table and token cannot both be resolved the link degrades to the
/// bare menu page, never a link with empty parameters.
pub fn customer_href(
    tenant_slug: &str,
    destination: Destination<'_>,
    params: &SessionParams,
    fallback: &impl FallbackSource,
) -> String {
    match resolve_pair(params, fallback) {
        (Some(table), Some(token)) => format!(
            "{}?table={}&token={}",
            destination.path(tenant_slug),
            urlencoding::encode(&table),
            urlencoding::encode(&token)
        ),
        _ => Destination::Menu.path(tenant_slug),
    }
}
