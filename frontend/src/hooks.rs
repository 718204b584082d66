use std::{cell::Cell, future::Future, rc::Rc};

use affiliate_shared::{Post, Product};
use yew::prelude::*;

use crate::api::{self, DataSource, Loaded};

/// What a data hook hands to a page.
///
/// `data` keeps the last successful value while a refetch is in flight or
/// after it fails, so pages do not flash empty.
#[derive(Clone)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub source: DataSource,
    pub refetch: Callback<()>,
}

/// `data` is `Some(None)` once the API has answered 404.
pub type PostState = QueryState<Option<Post>>;

/// Hands out increasing tickets; only the newest one is current.
#[derive(Debug, Default)]
struct LatestRequest {
    issued: Cell<u64>,
}

impl LatestRequest {
    fn issue(&self) -> u64 {
        let ticket = self.issued.get().wrapping_add(1);
        self.issued.set(ticket);
        ticket
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.issued.get() == ticket
    }
}

/// Run `load(deps)` whenever `deps` change or `refetch` is emitted. Responses
/// that arrive after a newer load started are dropped.
#[hook]
fn use_loader<T, D, F, Fut>(label: &'static str, deps: D, load: F) -> QueryState<T>
where
    T: Clone + 'static,
    D: Clone + PartialEq + 'static,
    F: FnOnce(D) -> Fut + 'static,
    Fut: Future<Output = Result<Loaded<T>, String>> + 'static,
{
    let data = use_state(|| None::<T>);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let source = use_state(DataSource::default);
    let generation = use_state(|| 0u32);
    let latest = use_memo((), |_| LatestRequest::default());

    {
        let data = data.clone();
        let loading = loading.clone();
        let error = error.clone();
        let source = source.clone();
        let latest: Rc<LatestRequest> = latest.clone();

        use_effect_with((deps, *generation), move |(deps, _)| {
            let deps = deps.clone();
            let ticket = latest.issue();
            loading.set(true);
            error.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                let result = load(deps).await;
                if !latest.is_current(ticket) {
                    return;
                }
                match result {
                    Ok(loaded) => {
                        data.set(Some(loaded.data));
                        source.set(loaded.source);
                    },
                    Err(e) => {
                        web_sys::console::error_1(
                            &format!("Failed to load {}: {}", label, e).into(),
                        );
                        error.set(Some(format!("Failed to load {}: {}", label, e)));
                    },
                }
                loading.set(false);
            });
            || ()
        });
    }

    let refetch = {
        let generation = generation.clone();
        Callback::from(move |_: ()| generation.set(generation.wrapping_add(1)))
    };

    QueryState {
        data: (*data).clone(),
        loading: *loading,
        error: (*error).clone(),
        source: (*source).clone(),
        refetch,
    }
}

/// Published reviews, newest first.
#[hook]
pub fn use_posts() -> QueryState<Vec<Post>> {
    use_loader("posts", (), |_| api::load_posts())
}

/// One review by slug; refetches when the slug changes.
#[hook]
pub fn use_post(slug: String) -> PostState {
    use_loader("post", slug, |slug: String| async move { api::load_post(&slug).await })
}

/// Products that carry an affiliate link.
#[hook]
pub fn use_products() -> QueryState<Vec<Product>> {
    use_loader("products", (), |_| api::load_products())
}

#[cfg(test)]
mod tests {
    use super::LatestRequest;

    #[test]
    fn only_the_newest_ticket_is_current() {
        let latest = LatestRequest::default();
        let first = latest.issue();
        assert!(latest.is_current(first));

        let second = latest.issue();
        assert!(!latest.is_current(first));
        assert!(latest.is_current(second));
    }
}
