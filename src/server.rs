use std::sync::Arc;

use gotham::handler::HandlerResult;
use gotham::helpers::http::response::create_response;
use gotham::middleware::state::StateMiddleware;
use gotham::pipeline::{new_pipeline, single_pipeline};
use gotham::router::{builder::*, Router};
use gotham::state::{FromState, State};
use gotham_derive::{StateData, StaticResponseExtender};
use hyper::header::{HeaderValue, CACHE_CONTROL};
use hyper::{Body, Response, StatusCode};
use serde_derive::Deserialize;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::listing::{cards, ListingQuery};
use crate::page;
use crate::reservation::{self, Invalid, Outcome, ReservationForm};
use crate::templates::statics::StaticFile;
use crate::Error;

#[derive(Clone, Debug)]
pub struct SiteInfo {
    pub name: String,
    pub currency: String,
}

impl Default for SiteInfo {
    fn default() -> SiteInfo {
        SiteInfo {
            name: "EventTicket".to_owned(),
            currency: "₦".to_owned(),
        }
    }
}

/// Everything a request needs, shared read-only between requests.
#[derive(Clone, StateData)]
pub struct Storefront {
    catalog: Arc<Catalog>,
    site: Arc<SiteInfo>,
}

impl Storefront {
    pub fn new(catalog: Catalog, site: SiteInfo) -> Storefront {
        Storefront {
            catalog: Arc::new(catalog),
            site: Arc::new(site),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn site(&self) -> &SiteInfo {
        &self.site
    }
}

pub fn router(storefront: Storefront) -> Router {
    let (chain, pipelines) =
        single_pipeline(new_pipeline().add(StateMiddleware::new(storefront)).build());

    build_router(chain, pipelines, |route| {
        route
            .get("/")
            .with_query_string_extractor::<ListingQuery>()
            .to(serve_index);
        route.post("/").to_async(reserve);

        route
            .get("/events.json")
            .with_query_string_extractor::<ListingQuery>()
            .to(serve_listing);

        route
            .get("/static/:name")
            .with_path_extractor::<StaticPath>()
            .to(serve_static);
    })
}

fn html_response(state: &State, page: Result<Vec<u8>, Error>) -> Response<Body> {
    match page {
        Ok(body) => create_response(state, StatusCode::OK, mime::TEXT_HTML_UTF_8, body),
        Err(err) => err.as_response(state),
    }
}

fn serve_index(mut state: State) -> (State, Response<Body>) {
    let query = ListingQuery::take_from(&mut state);
    let storefront = Storefront::borrow_from(&state);
    let response = html_response(&state, page::render(storefront, None, &query));
    (state, response)
}

async fn reserve(mut state: State) -> HandlerResult {
    let response = match hyper::body::to_bytes(Body::take_from(&mut state)).await {
        Ok(body) => {
            let storefront = Storefront::borrow_from(&state);
            html_response(&state, reservation_page(storefront, &body))
        }
        Err(err) => Error::RequestBody(err).as_response(&state),
    };
    Ok((state, response))
}

fn reservation_page(storefront: &Storefront, body: &[u8]) -> Result<Vec<u8>, Error> {
    let currency = &storefront.site().currency;
    let message = match ReservationForm::from_form_body(body) {
        Ok(form) if !form.is_submission() => None,
        Ok(form) => {
            let outcome = reservation::process(storefront.catalog(), &form);
            log_outcome(&outcome);
            Some(outcome.message(currency))
        }
        Err(err) => {
            warn!(error = %err, "Malformed reservation form");
            Some(Outcome::Invalid(Invalid::Malformed).message(currency))
        }
    };
    page::render(storefront, message.as_deref(), &ListingQuery::default())
}

fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Invalid(reason) => info!(kind = outcome.kind(), %reason, "Reservation rejected"),
        Outcome::EventNotFound { event_id } => {
            info!(kind = outcome.kind(), event_id, "Reservation rejected")
        }
        Outcome::Confirmed(confirmation) => info!(
            kind = outcome.kind(),
            event_id = confirmation.event.id,
            quantity = confirmation.reservation.quantity,
            total = confirmation.total,
            "Reservation confirmed"
        ),
    }
}

fn serve_listing(mut state: State) -> (State, Response<Body>) {
    let query = ListingQuery::take_from(&mut state);
    let storefront = Storefront::borrow_from(&state);
    let listing = cards(
        storefront.catalog(),
        &query,
        query.sort.unwrap_or_default(),
        &storefront.site().currency,
    );
    info!(count = listing.len(), "Listing served");
    let response = match serde_json::to_vec(&listing) {
        Ok(body) => create_response(&state, StatusCode::OK, mime::APPLICATION_JSON, body),
        Err(err) => Error::Json(err).as_response(&state),
    };
    (state, response)
}

#[derive(Deserialize, StateData, StaticResponseExtender)]
struct StaticPath {
    name: String,
}

fn serve_static(state: State) -> (State, Response<Body>) {
    let name = &StaticPath::borrow_from(&state).name;
    let response = match StaticFile::get(name) {
        Some(file) => {
            let mut response =
                create_response(&state, StatusCode::OK, content_type(file.name), file.content);
            // Names carry a content hash, so a file never changes under its name.
            response.headers_mut().insert(
                CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=31536000, immutable"),
            );
            response
        }
        None => {
            warn!(%name, "Unknown static file");
            Error::StaticNotFound(name.clone()).as_response(&state)
        }
    };
    (state, response)
}

fn content_type(name: &str) -> mime::Mime {
    if name.ends_with(".css") {
        mime::TEXT_CSS_UTF_8
    } else if name.ends_with(".js") {
        mime::APPLICATION_JAVASCRIPT_UTF_8
    } else {
        mime::APPLICATION_OCTET_STREAM
    }
}
