//! Minimal paramconv example: one typed search endpoint.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl 'http://localhost:3000/search?q=rust&tag[]=web&tag[]=http'
//!   curl -X POST http://localhost:3000/search \
//!        -H 'content-type: application/json' \
//!        -d '{"q":"rust","limit":"5"}'
//!   curl -X POST http://localhost:3000/search \
//!        -d 'q=rust&tag[]=cli'
//!   curl 'http://localhost:3000/search?limit=lots'      # 400

use paramconv::middleware::param_converter;
use paramconv::{Facade, Method, ParamError, Params, Request, Response, Router, Server, StatusCode};

const DEFAULT_LIMIT: u32 = 10;

#[derive(Default)]
struct Search {
    query: String,
    tags: Vec<String>,
    limit: u32,
}

impl Facade for Search {
    type Error = ParamError;

    fn deserialize(&mut self, params: &Params) -> Result<(), ParamError> {
        self.query = params
            .text("q")
            .ok_or_else(|| ParamError::Missing("q".into()))?
            .to_owned();
        self.tags = params
            .list("tag")
            .unwrap_or_default()
            .into_iter()
            .map(str::to_owned)
            .collect();
        self.limit = if params.contains_key("limit") { params.parse("limit")? } else { DEFAULT_LIMIT };
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .on(Method::GET,  "/search", param_converter(Search::default, search))
        .on(Method::POST, "/search", param_converter(Search::default, search));

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// GET|POST /search
//
// By the time this runs the parameters are already typed; a missing facade
// means the route was wired to the wrong converter.
async fn search(req: Request) -> Response {
    let Some(search) = req.facade::<Search>() else {
        return Response::status(StatusCode::INTERNAL_SERVER_ERROR);
    };

    Response::text(format!(
        "q={} tags={:?} limit={}",
        search.query, search.tags, search.limit
    ))
}
