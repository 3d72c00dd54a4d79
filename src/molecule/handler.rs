use axum::http::StatusCode;

impl From<&super::Error> for StatusCode {
    fn from(e: &super::Error) -> Self {
        match e {
            super::Error::MissingName => Self::BAD_REQUEST,
            super::Error::NotFound | super::Error::NoData => Self::NOT_FOUND,
            super::Error::InvalidUrl(_) | super::Error::_Url(_) | super::Error::_Reqwest(_) => {
                Self::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub(super) mod pages {
    use crate::markup::Wrappable;
    use crate::molecule::markup;

    pub async fn research() -> Wrappable {
        Wrappable::new(markup::Research)
    }

    pub async fn molecules() -> Wrappable {
        Wrappable::new(markup::MoleculeBank)
    }
}

pub(super) mod api {
    use axum::Json;
    use axum::extract::rejection::JsonRejection;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use log::error;
    use maud::{Markup, Render};
    use serde::Deserialize;
    use serde_json::{Value, json};

    use crate::molecule::{self, markup};

    const RESWAP: &str = "HX-Reswap";

    #[derive(Deserialize)]
    pub struct CompoundParams {
        #[serde(default)]
        name: String,
    }

    pub async fn find_compound(
        molecule_service: State<molecule::Service>,
        params: Query<CompoundParams>,
    ) -> crate::Result<Markup> {
        let compound = molecule_service.find_compound(&params.name).await?;
        Ok(markup::CompoundCard::new(params.name.trim(), &compound).render())
    }

    #[derive(Deserialize)]
    pub struct SearchParams {
        #[serde(default)]
        q: String,
    }

    pub async fn search(
        molecule_service: State<molecule::Service>,
        params: Query<SearchParams>,
    ) -> Response {
        match molecule_service.search(&params.q).await {
            Some(molecules) => markup::MoleculeRows(&molecules).render().into_response(),
            None => ([(RESWAP, "none")], ()).into_response(),
        }
    }

    pub async fn generate(
        molecule_service: State<molecule::Service>,
        payload: Result<Json<Value>, JsonRejection>,
    ) -> Response {
        let res = match payload {
            Ok(Json(payload)) => molecule_service.generate(&payload).await,
            Err(e) => {
                error!("Proxy error: {e}");
                return failed_to_fetch();
            }
        };

        match res {
            Ok((status, body)) => (status, Json(body)).into_response(),
            Err(e) => {
                error!("Proxy error: {e}");
                failed_to_fetch()
            }
        }
    }

    fn failed_to_fetch() -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to fetch data"})),
        )
            .into_response()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use axum::{Router, routing::get};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::integration::api;
    use crate::molecule::{self, service::MoleculeServiceImpl};

    async fn search(server: &MockServer, q: &str) -> (Option<String>, String) {
        let cfg = api::Config {
            pubchem_url: server.uri(),
            ..api::Config::default()
        };
        let service: molecule::Service =
            Arc::new(MoleculeServiceImpl::new(cfg, reqwest::Client::new()));
        let app = Router::new()
            .route("/molecules", get(super::api::search))
            .with_state(service);

        let req = Request::get(format!("/molecules?q={q}"))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let reswap = resp
            .headers()
            .get("HX-Reswap")
            .map(|v| v.to_str().unwrap().to_owned());
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (reswap, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn should_leave_rows_in_place_when_nothing_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (reswap, body) = search(&server, "Unobtainium").await;

        assert_eq!(reswap.as_deref(), Some("none"));
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn should_render_matching_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "PropertyTable": {
                    "Properties": [{"MolecularWeight": "46.07", "CanonicalSMILES": "CCO"}]
                }
            })))
            .mount(&server)
            .await;

        let (reswap, body) = search(&server, "Ethanol").await;

        assert_eq!(reswap, None);
        assert!(body.contains("<td class=\"p-3\">Ethanol</td>"));
    }
}
